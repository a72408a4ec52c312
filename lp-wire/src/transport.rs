//! Blocking line transports.
//!
//! The session driver only needs "send a line" and "read a line"; anything
//! that can do both (a TCP socket, an in-process simulated lock, a scripted
//! test double) implements [`LineTransport`]. No timeouts and no retries:
//! a failed read or write ends the run.

use std::io::{BufReader, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

use crate::frame::{read_line, write_line, WireError};

pub trait LineTransport {
    /// Send `line` followed by a newline.
    fn write_line(&mut self, line: &[u8]) -> Result<(), WireError>;
    /// Block until a full line (or EOF-terminated tail) is available.
    fn read_line(&mut self) -> Result<Vec<u8>, WireError>;
}

impl<T: LineTransport + ?Sized> LineTransport for &mut T {
    fn write_line(&mut self, line: &[u8]) -> Result<(), WireError> {
        (**self).write_line(line)
    }

    fn read_line(&mut self) -> Result<Vec<u8>, WireError> {
        (**self).read_line()
    }
}

impl<T: LineTransport + ?Sized> LineTransport for Box<T> {
    fn write_line(&mut self, line: &[u8]) -> Result<(), WireError> {
        (**self).write_line(line)
    }

    fn read_line(&mut self) -> Result<Vec<u8>, WireError> {
        (**self).read_line()
    }
}

/// Line transport over a reader/writer pair.
pub struct StreamTransport<R: Read, W: Write> {
    reader: BufReader<R>,
    writer: W,
}

impl<R: Read, W: Write> StreamTransport<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader.into_inner(), self.writer)
    }
}

impl<R: Read, W: Write> LineTransport for StreamTransport<R, W> {
    fn write_line(&mut self, line: &[u8]) -> Result<(), WireError> {
        write_line(&mut self.writer, line)
    }

    fn read_line(&mut self) -> Result<Vec<u8>, WireError> {
        read_line(&mut self.reader)
    }
}

/// TCP connection to the lock.
pub type TcpTransport = StreamTransport<TcpStream, TcpStream>;

impl TcpTransport {
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, WireError> {
        let stream = TcpStream::connect(addr)?;
        Self::from_stream(stream)
    }

    pub fn from_stream(stream: TcpStream) -> Result<Self, WireError> {
        stream.set_nodelay(true)?;
        let writer = stream.try_clone()?;
        Ok(Self::new(stream, writer))
    }

    pub fn peer_addr(&self) -> Result<SocketAddr, WireError> {
        Ok(self.reader.get_ref().peer_addr()?)
    }
}
