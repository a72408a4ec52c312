//! Offline stand-in for the remote lock.
//!
//! Secret pins come from a seeded recurrence over the global numbering, so a
//! full session (guessing, recovery, prediction) can run without a network
//! peer. Replies use the same text format as the real service.

use std::collections::VecDeque;
use std::net::TcpListener;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

use lp_core::{all_pins, score, Pin};
use lp_lfsr::{Lfsr, SolveError, F5039, MODULUS};
use lp_wire::codec::encode_hint;
use lp_wire::{LineTransport, TcpTransport, WireError};

/// Banner printed once on connect.
pub const BANNER: &str = "Welcome to the lockpicking range. Crack the pins.";
/// Flag appended to the last reply when every prediction was right.
pub const SIM_FLAG: &str = "flag{simulated_lock_opened}";

const MAX_ATTEMPTS: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Guessing { round: usize },
    Predicting { step: usize },
    Done,
}

/// In-process lock implementing [`LineTransport`].
///
/// Every line written to it is treated as a guess; the reply is queued and
/// handed out by the next `read_line`.
#[derive(Debug, Clone)]
pub struct SimulatedLock {
    pins: Vec<Pin>,
    coefs: Vec<F5039>,
    rounds: usize,
    phase: Phase,
    outbox: VecDeque<Vec<u8>>,
    solved: usize,
    correct: usize,
}

impl SimulatedLock {
    /// Draw a recurrence of `order` over Z/5039 and the first
    /// `rounds + predictions` pins it selects.
    ///
    /// Draws are repeated until the first `2 * order` terms determine the
    /// recurrence uniquely.
    pub fn new(seed: u64, rounds: u32, predictions: u32, order: u32) -> Result<Self, SolveError> {
        let (rounds, predictions, order) = (rounds as usize, predictions as usize, order as usize);
        if order == 0 || rounds < 2 * order {
            return Err(SolveError::NotEnoughTerms {
                order,
                need: 2 * order,
                got: rounds,
            });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut last_err = SolveError::Singular { column: 0 };
        for _ in 0..MAX_ATTEMPTS {
            let state: Vec<F5039> = (0..order)
                .map(|_| F5039::from(rng.gen_range(0..MODULUS)))
                .collect();
            let coefs: Vec<F5039> = (0..order)
                .map(|_| F5039::from(rng.gen_range(0..MODULUS)))
                .collect();

            let mut lfsr = Lfsr::new(state.clone(), coefs.clone())?;
            let mut terms = state;
            while terms.len() < rounds + predictions {
                terms.push(lfsr.step());
            }

            match Lfsr::recover(&terms[..2 * order], order) {
                Ok(found) if found.coefs() == coefs.as_slice() => {
                    return Ok(Self::from_terms(&terms, coefs, rounds));
                }
                Ok(_) => {}
                Err(e) => last_err = e,
            }
        }
        Err(last_err)
    }

    fn from_terms(terms: &[F5039], coefs: Vec<F5039>, rounds: usize) -> Self {
        let table = all_pins();
        let pins = terms
            .iter()
            .filter_map(|t| table.pin(t.value() as usize))
            .collect();
        let mut outbox = VecDeque::new();
        outbox.push_back(BANNER.as_bytes().to_vec());
        Self {
            pins,
            coefs,
            rounds,
            phase: Phase::Guessing { round: 0 },
            outbox,
            solved: 0,
            correct: 0,
        }
    }

    /// Every pin the lock will ask for: guessing rounds first, then predictions.
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn coefs(&self) -> &[F5039] {
        &self.coefs
    }

    /// Rounds cracked so far.
    pub fn solved(&self) -> usize {
        self.solved
    }

    /// Predictions answered correctly so far.
    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn finished(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Pop the next queued reply.
    pub fn next_reply(&mut self) -> Option<Vec<u8>> {
        self.outbox.pop_front()
    }

    fn respond(&mut self, line: &[u8]) -> Vec<u8> {
        match self.phase {
            Phase::Guessing { round } => {
                let secret = self.pins[round];
                if line == secret.to_ascii() {
                    self.solved += 1;
                    self.phase = if round + 1 == self.rounds {
                        self.first_prediction()
                    } else {
                        Phase::Guessing { round: round + 1 }
                    };
                    return b"Correct! Next lock.".to_vec();
                }
                match parse_digits(line) {
                    Some(guess) => encode_hint(score(secret.as_slice(), &guess)),
                    None => b"Invalid input: digits only".to_vec(),
                }
            }
            Phase::Predicting { step } => {
                let secret = self.pins[self.rounds + step];
                let ok = line == secret.to_ascii();
                if ok {
                    self.correct += 1;
                }
                self.phase = if self.rounds + step + 1 == self.pins.len() {
                    Phase::Done
                } else {
                    Phase::Predicting { step: step + 1 }
                };
                match (ok, self.finished()) {
                    (true, true) if self.correct + self.rounds == self.pins.len() => {
                        format!("Correct! {SIM_FLAG}").into_bytes()
                    }
                    (true, _) => b"Correct!".to_vec(),
                    (false, _) => format!("Wrong! it was {secret}").into_bytes(),
                }
            }
            Phase::Done => b"Lock closed.".to_vec(),
        }
    }

    fn first_prediction(&self) -> Phase {
        if self.pins.len() > self.rounds {
            Phase::Predicting { step: 0 }
        } else {
            Phase::Done
        }
    }
}

fn parse_digits(line: &[u8]) -> Option<Vec<u8>> {
    if line.is_empty() {
        return None;
    }
    line.iter()
        .map(|&b| b.is_ascii_digit().then(|| b - b'0'))
        .collect()
}

impl LineTransport for SimulatedLock {
    fn write_line(&mut self, line: &[u8]) -> Result<(), WireError> {
        let reply = self.respond(line);
        self.outbox.push_back(reply);
        Ok(())
    }

    fn read_line(&mut self) -> Result<Vec<u8>, WireError> {
        self.next_reply().ok_or(WireError::UnexpectedEof)
    }
}

/// Serve one TCP client with `lock`, returning it once the session ends
/// (all pins asked, or the client hung up).
pub fn serve_tcp(listener: &TcpListener, mut lock: SimulatedLock) -> Result<SimulatedLock, WireError> {
    let (stream, _) = listener.accept()?;
    let mut t = TcpTransport::from_stream(stream)?;
    loop {
        while let Some(reply) = lock.next_reply() {
            t.write_line(&reply)?;
        }
        if lock.finished() {
            break;
        }
        let line = match t.read_line() {
            Ok(line) => line,
            Err(WireError::UnexpectedEof) => break,
            Err(e) => return Err(e),
        };
        lock.write_line(&line)?;
    }
    Ok(lock)
}
