//! Session driver.
//!
//! Strictly sequential: one line out, one line in. Any transport, protocol,
//! round or recovery failure aborts the whole session; nothing is retried.

use thiserror::Error;

use lp_core::config::SessionConfig;
use lp_core::{all_pins, Pin};
use lp_lfsr::{Lfsr, SolveError, F5039, MODULUS};
use lp_logging::{
    now_ms, NdjsonError, NdjsonWriter, PredictionEventV1, RecoveryEventV1, RoundEventV1,
    RunManifestV1,
};
use lp_oracle::{Round, RoundError};
use lp_wire::codec::{
    decode_guess_reply, decode_probe_reply, encode_pin, encode_probe, is_correct,
};
use lp_wire::{GuessReply, LineTransport, ProtocolError, WireError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("wire error: {0}")]
    Wire(#[from] WireError),
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("round error: {0}")]
    Round(#[from] RoundError),
    #[error("recovery failed: {0}")]
    Solve(#[from] SolveError),
    #[error("event log error: {0}")]
    Log(#[from] NdjsonError),
    #[error("round {round_idx} not solved after {guesses} guesses")]
    TooManyGuesses { round_idx: u32, guesses: u32 },
    #[error("pin index {index} is outside the global numbering")]
    PinNotInTable { index: usize },
    #[error("invalid session options: {msg}")]
    Options { msg: &'static str },
}

/// Session shape (see `SessionConfig`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub rounds: u32,
    pub predictions: u32,
    pub order: u32,
    pub banner_lines: u32,
    pub max_guesses_per_round: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for SessionOptions {
    fn from(c: &SessionConfig) -> Self {
        Self {
            rounds: c.rounds,
            predictions: c.predictions,
            order: c.order,
            banner_lines: c.banner_lines,
            max_guesses_per_round: c.max_guesses_per_round,
        }
    }
}

impl SessionOptions {
    fn validate(&self) -> Result<(), SessionError> {
        if self.order == 0 {
            return Err(SessionError::Options {
                msg: "order must be positive",
            });
        }
        if self.rounds < 2 * self.order {
            return Err(SessionError::Options {
                msg: "rounds must be at least 2 * order",
            });
        }
        if self.max_guesses_per_round == 0 {
            return Err(SessionError::Options {
                msg: "max_guesses_per_round must be positive",
            });
        }
        Ok(())
    }
}

/// One solved round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    pub pin: Pin,
    /// Position in the global numbering.
    pub index: usize,
    /// Candidates after the probe reply.
    pub seeded: usize,
    /// Guesses after the probe, the accepted one included.
    pub guesses: u32,
    /// Expected guesses at the start of the round.
    pub expected_cost: f64,
}

#[derive(Debug, Clone)]
pub struct SessionReport {
    pub banner: Vec<String>,
    pub rounds: Vec<RoundOutcome>,
    pub coefs: Vec<F5039>,
    pub predictions_sent: u32,
    pub predictions_correct: u32,
    pub last_reply: Option<String>,
}

impl SessionReport {
    pub fn guesses_total(&self) -> u64 {
        self.rounds.iter().map(|r| r.guesses as u64).sum()
    }

    /// Fill the counters of a run manifest from this report.
    pub fn fill_manifest(&self, m: &mut RunManifestV1) {
        m.finished_ts_ms = Some(now_ms());
        m.rounds_solved = self.rounds.len() as u32;
        m.guesses_total = self.guesses_total();
        m.predictions_sent = self.predictions_sent;
        m.predictions_correct = self.predictions_correct;
        m.modulus = MODULUS;
        m.coefs = Some(self.coefs.iter().map(|c| c.value()).collect());
    }
}

pub struct Session {
    opts: SessionOptions,
    run_id: String,
    events: Option<NdjsonWriter>,
}

impl Session {
    pub fn new(opts: SessionOptions) -> Self {
        Self {
            opts,
            run_id: format!("run-{}", now_ms()),
            events: None,
        }
    }

    /// Attach an NDJSON event sink.
    pub fn with_events(mut self, writer: NdjsonWriter) -> Self {
        self.events = Some(writer);
        self
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn options(&self) -> &SessionOptions {
        &self.opts
    }

    /// Banner, all rounds, recovery, predictions.
    pub fn run<T: LineTransport>(&mut self, t: &mut T) -> Result<SessionReport, SessionError> {
        self.opts.validate()?;

        let mut banner = Vec::with_capacity(self.opts.banner_lines as usize);
        for _ in 0..self.opts.banner_lines {
            banner.push(String::from_utf8_lossy(&t.read_line()?).into_owned());
        }

        let mut rounds = Vec::with_capacity(self.opts.rounds as usize);
        for round_idx in 0..self.opts.rounds {
            rounds.push(self.solve_round(t, round_idx)?);
        }

        let lfsr = self.recover(&rounds)?;
        let coefs = lfsr.coefs().to_vec();

        let (predictions_sent, predictions_correct, last_reply) = self.predict(t, lfsr)?;

        if let Some(w) = self.events.as_mut() {
            w.flush()?;
        }

        Ok(SessionReport {
            banner,
            rounds,
            coefs,
            predictions_sent,
            predictions_correct,
            last_reply,
        })
    }

    /// Probe, then guess until the lock answers `Correct`.
    pub fn solve_round<T: LineTransport>(
        &mut self,
        t: &mut T,
        round_idx: u32,
    ) -> Result<RoundOutcome, SessionError> {
        t.write_line(&encode_probe())?;
        let hint = decode_probe_reply(&t.read_line()?)?;
        let mut round = Round::seed(hint.exact, hint.encoded)?;
        let seeded = round.candidates().len();

        let mut expected_cost = 0.0;
        let mut guesses = 0u32;
        let pin = loop {
            if guesses >= self.opts.max_guesses_per_round {
                return Err(SessionError::TooManyGuesses { round_idx, guesses });
            }
            let best = round.best();
            let guess = best.guess.ok_or(RoundError::Exhausted)?;
            if guesses == 0 {
                expected_cost = best.expected_cost;
            }
            guesses += 1;

            t.write_line(&encode_pin(&guess))?;
            match decode_guess_reply(&t.read_line()?)? {
                GuessReply::Correct(_) => {
                    round.accept(guess);
                    break round.answer()?;
                }
                GuessReply::Hint(fb) => round.observe(&guess, fb)?,
            }
        };

        let index = all_pins()
            .index_of(&pin)
            .ok_or(SessionError::PinNotInTable {
                index: pin.value() as usize,
            })?;

        if let Some(w) = self.events.as_mut() {
            w.write_event(&RoundEventV1 {
                event: "round",
                ts_ms: now_ms(),
                run_id: self.run_id.clone(),
                round_idx,
                seeded: seeded as u32,
                guesses,
                expected_cost,
                pin: pin.to_string(),
                index: index as u32,
            })?;
        }

        Ok(RoundOutcome {
            pin,
            index,
            seeded,
            guesses,
            expected_cost,
        })
    }

    /// Recover the recurrence from the solved pins' indices (mod 5039).
    pub fn recover(&mut self, rounds: &[RoundOutcome]) -> Result<Lfsr<MODULUS>, SessionError> {
        let terms: Vec<F5039> = rounds
            .iter()
            .map(|r| F5039::from(r.index as u32))
            .collect();
        let lfsr = Lfsr::recover(&terms, self.opts.order as usize)?;

        if let Some(w) = self.events.as_mut() {
            w.write_event(&RecoveryEventV1 {
                event: "recovery",
                ts_ms: now_ms(),
                run_id: self.run_id.clone(),
                order: self.opts.order,
                modulus: MODULUS,
                terms: terms.iter().map(|t| t.value()).collect(),
                coefs: lfsr.coefs().iter().map(|c| c.value()).collect(),
            })?;
        }
        Ok(lfsr)
    }

    /// Send `predictions` predicted pins; returns (sent, correct, last reply).
    pub fn predict<T: LineTransport>(
        &mut self,
        t: &mut T,
        mut lfsr: Lfsr<MODULUS>,
    ) -> Result<(u32, u32, Option<String>), SessionError> {
        let mut correct = 0u32;
        let mut last_reply = None;
        for step in 0..self.opts.predictions {
            let index = lfsr.step().value() as usize;
            let pin = all_pins()
                .pin(index)
                .ok_or(SessionError::PinNotInTable { index })?;

            t.write_line(&encode_pin(&pin))?;
            let reply = t.read_line()?;
            let ok = is_correct(&reply);
            if ok {
                correct += 1;
            }
            let reply = String::from_utf8_lossy(&reply).into_owned();

            if let Some(w) = self.events.as_mut() {
                w.write_event(&PredictionEventV1 {
                    event: "prediction",
                    ts_ms: now_ms(),
                    run_id: self.run_id.clone(),
                    step,
                    pin: pin.to_string(),
                    index: index as u32,
                    correct: ok,
                    reply: reply.clone(),
                })?;
            }
            last_reply = Some(reply);
        }
        Ok((self.opts.predictions, correct, last_reply))
    }
}
