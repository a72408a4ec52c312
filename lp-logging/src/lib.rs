//! lp-logging: NDJSON session events + run manifest.
//!
//! Append-only NDJSON logs for post-mortems of a session: one object per
//! solved round, one for the recurrence recovery, one per prediction.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run manifest schema version.
pub const RUN_MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifestV1 {
    pub run_manifest_version: u32,

    pub run_id: String,
    pub created_ts_ms: u64,
    pub finished_ts_ms: Option<u64>,

    pub remote: String,
    pub config_hash: Option<String>,

    // Counters.
    pub rounds_solved: u32,
    pub guesses_total: u64,
    pub predictions_sent: u32,
    pub predictions_correct: u32,

    // Recovered recurrence (field element values).
    pub modulus: u32,
    pub coefs: Option<Vec<u32>>,
}

impl RunManifestV1 {
    pub fn new(run_id: impl Into<String>, remote: impl Into<String>, modulus: u32) -> Self {
        Self {
            run_manifest_version: RUN_MANIFEST_VERSION,
            run_id: run_id.into(),
            created_ts_ms: now_ms(),
            finished_ts_ms: None,
            remote: remote.into(),
            config_hash: None,
            rounds_solved: 0,
            guesses_total: 0,
            predictions_sent: 0,
            predictions_correct: 0,
            modulus,
            coefs: None,
        }
    }
}

pub fn now_ms() -> u64 {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    d.as_millis() as u64
}

pub fn hash_config_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

pub fn read_manifest(path: impl AsRef<Path>) -> Result<RunManifestV1, NdjsonError> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice::<RunManifestV1>(&bytes)?)
}

pub fn write_manifest_atomic(path: impl AsRef<Path>, m: &RunManifestV1) -> Result<(), NdjsonError> {
    let path = path.as_ref();
    let tmp = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(m)?;
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// One solved guessing round.
#[derive(Debug, Clone, Serialize)]
pub struct RoundEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub run_id: String,

    pub round_idx: u32,
    /// Candidates left after the probe reply.
    pub seeded: u32,
    /// Guesses sent after the probe, the accepted one included.
    pub guesses: u32,
    pub expected_cost: f64,
    pub pin: String,
    pub index: u32,
}

/// Recurrence recovered from the solved pins.
#[derive(Debug, Clone, Serialize)]
pub struct RecoveryEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub run_id: String,

    pub order: u32,
    pub modulus: u32,
    pub terms: Vec<u32>,
    pub coefs: Vec<u32>,
}

/// One predicted pin and the lock's verdict.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub run_id: String,

    pub step: u32,
    pub pin: String,
    pub index: u32,
    pub correct: bool,
    pub reply: String,
}

#[derive(Debug, Error)]
pub enum NdjsonError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Append-only NDJSON writer.
///
/// Contract: each call writes exactly one JSON object followed by a newline.
pub struct NdjsonWriter {
    w: BufWriter<File>,
    lines_since_flush: u64,
    flush_every_lines: u64,
}

impl NdjsonWriter {
    /// Open a file for append. Creates it if it doesn't exist.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, NdjsonError> {
        Self::open_append_with_flush(path, 0)
    }

    /// `flush_every_lines=0` disables periodic flushing.
    pub fn open_append_with_flush(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
    ) -> Result<Self, NdjsonError> {
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            w: BufWriter::new(f),
            lines_since_flush: 0,
            flush_every_lines,
        })
    }

    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), NdjsonError> {
        let mut buf = serde_json::to_vec(event)?;
        buf.push(b'\n');
        self.w.write_all(&buf)?;
        self.lines_since_flush += 1;
        if self.flush_every_lines > 0 && self.lines_since_flush >= self.flush_every_lines {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), NdjsonError> {
        self.w.flush()?;
        self.lines_since_flush = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use serde_json::Value;

    fn read_ndjson_lenient(path: &Path) -> Vec<Value> {
        let s = fs::read_to_string(path).expect("read");
        let mut out = Vec::new();
        for line in s.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(v) = serde_json::from_str::<Value>(line) {
                out.push(v);
            }
        }
        out
    }

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn writes_one_valid_json_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");
        let mut w = NdjsonWriter::open_append(&path).unwrap();

        w.write_event(&RoundEventV1 {
            event: "round",
            ts_ms: now_ms(),
            run_id: "r".to_string(),
            round_idx: 0,
            seeded: 8,
            guesses: 3,
            expected_cost: 2.25,
            pin: "1320".to_string(),
            index: 260,
        })
        .unwrap();
        w.write_event(&PredictionEventV1 {
            event: "prediction",
            ts_ms: now_ms(),
            run_id: "r".to_string(),
            step: 0,
            pin: "0123".to_string(),
            index: 0,
            correct: true,
            reply: "Correct!".to_string(),
        })
        .unwrap();
        w.flush().unwrap();

        let vals = read_ndjson_lenient(&path);
        assert_eq!(vals.len(), 2);
        assert_eq!(vals[0]["event"], "round");
        assert_eq!(vals[0]["guesses"], 3);
        assert_eq!(vals[1]["event"], "prediction");
        assert_eq!(vals[1]["correct"], true);
    }

    #[test]
    fn periodic_flush_makes_lines_visible() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");
        let mut w = NdjsonWriter::open_append_with_flush(&path, 1).unwrap();
        w.write_event(&RecoveryEventV1 {
            event: "recovery",
            ts_ms: now_ms(),
            run_id: "r".to_string(),
            order: 2,
            modulus: 5039,
            terms: vec![1, 1, 2, 3],
            coefs: vec![1, 1],
        })
        .unwrap();

        // No explicit flush: flush_every_lines=1 already pushed it to disk.
        let vals = read_ndjson_lenient(&path);
        assert_eq!(vals.len(), 1);
        assert_eq!(vals[0]["coefs"], serde_json::json!([1, 1]));
    }

    #[test]
    fn lenient_reader_tolerates_trailing_partial_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");

        {
            let mut w = NdjsonWriter::open_append(&path).unwrap();
            #[derive(Serialize)]
            struct E {
                event: &'static str,
                x: u32,
            }
            w.write_event(&E { event: "e", x: 1 }).unwrap();
            w.flush().unwrap();
        }

        // Simulate crash: append a partial JSON line (no newline, invalid JSON).
        let mut f = OpenOptions::new().append(true).open(&path).unwrap();
        f.write_all(br#"{"event":"e","x":"#).unwrap();
        f.flush().unwrap();

        let vals = read_ndjson_lenient(&path);
        assert_eq!(vals.len(), 1);
        assert_eq!(vals[0]["x"], 1);
    }

    #[test]
    fn manifest_write_is_atomic_wrt_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        let run_json = dir.path().join("run.json");

        let mut m = RunManifestV1::new("r", "127.0.0.1:7777", 5039);
        m.config_hash = Some(hash_config_bytes(b"session: {}"));
        write_manifest_atomic(&run_json, &m).unwrap();

        // Simulate crash leaving a corrupt tmp file around; run.json must remain readable.
        let tmp = run_json.with_extension("json.tmp");
        fs::write(&tmp, b"{not valid json").unwrap();

        let got = read_manifest(&run_json).unwrap();
        assert_eq!(got.run_id, "r");
        assert_eq!(got.config_hash.as_deref().map(str::len), Some(64));

        m.rounds_solved = 20;
        m.coefs = Some(vec![1, 2, 3]);
        write_manifest_atomic(&run_json, &m).unwrap();
        let got2 = read_manifest(&run_json).unwrap();
        assert_eq!(got2.rounds_solved, 20);
        assert_eq!(got2.coefs, Some(vec![1, 2, 3]));
    }

    #[test]
    fn config_hash_is_stable() {
        assert_eq!(hash_config_bytes(b"abc"), hash_config_bytes(b"abc"));
        assert_ne!(hash_config_bytes(b"abc"), hash_config_bytes(b"abd"));
    }
}
