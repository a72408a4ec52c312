//! lp: CLI binary for the lockpick solver.
//!
//! Subcommands:
//! - solve
//! - sim
//! - serve
//! - best
//! - expected

use std::env;
use std::net::TcpListener;
use std::process;
use std::str::FromStr;

use lp_core::Config;
use lp_lfsr::MODULUS;
use lp_logging::{hash_config_bytes, write_manifest_atomic, NdjsonWriter, RunManifestV1};
use lp_oracle::{best_guess, initial_candidates};
use lp_session::{serve_tcp, Session, SessionOptions, SessionReport, SimulatedLock};
use lp_wire::TcpTransport;

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{msg}");
    process::exit(1);
}

/// Value following `args[i]`, parsed.
fn value_of<T: FromStr>(args: &[String], i: usize) -> T {
    let flag = &args[i];
    let raw = args
        .get(i + 1)
        .unwrap_or_else(|| fail(format!("Missing value for {flag}")));
    raw.parse()
        .unwrap_or_else(|_| fail(format!("Invalid {flag} value: {raw}")))
}

fn open_events(path: &str, flush_every_lines: u64) -> NdjsonWriter {
    NdjsonWriter::open_append_with_flush(path, flush_every_lines)
        .unwrap_or_else(|e| fail(format!("Failed to open events file {path}: {e}")))
}

fn print_report(report: &SessionReport) {
    println!();
    println!("Session:");
    for (i, r) in report.rounds.iter().enumerate() {
        println!(
            "  - round {:>2}: {} (index {:>4}, {} candidates, {} guesses, expected {:.3})",
            i, r.pin, r.index, r.seeded, r.guesses, r.expected_cost
        );
    }
    let coefs: Vec<String> = report.coefs.iter().map(|c| c.to_string()).collect();
    println!("  - coefficients (mod {MODULUS}): [{}]", coefs.join(", "));
    println!(
        "  - predictions: {}/{} correct",
        report.predictions_correct, report.predictions_sent
    );
    if let Some(last) = &report.last_reply {
        println!("  - last reply: {last}");
    }
}

fn write_manifest(path: &str, session: &Session, remote: &str, cfg: &Config, report: &SessionReport) {
    let mut m = RunManifestV1::new(session.run_id(), remote, MODULUS);
    m.config_hash = cfg.to_yaml().ok().map(|y| hash_config_bytes(y.as_bytes()));
    report.fill_manifest(&mut m);
    write_manifest_atomic(path, &m)
        .unwrap_or_else(|e| fail(format!("Failed to write manifest {path}: {e}")));
}

fn cmd_solve(args: &[String]) {
    let mut config_path: Option<String> = None;
    let mut connect: Option<String> = None;
    let mut events: Option<String> = None;
    let mut manifest: Option<String> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"lp solve

USAGE:
    lp solve [--config cfg.yaml] [--connect HOST:PORT] [--events PATH] [--manifest PATH]

OPTIONS:
    --config PATH       YAML config (default: built-in defaults)
    --connect ADDR      Lock address, overrides remote.host/port
    --events PATH       Append NDJSON events here, overrides logging.events_path
    --manifest PATH     Write a JSON run manifest when the session ends
"#
                );
                return;
            }
            "--config" => {
                config_path = Some(value_of(args, i));
                i += 2;
            }
            "--connect" => {
                connect = Some(value_of(args, i));
                i += 2;
            }
            "--events" => {
                events = Some(value_of(args, i));
                i += 2;
            }
            "--manifest" => {
                manifest = Some(value_of(args, i));
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `lp solve`: {}", other);
                eprintln!("Run `lp solve --help` for usage.");
                process::exit(1);
            }
        }
    }

    let cfg = match &config_path {
        Some(p) => Config::load(p).unwrap_or_else(|e| fail(format!("Failed to load config: {e}"))),
        None => Config::default(),
    };
    let remote = connect.unwrap_or_else(|| cfg.remote.addr());
    let events = events.or_else(|| cfg.logging.events_path.clone());

    println!("Connecting to {remote}...");
    let mut t = TcpTransport::connect(remote.as_str())
        .unwrap_or_else(|e| fail(format!("Failed to connect to {remote}: {e}")));

    let mut session = Session::new(SessionOptions::from(&cfg.session));
    if let Some(path) = &events {
        session = session.with_events(open_events(path, cfg.logging.flush_every_lines));
    }
    let report = session
        .run(&mut t)
        .unwrap_or_else(|e| fail(format!("Session failed: {e}")));
    print_report(&report);

    if let Some(path) = &manifest {
        write_manifest(path, &session, &remote, &cfg, &report);
    }
}

fn cmd_sim(args: &[String]) {
    let mut cfg = Config::default();
    let mut seed: u64 = 0;
    let mut events: Option<String> = None;
    let mut manifest: Option<String> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"lp sim

USAGE:
    lp sim [--seed S] [--rounds N] [--predictions N] [--events PATH] [--manifest PATH]

OPTIONS:
    --seed S            Seed of the simulated lock (default: 0)
    --rounds N          Guessing rounds (default: 20)
    --predictions N     Predicted pins (default: 180)
    --events PATH       Append NDJSON events here
    --manifest PATH     Write a JSON run manifest when the session ends
"#
                );
                return;
            }
            "--seed" => {
                seed = value_of(args, i);
                i += 2;
            }
            "--rounds" => {
                cfg.session.rounds = value_of(args, i);
                i += 2;
            }
            "--predictions" => {
                cfg.session.predictions = value_of(args, i);
                i += 2;
            }
            "--events" => {
                events = Some(value_of(args, i));
                i += 2;
            }
            "--manifest" => {
                manifest = Some(value_of(args, i));
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `lp sim`: {}", other);
                eprintln!("Run `lp sim --help` for usage.");
                process::exit(1);
            }
        }
    }

    let s = &cfg.session;
    let mut lock = SimulatedLock::new(seed, s.rounds, s.predictions, s.order)
        .unwrap_or_else(|e| fail(format!("Failed to build simulated lock: {e}")));

    let mut session = Session::new(SessionOptions::from(s));
    if let Some(path) = &events {
        session = session.with_events(open_events(path, cfg.logging.flush_every_lines));
    }
    println!("Running simulated session (seed {seed})...");
    let report = session
        .run(&mut lock)
        .unwrap_or_else(|e| fail(format!("Session failed: {e}")));
    print_report(&report);

    if let Some(path) = &manifest {
        write_manifest(path, &session, "sim", &cfg, &report);
    }
}

fn cmd_serve(args: &[String]) {
    let mut cfg = Config::default();
    let mut listen = cfg.remote.addr();
    let mut seed: u64 = 0;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"lp serve

USAGE:
    lp serve [--listen HOST:PORT] [--seed S] [--rounds N] [--predictions N]

OPTIONS:
    --listen ADDR       Address to listen on (default: 127.0.0.1:7777)
    --seed S            Seed of the simulated lock (default: 0)
    --rounds N          Guessing rounds (default: 20)
    --predictions N     Predicted pins (default: 180)
"#
                );
                return;
            }
            "--listen" => {
                listen = value_of(args, i);
                i += 2;
            }
            "--seed" => {
                seed = value_of(args, i);
                i += 2;
            }
            "--rounds" => {
                cfg.session.rounds = value_of(args, i);
                i += 2;
            }
            "--predictions" => {
                cfg.session.predictions = value_of(args, i);
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `lp serve`: {}", other);
                eprintln!("Run `lp serve --help` for usage.");
                process::exit(1);
            }
        }
    }

    let s = &cfg.session;
    let lock = SimulatedLock::new(seed, s.rounds, s.predictions, s.order)
        .unwrap_or_else(|e| fail(format!("Failed to build simulated lock: {e}")));
    let listener = TcpListener::bind(listen.as_str())
        .unwrap_or_else(|e| fail(format!("Failed to bind {listen}: {e}")));
    println!("Simulated lock listening on {listen} (seed {seed})");

    let lock = serve_tcp(&listener, lock).unwrap_or_else(|e| fail(format!("Serve failed: {e}")));
    println!(
        "Client done: {} rounds solved, {} predictions correct",
        lock.solved(),
        lock.correct()
    );
}

fn cmd_best(args: &[String]) {
    let mut exact: Option<u32> = None;
    let mut hint: Option<u32> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"lp best

USAGE:
    lp best --exact E --hint B

Seed the candidate set from a probe reply "A<E>B<B>" and print it together
with the next guess.

OPTIONS:
    --exact E    Exact count of the probe reply
    --hint B     Packed misplaced value of the probe reply
"#
                );
                return;
            }
            "--exact" => {
                exact = Some(value_of(args, i));
                i += 2;
            }
            "--hint" => {
                hint = Some(value_of(args, i));
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `lp best`: {}", other);
                eprintln!("Run `lp best --help` for usage.");
                process::exit(1);
            }
        }
    }

    let exact = exact.unwrap_or_else(|| fail("Missing --exact"));
    let hint = hint.unwrap_or_else(|| fail("Missing --hint"));

    let candidates =
        initial_candidates(exact, hint).unwrap_or_else(|e| fail(format!("Bad probe reply: {e}")));
    let listed: Vec<String> = candidates.iter().map(|p| p.to_string()).collect();
    println!("Candidates ({}): {}", candidates.len(), listed.join(" "));

    let best = best_guess(&candidates);
    match best.guess {
        Some(g) => println!("Best guess: {} (expected guesses {:.4})", g, best.expected_cost),
        None => println!("Best guess: none"),
    }
}

fn cmd_expected() {
    println!("Playing every pin against the engine...");
    let stats = lp_oracle::expected_guesses()
        .unwrap_or_else(|e| fail(format!("Engine failed: {e}")));

    println!();
    println!("Evaluation:");
    println!("  - Pins: {}", stats.pins);
    println!(
        "  - Guesses after probe: mean={:.4}, max={}",
        stats.mean, stats.max
    );
    println!("  - Time: {:.2}s", stats.elapsed_secs);
    for (n, count) in stats.histogram.iter().enumerate().filter(|(_, c)| **c > 0) {
        println!("  {:>2} | {}", n, count);
    }
}

fn print_help() {
    eprintln!(
        r#"lp - lockpick solver CLI

USAGE:
    lp <COMMAND> [OPTIONS]

COMMANDS:
    solve       Run a full session against a remote lock
    sim         Run a full session against an in-process simulated lock
    serve       Serve a simulated lock over TCP
    best        Print seeded candidates and best guess for a probe reply
    expected    Guess statistics over all 5040 pins

OPTIONS:
    -h, --help          Print this help message
    -V, --version       Print version

Run `lp <COMMAND> --help` for command options.
"#
    );
}

fn print_version() {
    println!("lp {}", env!("CARGO_PKG_VERSION"));
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        process::exit(1);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => {
            print_help();
        }
        "-V" | "--version" => {
            print_version();
        }
        "solve" => {
            cmd_solve(&args[2..]);
        }
        "sim" => {
            cmd_sim(&args[2..]);
        }
        "serve" => {
            cmd_serve(&args[2..]);
        }
        "best" => {
            cmd_best(&args[2..]);
        }
        "expected" => {
            cmd_expected();
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Run `lp --help` for usage.");
            process::exit(1);
        }
    }
}
