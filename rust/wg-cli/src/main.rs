//! wiega: CLI scorekeeper for the weighing game.
//!
//! Subcommands:
//! - play
//! - range
//! - config show / config validate

mod play;

use std::env;
use std::io;
use std::path::PathBuf;
use std::process;

use wg_core::{decide_target, Config, TargetDecision};

fn print_help() {
    eprintln!(
        r#"wiega - scorekeeper for the weighing game

USAGE:
    wiega <COMMAND> [OPTIONS]

COMMANDS:
    play                Run an interactive session on stdin/stdout
    range W...          Show the legal band for the next target
    config show         Print the effective configuration as YAML
    config validate     Check a configuration file

OPTIONS:
    -h, --help          Print this help message
    -V, --version       Print version

Set WG_DEBUG_LOG=1 for JSON debug lines on stderr.
"#
    );
}

fn print_version() {
    println!("wiega {}", env!("CARGO_PKG_VERSION"));
}

/// Load `--config` if given, otherwise the built-in defaults. Also returns the
/// raw file bytes for hashing.
fn load_config(path: Option<&str>) -> (Config, Option<Vec<u8>>) {
    let Some(path) = path else {
        return (Config::default(), None);
    };
    let bytes = std::fs::read(path).unwrap_or_else(|e| {
        eprintln!("Failed to read config file: {e}");
        process::exit(1);
    });
    let text = String::from_utf8_lossy(&bytes);
    let cfg = Config::from_yaml(&text).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}");
        process::exit(1);
    });
    if let Err(e) = cfg.validate() {
        eprintln!("{e}");
        process::exit(1);
    }
    (cfg, Some(bytes))
}

fn take_value(args: &[String], i: usize, flag: &str) -> String {
    args.get(i + 1).cloned().unwrap_or_else(|| {
        eprintln!("Missing value for {flag}");
        process::exit(1);
    })
}

fn cmd_play(args: &[String]) {
    let mut config_path: Option<String> = None;
    let mut log_path: Option<String> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"wiega play

USAGE:
    wiega play [--config cfg.yaml] [--log events.ndjson]

OPTIONS:
    --config PATH   YAML config (default: built-in standard rules)
    --log PATH      Append session events as NDJSON to PATH
"#
                );
                return;
            }
            "--config" => {
                config_path = Some(take_value(args, i, "--config"));
                i += 2;
            }
            "--log" => {
                log_path = Some(take_value(args, i, "--log"));
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `wiega play`: {}", other);
                eprintln!("Run `wiega play --help` for usage.");
                process::exit(1);
            }
        }
    }

    let (cfg, config_bytes) = load_config(config_path.as_deref());

    let log = log_path.map(|p| {
        let writer = wg_logging::NdjsonWriter::open_append(PathBuf::from(&p)).unwrap_or_else(|e| {
            eprintln!("Failed to open event log {p}: {e}");
            process::exit(1);
        });
        play::EventLog {
            writer,
            session_id: wg_logging::new_session_id(),
            config_hash: config_bytes
                .as_deref()
                .map(wg_logging::hash_config_bytes),
        }
    });

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = play::run_play(cfg, stdin.lock(), stdout.lock(), log) {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn cmd_range(args: &[String]) {
    let mut config_path: Option<String> = None;
    let mut weights: Vec<i32> = Vec::new();

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"wiega range

USAGE:
    wiega range [--config cfg.yaml] W1 W2 ...

Prints the band the next target must fall into, given the active players'
current weights in grams, or the fixed target once weights have diverged.
"#
                );
                return;
            }
            "--config" => {
                config_path = Some(take_value(args, i, "--config"));
                i += 2;
            }
            w => {
                let v: i32 = w.trim_end_matches('g').parse().unwrap_or_else(|_| {
                    eprintln!("Invalid weight: {w}");
                    process::exit(1);
                });
                if v <= 0 {
                    eprintln!("Invalid weight: {w} (must be > 0)");
                    process::exit(1);
                }
                weights.push(v);
                i += 1;
            }
        }
    }

    if weights.is_empty() {
        eprintln!("Usage: wiega range W1 W2 ...");
        process::exit(1);
    }

    let (cfg, _) = load_config(config_path.as_deref());
    match decide_target(&weights, &cfg.range) {
        TargetDecision::Free { range } => {
            println!("Target range: {}g - {}g", range.min, range.max);
        }
        TargetDecision::AutoAssigned { target, spread } => {
            println!("Auto target: {target}g (spread {spread}g)");
        }
    }
}

fn cmd_config(args: &[String]) {
    let Some(sub) = args.first() else {
        eprintln!("Usage: wiega config <show|validate> [--config PATH]");
        process::exit(1);
    };
    let mut config_path: Option<String> = None;
    let mut i = 1usize;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                config_path = Some(take_value(args, i, "--config"));
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `wiega config`: {other}");
                process::exit(1);
            }
        }
    }

    match sub.as_str() {
        "show" => {
            let (cfg, _) = load_config(config_path.as_deref());
            match cfg.to_yaml() {
                Ok(s) => print!("{s}"),
                Err(e) => {
                    eprintln!("{e}");
                    process::exit(1);
                }
            }
        }
        "validate" => {
            // load_config exits non-zero on any problem.
            let _ = load_config(config_path.as_deref());
            println!("ok");
        }
        other => {
            eprintln!("Unknown config subcommand: {other}");
            process::exit(1);
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        process::exit(0);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => {
            print_help();
        }
        "-V" | "--version" => {
            print_version();
        }
        "play" => {
            cmd_play(&args[2..]);
        }
        "range" => {
            cmd_range(&args[2..]);
        }
        "config" => {
            cmd_config(&args[2..]);
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Run `wiega --help` for usage.");
            process::exit(1);
        }
    }
}
