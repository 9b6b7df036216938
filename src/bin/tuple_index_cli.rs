//! Command-line entry point: a plain `env::args()` dispatcher selecting engine, mode,
//! and configuration flags. No argument-parsing crate, matching the teacher's
//! dependency-light `btree_cli` binary.
//!
//! Usage:
//!   tuple_index_cli <bpt|lht> --num-fields N (--page-size N | --total-bytes N) <csv PATH|interactive>

use std::env;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use tuple_index_engines::config::{BptConfig, LhtConfig};
use tuple_index_engines::driver::{run_csv, run_interactive, Engine};

struct Args {
    engine: String,
    num_fields: usize,
    budget: usize,
    mode: Mode,
}

enum Mode {
    Csv(PathBuf),
    Interactive,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let engine = args.next().ok_or("missing engine: expected 'bpt' or 'lht'")?;
    if engine != "bpt" && engine != "lht" {
        return Err(format!("unknown engine: {engine}"));
    }

    let mut num_fields = None;
    let mut budget = None;
    let mut mode = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--num-fields" => {
                let v = args.next().ok_or("--num-fields requires a value")?;
                num_fields = Some(v.parse::<usize>().map_err(|e| e.to_string())?);
            }
            "--page-size" | "--total-bytes" => {
                let v = args.next().ok_or(format!("{arg} requires a value"))?;
                budget = Some(v.parse::<usize>().map_err(|e| e.to_string())?);
            }
            "csv" => {
                let path = args.next().ok_or("csv mode requires a file path")?;
                mode = Some(Mode::Csv(PathBuf::from(path)));
            }
            "interactive" => mode = Some(Mode::Interactive),
            other => return Err(format!("unrecognized argument: {other}")),
        }
    }

    Ok(Args {
        engine,
        num_fields: num_fields.ok_or("missing --num-fields")?,
        budget: budget.ok_or("missing --page-size/--total-bytes")?,
        mode: mode.ok_or("missing mode: expected 'csv <path>' or 'interactive'")?,
    })
}

fn run() -> Result<(), String> {
    let args = parse_args(env::args().skip(1)).map_err(|e| format!("usage error: {e}"))?;

    let mut engine = match args.engine.as_str() {
        "bpt" => {
            let config = BptConfig::new(args.num_fields, args.budget);
            let (engine, warning) = Engine::new_bpt(&config);
            if let Some(warning) = warning {
                eprintln!("warning: {warning:?}");
            }
            engine
        }
        "lht" => Engine::new_lht(&LhtConfig::new(args.num_fields, args.budget)),
        _ => unreachable!("validated in parse_args"),
    };

    match args.mode {
        Mode::Csv(path) => {
            run_csv(&mut engine, &path).map_err(|e| e.to_string())?;
        }
        Mode::Interactive => {
            let stdin = io::stdin();
            let mut reader = BufReader::new(stdin.lock());
            run_interactive(&mut engine, &mut reader).map_err(|e| e.to_string())?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_csv_mode() {
        let args = parse_args(
            vec!["bpt", "--num-fields", "3", "--page-size", "64", "csv", "ops.csv"]
                .into_iter()
                .map(String::from),
        )
        .unwrap();
        assert_eq!(args.engine, "bpt");
        assert_eq!(args.num_fields, 3);
        assert_eq!(args.budget, 64);
        assert!(matches!(args.mode, Mode::Csv(p) if p == PathBuf::from("ops.csv")));
    }

    #[test]
    fn parses_interactive_mode() {
        let args = parse_args(
            vec!["lht", "--num-fields", "2", "--total-bytes", "40", "interactive"]
                .into_iter()
                .map(String::from),
        )
        .unwrap();
        assert!(matches!(args.mode, Mode::Interactive));
    }

    #[test]
    fn rejects_unknown_engine() {
        let err = parse_args(vec!["xyz".to_string()].into_iter()).unwrap_err();
        assert!(err.contains("unknown engine"));
    }
}
