//! Solves every case in a matching case file and prints the size of each
//! maximum matching, optionally checking them against an answer file.
//!
//! Usage:
//!   cargo run --example matching_cases -- tests/data/matching.in
//!   cargo run --example matching_cases -- tests/data/matching.in --answers tests/data/matching.ans
//!   cat tests/data/matching.in | cargo run --example matching_cases -- -

use std::fs;
use std::io::{self, Read};
use std::process;

use clap::Parser;
use puzzlegraph::{
    matching_input::{parse_answers, parse_cases},
    tracing_support::{dump_span_timings, init_tracing},
};

/// Solve bipartite matching cases and print one matching size per line.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Case file path (use '-' or omit to read from stdin)
    input: Option<String>,

    /// Answer file with one expected matching size per line
    #[arg(long)]
    answers: Option<String>,

    /// Print span timings to stderr when done
    #[arg(long)]
    timings: bool,
}

fn main() {
    let args = Args::parse();
    if args.timings {
        init_tracing();
    }

    let input = match args.input.as_deref() {
        Some("-") | None => read_stdin_or_exit(),
        Some(path) => read_file_or_exit(path),
    };
    let cases = parse_cases(&input).unwrap_or_else(|err| {
        eprintln!("Invalid case file: {err}");
        process::exit(1);
    });
    let expected = args.answers.as_deref().map(|path| {
        parse_answers(&read_file_or_exit(path)).unwrap_or_else(|err| {
            eprintln!("Invalid answer file: {err}");
            process::exit(1);
        })
    });
    if let Some(expected) = &expected {
        if expected.len() != cases.len() {
            eprintln!("{} cases but {} answers", cases.len(), expected.len());
            process::exit(1);
        }
    }

    let mut mismatches = 0;
    for (i, case) in cases.iter().enumerate() {
        let size = case.to_problem().maximum_matching().len();
        match expected.as_ref().map(|answers| answers[i]) {
            Some(answer) if answer != size => {
                println!("{size} (expected {answer})");
                mismatches += 1;
            }
            _ => println!("{size}"),
        }
    }

    if args.timings {
        dump_span_timings();
    }
    if mismatches > 0 {
        eprintln!("{mismatches} of {} cases did not match", cases.len());
        process::exit(1);
    }
}

fn read_stdin_or_exit() -> String {
    let mut buffer = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut buffer) {
        eprintln!("Failed to read stdin: {err}");
        process::exit(1);
    }
    buffer
}

fn read_file_or_exit(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            eprintln!("Failed to read '{path}': {err}");
            process::exit(1);
        }
    }
}
