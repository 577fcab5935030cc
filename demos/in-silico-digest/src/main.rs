//! Digest protein sequences and calculate the sequence coverage of peptides
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use context_error::{BasicKind, BoxedError};
use indexmap as _;
use itertools::Itertools;
use mzdigest::{
    DEFAULT_MAX_LENGTH, DEFAULT_MIN_LENGTH, Enzyme, Residues, Strictness,
    checked_digest_collection, compute_coverage, covered_positions, fragment_peptide,
};

/// The command line interface arguments
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Digest proteins and only keep the peptides within the length range
    Digest {
        /// The enzyme to digest with, see the `enzymes` command for all options
        #[arg(short, long, value_parser = parse_enzyme)]
        enzyme: Enzyme,
        /// The minimal peptide length (inclusive)
        #[arg(long, default_value_t = DEFAULT_MIN_LENGTH)]
        min_length: usize,
        /// The maximal peptide length (inclusive)
        #[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
        max_length: usize,
        /// Fail instead of correcting swapped length bounds and skipping empty sequences
        #[arg(long)]
        strict: bool,
        /// Output the result as JSON
        #[arg(long)]
        json: bool,
        /// The proteins, given as `ID=SEQUENCE`
        #[arg(required = true, value_parser = parse_protein)]
        proteins: Vec<(String, String)>,
    },
    /// Calculate the percentage of the sequence that is covered by the given peptides
    Coverage {
        /// The full protein sequence
        #[arg(short, long)]
        sequence: String,
        /// The peptides
        peptides: Vec<String>,
    },
    /// List the b and y ion fragments of a peptide
    Fragment {
        /// The peptide sequence
        peptide: String,
    },
    /// List all known enzymes
    Enzymes,
}

fn parse_enzyme(value: &str) -> Result<Enzyme, String> {
    value
        .parse()
        .map_err(|error: BoxedError<'static, BasicKind>| error.to_string())
}

fn parse_protein(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .map(|(id, sequence)| (id.trim().to_string(), sequence.trim().to_string()))
        .filter(|(id, _)| !id.is_empty())
        .ok_or_else(|| format!("Invalid protein '{value}', use the format `ID=SEQUENCE`"))
}

fn describe(residues: Option<Residues>) -> String {
    match residues {
        None => "*".to_string(),
        Some(Residues::AnyOf(set)) => format!("[{}]", set.iter().join("")),
        Some(Residues::NoneOf(set)) => format!("[^{}]", set.iter().join("")),
    }
}

fn main() -> ExitCode {
    let args = Cli::parse();
    match args.command {
        Command::Digest {
            enzyme,
            min_length,
            max_length,
            strict,
            json,
            proteins,
        } => {
            let strictness = if strict {
                Strictness::Strict
            } else {
                Strictness::Lenient
            };
            match checked_digest_collection(proteins, enzyme, min_length, max_length, strictness) {
                Ok((digested, warnings)) => {
                    for warning in warnings {
                        eprintln!("{warning}");
                    }
                    if json {
                        match serde_json::to_string_pretty(&digested) {
                            Ok(text) => println!("{text}"),
                            Err(error) => {
                                eprintln!("Could not serialise the digestion result: {error}");
                                return ExitCode::FAILURE;
                            }
                        }
                    } else {
                        for (id, result) in &digested {
                            println!("{id}\t{result}");
                            for peptide in result.peptides() {
                                println!("\t{peptide}");
                            }
                        }
                    }
                    ExitCode::SUCCESS
                }
                Err(errors) => {
                    for error in errors {
                        eprintln!("{error}");
                    }
                    ExitCode::FAILURE
                }
            }
        }
        Command::Coverage { sequence, peptides } => {
            let coverage = compute_coverage(&sequence, &peptides);
            let mask = covered_positions(&sequence, &peptides)
                .into_iter()
                .map(|covered| if covered { '#' } else { '.' })
                .collect::<String>();
            println!("{sequence}\n{mask}\nCoverage: {coverage:.2}%");
            ExitCode::SUCCESS
        }
        Command::Fragment { peptide } => {
            let fragments = fragment_peptide(&peptide);
            let (b_ions, y_ions) = fragments.split_at(fragments.len() / 2);
            for (index, (b, y)) in b_ions.iter().zip(y_ions).enumerate() {
                println!("b{}\t{b}\ty{}\t{y}", index + 1, y_ions.len() - index);
            }
            ExitCode::SUCCESS
        }
        Command::Enzymes => {
            for enzyme in Enzyme::ALL {
                let rule = enzyme.rule();
                println!(
                    "{enzyme}\t{} | {}",
                    describe(rule.before),
                    describe(rule.after)
                );
            }
            ExitCode::SUCCESS
        }
    }
}
