// The Ponens CLI.
// You can check proof script files, or search for a derivation of a goal.

use std::path::Path;

use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ponens::parser::parse_formula;
use ponens::schema::standard_axioms;
use ponens::script::{load_script, ScriptProof};
use ponens::searcher::{SearchConfig, SearchOutcome, Searcher};
use ponens::validator::{validate, Justification, Proof, ProofLine, Verdict};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(
    name = "ponens",
    about = "A proof checker for a fixed Hilbert-style propositional system",
    version = env!("CARGO_PKG_VERSION")
)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check every proof in the given script files
    Check {
        /// Proof script files to check
        #[clap(value_name = "FILE", required = true)]
        files: Vec<String>,

        /// Emit one JSON record per proof instead of text
        #[clap(long)]
        json: bool,
    },

    /// Search for a derivation of a goal formula
    Derive {
        /// The goal formula, e.g. "(P -> P)"
        #[clap(value_name = "GOAL")]
        goal: String,

        /// A premise formula; repeat the flag to declare several
        #[clap(long = "premise", value_name = "FORMULA")]
        premises: Vec<String>,

        /// Maximum accepted steps before the search gives up
        #[clap(long, value_name = "N", default_value_t = 64)]
        max_steps: usize,
    },
}

/// One line of JSON output per proof in --json mode.
#[derive(Serialize)]
struct CheckRecord<'a> {
    file: &'a str,
    name: &'a str,
    verdict: &'a Verdict,

    /// The script file line of the failing proof line, when failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    source_line: Option<usize>,
}

fn main() {
    // Use the RUST_LOG env var to control log levels, e.g.:
    //   RUST_LOG=ponens::searcher=debug ponens derive "(P -> P)"
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).without_time())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    let success = match args.command {
        Command::Check { files, json } => run_check(&files, json),
        Command::Derive {
            goal,
            premises,
            max_steps,
        } => run_derive(&goal, &premises, max_steps),
    };

    if !success {
        std::process::exit(1);
    }
}

fn run_check(files: &[String], json: bool) -> bool {
    let mut checked = 0;
    let mut failures = 0;
    let mut success = true;
    for file in files {
        let script = match load_script(Path::new(file)) {
            Ok(script) => script,
            Err(e) => {
                println!("{}: {}", file, e);
                success = false;
                continue;
            }
        };
        for entry in &script.proofs {
            let verdict = validate(&entry.proof);
            checked += 1;
            if !verdict.is_valid() {
                failures += 1;
            }
            if json {
                let record = CheckRecord {
                    file,
                    name: &entry.name,
                    verdict: &verdict,
                    source_line: match &verdict {
                        Verdict::Failed { line, .. } => Some(entry.source_lines[*line]),
                        Verdict::Valid => None,
                    },
                };
                match serde_json::to_string(&record) {
                    Ok(line) => println!("{}", line),
                    Err(e) => {
                        println!("Error serializing verdict: {}", e);
                        success = false;
                    }
                }
            } else {
                print_text_verdict(file, entry, &verdict);
            }
        }
    }
    if !json {
        println!("{} proofs checked, {} failed", checked, failures);
    }
    success && failures == 0
}

fn print_text_verdict(file: &str, entry: &ScriptProof, verdict: &Verdict) {
    match verdict {
        Verdict::Valid => println!("{}: {}: valid", file, entry.name),
        Verdict::Failed { line, reason } => {
            println!(
                "{}: {}: failed at line {}: {} ({}:{})",
                file,
                entry.name,
                line + 1,
                reason,
                file,
                entry.source_lines[*line]
            );
        }
    }
}

fn run_derive(goal_text: &str, premise_texts: &[String], max_steps: usize) -> bool {
    let goal = match parse_formula(goal_text) {
        Ok(formula) => formula,
        Err(e) => {
            println!("Error parsing goal {:?}: {}", goal_text, e);
            return false;
        }
    };
    let mut premises = Vec::new();
    for text in premise_texts {
        match parse_formula(text) {
            Ok(formula) => premises.push(formula),
            Err(e) => {
                println!("Error parsing premise {:?}: {}", text, e);
                return false;
            }
        }
    }

    let config = SearchConfig {
        max_steps,
        ..SearchConfig::default()
    };
    let mut searcher = Searcher::new(premises, config);
    match searcher.derive(&goal) {
        SearchOutcome::Proved(proof) => {
            print_proof(&proof);
            true
        }
        SearchOutcome::Exhausted => {
            println!("No derivation found: the candidate space was exhausted.");
            false
        }
        SearchOutcome::LimitReached => {
            println!("No derivation found within {} steps.", max_steps);
            false
        }
    }
}

fn print_proof(proof: &Proof) {
    if !proof.premises().is_empty() {
        let premises: Vec<String> = proof
            .premises()
            .iter()
            .map(|premise| premise.to_string())
            .collect();
        println!("Premises: {}", premises.join(", "));
    }
    let statements: Vec<String> = proof
        .lines()
        .iter()
        .map(|line| line.formula.to_string())
        .collect();
    let width = statements.iter().map(|s| s.len()).max().unwrap_or(0);
    for (index, line) in proof.lines().iter().enumerate() {
        println!(
            "{}. {:<width$}    {}",
            index + 1,
            statements[index],
            justification_tag(line),
            width = width
        );
    }
}

fn justification_tag(line: &ProofLine) -> String {
    match line.justification {
        Justification::Premise => "Premise".to_string(),
        Justification::ModusPonens => "MP".to_string(),
        Justification::Axiom => match standard_axioms().first_match(&line.formula) {
            Some((axiom, _)) => axiom.name().to_string(),
            None => "AX?".to_string(),
        },
    }
}
