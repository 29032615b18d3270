// Proof scripts are plain text files holding one or more named proofs:
//
//   # Lines starting with '#' are comments; blank lines are ignored.
//   --- TEST: modus ponens ---
//   Premises: P, (P -> Q)
//   1. P Premise
//   2. (P -> Q) Premise
//   3. Q MP 1,2
//
// A "--- TEST:" header starts a new proof. An optional "Premises:" line
// declares the premise set and must precede the numbered lines. Each proof
// line is "<n>. <formula> <justification>" where n counts up from 1 and
// the justification is Premise, AX1, AX2, AX3, or MP. The AX tags all
// claim "this is an axiom instance"; the schema table decides which, if
// any, actually applies. MP may carry "i,j" line references, kept as
// annotation only: the checker finds its own justifying pair among the
// earlier lines.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::formula::Formula;
use crate::parser::parse_formula;
use crate::validator::{Justification, Proof, ProofLine};

const TEST_HEADER: &str = "--- TEST:";
const PREMISES_HEADER: &str = "Premises:";

/// An error encountered while loading or parsing a proof script.
#[derive(Debug)]
pub enum ScriptError {
    Io(io::Error),

    /// A line that could not be understood. `line` is 1-based.
    Malformed { line: usize, message: String },

    /// A proof with no proof lines. `line` is where the proof started.
    EmptyProof { line: usize, name: String },
}

impl From<io::Error> for ScriptError {
    fn from(error: io::Error) -> ScriptError {
        ScriptError::Io(error)
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScriptError::Io(error) => write!(f, "{}", error),
            ScriptError::Malformed { line, message } => {
                write!(f, "line {}: {}", line, message)
            }
            ScriptError::EmptyProof { line, name } => {
                write!(f, "line {}: proof \"{}\" has no proof lines", line, name)
            }
        }
    }
}

impl std::error::Error for ScriptError {}

/// One proof as it appeared in a script file.
pub struct ScriptProof {
    pub name: String,
    pub proof: Proof,

    /// For each proof line, the 1-based line in the script file it came
    /// from. Used to point verdicts back at the source.
    pub source_lines: Vec<usize>,
}

/// All proofs from one script file, in file order.
pub struct Script {
    pub proofs: Vec<ScriptProof>,
}

/// Reads and parses a script file.
pub fn load_script(path: &Path) -> Result<Script, ScriptError> {
    let source = fs::read_to_string(path)?;
    parse_script(&source)
}

/// Parses script text into proofs. Content before the first "--- TEST:"
/// header, if any, forms an unnamed proof.
pub fn parse_script(source: &str) -> Result<Script, ScriptError> {
    let mut proofs = Vec::new();
    let mut block: Option<ProofBlock> = None;
    for (index, raw_line) in source.lines().enumerate() {
        let line_number = index + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(rest) = line.strip_prefix(TEST_HEADER) {
            if let Some(finished) = block.take() {
                proofs.push(finished.finish()?);
            }
            let name = parse_header_name(rest).ok_or_else(|| ScriptError::Malformed {
                line: line_number,
                message: "test header is missing a name".to_string(),
            })?;
            block = Some(ProofBlock::new(name, line_number));
            continue;
        }
        let current = block.get_or_insert_with(|| {
            ProofBlock::new("unnamed proof".to_string(), line_number)
        });
        current.push_line(line, line_number)?;
    }
    if let Some(finished) = block.take() {
        proofs.push(finished.finish()?);
    }
    Ok(Script { proofs })
}

fn parse_header_name(rest: &str) -> Option<String> {
    let rest = rest.trim();
    let name = match rest.strip_suffix("---") {
        Some(stripped) => stripped.trim_end(),
        None => rest,
    };
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn malformed(line: usize, message: impl Into<String>) -> ScriptError {
    ScriptError::Malformed {
        line,
        message: message.into(),
    }
}

/// Accumulates one proof's worth of script lines.
struct ProofBlock {
    name: String,
    start_line: usize,
    premises: Vec<Formula>,
    premises_declared: bool,
    lines: Vec<ProofLine>,
    source_lines: Vec<usize>,
}

impl ProofBlock {
    fn new(name: String, start_line: usize) -> ProofBlock {
        ProofBlock {
            name,
            start_line,
            premises: Vec::new(),
            premises_declared: false,
            lines: Vec::new(),
            source_lines: Vec::new(),
        }
    }

    fn push_line(&mut self, line: &str, line_number: usize) -> Result<(), ScriptError> {
        if let Some(rest) = line.strip_prefix(PREMISES_HEADER) {
            if self.premises_declared {
                return Err(malformed(
                    line_number,
                    "premises are already declared for this proof",
                ));
            }
            if !self.lines.is_empty() {
                return Err(malformed(
                    line_number,
                    "premises must be declared before the first proof line",
                ));
            }
            self.premises_declared = true;
            let rest = rest.trim();
            if rest.is_empty() {
                return Ok(());
            }
            for part in rest.split(',') {
                let formula = parse_formula(part)
                    .map_err(|e| malformed(line_number, format!("bad premise formula: {}", e)))?;
                self.premises.push(formula);
            }
            return Ok(());
        }

        let (number, rest) = split_line_number(line).ok_or_else(|| {
            malformed(
                line_number,
                "expected a numbered proof line like \"1. P Premise\"",
            )
        })?;
        let expected = self.lines.len() + 1;
        if number != expected {
            return Err(malformed(
                line_number,
                format!("expected line number {}, found {}", expected, number),
            ));
        }
        let (formula_text, justification) = split_justification(rest).ok_or_else(|| {
            malformed(
                line_number,
                "missing or malformed justification; expected Premise, AX1, AX2, AX3, or MP",
            )
        })?;
        let formula = parse_formula(formula_text)
            .map_err(|e| malformed(line_number, format!("bad formula: {}", e)))?;
        self.lines.push(ProofLine::new(formula, justification));
        self.source_lines.push(line_number);
        Ok(())
    }

    fn finish(self) -> Result<ScriptProof, ScriptError> {
        match Proof::new(self.premises, self.lines) {
            Ok(proof) => Ok(ScriptProof {
                name: self.name,
                proof,
                source_lines: self.source_lines,
            }),
            Err(_) => Err(ScriptError::EmptyProof {
                line: self.start_line,
                name: self.name,
            }),
        }
    }
}

fn split_line_number(line: &str) -> Option<(usize, &str)> {
    let dot = line.find('.')?;
    let number = line[..dot].trim().parse::<usize>().ok()?;
    Some((number, &line[dot + 1..]))
}

/// Splits "<formula> <justification>" from the right, since the formula may
/// itself contain spaces. Returns the formula text and the parsed claim.
fn split_justification(rest: &str) -> Option<(&str, Justification)> {
    let rest = rest.trim_end();
    let (head, last) = rest.rsplit_once(char::is_whitespace)?;
    match last {
        "Premise" => Some((head, Justification::Premise)),
        "AX1" | "AX2" | "AX3" => Some((head, Justification::Axiom)),
        "MP" => Some((head, Justification::ModusPonens)),
        _ => {
            if let Some(refs) = last.strip_prefix("MP") {
                if is_line_refs(refs) {
                    return Some((head, Justification::ModusPonens));
                }
            }
            if is_line_refs(last) {
                let head = head.trim_end();
                if let Some(formula_text) = head.strip_suffix("MP") {
                    return Some((formula_text, Justification::ModusPonens));
                }
            }
            None
        }
    }
}

fn is_line_refs(text: &str) -> bool {
    let Some((first, second)) = text.split_once(',') else {
        return false;
    };
    !first.is_empty()
        && !second.is_empty()
        && first.chars().all(|c| c.is_ascii_digit())
        && second.chars().all(|c| c.is_ascii_digit())
}
