use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::checker::Checker;
use crate::formula::Formula;

/// The rule a proof line claims to be justified by.
///
/// Claims are verified, never trusted. An `Axiom` claim is checked against
/// the schema table, a `ModusPonens` claim against the accepted set, and a
/// `Premise` claim against the declared premises. A line whose formula
/// happens to be justifiable some other way still fails if its own claim
/// does not hold.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Justification {
    Premise,
    Axiom,
    ModusPonens,
}

impl fmt::Display for Justification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Justification::Premise => write!(f, "Premise"),
            Justification::Axiom => write!(f, "Axiom"),
            Justification::ModusPonens => write!(f, "MP"),
        }
    }
}

/// One line of a proof: a formula plus its claimed justification.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ProofLine {
    pub formula: Formula,
    pub justification: Justification,
}

impl ProofLine {
    pub fn new(formula: Formula, justification: Justification) -> ProofLine {
        ProofLine {
            formula,
            justification,
        }
    }
}

impl fmt::Display for ProofLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.formula, self.justification)
    }
}

/// A complete proof: the declared premises plus an ordered sequence of
/// justified lines.
///
/// The premise set is fixed at construction. The validator seeds it into
/// the accepted set before examining the first line, so premises never
/// need their own lines to be usable by Modus Ponens.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Proof {
    premises: Vec<Formula>,
    lines: Vec<ProofLine>,
}

impl Proof {
    /// Creates a proof. A proof must contain at least one line; an empty
    /// line sequence is malformed input rather than a refutable proof, so
    /// it is reported as a `ProofError` and never reaches validation.
    pub fn new(premises: Vec<Formula>, lines: Vec<ProofLine>) -> Result<Proof, ProofError> {
        if lines.is_empty() {
            return Err(ProofError::Empty);
        }
        Ok(Proof { premises, lines })
    }

    pub fn premises(&self) -> &[Formula] {
        &self.premises
    }

    pub fn lines(&self) -> &[ProofLine] {
        &self.lines
    }
}

/// A structural error in proof data, detected before validation starts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProofError {
    /// The proof contained no lines.
    Empty,
}

impl fmt::Display for ProofError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProofError::Empty => write!(f, "a proof must contain at least one line"),
        }
    }
}

impl Error for ProofError {}

/// Why a proof line was rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    /// A Premise claim named a formula outside the declared premise set.
    NotADeclaredPremise,

    /// An Axiom claim matched none of the axiom schemas.
    NoMatchingAxiomSchema,

    /// A Modus Ponens claim had no justifying pair among the accepted
    /// formulas.
    NoValidModusPonensPair,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let reason = match self {
            FailureReason::NotADeclaredPremise => "not-a-declared-premise",
            FailureReason::NoMatchingAxiomSchema => "no-matching-axiom-schema",
            FailureReason::NoValidModusPonensPair => "no-valid-modus-ponens-pair",
        };
        write!(f, "{}", reason)
    }
}

/// The result of validating one proof. A failed validation is a normal
/// outcome, not an error: the verdict reports the first offending line and
/// why it was rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Valid,
    Failed {
        /// Zero-based index into the proof's line sequence.
        line: usize,
        reason: FailureReason,
    },
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Verdict::Valid => write!(f, "valid"),
            Verdict::Failed { line, reason } => {
                write!(f, "failed at line {}: {}", line, reason)
            }
        }
    }
}

/// Validates a proof line by line, in order, fail-fast.
///
/// Each line's claimed justification is verified against the accepted set
/// built from the premises and all earlier lines. The first line whose
/// claim does not hold stops validation; later lines are never examined.
/// Validation is a pure function of the proof, so repeated calls return
/// the same verdict.
pub fn validate(proof: &Proof) -> Verdict {
    let mut checker = Checker::new(proof.premises());
    for (index, line) in proof.lines().iter().enumerate() {
        let accepted = match line.justification {
            Justification::Premise => checker.is_premise(&line.formula),
            Justification::Axiom => checker.is_axiom(&line.formula),
            Justification::ModusPonens => checker.has_modus_ponens(&line.formula),
        };
        if !accepted {
            let reason = match line.justification {
                Justification::Premise => FailureReason::NotADeclaredPremise,
                Justification::Axiom => FailureReason::NoMatchingAxiomSchema,
                Justification::ModusPonens => FailureReason::NoValidModusPonensPair,
            };
            debug!("line {} rejected: {}", index, reason);
            return Verdict::Failed {
                line: index,
                reason,
            };
        }
        checker.accept(line.formula.clone());
    }
    Verdict::Valid
}
