use crate::formula::Formula;
use crate::parser::parse_formula;
use crate::validator::{validate, FailureReason, Justification, Proof, ProofLine, Verdict};

/// Parses a formula, panicking on bad test input.
pub fn formula(text: &str) -> Formula {
    match parse_formula(text) {
        Ok(formula) => formula,
        Err(e) => panic!("bad test formula {:?}: {}", text, e),
    }
}

pub fn premises(texts: &[&str]) -> Vec<Formula> {
    texts.iter().map(|text| formula(text)).collect()
}

pub fn premise_line(text: &str) -> ProofLine {
    ProofLine::new(formula(text), Justification::Premise)
}

pub fn axiom_line(text: &str) -> ProofLine {
    ProofLine::new(formula(text), Justification::Axiom)
}

pub fn mp_line(text: &str) -> ProofLine {
    ProofLine::new(formula(text), Justification::ModusPonens)
}

/// Builds a proof, panicking if construction fails.
pub fn proof(premise_texts: &[&str], lines: Vec<ProofLine>) -> Proof {
    match Proof::new(premises(premise_texts), lines) {
        Ok(proof) => proof,
        Err(e) => panic!("bad test proof: {}", e),
    }
}

pub fn assert_valid(premise_texts: &[&str], lines: Vec<ProofLine>) {
    let verdict = validate(&proof(premise_texts, lines));
    if verdict != Verdict::Valid {
        panic!(
            "We expected validation to return valid, but we got: {}.",
            verdict
        );
    }
}

pub fn assert_fails_at(
    premise_texts: &[&str],
    lines: Vec<ProofLine>,
    line: usize,
    reason: FailureReason,
) {
    let verdict = validate(&proof(premise_texts, lines));
    let expected = Verdict::Failed { line, reason };
    if verdict != expected {
        panic!(
            "We expected validation to return \"{}\", but we got: \"{}\".",
            expected, verdict
        );
    }
}
