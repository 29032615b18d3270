// Tests for the bounded forward searcher. Every returned proof has been
// re-validated by the searcher itself; these tests validate again anyway
// to pin the contract down.

use super::common::{formula, premises};
use crate::searcher::{SearchConfig, SearchOutcome, Searcher};
use crate::validator::{validate, Justification, Proof, Verdict};

fn derive(premise_texts: &[&str], goal: &str, config: SearchConfig) -> SearchOutcome {
    let mut searcher = Searcher::new(premises(premise_texts), config);
    searcher.derive(&formula(goal))
}

fn expect_proof(premise_texts: &[&str], goal: &str) -> Proof {
    match derive(premise_texts, goal, SearchConfig::default()) {
        SearchOutcome::Proved(proof) => proof,
        outcome => panic!("expected a proof of {}, got: {}", goal, outcome),
    }
}

#[test]
fn test_derive_a_premise() {
    let proof = expect_proof(&["P"], "P");
    assert_eq!(proof.lines().len(), 1);
    assert_eq!(proof.lines()[0].justification, Justification::Premise);
    assert_eq!(validate(&proof), Verdict::Valid);
}

#[test]
fn test_derive_an_axiom_instance() {
    let proof = expect_proof(&[], "(P -> (Q -> P))");
    assert_eq!(proof.lines().len(), 1);
    assert_eq!(proof.lines()[0].justification, Justification::Axiom);
}

#[test]
fn test_derive_by_modus_ponens() {
    let proof = expect_proof(&["P", "(P -> Q)"], "Q");
    assert_eq!(proof.lines().len(), 1);
    assert_eq!(proof.lines()[0].justification, Justification::ModusPonens);
    assert_eq!(validate(&proof), Verdict::Valid);
}

#[test]
fn test_derive_chained_modus_ponens() {
    let proof = expect_proof(&["P", "(P -> Q)", "(Q -> R)"], "R");
    assert_eq!(validate(&proof), Verdict::Valid);
    assert_eq!(proof.lines().len(), 2);
    assert_eq!(proof.lines()[1].formula, formula("R"));
}

#[test]
fn test_derive_self_implication_from_nothing() {
    // The classic derivation: two AX1 instances, one AX2 instance, and
    // two Modus Ponens steps.
    let proof = expect_proof(&[], "(P -> P)");
    assert_eq!(validate(&proof), Verdict::Valid);
    assert_eq!(proof.lines().len(), 5);
    let modus_ponens_count = proof
        .lines()
        .iter()
        .filter(|line| line.justification == Justification::ModusPonens)
        .count();
    assert_eq!(modus_ponens_count, 2);
    assert_eq!(proof.lines()[4].formula, formula("(P -> P)"));
}

#[test]
fn test_unused_premises_stay_out_of_the_lines() {
    let proof = expect_proof(&["P", "(P -> Q)", "(R -> S)"], "Q");
    assert_eq!(proof.lines().len(), 1);
    // The premise declaration itself is preserved in full.
    assert_eq!(proof.premises().len(), 3);
}

#[test]
fn test_exhausted_when_the_goal_is_unreachable() {
    // A bare variable is never an axiom instance, and nothing implies it.
    assert_eq!(
        derive(&[], "Q", SearchConfig::default()),
        SearchOutcome::Exhausted
    );
}

#[test]
fn test_limit_reached_with_a_tiny_budget() {
    let config = SearchConfig {
        max_steps: 2,
        ..SearchConfig::default()
    };
    assert_eq!(derive(&[], "(P -> P)", config), SearchOutcome::LimitReached);
}

#[test]
fn test_search_outcome_display() {
    assert_eq!(SearchOutcome::Exhausted.to_string(), "exhausted");
    assert_eq!(SearchOutcome::LimitReached.to_string(), "limit reached");
    let proof = expect_proof(&["P"], "P");
    assert_eq!(
        SearchOutcome::Proved(proof).to_string(),
        "proved in 1 lines"
    );
}
