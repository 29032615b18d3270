use std::collections::HashSet;

use tracing::trace;

use crate::formula::Formula;
use crate::schema::standard_axioms;

/// The Checker accumulates the formulas accepted so far within a single
/// proof and answers whether a candidate formula is justifiable in one step.
///
/// A fresh checker is created per proof; the declared premises are seeded
/// into the accepted set at construction, before any line is examined.
/// The accepted set only ever grows.
pub struct Checker {
    /// The declared premise set for this proof.
    premises: HashSet<Formula>,

    /// Accepted formulas in acceptance order, premises first.
    accepted: Vec<Formula>,

    /// Mirror of `accepted` for constant-time membership tests.
    accepted_set: HashSet<Formula>,
}

impl Checker {
    /// Creates a checker for a proof with the given declared premises.
    pub fn new(premises: &[Formula]) -> Checker {
        let mut checker = Checker {
            premises: premises.iter().cloned().collect(),
            accepted: Vec::new(),
            accepted_set: HashSet::new(),
        };
        for premise in premises {
            checker.accept(premise.clone());
        }
        checker
    }

    /// True iff the formula is one of the declared premises.
    pub fn is_premise(&self, formula: &Formula) -> bool {
        self.premises.contains(formula)
    }

    /// True iff the formula instantiates one of the axiom schemas.
    pub fn is_axiom(&self, formula: &Formula) -> bool {
        standard_axioms().matches(formula)
    }

    /// True iff the formula has already been accepted. Premises count as
    /// accepted from the start.
    pub fn is_accepted(&self, formula: &Formula) -> bool {
        self.accepted_set.contains(formula)
    }

    /// Finds an accepted pair justifying `formula` by Modus Ponens: an
    /// accepted implication whose consequent is `formula` and whose
    /// antecedent is also accepted. Implications are scanned in acceptance
    /// order and the first justifying pair wins.
    ///
    /// Returns the pair as (antecedent, implication).
    pub fn modus_ponens_pair(&self, formula: &Formula) -> Option<(&Formula, &Formula)> {
        for accepted in &self.accepted {
            if let Some((antecedent, consequent)) = accepted.as_implication() {
                if consequent == formula && self.accepted_set.contains(antecedent) {
                    trace!("modus ponens: {} from {}", formula, accepted);
                    return Some((antecedent, accepted));
                }
            }
        }
        None
    }

    /// True iff some accepted pair derives `formula` by Modus Ponens.
    pub fn has_modus_ponens(&self, formula: &Formula) -> bool {
        self.modus_ponens_pair(formula).is_some()
    }

    /// The step oracle: true iff the candidate is acceptable given the
    /// current accepted set, either as a premise, as an axiom instance, or
    /// as a Modus Ponens consequence of accepted formulas.
    ///
    /// This is a pure query. The accepted set is not modified, so the same
    /// candidate can be checked any number of times with the same answer.
    pub fn check(&self, candidate: &Formula) -> bool {
        self.is_premise(candidate) || self.is_axiom(candidate) || self.has_modus_ponens(candidate)
    }

    /// Adds a formula to the accepted set. Accepting a formula twice is a
    /// no-op.
    pub fn accept(&mut self, formula: Formula) {
        if self.accepted_set.insert(formula.clone()) {
            self.accepted.push(formula);
        }
    }

    /// The formulas accepted so far, in acceptance order.
    pub fn accepted(&self) -> &[Formula] {
        &self.accepted
    }
}
