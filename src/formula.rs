use std::fmt;

use serde::{Deserialize, Serialize};

/// A propositional formula.
///
/// Formulas are immutable once constructed. Equality is strict structural
/// equality: two formulas are equal iff their variants match and their
/// subformulas are recursively equal. Variable names are opaque identifiers;
/// no boolean simplification is ever applied, so `~~P` and `P` are distinct.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Formula {
    /// An atomic propositional variable.
    Var(String),

    /// The negation of a formula.
    Not(Box<Formula>),

    /// An implication. The antecedent comes first, the consequent second.
    Implies(Box<Formula>, Box<Formula>),
}

impl Formula {
    /// Creates a variable formula.
    pub fn var(name: impl Into<String>) -> Formula {
        Formula::Var(name.into())
    }

    /// Creates the negation of a formula.
    pub fn not(inner: Formula) -> Formula {
        Formula::Not(Box::new(inner))
    }

    /// Creates an implication from antecedent to consequent.
    pub fn implies(antecedent: Formula, consequent: Formula) -> Formula {
        Formula::Implies(Box::new(antecedent), Box::new(consequent))
    }

    /// If this formula is an implication, returns its antecedent and consequent.
    pub fn as_implication(&self) -> Option<(&Formula, &Formula)> {
        match self {
            Formula::Implies(antecedent, consequent) => Some((antecedent, consequent)),
            _ => None,
        }
    }

    /// All subformulas of this formula, including itself, in pre-order.
    pub fn subformulas(&self) -> Vec<&Formula> {
        let mut out = Vec::new();
        self.collect_subformulas(&mut out);
        out
    }

    fn collect_subformulas<'a>(&'a self, out: &mut Vec<&'a Formula>) {
        out.push(self);
        match self {
            Formula::Var(_) => {}
            Formula::Not(inner) => inner.collect_subformulas(out),
            Formula::Implies(antecedent, consequent) => {
                antecedent.collect_subformulas(out);
                consequent.collect_subformulas(out);
            }
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Formula::Var(name) => write!(f, "{}", name),
            Formula::Not(inner) => write!(f, "~{}", inner),
            Formula::Implies(antecedent, consequent) => {
                write!(f, "({} -> {})", antecedent, consequent)
            }
        }
    }
}
