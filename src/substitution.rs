use std::collections::HashMap;
use std::fmt;

use crate::formula::Formula;
use crate::schema::Schema;

// A Substitution maintains a mapping from metavariable names to concrete
// formulas, built up while matching a formula against a schema.
// Bindings are only ever added, never changed: rebinding a name succeeds
// only when the new formula is structurally equal to the existing one.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Substitution {
    map: HashMap<String, Formula>,
}

impl Substitution {
    pub fn new() -> Substitution {
        Substitution {
            map: HashMap::new(),
        }
    }

    /// Binds a metavariable to a formula, or checks consistency if it is
    /// already bound. Returns false when the name is already bound to a
    /// different formula.
    pub fn bind(&mut self, name: &str, formula: &Formula) -> bool {
        match self.map.get(name) {
            None => {
                self.map.insert(name.to_string(), formula.clone());
                true
            }
            Some(existing) => existing == formula,
        }
    }

    /// The formula bound to a metavariable, if any.
    pub fn get(&self, name: &str) -> Option<&Formula> {
        self.map.get(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Instantiates a schema under this substitution, replacing every
    /// metavariable with its bound formula. Returns None if the schema
    /// mentions a metavariable with no binding.
    pub fn apply(&self, schema: &Schema) -> Option<Formula> {
        match schema {
            Schema::Meta(name) => self.map.get(name).cloned(),
            Schema::Var(name) => Some(Formula::Var(name.clone())),
            Schema::Not(inner) => Some(Formula::not(self.apply(inner)?)),
            Schema::Implies(antecedent, consequent) => Some(Formula::implies(
                self.apply(antecedent)?,
                self.apply(consequent)?,
            )),
        }
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut entries: Vec<_> = self.map.iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        write!(f, "{{")?;
        for (i, (name, formula)) in entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} := {}", name, formula)?;
        }
        write!(f, "}}")
    }
}
