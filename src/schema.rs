use std::fmt;
use std::sync::LazyLock;

use crate::formula::Formula;
use crate::substitution::Substitution;

/// A formula template with metavariable holes.
///
/// `Meta` leaves stand for arbitrary formulas during matching, while `Var`
/// leaves are ordinary propositional variables that must appear verbatim.
/// The three axiom schemas of the system contain only metavariables, but
/// nothing in the matcher depends on that.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Schema {
    /// A metavariable, matched against any formula.
    Meta(String),

    /// A concrete propositional variable.
    Var(String),

    /// The negation of a schema.
    Not(Box<Schema>),

    /// An implication between schemas.
    Implies(Box<Schema>, Box<Schema>),
}

impl Schema {
    pub fn meta(name: impl Into<String>) -> Schema {
        Schema::Meta(name.into())
    }

    pub fn var(name: impl Into<String>) -> Schema {
        Schema::Var(name.into())
    }

    pub fn not(inner: Schema) -> Schema {
        Schema::Not(Box::new(inner))
    }

    pub fn implies(antecedent: Schema, consequent: Schema) -> Schema {
        Schema::Implies(Box::new(antecedent), Box::new(consequent))
    }

    /// Matches a concrete formula against this schema, threading bindings
    /// through `substitution`. Matching is one-directional: only the schema
    /// side has holes, the formula side is always ground.
    ///
    /// On failure the substitution may hold partial bindings, so callers
    /// should pass a fresh one per attempt.
    pub fn match_formula(&self, formula: &Formula, substitution: &mut Substitution) -> bool {
        match (self, formula) {
            (Schema::Meta(name), _) => substitution.bind(name, formula),
            (Schema::Var(name), Formula::Var(other)) => name == other,
            (Schema::Not(inner), Formula::Not(formula_inner)) => {
                inner.match_formula(formula_inner, substitution)
            }
            (Schema::Implies(antecedent, consequent), Formula::Implies(fa, fc)) => {
                antecedent.match_formula(fa, substitution)
                    && consequent.match_formula(fc, substitution)
            }
            _ => false,
        }
    }

    /// Returns the recovered bindings if `formula` is an instance of this
    /// schema, and None otherwise.
    pub fn matches(&self, formula: &Formula) -> Option<Substitution> {
        let mut substitution = Substitution::new();
        if self.match_formula(formula, &mut substitution) {
            Some(substitution)
        } else {
            None
        }
    }

    /// The distinct metavariable names of this schema, in first-appearance
    /// order.
    pub fn metavariables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_metavariables(&mut out);
        out
    }

    fn collect_metavariables<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Schema::Meta(name) => {
                if !out.contains(&name.as_str()) {
                    out.push(name);
                }
            }
            Schema::Var(_) => {}
            Schema::Not(inner) => inner.collect_metavariables(out),
            Schema::Implies(antecedent, consequent) => {
                antecedent.collect_metavariables(out);
                consequent.collect_metavariables(out);
            }
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Schema::Meta(name) => write!(f, "{}", name),
            Schema::Var(name) => write!(f, "{}", name),
            Schema::Not(inner) => write!(f, "~{}", inner),
            Schema::Implies(antecedent, consequent) => {
                write!(f, "({} -> {})", antecedent, consequent)
            }
        }
    }
}

/// One named axiom schema.
pub struct AxiomSchema {
    name: &'static str,
    schema: Schema,
}

impl AxiomSchema {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// An ordered table of axiom schemas. Candidates are tried in table order
/// and the first match wins, though which schema matched never changes
/// whether a formula counts as an axiom.
pub struct AxiomTable {
    schemas: Vec<AxiomSchema>,
}

impl AxiomTable {
    fn standard() -> AxiomTable {
        let meta_a = || Schema::meta("A");
        let meta_b = || Schema::meta("B");
        let meta_c = || Schema::meta("C");

        // AX1: A -> (B -> A)
        let ax1 = Schema::implies(meta_a(), Schema::implies(meta_b(), meta_a()));

        // AX2: (A -> (B -> C)) -> ((A -> B) -> (A -> C))
        let ax2 = Schema::implies(
            Schema::implies(meta_a(), Schema::implies(meta_b(), meta_c())),
            Schema::implies(
                Schema::implies(meta_a(), meta_b()),
                Schema::implies(meta_a(), meta_c()),
            ),
        );

        // AX3: (~B -> ~A) -> (A -> B)
        let ax3 = Schema::implies(
            Schema::implies(Schema::not(meta_b()), Schema::not(meta_a())),
            Schema::implies(meta_a(), meta_b()),
        );

        AxiomTable {
            schemas: vec![
                AxiomSchema {
                    name: "AX1",
                    schema: ax1,
                },
                AxiomSchema {
                    name: "AX2",
                    schema: ax2,
                },
                AxiomSchema {
                    name: "AX3",
                    schema: ax3,
                },
            ],
        }
    }

    pub fn schemas(&self) -> &[AxiomSchema] {
        &self.schemas
    }

    /// True iff some schema in the table matches the formula.
    pub fn matches(&self, formula: &Formula) -> bool {
        self.first_match(formula).is_some()
    }

    /// The first schema matching the formula, along with the recovered
    /// substitution.
    pub fn first_match(&self, formula: &Formula) -> Option<(&AxiomSchema, Substitution)> {
        self.schemas.iter().find_map(|axiom| {
            axiom
                .schema
                .matches(formula)
                .map(|substitution| (axiom, substitution))
        })
    }
}

/// The standard three-schema table. It is built once per process and never
/// mutated, so it can be shared freely across threads.
pub fn standard_axioms() -> &'static AxiomTable {
    static TABLE: LazyLock<AxiomTable> = LazyLock::new(AxiomTable::standard);
    &TABLE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_formula;

    fn formula(text: &str) -> Formula {
        parse_formula(text).unwrap()
    }

    #[test]
    fn test_metavariable_binds_anything() {
        let schema = Schema::meta("A");
        for text in ["P", "~P", "(P -> ~Q)"] {
            let substitution = schema.matches(&formula(text)).unwrap();
            assert_eq!(substitution.get("A"), Some(&formula(text)));
        }
    }

    #[test]
    fn test_schema_variables_match_verbatim_only() {
        let schema = Schema::var("P");
        assert!(schema.matches(&formula("P")).is_some());
        assert!(schema.matches(&formula("Q")).is_none());
        assert!(schema.matches(&formula("~P")).is_none());
    }

    #[test]
    fn test_double_binding_must_agree() {
        // A -> A matches only implications with equal sides.
        let schema = Schema::implies(Schema::meta("A"), Schema::meta("A"));
        assert!(schema.matches(&formula("(P -> P)")).is_some());
        assert!(schema.matches(&formula("((P -> Q) -> (P -> Q))")).is_some());
        assert!(schema.matches(&formula("(P -> Q)")).is_none());
    }

    #[test]
    fn test_structure_mismatch_fails() {
        let schema = Schema::not(Schema::meta("A"));
        assert!(schema.matches(&formula("~P")).is_some());
        assert!(schema.matches(&formula("P")).is_none());
        assert!(schema.matches(&formula("(P -> Q)")).is_none());
    }

    #[test]
    fn test_metavariables_in_first_appearance_order() {
        let table = standard_axioms();
        let names: Vec<Vec<&str>> = table
            .schemas()
            .iter()
            .map(|axiom| axiom.schema().metavariables())
            .collect();
        assert_eq!(names[0], vec!["A", "B"]);
        assert_eq!(names[1], vec!["A", "B", "C"]);
        assert_eq!(names[2], vec!["B", "A"]);
    }

    #[test]
    fn test_ax1_instances() {
        let table = standard_axioms();
        let instance = formula("(P -> (Q -> P))");
        let (axiom, substitution) = table.first_match(&instance).unwrap();
        assert_eq!(axiom.name(), "AX1");
        assert_eq!(substitution.get("A"), Some(&formula("P")));
        assert_eq!(substitution.get("B"), Some(&formula("Q")));

        // Nested instance where both holes take the same formula.
        assert!(table.matches(&formula("(~P -> ((Q -> R) -> ~P))")));
        // Right shape, but the outer antecedent must reappear inside.
        assert!(!table.matches(&formula("(P -> (Q -> R))")));
    }

    #[test]
    fn test_ax2_instances() {
        let table = standard_axioms();
        let instance = formula("((P -> (Q -> R)) -> ((P -> Q) -> (P -> R)))");
        let (axiom, _) = table.first_match(&instance).unwrap();
        assert_eq!(axiom.name(), "AX2");

        // One leaf off: the final R is replaced by P.
        assert!(!table.matches(&formula("((P -> (Q -> R)) -> ((P -> Q) -> (P -> P)))")));
    }

    #[test]
    fn test_ax3_instances() {
        let table = standard_axioms();
        let instance = formula("((~Q -> ~P) -> (P -> Q))");
        let (axiom, substitution) = table.first_match(&instance).unwrap();
        assert_eq!(axiom.name(), "AX3");
        assert_eq!(substitution.get("A"), Some(&formula("P")));
        assert_eq!(substitution.get("B"), Some(&formula("Q")));

        // Contraposition the other way around is not an instance.
        assert!(!table.matches(&formula("((P -> Q) -> (~Q -> ~P))")));
    }

    #[test]
    fn test_instantiated_schema_matches_itself() {
        // For any substitution, applying it and matching back recovers the
        // same bindings.
        let table = standard_axioms();
        let mut substitution = Substitution::new();
        substitution.bind("A", &formula("(P -> ~Q)"));
        substitution.bind("B", &formula("~~R"));
        substitution.bind("C", &formula("Q"));
        for axiom in table.schemas() {
            let instance = substitution.apply(axiom.schema()).unwrap();
            let recovered = axiom.schema().matches(&instance).unwrap();
            for name in axiom.schema().metavariables() {
                assert_eq!(recovered.get(name), substitution.get(name));
            }
        }
    }

    #[test]
    fn test_non_axioms_match_nothing() {
        let table = standard_axioms();
        for text in ["P", "~P", "(P -> Q)", "(P -> (Q -> R))", "((P -> Q) -> P)"] {
            assert!(!table.matches(&formula(text)), "{} is not an axiom", text);
        }
    }
}
