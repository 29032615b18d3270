use std::collections::HashSet;
use std::fmt;

use tracing::{debug, trace};

use crate::checker::Checker;
use crate::formula::Formula;
use crate::schema::{standard_axioms, Schema};
use crate::substitution::Substitution;
use crate::validator::{validate, Justification, Proof, ProofLine, Verdict};

/// Limits for one search.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Maximum number of accepted steps before giving up.
    pub max_steps: usize,

    /// Cap on the instantiation pool drawn from subformulas of the goal
    /// and premises.
    pub max_pool: usize,
}

impl Default for SearchConfig {
    fn default() -> SearchConfig {
        SearchConfig {
            max_steps: 64,
            max_pool: 12,
        }
    }
}

/// The outcome of one search.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SearchOutcome {
    /// A proof of the goal, rebuilt from the accepted steps and validated.
    Proved(Proof),

    /// The candidate space was exhausted without reaching the goal.
    Exhausted,

    /// The step budget ran out first.
    LimitReached,
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SearchOutcome::Proved(proof) => {
                write!(f, "proved in {} lines", proof.lines().len())
            }
            SearchOutcome::Exhausted => write!(f, "exhausted"),
            SearchOutcome::LimitReached => write!(f, "limit reached"),
        }
    }
}

/// One accepted search step, with the formulas its justification consumed.
/// The dependencies drive pruning when the proof is rebuilt.
struct SearchStep {
    formula: Formula,
    justification: Justification,
    dependencies: Vec<Formula>,
}

/// A bounded forward searcher for the fixed axiom system.
///
/// The searcher is a client of the step oracle, not part of it. Candidate
/// formulas are drawn from axiom schema instantiations over a small
/// subformula pool and from Modus Ponens closures of the accepted set;
/// every candidate goes through `Checker::check` before acceptance, and a
/// successful search returns a proof that has been re-validated line by
/// line. Search is best-effort: exhaustion means no proof was found within
/// the configured bounds, not that none exists.
pub struct Searcher {
    config: SearchConfig,
    checker: Checker,
    premises: Vec<Formula>,
    steps: Vec<SearchStep>,
}

impl Searcher {
    pub fn new(premises: Vec<Formula>, config: SearchConfig) -> Searcher {
        Searcher {
            checker: Checker::new(&premises),
            config,
            premises,
            steps: Vec::new(),
        }
    }

    /// Tries to derive the goal from the premises within the configured
    /// bounds.
    pub fn derive(&mut self, goal: &Formula) -> SearchOutcome {
        let pool = self.build_pool(goal);
        debug!("searching for {} with a pool of {} formulas", goal, pool.len());
        loop {
            if self.checker.check(goal) {
                self.try_step(goal.clone());
                return self.finish(goal);
            }
            if self.steps.len() >= self.config.max_steps {
                return SearchOutcome::LimitReached;
            }
            let mut progress = false;
            for candidate in self.round_candidates(&pool) {
                if self.steps.len() >= self.config.max_steps {
                    break;
                }
                if self.try_step(candidate) {
                    progress = true;
                }
            }
            if !progress {
                return SearchOutcome::Exhausted;
            }
        }
    }

    /// The instantiation pool: distinct subformulas of the goal and the
    /// premises, goal first, capped at the configured size.
    fn build_pool(&self, goal: &Formula) -> Vec<Formula> {
        let mut pool = Vec::new();
        let mut seen = HashSet::new();
        for source in std::iter::once(goal).chain(self.premises.iter()) {
            for subformula in source.subformulas() {
                if pool.len() >= self.config.max_pool {
                    return pool;
                }
                if seen.insert(subformula.clone()) {
                    pool.push(subformula.clone());
                }
            }
        }
        pool
    }

    fn round_candidates(&self, pool: &[Formula]) -> Vec<Formula> {
        let mut candidates = self.modus_ponens_candidates();
        candidates.extend(self.axiom_candidates(pool));
        candidates
    }

    /// Consequents of accepted implications whose antecedents are also
    /// accepted. The oracle re-checks each one before acceptance.
    fn modus_ponens_candidates(&self) -> Vec<Formula> {
        let mut out = Vec::new();
        for accepted in self.checker.accepted() {
            if let Some((antecedent, consequent)) = accepted.as_implication() {
                if self.checker.is_accepted(antecedent) {
                    out.push(consequent.clone());
                }
            }
        }
        out
    }

    /// Every instantiation of every axiom schema with metavariables drawn
    /// from the pool.
    fn axiom_candidates(&self, pool: &[Formula]) -> Vec<Formula> {
        let mut out = Vec::new();
        for axiom in standard_axioms().schemas() {
            let metavariables = axiom.schema().metavariables();
            let substitution = Substitution::new();
            Self::instantiate(axiom.schema(), &metavariables, pool, substitution, &mut out);
        }
        out
    }

    fn instantiate(
        schema: &Schema,
        metavariables: &[&str],
        pool: &[Formula],
        substitution: Substitution,
        out: &mut Vec<Formula>,
    ) {
        match metavariables.split_first() {
            None => {
                if let Some(formula) = substitution.apply(schema) {
                    out.push(formula);
                }
            }
            Some((name, rest)) => {
                for candidate in pool {
                    let mut next = substitution.clone();
                    next.bind(name, candidate);
                    Self::instantiate(schema, rest, pool, next, out);
                }
            }
        }
    }

    /// Runs one candidate through the oracle. On acceptance, records the
    /// step with the justification the core predicates report.
    fn try_step(&mut self, candidate: Formula) -> bool {
        if self.checker.is_accepted(&candidate) {
            return false;
        }
        // Every proposal goes through the oracle; the searcher never
        // decides acceptability itself.
        if !self.checker.check(&candidate) {
            return false;
        }
        let (justification, dependencies) = if self.checker.is_axiom(&candidate) {
            (Justification::Axiom, Vec::new())
        } else {
            match self.checker.modus_ponens_pair(&candidate) {
                Some((antecedent, implication)) => (
                    Justification::ModusPonens,
                    vec![antecedent.clone(), implication.clone()],
                ),
                None => return false,
            }
        };
        trace!("accepted {} as {}", candidate, justification);
        self.checker.accept(candidate.clone());
        self.steps.push(SearchStep {
            formula: candidate,
            justification,
            dependencies,
        });
        true
    }

    /// Rebuilds a proof of the goal from the accepted steps, pruned to the
    /// steps the goal actually depends on, then validates it.
    fn finish(&self, goal: &Formula) -> SearchOutcome {
        let mut lines = self.pruned_lines(goal);
        if lines.is_empty() {
            // The goal was accepted without a step, so it is a premise.
            lines.push(ProofLine::new(goal.clone(), Justification::Premise));
        }
        let Ok(proof) = Proof::new(self.premises.clone(), lines) else {
            return SearchOutcome::Exhausted;
        };
        // Each line was oracle-approved against the premises and earlier
        // kept lines, so the rebuilt proof must validate.
        assert_eq!(validate(&proof), Verdict::Valid);
        SearchOutcome::Proved(proof)
    }

    /// Walks the steps backwards from the goal, keeping a step only if a
    /// kept step or the goal itself depends on its formula.
    fn pruned_lines(&self, goal: &Formula) -> Vec<ProofLine> {
        let mut needed: HashSet<&Formula> = HashSet::new();
        needed.insert(goal);
        let mut keep = vec![false; self.steps.len()];
        for (index, step) in self.steps.iter().enumerate().rev() {
            if needed.contains(&step.formula) {
                keep[index] = true;
                for dependency in &step.dependencies {
                    needed.insert(dependency);
                }
            }
        }
        self.steps
            .iter()
            .zip(keep)
            .filter(|(_, kept)| *kept)
            .map(|(step, _)| ProofLine::new(step.formula.clone(), step.justification))
            .collect()
    }
}
