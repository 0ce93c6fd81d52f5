//! Matching statements against each other and substituting bindings.

use crate::semantic::{Item, Statement, Term};
use serde::Serialize;
use std::fmt;
use tracing::trace;

/// One variable bound to a term
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Binding {
    pub variable: String,
    pub value: Term,
}

/// Variable bindings in the order they were made
///
/// An empty `Bindings` is a successful match that bound nothing; a failed
/// match is `None` at the call site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Bindings {
    bindings: Vec<Binding>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bound_to(&self, variable: &str) -> Option<&Term> {
        self.bindings
            .iter()
            .find(|b| b.variable == variable)
            .map(|b| &b.value)
    }

    pub fn add_binding(&mut self, variable: impl Into<String>, value: Term) {
        self.bindings.push(Binding {
            variable: variable.into(),
            value,
        });
    }

    /// Bind `variable` unless it is bound already; then the existing value
    /// must equal `value`.
    pub fn test_and_bind(&mut self, variable: &str, value: &Term) -> bool {
        match self.bound_to(variable) {
            Some(existing) => existing == value,
            None => {
                self.add_binding(variable, value.clone());
                true
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bindings.is_empty() {
            return write!(f, "yes");
        }
        for (i, binding) in self.bindings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "?{}: {}", binding.variable, binding.value)?;
        }
        Ok(())
    }
}

/// Unify `pattern` with `candidate`, term by term
///
/// A variable on the pattern side binds to the candidate term; failing that, a
/// variable on the candidate side binds to the pattern term. Constants must be
/// equal. Predicate and arity must agree.
pub fn match_statements(pattern: &Statement, candidate: &Statement) -> Option<Bindings> {
    if pattern.predicate != candidate.predicate || pattern.terms.len() != candidate.terms.len() {
        return None;
    }

    let mut bindings = Bindings::new();
    for (left, right) in pattern.terms.iter().zip(&candidate.terms) {
        let consistent = match (left, right) {
            (Term::Variable(name), other) => bindings.test_and_bind(name, other),
            (other, Term::Variable(name)) => bindings.test_and_bind(name, other),
            (Term::Constant(a), Term::Constant(b)) => a == b,
        };
        if !consistent {
            trace!(%pattern, %candidate, "terms do not unify");
            return None;
        }
    }

    trace!(%pattern, %candidate, %bindings, "unified");
    Some(bindings)
}

/// Replace every bound variable in `statement`; unbound variables are kept
pub fn instantiate(statement: &Statement, bindings: &Bindings) -> Statement {
    let terms = statement
        .terms
        .iter()
        .map(|term| match term {
            Term::Variable(name) => bindings.bound_to(name).cloned().unwrap_or_else(|| term.clone()),
            Term::Constant(_) => term.clone(),
        })
        .collect();
    Statement::new(statement.predicate.clone(), terms)
}

/// Whether `item` is shaped as an askable fact
pub fn factq(item: &Item) -> bool {
    matches!(item, Item::Fact(statement) if !statement.predicate.is_empty())
}
