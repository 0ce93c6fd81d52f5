use crate::error::KbError;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// A single argument of a statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Term {
    Constant(String),
    /// A variable, stored without its `?` sigil
    Variable(String),
}

impl Term {
    pub fn constant(name: impl Into<String>) -> Self {
        Term::Constant(name.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Constant(name) => write!(f, "{}", name),
            Term::Variable(name) => write!(f, "?{}", name),
        }
    }
}

/// A predicate applied to an ordered sequence of terms
///
/// `PartialEq` is exact. Structural equality, which treats consistently
/// renamed variables as the same statement, compares [`Statement::canonical`]
/// forms instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Statement {
    pub predicate: String,
    pub terms: Vec<Term>,
}

impl Statement {
    pub fn new(predicate: impl Into<String>, terms: Vec<Term>) -> Self {
        Self {
            predicate: predicate.into(),
            terms,
        }
    }

    pub fn is_ground(&self) -> bool {
        !self.terms.iter().any(Term::is_variable)
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().filter_map(|term| match term {
            Term::Variable(name) => Some(name.as_str()),
            Term::Constant(_) => None,
        })
    }

    /// The statement with its variables renamed `?0`, `?1`, ... in order of
    /// first occurrence
    pub fn canonical(&self) -> Statement {
        Renamer::default().statement(self)
    }

    /// Equality up to consistent variable renaming
    pub fn is_variant_of(&self, other: &Statement) -> bool {
        self.canonical() == other.canonical()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.predicate)?;
        for term in &self.terms {
            write!(f, " {}", term)?;
        }
        write!(f, ")")
    }
}

/// A conjunction of antecedents implying a conclusion
///
/// Antecedent order matters: firing always consumes the first clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Rule {
    lhs: Vec<Statement>,
    rhs: Statement,
}

impl Rule {
    pub fn new(lhs: Vec<Statement>, rhs: Statement) -> Result<Self, KbError> {
        if lhs.is_empty() {
            return Err(KbError::InvalidRule(format!(
                "rule concluding {} has no antecedents",
                rhs
            )));
        }
        Ok(Self { lhs, rhs })
    }

    /// Build a rule whose antecedents are known to be non-empty
    pub(crate) fn from_parts(lhs: Vec<Statement>, rhs: Statement) -> Self {
        debug_assert!(!lhs.is_empty());
        Self { lhs, rhs }
    }

    pub fn lhs(&self) -> &[Statement] {
        &self.lhs
    }

    pub fn rhs(&self) -> &Statement {
        &self.rhs
    }

    /// The rule with variables renamed jointly across antecedents and conclusion
    pub fn canonical(&self) -> Rule {
        let mut renamer = Renamer::default();
        let lhs = self.lhs.iter().map(|s| renamer.statement(s)).collect();
        let rhs = renamer.statement(&self.rhs);
        Rule { lhs, rhs }
    }

    pub fn is_variant_of(&self, other: &Rule) -> bool {
        self.canonical() == other.canonical()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, clause) in self.lhs.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", clause)?;
        }
        write!(f, ") -> {}", self.rhs)
    }
}

/// Knowledge-base content as handed across the public boundary
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Item {
    Fact(Statement),
    Rule(Rule),
}

impl Item {
    pub fn is_fact(&self) -> bool {
        matches!(self, Item::Fact(_))
    }

    pub fn is_rule(&self) -> bool {
        matches!(self, Item::Rule(_))
    }
}

impl From<Statement> for Item {
    fn from(statement: Statement) -> Self {
        Item::Fact(statement)
    }
}

impl From<Rule> for Item {
    fn from(rule: Rule) -> Self {
        Item::Rule(rule)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Fact(statement) => write!(f, "fact: {}", statement),
            Item::Rule(rule) => write!(f, "rule: {}", rule),
        }
    }
}

#[derive(Default)]
struct Renamer {
    names: HashMap<String, usize>,
}

impl Renamer {
    fn term(&mut self, term: &Term) -> Term {
        match term {
            Term::Constant(_) => term.clone(),
            Term::Variable(name) => {
                let next = self.names.len();
                let index = *self.names.entry(name.clone()).or_insert(next);
                Term::Variable(index.to_string())
            }
        }
    }

    fn statement(&mut self, statement: &Statement) -> Statement {
        Statement {
            predicate: statement.predicate.clone(),
            terms: statement.terms.iter().map(|t| self.term(t)).collect(),
        }
    }
}
