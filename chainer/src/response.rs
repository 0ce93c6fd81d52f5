use crate::kb::{FactId, RuleId};
use crate::{Bindings, Rule, Statement};
use serde::Serialize;

/// One successful match of an `ask` query
///
/// `facts` holds the fact(s) the bindings were found in, which justify the
/// answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub bindings: Bindings,
    pub facts: Vec<Statement>,
    #[serde(skip)]
    pub fact_ids: Vec<FactId>,
}

/// Outcome of a retraction
///
/// A retraction either demotes its target (it keeps a derivation and only
/// loses its asserted status) or removes it together with every dependent
/// left without support.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Retraction {
    pub demoted: bool,
    pub removed_facts: Vec<Statement>,
    pub removed_rules: Vec<Rule>,
}

impl Retraction {
    /// Whether the retraction changed anything
    pub fn is_noop(&self) -> bool {
        !self.demoted && self.removed_facts.is_empty() && self.removed_rules.is_empty()
    }
}

/// A justification rendered as content rather than identifiers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupportView {
    pub fact: Statement,
    pub rule: Rule,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactView {
    pub id: FactId,
    pub statement: Statement,
    pub asserted: bool,
    pub supported_by: Vec<SupportView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleView {
    pub id: RuleId,
    pub rule: Rule,
    pub asserted: bool,
    pub supported_by: Vec<SupportView>,
}

/// Serializable view of a whole knowledge base, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KbSnapshot {
    pub facts: Vec<FactView>,
    pub rules: Vec<RuleView>,
}

impl KbSnapshot {
    pub fn asserted_facts(&self) -> impl Iterator<Item = &FactView> {
        self.facts.iter().filter(|f| f.asserted)
    }

    pub fn derived_facts(&self) -> impl Iterator<Item = &FactView> {
        self.facts.iter().filter(|f| !f.supported_by.is_empty())
    }
}
