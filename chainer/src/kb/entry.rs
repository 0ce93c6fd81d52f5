use crate::{Rule, Statement};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Stable identifier of a fact in the knowledge base
///
/// Identifiers are never reused, so a removed fact's id stays dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FactId(pub(crate) u64);

/// Stable identifier of a rule in the knowledge base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RuleId(pub(crate) u64);

impl fmt::Display for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fact_{}", self.0)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemId {
    Fact(FactId),
    Rule(RuleId),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Fact(id) => write!(f, "{}", id),
            ItemId::Rule(id) => write!(f, "{}", id),
        }
    }
}

/// A justification: `fact` unified with the first antecedent of `rule`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Support {
    pub fact: FactId,
    pub rule: RuleId,
}

impl Support {
    pub fn new(fact: FactId, rule: RuleId) -> Self {
        Self { fact, rule }
    }

    /// Whether this pair names `item` as either component
    pub fn mentions(&self, item: ItemId) -> bool {
        match item {
            ItemId::Fact(id) => self.fact == id,
            ItemId::Rule(id) => self.rule == id,
        }
    }

    /// The component that is not `item`, if `item` is one of the two
    pub(crate) fn partner_of(&self, item: ItemId) -> Option<ItemId> {
        match item {
            ItemId::Fact(id) if self.fact == id => Some(ItemId::Rule(self.rule)),
            ItemId::Rule(id) if self.rule == id => Some(ItemId::Fact(self.fact)),
            _ => None,
        }
    }
}

/// Both directions of the justification graph around one item
#[derive(Debug, Clone, Default)]
pub(crate) struct Justification {
    pub(crate) asserted: bool,
    pub(crate) supported_by: Vec<Support>,
    pub(crate) supports_facts: BTreeSet<FactId>,
    pub(crate) supports_rules: BTreeSet<RuleId>,
}

impl Justification {
    pub(crate) fn supports(&self, item: ItemId) -> bool {
        match item {
            ItemId::Fact(id) => self.supports_facts.contains(&id),
            ItemId::Rule(id) => self.supports_rules.contains(&id),
        }
    }

    pub(crate) fn add_dependent(&mut self, item: ItemId) {
        match item {
            ItemId::Fact(id) => self.supports_facts.insert(id),
            ItemId::Rule(id) => self.supports_rules.insert(id),
        };
    }

    pub(crate) fn remove_dependent(&mut self, item: ItemId) {
        match item {
            ItemId::Fact(id) => self.supports_facts.remove(&id),
            ItemId::Rule(id) => self.supports_rules.remove(&id),
        };
    }

    /// Dependents in a stable order, detached from the live sets
    pub(crate) fn dependents(&self) -> Vec<ItemId> {
        self.supports_facts
            .iter()
            .map(|id| ItemId::Fact(*id))
            .chain(self.supports_rules.iter().map(|id| ItemId::Rule(*id)))
            .collect()
    }
}

/// A stored fact or rule together with its justification record
#[derive(Debug, Clone)]
pub struct Entry<T> {
    pub(crate) content: T,
    pub(crate) justification: Justification,
}

pub type FactEntry = Entry<Statement>;
pub type RuleEntry = Entry<Rule>;

impl<T> Entry<T> {
    /// A caller assertion when `support` is `None`, a derivation otherwise
    pub(crate) fn new(content: T, support: Option<Support>) -> Self {
        Self {
            content,
            justification: Justification {
                asserted: support.is_none(),
                supported_by: support.into_iter().collect(),
                ..Justification::default()
            },
        }
    }

    pub fn content(&self) -> &T {
        &self.content
    }

    pub fn is_asserted(&self) -> bool {
        self.justification.asserted
    }

    /// Whether at least one derivation still backs this entry
    pub fn is_supported(&self) -> bool {
        !self.justification.supported_by.is_empty()
    }

    pub fn supported_by(&self) -> &[Support] {
        &self.justification.supported_by
    }

    pub fn supports_facts(&self) -> impl Iterator<Item = FactId> + '_ {
        self.justification.supports_facts.iter().copied()
    }

    pub fn supports_rules(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.justification.supports_rules.iter().copied()
    }
}
