//! The knowledge base: storage, deduplication and the justification graph.
//!
//! Facts and rules live in two arenas keyed by stable identifiers. All
//! justification edges are identifier sets, and every edge is written on both
//! ends inside the operation that creates or removes it.

mod cascade;
mod entry;
mod invariants;

pub use entry::{Entry, FactEntry, FactId, ItemId, RuleEntry, RuleId, Support};
pub use invariants::Violation;

use crate::inference::InferenceEngine;
use crate::response::{Answer, FactView, KbSnapshot, Retraction, RuleView, SupportView};
use crate::{factq, match_statements, Item, Rule, Statement};
use entry::Justification;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use tracing::{debug, info, warn};

pub struct KnowledgeBase {
    facts: BTreeMap<FactId, FactEntry>,
    rules: BTreeMap<RuleId, RuleEntry>,
    /// Canonical statement to id, for structural deduplication
    fact_index: HashMap<Statement, FactId>,
    rule_index: HashMap<Rule, RuleId>,
    /// Justifications discarded because they closed a cycle, retried after removals
    deferred: BTreeSet<Support>,
    next_id: u64,
    engine: InferenceEngine,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::with_engine(InferenceEngine)
    }
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(engine: InferenceEngine) -> Self {
        Self {
            facts: BTreeMap::new(),
            rules: BTreeMap::new(),
            fact_index: HashMap::new(),
            rule_index: HashMap::new(),
            deferred: BTreeSet::new(),
            next_id: 0,
            engine,
        }
    }

    /// Add a fact or rule as a caller assertion
    ///
    /// New content is inserted and fired against every existing counterpart,
    /// which may derive further items recursively. Content that is already
    /// present (up to variable renaming) is marked asserted instead; nothing
    /// fires in that case.
    pub fn add(&mut self, item: impl Into<Item>) -> ItemId {
        self.insert(item.into(), None)
    }

    /// Same store operation as [`KnowledgeBase::add`], for explicit user
    /// assertions
    pub fn assert(&mut self, item: impl Into<Item>) -> ItemId {
        let item = item.into();
        info!(%item, "asserting");
        self.add(item)
    }

    /// Add content derived by the inference engine from `support`
    pub(crate) fn add_derived(&mut self, item: Item, support: Support) -> ItemId {
        self.insert(item, Some(support))
    }

    fn insert(&mut self, item: Item, support: Option<Support>) -> ItemId {
        match item {
            Item::Fact(statement) => ItemId::Fact(self.insert_fact(statement, support)),
            Item::Rule(rule) => ItemId::Rule(self.insert_rule(rule, support)),
        }
    }

    fn insert_fact(&mut self, statement: Statement, support: Option<Support>) -> FactId {
        let key = statement.canonical();
        if let Some(&id) = self.fact_index.get(&key) {
            self.merge(ItemId::Fact(id), support);
            return id;
        }

        let id = FactId(self.allocate_id());
        debug!(%statement, %id, derived = support.is_some(), "inserting fact");
        self.facts.insert(id, Entry::new(statement, support));
        self.fact_index.insert(key, id);
        if let Some(support) = support {
            self.link(support, ItemId::Fact(id));
        }

        let rules: Vec<RuleId> = self.rules.keys().copied().collect();
        let engine = self.engine;
        for rule in rules {
            engine.fire(id, rule, self);
        }
        id
    }

    fn insert_rule(&mut self, rule: Rule, support: Option<Support>) -> RuleId {
        let key = rule.canonical();
        if let Some(&id) = self.rule_index.get(&key) {
            self.merge(ItemId::Rule(id), support);
            return id;
        }

        let id = RuleId(self.allocate_id());
        debug!(%rule, %id, derived = support.is_some(), "inserting rule");
        self.rules.insert(id, Entry::new(rule, support));
        self.rule_index.insert(key, id);
        if let Some(support) = support {
            self.link(support, ItemId::Rule(id));
        }

        let facts: Vec<FactId> = self.facts.keys().copied().collect();
        let engine = self.engine;
        for fact in facts {
            engine.fire(fact, id, self);
        }
        id
    }

    fn merge(&mut self, target: ItemId, support: Option<Support>) {
        let Some(support) = support else {
            if let Some(justification) = self.justification_mut(target) {
                if !justification.asserted {
                    debug!(%target, "derived item now also asserted");
                }
                justification.asserted = true;
            }
            return;
        };

        let known = self
            .justification(target)
            .map_or(true, |j| j.supported_by.contains(&support));
        if known {
            return;
        }
        // Re-deriving an item from its own consequences would let it justify itself.
        if self.would_cycle(support, target) {
            debug!(%target, fact = %support.fact, rule = %support.rule, "deferring circular justification");
            self.deferred.insert(support);
            return;
        }

        if let Some(justification) = self.justification_mut(target) {
            justification.supported_by.push(support);
        }
        self.link(support, target);
        debug!(%target, fact = %support.fact, rule = %support.rule, "merged justification");
    }

    /// Whether `target` is `support` itself or one of its ancestors
    fn would_cycle(&self, support: Support, target: ItemId) -> bool {
        let mut pending = vec![ItemId::Fact(support.fact), ItemId::Rule(support.rule)];
        let mut seen = HashSet::new();
        while let Some(current) = pending.pop() {
            if current == target {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(justification) = self.justification(current) {
                for s in &justification.supported_by {
                    pending.push(ItemId::Fact(s.fact));
                    pending.push(ItemId::Rule(s.rule));
                }
            }
        }
        false
    }

    /// Record `dependent` on both components of `support`
    fn link(&mut self, support: Support, dependent: ItemId) {
        if let Some(fact) = self.facts.get_mut(&support.fact) {
            fact.justification.add_dependent(dependent);
        }
        if let Some(rule) = self.rules.get_mut(&support.rule) {
            rule.justification.add_dependent(dependent);
        }
    }

    /// Find every fact the query unifies with
    ///
    /// Only fact-shaped queries are answered; anything else is logged and
    /// yields no answers. Rules are never searched.
    pub fn ask(&self, query: impl Into<Item>) -> Vec<Answer> {
        let query = query.into();
        let statement = match &query {
            Item::Fact(statement) if factq(&query) => statement,
            _ => {
                warn!(%query, "invalid ask: only facts can be asked");
                return Vec::new();
            }
        };

        info!(%statement, "asking");
        self.facts
            .iter()
            .filter_map(|(id, entry)| {
                match_statements(statement, &entry.content).map(|bindings| Answer {
                    bindings,
                    facts: vec![entry.content.clone()],
                    fact_ids: vec![*id],
                })
            })
            .collect()
    }

    /// Retract an asserted fact
    ///
    /// A fact that is still derivable keeps its place and is only demoted. A
    /// fact without support is removed along with everything that depended on
    /// it alone. Rules cannot be retracted through this entry point, and
    /// retracting an absent fact does nothing.
    pub fn retract(&mut self, item: impl Into<Item>) -> Retraction {
        let statement = match item.into() {
            Item::Fact(statement) => statement,
            Item::Rule(rule) => {
                warn!(%rule, "ignoring retraction: only facts can be retracted");
                return Retraction::default();
            }
        };

        info!(%statement, "retracting");
        match self.find_fact(&statement) {
            Some(id) => self.cascade(ItemId::Fact(id)),
            None => {
                debug!(%statement, "retracted fact is not in the knowledge base");
                Retraction::default()
            }
        }
    }

    pub fn fact(&self, id: FactId) -> Option<&FactEntry> {
        self.facts.get(&id)
    }

    pub fn rule(&self, id: RuleId) -> Option<&RuleEntry> {
        self.rules.get(&id)
    }

    /// Facts in insertion order
    pub fn facts(&self) -> impl Iterator<Item = (FactId, &FactEntry)> {
        self.facts.iter().map(|(id, entry)| (*id, entry))
    }

    /// Rules in insertion order
    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &RuleEntry)> {
        self.rules.iter().map(|(id, entry)| (*id, entry))
    }

    pub fn find_fact(&self, statement: &Statement) -> Option<FactId> {
        self.fact_index.get(&statement.canonical()).copied()
    }

    pub fn find_rule(&self, rule: &Rule) -> Option<RuleId> {
        self.rule_index.get(&rule.canonical()).copied()
    }

    pub fn find(&self, item: &Item) -> Option<ItemId> {
        match item {
            Item::Fact(statement) => self.find_fact(statement).map(ItemId::Fact),
            Item::Rule(rule) => self.find_rule(rule).map(ItemId::Rule),
        }
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.find(item).is_some()
    }

    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn len(&self) -> usize {
        self.facts.len() + self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty() && self.rules.is_empty()
    }

    /// Serializable view with justifications resolved to their content
    pub fn snapshot(&self) -> KbSnapshot {
        KbSnapshot {
            facts: self
                .facts
                .iter()
                .map(|(id, entry)| FactView {
                    id: *id,
                    statement: entry.content.clone(),
                    asserted: entry.justification.asserted,
                    supported_by: self.support_views(entry.supported_by()),
                })
                .collect(),
            rules: self
                .rules
                .iter()
                .map(|(id, entry)| RuleView {
                    id: *id,
                    rule: entry.content.clone(),
                    asserted: entry.justification.asserted,
                    supported_by: self.support_views(entry.supported_by()),
                })
                .collect(),
        }
    }

    fn support_views(&self, supports: &[Support]) -> Vec<SupportView> {
        supports
            .iter()
            .filter_map(|s| {
                let fact = self.facts.get(&s.fact)?;
                let rule = self.rules.get(&s.rule)?;
                Some(SupportView {
                    fact: fact.content.clone(),
                    rule: rule.content.clone(),
                })
            })
            .collect()
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn justification(&self, item: ItemId) -> Option<&Justification> {
        match item {
            ItemId::Fact(id) => self.facts.get(&id).map(|e| &e.justification),
            ItemId::Rule(id) => self.rules.get(&id).map(|e| &e.justification),
        }
    }

    fn justification_mut(&mut self, item: ItemId) -> Option<&mut Justification> {
        match item {
            ItemId::Fact(id) => self.facts.get_mut(&id).map(|e| &mut e.justification),
            ItemId::Rule(id) => self.rules.get_mut(&id).map(|e| &mut e.justification),
        }
    }
}

impl fmt::Display for KnowledgeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Knowledge Base:")?;
        for entry in self.facts.values() {
            writeln!(f, "fact: {}", entry.content)?;
        }
        for entry in self.rules.values() {
            writeln!(f, "rule: {}", entry.content)?;
        }
        Ok(())
    }
}
