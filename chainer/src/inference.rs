//! One forward-chaining step between a fact and a rule.

use crate::kb::{FactId, KnowledgeBase, RuleId, Support};
use crate::{instantiate, match_statements, Item, Rule};
use tracing::{debug, trace};

/// Stateless forward-chaining step
///
/// The knowledge base invokes [`InferenceEngine::fire`] once for every
/// (existing item, new item) pair, which gives an incremental closure without
/// recomputing anything already derived.
#[derive(Debug, Clone, Copy, Default)]
pub struct InferenceEngine;

impl InferenceEngine {
    pub fn new() -> Self {
        Self
    }

    /// Try to fire `rule` with `fact`
    ///
    /// Only the rule's first antecedent is matched. A rule with a single
    /// antecedent yields a fact from its conclusion; a longer rule yields a
    /// rule over the remaining antecedents. Either way the result is justified
    /// by `(fact, rule)` and handed back to `kb`, which may fire again.
    pub fn fire(&self, fact: FactId, rule: RuleId, kb: &mut KnowledgeBase) {
        let Some(derived) = Self::derive(fact, rule, kb) else {
            return;
        };
        debug!(%fact, %rule, %derived, "fired");
        kb.add_derived(derived, Support::new(fact, rule));
    }

    fn derive(fact: FactId, rule: RuleId, kb: &KnowledgeBase) -> Option<Item> {
        let statement = kb.fact(fact)?.content();
        let rule = kb.rule(rule)?.content();
        trace!(%statement, %rule, "attempting to infer");

        let (first, rest) = rule.lhs().split_first()?;
        let bindings = match_statements(first, statement)?;
        let rhs = instantiate(rule.rhs(), &bindings);

        if rest.is_empty() {
            Some(Item::Fact(rhs))
        } else {
            let lhs = rest.iter().map(|s| instantiate(s, &bindings)).collect();
            Some(Item::Rule(Rule::from_parts(lhs, rhs)))
        }
    }
}
