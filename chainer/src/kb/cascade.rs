use super::{ItemId, KnowledgeBase, Support};
use crate::response::Retraction;
use std::collections::HashSet;
use tracing::debug;

impl KnowledgeBase {
    /// Withdraw `target`, which must already be in the store
    ///
    /// Supported targets are only demoted. Unsupported targets are removed,
    /// and so is every dependent that loses its last justification and was
    /// never asserted. The walk is a work-list over detached snapshots of
    /// each removed item's dependents. Afterwards the justifications deferred
    /// for closing a cycle are fired again, so anything still derivable from
    /// the survivors comes back.
    pub(crate) fn cascade(&mut self, target: ItemId) -> Retraction {
        let mut report = Retraction::default();

        let Some(justification) = self.justification_mut(target) else {
            return report;
        };
        if !justification.supported_by.is_empty() {
            if justification.asserted {
                justification.asserted = false;
                report.demoted = true;
                debug!(%target, "demoted to derived");
            }
            return report;
        }

        let mut pending = vec![target];
        let mut removed = HashSet::new();
        while let Some(current) = pending.pop() {
            if !removed.insert(current) {
                continue;
            }
            let Some(dependents) = self.justification(current).map(|j| j.dependents()) else {
                continue;
            };
            for dependent in dependents {
                if self.detach(current, dependent) {
                    pending.push(dependent);
                }
            }
            self.remove(current, &mut report);
        }

        self.revisit_deferred();

        // Content re-derived by a deferred pair survived; a re-derived target counts as demoted.
        let target_content = report.removed_facts.first().cloned();
        report
            .removed_facts
            .retain(|statement| self.find_fact(statement).is_none());
        report.removed_rules.retain(|rule| self.find_rule(rule).is_none());
        if let (ItemId::Fact(_), Some(statement)) = (target, target_content) {
            if self.find_fact(&statement).is_some() {
                debug!(%statement, "retracted fact is still derivable");
                report.demoted = true;
            }
        }
        report
    }

    /// Fire every deferred justification whose fact and rule both survive
    ///
    /// Removal only deletes edges, so a pair deferred for closing a cycle may
    /// now be acyclic. Pairs that still close a cycle are deferred again by
    /// the merge; pairs naming a removed item are dropped.
    fn revisit_deferred(&mut self) {
        let pending = std::mem::take(&mut self.deferred);
        let engine = self.engine;
        for support in pending {
            if self.facts.contains_key(&support.fact) && self.rules.contains_key(&support.rule) {
                engine.fire(support.fact, support.rule, self);
            }
        }
    }

    /// Drop every justification of `dependent` that mentions `removed`
    ///
    /// The surviving half of each dropped pair forgets `dependent` too, unless
    /// another remaining pair still links them. Returns whether `dependent` is
    /// now unsupported and unasserted.
    fn detach(&mut self, removed: ItemId, dependent: ItemId) -> bool {
        let Some(justification) = self.justification_mut(dependent) else {
            return false;
        };
        let (dropped, kept): (Vec<Support>, Vec<Support>) = justification
            .supported_by
            .iter()
            .copied()
            .partition(|s| s.mentions(removed));
        let orphaned = kept.is_empty() && !justification.asserted;
        justification.supported_by = kept.clone();

        for support in dropped {
            let Some(partner) = support.partner_of(removed) else {
                continue;
            };
            if kept.iter().any(|s| s.mentions(partner)) {
                continue;
            }
            if let Some(partner) = self.justification_mut(partner) {
                partner.remove_dependent(dependent);
            }
        }

        debug!(%dependent, %removed, remaining = kept.len(), "detached justification");
        orphaned
    }

    fn remove(&mut self, item: ItemId, report: &mut Retraction) {
        match item {
            ItemId::Fact(id) => {
                if let Some(entry) = self.facts.remove(&id) {
                    self.fact_index.remove(&entry.content.canonical());
                    debug!(statement = %entry.content, "removed fact");
                    report.removed_facts.push(entry.content);
                }
            }
            ItemId::Rule(id) => {
                if let Some(entry) = self.rules.remove(&id) {
                    self.rule_index.remove(&entry.content.canonical());
                    debug!(rule = %entry.content, "removed rule");
                    report.removed_rules.push(entry.content);
                }
            }
        }
    }
}
