use super::{ItemId, KnowledgeBase, Support};
use std::collections::{HashMap, VecDeque};
use std::fmt;

/// A broken structural guarantee of the knowledge base
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Two stored items are equal up to variable renaming
    Duplicate { first: ItemId, second: ItemId },
    /// `item` lists `support`, but a component is missing or does not list `item` back
    MissingBackEdge { item: ItemId, support: Support },
    /// `supporter` lists `dependent`, which has no justification mentioning it
    DanglingDependent { supporter: ItemId, dependent: ItemId },
    /// A non-asserted item without justification
    Unsupported(ItemId),
    /// The item lies on, or downstream of, a justification cycle
    Cycle(ItemId),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Duplicate { first, second } => {
                write!(f, "{} and {} are structurally equal", first, second)
            }
            Violation::MissingBackEdge { item, support } => write!(
                f,
                "{} is supported by ({}, {}) but the pair does not record it",
                item, support.fact, support.rule
            ),
            Violation::DanglingDependent {
                supporter,
                dependent,
            } => write!(
                f,
                "{} claims to support {} which does not cite it",
                supporter, dependent
            ),
            Violation::Unsupported(item) => {
                write!(f, "{} is neither asserted nor supported", item)
            }
            Violation::Cycle(item) => write!(f, "{} depends on itself", item),
        }
    }
}

impl KnowledgeBase {
    /// Verify uniqueness, edge symmetry, liveness and acyclicity
    ///
    /// Returns every violation found; an empty list means the store is
    /// consistent.
    pub fn check_invariants(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.check_uniqueness(&mut violations);
        self.check_symmetry(&mut violations);
        self.check_liveness(&mut violations);
        self.check_acyclic(&mut violations);
        violations
    }

    fn items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.facts
            .keys()
            .map(|id| ItemId::Fact(*id))
            .chain(self.rules.keys().map(|id| ItemId::Rule(*id)))
    }

    fn check_uniqueness(&self, violations: &mut Vec<Violation>) {
        let mut facts = HashMap::new();
        for (id, entry) in &self.facts {
            if let Some(first) = facts.insert(entry.content.canonical(), *id) {
                violations.push(Violation::Duplicate {
                    first: ItemId::Fact(first),
                    second: ItemId::Fact(*id),
                });
            }
        }
        let mut rules = HashMap::new();
        for (id, entry) in &self.rules {
            if let Some(first) = rules.insert(entry.content.canonical(), *id) {
                violations.push(Violation::Duplicate {
                    first: ItemId::Rule(first),
                    second: ItemId::Rule(*id),
                });
            }
        }
    }

    fn check_symmetry(&self, violations: &mut Vec<Violation>) {
        for item in self.items() {
            let Some(justification) = self.justification(item) else {
                continue;
            };
            for support in &justification.supported_by {
                let recorded = [ItemId::Fact(support.fact), ItemId::Rule(support.rule)]
                    .iter()
                    .all(|side| self.justification(*side).is_some_and(|j| j.supports(item)));
                if !recorded {
                    violations.push(Violation::MissingBackEdge {
                        item,
                        support: *support,
                    });
                }
            }
            for dependent in justification.dependents() {
                let cited = self
                    .justification(dependent)
                    .is_some_and(|j| j.supported_by.iter().any(|s| s.mentions(item)));
                if !cited {
                    violations.push(Violation::DanglingDependent {
                        supporter: item,
                        dependent,
                    });
                }
            }
        }
    }

    fn check_liveness(&self, violations: &mut Vec<Violation>) {
        for item in self.items() {
            if let Some(justification) = self.justification(item) {
                if !justification.asserted && justification.supported_by.is_empty() {
                    violations.push(Violation::Unsupported(item));
                }
            }
        }
    }

    /// Kahn's algorithm over supporter -> dependent edges; whatever cannot be
    /// ordered sits on or behind a cycle
    fn check_acyclic(&self, violations: &mut Vec<Violation>) {
        let mut in_degree: HashMap<ItemId, usize> = self.items().map(|i| (i, 0)).collect();
        let mut edges: HashMap<ItemId, Vec<ItemId>> = HashMap::new();
        for item in self.items() {
            let Some(justification) = self.justification(item) else {
                continue;
            };
            for support in &justification.supported_by {
                for supporter in [ItemId::Fact(support.fact), ItemId::Rule(support.rule)] {
                    edges.entry(supporter).or_default().push(item);
                    *in_degree.entry(item).or_default() += 1;
                }
            }
        }

        let mut ready: VecDeque<ItemId> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(item, _)| *item)
            .collect();
        while let Some(item) = ready.pop_front() {
            for dependent in edges.get(&item).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push_back(*dependent);
                    }
                }
            }
        }

        let mut remaining: Vec<ItemId> = in_degree
            .into_iter()
            .filter(|(_, degree)| *degree > 0)
            .map(|(item, _)| item)
            .collect();
        remaining.sort();
        violations.extend(remaining.into_iter().map(Violation::Cycle));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kb::{FactId, RuleId};
    use crate::parse_item;

    fn derived_kb() -> KnowledgeBase {
        let mut kb = KnowledgeBase::new();
        kb.assert(parse_item("fact: (p a)").unwrap());
        kb.assert(parse_item("rule: ((p ?x)) -> (q ?x)").unwrap());
        kb
    }

    #[test]
    fn detects_missing_back_edge() {
        let mut kb = derived_kb();
        let p = ItemId::Fact(FactId(0));
        let q = ItemId::Fact(FactId(2));
        kb.justification_mut(p).unwrap().remove_dependent(q);

        let violations = kb.check_invariants();
        assert!(matches!(
            violations.as_slice(),
            [Violation::MissingBackEdge { item, .. }] if *item == q
        ));
    }

    #[test]
    fn detects_unsupported_derivation() {
        let mut kb = derived_kb();
        let q = ItemId::Fact(FactId(2));
        kb.justification_mut(q).unwrap().supported_by.clear();

        let violations = kb.check_invariants();
        assert!(violations.contains(&Violation::Unsupported(q)));
        assert!(violations
            .iter()
            .any(|v| matches!(v, Violation::DanglingDependent { dependent, .. } if *dependent == q)));
    }

    #[test]
    fn detects_cycle() {
        let mut kb = derived_kb();
        let p = ItemId::Fact(FactId(0));
        let q = ItemId::Fact(FactId(2));
        let support = Support::new(FactId(2), RuleId(1));
        kb.justification_mut(p).unwrap().supported_by.push(support);
        kb.link(support, p);

        let violations = kb.check_invariants();
        assert!(violations.contains(&Violation::Cycle(p)));
        assert!(violations.contains(&Violation::Cycle(q)));
    }
}
