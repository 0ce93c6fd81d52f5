//! # Chainer Engine
//!
//! **Forward chaining that remembers why**
//!
//! Chainer is a knowledge base of facts and rules over first-order-style
//! statements. Every time a fact or rule is added, the engine fires it against
//! its counterparts and stores the conclusions together with their
//! justification, so retracting a fact withdraws exactly the knowledge that
//! depended on it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chainer::{parse_item, KnowledgeBase, KbResult};
//!
//! fn main() -> KbResult<()> {
//!     let mut kb = KnowledgeBase::new();
//!
//!     kb.assert(parse_item("fact: (isa cube block)")?);
//!     kb.assert(parse_item("rule: ((isa ?x block)) -> (movable ?x)")?);
//!
//!     let answers = kb.ask(parse_item("fact: (movable ?what)")?);
//!     assert_eq!(answers.len(), 1);
//!
//!     kb.retract(parse_item("fact: (isa cube block)")?);
//!     assert!(kb.ask(parse_item("fact: (movable ?what)")?).is_empty());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Facts
//! A fact is a statement such as `(isa cube block)`. Facts are either
//! asserted by the caller or derived by rules.
//!
//! ### Rules
//! A rule is a conjunction of statements implying a conclusion. Firing a rule
//! consumes its first clause: a rule with one clause yields a fact, a rule with
//! more clauses yields a narrower rule.
//!
//! ### Justifications
//! Each derived item records the `(fact, rule)` pairs that produced it. An item
//! survives a retraction as long as one justification remains or it was
//! asserted explicitly.

pub mod ast;
pub mod error;
pub mod inference;
pub mod kb;
pub mod parser;
pub mod resource_limits;
pub mod response;
pub mod semantic;
pub mod unify;

pub use ast::Span;
pub use error::KbError;
pub use inference::InferenceEngine;
pub use kb::{Entry, FactEntry, FactId, ItemId, KnowledgeBase, RuleEntry, RuleId, Support, Violation};
pub use parser::{parse, parse_item, parse_statement};
pub use resource_limits::ResourceLimits;
pub use response::{Answer, FactView, KbSnapshot, Retraction, RuleView, SupportView};
pub use semantic::{Item, Rule, Statement, Term};
pub use unify::{factq, instantiate, match_statements, Binding, Bindings};

/// Result type for Chainer operations
pub type KbResult<T> = Result<T, KbError>;

#[cfg(test)]
mod tests;
