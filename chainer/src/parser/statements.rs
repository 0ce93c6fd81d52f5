use crate::error::KbError;
use crate::parser::Rule;
use crate::semantic::{Statement, Term};
use pest::iterators::Pair;

pub(crate) fn parse_statement_pair(pair: Pair<Rule>) -> Result<Statement, KbError> {
    let mut predicate = None;
    let mut terms = Vec::new();

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::predicate => predicate = Some(inner_pair.as_str().to_string()),
            Rule::symbol => terms.push(Term::constant(inner_pair.as_str())),
            Rule::variable => terms.push(Term::variable(&inner_pair.as_str()[1..])),
            _ => {}
        }
    }

    let predicate = predicate.ok_or_else(|| {
        KbError::Engine("Grammar error: statement missing predicate".to_string())
    })?;
    Ok(Statement::new(predicate, terms))
}
