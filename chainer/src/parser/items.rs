use crate::ast::Span;
use crate::error::KbError;
use crate::parser::statements::parse_statement_pair;
use crate::parser::Rule;
use crate::resource_limits::ResourceLimits;
use crate::semantic::{Item, Rule as KbRule};
use pest::iterators::Pair;
use std::sync::Arc;

pub(crate) fn parse_fact_item(pair: Pair<Rule>) -> Result<Item, KbError> {
    let statement = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::statement)
        .ok_or_else(|| KbError::Engine("Grammar error: fact missing statement".to_string()))?;
    Ok(Item::Fact(parse_statement_pair(statement)?))
}

pub(crate) fn parse_rule_item(
    pair: Pair<Rule>,
    source_id: &str,
    source: &str,
    limits: &ResourceLimits,
) -> Result<Item, KbError> {
    let span = Span::from_pest_span(pair.as_span());
    let mut lhs = Vec::new();
    let mut rhs = None;

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::antecedents => {
                for clause in inner_pair.into_inner() {
                    lhs.push(parse_statement_pair(clause)?);
                }
            }
            Rule::statement => rhs = Some(parse_statement_pair(inner_pair)?),
            _ => {}
        }
    }

    if lhs.len() > limits.max_rule_clauses {
        return Err(KbError::ResourceLimitExceeded {
            limit_name: "max_rule_clauses".to_string(),
            limit_value: limits.max_rule_clauses.to_string(),
            actual_value: lhs.len().to_string(),
            suggestion: format!(
                "Split the rule at line {} into smaller rules",
                span.line
            ),
        });
    }

    let rhs = rhs.ok_or_else(|| {
        KbError::parse(
            "rule has no conclusion",
            span.clone(),
            source_id,
            Arc::from(source),
        )
    })?;
    let rule = KbRule::new(lhs, rhs).map_err(|e| {
        KbError::parse(e.to_string(), span, source_id, Arc::from(source))
    })?;
    Ok(Item::Rule(rule))
}
