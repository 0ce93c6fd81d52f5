use crate::ast::Span;
use crate::error::KbError;
use crate::resource_limits::ResourceLimits;
use crate::semantic::{Item, Statement};
use pest::Parser;
use pest_derive::Parser;
use std::sync::Arc;

pub mod items;
pub mod statements;

#[derive(Parser)]
#[grammar = "src/parser/kb.pest"]
pub struct KbParser;

const FORMAT_HINT: &str =
    "items look like `fact: (isa cube block)` or `rule: ((isa ?x block)) -> (movable ?x)`";

/// Parse a knowledge-base source into facts and rules, in source order
pub fn parse(
    content: &str,
    source_id: Option<String>,
    limits: &ResourceLimits,
) -> Result<Vec<Item>, KbError> {
    if content.len() > limits.max_file_size_bytes {
        return Err(KbError::ResourceLimitExceeded {
            limit_name: "max_file_size_bytes".to_string(),
            limit_value: format!(
                "{} bytes ({} MB)",
                limits.max_file_size_bytes,
                limits.max_file_size_bytes / (1024 * 1024)
            ),
            actual_value: format!(
                "{} bytes ({:.2} MB)",
                content.len(),
                content.len() as f64 / (1024.0 * 1024.0)
            ),
            suggestion: "Split the knowledge base into multiple files".to_string(),
        });
    }

    let source_id = source_id.unwrap_or_else(|| "<input>".to_string());
    let pairs = KbParser::parse(Rule::kb_file, content)
        .map_err(|e| syntax_error(e, &source_id, content))?;

    let mut items = Vec::new();
    for pair in pairs.flatten() {
        match pair.as_rule() {
            Rule::fact_item => items.push(items::parse_fact_item(pair)?),
            Rule::rule_item => {
                items.push(items::parse_rule_item(pair, &source_id, content, limits)?)
            }
            _ => {}
        }
    }
    Ok(items)
}

/// Parse a single item; a bare statement is read as a fact
///
/// Used for queries, retractions and command-line arguments.
pub fn parse_item(input: &str) -> Result<Item, KbError> {
    let pair = KbParser::parse(Rule::item_input, input)
        .map_err(|e| syntax_error(e, "<item>", input))?
        .next()
        .and_then(|p| p.into_inner().next())
        .ok_or_else(|| KbError::parse("empty item", Span::point(1, 1), "<item>", Arc::from(input)))?;

    match pair.as_rule() {
        Rule::fact_item => items::parse_fact_item(pair),
        Rule::rule_item => items::parse_rule_item(pair, "<item>", input, &ResourceLimits::default()),
        Rule::statement => Ok(Item::Fact(statements::parse_statement_pair(pair)?)),
        other => Err(KbError::parse(
            format!("unexpected {:?}", other),
            Span::from_pest_span(pair.as_span()),
            "<item>",
            Arc::from(input),
        )),
    }
}

pub fn parse_statement(input: &str) -> Result<Statement, KbError> {
    let pair = KbParser::parse(Rule::statement_input, input)
        .map_err(|e| syntax_error(e, "<statement>", input))?
        .next()
        .and_then(|p| p.into_inner().find(|p| p.as_rule() == Rule::statement))
        .ok_or_else(|| {
            KbError::parse("empty statement", Span::point(1, 1), "<statement>", Arc::from(input))
        })?;
    statements::parse_statement_pair(pair)
}

fn syntax_error(e: pest::error::Error<Rule>, source_id: &str, content: &str) -> KbError {
    let (span, (line, col)) = match e.location {
        pest::error::InputLocation::Pos(pos) => ((pos, pos), line_col(&e.line_col)),
        pest::error::InputLocation::Span((start, end)) => ((start, end), line_col(&e.line_col)),
    };

    KbError::parse_with_suggestion(
        format!("{}", e.variant.message()),
        Span {
            start: span.0,
            end: span.1,
            line,
            col,
        },
        source_id,
        Arc::from(content),
        FORMAT_HINT,
    )
}

fn line_col(location: &pest::error::LineColLocation) -> (usize, usize) {
    match location {
        pest::error::LineColLocation::Pos((line, col)) => (*line, *col),
        pest::error::LineColLocation::Span((start_line, start_col), _) => (*start_line, *start_col),
    }
}
