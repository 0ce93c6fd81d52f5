use chainer::{Answer, Item, KbSnapshot, Retraction, SupportView, Violation};
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Row, Table};

pub struct Formatter {}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {}
    }

    /// One table per query: a column per query variable plus the matched fact
    pub fn format_answers(&self, query: &Item, answers: &[Answer]) -> String {
        let mut output = format!("? {}\n", query);

        if answers.is_empty() {
            output.push_str("no\n\n");
            return output;
        }

        let variables: Vec<String> = match query {
            Item::Fact(statement) => {
                let mut seen = Vec::new();
                for name in statement.variables() {
                    if !seen.iter().any(|s: &String| s == name) {
                        seen.push(name.to_string());
                    }
                }
                seen
            }
            Item::Rule(_) => Vec::new(),
        };

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        let mut header: Vec<Cell> = variables
            .iter()
            .map(|v| Cell::new(format!("?{}", v)).set_alignment(CellAlignment::Left))
            .collect();
        header.push(Cell::new("Fact").set_alignment(CellAlignment::Left));
        table.set_header(Row::from(header));

        for answer in answers {
            let mut row: Vec<String> = variables
                .iter()
                .map(|v| {
                    answer
                        .bindings
                        .bound_to(v)
                        .map(|t| t.to_string())
                        .unwrap_or_else(|| "?".to_string())
                })
                .collect();
            row.push(
                answer
                    .facts
                    .iter()
                    .map(|f| f.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            );
            table.add_row(Row::from(row));
        }

        output.push_str(&table.to_string());
        output.push_str("\n\n");
        output
    }

    pub fn format_retraction(&self, item: &Item, retraction: &Retraction) -> String {
        if retraction.is_noop() {
            return format!("Retract {}: nothing to do\n", item);
        }
        if retraction.demoted {
            return format!("Retract {}: still derivable, no longer asserted\n", item);
        }

        let mut output = format!(
            "Retract {}: removed {} fact(s), {} rule(s)\n",
            item,
            retraction.removed_facts.len(),
            retraction.removed_rules.len()
        );
        for fact in &retraction.removed_facts {
            output.push_str(&format!("  - fact: {}\n", fact));
        }
        for rule in &retraction.removed_rules {
            output.push_str(&format!("  - rule: {}\n", rule));
        }
        output
    }

    pub fn format_knowledge_base(&self, snapshot: &KbSnapshot) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Id").set_alignment(CellAlignment::Left),
            Cell::new("Item").set_alignment(CellAlignment::Left),
            Cell::new("Asserted").set_alignment(CellAlignment::Center),
            Cell::new("Supported by").set_alignment(CellAlignment::Left),
        ]));

        for fact in &snapshot.facts {
            table.add_row(Row::from(vec![
                fact.id.to_string(),
                format!("fact: {}", fact.statement),
                yes_no(fact.asserted),
                supports(&fact.supported_by),
            ]));
        }
        for rule in &snapshot.rules {
            table.add_row(Row::from(vec![
                rule.id.to_string(),
                format!("rule: {}", rule.rule),
                yes_no(rule.asserted),
                supports(&rule.supported_by),
            ]));
        }

        format!("{}\n", table)
    }

    pub fn format_workspace_summary(&self, file_count: usize, snapshot: &KbSnapshot) -> String {
        let asserted_rules = snapshot.rules.iter().filter(|r| r.asserted).count();
        let mut output = String::new();
        output.push_str(&format!("Workspace contains {} files\n\n", file_count));
        output.push_str(&format!(
            "facts: {} ({} asserted, {} derived)\n",
            snapshot.facts.len(),
            snapshot.asserted_facts().count(),
            snapshot.derived_facts().count()
        ));
        output.push_str(&format!(
            "rules: {} ({} asserted, {} derived)\n",
            snapshot.rules.len(),
            asserted_rules,
            snapshot.rules.len() - asserted_rules
        ));
        output
    }

    pub fn format_violations(&self, violations: &[Violation]) -> String {
        if violations.is_empty() {
            return "Knowledge base is consistent\n".to_string();
        }
        let mut output = format!("Found {} violation(s)\n", violations.len());
        for violation in violations {
            output.push_str(&format!("  - {}\n", violation));
        }
        output
    }
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "yes" } else { "no" };
    text.to_string()
}

fn supports(views: &[SupportView]) -> String {
    views
        .iter()
        .map(|s| format!("{} + {}", s.fact, s.rule))
        .collect::<Vec<_>>()
        .join("\n")
}
