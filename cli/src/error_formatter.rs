use ariadne::{Color, Label, Report, ReportKind, Source};
use chainer::KbError;

/// Format a KbError with fancy terminal output using Ariadne
pub fn format_error(error: &KbError) -> String {
    match error {
        KbError::Parse(details) => {
            let mut output = Vec::new();

            let message = format!(
                "Parse error: {} (file {}:{}:{})",
                details.message, details.source_id, details.span.line, details.span.col
            );

            let mut report =
                Report::build(ReportKind::Error, &details.source_id, details.span.start)
                    .with_message(message)
                    .with_label(
                        Label::new((&details.source_id, details.span.start..details.span.end))
                            .with_message("here")
                            .with_color(Color::Red),
                    );

            if let Some(suggestion) = &details.suggestion {
                report = report.with_help(suggestion);
            }

            match report.finish().write(
                (
                    &details.source_id,
                    Source::from(details.source_text.as_ref()),
                ),
                &mut output,
            ) {
                Ok(_) => String::from_utf8_lossy(&output).to_string(),
                Err(_) => format!("{}", error),
            }
        }
        KbError::InvalidRule(msg) => format!("Invalid rule: {}", msg),
        KbError::Engine(msg) => format!("Engine error: {}", msg),
        KbError::ResourceLimitExceeded {
            limit_name,
            limit_value,
            actual_value,
            suggestion,
        } => {
            format!(
                "Resource limit exceeded: {}\n  Limit: {}\n  Actual: {}\n  {}",
                limit_name, limit_value, actual_value, suggestion
            )
        }
        KbError::MultipleErrors(errors) => {
            let mut result = String::from("Multiple errors occurred:\n\n");
            for error in errors {
                result.push_str(&format_error(error));
                result.push_str("\n\n");
            }
            result
        }
    }
}
