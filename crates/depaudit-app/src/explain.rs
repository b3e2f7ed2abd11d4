//! The `explain` use case: look up checker/code documentation.

use depaudit_types::explain::{self, Explanation};

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    /// Found an explanation for the identifier.
    Found(Explanation),
    /// Unknown identifier; includes available checker IDs and codes.
    NotFound {
        identifier: String,
        available_check_ids: &'static [&'static str],
        available_codes: &'static [&'static str],
    },
}

/// Look up an explanation for a checker ID or code.
pub fn run_explain(identifier: &str) -> ExplainOutput {
    match explain::lookup_explanation(identifier) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_check_ids: explain::all_check_ids(),
            available_codes: explain::all_codes(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();

    out.push_str(exp.title);
    out.push('\n');
    out.push_str(&"=".repeat(exp.title.len()));
    out.push_str("\n\n");
    out.push_str(exp.description);
    out.push_str("\n\nRemediation\n-----------\n");
    out.push_str(exp.remediation);
    out.push_str("\n\nExamples\n--------\n\n");
    push_toml_block(&mut out, "Before (diagnostic):", exp.examples.before);
    out.push('\n');
    push_toml_block(&mut out, "After (passes):", exp.examples.after);

    out
}

fn push_toml_block(out: &mut String, heading: &str, body: &str) {
    out.push_str(heading);
    out.push_str("\n```toml\n");
    out.push_str(body.trim_end());
    out.push_str("\n```\n");
}

/// Format the "not found" message for terminal display.
pub fn format_not_found(identifier: &str, check_ids: &[&str], codes: &[&str]) -> String {
    let mut out = format!("Unknown checker or code: {identifier}\n\nAvailable checkers:\n");
    for id in check_ids {
        out.push_str(&format!("  - {id}\n"));
    }
    out.push_str("\nAvailable codes:\n");
    for code in codes {
        out.push_str(&format!("  - {code}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unwrap_found(output: ExplainOutput) -> Explanation {
        match output {
            ExplainOutput::Found(exp) => exp,
            ExplainOutput::NotFound { identifier, .. } => panic!("expected {identifier} to be found"),
        }
    }

    #[test]
    fn explain_known_checker_and_code() {
        assert!(matches!(run_explain("licenses"), ExplainOutput::Found(_)));
        assert!(matches!(
            run_explain("license_not_allowed"),
            ExplainOutput::Found(_)
        ));
    }

    #[test]
    fn every_listed_identifier_is_explained() {
        for id in explain::all_check_ids().iter().chain(explain::all_codes()) {
            assert!(
                matches!(run_explain(id), ExplainOutput::Found(_)),
                "{id} has no explanation"
            );
        }
    }

    #[test]
    fn explain_unknown() {
        match run_explain("not_a_real_thing") {
            ExplainOutput::NotFound {
                identifier,
                available_check_ids,
                available_codes,
            } => {
                assert_eq!(identifier, "not_a_real_thing");
                assert_eq!(available_check_ids.len(), 4);
                assert!(!available_codes.is_empty());
            }
            ExplainOutput::Found(_) => panic!("expected NotFound"),
        }
    }

    #[test]
    fn format_explanation_output() {
        let exp = unwrap_found(run_explain("bans"));
        let formatted = format_explanation(&exp);
        assert!(formatted.starts_with(exp.title));
        assert!(formatted.contains("Remediation"));
        assert!(formatted.contains("Before (diagnostic):\n```toml\n"));
        assert!(formatted.contains("After (passes):\n```toml\n"));
    }

    #[test]
    fn format_not_found_output() {
        let formatted = format_not_found("missing", &["bans", "sources"], &["yanked"]);
        assert!(formatted.contains("Unknown checker or code: missing"));
        assert!(formatted.contains("  - bans\n  - sources\n"));
        assert!(formatted.contains("Available codes:\n  - yanked\n"));
    }
}
