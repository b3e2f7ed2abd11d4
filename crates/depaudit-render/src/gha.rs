use crate::{RenderableReport, RenderableSeverity};

/// Render diagnostics as GitHub Actions workflow command annotations, most severe first.
///
/// Format:
/// `::{level} title={checker}/{code}::{package}: {message}`
///
/// At most `max` annotations are produced.
pub fn render_github_annotations(report: &RenderableReport, max: usize) -> Vec<String> {
    let mut out = Vec::new();

    for d in report.diagnostics.iter().take(max) {
        let level = match d.severity {
            RenderableSeverity::Deny => "error",
            RenderableSeverity::Warn => "warning",
            RenderableSeverity::Note => "notice",
        };

        let title = escape_property(&format!("{}/{}", d.checker, d.code));
        let message = match &d.package {
            Some(package) => format!("{}: {}", package, d.message),
            None => d.message.clone(),
        };

        out.push(format!("::{} title={}::{}", level, title, escape_data(&message)));
    }

    out
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
