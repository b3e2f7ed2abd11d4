use crate::{RenderableReport, RenderableSeverity, RenderableVerdictStatus};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# depaudit report\n\n");
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Warn => "WARN",
        RenderableVerdictStatus::Fail => "FAIL",
    };
    out.push_str(&format!(
        "- Verdict: **{}**\n- Diagnostics: {} deny / {} warn / {} note\n- Packages scanned: {}\n",
        verdict,
        report.counts.deny,
        report.counts.warn,
        report.counts.note,
        report.data.packages_scanned
    ));
    if !report.data.checks.is_empty() {
        out.push_str(&format!("- Checks: {}\n", report.data.checks.join(", ")));
    }
    out.push('\n');

    if report.diagnostics.is_empty() {
        out.push_str("No diagnostics.\n");
        return out;
    }

    out.push_str("## Diagnostics\n\n");

    for d in &report.diagnostics {
        let sev = match d.severity {
            RenderableSeverity::Note => "NOTE",
            RenderableSeverity::Warn => "WARN",
            RenderableSeverity::Deny => "DENY",
        };

        match &d.package {
            Some(package) => out.push_str(&format!(
                "- [{}] `{}` / `{}` `{}`: {}\n",
                sev, package, d.checker, d.code, d.message
            )),
            None => out.push_str(&format!(
                "- [{}] `{}` `{}`: {}\n",
                sev, d.checker, d.code, d.message
            )),
        }

        if let Some(help) = &d.help {
            out.push_str(&format!("  - help: {}\n", help));
        }
        if let Some(url) = &d.url {
            out.push_str(&format!("  - url: {}\n", url));
        }
    }

    out
}
