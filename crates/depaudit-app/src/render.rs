//! Render use cases: markdown and GitHub annotations from in-memory reports.

use depaudit_render::RenderableReport;

pub fn render_markdown(report: &RenderableReport) -> String {
    depaudit_render::render_markdown(report)
}

pub fn render_annotations(report: &RenderableReport, max: usize) -> Vec<String> {
    depaudit_render::render_github_annotations(report, max)
}
