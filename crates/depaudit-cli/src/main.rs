//! CLI entry point for depaudit.
//!
//! This module is intentionally thin: it handles argument parsing, logging, I/O, and exit codes.
//! All business logic lives in the `depaudit-app` crate.

#![forbid(unsafe_code)]

mod fetch;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use depaudit_advisories::AdvisoryFetcher;
use depaudit_app::{
    CheckInput, EXIT_CONFIG_ERROR, ExplainOutput, parse_report_json, render_annotations,
    render_markdown, run_check, run_explain, serialize_report, to_renderable, verdict_exit_code,
};
use depaudit_domain::checks::CheckSet;
use depaudit_settings::Overrides;
use depaudit_types::{AuditReport, CheckerKind};
use tracing_subscriber::EnvFilter;

use crate::fetch::ReqwestFetcher;

#[derive(Parser, Debug)]
#[command(
    name = "depaudit",
    version,
    about = "Dependency policy audit: advisories, licenses, bans and sources"
)]
struct Cli {
    /// Path to depaudit config TOML. A missing file means defaults.
    #[arg(long, global = true, default_value = "depaudit.toml")]
    config: Utf8PathBuf,

    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum CheckArg {
    Advisories,
    Licenses,
    Bans,
    Sources,
    All,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate policy against a resolved dependency graph and write artifacts.
    Check {
        /// Checkers to run (default: all).
        #[arg(value_enum)]
        checks: Vec<CheckArg>,

        /// Resolved graph: a JSON snapshot or a Cargo.lock.
        #[arg(long, default_value = "Cargo.lock")]
        graph: Utf8PathBuf,

        /// Override `advisories.db-path`.
        #[arg(long)]
        advisory_db: Option<Utf8PathBuf>,

        /// Refresh the advisory database from `advisories.db-urls` first.
        #[arg(long)]
        fetch: bool,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/depaudit/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/depaudit/comment.md")]
        markdown_out: Utf8PathBuf,

        /// Print GitHub Actions annotations to stdout.
        #[arg(long)]
        annotations: bool,

        /// Maximum number of annotations to print.
        #[arg(long, default_value = "10")]
        max_annotations: usize,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/depaudit/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/depaudit/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a checker or diagnostic code with remediation guidance.
    Explain {
        /// A checker (e.g. "licenses") or code (e.g. "license_not_allowed").
        identifier: String,
    },
}

struct CheckArgs {
    checks: Vec<CheckArg>,
    graph: Utf8PathBuf,
    advisory_db: Option<Utf8PathBuf>,
    fetch: bool,
    report_out: Utf8PathBuf,
    write_markdown: bool,
    markdown_out: Utf8PathBuf,
    annotations: bool,
    max_annotations: usize,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.cmd {
        Commands::Check {
            checks,
            graph,
            advisory_db,
            fetch,
            report_out,
            write_markdown,
            markdown_out,
            annotations,
            max_annotations,
        } => cmd_check(
            &cli.config,
            CheckArgs {
                checks,
                graph,
                advisory_db,
                fetch,
                report_out,
                write_markdown,
                markdown_out,
                annotations,
                max_annotations,
            },
        ),
        Commands::Md { report, output } => cmd_md(report, output),
        Commands::Annotations { report, max } => cmd_annotations(report, max),
        Commands::Explain { identifier } => Ok(cmd_explain(&identifier)),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("depaudit error: {err:#}");
            std::process::exit(EXIT_CONFIG_ERROR);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn check_set(args: &[CheckArg]) -> CheckSet {
    if args.is_empty() || args.contains(&CheckArg::All) {
        return CheckSet::all();
    }
    args.iter()
        .filter_map(|arg| match arg {
            CheckArg::Advisories => Some(CheckerKind::Advisories),
            CheckArg::Licenses => Some(CheckerKind::Licenses),
            CheckArg::Bans => Some(CheckerKind::Bans),
            CheckArg::Sources => Some(CheckerKind::Sources),
            CheckArg::All => None,
        })
        .collect()
}

fn read_config(path: &Utf8Path) -> anyhow::Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(%path, "config file not found; using defaults");
            Ok(String::new())
        }
        Err(err) => Err(err).with_context(|| format!("read config: {path}")),
    }
}

fn cmd_check(config: &Utf8Path, args: CheckArgs) -> anyhow::Result<i32> {
    let cfg_text = read_config(config)?;
    let overrides = Overrides {
        advisory_db_path: args.advisory_db.map(Utf8PathBuf::into_string),
    };
    let fetcher = args
        .fetch
        .then_some(&ReqwestFetcher as &dyn AdvisoryFetcher);

    let input = CheckInput {
        config_text: &cfg_text,
        overrides,
        graph_path: &args.graph,
        checks: check_set(&args.checks),
        fetcher,
    };
    let output = run_check(input)?;
    let report = output.report;

    write_report_file(&args.report_out, &report).context("write report json")?;

    if args.write_markdown || args.annotations {
        let renderable = to_renderable(&report);
        if args.write_markdown {
            let md = render_markdown(&renderable);
            write_text_file(&args.markdown_out, &md).context("write markdown")?;
        }
        if args.annotations {
            for annotation in render_annotations(&renderable, args.max_annotations) {
                println!("{annotation}");
            }
        }
    }

    let counts = &report.verdict.counts;
    eprintln!(
        "depaudit: {} ({} deny, {} warn, {} note)",
        report.verdict.status.as_str(),
        counts.deny,
        counts.warn,
        counts.note
    );

    Ok(verdict_exit_code(report.verdict.status))
}

fn write_report_file(path: &Utf8Path, report: &AuditReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    let data = serialize_report(report)?;
    std::fs::write(path, data).with_context(|| format!("write report: {path}"))?;
    Ok(())
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, text).with_context(|| format!("write text: {path}"))?;
    Ok(())
}

fn read_report(path: &Utf8Path) -> anyhow::Result<AuditReport> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read report: {path}"))?;
    parse_report_json(&text)
}

fn cmd_md(report_path: Utf8PathBuf, output: Option<Utf8PathBuf>) -> anyhow::Result<i32> {
    let report = read_report(&report_path)?;
    let md = render_markdown(&to_renderable(&report));

    match output {
        Some(out_path) => write_text_file(&out_path, &md).context("write markdown output")?,
        None => print!("{md}"),
    }
    Ok(0)
}

fn cmd_annotations(report_path: Utf8PathBuf, max: usize) -> anyhow::Result<i32> {
    let report = read_report(&report_path)?;
    for annotation in render_annotations(&to_renderable(&report), max) {
        println!("{annotation}");
    }
    Ok(0)
}

fn cmd_explain(identifier: &str) -> i32 {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", depaudit_app::format_explanation(&exp));
            0
        }
        ExplainOutput::NotFound {
            identifier,
            available_check_ids,
            available_codes,
        } => {
            eprint!(
                "{}",
                depaudit_app::format_not_found(&identifier, available_check_ids, available_codes)
            );
            EXIT_CONFIG_ERROR
        }
    }
}
