use std::path::PathBuf;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use log::info;
use pfif_core::{
    default_log_level, init_logging, render_messages, report, Message, PfifDocument,
    PfifVersion, ReportOptions, ReportSummary, Validator, TRUNCATE_THRESHOLD,
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "pfif-validate", version, about = "Validate a PFIF 1.1-1.3 XML document")]
struct Cli {
    /// PFIF XML document to validate.
    path: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Judge expiry against this RFC 3339 instant instead of the clock.
    #[arg(long, value_parser = parse_now)]
    now: Option<DateTime<Utc>>,

    /// Hide error messages in the detailed listing.
    #[arg(long)]
    no_errors: bool,

    /// Hide warning messages in the detailed listing.
    #[arg(long)]
    no_warnings: bool,

    /// Omit the ERROR/WARNING prefix.
    #[arg(long)]
    no_error_type: bool,

    /// Omit line numbers.
    #[arg(long)]
    no_line_numbers: bool,

    /// Omit the source line excerpt.
    #[arg(long)]
    no_full_line: bool,

    /// Omit person and note record ids.
    #[arg(long)]
    no_record_ids: bool,

    /// Omit the tag of the relevant element.
    #[arg(long)]
    no_xml_tag: bool,

    /// Omit the text of the relevant element.
    #[arg(long)]
    no_xml_text: bool,

    /// List every message even when a category is very large.
    #[arg(long)]
    no_truncate: bool,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long, env = "PFIF_LOG_LEVEL")]
    log_level: Option<String>,

    /// Write rolling log files to this absolute directory instead of stderr.
    #[arg(long)]
    log_dir: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: PfifVersion,
    summary: ReportSummary,
    messages: &'a [Message],
}

fn parse_now(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| format!("expected an RFC 3339 timestamp: {err}"))
}

impl Cli {
    fn report_options(&self) -> ReportOptions {
        ReportOptions {
            show_errors: !self.no_errors,
            show_warnings: !self.no_warnings,
            show_error_type: !self.no_error_type,
            show_line_numbers: !self.no_line_numbers,
            show_full_line: !self.no_full_line,
            show_record_ids: !self.no_record_ids,
            show_xml_tag: !self.no_xml_tag,
            show_xml_text: !self.no_xml_text,
            truncate: !self.no_truncate,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Quiet by default on stderr; a log directory gets the build-mode default.
    let level = cli.log_level.as_deref().unwrap_or(match cli.log_dir {
        Some(_) => default_log_level(),
        None => "warn",
    });
    init_logging(level, cli.log_dir.as_deref()).map_err(anyhow::Error::msg)?;

    let xml = std::fs::read_to_string(&cli.path)
        .with_context(|| format!("read '{}'", cli.path.display()))?;
    let doc = PfifDocument::parse(&xml)
        .with_context(|| format!("parse '{}'", cli.path.display()))?;

    let validator = match cli.now {
        Some(now) => Validator::with_now(&doc, now),
        None => Validator::new(&doc),
    };
    let messages = validator
        .run()
        .with_context(|| format!("validate '{}'", cli.path.display()))?;

    match cli.format {
        OutputFormat::Text => {
            print!("{}", ReportSummary::from_messages(&messages).render());
            println!();
            print!("{}", render_messages(&messages, &cli.report_options(), doc.lines()));
        }
        OutputFormat::Json => {
            let listed = if cli.no_truncate {
                messages.clone()
            } else {
                report::truncate(&messages, TRUNCATE_THRESHOLD)
            };
            let body = JsonReport {
                version: doc.version(),
                summary: ReportSummary::from_messages(&messages),
                messages: &listed,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&body).context("serialize report")?
            );
        }
    }

    info!(
        "event=cli_report module=cli status=ok format={:?} messages={}",
        cli.format,
        messages.len()
    );
    Ok(())
}
