//! shopledger check - Audit the ledger for consistency errors.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use serde::Serialize;
use shopledger_validate::{validate, Severity};

use crate::report;

use super::{CmdContext, OutputFormat};

/// Arguments for `shopledger check`.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Output format (text or json)
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// A single audit finding in JSON format.
#[derive(Debug, Serialize)]
pub struct JsonFinding {
    /// Severity: "error" or "warning"
    pub severity: String,
    /// Stable error code (e.g. "E1002")
    pub code: String,
    /// Finding message
    pub message: String,
    /// Optional context information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// JSON output structure for the whole audit.
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    /// Every finding, in store order
    pub findings: Vec<JsonFinding>,
    /// Total error count
    pub error_count: usize,
    /// Total warning count
    pub warning_count: usize,
}

/// Audit the ledger; exit 1 when errors are found.
pub fn run<W: Write>(ctx: &CmdContext, args: &Args, writer: &mut W) -> Result<ExitCode> {
    let store = ctx.store().load()?;
    let findings = validate(&store);
    let error_count = findings
        .iter()
        .filter(|finding| matches!(finding.severity(), Severity::Error))
        .count();
    let warning_count = findings.len() - error_count;

    match args.format {
        OutputFormat::Text => {
            report::report_findings(&findings, writer)?;
            report::print_summary(error_count, warning_count, writer)?;
        }
        OutputFormat::Json => {
            let output = JsonOutput {
                findings: findings
                    .iter()
                    .map(|finding| JsonFinding {
                        severity: match finding.severity() {
                            Severity::Error => "error".to_string(),
                            Severity::Warning => "warning".to_string(),
                        },
                        code: finding.code.to_string(),
                        message: finding.message.clone(),
                        context: finding.context.clone(),
                    })
                    .collect(),
                error_count,
                warning_count,
            };
            writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
        }
    }

    if error_count > 0 {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
