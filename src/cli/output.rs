//! Output formatting for multiple formats
//!
//! Formatters for JSON, YAML and human-readable text. Conversion results
//! are NBT compounds; they cross into the formatter through the JSON
//! bridge so the three formats agree on structure.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::model::Edition;
use crate::nbt::{json, Compound};
use crate::versions::{self, GameVersion};

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format (human-friendly, version-control friendly)
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Result of one batch line, for the batch report.
#[derive(Debug, serde::Serialize)]
pub struct BatchLineReport {
    pub line: usize,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Output formatter for conversion results
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    /// Creates a new output formatter with the specified format
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a conversion result compound
    pub fn format_result(&self, result: &Compound) -> Result<String> {
        let value = json::compound_to_json(result);
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&value).context("Failed to serialize result to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(&value).context("Failed to serialize result to YAML")
            }
            OutputFormat::Human => Ok(self.format_value_human(&value)),
        }
    }

    /// Formats the supported-version listing
    pub fn format_versions(&self, editions: &[Edition]) -> Result<String> {
        let listing: Vec<(Edition, &[GameVersion])> = editions
            .iter()
            .map(|&edition| (edition, versions::supported(edition)))
            .collect();

        match self.format {
            OutputFormat::Json | OutputFormat::Yaml => {
                let value: Value = listing
                    .iter()
                    .map(|(edition, supported)| {
                        (
                            edition.name().to_string(),
                            Value::Array(
                                supported
                                    .iter()
                                    .map(|v| Value::String(v.to_string()))
                                    .collect(),
                            ),
                        )
                    })
                    .collect::<serde_json::Map<String, Value>>()
                    .into();
                if self.format == OutputFormat::Json {
                    serde_json::to_string_pretty(&value)
                        .context("Failed to serialize versions to JSON")
                } else {
                    serde_yaml::to_string(&value).context("Failed to serialize versions to YAML")
                }
            }
            OutputFormat::Human => {
                let mut output = String::new();
                for (edition, supported) in listing {
                    output.push_str(&format!("{} Edition\n", edition.display_name()));
                    if use_decorations() {
                        output.push_str(&"\u{2501}".repeat(40));
                        output.push('\n');
                    }
                    for version in supported {
                        output.push_str(&format!("  {}\n", version));
                    }
                    output.push('\n');
                }
                Ok(output)
            }
        }
    }

    /// Formats the batch report: per-line results plus a summary
    pub fn format_batch(&self, reports: &[BatchLineReport]) -> Result<String> {
        let failed = reports.iter().filter(|r| !r.ok).count();
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
                "results": reports,
                "total": reports.len(),
                "succeeded": reports.len() - failed,
                "failed": failed,
            }))
            .context("Failed to serialize batch report to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(&reports)
                .context("Failed to serialize batch report to YAML"),
            OutputFormat::Human => {
                let mut output = String::new();
                for report in reports {
                    match (&report.result, &report.error) {
                        (Some(result), _) if report.ok => {
                            output.push_str(&format!(
                                "line {}: {}\n",
                                report.line,
                                serde_json::to_string(result)
                                    .unwrap_or_else(|_| "<unprintable>".to_string())
                            ));
                        }
                        (_, Some(error)) => {
                            output.push_str(&format!("line {}: ERROR: {}\n", report.line, error));
                        }
                        _ => {}
                    }
                }
                output.push_str(&format!(
                    "\n{} total, {} succeeded, {} failed\n",
                    reports.len(),
                    reports.len() - failed,
                    failed
                ));
                Ok(output)
            }
        }
    }

    // `key: value` lines, nested objects indented. Lists stay JSON.
    fn format_value_human(&self, value: &Value) -> String {
        let mut output = String::new();
        render_human(value, 0, &mut output);
        output
    }
}

fn use_decorations() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn render_human(value: &Value, indent: usize, output: &mut String) {
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                match value {
                    Value::Object(_) => {
                        output.push_str(&format!("{}{}:\n", "  ".repeat(indent), key));
                        render_human(value, indent + 1, output);
                    }
                    _ => {
                        output.push_str(&format!(
                            "{}{}: {}\n",
                            "  ".repeat(indent),
                            key,
                            render_scalar(value)
                        ));
                    }
                }
            }
        }
        other => {
            output.push_str(&format!("{}{}\n", "  ".repeat(indent), render_scalar(other)));
        }
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
