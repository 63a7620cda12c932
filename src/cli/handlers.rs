//! Subcommand handlers
//!
//! Handlers return process exit codes: 0 success, 1 conversion failure,
//! 2 usage or configuration failure. Errors print to stderr; results go
//! to stdout or `--output`.

use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::cli::commands::{BatchArgs, ConvertArgs, EnvelopeArgs, VersionsArgs};
use crate::cli::output::{BatchLineReport, OutputFormatter};
use crate::config::CroconConfig;
use crate::convert::Kind;
use crate::model::Edition;
use crate::nbt::{json, Compound};
use crate::{cache, convert, envelope};

pub const EXIT_OK: i32 = 0;
pub const EXIT_CONVERSION: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

pub fn handle_convert(args: &ConvertArgs, config: &CroconConfig) -> i32 {
    let data = match load_payload(&args.payload, args.input.as_deref()) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            return EXIT_USAGE;
        }
    };

    let from: Edition = args.from_edition.into();
    let to: Edition = args.to_edition.into();
    let from_version = version_for(from, &args.from_version, config);
    let to_version = version_for(to, &args.to_version, config);
    debug!(%from, %to, from_version, to_version, "Converting");

    let result = run_conversion(args.kind.into(), from, to, &from_version, &to_version, &data);
    let result = match result {
        Ok(result) => result,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            return EXIT_CONVERSION;
        }
    };

    let formatter = OutputFormatter::new(args.format.into());
    match formatter
        .format_result(&result)
        .and_then(|text| write_output(args.output.as_deref(), &text))
    {
        Ok(()) => EXIT_OK,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            EXIT_USAGE
        }
    }
}

/// One line of a batch file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BatchLine {
    kind: String,
    #[serde(default = "default_from_edition")]
    from_edition: Edition,
    #[serde(default = "default_to_edition")]
    to_edition: Edition,
    #[serde(default)]
    from_version: Option<String>,
    #[serde(default)]
    to_version: Option<String>,
    data: serde_json::Value,
}

fn default_from_edition() -> Edition {
    Edition::Java
}

fn default_to_edition() -> Edition {
    Edition::Bedrock
}

pub fn handle_batch(args: &BatchArgs, config: &CroconConfig, quiet: bool) -> i32 {
    let text = match fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))
    {
        Ok(text) => text,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            return EXIT_USAGE;
        }
    };

    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    let progress = if quiet || !atty::is(atty::Stream::Stderr) {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(lines.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                .expect("progress template is valid"),
        );
        bar
    };

    let mut reports = Vec::with_capacity(lines.len());
    for (line_no, line) in lines {
        let report = match run_batch_line(line, config) {
            Ok(result) => BatchLineReport {
                line: line_no,
                ok: true,
                result: Some(json::compound_to_json(&result)),
                error: None,
            },
            Err(err) => BatchLineReport {
                line: line_no,
                ok: false,
                result: None,
                error: Some(format!("{:#}", err)),
            },
        };
        let failed = !report.ok;
        reports.push(report);
        progress.inc(1);
        if failed && args.fail_fast {
            break;
        }
    }
    progress.finish_and_clear();

    let any_failed = reports.iter().any(|r| !r.ok);
    let formatter = OutputFormatter::new(args.format.into());
    match formatter
        .format_batch(&reports)
        .and_then(|text| write_output(args.output.as_deref(), &text))
    {
        Ok(()) if any_failed => EXIT_CONVERSION,
        Ok(()) => EXIT_OK,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            EXIT_USAGE
        }
    }
}

pub fn handle_envelope(args: &EnvelopeArgs) -> i32 {
    let input = match &args.payload {
        Some(payload) => payload.clone(),
        None => {
            let mut buffer = String::new();
            if let Err(err) = std::io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error: failed to read stdin: {}", err);
                return EXIT_USAGE;
            }
            buffer
        }
    };

    let response = envelope::process(args.kind.into(), &input);
    println!("{}", response);

    // exit code tracks the wire-level success flag
    match envelope::decode_response(&response) {
        Ok(decoded) if decoded.get_int("success") == Some(1) => EXIT_OK,
        _ => EXIT_CONVERSION,
    }
}

pub fn handle_versions(args: &VersionsArgs) -> i32 {
    let editions: Vec<Edition> = match args.edition {
        Some(edition) => vec![edition.into()],
        None => vec![Edition::Java, Edition::Bedrock],
    };
    let formatter = OutputFormatter::new(args.format.into());
    match formatter.format_versions(&editions) {
        Ok(text) => {
            print!("{}", text);
            EXIT_OK
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            EXIT_USAGE
        }
    }
}

fn run_conversion(
    kind: Kind,
    from: Edition,
    to: Edition,
    from_version: &str,
    to_version: &str,
    data: &Compound,
) -> Result<Compound> {
    let (java, bedrock) = envelope::assign_versions(from, to, from_version, to_version);
    let cache = cache::get_or_create(&java, &bedrock)?;
    Ok(convert::convert(kind, &cache, from, to, data)?)
}

fn run_batch_line(line: &str, config: &CroconConfig) -> Result<Compound> {
    let parsed: BatchLine = serde_json::from_str(line).context("Invalid request object")?;
    let kind: Kind = parsed.kind.parse().map_err(|e| anyhow!("{}", e))?;
    let from_version = version_for(parsed.from_edition, &parsed.from_version, config);
    let to_version = version_for(parsed.to_edition, &parsed.to_version, config);
    let data = json::compound_from_json(&parsed.data);
    run_conversion(
        kind,
        parsed.from_edition,
        parsed.to_edition,
        &from_version,
        &to_version,
        &data,
    )
}

fn version_for(edition: Edition, requested: &Option<String>, config: &CroconConfig) -> String {
    match requested {
        Some(version) => version.clone(),
        None => match edition {
            Edition::Java => config.default_java_version.clone(),
            Edition::Bedrock => config.default_bedrock_version.clone(),
        },
    }
}

fn load_payload(payload: &Option<String>, input: Option<&Path>) -> Result<Compound> {
    let text = match (payload, input) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer
        }
    };
    let value: serde_json::Value =
        serde_json::from_str(&text).context("Payload is not valid JSON")?;
    if !value.is_object() {
        return Err(anyhow!("Payload must be a JSON object"));
    }
    Ok(json::compound_from_json(&value))
}

fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{}", text.trim_end());
            Ok(())
        }
    }
}
