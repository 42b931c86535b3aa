//! Output formatting shared by CLI commands

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

/// Print `data` as JSON or YAML.
///
/// Table output needs per-type column layout, so callers handle
/// [`OutputFormat::Table`] themselves and only fall through here otherwise.
pub fn print_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", to_json(data)?),
        OutputFormat::Yaml => println!("{}", to_yaml(data)?),
        OutputFormat::Table => anyhow::bail!("Table output is not available for this command"),
    }
    Ok(())
}

pub fn to_json<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data).context("Failed to serialize to JSON")
}

pub fn to_yaml<T: Serialize>(data: &T) -> Result<String> {
    serde_yaml::to_string(data).context("Failed to serialize to YAML")
}

/// Truncate to `max_len` characters, marking the cut with "..."
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

pub fn print_table_header(columns: &[(&str, usize)]) {
    println!();
    let header: Vec<String> =
        columns.iter().map(|(name, width)| format!("{:<width$}", name, width = width)).collect();
    println!("{}", header.join(" ").trim_end());

    let total_width: usize = columns.iter().map(|(_, w)| w + 1).sum();
    print_separator(total_width.saturating_sub(1));
}

/// Ask for y/N confirmation on stdin unless `yes` is already set
pub fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    println!("{} (y/N)", prompt);
    let mut input = String::new();
    std::io::stdin().read_line(&mut input).context("Failed to read confirmation")?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
