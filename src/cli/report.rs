//! Report formatting and printing utilities.
//!
//! Text output uses 1-based `path:line:col` locations, like compilers print
//! them. `--json` output is the command summary serialized as-is, with the
//! engine's 0-based positions.

use std::{
    io::{self, Write},
    path::Path,
};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{CommandResult, CommandSummary, UsagesSummary};
use crate::core::{
    DefinitionTarget, HoverBody, HoverEntry, HoverInfo, InlinePreview, SourceLocation, UnusedReport,
    data::{Position, ResolutionOrigin},
};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print a command result to stdout.
pub fn print(result: &CommandResult, json: bool) {
    print_to(result, json, &mut io::stdout().lock());
}

/// Print a command result to a custom writer.
pub fn print_to<W: Write>(result: &CommandResult, json: bool, writer: &mut W) {
    if json {
        match serde_json::to_string_pretty(&result.summary) {
            Ok(text) => {
                let _ = writeln!(writer, "{}", text);
            }
            Err(e) => eprintln!("Error: failed to serialize result: {}", e),
        }
        return;
    }

    let root = result.workspace_root.as_path();
    match &result.summary {
        CommandSummary::Resolve(origin) => print_origin(origin.as_ref(), writer),
        CommandSummary::Hover(hover) => print_hover(hover.as_ref(), root, writer),
        CommandSummary::Definition(targets) => print_definitions(targets, root, writer),
        CommandSummary::Usages(summary) => print_usages(summary, root, writer),
        CommandSummary::References(locations) => print_references(locations, root, writer),
        CommandSummary::Unused(report) => print_unused(report.as_ref(), writer),
        CommandSummary::Previews(previews) => print_previews(previews, writer),
        CommandSummary::Locate(position) => print_locate(*position, writer),
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn location(position: Position) -> String {
    format!("{}:{}", position.line + 1, position.character + 1)
}

fn print_failure<W: Write>(message: &str, writer: &mut W) {
    let _ = writeln!(writer, "{} {}", FAILURE_MARK.red(), message.red());
}

fn print_success<W: Write>(message: &str, writer: &mut W) {
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), message.green());
}

fn print_origin<W: Write>(origin: Option<&ResolutionOrigin>, writer: &mut W) {
    let Some(origin) = origin else {
        print_failure("No dictionary content at this position", writer);
        return;
    };
    let label = |name: &str| format!("{:<8}", name).bold();
    let _ = writeln!(writer, "{}{}", label("key:"), origin.dictionary_key);
    let _ = writeln!(writer, "{}{}", label("path:"), root_or(&origin.field_path.to_string()));
    if let Some(module) = &origin.module_source {
        let _ = writeln!(writer, "{}{}", label("module:"), module);
    }
}

fn root_or(path: &str) -> &str {
    if path.is_empty() { "root" } else { path }
}

fn print_hover<W: Write>(hover: Option<&HoverInfo>, root: &Path, writer: &mut W) {
    let Some(hover) = hover else {
        print_failure("No dictionary content at this position", writer);
        return;
    };
    let _ = writeln!(
        writer,
        "{} {}",
        "Intlayer:".bold(),
        hover.origin.dictionary_key.cyan()
    );
    let _ = writeln!(writer, "{} {}", "Path:".bold(), root_or(&hover.path.to_string()));
    let _ = writeln!(writer, "{} {}", "Type:".bold(), hover.display_type);

    for entry in &hover.entries {
        let _ = writeln!(writer, "{}", "---".dimmed());
        match entry {
            HoverEntry::Remote { dashboard_url } => {
                let _ = writeln!(writer, "{} {}", "Remote dictionary:".bold(), dashboard_url.underline());
            }
            HoverEntry::Local { file_path, body } => {
                match file_path {
                    Some(path) => {
                        let _ = writeln!(writer, "{} {}", "File:".bold(), display_path(root, path));
                    }
                    None => {
                        let _ = writeln!(writer, "{}", "Local content".bold());
                    }
                }
                print_hover_body(body, writer);
            }
        }
    }
}

fn print_hover_body<W: Write>(body: &HoverBody, writer: &mut W) {
    match body {
        HoverBody::Translations(rows) => {
            let width = rows
                .iter()
                .map(|(locale, _)| UnicodeWidthStr::width(locale.as_str()))
                .max()
                .unwrap_or(0);
            for (locale, text) in rows {
                let padding = width - UnicodeWidthStr::width(locale.as_str());
                let _ = writeln!(writer, "  {}{:padding$}  {}", locale.bold(), "", text, padding = padding);
            }
        }
        HoverBody::Json(value) => {
            let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            for line in text.lines() {
                let _ = writeln!(writer, "  {}", line);
            }
        }
        HoverBody::Scalar(text) => {
            let _ = writeln!(writer, "{} {}", "Value:".bold(), text);
        }
    }
}

fn print_definitions<W: Write>(targets: &[DefinitionTarget], root: &Path, writer: &mut W) {
    if targets.is_empty() {
        print_failure("No definition found", writer);
        return;
    }
    for target in targets {
        let _ = write!(
            writer,
            "  {} {}:{}",
            "-->".blue(),
            display_path(root, &target.file_path),
            location(target.position)
        );
        if !target.exact {
            let _ = write!(writer, " {}", "(field not found, showing file start)".dimmed());
        }
        let _ = writeln!(writer);
    }
}

fn print_usages<W: Write>(summary: &UsagesSummary, root: &Path, writer: &mut W) {
    if summary.usages.is_empty() {
        print_failure(&format!("No usages of \"{}\"", summary.key), writer);
        return;
    }
    for usage in &summary.usages {
        let _ = writeln!(
            writer,
            "  {} {}:{}",
            "-->".blue(),
            display_path(root, &usage.file_path),
            location(usage.declaration_range.start)
        );
        let keys = usage.rendered_keys();
        if !keys.is_empty() {
            let _ = writeln!(writer, "      {} {}", "keys:".bold(), keys.join(", "));
        }
    }
    let count = summary.usages.len();
    print_success(
        &format!(
            "Found \"{}\" in {} {}",
            summary.key,
            count,
            if count == 1 { "file" } else { "files" }
        ),
        writer,
    );
}

fn print_references<W: Write>(locations: &[SourceLocation], root: &Path, writer: &mut W) {
    if locations.is_empty() {
        print_failure("No references found", writer);
        return;
    }
    for loc in locations {
        let _ = writeln!(
            writer,
            "  {} {}:{}",
            "-->".blue(),
            display_path(root, &loc.file_path),
            location(loc.range.start)
        );
    }
}

fn print_unused<W: Write>(report: Option<&UnusedReport>, writer: &mut W) {
    match report {
        None => print_failure("No dictionary declaration in this file", writer),
        Some(UnusedReport::DictionaryUnused { key, key_range }) => {
            let _ = writeln!(
                writer,
                "{}: dictionary \"{}\" is never used in the project",
                "warning".bold().yellow(),
                key
            );
            let _ = writeln!(writer, "  {} {}", "-->".blue(), location(key_range.start));
        }
        Some(UnusedReport::Fields { key, unused }) if unused.is_empty() => {
            print_success(&format!("Every field of \"{}\" is used", key), writer);
        }
        Some(UnusedReport::Fields { key, unused }) => {
            for field in unused {
                let _ = writeln!(
                    writer,
                    "{}: property \"{}\" is unused",
                    "warning".bold().yellow(),
                    field.path
                );
                let _ = writeln!(writer, "  {} {}", "-->".blue(), location(field.range.start));
            }
            let _ = writeln!(
                writer,
                "{} {} unused {} in \"{}\"",
                FAILURE_MARK.red(),
                unused.len(),
                if unused.len() == 1 { "field" } else { "fields" },
                key
            );
        }
    }
}

fn print_previews<W: Write>(previews: &[InlinePreview], writer: &mut W) {
    let width = previews
        .iter()
        .map(|p| (p.line + 1).to_string().len())
        .max()
        .unwrap_or(1);
    for preview in previews {
        let line = format!("{:>width$}", preview.line + 1, width = width);
        let _ = writeln!(writer, "{} {} {}", line.blue(), "|".blue(), preview.text);
    }
}

fn print_locate<W: Write>(position: Option<Position>, writer: &mut W) {
    match position {
        Some(position) => {
            let _ = writeln!(writer, "{}", location(position));
        }
        None => print_failure("Field not found", writer),
    }
}
