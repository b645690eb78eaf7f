//! Handles all user-facing output for the CLI.
//!
//! Text reports are colored with `termcolor`; mismatched lines get a
//! word-level diff from `difference`. JSON reports serialize the run summary
//! as-is. Every renderer writes to a `WriteColor` so tests can capture output.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use difference::{Changeset, Difference};
use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::cli::args::ColorMode;
use crate::locate::Variant;
use crate::script::{CaseOutcome, RunSummary};

// ============================================================================
// STREAM SETUP
// ============================================================================

pub fn color_choice(mode: ColorMode) -> ColorChoice {
    match mode {
        ColorMode::Always => ColorChoice::Always,
        ColorMode::Never => ColorChoice::Never,
        ColorMode::Auto if atty::is(atty::Stream::Stdout) => ColorChoice::Auto,
        ColorMode::Auto => ColorChoice::Never,
    }
}

pub fn stdout(mode: ColorMode) -> StandardStream {
    StandardStream::stdout(color_choice(mode))
}

// ============================================================================
// RUN REPORTS
// ============================================================================

/// Writes one line per case followed by a totals line.
pub fn write_summary<W: WriteColor>(out: &mut W, summary: &RunSummary) -> io::Result<()> {
    for outcome in &summary.outcomes {
        write_outcome(out, outcome)?;
    }
    writeln!(out)?;
    write_colored(out, Color::Green, &format!("{} passed", summary.passed))?;
    write!(out, ", ")?;
    let failed_color = if summary.failed > 0 { Color::Red } else { Color::Green };
    write_colored(out, failed_color, &format!("{} failed", summary.failed))?;
    write!(out, ", ")?;
    write_colored(out, Color::Yellow, &format!("{} skipped", summary.skipped))?;
    writeln!(out)
}

pub fn write_summary_json<W: Write>(out: &mut W, summary: &RunSummary) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, summary)?;
    writeln!(out)
}

fn write_outcome<W: WriteColor>(out: &mut W, outcome: &CaseOutcome) -> io::Result<()> {
    match outcome {
        CaseOutcome::Pass {
            script,
            name,
            directives,
            ..
        } => {
            write_colored(out, Color::Green, "PASS")?;
            writeln!(out, " {script} :: {name} ({directives} directives)")
        }
        CaseOutcome::Skipped {
            script,
            name,
            reason,
        } => {
            write_colored(out, Color::Yellow, "SKIP")?;
            writeln!(out, " {script} :: {name} ({reason})")
        }
        CaseOutcome::Fail {
            script,
            name,
            artifact,
            directive,
            error,
            expected,
            actual,
        } => {
            write_colored(out, Color::Red, "FAIL")?;
            writeln!(out, " {script} :: {name}")?;
            if let Some(path) = artifact {
                writeln!(out, "    artifact: {}", path.display())?;
            }
            match directive {
                Some(index) => writeln!(out, "    directive #{index}: {error}")?,
                None => writeln!(out, "    {error}")?,
            }
            if let (Some(expected), Some(actual)) = (expected, actual) {
                write!(out, "    diff: ")?;
                write_word_diff(out, expected, actual)?;
            }
            Ok(())
        }
    }
}

/// Word-level diff: removed words are what the directive expected, added
/// words are what the artifact line holds.
fn write_word_diff<W: WriteColor>(out: &mut W, expected: &str, actual: &str) -> io::Result<()> {
    let changeset = Changeset::new(expected, actual, " ");
    for (i, diff) in changeset.diffs.iter().enumerate() {
        if i > 0 {
            write!(out, " ")?;
        }
        match diff {
            Difference::Same(x) => {
                out.reset()?;
                write!(out, "{x}")?;
            }
            Difference::Rem(x) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
                write!(out, "[-{x}-]")?;
            }
            Difference::Add(x) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
                write!(out, "{{+{x}+}}")?;
            }
        }
    }
    out.reset()?;
    writeln!(out)
}

// ============================================================================
// LOCATE REPORTS
// ============================================================================

/// Lists candidate dumps, marking the selected index.
pub fn write_candidates<W: WriteColor>(
    out: &mut W,
    prefix: &str,
    candidates: &[PathBuf],
    selected: usize,
) -> io::Result<()> {
    writeln!(out, "{} candidate(s) for prefix '{prefix}':", candidates.len())?;
    for (i, path) in candidates.iter().enumerate() {
        if i == selected {
            write_colored(out, Color::Green, &format!("* [{i}]"))?;
        } else {
            write!(out, "  [{i}]")?;
        }
        writeln!(out, " {}", path.display())?;
    }
    Ok(())
}

/// Machine-readable result of `dumpcheck locate`.
#[derive(Debug, Serialize)]
pub struct LocateReport<'a> {
    pub prefix: String,
    pub variant: Variant,
    pub index: usize,
    pub candidates: &'a [PathBuf],
    pub selected: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<&'a [String]>,
}

pub fn write_locate_json<W: Write>(out: &mut W, report: &LocateReport<'_>) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)
}

pub fn write_lines<W: Write>(out: &mut W, lines: &[String]) -> io::Result<()> {
    for (i, line) in lines.iter().enumerate() {
        writeln!(out, "{i:>5}: {line}")?;
    }
    Ok(())
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn write_colored<W: WriteColor>(out: &mut W, color: Color, text: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{text}")?;
    out.reset()
}
