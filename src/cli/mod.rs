//! The dumpcheck command-line interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use crate::cli::args::{Command, DumpcheckArgs, Format, SuffixArgs};
use crate::discovery::discover_scripts;
use crate::errors::Result;
use crate::locate::{ArtifactLocator, ArtifactQuery, LocatorConfig};
use crate::script::{run_script, CheckScript, RunOptions, RunSummary};
use crate::signature::MethodSignature;
use crate::telemetry;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() -> miette::Result<ExitCode> {
    let args = DumpcheckArgs::parse();
    telemetry::init_tracing(args.log_json, telemetry::level_for_verbosity(args.verbose));
    Ok(dispatch(args)?)
}

/// Executes parsed arguments. Fatal errors are returned; check failures are
/// reported and turned into a failing exit code.
pub fn dispatch(args: DumpcheckArgs) -> Result<ExitCode> {
    match args.command {
        Command::Run {
            ref script,
            ref dir,
            ref suffixes,
        } => {
            let options = run_options(dir, None, suffixes);
            let summary = run_scripts(&[script.as_path()], &options)?;
            report(&args, &summary)
        }
        Command::Test {
            ref root,
            ref dir,
            ref filter,
            ref suffixes,
        } => {
            let scripts = discover_scripts(root)?;
            let paths: Vec<&Path> = scripts.iter().map(|p| p.as_path()).collect();
            let options = run_options(dir, filter.clone(), suffixes);
            let summary = run_scripts(&paths, &options)?;
            report(&args, &summary)
        }
        Command::Locate {
            ref owner,
            ref member,
            ref signature,
            ref returns,
            ref params,
            optimized,
            index,
            ref dir,
            print,
            ref suffixes,
        } => {
            let signature = match (signature, returns) {
                (Some(raw), _) => MethodSignature::parse_descriptor(raw)?,
                (None, Some(ret)) => MethodSignature::from_type_names(params.as_slice(), ret)?,
                (None, None) => MethodSignature::from_type_names(params.as_slice(), "void")?,
            };
            let query = ArtifactQuery::new(owner.as_str(), member.as_str(), &signature)
                .optimized(optimized)
                .index(index);
            let options = run_options(dir, None, suffixes);
            let locator = ArtifactLocator::new(options.effective_config(&LocatorConfig::default()))?;
            handle_locate(&args, &locator, dir, &query, print)
        }
    }
}

fn run_options(dir: &Path, filter: Option<String>, suffixes: &SuffixArgs) -> RunOptions {
    RunOptions {
        dump_dir: dir.to_path_buf(),
        filter,
        suffix: suffixes.suffix.clone(),
        optimized_suffix: suffixes.optimized_suffix.clone(),
    }
}

/// Loads and runs each script; a script that fails to load aborts the run.
pub fn run_scripts(scripts: &[&Path], options: &RunOptions) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    for path in scripts {
        let script = CheckScript::load(path)?;
        debug!(script = %path.display(), cases = script.cases.len(), "loaded check script");
        summary.extend(run_script(&script, options)?);
    }
    Ok(summary)
}

fn report(args: &DumpcheckArgs, summary: &RunSummary) -> Result<ExitCode> {
    match args.format {
        Format::Json => {
            let stdout = std::io::stdout();
            output::write_summary_json(&mut stdout.lock(), summary)?;
        }
        Format::Text => {
            let mut stdout = output::stdout(args.color);
            output::write_summary(&mut stdout, summary)?;
        }
    }
    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Handles the `locate` subcommand.
///
/// The directory is listed once; the same listing is printed and indexed.
fn handle_locate(
    args: &DumpcheckArgs,
    locator: &ArtifactLocator,
    dir: &Path,
    query: &ArtifactQuery,
    print: bool,
) -> Result<ExitCode> {
    let candidates = locator.candidates(dir, query)?;
    match args.format {
        Format::Json => {
            let selected = locator.pick(dir, query, candidates.clone())?;
            let artifact = if print {
                Some(locator.load(query, selected.clone())?)
            } else {
                None
            };
            let report = output::LocateReport {
                prefix: query.file_prefix(),
                variant: query.variant,
                index: query.index,
                candidates: &candidates,
                selected: &selected,
                lines: artifact.as_ref().map(|a| a.lines.lines()),
            };
            let stdout = std::io::stdout();
            output::write_locate_json(&mut stdout.lock(), &report)?;
        }
        Format::Text => {
            let mut stdout = output::stdout(args.color);
            output::write_candidates(&mut stdout, &query.file_prefix(), &candidates, query.index)?;

            // NoMatchingArtifact and IndexOutOfRange surface after the listing.
            let selected = locator.pick(dir, query, candidates)?;
            if print {
                let artifact = locator.load(query, selected)?;
                writeln!(stdout)?;
                output::write_lines(&mut stdout, artifact.lines.lines())?;
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
