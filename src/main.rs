//! Main entry point for the apkinfo CLI application.
//!
//! This binary lists APK archive entries or prints per-category size
//! summaries, for a single file or for every `*.apk` under a directory.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;

use apkinfo::{ApkError, ApkReport, Cli, ZipParser, find_apk_files};

/// Application entry point.
///
/// Parses command-line arguments and dispatches to single-file or
/// directory-batch processing. Exit status is zero only if every
/// inspected archive was processed cleanly.
fn main() -> ExitCode {
    let cli = Cli::parse();

    match (&cli.file, &cli.path) {
        (Some(file), _) => run_single(file, &cli),
        (None, Some(dir)) => run_batch(dir, &cli),
        // clap's arg group guarantees one mode was selected
        (None, None) => unreachable!(),
    }
}

/// Inspect one archive; any error aborts the run.
fn run_single(file: &Path, cli: &Cli) -> ExitCode {
    match inspect_apk(file, cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("apkinfo: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Inspect every `*.apk` under `dir`, strictly sequentially.
///
/// One bad archive must not abort the batch: its error goes to stderr
/// and processing continues, but the overall exit status turns non-zero.
fn run_batch(dir: &Path, cli: &Cli) -> ExitCode {
    if !dir.is_dir() {
        let err = ApkError::InvalidArgument(format!(
            "{}: provided path should be a directory",
            dir.display()
        ));
        eprintln!("apkinfo: {err}");
        eprintln!("Try 'apkinfo --help' for more information.");
        return ExitCode::from(2);
    }

    let mut failed = false;
    for apk in find_apk_files(dir) {
        if let Err(err) = inspect_apk(&apk, cli) {
            eprintln!("apkinfo: {err:#}");
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Process a single archive according to the CLI options.
///
/// Default mode prints one line per entry in central-directory order:
/// `[archivepath ]name method compressed_size uncompressed_size`, with
/// the archive-path prefix only under `-v`. With `-t` the per-entry
/// listing is suppressed and the category summary is printed instead.
fn inspect_apk(path: &Path, cli: &Cli) -> Result<()> {
    let parser = ZipParser::open(path).with_context(|| path.display().to_string())?;
    let entries = parser
        .list_entries()
        .with_context(|| path.display().to_string())?;

    if cli.total {
        print_summary(path, &ApkReport::from_entries(&entries));
        return Ok(());
    }

    for entry in &entries {
        // Label lookup is fatal on unrecognized method codes; a silent
        // default would mask archives this tool does not understand.
        let label = entry
            .compression_method
            .label()
            .with_context(|| format!("{}: {}", path.display(), entry.file_name))?;

        if cli.verbose {
            println!(
                "{} {} {} {} {}",
                path.display(),
                entry.file_name,
                label,
                entry.compressed_size,
                entry.uncompressed_size
            );
        } else {
            println!(
                "{} {} {} {}",
                entry.file_name, label, entry.compressed_size, entry.uncompressed_size
            );
        }
    }

    Ok(())
}

/// Print the fixed summary block for one archive: the path line, then
/// the eight counters and the matched total.
fn print_summary(path: &Path, report: &ApkReport) {
    println!("apk: {}", path.display());
    println!("stored content: {}", report.stored_size);
    println!("uncompressed content: {}", report.uncompressed_total_size);
    println!("asset content: {}", report.asset_size);
    println!("meta content: {}", report.meta_inf_size);
    println!("xml content: {}", report.xml_size);
    println!("misc content: {}", report.misc_size);
    println!("matched content total: {}", report.matched_total());
    println!("compressed asset size: {}", report.compressed_asset_size);
    println!("uncompressed asset size: {}", report.uncompressed_asset_size);
}
