use clap::{ArgGroup, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "apkinfo")]
#[command(version)]
#[command(about = "Report APK size statistics by content category", long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["file", "path"])))]
#[command(after_help = "Examples:\n  \
  apkinfo -f app.apk             list every entry with its sizes\n  \
  apkinfo -f app.apk -t          print the per-category size summary\n  \
  apkinfo -p builds/ -t -v       summarize every *.apk under builds/")]
pub struct Cli {
    /// Inspect a single APK file
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Inspect all *.apk files under a directory, recursively
    #[arg(short = 'p', long = "path", value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Show only summary totals (per-category sizes) per archive
    #[arg(short = 't', long = "total")]
    pub total: bool,

    /// Prefix per-entry lines with the archive path
    #[arg(short = 'v')]
    pub verbose: bool,
}
