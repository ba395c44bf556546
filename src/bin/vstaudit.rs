use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use vstaudit_core::{report, AuditSession};

#[derive(Parser, Debug)]
#[command(
    name = "vstaudit",
    version,
    about = "Audit VST plugin usage across Ableton Live projects"
)]
struct Args {
    /// Directory tree containing Ableton Live .als project files
    directory: PathBuf,

    /// Report output path
    #[arg(short, long, default_value = "vst_audit_report.txt")]
    output: PathBuf,

    /// Also export the aggregate scan state as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Suppress progress and summary output
    #[arg(long)]
    quiet: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut session = AuditSession::new();
    if !args.quiet {
        println!("Scanning directory: {}", args.directory.display());
        session.set_progress_hook(|message| println!("{message}"));
    }

    session.scan_directory(&args.directory)?;

    if session.usage().is_empty() {
        println!("No VST plugins found.");
        return Ok(());
    }

    if !args.quiet {
        print!("\n{}", report::render_summary(&session, 20));
    }

    report::write_report(&session, &args.output)?;

    if let Some(json_path) = &args.json {
        fs::write(json_path, session.to_json()?)
            .context(format!("Failed to write JSON to {}", json_path.display()))?;
    }

    println!(
        "Found {} unique VSTs across {} projects. Report written to {}",
        session.unique_plugins(),
        session.project_count(),
        args.output.display()
    );

    Ok(())
}
