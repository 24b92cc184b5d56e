use anyhow::{Context, Result};
use colored::*;
use repomerge_core::Summary;
use std::path::Path;

pub fn print_summary(summary: &Summary, output_path: &Path, quiet: bool) {
    if quiet {
        return;
    }
    println!(
        "{} Merged codebase saved to: {}",
        "✅".green(),
        output_path.display().to_string().blue()
    );
    println!();
    println!("{}", " Merge Summary ".green().bold().underline());
    println!(
        "{:<22} {}",
        "Repository:".green(),
        summary.repo_name.cyan()
    );
    println!(
        "{:<22} {}",
        "Included files:".green(),
        summary.included.to_string().cyan()
    );
    for (reason, count) in &summary.excluded {
        println!(
            "{:<22} {}",
            format!("Excluded ({}):", reason).yellow(),
            count.to_string().cyan()
        );
    }
    println!(
        "{:<22} {}",
        "Bytes written:".green(),
        summary.bytes_written.to_string().cyan()
    );
    if summary.errors > 0 {
        println!(
            "{:<22} {}",
            "Read errors:".yellow(),
            summary.errors.to_string().cyan()
        );
        println!(
            "\n{}",
            "⚠️ Some files could not be read; the document is complete apart from them."
                .yellow()
        );
    }
}

pub fn print_summary_json(summary: &Summary) -> Result<()> {
    let content =
        serde_json::to_string_pretty(summary).context("Failed to serialize run summary")?;
    println!("{}", content);
    Ok(())
}
