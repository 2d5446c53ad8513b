//! CLI `validate` command — full-corpus MIF schema validation pass.

use anyhow::Result;
use serde::Serialize;

use crate::context::PathContext;
use crate::memory::MemoryRecord;
use crate::paths::PathResolver;
use crate::validate::{validate, Finding};

/// Summary counters for one validation pass.
///
/// The pass always runs to completion: unreadable files are counted as
/// skipped, invalid files are fully enumerated, and nothing aborts early.
#[derive(Debug, Default, Serialize)]
pub struct ValidateSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub skipped: usize,
    pub warnings: usize,
}

#[derive(Debug, Serialize)]
struct FileReport {
    path: String,
    errors: Vec<Finding>,
    warnings: Vec<Finding>,
}

/// Validate every memory under all roots and print a report.
pub fn run(ctx: &PathContext, json: bool) -> Result<ValidateSummary> {
    let resolver = PathResolver::new(ctx);
    let files = super::memory_files(&resolver.all_memory_roots());

    let mut summary = ValidateSummary::default();
    let mut reports = Vec::new();
    let pb = super::batch_progress(files.len());

    for path in &files {
        summary.total += 1;
        pb.inc(1);

        let record = match MemoryRecord::load(path) {
            Ok(r) => r,
            Err(e) => {
                summary.skipped += 1;
                if !json {
                    println!("SKIP  {} ({e})", path.display());
                }
                continue;
            }
        };

        let filename = path.file_name().and_then(|n| n.to_str());
        let result = validate(&record, filename);
        summary.warnings += result.warnings.len();

        if result.valid {
            summary.valid += 1;
        } else {
            summary.invalid += 1;
        }

        if !result.errors.is_empty() || !result.warnings.is_empty() {
            if json {
                reports.push(FileReport {
                    path: path.display().to_string(),
                    errors: result.errors,
                    warnings: result.warnings,
                });
            } else {
                println!("{}", path.display());
                for f in &result.errors {
                    println!("  error    {:<28} {}", f.field, f.message);
                }
                for f in &result.warnings {
                    println!("  warning  {:<28} {}", f.field, f.message);
                }
            }
        }
    }
    pb.finish_and_clear();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "summary": &summary,
                "files": reports,
            }))?
        );
    } else {
        println!();
        println!("Validation Summary");
        println!("{}", "=".repeat(40));
        println!("  Checked:   {}", summary.total);
        println!("  Valid:     {}", summary.valid);
        println!("  Invalid:   {}", summary.invalid);
        println!("  Skipped:   {}", summary.skipped);
        println!("  Warnings:  {}", summary.warnings);
    }

    Ok(summary)
}
