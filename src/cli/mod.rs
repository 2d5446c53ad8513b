pub mod check;
pub mod decay;
pub mod doctor;
pub mod path;
pub mod relocate;
pub mod stats;
pub mod validate;

use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use crate::links::is_memory_file;

/// Collect every memory file under the given roots, in a stable order.
pub fn memory_files(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = roots
        .iter()
        .filter(|r| r.is_dir())
        .flat_map(|root| {
            WalkDir::new(root)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| is_memory_file(e.path()))
                .map(|e| e.into_path())
                .collect::<Vec<_>>()
        })
        .collect();
    files.sort();
    files.dedup();
    files
}

/// Progress bar for batch passes; hidden for small corpora where it would
/// only add noise.
pub fn batch_progress(total: usize) -> ProgressBar {
    if total < 50 {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {bar:40.cyan/blue} {pos}/{len} files")
            .expect("valid template")
            .progress_chars("##-"),
    );
    pb
}
