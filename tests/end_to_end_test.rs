mod helpers;

use chrono::{TimeZone, Utc};
use helpers::{decaying_memory_text, memory_text, test_corpus, test_id, write_memory};
use mnemonic::decay::{recompute, set_strength};
use mnemonic::links::{find_links, LinkIndex};
use mnemonic::memory::{MemoryRecord, PathScheme, Scope};
use mnemonic::paths::PathResolver;
use mnemonic::relocate::relocate;
use mnemonic::validate::validate;

/// Full maintenance cycle over a small mixed corpus: validate, decay,
/// relocate, validate again.
#[test]
fn maintenance_cycle_keeps_corpus_consistent() {
    let (_tmp, ctx) = test_corpus(PathScheme::V2);
    let resolver = PathResolver::new(&ctx);
    let roots = resolver.all_memory_roots();

    // One memory of each cognitive type. The semantic one decays; the
    // episodic one references the procedural one.
    let semantic_id = test_id(1);
    let semantic_path = write_memory(
        &resolver.memory_dir("facts/user", Scope::User),
        &semantic_id,
        "Aging fact",
        &decaying_memory_text(&semantic_id, "Aging fact", "P7D", 1.0, "2026-01-01T00:00:00Z"),
    );

    let procedural_id = test_id(2);
    let procedural_path = write_memory(
        &resolver.memory_dir("workflows/project", Scope::Project),
        &procedural_id,
        "Release steps",
        &memory_text(&procedural_id, "Release steps", "procedural", "workflows/project", ""),
    );

    let episodic_id = test_id(3);
    let episodic_path = write_memory(
        &resolver.memory_dir("sessions/project", Scope::Project),
        &episodic_id,
        "Friday deploy",
        &memory_text(
            &episodic_id,
            "Friday deploy",
            "episodic",
            "sessions/project",
            "Followed [[release-steps]] without incident.\n",
        ),
    );

    // Pass 1: everything validates cleanly.
    let mut files = vec![semantic_path.clone(), procedural_path.clone(), episodic_path.clone()];
    for path in &files {
        let record = MemoryRecord::load(path).unwrap();
        let result = validate(&record, path.file_name().unwrap().to_str());
        assert!(result.valid, "{}: {:?}", path.display(), result.errors);
    }

    // Pass 2: decay 14 days after last access with a 7-day half-life.
    let now = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
    let mut record = MemoryRecord::load(&semantic_path).unwrap();
    let result = recompute(&record, now).unwrap();
    assert!(result.changed);
    assert!((result.new_strength - 0.25).abs() < 1e-9);
    set_strength(&mut record, result.new_strength);
    record.store(&semantic_path).unwrap();

    // Pass 3: rename the procedural memory's namespace. The episodic
    // memory's slug link must keep resolving.
    let new_path = resolver
        .memory_dir("procedures/project", Scope::Project)
        .join(procedural_path.file_name().unwrap());
    let report = relocate(&roots, &procedural_path, &new_path, false).unwrap();
    assert!(report.errors.is_empty());
    files[1] = new_path.clone();

    let index = LinkIndex::build(&roots);
    let episodic = MemoryRecord::load(&episodic_path).unwrap();
    let links = find_links(&episodic.body);
    assert_eq!(links, vec!["release-steps".to_string()]);
    assert_eq!(index.resolve("release-steps"), Some(new_path.as_path()));

    // Pass 4: the corpus still validates with zero errors.
    for path in &files {
        let record = MemoryRecord::load(path).unwrap();
        let result = validate(&record, path.file_name().unwrap().to_str());
        assert!(result.valid, "{}: {:?}", path.display(), result.errors);
    }
}
