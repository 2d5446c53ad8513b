mod helpers;

use chrono::{TimeZone, Utc};
use helpers::{decaying_memory_text, test_corpus, test_id, write_memory};
use mnemonic::decay::{current_strength, recompute, set_strength};
use mnemonic::memory::{MemoryRecord, PathScheme, Scope};
use mnemonic::paths::PathResolver;

#[test]
fn decay_persists_through_store_and_reload() {
    let (_tmp, ctx) = test_corpus(PathScheme::V2);
    let resolver = PathResolver::new(&ctx);
    let dir = resolver.memory_dir("facts/user", Scope::User);

    let id = test_id(1);
    let path = write_memory(
        &dir,
        &id,
        "Aging fact",
        &decaying_memory_text(&id, "Aging fact", "P7D", 1.0, "2026-01-01T00:00:00Z"),
    );

    let mut record = MemoryRecord::load(&path).unwrap();
    let now = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap(); // 14 days later
    let result = recompute(&record, now).unwrap();
    assert!(result.changed);
    assert!((result.new_strength - 0.25).abs() < 1e-9);

    set_strength(&mut record, result.new_strength);
    record.store(&path).unwrap();

    let reloaded = MemoryRecord::load(&path).unwrap();
    assert!((current_strength(&reloaded) - 0.25).abs() < 1e-9);
    assert!(
        reloaded.body.contains("A decaying fact"),
        "body survives the rewrite"
    );
}

#[test]
fn sub_threshold_changes_do_not_rewrite() {
    let (_tmp, ctx) = test_corpus(PathScheme::V2);
    let resolver = PathResolver::new(&ctx);
    let dir = resolver.memory_dir("facts/user", Scope::User);

    let id = test_id(2);
    let path = write_memory(
        &dir,
        &id,
        "Settled fact",
        &decaying_memory_text(&id, "Settled fact", "P7D", 1.0, "2026-01-01T00:00:00Z"),
    );

    let now = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
    let mut record = MemoryRecord::load(&path).unwrap();
    let first = recompute(&record, now).unwrap();
    set_strength(&mut record, first.new_strength);
    record.store(&path).unwrap();

    // A record whose strength moves by less than the 0.01 threshold must
    // report unchanged, so repeated runs do not churn the file.
    let long = decaying_memory_text(&test_id(3), "Slow fact", "P3650D", 1.0, "2026-01-01T00:00:00Z");
    let slow_path = write_memory(&dir, &test_id(3), "Slow fact", &long);
    let slow = MemoryRecord::load(&slow_path).unwrap();
    let result = recompute(&slow, now).unwrap();
    assert!(!result.changed, "sub-threshold drift must not trigger a write");
}

#[test]
fn model_none_files_are_never_touched() {
    let (_tmp, ctx) = test_corpus(PathScheme::V2);
    let resolver = PathResolver::new(&ctx);
    let dir = resolver.memory_dir("facts/user", Scope::User);

    let id = test_id(4);
    let text = "---
id: 00000004-0000-4000-8000-000000000004
type: semantic
namespace: facts/user
created: 2020-01-01T00:00:00Z
title: \"Permanent fact\"
temporal:
  decay:
    model: none
    half_life: P7D
    strength: 0.8
---

Never decays.
";
    let path = write_memory(&dir, &id, "Permanent fact", text);

    let record = MemoryRecord::load(&path).unwrap();
    let far_future = Utc.with_ymd_and_hms(2040, 1, 1, 0, 0, 0).unwrap();
    let result = recompute(&record, far_future).unwrap();
    assert!(!result.changed);
    assert_eq!(result.new_strength, 0.8);
}
