//! MIF Level 3 schema validation.
//!
//! The schema lives here as code — a versioned, machine-readable artifact —
//! rather than being extracted from documentation at runtime. Validation
//! never throws for bad data: every check runs on every record and each
//! violation becomes a [`Finding`], so a batch pass over thousands of files
//! always produces a complete report.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::memory::record::{Citation, MemoryRecord};
use crate::memory::MemoryType;

/// Citation source types accepted by the schema.
pub const CITATION_TYPES: [&str; 6] = [
    "paper",
    "documentation",
    "blog",
    "github",
    "stackoverflow",
    "article",
];

/// Decay models named by the schema.
pub const DECAY_MODELS: [&str; 4] = ["exponential", "linear", "step", "none"];

/// Conflict resolutions named by the schema.
pub const CONFLICT_RESOLUTIONS: [&str; 3] = ["merged", "invalidated", "skipped"];

static UUID_V4: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$").unwrap()
});

static NAMESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._-]+/[a-zA-Z0-9._-]+$").unwrap());

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://\S+$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// One schema violation, tied to the frontmatter field that triggered it.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// Dotted field path, e.g. `temporal.decay.strength`.
    pub field: String,
    pub severity: Severity,
    pub message: String,
    /// The offending value, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Finding {
    fn error(field: &str, message: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            field: field.to_string(),
            severity: Severity::Error,
            message: message.into(),
            value: value.map(str::to_string),
        }
    }

    fn warning(field: &str, message: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            field: field.to_string(),
            severity: Severity::Warning,
            message: message.into(),
            value: value.map(str::to_string),
        }
    }
}

/// Outcome of validating one record. `valid` is true iff `errors` is empty;
/// warnings alone do not fail a record.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

/// Validate `record` against the MIF Level 3 schema.
///
/// `filename` enables the filename-vs-id consistency check (10); pass `None`
/// for records not yet written to disk.
pub fn validate(record: &MemoryRecord, filename: Option<&str>) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let front = &record.front;

    // 1. Required fields.
    match front.id.as_deref() {
        None => errors.push(Finding::error("id", "required field missing", None)),
        // 2. UUID v4, lowercase.
        Some(id) if !UUID_V4.is_match(id) => errors.push(Finding::error(
            "id",
            "not a lowercase UUID v4",
            Some(id),
        )),
        Some(_) => {}
    }

    match front.memory_type.as_deref() {
        None => errors.push(Finding::error("type", "required field missing", None)),
        // 3. Closed cognitive-type enum.
        Some(t) if t.parse::<MemoryType>().is_err() => errors.push(Finding::error(
            "type",
            "must be one of semantic, episodic, procedural",
            Some(t),
        )),
        Some(_) => {}
    }

    match front.namespace.as_deref() {
        None => errors.push(Finding::error("namespace", "required field missing", None)),
        // 4. {category}/{scope} shape.
        Some(ns) if !NAMESPACE.is_match(ns) => errors.push(Finding::error(
            "namespace",
            "must match {category}/{scope}",
            Some(ns),
        )),
        Some(_) => {}
    }

    // 5. Timestamps parse as ISO-8601 with explicit offset or Z.
    let created = check_timestamp(front.created.as_deref(), "created", true, &mut errors);
    let modified = check_timestamp(front.modified.as_deref(), "modified", false, &mut errors);
    if let (Some(c), Some(m)) = (created, modified) {
        if m < c {
            errors.push(Finding::error(
                "modified",
                "modified predates created",
                front.modified.as_deref(),
            ));
        }
    }

    match front.title.as_deref() {
        None => errors.push(Finding::error("title", "required field missing", None)),
        Some(t) if t.trim().is_empty() => {
            errors.push(Finding::error("title", "must not be empty", Some(t)))
        }
        Some(_) => {}
    }

    // 9. Tag format.
    for (i, tag) in front.tags.iter().enumerate() {
        if !TAG.is_match(tag) {
            errors.push(Finding::error(
                &format!("tags[{i}]"),
                "must be lowercase hyphenated ([a-z0-9-]+)",
                Some(tag.as_str()),
            ));
        }
    }

    if let Some(temporal) = &front.temporal {
        // 6. A fact cannot be recorded before it became valid. Warning only:
        // backfilled history is legitimate.
        let valid_from = parse_ts(temporal.valid_from.as_deref());
        let recorded_at = parse_ts(temporal.recorded_at.as_deref());
        if let (Some(v), Some(r)) = (valid_from, recorded_at) {
            if v > r {
                warnings.push(Finding::warning(
                    "temporal.valid_from",
                    "valid_from is after recorded_at",
                    temporal.valid_from.as_deref(),
                ));
            }
        }

        if let Some(decay) = &temporal.decay {
            if let Some(model) = decay.model.as_deref() {
                if !DECAY_MODELS.contains(&model) {
                    warnings.push(Finding::warning(
                        "temporal.decay.model",
                        "unknown decay model",
                        Some(model),
                    ));
                }
            }
            // 7. Unit-interval range.
            check_unit_range(decay.strength, "temporal.decay.strength", &mut errors);
        }
    }

    if let Some(prov) = &front.provenance {
        check_unit_range(prov.confidence, "provenance.confidence", &mut errors);
    }

    // 8. Citation sub-schema.
    if let Some(citations) = &front.citations {
        for (i, c) in citations.iter().enumerate() {
            check_citation(c, i, &mut errors);
        }
    }

    if let Some(conflicts) = &front.conflicts {
        for (i, entry) in conflicts.iter().enumerate() {
            if let Some(res) = entry.resolution.as_deref() {
                if !CONFLICT_RESOLUTIONS.contains(&res) {
                    errors.push(Finding::error(
                        &format!("conflicts[{i}].resolution"),
                        "must be one of merged, invalidated, skipped",
                        Some(res),
                    ));
                }
            }
        }
    }

    // 10. Filename must embed the record's id — catches identity drift from
    // manual renames.
    if let (Some(name), Some(id)) = (filename, front.id.as_deref()) {
        if !name.contains(id) {
            errors.push(Finding::error(
                "id",
                "filename does not embed the record id",
                Some(name),
            ));
        }
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

fn parse_ts(value: Option<&str>) -> Option<chrono::DateTime<chrono::FixedOffset>> {
    chrono::DateTime::parse_from_rfc3339(value?).ok()
}

fn check_timestamp(
    value: Option<&str>,
    field: &str,
    required: bool,
    errors: &mut Vec<Finding>,
) -> Option<chrono::DateTime<chrono::FixedOffset>> {
    match value {
        None => {
            if required {
                errors.push(Finding::error(field, "required field missing", None));
            }
            None
        }
        Some(raw) => match chrono::DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => Some(ts),
            Err(_) => {
                errors.push(Finding::error(
                    field,
                    "not an ISO-8601 timestamp with offset",
                    Some(raw),
                ));
                None
            }
        },
    }
}

fn check_unit_range(value: Option<f64>, field: &str, errors: &mut Vec<Finding>) {
    if let Some(v) = value {
        if !(0.0..=1.0).contains(&v) {
            errors.push(Finding {
                field: field.to_string(),
                severity: Severity::Error,
                message: "must lie in [0.0, 1.0]".into(),
                value: Some(v.to_string()),
            });
        }
    }
}

fn check_citation(c: &Citation, i: usize, errors: &mut Vec<Finding>) {
    match c.citation_type.as_deref() {
        None => errors.push(Finding::error(
            &format!("citations[{i}].type"),
            "required field missing",
            None,
        )),
        Some(t) if !CITATION_TYPES.contains(&t) => errors.push(Finding::error(
            &format!("citations[{i}].type"),
            "unknown citation type",
            Some(t),
        )),
        Some(_) => {}
    }

    match c.title.as_deref() {
        None | Some("") => errors.push(Finding::error(
            &format!("citations[{i}].title"),
            "must be present and non-empty",
            None,
        )),
        Some(_) => {}
    }

    match c.url.as_deref() {
        None => errors.push(Finding::error(
            &format!("citations[{i}].url"),
            "required field missing",
            None,
        )),
        Some(url) if !URL.is_match(url) => errors.push(Finding::error(
            &format!("citations[{i}].url"),
            "must be an http(s) URL",
            Some(url),
        )),
        Some(_) => {}
    }

    check_unit_range(c.relevance, &format!("citations[{i}].relevance"), errors);
}
