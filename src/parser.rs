use crate::ir::{CourseId, CourseRecord, RelationKind, RequirementRecord};
use anyhow::{Context, Result};
use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

static COURSE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\p{L}+)\s*(\d+)").unwrap());
static REQUISITE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z]{2,4}\s*[1-9][0-9][A-Z0-9]").unwrap());

/// Course and requirement records ready for [`crate::ir::CourseGraph::from_records`].
#[derive(Debug, Default, Clone)]
pub struct Records {
    pub courses: Vec<CourseRecord>,
    pub requirements: Vec<RequirementRecord>,
}

#[derive(Debug, Deserialize)]
struct RecordsFile {
    courses: Vec<CourseEntry>,
    #[serde(default)]
    requirements: Vec<RequirementEntry>,
}

#[derive(Debug, Deserialize)]
struct CourseEntry {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    semester: Option<Label>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Label {
    Text(String),
    Number(i64),
}

impl Label {
    fn into_string(self) -> String {
        match self {
            Label::Text(text) => text,
            Label::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RequirementEntry {
    subject: String,
    kind: RelationKind,
    #[serde(default)]
    objects: Vec<String>,
    /// Free requisite text, scanned for course ids.
    #[serde(default)]
    text: Option<String>,
}

/// Splits an id string on the letter/digit boundary. Strings without one
/// keep the whole text as the department and an empty number.
pub fn decompose_id(raw: &str) -> CourseId {
    let trimmed = raw.trim();
    match COURSE_ID_RE.captures(trimmed) {
        Some(caps) => CourseId::new(&caps[1], &caps[2]),
        None => CourseId::new(trimmed, ""),
    }
}

/// Pulls every course id out of a free-form requisite description such as
/// `"CMPE 150 and (MATH 101 or MATH 161)"`.
pub fn extract_course_ids(text: &str) -> Vec<CourseId> {
    REQUISITE_ID_RE
        .find_iter(text)
        .map(|m| decompose_id(m.as_str()))
        .collect()
}

/// Parses a `{ "courses": [...], "requirements": [...] }` document. JSON5 is
/// accepted as a fallback. Requirement entries sharing subject and kind are
/// merged.
pub fn parse_records(input: &str) -> Result<Records> {
    let file: RecordsFile = match serde_json::from_str(input) {
        Ok(file) => file,
        Err(json_err) => json5::from_str(input)
            .with_context(|| format!("failed to parse course records: {json_err}"))?,
    };

    let courses: Vec<CourseRecord> = file
        .courses
        .into_iter()
        .map(|entry| CourseRecord {
            id: entry.id,
            name: entry.name,
            semester: entry.semester.map(Label::into_string).unwrap_or_default(),
        })
        .collect();

    let mut merged: BTreeMap<(CourseId, RelationKind), BTreeSet<String>> = BTreeMap::new();
    let mut order: Vec<(CourseId, RelationKind)> = Vec::new();
    for entry in file.requirements {
        let subject = decompose_id(&entry.subject);
        let key = (subject, entry.kind);
        let objects = merged.entry(key.clone()).or_insert_with(|| {
            order.push(key.clone());
            BTreeSet::new()
        });
        for object in &entry.objects {
            objects.insert(decompose_id(object).to_string());
        }
        if let Some(text) = entry.text.as_deref() {
            let found = extract_course_ids(text);
            trace!(text, found = found.len(); "Extracted requisite ids");
            objects.extend(found.iter().map(|id| id.to_string()));
        }
    }

    let requirements: Vec<RequirementRecord> = order
        .into_iter()
        .filter_map(|key| {
            let objects = merged.remove(&key)?;
            let (subject, kind) = key;
            Some(RequirementRecord {
                subject: subject.to_string(),
                kind,
                objects,
            })
        })
        .collect();

    debug!(
        courses = courses.len(),
        requirements = requirements.len();
        "Parsed course records"
    );
    Ok(Records {
        courses,
        requirements,
    })
}
