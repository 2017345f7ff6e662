use std::collections::{BTreeSet, HashMap};
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{PrereqError, Result};

/// Index of a course inside its [`CourseGraph`]. Stable for the graph's lifetime.
pub type CourseIndex = usize;

/// A course identifier split into department code and course number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CourseId {
    pub department: String,
    pub number: String,
}

impl CourseId {
    pub fn new(department: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            department: department.into(),
            number: number.into(),
        }
    }

    /// Splits `"CMPE 150"` / `"CMPE150"` on the letter/digit boundary.
    pub fn parse(raw: &str) -> Self {
        crate::parser::decompose_id(raw)
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.number.is_empty() {
            write!(f, "{}", self.department)
        } else {
            write!(f, "{} {}", self.department, self.number)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    #[serde(alias = "pre", alias = "prereq")]
    Prerequisite,
    #[serde(alias = "co", alias = "coreq")]
    Corequisite,
}

/// A course as delivered by the data-acquisition side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub semester: String,
}

/// `subject` requires (or corequires) every course in `objects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementRecord {
    pub subject: String,
    pub kind: RelationKind,
    #[serde(default)]
    pub objects: BTreeSet<String>,
}

#[derive(Debug, Clone)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub semester: String,
    requires: BTreeSet<CourseIndex>,
    required_for: BTreeSet<CourseIndex>,
    corequires: BTreeSet<CourseIndex>,
    corequired_for: BTreeSet<CourseIndex>,
}

impl Course {
    fn new(id: CourseId, name: String, semester: String) -> Self {
        Self {
            id,
            name,
            semester,
            requires: BTreeSet::new(),
            required_for: BTreeSet::new(),
            corequires: BTreeSet::new(),
            corequired_for: BTreeSet::new(),
        }
    }

    pub fn requires(&self) -> impl Iterator<Item = CourseIndex> + '_ {
        self.requires.iter().copied()
    }

    pub fn required_for(&self) -> impl Iterator<Item = CourseIndex> + '_ {
        self.required_for.iter().copied()
    }

    pub fn corequires(&self) -> impl Iterator<Item = CourseIndex> + '_ {
        self.corequires.iter().copied()
    }

    pub fn corequired_for(&self) -> impl Iterator<Item = CourseIndex> + '_ {
        self.corequired_for.iter().copied()
    }

    /// No requisites in either direction. Being only corequired by others
    /// does not count.
    pub fn is_isolated(&self) -> bool {
        self.requires.is_empty() && self.required_for.is_empty() && self.corequires.is_empty()
    }

    pub fn descriptor(&self, with_name: bool, with_semester: bool) -> String {
        let mut desc = self.id.to_string();
        if with_name {
            desc.push_str(&format!(" ({})", self.name));
        }
        if with_semester {
            desc.push_str(&format!(" ({})", self.semester));
        }
        desc
    }

    pub fn descriptor_len(&self, with_name: bool, with_semester: bool) -> usize {
        self.descriptor(with_name, with_semester).chars().count()
    }
}

/// Courses plus their requisite adjacency, both directions kept in step.
#[derive(Debug, Clone, Default)]
pub struct CourseGraph {
    courses: Vec<Course>,
    index: HashMap<CourseId, CourseIndex>,
}

impl CourseGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from raw records. Duplicate course ids are fatal;
    /// requisites naming a course outside `courses` are dropped.
    pub fn from_records(
        courses: &[CourseRecord],
        requirements: &[RequirementRecord],
    ) -> Result<Self> {
        let mut graph = Self::new();
        for record in courses {
            graph.add_course(
                CourseId::parse(&record.id),
                record.name.clone(),
                record.semester.clone(),
            )?;
        }

        let mut dropped = 0usize;
        for record in requirements {
            let subject = CourseId::parse(&record.subject);
            for object in &record.objects {
                let object = CourseId::parse(object);
                let added = match record.kind {
                    RelationKind::Prerequisite => graph.add_requirement(&subject, &object),
                    RelationKind::Corequisite => graph.add_corequirement(&subject, &object),
                };
                match added {
                    Ok(_) => {}
                    Err(PrereqError::UnknownCourse(missing)) => {
                        debug!(
                            subject:% = subject,
                            missing:% = missing,
                            kind:? = record.kind;
                            "Skipping requisite outside the course list"
                        );
                        dropped += 1;
                    }
                    Err(err) => return Err(err),
                }
            }
        }
        debug!(courses = graph.len(), dropped; "Course graph built");
        Ok(graph)
    }

    pub fn add_course(
        &mut self,
        id: CourseId,
        name: impl Into<String>,
        semester: impl Into<String>,
    ) -> Result<CourseIndex> {
        if self.index.contains_key(&id) {
            return Err(PrereqError::DuplicateId(id));
        }
        let idx = self.courses.len();
        self.index.insert(id.clone(), idx);
        self.courses
            .push(Course::new(id, name.into(), semester.into()));
        Ok(idx)
    }

    /// Records that `from` requires `to`. Returns `false` when the edge
    /// already existed.
    pub fn add_requirement(&mut self, from: &CourseId, to: &CourseId) -> Result<bool> {
        let (from, to) = self.resolve_pair(from, to)?;
        let added = self.courses[from].requires.insert(to);
        self.courses[to].required_for.insert(from);
        Ok(added)
    }

    /// Records that `from` corequires `to`. The reverse relation is not implied.
    pub fn add_corequirement(&mut self, from: &CourseId, to: &CourseId) -> Result<bool> {
        let (from, to) = self.resolve_pair(from, to)?;
        let added = self.courses[from].corequires.insert(to);
        self.courses[to].corequired_for.insert(from);
        Ok(added)
    }

    fn resolve_pair(&self, from: &CourseId, to: &CourseId) -> Result<(CourseIndex, CourseIndex)> {
        let from = self
            .lookup(from)
            .ok_or_else(|| PrereqError::UnknownCourse(from.clone()))?;
        let to = self
            .lookup(to)
            .ok_or_else(|| PrereqError::UnknownCourse(to.clone()))?;
        Ok((from, to))
    }

    pub fn lookup(&self, id: &CourseId) -> Option<CourseIndex> {
        self.index.get(id).copied()
    }

    pub fn course(&self, idx: CourseIndex) -> &Course {
        &self.courses[idx]
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn is_isolated(&self, idx: CourseIndex) -> bool {
        self.courses[idx].is_isolated()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn requirement_edges(&self) -> impl Iterator<Item = (CourseIndex, CourseIndex)> + '_ {
        self.courses
            .iter()
            .enumerate()
            .flat_map(|(idx, course)| course.requires().map(move |to| (idx, to)))
    }

    pub fn corequirement_edges(&self) -> impl Iterator<Item = (CourseIndex, CourseIndex)> + '_ {
        self.courses
            .iter()
            .enumerate()
            .flat_map(|(idx, course)| course.corequires().map(move |to| (idx, to)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> CourseId {
        CourseId::parse(raw)
    }

    fn graph_of(ids: &[&str]) -> CourseGraph {
        let mut graph = CourseGraph::new();
        for raw in ids {
            graph.add_course(id(raw), *raw, "1").unwrap();
        }
        graph
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut graph = graph_of(&["CMPE 150"]);
        let err = graph.add_course(id("CMPE150"), "again", "2").unwrap_err();
        assert_eq!(err, PrereqError::DuplicateId(id("CMPE 150")));
    }

    #[test]
    fn requirement_is_recorded_both_ways_and_idempotent() {
        let mut graph = graph_of(&["CMPE 160", "CMPE 150"]);
        assert!(graph.add_requirement(&id("CMPE 160"), &id("CMPE 150")).unwrap());
        assert!(!graph.add_requirement(&id("CMPE 160"), &id("CMPE 150")).unwrap());
        let dependent = graph.course(0);
        let prereq = graph.course(1);
        assert_eq!(dependent.requires().collect::<Vec<_>>(), vec![1]);
        assert_eq!(prereq.required_for().collect::<Vec<_>>(), vec![0]);
        assert_eq!(graph.requirement_edges().count(), 1);
    }

    #[test]
    fn unknown_course_is_an_error_on_direct_api() {
        let mut graph = graph_of(&["CMPE 160"]);
        let err = graph
            .add_requirement(&id("CMPE 160"), &id("MATH 101"))
            .unwrap_err();
        assert_eq!(err, PrereqError::UnknownCourse(id("MATH 101")));
    }

    #[test]
    fn corequisite_is_not_mirrored() {
        let mut graph = graph_of(&["PHYS 101", "PHYS 103"]);
        graph
            .add_corequirement(&id("PHYS 103"), &id("PHYS 101"))
            .unwrap();
        assert_eq!(graph.course(1).corequires().count(), 1);
        assert_eq!(graph.course(0).corequires().count(), 0);
        assert_eq!(graph.course(0).corequired_for().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn isolation_rules() {
        let mut graph = graph_of(&["A 1", "B 1", "C 1", "D 1", "E 1"]);
        graph.add_requirement(&id("A 1"), &id("B 1")).unwrap();
        graph.add_corequirement(&id("D 1"), &id("E 1")).unwrap();
        assert!(!graph.is_isolated(0));
        // required by others only
        assert!(!graph.is_isolated(1));
        assert!(graph.is_isolated(2));
        assert!(!graph.is_isolated(3));
        // only corequired by others
        assert!(graph.is_isolated(4));
    }

    #[test]
    fn from_records_drops_edges_to_missing_courses() {
        let courses = vec![
            CourseRecord {
                id: "CMPE 150".into(),
                name: "Intro".into(),
                semester: "1".into(),
            },
            CourseRecord {
                id: "CMPE 160".into(),
                name: "OOP".into(),
                semester: "2".into(),
            },
        ];
        let requirements = vec![RequirementRecord {
            subject: "CMPE 160".into(),
            kind: RelationKind::Prerequisite,
            objects: ["CMPE 150", "EE 210"].iter().map(|s| s.to_string()).collect(),
        }];
        let graph = CourseGraph::from_records(&courses, &requirements).unwrap();
        assert_eq!(graph.requirement_edges().collect::<Vec<_>>(), vec![(1, 0)]);
    }

    #[test]
    fn descriptor_variants() {
        let mut graph = CourseGraph::new();
        graph
            .add_course(id("CMPE 150"), "Introduction to Computing", "1")
            .unwrap();
        graph.add_course(id("SEMINAR"), "Seminar", "8").unwrap();
        assert_eq!(graph.course(0).descriptor(false, false), "CMPE 150");
        assert_eq!(
            graph.course(0).descriptor(true, true),
            "CMPE 150 (Introduction to Computing) (1)"
        );
        assert_eq!(graph.course(1).descriptor(false, false), "SEMINAR");
        assert_eq!(graph.course(0).descriptor_len(false, false), 8);
    }
}
