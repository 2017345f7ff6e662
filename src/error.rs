//! Error types for graph construction and layout.

use thiserror::Error;

use crate::ir::CourseId;

/// Errors raised while building a course graph or laying it out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrereqError {
    #[error("duplicate course id: {0}")]
    DuplicateId(CourseId),

    #[error("unknown course id: {0}")]
    UnknownCourse(CourseId),

    /// The ids along the cycle, starting and ending with the same course.
    #[error("requisite cycle: {}", format_cycle(.path))]
    Cycle { path: Vec<CourseId> },

    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

fn format_cycle(path: &[CourseId]) -> String {
    path.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type Result<T> = std::result::Result<T, PrereqError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_path() {
        let err = PrereqError::Cycle {
            path: vec![
                CourseId::new("CMPE", "150"),
                CourseId::new("CMPE", "160"),
                CourseId::new("CMPE", "150"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "requisite cycle: CMPE 150 -> CMPE 160 -> CMPE 150"
        );
    }
}
