use log::debug;

use super::types::{Position, Row, RowKind};
use crate::config::LayoutConfig;
use crate::ir::{CourseGraph, CourseIndex};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlacedCourse {
    pub row: usize,
    pub column: usize,
    pub position: Position,
}

/// Frozen course positions. Built once by [`assign_positions`]; only
/// readable afterwards.
#[derive(Debug, Clone)]
pub struct Placement {
    placed: Vec<PlacedCourse>,
    course_spacing: Vec<f32>,
    row_ys: Vec<f32>,
    row_kinds: Vec<RowKind>,
}

impl Placement {
    pub fn get(&self, idx: CourseIndex) -> PlacedCourse {
        self.placed[idx]
    }

    pub fn position(&self, idx: CourseIndex) -> Position {
        self.placed[idx].position
    }

    pub fn row_of(&self, idx: CourseIndex) -> usize {
        self.placed[idx].row
    }

    /// Horizontal distance between neighbouring courses in `row`.
    pub fn course_spacing(&self, row: usize) -> f32 {
        self.course_spacing[row]
    }

    pub fn row_y(&self, row: usize) -> f32 {
        self.row_ys[row]
    }

    pub fn row_kind(&self, row: usize) -> RowKind {
        self.row_kinds[row]
    }

    /// Whether the course sits in an overflow row.
    pub fn in_overflow(&self, idx: CourseIndex) -> bool {
        self.row_kinds[self.placed[idx].row] == RowKind::Overflow
    }

    pub fn row_count(&self) -> usize {
        self.row_ys.len()
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }
}

/// Centers each row on x = 0 and stacks rows downwards from the first,
/// symmetric about y = 0.
pub fn assign_positions(graph: &CourseGraph, rows: &[Row], config: &LayoutConfig) -> Placement {
    let mut placed = vec![PlacedCourse::default(); graph.len()];
    let mut course_spacing = Vec::with_capacity(rows.len());
    let mut row_ys = Vec::with_capacity(rows.len());
    // Center between the first and last row so the stack is symmetric about y = 0.
    let mid_level = rows.len().saturating_sub(1) as f32 / 2.0;

    for (row_idx, row) in rows.iter().enumerate() {
        let widest = row
            .courses
            .iter()
            .map(|&idx| {
                graph
                    .course(idx)
                    .descriptor_len(config.label.with_name, config.label.with_semester)
            })
            .max()
            .unwrap_or(0);
        let spacing = config.label_unit_width * config.clamp_label_chars(widest) as f32;
        let y = (mid_level - row_idx as f32) * config.row_spacing;
        let half = row.len().saturating_sub(1) as f32 / 2.0;

        for (column, &idx) in row.courses.iter().enumerate() {
            placed[idx] = PlacedCourse {
                row: row_idx,
                column,
                position: Position::new((column as f32 - half) * spacing, y),
            };
        }
        course_spacing.push(spacing);
        row_ys.push(y);
    }
    let row_kinds = rows.iter().map(|row| row.kind).collect();

    debug!(rows = rows.len(), courses = graph.len(); "Positions assigned");
    Placement {
        placed,
        course_spacing,
        row_ys,
        row_kinds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::CourseId;
    use crate::layout::types::RowKind;

    fn graph_with_labels(labels: &[&str]) -> CourseGraph {
        let mut graph = CourseGraph::new();
        for label in labels {
            graph.add_course(CourseId::parse(label), "", "").unwrap();
        }
        graph
    }

    fn row(kind: RowKind, courses: &[usize]) -> Row {
        Row {
            kind,
            courses: courses.to_vec(),
        }
    }

    #[test]
    fn rows_are_centered_on_zero() {
        let graph = graph_with_labels(&["A 1", "B 1", "C 1", "D 1", "E 1"]);
        let rows = vec![
            row(RowKind::Level(0), &[0, 1, 2]),
            row(RowKind::Level(1), &[3, 4]),
        ];
        let placement = assign_positions(&graph, &rows, &LayoutConfig::default());

        assert_eq!(placement.position(1).x, 0.0);
        assert_eq!(placement.position(0).x, -90.0);
        assert_eq!(placement.position(2).x, 90.0);
        assert_eq!(placement.position(3).x, -45.0);
        assert_eq!(placement.position(4).x, 45.0);
        assert_eq!(placement.get(4).column, 1);
    }

    #[test]
    fn rows_are_stacked_symmetrically() {
        let graph = graph_with_labels(&["A 1", "B 1", "C 1"]);
        let config = LayoutConfig {
            row_spacing: 50.0,
            ..LayoutConfig::default()
        };
        let rows = vec![
            row(RowKind::Overflow, &[0]),
            row(RowKind::Level(0), &[1]),
            row(RowKind::Level(1), &[2]),
        ];
        let placement = assign_positions(&graph, &rows, &config);
        assert_eq!(placement.position(0).y, 50.0);
        assert_eq!(placement.position(1).y, 0.0);
        assert_eq!(placement.position(2).y, -50.0);
        assert_eq!(placement.row_of(2), 2);
        assert_eq!(placement.row_count(), 3);
        assert_eq!(placement.row_kind(0), RowKind::Overflow);
        assert!(placement.in_overflow(0));
        assert!(!placement.in_overflow(1));
    }

    #[test]
    fn spacing_follows_widest_label_in_row() {
        let graph = graph_with_labels(&["ABCDEFGHIJKL 123", "A 1", "VERYLONGDEPARTMENT 101"]);
        let rows = vec![
            row(RowKind::Level(0), &[0, 1]),
            row(RowKind::Level(1), &[2]),
        ];
        let placement = assign_positions(&graph, &rows, &LayoutConfig::default());
        assert_eq!(placement.course_spacing(0), 160.0);
        assert_eq!(placement.course_spacing(1), 160.0);

        let narrow = vec![row(RowKind::Level(0), &[1])];
        let placement = assign_positions(&graph, &narrow, &LayoutConfig::default());
        assert_eq!(placement.course_spacing(0), 90.0);
        assert_eq!(placement.position(1).x, 0.0);
    }
}
