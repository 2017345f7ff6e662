use serde::Serialize;

use crate::ir::{CourseId, CourseIndex};

/// A point in layout space. The y axis points up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "level")]
pub enum RowKind {
    /// Holds isolated courses only; carries no dependency meaning.
    Overflow,
    Level(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub kind: RowKind,
    pub courses: Vec<CourseIndex>,
}

impl Row {
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn is_overflow(&self) -> bool {
        self.kind == RowKind::Overflow
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrokeStyle {
    pub weight: f32,
    pub saturation: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Requirement,
    Corequisite,
}

#[derive(Debug, Clone)]
pub struct CourseLayout {
    pub index: CourseIndex,
    pub id: CourseId,
    pub label: String,
    pub name: String,
    pub semester: String,
    pub level: usize,
    pub row: usize,
    pub position: Position,
    pub stroke: StrokeStyle,
}

#[derive(Debug, Clone)]
pub struct EdgeLayout {
    pub kind: EdgeKind,
    pub from: CourseIndex,
    pub to: CourseIndex,
    pub start: Position,
    pub end: Position,
    /// Corner points of an out-of-band route; empty for direct arrows.
    pub waypoints: Vec<Position>,
    pub color: String,
    pub stroke_weight: f32,
    pub outdentation: Option<f32>,
}

impl EdgeLayout {
    pub fn is_routed(&self) -> bool {
        !self.waypoints.is_empty()
    }

    /// Start, waypoints and end in drawing order.
    pub fn points(&self) -> Vec<Position> {
        let mut points = Vec::with_capacity(self.waypoints.len() + 2);
        points.push(self.start);
        points.extend(self.waypoints.iter().copied());
        points.push(self.end);
        points
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub(crate) fn include(&mut self, point: Position) {
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
    }
}

#[derive(Debug, Clone)]
pub struct Layout {
    /// One entry per course, in graph index order.
    pub courses: Vec<CourseLayout>,
    pub edges: Vec<EdgeLayout>,
    pub rows: Vec<Row>,
    pub max_level: usize,
    pub max_courses_per_row: usize,
    pub bounds: Bounds,
}

impl Layout {
    pub fn course(&self, idx: CourseIndex) -> &CourseLayout {
        &self.courses[idx]
    }

    pub fn overflow_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|row| row.is_overflow())
    }
}
