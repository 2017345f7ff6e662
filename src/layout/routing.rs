use std::collections::HashMap;

use log::{debug, trace};

use super::placement::Placement;
use super::ranking::Levels;
use super::types::{EdgeKind, EdgeLayout, Position, StrokeStyle};
use crate::config::{LayoutConfig, OutDirection, StrokeConfig};
use crate::ir::{CourseGraph, CourseIndex};
use crate::theme::{Rgb, Theme};

/// Shallower levels get thicker, less saturated strokes; the deepest level
/// uses the base values.
pub fn stroke_for_level(level: usize, max_level: usize, config: &StrokeConfig) -> StrokeStyle {
    let depth = max_level.saturating_sub(level);
    StrokeStyle {
        weight: config.base_pen_size + config.pen_size_increment * depth as f32,
        saturation: config.base_saturation * config.saturation_factor.powi(depth as i32),
    }
}

/// Two corner points of a detour around the straight segment `start -> end`.
pub fn out_of_band_waypoints(
    start: Position,
    end: Position,
    outdentation: f32,
    direction: OutDirection,
) -> [Position; 2] {
    let (ax, bx) = match direction {
        OutDirection::Right => {
            let x = start.x.max(end.x) + outdentation;
            (x, x)
        }
        OutDirection::Left => {
            let x = start.x.min(end.x) - outdentation;
            (x, x)
        }
        OutDirection::Up | OutDirection::Down => (start.x, end.x),
    };
    let (ay, by) = match direction {
        OutDirection::Up => {
            let y = start.y.max(end.y) + outdentation;
            (y, y)
        }
        OutDirection::Down => {
            let y = start.y.min(end.y) - outdentation;
            (y, y)
        }
        OutDirection::Left | OutDirection::Right => (start.y, end.y),
    };
    [Position::new(ax, ay), Position::new(bx, by)]
}

fn edge_color(base: &str, saturation: f32) -> String {
    match Rgb::from_hex(base) {
        Some(rgb) => rgb.with_saturation(saturation).to_hex(),
        None => base.to_string(),
    }
}

struct Router<'a> {
    graph: &'a CourseGraph,
    levels: &'a Levels,
    placement: &'a Placement,
    theme: &'a Theme,
    config: &'a LayoutConfig,
    max_level: usize,
}

impl Router<'_> {
    fn stroke(&self, idx: CourseIndex) -> StrokeStyle {
        stroke_for_level(self.levels.get(idx), self.max_level, &self.config.stroke)
    }

    fn label_width(&self, idx: CourseIndex) -> f32 {
        let label = &self.config.label;
        self.graph
            .course(idx)
            .descriptor_len(label.with_name, label.with_semester) as f32
            * self.config.label_unit_width
    }

    fn direct(&self, kind: EdgeKind, from: CourseIndex, to: CourseIndex, base: &str) -> EdgeLayout {
        let origin = self.placement.position(from);
        let stroke = self.stroke(from);
        EdgeLayout {
            kind,
            from,
            to,
            start: Position::new(origin.x, origin.y + self.config.label_height),
            end: self.placement.position(to),
            waypoints: Vec::new(),
            color: edge_color(base, stroke.saturation),
            stroke_weight: stroke.weight,
            outdentation: None,
        }
    }

    fn requirement(&self, from: CourseIndex, to: CourseIndex) -> EdgeLayout {
        let base = &self.theme.requirement_color;
        let span = self.levels.get(from).saturating_sub(self.levels.get(to));
        if !self.config.routing.route_long_requirements || span <= 1 {
            return self.direct(EdgeKind::Requirement, from, to, base);
        }

        // Go around the rows in between on whichever side the pair leans to.
        let origin = self.placement.position(from);
        let target = self.placement.position(to);
        let lean_left = (origin.x + target.x) / 2.0 < 0.0;
        let (direction, side) = if lean_left {
            (OutDirection::Left, -1.0)
        } else {
            (OutDirection::Right, 1.0)
        };
        let half_height = self.config.label_height / 2.0;
        let start = Position::new(
            origin.x + side * self.label_width(from) / 2.0,
            origin.y + half_height,
        );
        let end = Position::new(
            target.x + side * self.label_width(to) / 2.0,
            target.y + half_height,
        );
        let routing = &self.config.routing;
        let outdentation =
            routing.base_outdentation * ((span - 1) as f32 * routing.long_edge_factor + 1.0);
        let stroke = self.stroke(from);
        EdgeLayout {
            kind: EdgeKind::Requirement,
            from,
            to,
            start,
            end,
            waypoints: out_of_band_waypoints(start, end, outdentation, direction).to_vec(),
            color: edge_color(base, stroke.saturation),
            stroke_weight: stroke.weight,
            outdentation: Some(outdentation),
        }
    }

    fn same_row_corequisite(&self, from: CourseIndex, to: CourseIndex, slot: usize) -> EdgeLayout {
        let origin = self.placement.position(from);
        let target = self.placement.position(to);
        let clearance = self.config.label_height;
        // Leave and enter on the facing sides.
        let side = if target.x < origin.x { -1.0 } else { 1.0 };
        let start = Position::new(origin.x + side * clearance, origin.y);
        let end = Position::new(target.x - side * clearance, target.y);
        let outdentation = slot as f32 * self.config.routing.base_outdentation;
        let direction = self.config.routing.corequisite_direction;
        let stroke = self.stroke(from);
        EdgeLayout {
            kind: EdgeKind::Corequisite,
            from,
            to,
            start,
            end,
            waypoints: out_of_band_waypoints(start, end, outdentation, direction).to_vec(),
            color: edge_color(&self.theme.corequisite_color, stroke.saturation),
            stroke_weight: stroke.weight,
            outdentation: Some(outdentation),
        }
    }
}

/// Produces drawing instructions for every requirement edge followed by
/// every corequisite edge, in graph order. Edges touching a course in an
/// overflow row are not drawn.
///
/// Same-row corequisites detour out of the row; each further detour on the
/// same row is pushed one `base_outdentation` further out so the routes
/// never overlap.
pub fn route_edges(
    graph: &CourseGraph,
    levels: &Levels,
    placement: &Placement,
    theme: &Theme,
    config: &LayoutConfig,
) -> Vec<EdgeLayout> {
    let router = Router {
        graph,
        levels,
        placement,
        theme,
        config,
        max_level: levels.max_level(),
    };

    let drawable = |&(from, to): &(CourseIndex, CourseIndex)| {
        let skip = placement.in_overflow(from) || placement.in_overflow(to);
        if skip {
            trace!(
                from:% = graph.course(from).id,
                to:% = graph.course(to).id;
                "Skipping edge into an overflow row"
            );
        }
        !skip
    };

    let mut edges: Vec<EdgeLayout> = graph
        .requirement_edges()
        .filter(drawable)
        .map(|(from, to)| router.requirement(from, to))
        .collect();

    let mut slots: HashMap<usize, usize> = HashMap::new();
    for (from, to) in graph.corequirement_edges().filter(drawable) {
        let row = placement.row_of(from);
        let edge = if row == placement.row_of(to) {
            let slot = slots.entry(row).or_insert(0);
            *slot += 1;
            trace!(
                from:% = graph.course(from).id,
                to:% = graph.course(to).id,
                row,
                slot = *slot;
                "Routing same-row corequisite"
            );
            router.same_row_corequisite(from, to, *slot)
        } else {
            router.direct(EdgeKind::Corequisite, from, to, &theme.corequisite_color)
        };
        edges.push(edge);
    }

    debug!(
        edges = edges.len(),
        routed = edges.iter().filter(|edge| edge.is_routed()).count();
        "Edges routed"
    );
    edges
}
