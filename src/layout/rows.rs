use std::collections::BTreeMap;

use log::debug;

use super::ranking::Levels;
use super::types::{Row, RowKind};
use crate::config::LayoutConfig;
use crate::ir::{CourseGraph, CourseIndex};

/// How many course labels fit side by side on the usable canvas width,
/// using the widest label in the whole graph. Never less than one.
pub fn max_courses_per_row(graph: &CourseGraph, config: &LayoutConfig) -> usize {
    if let Some(explicit) = config.max_courses_per_row {
        return explicit.max(1);
    }
    let widest = graph
        .courses()
        .iter()
        .map(|course| course.descriptor_len(config.label.with_name, config.label.with_semester))
        .max()
        .unwrap_or(0);
    let course_width = config.label_unit_width * config.clamp_label_chars(widest) as f32;
    let usable = config.canvas_width * config.usable_width_ratio;
    ((usable / course_width).floor() as usize).max(1)
}

/// Groups courses into render rows: overflow rows first, then one row per
/// level in ascending order. Courses keep their graph order within a row.
///
/// Overflow only kicks in when the level-0 row is wider than
/// `max_per_row`; then its isolated courses move into balanced overflow rows.
pub fn build_rows(graph: &CourseGraph, levels: &Levels, max_per_row: usize) -> Vec<Row> {
    let max_per_row = max_per_row.max(1);
    let mut by_level: BTreeMap<usize, Vec<CourseIndex>> = BTreeMap::new();
    for idx in 0..graph.len() {
        by_level.entry(levels.get(idx)).or_default().push(idx);
    }

    let mut overflow = Vec::new();
    if let Some(ground) = by_level.get_mut(&0) {
        if ground.len() > max_per_row {
            let (isolated, connected): (Vec<_>, Vec<_>) =
                ground.iter().copied().partition(|&idx| graph.is_isolated(idx));
            *ground = connected;
            overflow = split_balanced(&isolated, max_per_row);
            debug!(
                isolated = isolated.len(),
                overflow_rows = overflow.len(),
                max_per_row;
                "Moved isolated courses into overflow rows"
            );
        }
    }

    let mut rows: Vec<Row> = overflow
        .into_iter()
        .map(|courses| Row {
            kind: RowKind::Overflow,
            courses,
        })
        .collect();
    rows.extend(
        by_level
            .into_iter()
            .filter(|(_, courses)| !courses.is_empty())
            .map(|(level, courses)| Row {
                kind: RowKind::Level(level),
                courses,
            }),
    );
    rows
}

/// Splits `items` into `ceil(len / max)` rows, each as full as the
/// remaining items allow when spread evenly over the remaining rows.
fn split_balanced(items: &[CourseIndex], max_per_row: usize) -> Vec<Vec<CourseIndex>> {
    let mut rows = Vec::new();
    let mut remaining = items;
    while !remaining.is_empty() {
        let row_count = remaining.len().div_ceil(max_per_row);
        let take = remaining.len().div_ceil(row_count);
        rows.push(remaining[..take].to_vec());
        remaining = &remaining[take..];
    }
    rows
}
