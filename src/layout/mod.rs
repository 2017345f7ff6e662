mod placement;
mod ranking;
mod routing;
mod rows;
pub(crate) mod types;
pub use placement::{PlacedCourse, Placement, assign_positions};
pub use ranking::{Levels, assign_levels};
pub use routing::{out_of_band_waypoints, route_edges, stroke_for_level};
pub use rows::{build_rows, max_courses_per_row};
pub use types::*;

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::ir::CourseGraph;
use crate::theme::Theme;
use log::info;

/// Runs the whole pipeline: levels, rows, positions, then edge routes.
///
/// Fails only when the requisite data contains a cycle; no later stage runs
/// in that case.
pub fn compute_layout(graph: &CourseGraph, theme: &Theme, config: &LayoutConfig) -> Result<Layout> {
    info!(courses = graph.len(); "Computing course layout");

    let levels = assign_levels(graph)?;
    let max_per_row = max_courses_per_row(graph, config);
    let rows = build_rows(graph, &levels, max_per_row);
    let placement = assign_positions(graph, &rows, config);
    let edges = route_edges(graph, &levels, &placement, theme, config);

    let max_level = levels.max_level();
    let courses: Vec<CourseLayout> = graph
        .courses()
        .iter()
        .enumerate()
        .map(|(idx, course)| {
            let level = levels.get(idx);
            CourseLayout {
                index: idx,
                id: course.id.clone(),
                label: course.descriptor(config.label.with_name, config.label.with_semester),
                name: course.name.clone(),
                semester: course.semester.clone(),
                level,
                row: placement.row_of(idx),
                position: placement.position(idx),
                stroke: stroke_for_level(level, max_level, &config.stroke),
            }
        })
        .collect();

    let bounds = compute_bounds(&courses, &edges, config);
    info!(
        rows = rows.len(),
        edges = edges.len(),
        max_level,
        width = bounds.width(),
        height = bounds.height();
        "Layout computed"
    );

    Ok(Layout {
        courses,
        edges,
        rows,
        max_level,
        max_courses_per_row: max_per_row,
        bounds,
    })
}

/// Box around every label (centered on its anchor, one label height tall)
/// and every edge point.
fn compute_bounds(courses: &[CourseLayout], edges: &[EdgeLayout], config: &LayoutConfig) -> Bounds {
    let mut points = courses.iter().flat_map(|course| {
        let half = course.label.chars().count() as f32 * config.label_unit_width / 2.0;
        let Position { x, y } = course.position;
        [
            Position::new(x - half, y),
            Position::new(x + half, y + config.label_height),
        ]
    });
    let Some(first) = points.next() else {
        return Bounds::default();
    };
    let mut bounds = Bounds {
        min_x: first.x,
        min_y: first.y,
        max_x: first.x,
        max_y: first.y,
    };
    for point in points {
        bounds.include(point);
    }
    for edge in edges {
        for point in edge.points() {
            bounds.include(point);
        }
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrereqError;
    use crate::ir::CourseId;

    fn graph(ids: &[&str], requires: &[(&str, &str)], corequires: &[(&str, &str)]) -> CourseGraph {
        let mut graph = CourseGraph::new();
        for id in ids {
            graph.add_course(CourseId::parse(id), *id, "1").unwrap();
        }
        for (from, to) in requires {
            graph
                .add_requirement(&CourseId::parse(from), &CourseId::parse(to))
                .unwrap();
        }
        for (from, to) in corequires {
            graph
                .add_corequirement(&CourseId::parse(from), &CourseId::parse(to))
                .unwrap();
        }
        graph
    }

    #[test]
    fn pipeline_produces_one_entry_per_course() {
        let g = graph(
            &["CMPE 150", "CMPE 160", "CMPE 250", "MATH 101"],
            &[("CMPE 160", "CMPE 150"), ("CMPE 250", "CMPE 160")],
            &[("CMPE 150", "MATH 101")],
        );
        let layout = compute_layout(&g, &Theme::classic(), &LayoutConfig::default()).unwrap();
        assert_eq!(layout.courses.len(), 4);
        assert_eq!(layout.max_level, 2);
        assert_eq!(layout.course(2).level, 2);
        assert_eq!(layout.course(2).label, "CMPE 250");
        assert_eq!(layout.edges.len(), 3);
        assert_eq!(layout.rows.len(), 3);
        assert!(layout.bounds.width() > 0.0);
        assert!(layout.bounds.height() > 2.0 * LayoutConfig::default().row_spacing);
    }

    #[test]
    fn cycle_aborts_the_pipeline() {
        let g = graph(&["A 1", "B 1"], &[("A 1", "B 1"), ("B 1", "A 1")], &[]);
        let err = compute_layout(&g, &Theme::classic(), &LayoutConfig::default()).unwrap_err();
        assert!(matches!(err, PrereqError::Cycle { .. }));
    }

    #[test]
    fn empty_graph_has_empty_layout() {
        let layout =
            compute_layout(&CourseGraph::new(), &Theme::classic(), &LayoutConfig::default())
                .unwrap();
        assert!(layout.courses.is_empty());
        assert!(layout.rows.is_empty());
        assert_eq!(layout.bounds, Bounds::default());
    }

    #[test]
    fn labels_can_carry_name_and_semester() {
        let g = graph(&["CMPE 150"], &[], &[]);
        let mut config = LayoutConfig::default();
        config.label.with_name = true;
        config.label.with_semester = true;
        let layout = compute_layout(&g, &Theme::classic(), &config).unwrap();
        assert_eq!(layout.course(0).label, "CMPE 150 (CMPE 150) (1)");
    }
}
