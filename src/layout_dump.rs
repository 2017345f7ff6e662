use crate::layout::{Bounds, EdgeKind, Layout, RowKind};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Serializable view of a [`Layout`] handed to a renderer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub max_level: usize,
    pub max_courses_per_row: usize,
    pub bounds: Bounds,
    pub rows: Vec<RowDump>,
    pub courses: Vec<CourseDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowDump {
    pub index: usize,
    #[serde(flatten)]
    pub kind: RowKind,
    pub y: f32,
    pub courses: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDump {
    pub id: String,
    pub department: String,
    pub number: String,
    pub label: String,
    pub name: String,
    pub semester: String,
    pub level: usize,
    pub row: usize,
    pub position: [f32; 2],
    pub stroke_weight: f32,
    pub stroke_saturation: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDump {
    pub kind: EdgeKind,
    pub from: String,
    pub to: String,
    pub start: [f32; 2],
    pub end: [f32; 2],
    pub waypoints: Vec<[f32; 2]>,
    pub color: String,
    pub stroke_weight: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outdentation: Option<f32>,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let id_of = |idx: usize| layout.course(idx).id.to_string();

        let rows = layout
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| RowDump {
                index,
                kind: row.kind,
                y: row
                    .courses
                    .first()
                    .map(|&idx| layout.course(idx).position.y)
                    .unwrap_or_default(),
                courses: row.courses.iter().map(|&idx| id_of(idx)).collect(),
            })
            .collect();

        let courses = layout
            .courses
            .iter()
            .map(|course| CourseDump {
                id: course.id.to_string(),
                department: course.id.department.clone(),
                number: course.id.number.clone(),
                label: course.label.clone(),
                name: course.name.clone(),
                semester: course.semester.clone(),
                level: course.level,
                row: course.row,
                position: [course.position.x, course.position.y],
                stroke_weight: course.stroke.weight,
                stroke_saturation: course.stroke.saturation,
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                kind: edge.kind,
                from: id_of(edge.from),
                to: id_of(edge.to),
                start: [edge.start.x, edge.start.y],
                end: [edge.end.x, edge.end.y],
                waypoints: edge.waypoints.iter().map(|p| [p.x, p.y]).collect(),
                color: edge.color.clone(),
                stroke_weight: edge.stroke_weight,
                outdentation: edge.outdentation,
            })
            .collect();

        LayoutDump {
            max_level: layout.max_level,
            max_courses_per_row: layout.max_courses_per_row,
            bounds: layout.bounds,
            rows,
            courses,
            edges,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Writes the pretty-printed dump to `path`, or stdout when `None`.
pub fn write_layout_dump(path: Option<&Path>, layout: &Layout) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout);
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &dump)?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, &dump)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{CourseGraph, CourseId};
    use crate::layout::compute_layout;
    use crate::theme::Theme;

    #[test]
    fn dump_uses_course_ids_and_camel_case() {
        let mut graph = CourseGraph::new();
        graph
            .add_course(CourseId::parse("PHYS 101"), "Physics I", "1")
            .unwrap();
        graph
            .add_course(CourseId::parse("PHYS 103"), "Physics Lab", "1")
            .unwrap();
        graph
            .add_corequirement(&CourseId::parse("PHYS 103"), &CourseId::parse("PHYS 101"))
            .unwrap();
        let layout = compute_layout(&graph, &Theme::classic(), &LayoutConfig::default()).unwrap();
        let value = serde_json::to_value(LayoutDump::from_layout(&layout)).unwrap();

        assert_eq!(value["courses"][1]["id"], "PHYS 103");
        assert_eq!(value["courses"][1]["department"], "PHYS");
        assert!(value["courses"][0]["strokeWeight"].is_number());
        assert_eq!(value["edges"][0]["kind"], "corequisite");
        assert_eq!(value["edges"][0]["from"], "PHYS 103");
        assert_eq!(value["edges"][0]["waypoints"].as_array().unwrap().len(), 2);
        assert_eq!(value["rows"][0]["kind"], "level");
        assert_eq!(value["rows"][0]["level"], 0);
        assert_eq!(value["maxCoursesPerRow"], layout.max_courses_per_row);
    }
}
