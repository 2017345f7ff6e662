#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, load_config, parse_config};
pub use error::PrereqError;
pub use ir::{CourseGraph, CourseId, CourseRecord, RelationKind, RequirementRecord};
pub use layout::{Layout, compute_layout};
pub use layout_dump::LayoutDump;
pub use parser::{Records, parse_records};
pub use theme::Theme;

/// Parses a records document and lays it out in one go.
pub fn layout_records(input: &str, config: &Config) -> anyhow::Result<Layout> {
    let records = parse_records(input)?;
    let graph = CourseGraph::from_records(&records.courses, &records.requirements)?;
    Ok(compute_layout(&graph, &config.theme, &config.layout)?)
}
