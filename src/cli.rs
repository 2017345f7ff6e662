use crate::config::load_config;
use crate::ir::CourseGraph;
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_records;
use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug, info};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(
    name = "prqt",
    version,
    about = "Lay out course prerequisite graphs in dependency rows"
)]
pub struct Args {
    /// Input records file (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file for the layout JSON. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON file (camelCase overrides)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Maximum courses in the ground row before isolated courses overflow
    #[arg(short = 'm', long = "max-per-row")]
    pub max_per_row: Option<usize>,

    /// Canvas width used to derive the row capacity
    #[arg(short = 'w', long = "canvas-width")]
    pub canvas_width: Option<f32>,

    /// Append course names to labels
    #[arg(long = "with-name")]
    pub with_name: bool,

    /// Append offering semesters to labels
    #[arg(long = "with-semester")]
    pub with_semester: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logger(&args.log_level);
    debug!(args:?; "Parsed arguments");
    execute(&args)
}

fn init_logger(level: &str) {
    let log_level = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
}

pub fn execute(args: &Args) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(max) = args.max_per_row {
        anyhow::ensure!(max > 0, "--max-per-row must be at least 1");
        config.layout.max_courses_per_row = Some(max);
    }
    if let Some(width) = args.canvas_width {
        anyhow::ensure!(width > 0.0, "--canvas-width must be positive");
        config.layout.canvas_width = width;
    }
    config.layout.label.with_name |= args.with_name;
    config.layout.label.with_semester |= args.with_semester;

    let input = read_input(args.input.as_deref())?;
    let records = parse_records(&input)?;
    let graph = CourseGraph::from_records(&records.courses, &records.requirements)?;
    let layout = compute_layout(&graph, &config.theme, &config.layout)?;
    write_layout_dump(args.output.as_deref(), &layout)?;

    info!(
        courses = layout.courses.len(),
        edges = layout.edges.len();
        "Layout written"
    );
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "prqt",
            "-i",
            "records.json",
            "--max-per-row",
            "6",
            "--with-name",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.input.as_deref(), Some(Path::new("records.json")));
        assert_eq!(args.max_per_row, Some(6));
        assert!(args.with_name);
        assert!(!args.with_semester);
        assert_eq!(args.log_level, "debug");
    }

    #[test]
    fn writes_layout_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("records.json");
        let output = dir.path().join("layout.json");
        std::fs::write(
            &input,
            r#"{
                "courses": [
                    { "id": "CMPE 150", "name": "Intro", "semester": 1 },
                    { "id": "CMPE 160", "name": "OOP", "semester": 2 }
                ],
                "requirements": [
                    { "subject": "CMPE 160", "kind": "prerequisite", "objects": ["CMPE 150", "EE 210"] }
                ]
            }"#,
        )
        .unwrap();
        let args = Args::try_parse_from([
            "prqt",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .unwrap();
        execute(&args).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["courses"].as_array().unwrap().len(), 2);
        assert_eq!(written["edges"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let args = Args::try_parse_from(["prqt", "--max-per-row", "0"]).unwrap();
        assert!(execute(&args).is_err());
    }
}
