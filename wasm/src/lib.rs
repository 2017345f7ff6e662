use prereq_tree::{Config, LayoutDump, layout_records, parse_config};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutOptions {
    config: Option<serde_json::Value>,
    max_courses_per_row: Option<usize>,
    canvas_width: Option<f32>,
    with_name: Option<bool>,
    with_semester: Option<bool>,
}

fn build_config(options: LayoutOptions) -> Result<Config, String> {
    let mut config = match options.config {
        Some(raw) => parse_config(&raw.to_string()).map_err(|error| format!("{error:#}"))?,
        None => Config::default(),
    };
    if let Some(max) = options.max_courses_per_row {
        if max == 0 {
            return Err("maxCoursesPerRow must be at least 1".to_string());
        }
        config.layout.max_courses_per_row = Some(max);
    }
    if let Some(width) = options.canvas_width {
        config.layout.canvas_width = width;
    }
    if let Some(with_name) = options.with_name {
        config.layout.label.with_name = with_name;
    }
    if let Some(with_semester) = options.with_semester {
        config.layout.label.with_semester = with_semester;
    }
    Ok(config)
}

fn layout_to_json(records: &str, options: LayoutOptions) -> Result<String, String> {
    let config = build_config(options)?;
    let layout = layout_records(records, &config).map_err(|error| format!("{error:#}"))?;
    LayoutDump::from_layout(&layout)
        .to_json()
        .map_err(|error| error.to_string())
}

/// Lays out a records document and returns the layout dump as JSON.
#[wasm_bindgen]
pub fn layout_json(records: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<LayoutOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        LayoutOptions::default()
    };
    layout_to_json(records, options).map_err(|error| JsValue::from_str(&error))
}
