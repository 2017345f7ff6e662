use crate::theme::{Rgb, Theme};
use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Label height as a multiple of the font size.
const LABEL_HEIGHT_RATIO: f32 = 1.0 / 0.7;
/// Gap between rows on top of the label height.
const ROW_GAP: f32 = 60.0;

/// Cardinal direction an out-of-band edge detours in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutDirection {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelConfig {
    pub with_name: bool,
    pub with_semester: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    pub base_outdentation: f32,
    pub corequisite_direction: OutDirection,
    /// Route requirement edges spanning more than one level around the rows
    /// instead of straight through them.
    pub route_long_requirements: bool,
    pub long_edge_factor: f32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_outdentation: 18.0,
            corequisite_direction: OutDirection::Down,
            route_long_requirements: false,
            long_edge_factor: 1.75,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrokeConfig {
    pub base_pen_size: f32,
    pub pen_size_increment: f32,
    pub base_saturation: f32,
    pub saturation_factor: f32,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            base_pen_size: 1.25,
            pen_size_increment: 1.25,
            base_saturation: 0.8,
            saturation_factor: 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Horizontal space per label character.
    pub label_unit_width: f32,
    pub label_height: f32,
    pub min_label_chars: usize,
    pub max_label_chars: usize,
    pub row_spacing: f32,
    pub canvas_width: f32,
    pub usable_width_ratio: f32,
    /// Explicit row capacity; derived from the canvas width when unset.
    pub max_courses_per_row: Option<usize>,
    pub label: LabelConfig,
    pub routing: RoutingConfig,
    pub stroke: StrokeConfig,
}

impl LayoutConfig {
    /// Label metrics for a monospace font of the given size.
    pub fn for_font_size(font_size: f32) -> Self {
        let label_height = font_size * LABEL_HEIGHT_RATIO;
        Self {
            label_unit_width: font_size,
            label_height,
            min_label_chars: 9,
            max_label_chars: 16,
            row_spacing: ROW_GAP + label_height,
            canvas_width: 1300.0,
            usable_width_ratio: 0.9,
            max_courses_per_row: None,
            label: LabelConfig::default(),
            routing: RoutingConfig::default(),
            stroke: StrokeConfig::default(),
        }
    }

    /// Label width in characters, clamped to the configured band.
    pub fn clamp_label_chars(&self, chars: usize) -> usize {
        chars.clamp(self.min_label_chars, self.max_label_chars.max(self.min_label_chars))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.label_unit_width > 0.0, "labelUnitWidth must be positive");
        ensure!(self.row_spacing > 0.0, "rowSpacing must be positive");
        ensure!(self.canvas_width > 0.0, "canvasWidth must be positive");
        ensure!(
            self.usable_width_ratio > 0.0 && self.usable_width_ratio <= 1.0,
            "usableWidthRatio must be in (0, 1]"
        );
        ensure!(
            self.max_courses_per_row != Some(0),
            "maxCoursesPerRow must be at least 1"
        );
        ensure!(
            self.routing.base_outdentation > 0.0,
            "baseOutdentation must be positive"
        );
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::for_font_size(Theme::default().font_size)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    label_color: Option<String>,
    requirement_color: Option<String>,
    corequisite_color: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    label_unit_width: Option<f32>,
    label_height: Option<f32>,
    min_label_chars: Option<usize>,
    max_label_chars: Option<usize>,
    row_spacing: Option<f32>,
    canvas_width: Option<f32>,
    usable_width_ratio: Option<f32>,
    max_courses_per_row: Option<usize>,
    label_with_name: Option<bool>,
    label_with_semester: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RoutingConfigFile {
    base_outdentation: Option<f32>,
    corequisite_direction: Option<OutDirection>,
    route_long_requirements: Option<bool>,
    long_edge_factor: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct StrokeConfigFile {
    base_pen_size: Option<f32>,
    pen_size_increment: Option<f32>,
    base_saturation: Option<f32>,
    saturation_factor: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    routing: Option<RoutingConfigFile>,
    stroke: Option<StrokeConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_config(&contents)
}

/// Applies a camelCase JSON (or JSON5) override document on top of the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(contents)
            .with_context(|| format!("failed to parse config: {json_err}"))?,
    };

    let mut config = Config::default();
    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "classic" | "default" => config.theme = Theme::classic(),
            "slate" => config.theme = Theme::slate(),
            other => anyhow::bail!("unknown theme: {other}"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            ensure!(v > 0.0, "fontSize must be positive");
            config.theme.font_size = v;
        }
        if let Some(v) = vars.label_color {
            config.theme.label_color = v;
        }
        if let Some(v) = vars.requirement_color {
            config.theme.requirement_color = v;
        }
        if let Some(v) = vars.corequisite_color {
            config.theme.corequisite_color = v;
        }
    }
    for color in [
        &config.theme.label_color,
        &config.theme.requirement_color,
        &config.theme.corequisite_color,
    ] {
        ensure!(Rgb::from_hex(color).is_some(), "invalid color: {color}");
    }

    config.layout = LayoutConfig::for_font_size(config.theme.font_size);
    if let Some(layout) = parsed.layout {
        let target = &mut config.layout;
        if let Some(v) = layout.label_unit_width {
            target.label_unit_width = v;
        }
        if let Some(v) = layout.label_height {
            target.label_height = v;
            target.row_spacing = ROW_GAP + v;
        }
        if let Some(v) = layout.min_label_chars {
            target.min_label_chars = v;
        }
        if let Some(v) = layout.max_label_chars {
            target.max_label_chars = v;
        }
        if let Some(v) = layout.row_spacing {
            target.row_spacing = v;
        }
        if let Some(v) = layout.canvas_width {
            target.canvas_width = v;
        }
        if let Some(v) = layout.usable_width_ratio {
            target.usable_width_ratio = v;
        }
        if let Some(v) = layout.max_courses_per_row {
            target.max_courses_per_row = Some(v);
        }
        if let Some(v) = layout.label_with_name {
            target.label.with_name = v;
        }
        if let Some(v) = layout.label_with_semester {
            target.label.with_semester = v;
        }
    }

    if let Some(routing) = parsed.routing {
        let target = &mut config.layout.routing;
        if let Some(v) = routing.base_outdentation {
            target.base_outdentation = v;
        }
        if let Some(v) = routing.corequisite_direction {
            target.corequisite_direction = v;
        }
        if let Some(v) = routing.route_long_requirements {
            target.route_long_requirements = v;
        }
        if let Some(v) = routing.long_edge_factor {
            target.long_edge_factor = v;
        }
    }

    if let Some(stroke) = parsed.stroke {
        let target = &mut config.layout.stroke;
        if let Some(v) = stroke.base_pen_size {
            target.base_pen_size = v;
        }
        if let Some(v) = stroke.pen_size_increment {
            target.pen_size_increment = v;
        }
        if let Some(v) = stroke.base_saturation {
            target.base_saturation = v;
        }
        if let Some(v) = stroke.saturation_factor {
            target.saturation_factor = v;
        }
    }

    config.layout.validate()?;
    Ok(config)
}
