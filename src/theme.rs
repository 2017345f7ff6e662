use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub label_color: String,
    pub requirement_color: String,
    pub corequisite_color: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "Consolas, monospace".to_string(),
            font_size: 10.0,
            label_color: "#1a1a1a".to_string(),
            requirement_color: "#e68066".to_string(),
            corequisite_color: "#66cc80".to_string(),
        }
    }

    pub fn slate() -> Self {
        Self {
            font_family: "\"JetBrains Mono\", Menlo, monospace".to_string(),
            font_size: 10.0,
            label_color: "#1C2430".to_string(),
            requirement_color: "#7A8AA6".to_string(),
            corequisite_color: "#4C9F70".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

/// An RGB color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Accepts `#rgb` and `#rrggbb`.
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
        match hex.len() {
            3 => {
                let expand = |i: usize| channel(&hex[i..i + 1].repeat(2));
                Some(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }

    fn max(self) -> f32 {
        self.r.max(self.g).max(self.b)
    }

    fn min(self) -> f32 {
        self.r.min(self.g).min(self.b)
    }

    /// HSV saturation.
    pub fn saturation(self) -> f32 {
        let max = self.max();
        if max <= 0.0 {
            return 0.0;
        }
        (max - self.min()) / max
    }

    /// Rescales each channel's distance from the brightest channel so the
    /// result has the requested saturation. Grays are tinted towards red.
    pub fn with_saturation(self, saturation: f32) -> Self {
        let max = self.max();
        if max <= 0.0 {
            return self;
        }
        let current = self.saturation();
        if current == 0.0 {
            let rest = self.r * (1.0 - saturation);
            return Self::new(self.r, rest, rest);
        }
        let factor = saturation / current;
        let scale = |c: f32| (max - (max - c) * factor).clamp(0.0, 1.0);
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }
}
