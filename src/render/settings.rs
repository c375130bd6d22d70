//! Drawing parameters for the SVG map emitter, including a tagged color
//! union with one variant per representation the original supports: none,
//! a named CSS/SVG color string, an opaque RGB triple, and an RGBA
//! quadruple. Each variant is fully qualified on the wire so the reader
//! never has to guess which fields are populated.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Color {
    None,
    Named(String),
    Rgb { red: u8, green: u8, blue: u8 },
    Rgba { red: u8, green: u8, blue: u8, alpha: f64 },
}

impl Color {
    pub fn named(name: impl Into<String>) -> Self {
        Color::Named(name.into())
    }

    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Color::Rgb { red, green, blue }
    }

    /// Renders as an SVG/CSS color literal.
    pub fn to_svg(&self) -> String {
        match self {
            Color::None => "none".to_string(),
            Color::Named(name) => name.clone(),
            Color::Rgb { red, green, blue } => format!("rgb({red},{green},{blue})"),
            Color::Rgba { red, green, blue, alpha } => {
                format!("rgba({red},{green},{blue},{alpha})")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Mirrors the original's `RenderSettings` field-for-field, including its
/// literal defaults, so a `Map` request against default settings renders
/// deterministically across reimplementations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub line_width: f64,
    pub stop_radius: f64,
    pub bus_label_font_size: u32,
    pub bus_label_offset: Point,
    pub stop_label_font_size: u32,
    pub stop_label_offset: Point,
    pub underlayer_color: Color,
    pub underlayer_width: f64,
    pub color_palette: Vec<Color>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 1200.0,
            padding: 50.0,
            line_width: 14.0,
            stop_radius: 5.0,
            bus_label_font_size: 20,
            bus_label_offset: Point { x: 7.0, y: 15.0 },
            stop_label_font_size: 20,
            stop_label_offset: Point { x: 7.0, y: -3.0 },
            underlayer_color: Color::Rgba {
                red: 255,
                green: 255,
                blue: 255,
                alpha: 0.85,
            },
            underlayer_width: 3.0,
            color_palette: vec![
                Color::named("green"),
                Color::rgb(255, 160, 0),
                Color::named("red"),
            ],
        }
    }
}
