//! Plain data records for the arrangement document.
//!
//! These are the persisted shapes. The live canvas keeps its own nodes (see `board`) and
//! converts to and from these records on save and load.

use crate::constants::{
    DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_HEIGHT, DEFAULT_CATEGORY_WIDTH,
};
use egui::Color32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One add-on placed on the canvas.
///
/// `x`/`y` are relative to the owning category's origin. Coordinates are kept at full
/// precision so that loading and saving a file leaves untouched values as they were.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mod {
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub url: String,
    #[serde(
        default,
        deserialize_with = "deserialize_coordinate",
        serialize_with = "serialize_coordinate"
    )]
    pub x: f64,
    #[serde(
        default,
        deserialize_with = "deserialize_coordinate",
        serialize_with = "serialize_coordinate"
    )]
    pub y: f64,
}

/// A named, colored region owning an ordered list of mods.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub mods: Vec<Mod>,
    #[serde(
        default,
        deserialize_with = "deserialize_coordinate",
        serialize_with = "serialize_coordinate"
    )]
    pub x: f64,
    #[serde(
        default,
        deserialize_with = "deserialize_coordinate",
        serialize_with = "serialize_coordinate"
    )]
    pub y: f64,
    #[serde(
        default = "default_width",
        deserialize_with = "deserialize_coordinate",
        serialize_with = "serialize_coordinate"
    )]
    pub width: f64,
    #[serde(
        default = "default_height",
        deserialize_with = "deserialize_coordinate",
        serialize_with = "serialize_coordinate"
    )]
    pub height: f64,
    #[serde(default = "default_color")]
    pub color: String,
}

/// The unit of persistence: categories in render order, bottom first.
pub type Arrangement = Vec<Category>;

fn default_width() -> f64 {
    f64::from(DEFAULT_CATEGORY_WIDTH)
}

fn default_height() -> f64 {
    f64::from(DEFAULT_CATEGORY_HEIGHT)
}

/// True when `value` is finite and still finite once narrowed for the canvas.
pub fn is_drawable(value: f64) -> bool {
    value.is_finite() && (value as f32).is_finite()
}

fn deserialize_coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if is_drawable(value) {
        Ok(value)
    } else {
        Err(serde::de::Error::custom(format!(
            "coordinate {value} is outside the drawable range"
        )))
    }
}

fn serialize_coordinate<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if !is_drawable(*value) {
        return Err(serde::ser::Error::custom(format!(
            "coordinate {value} cannot be saved"
        )));
    }
    serializer.serialize_f64(*value)
}

fn default_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_string()
}

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mods: Vec::new(),
            x: 0.0,
            y: 0.0,
            width: default_width(),
            height: default_height(),
            color: color.into(),
        }
    }
}

/// Parses `#rrggbb` (or `rrggbb`) into an opaque color.
pub fn parse_hex_color(hex: &str) -> Option<Color32> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some(Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Formats a color as lowercase `#rrggbb`, dropping alpha.
pub fn format_hex_color(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

/// Color used when a stored hex string cannot be parsed.
pub fn default_category_color() -> Color32 {
    parse_hex_color(DEFAULT_CATEGORY_COLOR).unwrap_or(Color32::from_gray(60))
}
