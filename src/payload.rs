//! Drag payload exchanged between the search panel and the canvas.
//!
//! The panel serializes a search result into JSON text and the canvas decodes it with a
//! strict schema. Malformed payloads are rejected, never interpreted.

use crate::constants::{MOD_URL_BASE, UNKNOWN_VERSION};
use crate::model::Mod;
use crate::search::SearchHit;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Self-describing search result carried by a drag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModPayload {
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub versions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// The value handed to egui's drag-and-drop slot while a result card is dragged.
#[derive(Clone, Debug)]
pub struct DraggedMod(pub String);

#[derive(Debug)]
pub enum PayloadError {
    Malformed(serde_json::Error),
    MissingSlug,
}

impl Display for PayloadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "malformed mod payload: {err}"),
            Self::MissingSlug => write!(f, "mod payload has an empty slug"),
        }
    }
}

impl Error for PayloadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            Self::MissingSlug => None,
        }
    }
}

impl From<serde_json::Error> for PayloadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err)
    }
}

impl ModPayload {
    /// Decodes payload text. The top level must be an object with a non-blank `slug`.
    pub fn decode(text: &str) -> Result<Self, PayloadError> {
        let payload: ModPayload = serde_json::from_str(text)?;
        if payload.slug.trim().is_empty() {
            return Err(PayloadError::MissingSlug);
        }
        Ok(payload)
    }

    pub fn encode(&self) -> Result<String, PayloadError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Builds the drag value for this payload.
    pub fn to_drag(&self) -> Result<DraggedMod, PayloadError> {
        self.encode().map(DraggedMod)
    }

    /// Version preselected for a freshly dropped mod.
    pub fn default_version(&self) -> &str {
        self.versions
            .first()
            .map(String::as_str)
            .unwrap_or(UNKNOWN_VERSION)
    }

    /// Converts into a canvas record positioned at `(x, y)`.
    pub fn into_mod(self, x: f64, y: f64) -> Mod {
        let version = self.default_version().to_string();
        let url = format!("{MOD_URL_BASE}{}", self.slug);
        Mod {
            slug: self.slug,
            title: self.title,
            description: self.description,
            author: self.author,
            version,
            url,
            x,
            y,
        }
    }
}

impl From<&SearchHit> for ModPayload {
    fn from(hit: &SearchHit) -> Self {
        Self {
            slug: hit.slug.clone(),
            title: hit.title.clone(),
            description: hit.description.clone(),
            author: hit.author.clone(),
            versions: hit.versions.clone(),
            icon_url: hit.icon_url.clone(),
        }
    }
}
