//! Positioned visual elements and their per-type property schemas.
//!
//! An element arrives as an [`ElementDraft`] (the loose wire shape), is
//! checked into an [`ElementSpec`], and is persisted as an [`Element`].
//! Properties are a closed union keyed on [`ElementType`]; each variant keeps
//! unknown keys in `extra` so editors can attach presentation hints the
//! service does not interpret.

use crate::ValidationError;
use crate::validate::require_finite;
use scrapbook_types::{ElementId, PageId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::str::FromStr;

/// Rotation applied when a draft omits it, in degrees.
pub const DEFAULT_ROTATION: f64 = 0.0;

/// Scale applied when a draft omits it.
pub const DEFAULT_SCALE: f64 = 1.0;

/// The kind of visual object an element renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Photo,
    Sticker,
    Text,
}

impl ElementType {
    pub const ALL: [Self; 3] = [Self::Photo, Self::Sticker, Self::Text];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Sticker => "sticker",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "photo" => Ok(Self::Photo),
            "sticker" => Ok(Self::Sticker),
            "text" => Ok(Self::Text),
            other => Err(ValidationError::new(
                "type",
                format!("unknown element type '{other}' (expected photo, sticker or text)"),
            )),
        }
    }
}

/// Properties of a `photo` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoProperties {
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Properties of a `sticker` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerProperties {
    pub sticker_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Properties of a `text` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProperties {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Type-specific properties of an element.
///
/// Serialized without a tag: the element's `type` field carries it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ElementProperties {
    Photo(PhotoProperties),
    Sticker(StickerProperties),
    Text(TextProperties),
}

impl ElementProperties {
    /// Returns the element type these properties belong to.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        match self {
            Self::Photo(_) => ElementType::Photo,
            Self::Sticker(_) => ElementType::Sticker,
            Self::Text(_) => ElementType::Text,
        }
    }

    /// Parses a property bag against the schema of `element_type`.
    pub fn from_json(element_type: ElementType, value: Value) -> Result<Self, ValidationError> {
        if !value.is_object() {
            return Err(ValidationError::new("properties", "must be an object"));
        }
        let parsed = match element_type {
            ElementType::Photo => serde_json::from_value(value).map(Self::Photo),
            ElementType::Sticker => serde_json::from_value(value).map(Self::Sticker),
            ElementType::Text => serde_json::from_value(value).map(Self::Text),
        }
        .map_err(|e| ValidationError::new("properties", format!("{e} for {element_type} element")))?;
        parsed.check()?;
        Ok(parsed)
    }

    /// Serializes the property bag back to a JSON object.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    fn check(&self) -> Result<(), ValidationError> {
        match self {
            Self::Photo(photo) if photo.image_url.trim().is_empty() => Err(ValidationError::new(
                "properties.imageUrl",
                "must not be empty",
            )),
            Self::Sticker(sticker) if sticker.sticker_id.trim().is_empty() => Err(
                ValidationError::new("properties.stickerId", "must not be empty"),
            ),
            Self::Text(TextProperties {
                font_size: Some(size),
                ..
            }) if !(size.is_finite() && *size > 0.0) => Err(ValidationError::new(
                "properties.fontSize",
                "must be a positive number",
            )),
            _ => Ok(()),
        }
    }
}

/// An element as submitted by an editor, before validation.
///
/// Field names follow the editor's JSON (`type`, `xPos`, `zIndex`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDraft {
    #[serde(rename = "type")]
    pub element_type: String,
    pub x_pos: f64,
    pub y_pos: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    pub z_index: Number,
    pub properties: Map<String, Value>,
}

impl ElementDraft {
    /// Decodes a draft from an arbitrary JSON value.
    ///
    /// Missing fields and non-numeric positions are reported as
    /// validation errors rather than decode failures.
    pub fn from_json(value: Value) -> Result<Self, ValidationError> {
        serde_json::from_value(value).map_err(|e| ValidationError::new("", e.to_string()))
    }

    /// Checks the draft and applies defaults for rotation and scale.
    pub fn validate(&self) -> Result<ElementSpec, ValidationError> {
        let element_type: ElementType = self.element_type.parse()?;
        require_finite("xPos", self.x_pos)?;
        require_finite("yPos", self.y_pos)?;

        let rotation = self.rotation.unwrap_or(DEFAULT_ROTATION);
        require_finite("rotation", rotation)?;

        let scale = self.scale.unwrap_or(DEFAULT_SCALE);
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ValidationError::new(
                "scale",
                format!("must be a positive number (got {scale})"),
            ));
        }

        let z_index = integer("zIndex", &self.z_index)?;
        let properties =
            ElementProperties::from_json(element_type, Value::Object(self.properties.clone()))?;

        Ok(ElementSpec {
            x_pos: self.x_pos,
            y_pos: self.y_pos,
            rotation,
            scale,
            z_index,
            properties,
        })
    }
}

fn integer(field: &str, n: &Number) -> Result<i64, ValidationError> {
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    match n.as_f64() {
        // JSON has no integer type; 3.0 is an integer, 3.5 is not.
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        _ => Err(ValidationError::new(field, format!("must be an integer (got {n})"))),
    }
}

/// A validated element, not yet bound to a page or given an identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSpec {
    pub x_pos: f64,
    pub y_pos: f64,
    pub rotation: f64,
    pub scale: f64,
    pub z_index: i64,
    pub properties: ElementProperties,
}

impl ElementSpec {
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.properties.element_type()
    }

    /// Binds the spec to a page under a fresh identity.
    #[must_use]
    pub fn into_element(self, id: ElementId, page_id: PageId) -> Element {
        Element {
            id,
            page_id,
            element_type: self.properties.element_type(),
            x_pos: self.x_pos,
            y_pos: self.y_pos,
            rotation: self.rotation,
            scale: self.scale,
            z_index: self.z_index,
            properties: self.properties,
        }
    }
}

/// A persisted element on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    pub page_id: PageId,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub x_pos: f64,
    pub y_pos: f64,
    pub rotation: f64,
    pub scale: f64,
    pub z_index: i64,
    pub properties: ElementProperties,
}

impl Element {
    /// Returns everything but the identity, for comparing layouts across replacements.
    #[must_use]
    pub fn to_spec(&self) -> ElementSpec {
        ElementSpec {
            x_pos: self.x_pos,
            y_pos: self.y_pos,
            rotation: self.rotation,
            scale: self.scale,
            z_index: self.z_index,
            properties: self.properties.clone(),
        }
    }
}
