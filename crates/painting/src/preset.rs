//! Brush presets
//!
//! A [`Preset`] is a named, partial set of brush parameters. Applying one
//! only touches the fields it defines, through the clamping setters.
//!
//! [`PresetLibrary`] holds the built-in defaults plus user presets. Default
//! ids are reserved: they can't be overwritten, deleted, or shadowed by an
//! imported user preset. User presets round-trip through JSON so the host
//! can persist them wherever it likes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::brush::BrushParameters;
use crate::color::Rgb24;
use crate::pipeline::BrushEngine;
use crate::types::{BlendMode, StrokeStyle};

/// Icon given to presets saved from the current brush
const CUSTOM_ICON: &str = "\u{2b50}";

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("Preset id '{0}' is reserved for a built-in preset")]
    ReservedId(String),
    #[error("Preset '{0}' not found")]
    NotFound(String),
    #[error("Preset serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    /// Library key; filled from the map key when loading
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub style: Option<StrokeStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardness: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoothness: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scatter: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb24>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
}

impl Preset {
    fn builtin(
        id: &str,
        name: &str,
        icon: &str,
        style: StrokeStyle,
        [size, flow, spacing, smoothness]: [f32; 4],
        hardness: Option<f32>,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            style: Some(style),
            size: Some(size),
            flow: Some(flow),
            hardness,
            spacing: Some(spacing),
            smoothness: Some(smoothness),
            scatter: None,
            color: None,
            blend_mode: None,
        }
    }

    /// Snapshot of every field of `params`
    pub fn from_parameters(id: &str, name: &str, params: &BrushParameters) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: CUSTOM_ICON.to_string(),
            style: Some(params.style()),
            size: Some(params.size()),
            flow: Some(params.flow()),
            hardness: Some(params.hardness()),
            spacing: Some(params.spacing()),
            smoothness: Some(params.smoothness()),
            scatter: Some(params.scatter()),
            color: Some(params.color()),
            blend_mode: Some(params.blend_mode()),
        }
    }

    /// Overwrite the fields this preset defines
    pub fn apply_to(&self, params: &mut BrushParameters) {
        if let Some(style) = self.style {
            params.set_style(style);
        }
        if let Some(size) = self.size {
            params.set_size(size);
        }
        if let Some(flow) = self.flow {
            params.set_flow(flow);
        }
        if let Some(hardness) = self.hardness {
            params.set_hardness(hardness);
        }
        if let Some(spacing) = self.spacing {
            params.set_spacing(spacing);
        }
        if let Some(smoothness) = self.smoothness {
            params.set_smoothness(smoothness);
        }
        if let Some(scatter) = self.scatter {
            params.set_scatter(scatter);
        }
        if let Some(color) = self.color {
            params.set_color(color);
        }
        if let Some(mode) = self.blend_mode {
            params.set_blend_mode(mode);
        }
    }
}

/// The built-in presets, in display order
pub fn default_presets() -> Vec<Preset> {
    use StrokeStyle::*;
    vec![
        Preset::builtin("fine-line", "Fine Line", "\u{270f}\u{fe0f}", Pencil, [2.0, 100.0, 10.0, 30.0], Some(100.0)),
        Preset::builtin("sketch-pencil", "Sketch Pencil", "\u{270e}", Pencil, [4.0, 90.0, 20.0, 50.0], Some(70.0)),
        Preset::builtin("ink-pen", "Ink Pen", "\u{1f58b}\u{fe0f}", Pen, [3.0, 100.0, 5.0, 70.0], Some(90.0)),
        Preset::builtin("thick-ink", "Thick Ink", "\u{1f58a}\u{fe0f}", Pen, [8.0, 100.0, 5.0, 70.0], Some(90.0)),
        Preset::builtin("soft-marker", "Soft Marker", "\u{1f9ea}", Marker, [15.0, 75.0, 30.0, 60.0], Some(40.0)),
        Preset::builtin("bold-marker", "Bold Marker", "\u{1f4cf}", Marker, [25.0, 90.0, 20.0, 40.0], Some(60.0)),
        Preset::builtin("watercolor-light", "Light Wash", "\u{1f4a7}", Watercolor, [20.0, 50.0, 40.0, 80.0], Some(20.0)),
        Preset::builtin("watercolor-bold", "Bold Wash", "\u{1f3a8}", Watercolor, [30.0, 80.0, 30.0, 70.0], Some(30.0)),
        Preset::builtin("soft-spray", "Soft Spray", "\u{1f4a8}", Spray, [25.0, 60.0, 10.0, 100.0], None),
        Preset::builtin("textured-spray", "Textured Spray", "\u{1f32b}\u{fe0f}", Spray, [15.0, 85.0, 20.0, 100.0], None),
    ]
}

/// Presets grouped for display
#[derive(Debug, Default)]
pub struct PresetCategories<'a> {
    pub default: Vec<&'a Preset>,
    pub custom: Vec<&'a Preset>,
}

pub struct PresetLibrary {
    defaults: Vec<Preset>,
    user: BTreeMap<String, Preset>,
    next_custom: u64,
}

impl Default for PresetLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetLibrary {
    pub fn new() -> Self {
        Self {
            defaults: default_presets(),
            user: BTreeMap::new(),
            next_custom: 1,
        }
    }

    pub fn is_default(&self, id: &str) -> bool {
        self.defaults.iter().any(|p| p.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Preset> {
        self.defaults
            .iter()
            .find(|p| p.id == id)
            .or_else(|| self.user.get(id))
    }

    /// Defaults in display order, then user presets by id
    pub fn presets(&self) -> impl Iterator<Item = &Preset> {
        self.defaults.iter().chain(self.user.values())
    }

    pub fn by_category(&self) -> PresetCategories<'_> {
        PresetCategories {
            default: self.defaults.iter().collect(),
            custom: self.user.values().collect(),
        }
    }

    /// Apply preset `id` to the engine's brush
    pub fn apply(&self, id: &str, engine: &mut BrushEngine) -> Result<(), PresetError> {
        let preset = self
            .get(id)
            .ok_or_else(|| PresetError::NotFound(id.to_string()))?;
        let mut params = engine.export_parameters();
        preset.apply_to(&mut params);
        engine.apply_parameters(params);
        debug!("PresetLibrary::apply: {}", id);
        Ok(())
    }

    /// Save `params` as a user preset under `id`, or a generated
    /// `custom-N` id. Returns the id used.
    pub fn save_current(
        &mut self,
        name: &str,
        id: Option<&str>,
        params: &BrushParameters,
    ) -> Result<String, PresetError> {
        let id = match id {
            Some(id) => id.to_string(),
            None => self.generate_id(),
        };
        self.insert_user(id, name, params)
    }

    /// Save `params` into numbered slot `slot` (`custom_N`)
    pub fn save_to_slot(
        &mut self,
        slot: u32,
        name: &str,
        params: &BrushParameters,
    ) -> Result<String, PresetError> {
        self.insert_user(format!("custom_{}", slot), name, params)
    }

    fn generate_id(&mut self) -> String {
        loop {
            let id = format!("custom-{}", self.next_custom);
            self.next_custom += 1;
            if !self.user.contains_key(&id) {
                return id;
            }
        }
    }

    fn insert_user(
        &mut self,
        id: String,
        name: &str,
        params: &BrushParameters,
    ) -> Result<String, PresetError> {
        if self.is_default(&id) {
            warn!("PresetLibrary: refusing to overwrite built-in preset '{}'", id);
            return Err(PresetError::ReservedId(id));
        }
        let preset = Preset::from_parameters(&id, name, params);
        if self.user.insert(id.clone(), preset).is_some() {
            info!("PresetLibrary: replaced user preset '{}'", id);
        } else {
            info!("PresetLibrary: saved user preset '{}'", id);
        }
        Ok(id)
    }

    pub fn delete(&mut self, id: &str) -> Result<(), PresetError> {
        if self.is_default(id) {
            warn!("PresetLibrary::delete: '{}' is a built-in preset", id);
            return Err(PresetError::ReservedId(id.to_string()));
        }
        match self.user.remove(id) {
            Some(_) => {
                info!("PresetLibrary::delete: removed '{}'", id);
                Ok(())
            }
            None => Err(PresetError::NotFound(id.to_string())),
        }
    }

    /// Drop every user preset
    pub fn reset_to_defaults(&mut self) {
        info!("PresetLibrary::reset_to_defaults: dropping {} user presets", self.user.len());
        self.user.clear();
    }

    /// User presets as a JSON object keyed by id
    pub fn user_presets_json(&self) -> Result<String, PresetError> {
        Ok(serde_json::to_string_pretty(&self.user)?)
    }

    /// Merge user presets from JSON. Entries whose id collides with a
    /// built-in preset are skipped. Returns the number loaded.
    pub fn load_user_presets_json(&mut self, json: &str) -> Result<usize, PresetError> {
        let incoming: BTreeMap<String, Preset> = serde_json::from_str(json)?;
        let mut loaded = 0;
        for (id, mut preset) in incoming {
            if self.is_default(&id) {
                warn!("PresetLibrary::load_user_presets_json: skipping reserved id '{}'", id);
                continue;
            }
            preset.id = id.clone();
            self.user.insert(id, preset);
            loaded += 1;
        }
        info!("PresetLibrary::load_user_presets_json: loaded {} presets", loaded);
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_presets() {
        let presets = default_presets();
        assert_eq!(presets.len(), 10);
        let ink = presets.iter().find(|p| p.id == "ink-pen").unwrap();
        assert_eq!(ink.style, Some(StrokeStyle::Pen));
        assert_eq!(ink.spacing, Some(5.0));
        let spray = presets.iter().find(|p| p.id == "soft-spray").unwrap();
        assert_eq!(spray.hardness, None);
    }

    #[test]
    fn test_apply_only_touches_defined_fields() {
        let library = PresetLibrary::new();
        let mut engine = BrushEngine::with_seed(1);
        engine.set_hardness(12.0);
        engine.set_color_hex("#ff0000").unwrap();

        library.apply("soft-spray", &mut engine).unwrap();
        let params = engine.export_parameters();
        assert_eq!(params.style(), StrokeStyle::Spray);
        assert_eq!(params.size(), 25.0);
        assert_eq!(params.hardness(), 12.0);
        assert_eq!(params.color().to_hex(), "#ff0000");

        assert!(matches!(
            library.apply("nope", &mut engine),
            Err(PresetError::NotFound(_))
        ));
    }

    #[test]
    fn test_save_current_and_slot() {
        let mut library = PresetLibrary::new();
        let params = BrushParameters::new(StrokeStyle::Marker);

        let id = library.save_current("Mine", None, &params).unwrap();
        assert_eq!(id, "custom-1");
        let id = library.save_current("Mine too", None, &params).unwrap();
        assert_eq!(id, "custom-2");
        let id = library.save_to_slot(3, "Slot", &params).unwrap();
        assert_eq!(id, "custom_3");
        assert_eq!(library.get("custom_3").unwrap().style, Some(StrokeStyle::Marker));

        assert!(matches!(
            library.save_current("Clash", Some("ink-pen"), &params),
            Err(PresetError::ReservedId(_))
        ));
        assert_eq!(library.by_category().custom.len(), 3);
        assert_eq!(library.by_category().default.len(), 10);
    }

    #[test]
    fn test_delete() {
        let mut library = PresetLibrary::new();
        let id = library
            .save_current("Mine", Some("mine"), &BrushParameters::default())
            .unwrap();
        assert!(matches!(library.delete("fine-line"), Err(PresetError::ReservedId(_))));
        assert!(library.delete(&id).is_ok());
        assert!(matches!(library.delete(&id), Err(PresetError::NotFound(_))));
        assert!(library.get("fine-line").is_some());
    }

    #[test]
    fn test_json_round_trip_skips_reserved() {
        let mut library = PresetLibrary::new();
        let mut params = BrushParameters::new(StrokeStyle::Watercolor);
        params.set_size(42.0);
        library.save_current("Wash", Some("wash"), &params).unwrap();
        let json = library.user_presets_json().unwrap();

        let mut restored = PresetLibrary::new();
        assert_eq!(restored.load_user_presets_json(&json).unwrap(), 1);
        assert_eq!(restored.get("wash"), library.get("wash"));

        let hostile = r#"{"fine-line": {"name": "Evil", "size": 99}, "extra": {"name": "Extra", "type": "pen"}}"#;
        assert_eq!(restored.load_user_presets_json(hostile).unwrap(), 1);
        assert_eq!(restored.get("fine-line").unwrap().size, Some(2.0));
        assert_eq!(restored.get("extra").unwrap().style, Some(StrokeStyle::Pen));

        assert!(matches!(
            restored.load_user_presets_json("not json"),
            Err(PresetError::Serialization(_))
        ));

        restored.reset_to_defaults();
        assert!(restored.get("wash").is_none());
        assert_eq!(restored.presets().count(), 10);
    }
}
