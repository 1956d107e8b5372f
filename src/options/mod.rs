//! Centralized viewer options with TOML preset support.
//!
//! All tweakable settings (camera, controls, lighting, structure
//! parameters, display, keybindings) are consolidated here. Options
//! serialize to/from TOML for presets stored in `assets/presets/`.

mod camera;
mod display;
mod keybindings;
mod lighting;

use std::path::Path;

pub use camera::{CameraOptions, ControlOptions};
pub use display::DisplayOptions;
pub use keybindings::KeybindingOptions;
pub use lighting::LightingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::HelicoError;
use crate::structure::StructureParams;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[lighting]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera projection parameters.
    pub camera: CameraOptions,
    /// Orbit controller tuning.
    pub controls: ControlOptions,
    /// Light rig parameters.
    pub lighting: LightingOptions,
    /// Structure builder parameters.
    pub structure: StructureParams,
    /// Background, pacing, and initial structure.
    pub display: DisplayOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`HelicoError::OptionsParse`] on malformed TOML.
    pub fn from_toml(content: &str) -> Result<Self, HelicoError> {
        let mut options: Self = toml::from_str(content)
            .map_err(|e| HelicoError::OptionsParse(e.to_string()))?;
        options.keybindings.rebuild_reverse_map();
        Ok(options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`HelicoError::Io`] if the file cannot be read, or
    /// [`HelicoError::OptionsParse`] on malformed TOML.
    pub fn load(path: &Path) -> Result<Self, HelicoError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`HelicoError`] if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), HelicoError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| HelicoError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(HelicoError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed = Options::from_toml(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[structure.helix]
segment_count = 12

[lighting]
ambient_intensity = 0.2
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.structure.helix.segment_count, 12);
        assert_eq!(opts.structure.helix.radius, 1.0);
        assert_eq!(opts.lighting.ambient_intensity, 0.2);
        assert_eq!(opts.camera.znear, 0.1);
        assert_eq!(opts.camera.zfar, 1000.0);
        assert_eq!(opts.display.initial_structure, "dna");
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[camera\nfovy = ").unwrap_err();
        assert!(matches!(err, HelicoError::OptionsParse(_)));
    }

    #[test]
    fn keybinding_lookup_survives_loading() {
        use crate::input::KeyAction;
        let toml_str = r#"
[keybindings.bindings]
show_organoid = "KeyO"
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(
            opts.keybindings.lookup("KeyO"),
            Some(KeyAction::ShowOrganoid)
        );
        assert_eq!(opts.keybindings.lookup("Digit1"), None);

        let defaults = Options::default();
        assert_eq!(
            defaults.keybindings.lookup("Digit1"),
            Some(KeyAction::ShowHelix)
        );
        assert_eq!(defaults.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn save_then_load_preserves_options() {
        let dir = std::env::temp_dir()
            .join(format!("helico-options-{}", std::process::id()));
        let path = dir.join("custom.toml");
        let mut opts = Options::default();
        opts.structure.organoid.cell_count = 7;
        opts.save(&path).unwrap();

        assert_eq!(Options::load(&path).unwrap(), opts);
        assert_eq!(Options::list_presets(&dir), vec!["custom".to_owned()]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("camera"));
        assert!(props.contains_key("controls"));
        assert!(props.contains_key("lighting"));
        assert!(props.contains_key("structure"));
        assert!(props.contains_key("display"));
        assert!(!props.contains_key("keybindings"));

        let camera = &props["camera"]["properties"];
        assert!(camera.get("fovy").is_some());
        assert!(camera.get("znear").is_none());
    }
}
