use serde::{Deserialize, Serialize};

/// Viewer actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// show_helix = "Digit1"
/// reset_camera = "KeyR"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Switch to the DNA double helix.
    ShowHelix,
    /// Switch to the organoid.
    ShowOrganoid,
    /// Remove all structure content, keeping the lights.
    ClearStructure,
    /// Return the camera to its initial pose.
    ResetCamera,
}
