//! Input handling: event types, key actions, and the processor that turns
//! raw window events into camera gestures.

/// Platform-agnostic input events.
pub mod event;
/// Bindable viewer actions.
pub mod keyboard;
/// Converts raw events into camera gestures.
pub mod processor;

pub use event::{InputEvent, MouseButton};
pub use keyboard::KeyAction;
pub use processor::{CameraGesture, InputProcessor};
