//! Converts raw platform events into camera gestures.
//!
//! The `InputProcessor` owns all transient pointer state (cursor position,
//! held buttons, modifier keys). It sits between raw window events and the
//! viewport's orbit controller.

use glam::Vec2;

use super::event::{InputEvent, MouseButton};

/// Pixels of vertical drag that equal one scroll line when dollying with
/// the middle button.
const DOLLY_PIXELS_PER_LINE: f32 = 20.0;

/// A camera manipulation produced by pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraGesture {
    /// Orbit by a cursor delta in pixels.
    Rotate {
        /// Cursor delta.
        delta: Vec2,
    },
    /// Pan by a cursor delta in pixels.
    Pan {
        /// Cursor delta.
        delta: Vec2,
    },
    /// Dolly (positive = toward the target).
    Zoom {
        /// Scroll amount in lines.
        delta: f32,
    },
}

/// Converts raw window events into [`CameraGesture`]s.
///
/// Left drag orbits, right drag (or shift + left drag) pans, middle drag
/// and the wheel dolly.
#[derive(Debug, Default)]
pub struct InputProcessor {
    cursor: Option<Vec2>,
    left: bool,
    right: bool,
    middle: bool,
    shift: bool,
}

impl InputProcessor {
    /// Create a processor with no buttons held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any mouse button is held.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.left || self.right || self.middle
    }

    /// Forget held buttons without producing a gesture.
    pub fn release_buttons(&mut self) {
        self.left = false;
        self.right = false;
        self.middle = false;
    }

    /// Process a raw input event and return zero or one gestures.
    pub fn handle_event(
        &mut self,
        event: InputEvent,
    ) -> Option<CameraGesture> {
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.handle_cursor_moved(Vec2::new(x, y))
            }
            InputEvent::MouseButton { button, pressed } => {
                match button {
                    MouseButton::Left => self.left = pressed,
                    MouseButton::Right => self.right = pressed,
                    MouseButton::Middle => self.middle = pressed,
                }
                None
            }
            InputEvent::Scroll { delta } => {
                (delta != 0.0).then_some(CameraGesture::Zoom { delta })
            }
            InputEvent::ModifiersChanged { shift } => {
                self.shift = shift;
                None
            }
            InputEvent::PointerLost => {
                self.release_buttons();
                self.cursor = None;
                None
            }
        }
    }

    fn handle_cursor_moved(&mut self, position: Vec2) -> Option<CameraGesture> {
        let previous = self.cursor.replace(position)?;
        let delta = position - previous;
        if delta == Vec2::ZERO {
            return None;
        }

        if self.right || (self.left && self.shift) {
            Some(CameraGesture::Pan { delta })
        } else if self.left {
            Some(CameraGesture::Rotate { delta })
        } else if self.middle {
            // Dragging down moves away, like scrolling toward the user.
            Some(CameraGesture::Zoom {
                delta: -delta.y / DOLLY_PIXELS_PER_LINE,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(button: MouseButton) -> InputEvent {
        InputEvent::MouseButton {
            button,
            pressed: true,
        }
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::CursorMoved { x, y }
    }

    #[test]
    fn hover_without_buttons_is_ignored() {
        let mut input = InputProcessor::new();
        assert_eq!(input.handle_event(moved(10.0, 10.0)), None);
        assert_eq!(input.handle_event(moved(20.0, 15.0)), None);
        assert_eq!(input.cursor, Some(Vec2::new(20.0, 15.0)));
    }

    #[test]
    fn left_drag_rotates() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(moved(10.0, 10.0));
        let _ = input.handle_event(press(MouseButton::Left));
        assert_eq!(
            input.handle_event(moved(15.0, 7.0)),
            Some(CameraGesture::Rotate {
                delta: Vec2::new(5.0, -3.0)
            })
        );
    }

    #[test]
    fn right_or_shift_left_drag_pans() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(moved(0.0, 0.0));
        let _ = input.handle_event(press(MouseButton::Right));
        assert!(matches!(
            input.handle_event(moved(4.0, 0.0)),
            Some(CameraGesture::Pan { .. })
        ));

        let mut input = InputProcessor::new();
        let _ = input.handle_event(moved(0.0, 0.0));
        let shift = InputEvent::ModifiersChanged { shift: true };
        let _ = input.handle_event(shift);
        let _ = input.handle_event(press(MouseButton::Left));
        assert!(matches!(
            input.handle_event(moved(0.0, 4.0)),
            Some(CameraGesture::Pan { .. })
        ));
    }

    #[test]
    fn scroll_zooms() {
        let mut input = InputProcessor::new();
        assert_eq!(
            input.handle_event(InputEvent::Scroll { delta: 2.0 }),
            Some(CameraGesture::Zoom { delta: 2.0 })
        );
        assert_eq!(input.handle_event(InputEvent::Scroll { delta: 0.0 }), None);
    }

    #[test]
    fn pointer_lost_ends_drag() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(moved(0.0, 0.0));
        let _ = input.handle_event(press(MouseButton::Left));
        assert!(input.is_dragging());
        let _ = input.handle_event(InputEvent::PointerLost);
        assert!(!input.is_dragging());
        // The first move after re-entry only re-anchors the cursor.
        assert_eq!(input.handle_event(moved(50.0, 50.0)), None);
    }
}
