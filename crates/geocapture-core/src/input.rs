//! Pointer and keyboard state for map interactions.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event in screen coordinates, for mouse and touch alike.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Scroll {
        position: Point,
        delta: Vec2,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            Self::Down { position, .. }
            | Self::Up { position, .. }
            | Self::Move { position }
            | Self::Scroll { position, .. } => *position,
        }
    }
}

/// Keyboard event type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

/// Double-click detection constants.
pub const DOUBLE_CLICK_TIME: Duration = Duration::from_millis(500);
pub const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Pointer travel (px) below which a press/release pair counts as a click.
pub const CLICK_TOLERANCE: f64 = 4.0;

/// Tracks pointer and key state between events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in screen coordinates.
    pub pointer_position: Point,
    /// Pointer position before the latest event.
    pub previous_pointer_position: Point,
    pressed_buttons: HashSet<MouseButton>,
    pressed_keys: HashSet<String>,
    /// Start position of the current left-button press.
    pub drag_start: Option<Point>,
    /// Furthest the pointer has travelled from `drag_start`.
    max_travel: f64,
    last_click_time: Option<Instant>,
    last_click_position: Option<Point>,
    /// Whether the latest left press completed a double-click.
    double_click_detected: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a pointer event stamped with the current time.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        self.handle_pointer_event_at(event, Instant::now());
    }

    /// Process a pointer event that happened at `now`.
    pub fn handle_pointer_event_at(&mut self, event: &PointerEvent, now: Instant) {
        self.previous_pointer_position = self.pointer_position;
        match *event {
            PointerEvent::Down { position, button } => {
                self.pointer_position = position;
                self.pressed_buttons.insert(button);
                if button == MouseButton::Left {
                    self.register_click(position, now);
                    self.drag_start = Some(position);
                    self.max_travel = 0.0;
                }
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = position;
                self.pressed_buttons.remove(&button);
                self.track_travel(position);
            }
            PointerEvent::Move { position } => {
                self.pointer_position = position;
                self.track_travel(position);
            }
            PointerEvent::Scroll { position, .. } => {
                self.pointer_position = position;
            }
        }
    }

    fn register_click(&mut self, position: Point, now: Instant) {
        self.double_click_detected = false;
        if let (Some(last_time), Some(last_pos)) = (self.last_click_time, self.last_click_position) {
            let elapsed = now.saturating_duration_since(last_time);
            if elapsed < DOUBLE_CLICK_TIME && (position - last_pos).hypot() < DOUBLE_CLICK_DISTANCE {
                self.double_click_detected = true;
                // Reset so a triple click is not a second double-click
                self.last_click_time = None;
                self.last_click_position = None;
                return;
            }
        }
        self.last_click_time = Some(now);
        self.last_click_position = Some(position);
    }

    fn track_travel(&mut self, position: Point) {
        if let Some(start) = self.drag_start {
            self.max_travel = self.max_travel.max((position - start).hypot());
        }
    }

    /// Finish the current press, returning true if it was a click rather than a drag.
    pub fn finish_press(&mut self) -> bool {
        let was_click = self.drag_start.is_some() && self.max_travel < CLICK_TOLERANCE;
        self.drag_start = None;
        self.max_travel = 0.0;
        was_click
    }

    /// Process a key event.
    pub fn handle_key_event(&mut self, event: &KeyEvent) {
        match event {
            KeyEvent::Pressed(key) => {
                self.pressed_keys.insert(key.clone());
            }
            KeyEvent::Released(key) => {
                self.pressed_keys.remove(key);
            }
        }
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    pub fn is_key_pressed(&self, key: &str) -> bool {
        self.pressed_keys.contains(key)
    }

    /// Whether the latest left press completed a double-click.
    pub fn is_double_click(&self) -> bool {
        self.double_click_detected
    }

    /// Whether the pointer has moved far enough since the press to count as a drag.
    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some() && self.max_travel >= CLICK_TOLERANCE
    }

    /// Pointer movement caused by the latest event.
    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer_position - self.previous_pointer_position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_button_press_and_release() {
        let mut input = InputState::new();
        input.handle_pointer_event(&down(100.0, 100.0));
        assert!(input.is_button_pressed(MouseButton::Left));
        assert!(!input.is_button_pressed(MouseButton::Right));

        input.handle_pointer_event(&up(100.0, 100.0));
        assert!(!input.is_button_pressed(MouseButton::Left));
    }

    #[test]
    fn test_click_vs_drag() {
        let mut input = InputState::new();
        input.handle_pointer_event(&down(100.0, 100.0));
        input.handle_pointer_event(&PointerEvent::Move {
            position: Point::new(101.0, 101.0),
        });
        input.handle_pointer_event(&up(101.0, 101.0));
        assert!(input.finish_press());

        input.handle_pointer_event(&down(100.0, 100.0));
        input.handle_pointer_event(&PointerEvent::Move {
            position: Point::new(150.0, 120.0),
        });
        assert!(input.is_dragging());
        let delta = input.pointer_delta();
        assert!((delta.x - 50.0).abs() < f64::EPSILON);
        assert!((delta.y - 20.0).abs() < f64::EPSILON);
        input.handle_pointer_event(&up(150.0, 120.0));
        assert!(!input.finish_press());
    }

    #[test]
    fn test_key_press() {
        let mut input = InputState::new();
        input.handle_key_event(&KeyEvent::Pressed("Escape".to_string()));
        assert!(input.is_key_pressed("Escape"));
        input.handle_key_event(&KeyEvent::Released("Escape".to_string()));
        assert!(!input.is_key_pressed("Escape"));
    }

    #[test]
    fn test_double_click_detection() {
        let mut input = InputState::new();
        let t0 = Instant::now();

        input.handle_pointer_event_at(&down(100.0, 100.0), t0);
        assert!(!input.is_double_click());
        input.handle_pointer_event_at(&up(100.0, 100.0), t0);

        input.handle_pointer_event_at(&down(101.0, 100.0), t0 + Duration::from_millis(200));
        assert!(input.is_double_click());

        // A third quick click starts a new sequence
        input.handle_pointer_event_at(&down(101.0, 100.0), t0 + Duration::from_millis(300));
        assert!(!input.is_double_click());
    }

    #[test]
    fn test_double_click_too_slow() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        input.handle_pointer_event_at(&down(100.0, 100.0), t0);
        input.handle_pointer_event_at(&down(100.0, 100.0), t0 + Duration::from_millis(800));
        assert!(!input.is_double_click());
    }

    #[test]
    fn test_double_click_too_far() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        input.handle_pointer_event_at(&down(100.0, 100.0), t0);
        input.handle_pointer_event_at(&down(200.0, 200.0), t0 + Duration::from_millis(100));
        assert!(!input.is_double_click());
    }
}
