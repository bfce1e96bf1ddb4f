//! Control sources: turn raw input into the ambient gravity vector.
//!
//! The ball is never pushed directly. Each tick the active control source
//! produces a world-space vector and the game points gravity along it, so the
//! whole maze "tilts" under the ball.

use glam::Vec2;

use tilt_engine::InputEvent;

/// Drag: each world unit of pointer offset from the ball adds 1/100 of a
/// gravity unit.
const DRAG_DIVISOR: f32 = 100.0;

/// Tilt: accelerometer axes are swapped for a landscape device and scaled up.
const TILT_SCALE: f32 = 50.0;

/// A source of the ambient control vector.
pub trait ControlSource {
    /// Observe one raw input event.
    fn feed(&mut self, event: &InputEvent);

    /// The current control vector, if the source is active. `None` leaves
    /// gravity untouched, so the ball keeps its current drift.
    fn ambient_vector(&self, player_pos: Vec2) -> Option<Vec2>;
}

/// Pointer-driven control: gravity points from the ball toward the held
/// pointer, proportional to distance. Releasing the pointer deactivates it.
#[derive(Debug, Default)]
pub struct DragControl {
    pointer: Option<Vec2>,
}

impl DragControl {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ControlSource for DragControl {
    fn feed(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerDown { x, y } | InputEvent::PointerMove { x, y } => {
                self.pointer = Some(Vec2::new(x, y));
            }
            InputEvent::PointerUp { .. } => {
                self.pointer = None;
            }
            InputEvent::Tilt { .. } => {}
        }
    }

    fn ambient_vector(&self, player_pos: Vec2) -> Option<Vec2> {
        self.pointer.map(|p| (p - player_pos) / DRAG_DIVISOR)
    }
}

/// Accelerometer-driven control for a device held in landscape: the device's
/// y axis drives world x (negated) and the device's x axis drives world y.
#[derive(Debug, Default)]
pub struct TiltControl {
    sample: Option<Vec2>,
}

impl TiltControl {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ControlSource for TiltControl {
    fn feed(&mut self, event: &InputEvent) {
        if let InputEvent::Tilt { ax, ay } = *event {
            self.sample = Some(Vec2::new(ax, ay));
        }
    }

    fn ambient_vector(&self, _player_pos: Vec2) -> Option<Vec2> {
        self.sample
            .map(|a| Vec2::new(-a.y * TILT_SCALE, a.x * TILT_SCALE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_scales_offset_from_player() {
        let mut drag = DragControl::new();
        assert_eq!(drag.ambient_vector(Vec2::new(100.0, 100.0)), None);

        drag.feed(&InputEvent::PointerDown { x: 200.0, y: 150.0 });
        let v = drag.ambient_vector(Vec2::new(100.0, 100.0)).unwrap();
        assert_eq!(v, Vec2::new(1.0, 0.5));

        drag.feed(&InputEvent::PointerMove { x: 100.0, y: 100.0 });
        let v = drag.ambient_vector(Vec2::new(100.0, 100.0)).unwrap();
        assert_eq!(v, Vec2::ZERO);

        drag.feed(&InputEvent::PointerUp { x: 100.0, y: 100.0 });
        assert_eq!(drag.ambient_vector(Vec2::new(100.0, 100.0)), None);
    }

    #[test]
    fn tilt_swaps_axes_for_landscape() {
        let mut tilt = TiltControl::new();
        assert_eq!(tilt.ambient_vector(Vec2::ZERO), None);

        tilt.feed(&InputEvent::Tilt { ax: 0.3, ay: -0.2 });
        let v = tilt.ambient_vector(Vec2::ZERO).unwrap();
        assert!((v.x - 10.0).abs() < 1e-5);
        assert!((v.y - 15.0).abs() < 1e-5);
    }

    #[test]
    fn tilt_ignores_pointer_events() {
        let mut tilt = TiltControl::new();
        tilt.feed(&InputEvent::PointerDown { x: 10.0, y: 10.0 });
        assert_eq!(tilt.ambient_vector(Vec2::ZERO), None);
    }
}
