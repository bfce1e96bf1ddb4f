/// Fixed timestep accumulator for the game runner.
///
/// Frame callbacks arrive at whatever rate the platform delivers; simulation
/// must advance in fixed increments so physics and animation timings stay
/// deterministic. Feed each frame's wall-clock delta in, run the number of
/// steps that comes back out.
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
}

/// Upper bound on steps per frame. A long stall burns at most this much
/// simulation, instead of spiraling as each catch-up frame falls further
/// behind.
const MAX_STEPS_PER_FRAME: f32 = 10.0;

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self { dt, accumulator: 0.0 }
    }

    /// Add a frame's elapsed time; returns how many fixed steps to run now.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        self.accumulator = self.accumulator.min(self.dt * MAX_STEPS_PER_FRAME);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// The fixed step size in seconds.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}
