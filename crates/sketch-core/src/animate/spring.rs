use serde::{Deserialize, Serialize};

/// Per-frame damped spring on a scalar.
///
/// Integrated once per rendered frame, not per second: the constants are
/// tuned for ~60 fps and the spring is frame-rate dependent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spring {
    pub position: f32,
    pub velocity: f32,
    pub stiffness: f32,
    /// Velocity retained each frame; 1.0 means no damping.
    pub friction: f32,
}

impl Default for Spring {
    fn default() -> Self {
        Self {
            position: 0.0,
            velocity: 0.0,
            stiffness: 0.02,
            friction: 0.85,
        }
    }
}

impl Spring {
    pub fn at(position: f32) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Advance one frame towards `target` and return the new position.
    pub fn step(&mut self, target: f32) -> f32 {
        self.velocity += (target - self.position) * self.stiffness;
        self.velocity *= self.friction;
        self.position += self.velocity;
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_step_moves_towards_target() {
        let mut s = Spring::at(0.0);
        let x = s.step(10.0);
        // v = 10 * 0.02 * 0.85
        assert!((x - 0.17).abs() < 1e-6, "first step: {}", x);
    }
}
