//! Per-widget critically-damped spring animation.
//!
//! Every widget drives one (or a few) of these toward a target value — usually a packed color —
//! instead of snapping, so hover/press feedback reads as motion rather than a hard cut.

/// `current`/`velocity`/`target` are scalars; callers driving a color step one `AnimState` per
/// channel (or pack all four into `[f32; 4]` and step each independently).
#[derive(Clone, Copy, Debug)]
pub struct AnimState {
    pub current: f32,
    pub velocity: f32,
    pub target: f32,
    /// Spring stiffness.
    pub stiffness: f32,
    /// Velocity damping (`k_v`).
    pub damping: f32,
}

impl AnimState {
    pub fn new(initial: f32, stiffness: f32, damping: f32) -> Self {
        Self {
            current: initial,
            velocity: 0.0,
            target: initial,
            stiffness,
            damping,
        }
    }

    /// Advances the spring by `dt` seconds. A total function: same inputs, same output, no
    /// hidden state beyond what's stored on `self`.
    pub fn step(&mut self, dt: f32) {
        let accel = self.stiffness * (self.target - self.current) - self.damping * self.velocity;
        self.velocity += dt * accel;
        self.current += dt * self.velocity;
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settles_on_target_given_enough_steps() {
        let mut anim = AnimState::new(0.0, 300.0, 30.0);
        anim.set_target(1.0);
        for _ in 0..500 {
            anim.step(1.0 / 60.0);
        }
        assert!((anim.current - 1.0).abs() < 0.01, "current={}", anim.current);
    }

    #[test]
    fn zero_dt_is_a_no_op() {
        let mut anim = AnimState::new(0.25, 300.0, 30.0);
        anim.set_target(1.0);
        anim.step(0.0);
        assert_eq!(anim.current, 0.25);
        assert_eq!(anim.velocity, 0.0);
    }
}
