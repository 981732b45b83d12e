use std::f64::consts::TAU;

/// Angles of a rotation animation.
///
/// `speed` full turns per second at `frame_rate` frames per second, played
/// for `rotations` turns. The angle steps by
/// `2π / (frame_rate / speed)` from 0 (included) up to
/// `rotations * 2π` (excluded).
///
/// # Example
/// ```
/// use aa_render::sequence::RotationPlan;
/// let plan = RotationPlan { speed: 1.0, frame_rate: 4, rotations: 1 };
/// let angles = plan.angles();
/// assert_eq!(angles.len(), 4);
/// assert!((angles[1] - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationPlan {
    /// Rotations per second. 0 means no animation.
    pub speed: f32,
    /// Frames per second.
    pub frame_rate: u32,
    /// Full turns to play.
    pub rotations: u32,
}

impl RotationPlan {
    /// `true` when the plan has at least one frame to play.
    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.speed > 0.0 && self.speed.is_finite() && self.frame_rate > 0 && self.rotations > 0
    }

    /// Frames per full turn.
    #[must_use]
    pub fn iterations_per_rotation(&self) -> f64 {
        f64::from(self.frame_rate) / f64::from(self.speed)
    }

    /// Angle increment between two frames, in radians.
    #[must_use]
    pub fn angle_step(&self) -> f64 {
        TAU / self.iterations_per_rotation()
    }

    /// Every angle of the animation, in order.
    ///
    /// Empty when not animated. The final upright frame is not included.
    #[must_use]
    pub fn angles(&self) -> Vec<f32> {
        if !self.is_animated() {
            return Vec::new();
        }
        let step = self.angle_step();
        let frames = f64::from(self.rotations) * self.iterations_per_rotation();
        let count = (frames - 1e-9).ceil() as usize;
        (0..count).map(|i| (i as f64 * step) as f32).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_speed_is_static() {
        let plan = RotationPlan {
            speed: 0.0,
            frame_rate: 30,
            rotations: 1,
        };
        assert!(!plan.is_animated());
        assert!(plan.angles().is_empty());
    }

    #[test]
    fn half_speed_doubles_frames_per_turn() {
        let plan = RotationPlan {
            speed: 0.5,
            frame_rate: 30,
            rotations: 2,
        };
        assert!((plan.iterations_per_rotation() - 60.0).abs() < 1e-9);
        let angles = plan.angles();
        assert_eq!(angles.len(), 120);
        assert!(angles[0].abs() < f32::EPSILON);
        assert!(angles.windows(2).all(|w| w[1] > w[0]));
        assert!(f64::from(*angles.last().unwrap()) < 2.0 * TAU);
    }

    #[test]
    fn fractional_iterations_round_up() {
        let plan = RotationPlan {
            speed: 3.0,
            frame_rate: 10,
            rotations: 1,
        };
        // 10 / 3 frames per turn: angles 0, 0.3τ, 0.6τ, 0.9τ.
        assert_eq!(plan.angles().len(), 4);
    }
}
