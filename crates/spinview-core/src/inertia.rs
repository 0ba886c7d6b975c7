//! Post-release inertial deceleration.
//!
//! At release the recorded motion path yields a launch velocity in pixels
//! per decel tick. Each tick the rotation controller projects the last
//! recorded point forward by that many pixels and replays it through the
//! drag math; the velocity then sheds a fixed amount until its sign would
//! flip. A linear ramp is enough for a bounded drag gesture.

use std::time::Duration;

use tracing::debug;

use crate::path::MotionPath;

/// One in-flight deceleration run.
#[derive(Debug, Clone, Copy)]
pub struct Inertia {
    velocity: f64,
}

impl Inertia {
    /// Compute the launch velocity from a drag's motion path.
    ///
    /// Returns `None` when the path cannot support an estimate (fewer
    /// than two samples) or the estimate is exactly zero; the release
    /// then ends the interaction with no inertia.
    pub fn begin(path: &MotionPath, time_step: Duration, max_velocity: f64) -> Option<Self> {
        if !path.is_sufficient() {
            return None;
        }

        let mut velocity = path.velocity_over(time_step).ok()?;
        if velocity == 0.0 {
            return None;
        }

        // Keep a lid on how fast the rotation spins out.
        if velocity.abs() > max_velocity {
            velocity = velocity.signum() * max_velocity;
        }

        debug!(velocity, "inertia launched");
        Some(Self { velocity })
    }

    /// Current velocity in pixels per decel tick.
    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Shed `decel` pixels of velocity. Returns true when the run is
    /// finished: the magnitude reached zero without ever changing sign.
    pub fn decay(&mut self, decel: f64) -> bool {
        if self.velocity > 0.0 {
            self.velocity -= decel;
            if self.velocity <= 0.0 {
                self.velocity = 0.0;
                debug!("inertia spent");
                return true;
            }
        } else {
            self.velocity += decel;
            if self.velocity >= 0.0 {
                self.velocity = 0.0;
                debug!("inertia spent");
                return true;
            }
        }
        false
    }
}
