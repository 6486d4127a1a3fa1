//! Boss domain: time-bounded horizontal movement toward a target x.

use bevy::prelude::*;

use crate::boss::ports::BossBody;

/// Base allowance before the distance/speed term kicks in
const BASE_TIMEOUT: f32 = 2.0;
/// Hard ceiling on any automatic movement timeout
const MAX_TIMEOUT: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStatus {
    Moving,
    Arrived,
    TimedOut,
}

impl MoveStatus {
    pub fn is_finished(self) -> bool {
        self != MoveStatus::Moving
    }
}

/// Drives horizontal velocity toward `target_x` until close enough or out of time.
///
/// Vertical velocity is never touched. Every exit path zeroes the horizontal
/// component, and every driver has a finite timeout.
#[derive(Debug, Clone)]
pub struct MovementDriver {
    pub target_x: f32,
    pub speed: f32,
    pub threshold: f32,
    pub timeout: f32,
    elapsed: f32,
    status: MoveStatus,
}

impl MovementDriver {
    /// Driver whose timeout is `min(2 + distance / speed, 4)` seconds.
    pub fn toward(from_x: f32, target_x: f32, speed: f32, threshold: f32) -> Self {
        let timeout = auto_timeout((target_x - from_x).abs(), speed);
        Self::with_timeout(target_x, speed, threshold, timeout)
    }

    pub fn with_timeout(target_x: f32, speed: f32, threshold: f32, timeout: f32) -> Self {
        Self {
            target_x,
            speed: speed.max(0.0),
            threshold: threshold.max(0.0),
            timeout: timeout.max(0.0),
            elapsed: 0.0,
            status: MoveStatus::Moving,
        }
    }

    #[cfg(test)]
    pub fn status(&self) -> MoveStatus {
        self.status
    }

    #[cfg(test)]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn tick(&mut self, dt: f32, body: &mut dyn BossBody) -> MoveStatus {
        if self.status.is_finished() {
            return self.status;
        }

        let position = body.position();
        let remaining = self.target_x - position.x;

        if remaining.abs() <= self.threshold {
            return self.finish(MoveStatus::Arrived, body);
        }

        self.elapsed += dt;
        if self.elapsed >= self.timeout {
            debug!(
                "Movement to x={:.2} timed out after {:.2}s ({:.2} short)",
                self.target_x,
                self.elapsed,
                remaining.abs()
            );
            return self.finish(MoveStatus::TimedOut, body);
        }

        let mut velocity = body.velocity();
        velocity.x = remaining.signum() * self.speed;
        body.set_velocity(velocity);
        MoveStatus::Moving
    }

    fn finish(&mut self, status: MoveStatus, body: &mut dyn BossBody) -> MoveStatus {
        let mut velocity = body.velocity();
        velocity.x = 0.0;
        body.set_velocity(velocity);
        self.status = status;
        status
    }
}

/// `min(2 + distance / speed, 4)`, with non-positive speed mapped to the ceiling.
pub fn auto_timeout(distance: f32, speed: f32) -> f32 {
    if speed <= 0.0 {
        return MAX_TIMEOUT;
    }
    (BASE_TIMEOUT + distance / speed).min(MAX_TIMEOUT)
}
