//! Frame-stepped waypoint following
//!
//! A [`MovementController`] is either Idle (no waypoints) or Moving. Each
//! [`MovementController::tick`] either walks toward the active waypoint,
//! never overshooting it, or, once within the reach threshold, snaps onto it
//! and activates the next one. Consuming the last waypoint returns to Idle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::MovementConfig;

/// Controller state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionPhase {
    Idle,
    Moving,
}

/// What a single tick did
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickEvent {
    /// No path to follow
    Idle,
    /// Non-positive or non-finite time step; nothing changed
    Paused,
    /// Walked toward the active waypoint
    Advanced { distance: f32 },
    /// Snapped onto waypoint `index`; more remain
    Reached { index: usize },
    /// Snapped onto the final waypoint and went Idle
    Arrived,
}

/// Per-entity movement state
#[derive(Clone, Debug, PartialEq)]
pub struct MovementController {
    position: Vec2,
    waypoints: Vec<Vec2>,
    next_waypoint: usize,
    movement_points_remaining: f32,
    movement_budget: f32,
    speed: f32,
    reach_threshold: f32,
}

impl MovementController {
    /// Idle controller at `position` with a full point budget
    pub fn new(position: Vec2, config: &MovementConfig) -> Self {
        Self {
            position,
            waypoints: Vec::new(),
            next_waypoint: 0,
            movement_points_remaining: config.movement_budget,
            movement_budget: config.movement_budget,
            speed: config.speed,
            reach_threshold: config.reach_threshold.max(0.0),
        }
    }

    // ========================================================================
    // COMMANDS
    // ========================================================================

    /// Start following `waypoints` from the current position.
    ///
    /// Fewer than two waypoints is not a traversable path: the controller is
    /// cleared to Idle instead. Any previous path is discarded.
    pub fn set_path(&mut self, waypoints: impl Into<Vec<Vec2>>) {
        let waypoints = waypoints.into();
        if waypoints.len() < 2 {
            self.clear_path();
            return;
        }
        self.waypoints = waypoints;
        self.next_waypoint = 0;
        self.movement_points_remaining = self.movement_budget;
    }

    /// Drop the current path and go Idle where the entity stands
    pub fn clear_path(&mut self) {
        self.waypoints.clear();
        self.next_waypoint = 0;
    }

    /// Place the entity without walking
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Advance by `delta_time` seconds
    pub fn tick(&mut self, delta_time: f32) -> TickEvent {
        let Some(target) = self.active_waypoint() else {
            return TickEvent::Idle;
        };
        if !(delta_time.is_finite() && delta_time > 0.0) {
            return TickEvent::Paused;
        }

        let offset = target - self.position;
        let distance = offset.length();

        if distance > self.reach_threshold && distance > 0.0 {
            let step = (self.speed * delta_time).min(distance);
            self.position += offset / distance * step;
            self.movement_points_remaining -= step;
            return TickEvent::Advanced { distance: step };
        }

        // Snap to remove drift left by the threshold
        self.position = target;
        let index = self.next_waypoint;
        self.next_waypoint += 1;
        if self.next_waypoint == self.waypoints.len() {
            self.clear_path();
            TickEvent::Arrived
        } else {
            TickEvent::Reached { index }
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn is_moving(&self) -> bool {
        !self.waypoints.is_empty()
    }

    pub fn phase(&self) -> MotionPhase {
        if self.is_moving() {
            MotionPhase::Moving
        } else {
            MotionPhase::Idle
        }
    }

    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    pub fn next_waypoint_index(&self) -> usize {
        self.next_waypoint
    }

    /// Waypoint currently steered toward
    pub fn active_waypoint(&self) -> Option<Vec2> {
        self.waypoints.get(self.next_waypoint).copied()
    }

    pub fn movement_points_remaining(&self) -> f32 {
        self.movement_points_remaining
    }

    pub fn movement_budget(&self) -> f32 {
        self.movement_budget
    }

    /// Points are informational: an exhausted controller keeps moving
    pub fn is_exhausted(&self) -> bool {
        self.movement_points_remaining <= 0.0
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn reach_threshold(&self) -> f32 {
        self.reach_threshold
    }

    pub fn distance_to_waypoint(&self) -> Option<f32> {
        self.active_waypoint().map(|w| w.distance(self.position))
    }

    /// Distance to the active waypoint plus every segment after it
    pub fn remaining_path_length(&self) -> f32 {
        let Some(first) = self.distance_to_waypoint() else {
            return 0.0;
        };
        let rest: f32 = self.waypoints[self.next_waypoint..]
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum();
        first + rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(speed: f32) -> MovementConfig {
        MovementConfig::default()
            .with_speed(speed)
            .with_reach_threshold(5.0)
            .with_budget(1000.0)
    }

    fn line(points: &[f32]) -> Vec<Vec2> {
        points.iter().map(|&x| Vec2::new(x, 0.0)).collect()
    }

    #[test]
    fn test_starts_idle() {
        let mut mover = MovementController::new(Vec2::new(1.0, 2.0), &config(100.0));
        assert!(!mover.is_moving());
        assert_eq!(mover.phase(), MotionPhase::Idle);
        assert_eq!(mover.tick(0.5), TickEvent::Idle);
        assert_eq!(mover.position(), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_degenerate_paths_stay_idle() {
        let mut mover = MovementController::new(Vec2::ZERO, &config(100.0));
        mover.set_path(Vec::new());
        assert!(!mover.is_moving());
        mover.set_path(line(&[50.0]));
        assert!(!mover.is_moving());

        mover.set_path(line(&[50.0, 100.0]));
        assert!(mover.is_moving());
        mover.set_path(line(&[10.0]));
        assert!(!mover.is_moving());
        assert_eq!(mover.next_waypoint_index(), 0);
    }

    #[test]
    fn test_set_path_does_not_teleport() {
        let mut mover = MovementController::new(Vec2::new(-20.0, 0.0), &config(100.0));
        mover.set_path(line(&[0.0, 100.0]));
        assert_eq!(mover.position(), Vec2::new(-20.0, 0.0));
        assert_eq!(mover.active_waypoint(), Some(Vec2::ZERO));
    }

    #[test]
    fn test_zero_tick_is_noop() {
        let mut mover = MovementController::new(Vec2::ZERO, &config(100.0));
        mover.set_path(line(&[2.0, 100.0]));
        let before = mover.clone();
        assert_eq!(mover.tick(0.0), TickEvent::Paused);
        assert_eq!(mover.tick(-1.0), TickEvent::Paused);
        assert_eq!(mover.tick(f32::NAN), TickEvent::Paused);
        assert_eq!(mover, before);
    }

    #[test]
    fn test_never_overshoots() {
        let mut mover = MovementController::new(Vec2::ZERO, &config(1000.0));
        mover.set_path(line(&[40.0, 80.0]));
        assert_eq!(mover.tick(1.0), TickEvent::Advanced { distance: 40.0 });
        assert_eq!(mover.position(), Vec2::new(40.0, 0.0));
    }

    #[test]
    fn test_distance_shrinks_monotonically() {
        let mut mover = MovementController::new(Vec2::new(0.0, 0.0), &config(70.0));
        mover.set_path(vec![Vec2::new(120.0, 90.0), Vec2::new(300.0, 90.0)]);
        let mut last = mover.distance_to_waypoint().unwrap();
        while let TickEvent::Advanced { .. } = mover.tick(0.1) {
            let now = mover.distance_to_waypoint().unwrap();
            assert!(now < last);
            last = now;
        }
        assert_eq!(mover.position(), Vec2::new(120.0, 90.0));
        assert_eq!(mover.next_waypoint_index(), 1);
    }

    #[test]
    fn test_negative_threshold_still_snaps() {
        let cfg = config(100.0).with_reach_threshold(-1.0);
        let mut mover = MovementController::new(Vec2::new(10.0, 0.0), &cfg);
        assert_eq!(mover.reach_threshold(), 0.0);
        mover.set_path(line(&[10.0, 50.0]));

        assert_eq!(mover.tick(0.1), TickEvent::Reached { index: 0 });
        assert_eq!(mover.position(), Vec2::new(10.0, 0.0));
        assert!(mover.position().is_finite());

        assert_eq!(mover.tick(0.1), TickEvent::Advanced { distance: 10.0 });
        assert_eq!(mover.position(), Vec2::new(20.0, 0.0));
    }

    #[test]
    fn test_snap_within_threshold() {
        let mut mover = MovementController::new(Vec2::ZERO, &config(100.0));
        mover.set_path(line(&[3.0, 50.0]));
        assert_eq!(mover.tick(0.1), TickEvent::Reached { index: 0 });
        assert_eq!(mover.position(), Vec2::new(3.0, 0.0));
        assert!(mover.is_moving());
        assert_eq!(mover.active_waypoint(), Some(Vec2::new(50.0, 0.0)));
    }

    #[test]
    fn test_follows_full_path() {
        let mut mover = MovementController::new(Vec2::ZERO, &config(300.0));
        let waypoints = line(&[100.0, 200.0, 300.0]);
        mover.set_path(waypoints.clone());

        let mut first_reached = None;
        let mut ticks = 0;
        while mover.is_moving() && ticks < 100 {
            ticks += 1;
            if mover.tick(0.1) == (TickEvent::Reached { index: 0 }) {
                first_reached = Some(ticks);
            }
        }

        assert_eq!(first_reached, Some(5));
        assert_eq!(ticks, 15);
        assert_eq!(mover.position(), waypoints[2]);
        assert!(!mover.is_moving());
        assert!(mover.waypoints().is_empty());
        assert_eq!(mover.next_waypoint_index(), 0);
    }

    #[test]
    fn test_replan_discards_previous_path() {
        let mut mover = MovementController::new(Vec2::ZERO, &config(100.0));
        mover.set_path(line(&[100.0, 200.0]));
        mover.tick(0.5);
        assert_eq!(mover.position(), Vec2::new(50.0, 0.0));

        mover.set_path(vec![Vec2::new(50.0, 50.0), Vec2::new(50.0, 100.0)]);
        assert_eq!(mover.next_waypoint_index(), 0);
        assert_eq!(mover.movement_points_remaining(), 1000.0);
        assert_eq!(mover.position(), Vec2::new(50.0, 0.0));
        mover.tick(0.2);
        assert_eq!(mover.position(), Vec2::new(50.0, 20.0));
    }

    #[test]
    fn test_points_are_spent_but_not_enforced() {
        let cfg = config(300.0).with_budget(100.0);
        let mut mover = MovementController::new(Vec2::ZERO, &cfg);
        mover.set_path(line(&[100.0, 200.0, 300.0]));
        for _ in 0..100 {
            mover.tick(0.1);
        }
        assert!(!mover.is_moving());
        assert_eq!(mover.position(), Vec2::new(300.0, 0.0));
        assert!(mover.is_exhausted());
        assert!((mover.movement_points_remaining() - (100.0 - 300.0)).abs() < 1e-3);
    }

    #[test]
    fn test_remaining_path_length() {
        let mut mover = MovementController::new(Vec2::ZERO, &config(100.0));
        assert_eq!(mover.remaining_path_length(), 0.0);
        mover.set_path(line(&[100.0, 200.0, 300.0]));
        assert_eq!(mover.remaining_path_length(), 300.0);
        mover.tick(0.25);
        assert_eq!(mover.remaining_path_length(), 275.0);
    }
}
