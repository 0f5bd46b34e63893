//! Blade volume and hand input
//!
//! The tracking subsystem runs on its own thread and publishes into a
//! [`HandFeed`]. The world takes the latest value once per tick and moves
//! the [`BladeVolume`] to it; nothing reads the feed mid-tick.

use std::sync::Arc;

use parking_lot::Mutex;
use slash_math::{consts::TAU, Cylinder, Vec2, Vec3};

use crate::config::{BladeConfig, PlayAreaConfig};

/// One hand estimate from the tracking side
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandInput {
    /// `(x, y)` in `[0, 1]²`, mapped onto the play cylinder
    Normalized(Vec2),
    /// World-space point, used as-is
    World(Vec3),
}

impl HandInput {
    /// World-space blade position for this input
    pub fn resolve(&self, area: &PlayAreaConfig) -> Vec3 {
        match *self {
            HandInput::Normalized(n) => map_normalized(n, area),
            HandInput::World(p) => p,
        }
    }
}

/// Map a normalized hand coordinate onto the side of the play cylinder
///
/// Only `angular_range` of a full turn and `vertical_range` of the height are
/// used, both centred on 0.5. The height stays `edge_margin` inside the caps.
pub fn map_normalized(n: Vec2, area: &PlayAreaConfig) -> Vec3 {
    let ax = 0.5 + (n.x - 0.5) * area.angular_range;
    let ay = 0.5 + (n.y - 0.5) * area.vertical_range;

    let theta = ax * TAU;
    let limit = (area.height * 0.5 - area.edge_margin).max(0.0);
    let y = ((ay - 0.5) * area.height).clamp(-limit, limit);

    area.cylinder().surface_point(theta, y)
}

/// The cutting edge: a short upright cylinder following the hand
#[derive(Debug, Clone)]
pub struct BladeVolume {
    radius: f32,
    height: f32,
    position: Vec3,
    present: bool,
}

impl BladeVolume {
    pub fn new(config: &BladeConfig) -> Self {
        debug_assert!(config.radius > 0.0 && config.height > 0.0);
        Self {
            radius: config.radius,
            height: config.height,
            position: Vec3::ZERO,
            present: false,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Whether any hand input has arrived yet
    pub fn is_present(&self) -> bool {
        self.present
    }

    pub fn move_to(&mut self, position: Vec3) {
        self.position = position;
        self.present = true;
    }

    /// Forget the hand; nothing is cut until the next estimate arrives
    pub fn clear(&mut self) {
        self.position = Vec3::ZERO;
        self.present = false;
    }

    pub fn cylinder(&self) -> Cylinder {
        Cylinder::new(self.position, self.radius, self.height)
    }
}

#[derive(Debug, Default)]
struct FeedSlot {
    latest: Option<HandInput>,
    sequence: u64,
}

/// Latest-value mailbox between the tracking thread and the world
///
/// Cloning shares the same slot. Publishing overwrites any value the world
/// has not taken yet.
#[derive(Debug, Clone, Default)]
pub struct HandFeed {
    slot: Arc<Mutex<FeedSlot>>,
}

impl HandFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `input` as the newest estimate; returns its sequence number
    pub fn publish(&self, input: HandInput) -> u64 {
        let mut slot = self.slot.lock();
        slot.sequence += 1;
        slot.latest = Some(input);
        slot.sequence
    }

    /// Take the newest estimate, if one arrived since the last take
    pub fn take_latest(&self) -> Option<(u64, HandInput)> {
        let mut slot = self.slot.lock();
        let sequence = slot.sequence;
        slot.latest.take().map(|input| (sequence, input))
    }

    /// Number of estimates published so far
    pub fn sequence(&self) -> u64 {
        self.slot.lock().sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::thread;

    #[test]
    fn test_centre_maps_to_half_turn() {
        let area = PlayAreaConfig::default();
        let p = map_normalized(Vec2::new(0.5, 0.5), &area);
        // theta = π puts the blade at -x from the axis
        assert_relative_eq!(p.x, area.center.x - area.radius, epsilon = 1e-5);
        assert_relative_eq!(p.y, area.center.y, epsilon = 1e-5);
        assert_relative_eq!(p.z, area.center.z, epsilon = 1e-4);
    }

    #[test]
    fn test_mapped_point_is_on_cylinder() {
        let area = PlayAreaConfig::default();
        for &(x, y) in &[(0.0, 0.0), (1.0, 1.0), (0.2, 0.9), (0.7, 0.3)] {
            let p = map_normalized(Vec2::new(x, y), &area);
            assert_relative_eq!((p - area.center).horizontal_length(), area.radius, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_vertical_clamped_inside_margin() {
        let mut area = PlayAreaConfig::default();
        area.vertical_range = 1.0;
        let limit = area.height * 0.5 - area.edge_margin;

        let top = map_normalized(Vec2::new(0.5, 1.0), &area);
        let bottom = map_normalized(Vec2::new(0.5, -3.0), &area);
        assert_relative_eq!(top.y - area.center.y, limit, epsilon = 1e-5);
        assert_relative_eq!(bottom.y - area.center.y, -limit, epsilon = 1e-5);
    }

    #[test]
    fn test_world_input_passes_through() {
        let area = PlayAreaConfig::default();
        let p = Vec3::new(0.3, -0.2, 1.0);
        assert_eq!(HandInput::World(p).resolve(&area), p);
    }

    #[test]
    fn test_blade_presence() {
        let mut blade = BladeVolume::new(&BladeConfig::default());
        assert!(!blade.is_present());

        blade.move_to(Vec3::new(2.0, 0.0, 0.0));
        assert!(blade.is_present());
        assert_eq!(blade.cylinder().center, Vec3::new(2.0, 0.0, 0.0));

        blade.clear();
        assert!(!blade.is_present());
        assert_eq!(blade.position(), Vec3::ZERO);
    }

    #[test]
    fn test_feed_keeps_latest_only() {
        let feed = HandFeed::new();
        assert!(feed.take_latest().is_none());

        feed.publish(HandInput::World(Vec3::X));
        let seq = feed.publish(HandInput::World(Vec3::Y));
        assert_eq!(seq, 2);

        assert_eq!(feed.take_latest(), Some((2, HandInput::World(Vec3::Y))));
        assert!(feed.take_latest().is_none());
        assert_eq!(feed.sequence(), 2);
    }

    #[test]
    fn test_feed_across_threads() {
        let feed = HandFeed::new();
        let producer = feed.clone();
        let worker = thread::spawn(move || {
            for i in 0..100 {
                producer.publish(HandInput::Normalized(Vec2::new(i as f32 / 100.0, 0.5)));
            }
        });
        worker.join().unwrap();

        assert_eq!(feed.sequence(), 100);
        let (seq, input) = feed.take_latest().unwrap();
        assert_eq!(seq, 100);
        assert_eq!(input, HandInput::Normalized(Vec2::new(0.99, 0.5)));
    }
}
