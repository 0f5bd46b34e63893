//! Simulation configuration

use serde::{Deserialize, Serialize};
use slash_math::{Cylinder, Vec3};

use crate::error::{PhysicsError, Result};
use crate::random::RandomSource;

/// Closed interval sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Degenerate range holding one value
    pub const fn fixed(value: f32) -> Self {
        Self::new(value, value)
    }

    pub fn sample(&self, rng: &mut dyn RandomSource) -> f32 {
        rng.range_f32(self.min, self.max)
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    fn check(&self, name: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(invalid(format!("{name} must be finite")));
        }
        if self.min > self.max {
            return Err(invalid(format!("{name} is inverted ({} > {})", self.min, self.max)));
        }
        Ok(())
    }
}

/// Speed caps, applied after every velocity change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityLimits {
    /// Cap on `sqrt(vx² + vz²)`; direction is preserved
    pub max_horizontal: f32,
    /// Cap on `|vy|`
    pub max_vertical: f32,
}

impl VelocityLimits {
    pub const fn new(max_horizontal: f32, max_vertical: f32) -> Self {
        Self { max_horizontal, max_vertical }
    }

    /// Apply both caps
    pub fn clamp(&self, velocity: Vec3) -> Vec3 {
        let mut v = velocity;
        let horizontal = v.horizontal_length();
        if horizontal > self.max_horizontal && horizontal > 0.0 {
            let k = self.max_horizontal / horizontal;
            v.x *= k;
            v.z *= k;
        }
        v.y = v.y.clamp(-self.max_vertical, self.max_vertical);
        v
    }

    /// Whether `velocity` is within both caps (with a little float slack)
    pub fn allows(&self, velocity: Vec3) -> bool {
        const SLACK: f32 = 1e-4;
        velocity.horizontal_length() <= self.max_horizontal + SLACK
            && velocity.y.abs() <= self.max_vertical + SLACK
    }
}

/// Integration constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration (positive)
    pub gravity: f32,
    /// Decorative spin in degrees per second
    pub spin_rate_deg: f32,
    /// Bodies below this height deactivate
    pub floor_y: f32,
    /// Bodies past this depth have reached the player and deactivate
    pub player_plane_z: f32,
    /// Caps for freshly spawned bodies
    pub default_limits: VelocityLimits,
    /// Tighter caps for fragments
    pub fragment_limits: VelocityLimits,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            spin_rate_deg: 90.0,
            floor_y: -10.0,
            player_plane_z: 5.0,
            default_limits: VelocityLimits::new(12.0, 10.0),
            fragment_limits: VelocityLimits::new(6.0, 6.0),
        }
    }
}

/// Spawn cadence and launch randomization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Seconds between spawns
    pub interval: ValueRange,
    /// Seconds from launch to the play cylinder
    pub flight_time: ValueRange,
    /// Extra apex height of the arc
    pub peak_height: ValueRange,
    /// Launch box
    pub x: ValueRange,
    pub y: ValueRange,
    pub z: f32,
    /// Fraction of the cylinder height targets may use
    pub target_height_fraction: f32,
    /// Bound of the random horizontal velocity nudge
    pub horizontal_jitter: f32,
    /// Probability a spawn is the hazard
    pub hazard_chance: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval: ValueRange::new(1.5, 2.5),
            flight_time: ValueRange::new(0.8, 1.2),
            peak_height: ValueRange::new(1.5, 2.5),
            x: ValueRange::new(-2.0, 2.0),
            y: ValueRange::new(-1.5, 0.5),
            z: -5.0,
            target_height_fraction: 0.8,
            horizontal_jitter: 0.1,
            hazard_chance: 0.15,
        }
    }
}

/// The cylinder bodies are aimed at and the blade moves on
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayAreaConfig {
    pub radius: f32,
    pub height: f32,
    pub center: Vec3,
    /// Share of a full turn covered by normalized x in `[0, 1]`
    pub angular_range: f32,
    /// Share of the height covered by normalized y in `[0, 1]`
    pub vertical_range: f32,
    /// Blade stays this far inside the top and bottom edges
    pub edge_margin: f32,
}

impl Default for PlayAreaConfig {
    fn default() -> Self {
        Self {
            radius: 1.5,
            height: 2.0,
            center: Vec3::new(0.0, -0.5, 2.5),
            angular_range: 0.7,
            vertical_range: 0.8,
            edge_margin: 0.1,
        }
    }
}

impl PlayAreaConfig {
    pub fn cylinder(&self) -> Cylinder {
        Cylinder::new(self.center, self.radius, self.height)
    }
}

/// Blade bounding volume
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BladeConfig {
    pub radius: f32,
    pub height: f32,
}

impl Default for BladeConfig {
    fn default() -> Self {
        Self { radius: 0.05, height: 0.3 }
    }
}

/// Fragment behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceConfig {
    /// Offset of each fragment from the original, along the slice normal
    pub separation: f32,
    /// Fragment scale relative to its parent
    pub fragment_scale: f32,
    /// Push along the slice normal, away from the other half
    pub lateral_impulse: ValueRange,
    /// Upward kick
    pub upward_impulse: ValueRange,
    /// Below this cross-product length the fallback axis is used
    pub normal_epsilon: f32,
    /// Bodies at this generation are no longer tested against the blade;
    /// `None` removes the cap
    pub max_generation: Option<u32>,
}

impl Default for SliceConfig {
    fn default() -> Self {
        Self {
            separation: 0.1,
            fragment_scale: 0.9,
            lateral_impulse: ValueRange::new(0.15, 0.35),
            upward_impulse: ValueRange::new(0.5, 1.5),
            normal_epsilon: 1e-4,
            max_generation: Some(3),
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub physics: PhysicsConfig,
    pub spawn: SpawnConfig,
    pub play_area: PlayAreaConfig,
    pub blade: BladeConfig,
    pub slicing: SliceConfig,
    /// Seeds the world RNG; entropy when absent
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// Faster, busier game
    pub fn arcade() -> Self {
        let mut config = Self::default();
        config.spawn.interval = ValueRange::new(0.8, 1.4);
        config.spawn.hazard_chance = 0.2;
        config.blade.radius = 0.08;
        config
    }

    /// Slow arcs, few hazards, forgiving blade
    pub fn relaxed() -> Self {
        let mut config = Self::default();
        config.spawn.interval = ValueRange::new(2.5, 3.5);
        config.spawn.flight_time = ValueRange::new(1.0, 1.6);
        config.spawn.hazard_chance = 0.05;
        config.physics.gravity = 7.0;
        config.blade = BladeConfig { radius: 0.1, height: 0.4 };
        config
    }

    /// Set the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set gravity
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.physics.gravity = gravity;
        self
    }

    /// Set the spawn interval range
    pub fn with_spawn_interval(mut self, min: f32, max: f32) -> Self {
        self.spawn.interval = ValueRange::new(min, max);
        self
    }

    /// Set the hazard probability
    pub fn with_hazard_chance(mut self, chance: f32) -> Self {
        self.spawn.hazard_chance = chance;
        self
    }

    /// Set the blade bounding volume
    pub fn with_blade(mut self, radius: f32, height: f32) -> Self {
        self.blade = BladeConfig { radius, height };
        self
    }

    /// Set or remove the fragment generation cap
    pub fn with_max_generation(mut self, max_generation: Option<u32>) -> Self {
        self.slicing.max_generation = max_generation;
        self
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let p = &self.physics;
        positive("physics.gravity", p.gravity)?;
        finite("physics.spin_rate_deg", p.spin_rate_deg)?;
        finite("physics.floor_y", p.floor_y)?;
        finite("physics.player_plane_z", p.player_plane_z)?;
        for (name, limits) in [
            ("physics.default_limits", p.default_limits),
            ("physics.fragment_limits", p.fragment_limits),
        ] {
            positive(&format!("{name}.max_horizontal"), limits.max_horizontal)?;
            positive(&format!("{name}.max_vertical"), limits.max_vertical)?;
        }

        let s = &self.spawn;
        s.interval.check("spawn.interval")?;
        positive("spawn.interval.min", s.interval.min)?;
        s.flight_time.check("spawn.flight_time")?;
        positive("spawn.flight_time.min", s.flight_time.min)?;
        s.peak_height.check("spawn.peak_height")?;
        positive("spawn.peak_height.min", s.peak_height.min)?;
        s.x.check("spawn.x")?;
        s.y.check("spawn.y")?;
        finite("spawn.z", s.z)?;
        unit("spawn.target_height_fraction", s.target_height_fraction)?;
        if !(s.horizontal_jitter >= 0.0 && s.horizontal_jitter.is_finite()) {
            return Err(invalid("spawn.horizontal_jitter must be finite and non-negative"));
        }
        unit("spawn.hazard_chance", s.hazard_chance)?;

        let a = &self.play_area;
        positive("play_area.radius", a.radius)?;
        positive("play_area.height", a.height)?;
        if !a.center.is_finite() {
            return Err(invalid("play_area.center must be finite"));
        }
        unit("play_area.angular_range", a.angular_range)?;
        unit("play_area.vertical_range", a.vertical_range)?;
        if !(a.edge_margin >= 0.0 && a.edge_margin * 2.0 < a.height) {
            return Err(invalid("play_area.edge_margin must be in [0, height / 2)"));
        }

        positive("blade.radius", self.blade.radius)?;
        positive("blade.height", self.blade.height)?;

        let c = &self.slicing;
        if !(c.separation >= 0.0 && c.separation.is_finite()) {
            return Err(invalid("slicing.separation must be finite and non-negative"));
        }
        if !(c.fragment_scale > 0.0 && c.fragment_scale <= 1.0) {
            return Err(invalid("slicing.fragment_scale must be in (0, 1]"));
        }
        c.lateral_impulse.check("slicing.lateral_impulse")?;
        c.upward_impulse.check("slicing.upward_impulse")?;
        positive("slicing.normal_epsilon", c.normal_epsilon)?;
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> PhysicsError {
    PhysicsError::InvalidConfig(msg.into())
}

fn finite(name: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be finite")))
    }
}

fn positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be positive, got {value}")))
    }
}

fn unit(name: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be in [0, 1], got {value}")))
    }
}
