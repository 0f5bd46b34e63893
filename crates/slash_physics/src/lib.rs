//! Slash Physics - Projectiles, Blade and Slicing
//!
//! Kinematic simulation for a "slice the flying fruit" game. Nothing here
//! touches a graphics API: the world hands out poses and mesh buffers and a
//! renderer elsewhere draws them.
//!
//! # Features
//!
//! - Parabolic launches aimed at a play cylinder
//! - Explicit Euler integration with per-class velocity caps
//! - Sphere vs. blade-cylinder hit tests
//! - Two-fragment slicing with capped fragment meshes
//! - Optional cap on how often fragments may be re-cut
//! - Injectable randomness for deterministic tests
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                 ProjectileWorld                  │
//! │  ┌─────────────────┐  ┌────────────┐  ┌────────┐ │
//! │  │HandleMap<Body>  │  │ MeshCache  │  │EventHub│ │
//! │  └─────────────────┘  └────────────┘  └────────┘ │
//! │  ┌──────────────┐ ┌──────────────┐ ┌───────────┐ │
//! │  │Trajectory    │ │Collision     │ │Slicing    │ │
//! │  │Solver        │ │Detector      │ │Engine     │ │
//! │  └──────────────┘ └──────────────┘ └───────────┘ │
//! └──────────────────────────────────────────────────┘
//!          ▲                                 │
//!     HandFeed (any thread)         poses / meshes / events
//! ```
//!
//! # Example
//!
//! ```ignore
//! use slash_physics::prelude::*;
//!
//! let mut world = ProjectileWorld::new(SimulationConfig::default().with_seed(1))?;
//! let feed = world.hand_feed();
//! feed.publish(HandInput::Normalized(Vec2::new(0.5, 0.5)));
//!
//! world.advance(1.0 / 60.0)?;
//! for pose in world.poses() {
//!     // draw world.mesh(pose.handle) at pose.position
//! }
//! ```

pub mod blade;
pub mod body;
pub mod collision;
pub mod config;
pub mod error;
pub mod events;
pub mod random;
pub mod slicing;
pub mod trajectory;
pub mod world;

pub mod prelude {
    //! Common imports for the simulation
    pub use crate::blade::{map_normalized, BladeVolume, HandFeed, HandInput};
    pub use crate::body::{BodyHandle, Deactivation, FragmentInfo, PhysicsBody, BODY_RADIUS};
    pub use crate::collision::{intersects, CollisionDetector};
    pub use crate::config::{
        BladeConfig, PhysicsConfig, PlayAreaConfig, SimulationConfig, SliceConfig, SpawnConfig,
        ValueRange, VelocityLimits,
    };
    pub use crate::error::{PhysicsError, Result};
    pub use crate::events::{EventHub, GameEvent};
    pub use crate::random::{RandomSource, SeededRandom, SequenceRandom};
    pub use crate::slicing::{SlicingEngine, FALLBACK_NORMAL};
    pub use crate::trajectory::TrajectorySolver;
    pub use crate::world::{BodyPose, ProjectileWorld};
    pub use slash_math::{Vec2, Vec3};
    pub use slash_mesh::{FragmentSide, MeshBuffer, ObjectKind};
}

pub use prelude::*;
