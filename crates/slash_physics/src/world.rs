//! The projectile world
//!
//! Owns every body and its mesh, spawns new bodies on a randomized cadence,
//! integrates them, cuts whatever the blade touches and reports what happened
//! through [`GameEvent`]s.
//!
//! One [`ProjectileWorld::advance`] call is one tick:
//!
//! 1. take the newest hand estimate and move the blade
//! 2. spawn when the spawn timer runs out (while running)
//! 3. integrate every active body; a whole hazard reaching the player ends
//!    the game
//! 4. collect the bodies the blade touches, slice them into a pending buffer
//!    (while running)
//! 5. drop inactive bodies
//! 6. insert the pending fragments
//!
//! The body set is never mutated while it is being scanned.
//!
//! Hosts that poll call [`ProjectileWorld::drain_events`] each frame; once a
//! receiver from [`ProjectileWorld::subscribe`] exists, events go to the
//! channel instead. Queued mesh uploads only ever cover live bodies, so an
//! undrained queue stays as large as the scene at most.

use std::collections::HashMap;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use log::{debug, info, trace};
use slash_core::HandleMap;
use slash_math::{consts::TAU, Vec3};
use slash_mesh::{MeshBuffer, MeshCache, MeshCacheStats, ObjectKind};

use crate::blade::{BladeVolume, HandFeed, HandInput};
use crate::body::{BodyHandle, Deactivation, PhysicsBody};
use crate::collision::CollisionDetector;
use crate::config::SimulationConfig;
use crate::error::{PhysicsError, Result};
use crate::events::{EventHub, GameEvent};
use crate::random::{RandomSource, SeededRandom};
use crate::slicing::SlicingEngine;
use crate::trajectory::TrajectorySolver;

/// What a renderer needs to draw one body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    pub handle: BodyHandle,
    pub kind: ObjectKind,
    pub position: Vec3,
    /// Degrees around `rotation_axis`
    pub rotation_angle: f32,
    pub rotation_axis: Vec3,
    pub scale: f32,
    pub is_fragment: bool,
    /// Skin colour for whole bodies, flesh colour for fragments
    pub color: [f32; 4],
}

/// A slice waiting for its fragments to be inserted
struct PendingSlice {
    original: BodyHandle,
    kind: ObjectKind,
    generation: u32,
    whole: bool,
    parent_mesh: Arc<MeshBuffer>,
    fragments: [PhysicsBody; 2],
}

/// Root of the simulation
pub struct ProjectileWorld {
    config: SimulationConfig,
    bodies: HandleMap<PhysicsBody>,
    meshes: HashMap<BodyHandle, Arc<MeshBuffer>>,
    mesh_cache: MeshCache,
    pending: Vec<PendingSlice>,
    uploads: Vec<(BodyHandle, Arc<MeshBuffer>)>,
    events: EventHub,

    solver: TrajectorySolver,
    detector: CollisionDetector,
    slicer: SlicingEngine,
    blade: BladeVolume,
    hand: HandFeed,
    rng: Box<dyn RandomSource + Send>,

    spawn_timer: f32,
    next_spawn: f32,
    elapsed: f32,
    score: u32,
    running: bool,
    game_over: bool,
}

impl ProjectileWorld {
    /// Create a world; seeded from `config.seed` or from entropy
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_entropy(),
        };
        Self::with_random(config, Box::new(rng))
    }

    /// Create a world drawing from `rng`
    pub fn with_random(config: SimulationConfig, mut rng: Box<dyn RandomSource + Send>) -> Result<Self> {
        config.validate()?;

        let solver = TrajectorySolver::new(config.physics.gravity, config.spawn.horizontal_jitter);
        let detector = CollisionDetector::from_config(&config.slicing);
        let slicer = SlicingEngine::new(config.slicing.clone(), config.physics.fragment_limits);
        let blade = BladeVolume::new(&config.blade);
        let next_spawn = config.spawn.interval.sample(rng.as_mut());

        info!(
            "projectile world ready: gravity {}, spawn every {}-{} s, generation cap {:?}",
            config.physics.gravity, config.spawn.interval.min, config.spawn.interval.max,
            config.slicing.max_generation
        );

        Ok(Self {
            config,
            bodies: HandleMap::new(),
            meshes: HashMap::new(),
            mesh_cache: MeshCache::new(),
            pending: Vec::new(),
            uploads: Vec::new(),
            events: EventHub::new(),
            solver,
            detector,
            slicer,
            blade,
            hand: HandFeed::new(),
            rng,
            spawn_timer: 0.0,
            next_spawn,
            elapsed: 0.0,
            score: 0,
            running: true,
            game_over: false,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance the simulation by `dt` seconds
    pub fn advance(&mut self, dt: f32) -> Result<()> {
        debug_assert!(dt.is_finite() && dt >= 0.0, "bad timestep {dt}");
        self.elapsed += dt;

        if let Some((_, input)) = self.hand.take_latest() {
            self.blade.move_to(input.resolve(&self.config.play_area));
        }

        if self.running {
            self.spawn_timer += dt;
            if self.spawn_timer >= self.next_spawn {
                self.spawn_timer = 0.0;
                self.next_spawn = self.config.spawn.interval.sample(self.rng.as_mut());
                self.spawn_random()?;
            }
        }

        let mut hazard = None;
        for (handle, body) in self.bodies.iter_mut() {
            match body.tick(dt, &self.config.physics) {
                Some(Deactivation::PastPlayer) if body.kind.is_hazard() && !body.is_fragment() => {
                    hazard = Some(body.kind);
                }
                Some(reason) => trace!("{handle} deactivated: {reason:?}"),
                None => {}
            }
        }
        if let Some(kind) = hazard {
            self.end_game(kind);
        }

        if self.running && self.blade.is_present() {
            let hits: Vec<BodyHandle> = self
                .bodies
                .iter()
                .filter(|(_, body)| self.detector.test(body, &self.blade))
                .map(|(handle, _)| handle)
                .collect();
            for handle in hits {
                self.begin_slice(handle, None)?;
            }
        }

        let removed = self.bodies.retain(|_, body| body.is_active());
        if !removed.is_empty() {
            self.forget(&removed);
            trace!("removed {} bodies", removed.len());
        }

        self.merge_pending()?;
        Ok(())
    }

    /// Raise game over once
    ///
    /// Only a running world can end: after [`ProjectileWorld::stop`] a whole
    /// hazard still leaves the scene through the player plane, but no
    /// `GameOver` is raised for it.
    fn end_game(&mut self, kind: ObjectKind) {
        if self.game_over || !self.running {
            return;
        }
        self.game_over = true;
        self.running = false;
        info!("game over: {} reached the player, final score {}", kind, self.score);
        self.events.emit(GameEvent::GameOver { score: self.score, kind });
    }

    // ========================================================================
    // Spawning
    // ========================================================================

    fn spawn_random(&mut self) -> Result<BodyHandle> {
        let kind = if self.rng.chance(self.config.spawn.hazard_chance) {
            ObjectKind::Bomb
        } else {
            let fruits = ObjectKind::FRUITS;
            fruits[self.rng.range_i32(0, fruits.len() as i32) as usize]
        };
        self.spawn(kind)
    }

    /// Launch a `kind` body on a random arc into the play area
    pub fn spawn(&mut self, kind: ObjectKind) -> Result<BodyHandle> {
        let spawn = &self.config.spawn;
        let rng = self.rng.as_mut();

        let origin = Vec3::new(spawn.x.sample(rng), spawn.y.sample(rng), spawn.z);

        let cylinder = self.config.play_area.cylinder();
        let reach = cylinder.half_height() * spawn.target_height_fraction;
        let target = cylinder.surface_point(rng.range_f32(0.0, TAU), rng.range_f32(-reach, reach));

        // Pick a consistent (time, height) pair so the arc lands on target
        let peak = spawn.peak_height.sample(rng);
        let flight_time = spawn.flight_time.clamp(self.solver.flight_time_for_peak(peak));
        let peak = self.solver.peak_for_flight_time(flight_time);

        let velocity = self.solver.plan(origin, target, flight_time, peak, rng);
        let body = PhysicsBody::new(kind, origin, velocity, rng.unit_vector());
        self.spawn_body(body)
    }

    /// Insert a prepared body
    ///
    /// Its velocity is clamped on the way in. Fragments get the whole mesh
    /// of their kind cut by their own plane.
    pub fn spawn_body(&mut self, mut body: PhysicsBody) -> Result<BodyHandle> {
        body.clamp_velocity(&self.config.physics);
        let whole = self.mesh_cache.whole(body.kind)?;
        let mesh = self.slicer.fragment_mesh(&mut self.mesh_cache, &whole, &mut body)?;

        let kind = body.kind;
        debug!("spawned {} at {:?} moving {:?}", kind, body.position, body.velocity);
        let handle = self.bodies.insert(body);
        self.meshes.insert(handle, Arc::clone(&mesh));
        self.uploads.push((handle, mesh));
        self.events.emit(GameEvent::Spawned { handle, kind });
        Ok(handle)
    }

    // ========================================================================
    // Slicing
    // ========================================================================

    /// Slice `handle` along a random plane right away
    ///
    /// Returns the fragment handles, positive side first.
    pub fn slice(&mut self, handle: BodyHandle) -> Result<[BodyHandle; 2]> {
        self.force_slice(handle, None)
    }

    /// Slice `handle` along a plane with the given normal right away
    pub fn slice_with_normal(&mut self, handle: BodyHandle, normal: Vec3) -> Result<[BodyHandle; 2]> {
        self.force_slice(handle, Some(normal))
    }

    fn force_slice(&mut self, handle: BodyHandle, normal: Option<Vec3>) -> Result<[BodyHandle; 2]> {
        self.begin_slice(handle, normal)?;
        self.bodies.remove(handle);
        self.forget(&[handle]);
        let merged = self.merge_pending()?;
        merged.last().copied().ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Cut a body and queue its fragments; the original is left inactive
    fn begin_slice(&mut self, handle: BodyHandle, normal: Option<Vec3>) -> Result<()> {
        let body = self.bodies.get_mut(handle).ok_or(PhysicsError::BodyNotFound(handle))?;
        let rng = self.rng.as_mut();
        let fragments = match normal {
            Some(n) => self.slicer.slice_with_normal(body, n, rng),
            None => self.slicer.slice(body, rng),
        }
        .ok_or(PhysicsError::BodyInactive(handle))?;

        let (kind, generation, whole) = (body.kind, body.generation, !body.is_fragment());
        let parent_mesh = match self.meshes.get(&handle) {
            Some(mesh) => Arc::clone(mesh),
            None => self.mesh_cache.whole(kind)?,
        };
        self.pending.push(PendingSlice {
            original: handle,
            kind,
            generation,
            whole,
            parent_mesh,
            fragments,
        });
        Ok(())
    }

    fn merge_pending(&mut self) -> Result<Vec<[BodyHandle; 2]>> {
        let mut merged = Vec::with_capacity(self.pending.len());
        for slice in std::mem::take(&mut self.pending) {
            let PendingSlice { original, kind, generation, whole, parent_mesh, fragments } = slice;

            let mut handles = [BodyHandle::null(); 2];
            for (slot, mut fragment) in handles.iter_mut().zip(fragments) {
                let mesh = self.slicer.fragment_mesh(&mut self.mesh_cache, &parent_mesh, &mut fragment)?;
                let handle = self.bodies.insert(fragment);
                self.meshes.insert(handle, Arc::clone(&mesh));
                self.uploads.push((handle, mesh));
                *slot = handle;
            }

            debug!("{original} ({kind}, gen {generation}) -> {} + {}", handles[0], handles[1]);
            self.events.emit(GameEvent::Sliced { original, fragments: handles, kind, generation });
            if whole {
                self.score += 1;
                info!("sliced {kind}, score {}", self.score);
                self.events.emit(GameEvent::ScoreIncreased { score: self.score });
            }
            merged.push(handles);
        }
        Ok(merged)
    }

    /// Drop the meshes and queued uploads of bodies that are gone
    fn forget(&mut self, handles: &[BodyHandle]) {
        for handle in handles {
            self.meshes.remove(handle);
        }
        self.uploads.retain(|(handle, _)| !handles.contains(handle));
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Stop spawning and cutting; airborne bodies keep falling
    pub fn stop(&mut self) {
        if self.running {
            debug!("world stopped at {:.2}s", self.elapsed);
        }
        self.running = false;
    }

    /// Clear every body and re-arm
    ///
    /// The blade is cleared too, along with any hand estimate not taken yet.
    pub fn reset(&mut self) {
        self.hand.take_latest();
        self.blade.clear();
        self.bodies.clear();
        self.meshes.clear();
        self.pending.clear();
        self.uploads.clear();
        self.events.clear();
        self.spawn_timer = 0.0;
        self.next_spawn = self.config.spawn.interval.sample(self.rng.as_mut());
        self.elapsed = 0.0;
        self.score = 0;
        self.game_over = false;
        self.running = true;
        info!("world reset");
    }

    // ========================================================================
    // Hand input
    // ========================================================================

    /// Shared feed for a tracking thread to publish into
    pub fn hand_feed(&self) -> HandFeed {
        self.hand.clone()
    }

    /// Publish a hand estimate from the simulation thread
    pub fn set_hand(&self, input: HandInput) {
        self.hand.publish(input);
    }

    pub fn blade(&self) -> &BladeVolume {
        &self.blade
    }

    // ========================================================================
    // Render / present
    // ========================================================================

    /// Transforms of every active body
    pub fn poses(&self) -> impl Iterator<Item = BodyPose> + '_ {
        self.bodies
            .iter()
            .filter(|(_, body)| body.is_active())
            .map(|(handle, body)| BodyPose {
                handle,
                kind: body.kind,
                position: body.position,
                rotation_angle: body.rotation_angle,
                rotation_axis: body.rotation_axis,
                scale: body.scale,
                is_fragment: body.is_fragment(),
                color: if body.is_fragment() {
                    body.kind.flesh_color()
                } else {
                    body.kind.skin_color()
                },
            })
    }

    /// Current mesh of a live body
    pub fn mesh(&self, handle: BodyHandle) -> Option<Arc<MeshBuffer>> {
        self.meshes.get(&handle).cloned()
    }

    /// Meshes of bodies inserted since the last call and still alive
    pub fn drain_mesh_uploads(&mut self) -> Vec<(BodyHandle, Arc<MeshBuffer>)> {
        std::mem::take(&mut self.uploads)
    }

    pub fn mesh_cache_stats(&self) -> MeshCacheStats {
        self.mesh_cache.stats()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn body(&self, handle: BodyHandle) -> Option<&PhysicsBody> {
        self.bodies.get(handle)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &PhysicsBody)> {
        self.bodies.iter()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn active_count(&self) -> usize {
        self.bodies.iter().filter(|(_, body)| body.is_active()).count()
    }

    /// Fragments waiting to be inserted; zero between ticks
    pub fn pending_count(&self) -> usize {
        self.pending.len() * 2
    }

    /// Seconds simulated since creation or the last reset
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Events raised since the last call while nobody was subscribed
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    /// Receiver for every future event
    ///
    /// While any receiver is alive, events are no longer buffered for
    /// [`ProjectileWorld::drain_events`].
    pub fn subscribe(&mut self) -> Receiver<GameEvent> {
        let rx = self.events.subscribe();
        debug!("event subscriber added ({} live)", self.events.subscriber_count());
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::FragmentInfo;
    use slash_mesh::{FragmentSide, MeshBuilder, VertexLayout};

    const DT: f32 = 1.0 / 60.0;

    /// World that never spawns on its own
    fn quiet_world() -> ProjectileWorld {
        let config = SimulationConfig::default()
            .with_seed(17)
            .with_spawn_interval(1000.0, 1000.0);
        ProjectileWorld::new(config).unwrap()
    }

    fn still(kind: ObjectKind, position: Vec3) -> PhysicsBody {
        PhysicsBody::new(kind, position, Vec3::ZERO, Vec3::Y)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SimulationConfig::default().with_gravity(-1.0);
        assert!(matches!(ProjectileWorld::new(config), Err(PhysicsError::InvalidConfig(_))));
    }

    #[test]
    fn test_spawns_on_interval() {
        let config = SimulationConfig::default().with_seed(3).with_spawn_interval(0.5, 0.5);
        let mut world = ProjectileWorld::new(config).unwrap();

        world.advance(0.25).unwrap();
        assert_eq!(world.active_count(), 0);
        world.advance(0.25).unwrap();
        assert_eq!(world.active_count(), 1);

        let events = world.drain_events();
        assert!(matches!(events[0], GameEvent::Spawned { .. }));
        let uploads = world.drain_mesh_uploads();
        assert_eq!(uploads.len(), 1);
        assert!(world.mesh(uploads[0].0).is_some());
    }

    #[test]
    fn test_spawned_velocity_within_limits() {
        let mut world = quiet_world();
        let limits = world.config().physics.default_limits;
        for _ in 0..50 {
            let handle = world.spawn(ObjectKind::Apple).unwrap();
            assert!(limits.allows(world.body(handle).unwrap().velocity));
        }
    }

    #[test]
    fn test_blade_slices_whole_body_and_scores() {
        let mut world = quiet_world();
        let original = world.spawn_body(still(ObjectKind::Apple, Vec3::ZERO)).unwrap();
        world.set_hand(HandInput::World(Vec3::ZERO));
        world.drain_events();

        world.advance(DT).unwrap();

        assert!(world.body(original).is_none());
        assert!(world.mesh(original).is_none());
        assert_eq!(world.active_count(), 2);
        assert_eq!(world.pending_count(), 0);
        assert_eq!(world.score(), 1);

        let events = world.drain_events();
        assert!(matches!(
            events[0],
            GameEvent::Sliced { original: o, generation: 0, kind: ObjectKind::Apple, .. } if o == original
        ));
        assert_eq!(events[1], GameEvent::ScoreIncreased { score: 1 });

        for (_, body) in world.bodies() {
            assert!(body.is_fragment());
            assert_eq!(body.generation, 1);
        }
    }

    #[test]
    fn test_fragments_do_not_rescore_and_respect_cap() {
        let mut world = quiet_world();
        world.spawn_body(still(ObjectKind::Orange, Vec3::ZERO)).unwrap();
        world.set_hand(HandInput::World(Vec3::ZERO));

        for _ in 0..6 {
            world.advance(DT).unwrap();
        }
        assert_eq!(world.score(), 1);

        let cap = world.config().slicing.max_generation.unwrap();
        let events = world.drain_events();
        for event in &events {
            if let GameEvent::Sliced { generation, .. } = event {
                assert!(*generation < cap);
            }
        }
        for (_, body) in world.bodies() {
            assert!(body.generation <= cap);
        }
    }

    #[test]
    fn test_whole_hazard_ends_game_once() {
        let mut world = quiet_world();
        let bomb = PhysicsBody::new(ObjectKind::Bomb, Vec3::new(0.0, 0.0, 4.99), Vec3::new(0.0, 0.0, 6.0), Vec3::Y);
        world.spawn_body(bomb).unwrap();
        world.drain_events();

        world.advance(0.1).unwrap();
        assert!(world.is_game_over());
        assert!(!world.is_running());
        assert_eq!(world.active_count(), 0);

        world.spawn_body(PhysicsBody::new(
            ObjectKind::Bomb,
            Vec3::new(0.0, 0.0, 4.99),
            Vec3::new(0.0, 0.0, 6.0),
            Vec3::Y,
        ))
        .unwrap();
        world.advance(0.1).unwrap();

        let overs = world.drain_events().iter().filter(|e| e.is_game_over()).count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_stopped_world_cannot_end() {
        let mut world = quiet_world();
        let bomb = PhysicsBody::new(ObjectKind::Bomb, Vec3::new(0.0, 0.0, 4.99), Vec3::new(0.0, 0.0, 6.0), Vec3::Y);
        world.spawn_body(bomb).unwrap();
        world.stop();

        world.advance(0.1).unwrap();
        assert_eq!(world.active_count(), 0);
        assert!(!world.is_game_over());
        assert!(!world.drain_events().iter().any(GameEvent::is_game_over));
    }

    #[test]
    fn test_fruit_and_hazard_fragment_do_not_end_game() {
        let mut world = quiet_world();
        world
            .spawn_body(PhysicsBody::new(ObjectKind::Apple, Vec3::new(0.0, 0.0, 4.99), Vec3::new(0.0, 0.0, 6.0), Vec3::Y))
            .unwrap();
        let mut half = PhysicsBody::new(ObjectKind::Bomb, Vec3::new(1.0, 0.0, 4.99), Vec3::new(0.0, 0.0, 6.0), Vec3::Y);
        half.fragment = Some(FragmentInfo { side: FragmentSide::Positive, slice_normal: Vec3::X });
        world.spawn_body(half).unwrap();

        world.advance(0.1).unwrap();
        assert!(!world.is_game_over());
        assert!(world.is_running());
        assert_eq!(world.active_count(), 0);
    }

    #[test]
    fn test_stop_freezes_spawning_not_falling() {
        let config = SimulationConfig::default().with_seed(5).with_spawn_interval(0.1, 0.1);
        let mut world = ProjectileWorld::new(config).unwrap();
        let handle = world.spawn_body(still(ObjectKind::Banana, Vec3::ZERO)).unwrap();
        world.set_hand(HandInput::World(Vec3::new(0.0, 100.0, 0.0)));
        world.stop();

        for _ in 0..30 {
            world.advance(DT).unwrap();
        }
        assert_eq!(world.active_count(), 1);
        assert!(world.body(handle).unwrap().position.y < 0.0);
    }

    #[test]
    fn test_stopped_world_does_not_cut() {
        let mut world = quiet_world();
        world.spawn_body(still(ObjectKind::Apple, Vec3::ZERO)).unwrap();
        world.set_hand(HandInput::World(Vec3::ZERO));
        world.stop();
        world.advance(DT).unwrap();
        assert_eq!(world.active_count(), 1);
        assert_eq!(world.score(), 0);
    }

    #[test]
    fn test_forced_slice() {
        let mut world = quiet_world();
        let handle = world.spawn_body(still(ObjectKind::Pineapple, Vec3::ZERO)).unwrap();

        let [a, b] = world.slice_with_normal(handle, Vec3::X).unwrap();
        assert!(world.body(handle).is_none());
        assert!((world.body(a).unwrap().position.x - 0.1).abs() < 1e-5);
        assert!((world.body(b).unwrap().position.x + 0.1).abs() < 1e-5);
        assert!(world.mesh(a).is_some() && world.mesh(b).is_some());
        assert_eq!(world.score(), 1);

        assert!(matches!(world.slice(handle), Err(PhysicsError::BodyNotFound(_))));
    }

    #[test]
    fn test_slicing_inactive_body_is_rejected() {
        let mut world = quiet_world();
        let mut body = still(ObjectKind::Apple, Vec3::ZERO);
        body.deactivate();
        let handle = world.spawn_body(body).unwrap();
        assert!(matches!(world.slice(handle), Err(PhysicsError::BodyInactive(h)) if h == handle));
    }

    #[test]
    fn test_reset_rearms() {
        let mut world = quiet_world();
        let bomb = PhysicsBody::new(ObjectKind::Bomb, Vec3::new(0.0, 0.0, 4.99), Vec3::new(0.0, 0.0, 6.0), Vec3::Y);
        world.spawn_body(bomb).unwrap();
        world.spawn_body(still(ObjectKind::Apple, Vec3::ZERO)).unwrap();
        world.advance(0.1).unwrap();
        assert!(world.is_game_over());

        world.reset();
        assert!(world.is_running());
        assert!(!world.is_game_over());
        assert_eq!(world.active_count(), 0);
        assert_eq!(world.score(), 0);
        assert_eq!(world.elapsed(), 0.0);
        assert!(world.drain_events().is_empty());
        assert!(world.drain_mesh_uploads().is_empty());
    }

    #[test]
    fn test_reset_forgets_hand() {
        let mut world = quiet_world();
        world.set_hand(HandInput::World(Vec3::ZERO));
        world.advance(DT).unwrap();
        assert!(world.blade().is_present());

        // Published before the reset, never taken
        world.set_hand(HandInput::World(Vec3::ZERO));
        world.reset();
        world.spawn_body(still(ObjectKind::Apple, Vec3::ZERO)).unwrap();
        world.advance(DT).unwrap();

        assert!(!world.blade().is_present());
        assert_eq!(world.score(), 0);
        assert_eq!(world.active_count(), 1);
    }

    #[test]
    fn test_subscriber_sees_events() {
        let mut world = quiet_world();
        let rx = world.subscribe();
        world.spawn(ObjectKind::Strawberry).unwrap();
        assert!(matches!(rx.try_recv().unwrap(), GameEvent::Spawned { kind: ObjectKind::Strawberry, .. }));
        assert!(world.drain_events().is_empty());

        drop(rx);
        world.spawn(ObjectKind::Orange).unwrap();
        assert_eq!(world.drain_events().len(), 1);
    }

    #[test]
    fn test_uploads_only_cover_live_bodies() {
        let mut world = quiet_world();
        world.spawn_body(still(ObjectKind::Apple, Vec3::new(0.0, -10.5, 0.0))).unwrap();
        let kept = world.spawn_body(still(ObjectKind::Orange, Vec3::ZERO)).unwrap();
        let [a, b] = world.slice(kept).unwrap();

        // Below the floor; gone after one tick
        world.advance(DT).unwrap();
        let mut uploaded: Vec<_> = world.drain_mesh_uploads().into_iter().map(|(h, _)| h).collect();
        uploaded.sort_by_key(|h| h.index());
        let mut expected = vec![a, b];
        expected.sort_by_key(|h| h.index());
        assert_eq!(uploaded, expected);
    }

    #[test]
    fn test_empty_fragment_drops_without_colliding() {
        let mut world = quiet_world();
        let handle = world.spawn_body(still(ObjectKind::Apple, Vec3::ZERO)).unwrap();

        // Parent geometry lies entirely on the +X side of the cut
        let mut builder = MeshBuilder::new(VertexLayout::PositionNormalUv);
        let p = builder.vertex(Vec3::new(0.3, 0.0, 0.0), Vec3::Y, [0.0, 0.0]);
        let q = builder.vertex(Vec3::new(0.4, 0.0, 0.1), Vec3::Y, [1.0, 0.0]);
        let r = builder.vertex(Vec3::new(0.4, 0.0, -0.1), Vec3::Y, [0.0, 1.0]);
        builder.triangle(p, q, r);
        world.meshes.insert(handle, Arc::new(builder.build()));

        let [kept, empty] = world.slice_with_normal(handle, Vec3::X).unwrap();
        assert!(!world.mesh(kept).unwrap().is_empty());
        assert!(world.mesh(empty).unwrap().is_empty());
        assert!(world.body(empty).unwrap().is_inert());
        assert_eq!(world.score(), 1);
        world.drain_events();

        // Both halves sit inside the blade's reach
        world.set_hand(HandInput::World(Vec3::ZERO));
        world.advance(DT).unwrap();

        assert!(world.body(empty).is_none());
        assert!(world.mesh(empty).is_none());
        let cut: Vec<BodyHandle> = world
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                GameEvent::Sliced { original, .. } => Some(original),
                _ => None,
            })
            .collect();
        assert_eq!(cut, vec![kept]);
        assert_eq!(world.score(), 1);
    }

    #[test]
    fn test_poses_follow_bodies() {
        let mut world = quiet_world();
        let handle = world.spawn_body(still(ObjectKind::Apple, Vec3::new(1.0, 2.0, 3.0))).unwrap();
        let poses: Vec<_> = world.poses().collect();
        assert_eq!(poses.len(), 1);
        assert_eq!(poses[0].handle, handle);
        assert_eq!(poses[0].position, Vec3::new(1.0, 2.0, 3.0));
        assert!(!poses[0].is_fragment);
        assert_eq!(poses[0].color, ObjectKind::Apple.skin_color());

        let [half, _] = world.slice(handle).unwrap();
        let pose = world.poses().find(|p| p.handle == half).unwrap();
        assert_eq!(pose.color, ObjectKind::Apple.flesh_color());
    }
}
