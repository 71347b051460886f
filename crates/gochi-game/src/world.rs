use std::f32::consts::TAU;

use glam::Vec3;
use gochi_geometry::{BufferError, Object, Rgb, SlotId, VertexBuffer};
use rand::Rng;

use crate::config::GameConfig;

/// A moving object and the buffer slot holding its vertices.
#[derive(Debug, Clone)]
pub struct Body {
    pub object: Object,
    /// Units per second.
    pub velocity: Vec3,
    pub slot: SlotId,
}

impl Body {
    pub fn center(&self) -> Vec3 {
        self.object.center()
    }
}

/// Explosion fragment; falls under gravity until it expires.
#[derive(Debug, Clone)]
pub struct Shard {
    pub body: Body,
    pub age: f32,
}

/// What the player asked for this frame.
#[derive(Debug, Copy, Clone, Default)]
pub struct FireCommand {
    pub fire: bool,
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Counts of what happened during one [`World::step`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    pub culled: usize,
    pub spawned: bool,
    pub fired: bool,
    pub hits: usize,
    pub expired_shards: usize,
}

/// True when the bounding spheres of `a` and `b` touch.
pub fn is_close(a: &Object, b: &Object) -> bool {
    a.center().distance(b.center()) <= a.bounding_radius() + b.bounding_radius()
}

/// Game state: the floor, fireballs, targets and shards, mirrored into one
/// [`VertexBuffer`].
///
/// Every live object owns exactly one buffer slot, so the buffer's vertex
/// count always equals the floor plus all live objects.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    buffer: VertexBuffer,
    floor: Object,
    fireballs: Vec<Body>,
    targets: Vec<Body>,
    shards: Vec<Shard>,
    score: u32,
    cooldown: f32,
}

impl World {
    pub fn new(config: GameConfig) -> Self {
        let floor = Object::floor(config.floor_half_extent, config.floor_color);
        let mut buffer = VertexBuffer::with_capacity(256);
        buffer.add(&floor);

        Self {
            config,
            buffer,
            floor,
            fireballs: Vec::new(),
            targets: Vec::new(),
            shards: Vec::new(),
            score: 0,
            cooldown: 0.0,
        }
    }

    /// Drops every object and the score; the buffer holds only the floor.
    pub fn reset(&mut self) {
        self.fireballs.clear();
        self.targets.clear();
        self.shards.clear();
        self.score = 0;
        self.cooldown = 0.0;
        self.buffer.rebuild(std::iter::once(&self.floor));
        log::info!("world reset");
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn buffer(&self) -> &VertexBuffer {
        &self.buffer
    }

    /// Reports whether the buffer changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        self.buffer.take_dirty()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn fireballs(&self) -> &[Body] {
        &self.fireballs
    }

    pub fn targets(&self) -> &[Body] {
        &self.targets
    }

    pub fn shards(&self) -> &[Shard] {
        &self.shards
    }

    /// Advances the world by `dt` seconds.
    pub fn step<R: Rng>(
        &mut self,
        dt: f32,
        rng: &mut R,
        commands: FireCommand,
    ) -> Result<StepReport, BufferError> {
        let mut report = StepReport::default();

        report.culled = self.advance_bodies(dt)?;

        let p = spawn_probability(self.config.spawn_rate, dt);
        if p > 0.0 && rng.gen_bool(p) {
            report.spawned = self.spawn_random_target(rng).is_some();
        }

        self.cooldown = (self.cooldown - dt).max(0.0);
        if commands.fire && self.cooldown <= 0.0 {
            if self.spawn_fireball(commands.origin, commands.direction).is_some() {
                self.cooldown = self.config.fire_cooldown;
                report.fired = true;
            }
        }

        report.hits = self.resolve_collisions(rng)?;
        report.expired_shards = self.advance_shards(dt)?;

        Ok(report)
    }

    /// Adds a target cube at `center`. Returns `None` at the target cap.
    pub fn spawn_target(&mut self, center: Vec3, velocity: Vec3, color: Rgb) -> Option<SlotId> {
        if self.targets.len() >= self.config.max_targets {
            return None;
        }
        let object = Object::target(center, self.config.target_size, color);
        let slot = self.buffer.add(&object);
        self.targets.push(Body { object, velocity, slot });
        log::debug!("target {slot} spawned at {center}");
        Some(slot)
    }

    /// Launches a fireball from `origin` along `direction`.
    ///
    /// Returns `None` at the fireball cap or for a zero direction.
    pub fn spawn_fireball(&mut self, origin: Vec3, direction: Vec3) -> Option<SlotId> {
        if self.fireballs.len() >= self.config.max_fireballs {
            return None;
        }
        let dir = direction.try_normalize()?;

        let c = &self.config;
        let object = Object::fireball(
            origin,
            c.fireball_radius,
            c.fireball_stacks,
            c.fireball_sectors,
            c.fireball_color,
        );
        let velocity = dir * c.fireball_speed;
        let slot = self.buffer.add(&object);
        self.fireballs.push(Body { object, velocity, slot });
        log::debug!("fireball {slot} launched");
        Some(slot)
    }

    fn spawn_random_target<R: Rng>(&mut self, rng: &mut R) -> Option<SlotId> {
        let c = &self.config;
        let angle = rng.gen_range(0.0..TAU);
        let (lo, hi) = c.spawn_height;
        let height = if hi > lo { rng.gen_range(lo..hi) } else { lo };
        let start = Vec3::new(c.spawn_radius * angle.cos(), height, c.spawn_radius * angle.sin());

        // Aim somewhere over the floor so the target crosses the arena.
        let reach = c.floor_half_extent * 0.5;
        let mut offset = || if reach > 0.0 { rng.gen_range(-reach..=reach) } else { 0.0 };
        let aim = Vec3::new(offset(), height, offset());
        let heading = (aim - start).try_normalize().unwrap_or(-start.normalize_or_zero());

        let speed = if c.target_speed_max > c.target_speed_min {
            rng.gen_range(c.target_speed_min..c.target_speed_max)
        } else {
            c.target_speed_min
        };

        let color = if c.target_colors.is_empty() {
            Rgb::new(1.0, 1.0, 1.0)
        } else {
            c.target_colors[rng.gen_range(0..c.target_colors.len())]
        };

        self.spawn_target(start, heading * speed, color)
    }

    /// Moves fireballs and targets, removing those beyond `max_distance`.
    fn advance_bodies(&mut self, dt: f32) -> Result<usize, BufferError> {
        let max = self.config.max_distance;
        let mut culled = 0;

        for bodies in [&mut self.fireballs, &mut self.targets] {
            for body in bodies.iter_mut() {
                let shift = body.velocity * dt;
                body.object.translate(shift);
                self.buffer.translate(body.slot, shift)?;
            }

            let far: Vec<bool> = bodies.iter().map(|b| b.center().length() > max).collect();
            for body in split_off_flagged(bodies, &far) {
                self.buffer.remove(body.slot)?;
                culled += 1;
            }
        }

        if culled > 0 {
            log::trace!("culled {culled} objects beyond {max}");
        }
        Ok(culled)
    }

    /// Pairs each fireball with the first untouched target it overlaps.
    fn resolve_collisions<R: Rng>(&mut self, rng: &mut R) -> Result<usize, BufferError> {
        let mut fireball_hit = vec![false; self.fireballs.len()];
        let mut target_hit = vec![false; self.targets.len()];
        let mut blasts = Vec::new();

        for (fi, fireball) in self.fireballs.iter().enumerate() {
            let found = self
                .targets
                .iter()
                .enumerate()
                .find(|(ti, t)| !target_hit[*ti] && is_close(&fireball.object, &t.object));

            if let Some((ti, target)) = found {
                fireball_hit[fi] = true;
                target_hit[ti] = true;
                let midpoint = (fireball.center() + target.center()) * 0.5;
                blasts.push((midpoint, fireball.object.color(), target.object.color()));
            }
        }

        if blasts.is_empty() {
            return Ok(0);
        }

        for body in split_off_flagged(&mut self.fireballs, &fireball_hit)
            .into_iter()
            .chain(split_off_flagged(&mut self.targets, &target_hit))
        {
            self.buffer.remove(body.slot)?;
        }

        for &(at, a, b) in &blasts {
            self.score += 1;
            log::info!("target hit at {at}; score {}", self.score);
            self.make_explosion(at, [a, b], rng);
        }

        Ok(blasts.len())
    }

    fn make_explosion<R: Rng>(&mut self, at: Vec3, colors: [Rgb; 2], rng: &mut R) {
        let c = &self.config;
        let (count, size, speed) = (c.shard_count, c.shard_size, c.shard_speed);

        for i in 0..count {
            let spread = Vec3::new(
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(0.2..=1.0),
                rng.gen_range(-1.0..=1.0),
            );
            let velocity = spread.normalize_or_zero() * speed;
            let object = Object::shard(at, size, colors[i % 2]);
            let slot = self.buffer.add(&object);
            self.shards.push(Shard {
                body: Body { object, velocity, slot },
                age: 0.0,
            });
        }
    }

    /// Ages and drops shards; removes expired or sunk ones.
    fn advance_shards(&mut self, dt: f32) -> Result<usize, BufferError> {
        let gravity = Vec3::new(0.0, -self.config.gravity, 0.0);
        let lifetime = self.config.shard_lifetime;

        for shard in &mut self.shards {
            shard.age += dt;
            shard.body.velocity += gravity * dt;
            let shift = shard.body.velocity * dt;
            shard.body.object.translate(shift);
            self.buffer.translate(shard.body.slot, shift)?;
        }

        let expired: Vec<bool> = self
            .shards
            .iter()
            .map(|s| s.age >= lifetime || s.body.center().y < 0.0)
            .collect();

        let mut count = 0;
        for shard in split_off_flagged(&mut self.shards, &expired) {
            self.buffer.remove(shard.body.slot)?;
            count += 1;
        }
        Ok(count)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

/// Probability of at least one event of a Poisson process with `rate` in `dt`.
fn spawn_probability(rate: f32, dt: f32) -> f64 {
    if rate <= 0.0 || dt <= 0.0 {
        return 0.0;
    }
    (1.0 - (-(rate as f64) * dt as f64).exp()).clamp(0.0, 1.0)
}

/// Moves the items whose flag is set out of `items`, keeping order on both sides.
fn split_off_flagged<T>(items: &mut Vec<T>, flags: &[bool]) -> Vec<T> {
    let mut kept = Vec::with_capacity(items.len());
    let mut removed = Vec::new();
    for (item, &flag) in items.drain(..).zip(flags.iter().chain(std::iter::repeat(&false))) {
        if flag {
            removed.push(item);
        } else {
            kept.push(item);
        }
    }
    *items = kept;
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn quiet_config() -> GameConfig {
        GameConfig { spawn_rate: 0.0, ..GameConfig::default() }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn expected_vertices(world: &World) -> usize {
        world.floor.vertex_count()
            + world.fireballs.iter().map(|b| b.object.vertex_count()).sum::<usize>()
            + world.targets.iter().map(|b| b.object.vertex_count()).sum::<usize>()
            + world.shards.iter().map(|s| s.body.object.vertex_count()).sum::<usize>()
    }

    const IDLE: FireCommand = FireCommand {
        fire: false,
        origin: Vec3::ZERO,
        direction: Vec3::ZERO,
    };

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn new_world_holds_only_the_floor() {
        let world = World::new(quiet_config());
        assert_eq!(world.buffer().vertex_count(), 6);
        assert_eq!(world.buffer().slot_count(), 1);
        assert_eq!(world.score(), 0);
    }

    // ── movement and culling ──────────────────────────────────────────────

    #[test]
    fn targets_move_with_their_velocity() {
        let mut world = World::new(quiet_config());
        world.spawn_target(Vec3::new(0.0, 1.0, 0.0), Vec3::new(2.0, 0.0, 0.0), Rgb::new(0.0, 1.0, 0.0));
        world.step(0.5, &mut rng(), IDLE).unwrap();

        let c = world.targets()[0].center();
        assert!((c - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-4);

        let range = world.buffer().range(world.targets()[0].slot).unwrap();
        let first = Vec3::from_array(world.buffer().positions()[range.start]);
        assert_eq!(first, world.targets()[0].object.triangles()[0].vertices[0]);
    }

    #[test]
    fn objects_beyond_max_distance_are_culled() {
        let mut world = World::new(quiet_config());
        let max = world.config().max_distance;
        world.spawn_target(Vec3::new(max - 0.1, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Rgb::new(1.0, 1.0, 1.0));
        world.spawn_target(Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO, Rgb::new(1.0, 1.0, 1.0));

        let report = world.step(1.0, &mut rng(), IDLE).unwrap();
        assert_eq!(report.culled, 1);
        assert_eq!(world.targets().len(), 1);
        assert_eq!(world.buffer().vertex_count(), expected_vertices(&world));
    }

    // ── spawning ──────────────────────────────────────────────────────────

    #[test]
    fn spawn_probability_grows_with_dt() {
        assert_eq!(spawn_probability(0.0, 1.0), 0.0);
        let small = spawn_probability(1.0, 0.01);
        let large = spawn_probability(1.0, 1.0);
        assert!(small > 0.0 && small < large && large < 1.0);
    }

    #[test]
    fn random_targets_appear_on_the_ring_and_head_inward() {
        let mut world = World::new(GameConfig { spawn_rate: 1.0e6, ..GameConfig::default() });
        let report = world.step(1.0, &mut rng(), IDLE).unwrap();
        assert!(report.spawned);

        let t = &world.targets()[0];
        let c = t.center();
        let r = world.config().spawn_radius;
        assert!((Vec3::new(c.x, 0.0, c.z).length() - r).abs() < 1e-3);
        assert!(t.velocity.y.abs() < 1e-6);
        assert!(t.velocity.dot(-c) > 0.0);

        let speed = t.velocity.length();
        assert!(speed >= world.config().target_speed_min && speed <= world.config().target_speed_max);
    }

    #[test]
    fn degenerate_floor_aims_at_the_center() {
        for half_extent in [0.0, -5.0] {
            let mut world = World::new(GameConfig {
                spawn_rate: 1.0e6,
                floor_half_extent: half_extent,
                ..GameConfig::default()
            });
            let report = world.step(1.0, &mut rng(), IDLE).unwrap();
            assert!(report.spawned);

            let t = &world.targets()[0];
            let toward_center = Vec3::new(-t.center().x, 0.0, -t.center().z).normalize();
            assert!(t.velocity.normalize().dot(toward_center) > 0.999);
        }
    }

    #[test]
    fn target_cap_is_respected() {
        let mut world = World::new(GameConfig { max_targets: 2, ..quiet_config() });
        let white = Rgb::new(1.0, 1.0, 1.0);
        assert!(world.spawn_target(Vec3::ZERO, Vec3::ZERO, white).is_some());
        assert!(world.spawn_target(Vec3::X, Vec3::ZERO, white).is_some());
        assert!(world.spawn_target(Vec3::Y, Vec3::ZERO, white).is_none());
        assert_eq!(world.targets().len(), 2);
    }

    // ── firing ────────────────────────────────────────────────────────────

    #[test]
    fn firing_respects_cooldown() {
        let mut world = World::new(quiet_config());
        let fire = FireCommand { fire: true, origin: Vec3::new(0.0, 1.0, 5.0), direction: Vec3::NEG_Z };

        assert!(world.step(0.01, &mut rng(), fire).unwrap().fired);
        assert!(!world.step(0.01, &mut rng(), fire).unwrap().fired);
        assert_eq!(world.fireballs().len(), 1);

        assert!(world.step(0.3, &mut rng(), fire).unwrap().fired);
        assert_eq!(world.fireballs().len(), 2);
    }

    #[test]
    fn fireball_flies_along_direction() {
        let mut world = World::new(quiet_config());
        world.spawn_fireball(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, -2.0));
        let v = world.fireballs()[0].velocity;
        assert!((v - Vec3::NEG_Z * world.config().fireball_speed).length() < 1e-4);
    }

    #[test]
    fn fireball_cap_is_respected() {
        let mut world = World::new(GameConfig { max_fireballs: 2, ..quiet_config() });
        let origin = Vec3::new(0.0, 1.0, 0.0);
        assert!(world.spawn_fireball(origin, Vec3::NEG_Z).is_some());
        assert!(world.spawn_fireball(origin, Vec3::NEG_Z).is_some());
        assert!(world.spawn_fireball(origin, Vec3::NEG_Z).is_none());
        assert_eq!(world.fireballs().len(), 2);
        assert_eq!(world.buffer().vertex_count(), expected_vertices(&world));
    }

    #[test]
    fn fireballs_past_max_distance_are_culled() {
        let mut world = World::new(GameConfig { max_fireballs: 2, ..quiet_config() });
        let origin = Vec3::new(0.0, 1.0, 0.0);
        world.spawn_fireball(origin, Vec3::NEG_Z);
        world.spawn_fireball(origin, Vec3::NEG_Z);

        // 2 s at 12 u/s carries both well past 20 units.
        let report = world.step(2.0, &mut rng(), IDLE).unwrap();
        assert_eq!(report.culled, 2);
        assert!(world.fireballs().is_empty());
        assert_eq!(world.buffer().vertex_count(), 6);
    }

    #[test]
    fn zero_direction_does_not_fire() {
        let mut world = World::new(quiet_config());
        assert!(world.spawn_fireball(Vec3::ZERO, Vec3::ZERO).is_none());
    }

    // ── collisions ────────────────────────────────────────────────────────

    #[test]
    fn overlapping_fireball_destroys_target() {
        let mut world = World::new(quiet_config());
        let at = Vec3::new(0.0, 1.5, 0.0);
        world.spawn_target(at, Vec3::ZERO, Rgb::new(0.2, 0.6, 0.9));
        world.spawn_fireball(at + Vec3::new(0.0, 0.0, 0.3), Vec3::NEG_Z);

        let report = world.step(0.0, &mut rng(), IDLE).unwrap();
        assert_eq!(report.hits, 1);
        assert_eq!(world.score(), 1);
        assert!(world.targets().is_empty());
        assert!(world.fireballs().is_empty());
        assert_eq!(world.shards().len(), world.config().shard_count);
        assert_eq!(world.buffer().vertex_count(), expected_vertices(&world));
    }

    #[test]
    fn each_object_takes_part_in_one_collision() {
        let mut world = World::new(quiet_config());
        let at = Vec3::new(0.0, 1.5, 0.0);
        world.spawn_target(at, Vec3::ZERO, Rgb::new(0.2, 0.6, 0.9));
        world.spawn_fireball(at, Vec3::NEG_Z);
        world.spawn_fireball(at, Vec3::NEG_Z);

        let report = world.step(0.0, &mut rng(), IDLE).unwrap();
        assert_eq!(report.hits, 1);
        assert_eq!(world.fireballs().len(), 1);
        assert_eq!(world.buffer().vertex_count(), expected_vertices(&world));
    }

    #[test]
    fn distant_objects_do_not_collide() {
        let mut world = World::new(quiet_config());
        world.spawn_target(Vec3::new(3.0, 1.0, 0.0), Vec3::ZERO, Rgb::new(1.0, 1.0, 1.0));
        world.spawn_fireball(Vec3::new(-3.0, 1.0, 0.0), Vec3::Z);
        assert_eq!(world.step(0.0, &mut rng(), IDLE).unwrap().hits, 0);
        assert_eq!(world.score(), 0);
    }

    // ── shards ────────────────────────────────────────────────────────────

    #[test]
    fn shards_fall_and_expire() {
        let mut world = World::new(quiet_config());
        world.make_explosion(Vec3::new(0.0, 3.0, 0.0), [Rgb::new(1.0, 0.0, 0.0); 2], &mut rng());
        let n = world.shards().len();
        assert!(n > 0);

        world.step(0.1, &mut rng(), IDLE).unwrap();
        assert!(world.shards().iter().all(|s| s.body.velocity.y < world.config().shard_speed));

        let mut expired = 0;
        for _ in 0..40 {
            expired += world.step(0.05, &mut rng(), IDLE).unwrap().expired_shards;
        }
        assert_eq!(expired, n);
        assert!(world.shards().is_empty());
        assert_eq!(world.buffer().vertex_count(), 6);
    }

    // ── invariants ────────────────────────────────────────────────────────

    #[test]
    fn buffer_tracks_live_objects_over_a_busy_run() {
        let mut world = World::new(GameConfig { spawn_rate: 5.0, ..GameConfig::default() });
        let mut rng = rng();
        for i in 0..600 {
            let fire = FireCommand {
                fire: i % 3 == 0,
                origin: Vec3::new(0.0, 1.5, 8.0),
                direction: Vec3::new((i as f32 * 0.1).sin(), 0.0, -1.0),
            };
            world.step(1.0 / 60.0, &mut rng, fire).unwrap();
            assert_eq!(world.buffer().vertex_count(), expected_vertices(&world));
            assert_eq!(
                world.buffer().slot_count(),
                1 + world.fireballs().len() + world.targets().len() + world.shards().len()
            );
        }
    }

    #[test]
    fn reset_leaves_only_the_floor() {
        let mut world = World::new(quiet_config());
        world.spawn_target(Vec3::ZERO, Vec3::ZERO, Rgb::new(1.0, 1.0, 1.0));
        world.spawn_fireball(Vec3::new(5.0, 1.0, 0.0), Vec3::X);
        world.reset();
        assert_eq!(world.buffer().vertex_count(), 6);
        assert_eq!(world.buffer().slot_count(), 1);
        assert!(world.targets().is_empty() && world.fireballs().is_empty());
    }

    #[test]
    fn split_off_flagged_keeps_order() {
        let mut v = vec![1, 2, 3, 4, 5];
        let removed = split_off_flagged(&mut v, &[false, true, false, true, false]);
        assert_eq!(v, vec![1, 3, 5]);
        assert_eq!(removed, vec![2, 4]);
    }
}
