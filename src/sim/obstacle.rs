//! Gapped obstacles and the live obstacle field
//!
//! Each obstacle is one vertical barrier with a constant-size gap. Difficulty
//! comes from spawn pacing and gap placement, never from the gap size.

use rand::Rng;

use crate::Rect;
use crate::settings::GameConfig;

/// One gap-forming barrier (upper and lower solid regions)
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub gap_center: f32,
    pub gap_size: f32,
    /// Set once the actor has fully passed this obstacle
    pub passed: bool,
}

impl Obstacle {
    pub fn new(id: u32, x: f32, width: f32, gap_center: f32, gap_size: f32) -> Self {
        Self {
            id,
            x,
            width,
            gap_center,
            gap_size,
            passed: false,
        }
    }

    /// Build an obstacle from explicit gap edges (used by tests and fixtures)
    pub fn with_gap(id: u32, x: f32, width: f32, gap_top: f32, gap_bottom: f32) -> Self {
        let gap_size = gap_bottom - gap_top;
        Self::new(id, x, width, gap_top + gap_size / 2.0, gap_size)
    }

    /// Spawn an obstacle at `x` with a uniformly random gap center that keeps
    /// the whole gap at least `gap_margin` away from the top edge and floor line
    pub fn generate<R: Rng>(id: u32, x: f32, config: &GameConfig, rng: &mut R) -> Self {
        let half = config.gap_size / 2.0;
        let low = config.gap_margin + half;
        let high = config.playable_height() - config.gap_margin - half;
        let center = if low < high {
            rng.random_range(low..=high)
        } else {
            // Only reachable with an unsanitized config
            (low + high) / 2.0
        };
        Self::new(id, x, config.obstacle_width, center, config.gap_size)
    }

    #[inline]
    pub fn gap_top(&self) -> f32 {
        self.gap_center - self.gap_size / 2.0
    }

    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_center + self.gap_size / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn advance(&mut self, dt: f32, speed: f32) {
        self.x -= speed * dt;
    }

    pub fn is_offscreen(&self) -> bool {
        self.right() <= 0.0
    }

    /// Solid region above the gap
    pub fn upper_rect(&self) -> Rect {
        Rect::new(self.x, 0.0, self.width, self.gap_top())
    }

    /// Solid region between the gap and the floor line
    pub fn lower_rect(&self, floor_y: f32) -> Rect {
        let top = self.gap_bottom();
        Rect::new(self.x, top, self.width, (floor_y - top).max(0.0))
    }
}

/// Live obstacles in spawn order, which is also left-to-right order
#[derive(Debug, Clone, Default)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    next_id: u32,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self {
            obstacles: Vec::new(),
            next_id: 1,
        }
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn rightmost(&self) -> Option<&Obstacle> {
        self.obstacles.last()
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    /// Append a freshly generated obstacle at `x`
    pub fn spawn<R: Rng>(&mut self, x: f32, config: &GameConfig, rng: &mut R) -> &Obstacle {
        let id = self.next_entity_id();
        self.push(Obstacle::generate(id, x, config, rng))
    }

    /// Append a prepared obstacle. It must not sit left of the current rightmost one.
    pub fn push(&mut self, obstacle: Obstacle) -> &Obstacle {
        debug_assert!(
            self.rightmost().is_none_or(|last| last.x <= obstacle.x),
            "obstacles must be appended in position order"
        );
        self.next_id = self.next_id.max(obstacle.id + 1);
        self.obstacles.push(obstacle);
        &self.obstacles[self.obstacles.len() - 1]
    }

    /// Scroll every obstacle left by `speed * dt`
    pub fn advance(&mut self, dt: f32, speed: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.advance(dt, speed);
        }
    }

    /// Mark obstacles whose right edge is strictly left of `actor_left` as
    /// passed. Returns how many became passed on this call.
    pub fn mark_passed(&mut self, actor_left: f32) -> u32 {
        let mut newly_passed = 0;
        for obstacle in &mut self.obstacles {
            if !obstacle.passed && obstacle.right() < actor_left {
                obstacle.passed = true;
                newly_passed += 1;
            }
        }
        newly_passed
    }

    /// Drop obstacles that have fully left the screen. Their pass flag goes
    /// with them. Returns the number removed.
    pub fn retire_offscreen(&mut self) -> usize {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| !o.is_offscreen());
        before - self.obstacles.len()
    }

    /// Whether the gap between the right world edge and the rightmost obstacle
    /// has reached `distance`. An empty field always wants a spawn.
    pub fn wants_spawn(&self, world_width: f32, distance: f32) -> bool {
        match self.rightmost() {
            Some(last) => world_width - last.x >= distance,
            None => true,
        }
    }
}

/// Spawn-distance pacing, re-rolled on a fixed interval rather than per spawn
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnPacing {
    pub distance: f32,
    /// Wall-clock time (ms since run start) of the last re-roll
    pub last_reroll_ms: f64,
}

impl SpawnPacing {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            distance: (config.spawn_distance_min + config.spawn_distance_max) / 2.0,
            last_reroll_ms: 0.0,
        }
    }

    /// Re-roll the distance if the interval has elapsed. Returns true on re-roll.
    pub fn update<R: Rng>(&mut self, now_ms: f64, config: &GameConfig, rng: &mut R) -> bool {
        if now_ms - self.last_reroll_ms < config.spawn_reroll_interval_ms {
            return false;
        }
        self.distance = if config.spawn_distance_min < config.spawn_distance_max {
            rng.random_range(config.spawn_distance_min..=config.spawn_distance_max)
        } else {
            config.spawn_distance_min
        };
        self.last_reroll_ms = now_ms;
        log::debug!("Spawn distance re-rolled to {:.1}", self.distance);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field_with(xs: &[f32]) -> ObstacleField {
        let mut field = ObstacleField::new();
        for (i, x) in xs.iter().enumerate() {
            field.push(Obstacle::with_gap(i as u32 + 1, *x, 70.0, 200.0, 350.0));
        }
        field
    }

    #[test]
    fn test_gap_invariant_over_many_obstacles() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let floor = config.playable_height();
        for id in 0..10_000 {
            let o = Obstacle::generate(id, 0.0, &config, &mut rng);
            assert!((o.gap_bottom() - o.gap_top() - config.gap_size).abs() < 1e-3);
            assert!(o.gap_top() >= config.gap_margin - 1e-3, "top {}", o.gap_top());
            assert!(o.gap_bottom() <= floor - config.gap_margin + 1e-3, "bottom {}", o.gap_bottom());
        }
    }

    #[test]
    fn test_with_gap_round_trips_edges() {
        let o = Obstacle::with_gap(1, 100.0, 70.0, 200.0, 350.0);
        assert_eq!(o.gap_top(), 200.0);
        assert_eq!(o.gap_bottom(), 350.0);
        assert_eq!(o.right(), 170.0);
        assert_eq!(o.upper_rect(), Rect::new(100.0, 0.0, 70.0, 200.0));
        assert_eq!(o.lower_rect(400.0), Rect::new(100.0, 350.0, 70.0, 50.0));
    }

    #[test]
    fn test_advance_moves_left_at_constant_speed() {
        let mut field = field_with(&[100.0, 300.0]);
        field.advance(0.5, 100.0);
        let xs: Vec<f32> = field.iter().map(|o| o.x).collect();
        assert_eq!(xs, vec![50.0, 250.0]);
    }

    #[test]
    fn test_retire_on_first_tick_right_edge_reaches_zero() {
        let mut field = field_with(&[-69.0, 200.0]);
        assert_eq!(field.retire_offscreen(), 0);
        field.advance(0.5, 2.0);
        assert_eq!(field.retire_offscreen(), 1);
        assert_eq!(field.len(), 1);
        assert_eq!(field.as_slice()[0].x, 199.0);
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let mut field = field_with(&[0.0, 300.0]);
        // Right edge 70 strictly left of 100
        assert_eq!(field.mark_passed(100.0), 1);
        for _ in 0..5 {
            assert_eq!(field.mark_passed(100.0), 0);
        }
        assert!(field.as_slice()[0].passed);
        assert!(!field.as_slice()[1].passed);
    }

    #[test]
    fn test_touching_right_edge_does_not_score() {
        let mut field = field_with(&[30.0]);
        assert_eq!(field.mark_passed(100.0), 0);
    }

    #[test]
    fn test_wants_spawn_uses_rightmost() {
        let field = field_with(&[10.0, 150.0]);
        assert!(field.wants_spawn(360.0, 210.0));
        assert!(!field.wants_spawn(360.0, 211.0));
        assert!(ObstacleField::new().wants_spawn(360.0, 1000.0));
    }

    #[test]
    fn test_spawn_appends_with_fresh_ids() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut field = ObstacleField::new();
        let a = field.spawn(400.0, &config, &mut rng).id;
        let b = field.spawn(config.world_width, &config, &mut rng).id;
        assert_ne!(a, b);
        assert_eq!(field.rightmost().map(|o| o.id), Some(b));
    }

    #[test]
    fn test_pacing_rerolls_once_per_interval() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pacing = SpawnPacing::new(&config);
        assert!(!pacing.update(999.0, &config, &mut rng));
        assert!(pacing.update(1000.0, &config, &mut rng));
        assert!(!pacing.update(1500.0, &config, &mut rng));
        assert!(pacing.update(2000.0, &config, &mut rng));
        assert!(pacing.distance >= config.spawn_distance_min);
        assert!(pacing.distance <= config.spawn_distance_max);
    }

    proptest! {
        #[test]
        fn prop_gap_stays_inside_margins(seed in any::<u64>(), gap in 20.0f32..300.0) {
            let config = GameConfig { gap_size: gap, ..GameConfig::default() }.sanitized();
            let mut rng = Pcg32::seed_from_u64(seed);
            let o = Obstacle::generate(1, 0.0, &config, &mut rng);
            prop_assert!(o.gap_top() >= config.gap_margin - 1e-3);
            prop_assert!(o.gap_bottom() <= config.playable_height() - config.gap_margin + 1e-3);
        }
    }
}
