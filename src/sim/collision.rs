//! Collision predicates between the actor, the floor line and the obstacle field
//!
//! Pure functions with no side effects. Boundaries are inclusive: touching an
//! edge counts as a hit.

use super::actor::Actor;
use super::obstacle::Obstacle;

/// Which solid region of an obstacle was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleSide {
    Upper,
    Lower,
}

/// First obstacle found colliding with the actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleHit {
    pub obstacle_id: u32,
    /// Position in the field at the time of the hit
    pub index: usize,
    pub side: ObstacleSide,
}

/// Actor's bottom edge at or below the floor line
pub fn hits_ground(actor: &Actor, playable_height: f32) -> bool {
    actor.pos.y + actor.size.y >= playable_height
}

/// Test the actor against a single obstacle
pub fn hits_obstacle(actor: &Actor, obstacle: &Obstacle) -> Option<ObstacleSide> {
    let left = actor.pos.x;
    let right = actor.pos.x + actor.size.x;
    let overlaps_x = right >= obstacle.x && left <= obstacle.right();
    if !overlaps_x {
        return None;
    }

    if actor.pos.y <= obstacle.gap_top() {
        Some(ObstacleSide::Upper)
    } else if actor.pos.y + actor.size.y >= obstacle.gap_bottom() {
        Some(ObstacleSide::Lower)
    } else {
        None
    }
}

/// First colliding obstacle in position order (left to right)
pub fn first_obstacle_hit<'a, I>(actor: &Actor, obstacles: I) -> Option<ObstacleHit>
where
    I: IntoIterator<Item = &'a Obstacle>,
{
    obstacles
        .into_iter()
        .enumerate()
        .find_map(|(index, obstacle)| {
            hits_obstacle(actor, obstacle).map(|side| ObstacleHit {
                obstacle_id: obstacle.id,
                index,
                side,
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn actor_at(x: f32, y: f32) -> Actor {
        Actor::new(Vec2::new(x, y), Vec2::new(34.0, 24.0))
    }

    fn obstacle() -> Obstacle {
        Obstacle::with_gap(1, 100.0, 70.0, 200.0, 350.0)
    }

    #[test]
    fn test_inside_gap_is_clear() {
        assert_eq!(hits_obstacle(&actor_at(100.0, 210.0), &obstacle()), None);
    }

    #[test]
    fn test_hits_lower_region() {
        // 340 + 24 = 364 >= 350
        assert_eq!(
            hits_obstacle(&actor_at(100.0, 340.0), &obstacle()),
            Some(ObstacleSide::Lower)
        );
    }

    #[test]
    fn test_hits_upper_region() {
        assert_eq!(
            hits_obstacle(&actor_at(100.0, 0.0), &obstacle()),
            Some(ObstacleSide::Upper)
        );
        // Touching the gap top counts
        assert_eq!(
            hits_obstacle(&actor_at(100.0, 200.0), &obstacle()),
            Some(ObstacleSide::Upper)
        );
    }

    #[test]
    fn test_horizontal_edges_are_inclusive() {
        let o = obstacle();
        // Actor right edge exactly at obstacle left edge
        assert!(hits_obstacle(&actor_at(66.0, 0.0), &o).is_some());
        // Actor left edge exactly at obstacle right edge
        assert!(hits_obstacle(&actor_at(170.0, 0.0), &o).is_some());
        // Just outside on both sides
        assert!(hits_obstacle(&actor_at(65.9, 0.0), &o).is_none());
        assert!(hits_obstacle(&actor_at(170.1, 0.0), &o).is_none());
    }

    #[test]
    fn test_first_hit_is_leftmost() {
        let field = [
            Obstacle::with_gap(4, 90.0, 70.0, 0.0, 500.0),
            Obstacle::with_gap(5, 100.0, 70.0, 200.0, 350.0),
            Obstacle::with_gap(6, 110.0, 70.0, 200.0, 350.0),
        ];
        // Clear of the wide first gap, low enough to clip the next two
        let hit = first_obstacle_hit(&actor_at(100.0, 340.0), &field);
        assert_eq!(
            hit,
            Some(ObstacleHit {
                obstacle_id: 5,
                index: 1,
                side: ObstacleSide::Lower,
            })
        );
    }

    #[test]
    fn test_empty_field_never_hits() {
        let empty: [Obstacle; 0] = [];
        assert_eq!(first_obstacle_hit(&actor_at(100.0, 0.0), &empty), None);
    }

    #[test]
    fn test_ground_collision() {
        assert!(hits_ground(&actor_at(100.0, 380.0), 400.0));
        assert!(hits_ground(&actor_at(100.0, 376.0), 400.0));
        assert!(!hits_ground(&actor_at(100.0, 375.9), 400.0));
    }
}
