use crate::config::BagelConfig;
use crate::geometry::{Point, hit_test};
use crate::item::RadialItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    DeadZone,
    /// Resolution stopped before a slice was found at `depth`: an angular
    /// gap, a radial gap, or an empty ring. `path` holds the indices that did
    /// resolve on the way out.
    Unresolved { depth: Option<usize>, path: Vec<usize> },
    Hit { path: Vec<usize> },
}

impl Resolution {
    pub fn path(&self) -> &[usize] {
        match self {
            Self::DeadZone => &[],
            Self::Unresolved { path, .. } | Self::Hit { path } => path,
        }
    }
}

/// Resolves the whole path under `point`, root ring outwards.
///
/// The target ring comes from the radius alone. Every ring from the root to
/// the target is then indexed again with the current angle, so a parent is
/// never kept from an earlier sample. The walk stops early at a leaf, and
/// stops unresolved at a gap or an empty ring.
pub fn resolve_path(point: Point, items: &[RadialItem], config: &BagelConfig) -> Resolution {
    let polar = hit_test(point, config, 0);
    if config.in_dead_zone(polar.r) {
        return Resolution::DeadZone;
    }
    let Some(target) = polar.depth else {
        return Resolution::Unresolved {
            depth: None,
            path: Vec::new(),
        };
    };

    let mut level = items;
    let mut path = Vec::with_capacity(target + 1);
    for depth in 0..=target {
        let hit = hit_test(point, config, level.len());
        let Some(item) = hit.index.and_then(|index| level.get(index)) else {
            return Resolution::Unresolved {
                depth: Some(depth),
                path,
            };
        };
        path.extend(hit.index);
        if depth == target || item.is_leaf() {
            break;
        }
        level = &item.children;
    }
    Resolution::Hit { path }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, TAU};

    fn config() -> BagelConfig {
        BagelConfig {
            inner_radius: 50.0,
            ring_width: 50.0,
            gap: 0.0,
            start_angle: -FRAC_PI_2,
            dead_zone_radius: 30.0,
        }
    }

    fn leaves(n: usize) -> Vec<RadialItem> {
        (0..n)
            .map(|i| RadialItem::new(format!("leaf{i}"), format!("Leaf {i}")))
            .collect()
    }

    // center of slice `index` out of `count`, measured from the top
    fn aim(index: usize, count: usize, r: f64) -> Point {
        let slice = TAU / count as f64;
        Point::from_polar(r, -FRAC_PI_2 + slice * (index as f64 + 0.5))
    }

    #[test]
    fn test_dead_zone() {
        assert_eq!(
            resolve_path(Point::new(3.0, -4.0), &leaves(4), &config()),
            Resolution::DeadZone
        );
    }

    #[test]
    fn test_inside_inner_radius_is_not_dead_zone() {
        // dead zone ends at 30, ring 0 starts at 50
        assert_eq!(
            resolve_path(Point::new(0.0, -40.0), &leaves(4), &config()),
            Resolution::Unresolved {
                depth: None,
                path: vec![]
            }
        );
    }

    #[test]
    fn test_root_ring_hit() {
        let items = leaves(4);
        assert_eq!(
            resolve_path(aim(2, 4, 75.0), &items, &config()),
            Resolution::Hit { path: vec![2] }
        );
    }

    #[test]
    fn test_walk_stops_at_leaf() {
        let items = leaves(4);
        // ring 3, but the root items have no children
        assert_eq!(
            resolve_path(aim(1, 4, 220.0), &items, &config()),
            Resolution::Hit { path: vec![1] }
        );
    }

    #[test]
    fn test_parent_follows_current_angle() {
        let items = vec![
            RadialItem::new("a", "A").with_children(leaves(2)),
            RadialItem::new("b", "B").with_children(leaves(2)),
        ];
        // right half of the circle in ring 1: parent 0, child 0 (top-right quadrant)
        let p = Point::from_polar(125.0, -FRAC_PI_2 + 0.3);
        assert_eq!(
            resolve_path(p, &items, &config()),
            Resolution::Hit { path: vec![0, 0] }
        );
        // left half in ring 1: both levels re-resolve from the same angle
        let p = Point::from_polar(125.0, FRAC_PI_2 + 0.3);
        assert_eq!(
            resolve_path(p, &items, &config()),
            Resolution::Hit { path: vec![1, 1] }
        );
    }

    #[test]
    fn test_empty_root_ring() {
        assert_eq!(
            resolve_path(aim(0, 4, 75.0), &[], &config()),
            Resolution::Unresolved {
                depth: Some(0),
                path: vec![]
            }
        );
    }

    #[test]
    fn test_angular_gap_keeps_resolved_prefix() {
        let config = BagelConfig {
            gap: 10.0,
            start_angle: 0.0,
            ..config()
        };
        let items = vec![
            RadialItem::new("a", "A").with_children(leaves(4)),
            RadialItem::new("b", "B"),
        ];
        // ring 1 (mid 135): slice boundary of the child ring at PI/2, parent slice 0 spans [0, PI)
        let p = Point::from_polar(135.0, FRAC_PI_2 + 0.001);
        assert_eq!(
            resolve_path(p, &items, &config),
            Resolution::Unresolved {
                depth: Some(1),
                path: vec![0]
            }
        );
    }

    #[test]
    fn test_radial_gap() {
        let config = BagelConfig {
            gap: 10.0,
            ..config()
        };
        let resolution = resolve_path(aim(0, 4, 105.0), &leaves(4), &config);
        assert_eq!(
            resolution,
            Resolution::Unresolved {
                depth: None,
                path: vec![]
            }
        );
        assert!(resolution.path().is_empty());
    }
}
