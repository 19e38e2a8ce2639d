use crate::config::BagelConfig;
use std::f64::consts::TAU;

pub const MAX_DEPTH: usize = 100;

// Angles this close to a full turn are treated as zero.
const TURN_EPSILON: f64 = 1e-9;

/// A point in the frame centered on the menu's visual center. `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn from_polar(r: f64, theta: f64) -> Self {
        Self::new(r * theta.cos(), r * theta.sin())
    }
}

pub fn cartesian_to_polar(x: f64, y: f64) -> (f64, f64) {
    let r = x.hypot(y);
    let mut theta = y.atan2(x);
    if theta < 0.0 {
        theta += TAU;
    }
    // -0.0 and tiny negatives can round up to exactly TAU
    if theta >= TAU {
        theta = 0.0;
    }
    (r, theta)
}

/// Ring index under radius `r`, or `None` inside the dead zone or in a radial gap.
pub fn get_depth(r: f64, config: &BagelConfig) -> Option<usize> {
    if r < config.dead_zone_radius || r < config.inner_radius || r.is_nan() {
        return None;
    }

    let width = config.effective_ring_width();
    let offset = r - config.inner_radius;

    if config.gap == 0.0 {
        let depth = (offset / width).floor();
        return Some(if depth >= MAX_DEPTH as f64 {
            MAX_DEPTH
        } else {
            depth as usize
        });
    }

    let step = width + config.gap;
    let mut start = config.inner_radius;
    for depth in 0..MAX_DEPTH {
        if r < start {
            return None;
        }
        if r < start + width {
            return Some(depth);
        }
        start += step;
    }
    Some(MAX_DEPTH)
}

pub fn get_index_from_angle(
    theta: f64,
    item_count: usize,
    start_angle: f64,
    gap_angle: f64,
) -> Option<usize> {
    if item_count == 0 || !theta.is_finite() {
        return None;
    }

    let slice = TAU / item_count as f64;
    let mut adjusted = (theta - start_angle).rem_euclid(TAU);
    if TAU - adjusted < TURN_EPSILON {
        adjusted = 0.0;
    }

    let raw = (adjusted / slice).floor();
    let relative = adjusted - raw * slice;
    let half_gap = gap_angle.max(0.0) / 2.0;
    if relative < half_gap || relative > slice - half_gap {
        return None;
    }

    Some(raw as usize % item_count)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTest {
    pub depth: Option<usize>,
    pub index: Option<usize>,
    pub r: f64,
    pub theta: f64,
}

pub fn hit_test(point: Point, config: &BagelConfig, item_count: usize) -> HitTest {
    let (r, theta) = cartesian_to_polar(point.x, point.y);
    let mut hit = HitTest {
        depth: None,
        index: None,
        r,
        theta,
    };

    if config.in_dead_zone(r) {
        return hit;
    }

    hit.depth = get_depth(r, config);
    if let Some(depth) = hit.depth
        && item_count > 0
    {
        hit.index = get_index_from_angle(
            theta,
            item_count,
            config.start_angle,
            config.gap_angle(depth),
        );
    }
    hit
}
