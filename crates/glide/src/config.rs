use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::f64::consts::FRAC_PI_2;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct BagelConfig {
    pub inner_radius: f64,
    pub ring_width: f64,
    pub gap: f64,
    /// Rotation offset of slice 0, in radians. `-PI/2` puts it at the top.
    pub start_angle: f64,
    pub dead_zone_radius: f64,
}

impl Default for BagelConfig {
    fn default() -> Self {
        Self {
            inner_radius: 50.0,
            ring_width: 70.0,
            gap: 4.0,
            start_angle: -FRAC_PI_2,
            dead_zone_radius: 40.0,
        }
    }
}

impl BagelConfig {
    pub fn effective_ring_width(&self) -> f64 {
        if self.ring_width > 0.0 {
            self.ring_width
        } else {
            1.0
        }
    }

    pub fn ring_inner(&self, depth: usize) -> f64 {
        self.inner_radius + depth as f64 * (self.effective_ring_width() + self.gap)
    }

    pub fn ring_outer(&self, depth: usize) -> f64 {
        self.ring_inner(depth) + self.effective_ring_width()
    }

    pub fn ring_mid(&self, depth: usize) -> f64 {
        self.ring_inner(depth) + self.effective_ring_width() / 2.0
    }

    pub fn gap_angle(&self, depth: usize) -> f64 {
        let mid = self.ring_mid(depth);
        if mid > 0.0 && self.gap > 0.0 {
            self.gap / mid
        } else {
            0.0
        }
    }

    /// The central disc where input is ignored. Between its edge and
    /// `inner_radius` there is no ring, but that is not dead zone.
    pub fn in_dead_zone(&self, r: f64) -> bool {
        r < self.dead_zone_radius
    }
}

#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GestureConfig {
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub hold_delay: Duration,
    pub movement_buffer: f64,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub hold_pulse: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub hover_pulse: Duration,
    pub animate_out: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            hold_delay: Duration::from_millis(200),
            movement_buffer: 10.0,
            hold_pulse: Duration::from_millis(15),
            hover_pulse: Duration::from_millis(5),
            animate_out: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_radii_accumulate_gap() {
        let config = BagelConfig {
            inner_radius: 50.0,
            ring_width: 40.0,
            gap: 10.0,
            ..Default::default()
        };
        assert_eq!(config.ring_inner(0), 50.0);
        assert_eq!(config.ring_outer(0), 90.0);
        assert_eq!(config.ring_inner(2), 150.0);
        assert_eq!(config.ring_mid(1), 120.0);
        assert!((config.gap_angle(1) - 10.0 / 120.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_positive_ring_width_is_clamped() {
        for width in [0.0, -5.0, f64::NAN] {
            let config = BagelConfig {
                ring_width: width,
                ..Default::default()
            };
            assert_eq!(config.effective_ring_width(), 1.0);
        }
    }

    #[test]
    fn test_dead_zone_stops_at_its_own_radius() {
        let config = BagelConfig {
            inner_radius: 50.0,
            dead_zone_radius: 30.0,
            ..Default::default()
        };
        assert!(config.in_dead_zone(29.9));
        assert!(!config.in_dead_zone(30.0));
        assert!(!config.in_dead_zone(45.0));
    }

    #[test]
    fn test_gesture_config_deserialization() {
        let json = r#"{ "hold_delay": 350, "movement_buffer": 6.5, "animate_out": true }"#;
        let config: GestureConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.hold_delay, Duration::from_millis(350));
        assert_eq!(config.movement_buffer, 6.5);
        assert!(config.animate_out);
        assert_eq!(config.hover_pulse, GestureConfig::default().hover_pulse);
    }

    #[test]
    fn test_bagel_config_partial_deserialization() {
        let config: BagelConfig = serde_json::from_str(r#"{ "gap": 0 }"#).unwrap();
        assert_eq!(config.gap, 0.0);
        assert_eq!(config.start_angle, -FRAC_PI_2);
    }
}
