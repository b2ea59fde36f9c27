//! Presentation adapters
//!
//! Pure functions from domain values to presentation values. Nothing here
//! touches game state or scoring; a rendering surface feeds it values from a
//! [`GameView`](crate::game::GameView) and gets colors and animation timing
//! back.

use crate::core::config::{MAX_ANIM_TIME_MS, MAX_TEMP, MIN_TEMP};

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Map a temperature to the blue→green→red gradient
///
/// The value is clamped into [MIN_TEMP, MAX_TEMP] and normalized; the lower
/// half interpolates blue→green, the upper half green→red. MIN_TEMP is pure
/// blue, MAX_TEMP pure red, the midpoint pure green.
pub fn color_of(value: f64) -> Rgb {
    let t = ((value - MIN_TEMP) / (MAX_TEMP - MIN_TEMP)).clamp(0.0, 1.0);

    let (r, g, b) = if t < 0.5 {
        let local = t / 0.5;
        (0.0, local * 255.0, 255.0 - local * 255.0)
    } else {
        let local = (t - 0.5) / 0.5;
        (local * 255.0, 255.0 - local * 255.0, 0.0)
    };

    Rgb {
        r: r.round() as u8,
        g: g.round() as u8,
        b: b.round() as u8,
    }
}

/// Euclidean distance between two cells, rounded to whole tiles
pub fn tile_distance(from: (usize, usize), to: (usize, usize)) -> u32 {
    let dr = from.0 as f64 - to.0 as f64;
    let dc = from.1 as f64 - to.1 as f64;
    (dr * dr + dc * dc).sqrt().round() as u32
}

/// Per-tile transition duration so the whole board reveals within the budget
///
/// A 1×1 board has no stagger; duration degenerates to the full budget.
pub fn tile_duration_ms(board_size: usize) -> f64 {
    if board_size <= 1 {
        return MAX_ANIM_TIME_MS;
    }
    MAX_ANIM_TIME_MS / (2.0 * (board_size as f64 - 1.0))
}

/// Animation delay for a tile at `distance` from the last revealed cell
pub fn delay_ms(distance: u32, duration_ms: f64) -> f64 {
    distance as f64 * duration_ms / 3.0
}

/// Temperature as shown on a revealed tile
pub fn display_temperature(value: f64) -> i64 {
    value.round() as i64
}

/// Accuracy readout: two-decimal percentage, `--` while unknown
pub fn display_accuracy(accuracy: Option<f64>) -> String {
    match accuracy {
        Some(acc) => format!("{:.2}", acc * 100.0),
        None => "--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_gradient_endpoints() {
        assert_eq!(color_of(MIN_TEMP), Rgb { r: 0, g: 0, b: 255 });
        assert_eq!(color_of(MAX_TEMP), Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(color_of(600.0), Rgb { r: 0, g: 255, b: 0 });
    }

    #[test]
    fn test_gradient_clamps_out_of_range() {
        assert_eq!(color_of(-40.0), color_of(MIN_TEMP));
        assert_eq!(color_of(5000.0), color_of(MAX_TEMP));
    }

    #[test]
    fn test_color_display_format() {
        assert_eq!(color_of(MIN_TEMP).to_string(), "rgb(0, 0, 255)");
        assert_eq!(color_of(MAX_TEMP).to_string(), "rgb(255, 0, 0)");
    }

    #[test]
    fn test_tile_distance() {
        assert_eq!(tile_distance((0, 0), (0, 0)), 0);
        assert_eq!(tile_distance((0, 0), (3, 4)), 5);
        assert_eq!(tile_distance((1, 1), (2, 2)), 1); // sqrt(2) rounds to 1
    }

    #[test]
    fn test_delay_scales_with_distance() {
        let duration = tile_duration_ms(5);
        assert_eq!(delay_ms(0, duration), 0.0);
        assert!(delay_ms(2, duration) > delay_ms(1, duration));
    }

    #[test]
    fn test_duration_fits_budget() {
        // Farthest tile on a 5x5 board is distance ~6; its delay plus its
        // transition stays within the animation budget.
        let duration = tile_duration_ms(5);
        let farthest = tile_distance((0, 0), (4, 4));
        assert!(delay_ms(farthest, duration) + duration <= MAX_ANIM_TIME_MS);
    }

    #[test]
    fn test_display_accuracy() {
        assert_eq!(display_accuracy(None), "--");
        assert_eq!(display_accuracy(Some(0.6)), "60.00");
        assert_eq!(display_accuracy(Some(0.12345)), "12.35");
    }

    proptest! {
        /// Warmer is never bluer: within range, red is non-decreasing and
        /// blue non-increasing in temperature.
        #[test]
        fn prop_gradient_monotonic(a in 200.0f64..1000.0, b in 200.0f64..1000.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let cold = color_of(lo);
            let warm = color_of(hi);
            prop_assert!(warm.r >= cold.r);
            prop_assert!(warm.b <= cold.b);
        }

        #[test]
        fn prop_delay_non_negative(distance in 0u32..100, size in 1usize..=10) {
            prop_assert!(delay_ms(distance, tile_duration_ms(size)) >= 0.0);
        }
    }
}
