// window.rs - Window sizing helpers

/// Height that makes the triangle (-1,-1) (0,1) (1,-1) equilateral in a window
/// `hypotenuse` pixels wide: `round(sqrt(hyp² - base²))`.
pub fn equilateral_height(hypotenuse: u32, base: u32) -> u32 {
    if base >= hypotenuse {
        return 0;
    }
    let (h, b) = (hypotenuse as f64, base as f64);
    (h * h - b * b).sqrt().round() as u32
}

/// Window size as a fraction of the monitor, never smaller than 1x1.
pub fn fraction_of(monitor: (u32, u32), fraction: f32) -> (u32, u32) {
    let fraction = fraction.clamp(0.0, 1.0);
    let scale = |v: u32| ((v as f32 * fraction) as u32).max(1);
    (scale(monitor.0), scale(monitor.1))
}

/// Top-left position that centres `window` on `monitor`.
pub fn centered_position(monitor: (u32, u32), window: (u32, u32)) -> (i32, i32) {
    (
        (monitor.0 as i32 - window.0 as i32) / 2,
        (monitor.1 as i32 - window.1 as i32) / 2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equilateral_height() {
        // sqrt(640² - 320²) = 554.25...
        assert_eq!(equilateral_height(640, 320), 554);
        assert_eq!(equilateral_height(5, 3), 4);
    }

    #[test]
    fn test_equilateral_height_degenerate() {
        assert_eq!(equilateral_height(100, 100), 0);
        assert_eq!(equilateral_height(10, 20), 0);
    }

    #[test]
    fn test_fraction_of_monitor() {
        assert_eq!(fraction_of((1920, 1080), 0.5), (960, 540));
        assert_eq!(fraction_of((1920, 1080), 0.0), (1, 1));
        assert_eq!(fraction_of((1920, 1080), 3.0), (1920, 1080));
    }

    #[test]
    fn test_centered_position() {
        assert_eq!(centered_position((1920, 1080), (960, 540)), (480, 270));
        // Larger than the monitor: negative offset
        assert_eq!(centered_position((800, 600), (1000, 600)), (-100, 0));
    }
}
