/// Red channel that bounces between 0 and 1, one step per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPulse {
    value: f32,
    step: f32,
    green: f32,
    blue: f32,
}

impl ColorPulse {
    pub fn new(start: f32, step: f32) -> Self {
        Self {
            value: start,
            step: step.abs(),
            green: 0.3,
            blue: 0.8,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Flips direction once the value has left `[0, 1]`, then moves one step.
    pub fn advance(&mut self) -> f32 {
        if self.value > 1.0 {
            self.step = -self.step.abs();
        } else if self.value < 0.0 {
            self.step = self.step.abs();
        }
        self.value += self.step;
        self.value
    }

    pub fn rgba(&self) -> [f32; 4] {
        [self.value, self.green, self.blue, 1.0]
    }
}

impl Default for ColorPulse {
    fn default() -> Self {
        Self::new(0.0, 0.05)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_rises_then_falls() {
        let mut pulse = ColorPulse::new(0.95, 0.1);
        assert!((pulse.advance() - 1.05).abs() < 1e-6);
        // Above 1: turn around
        assert!((pulse.advance() - 0.95).abs() < 1e-6);
        assert!(pulse.step() < 0.0);
    }

    #[test]
    fn test_pulse_turns_at_zero() {
        let mut pulse = ColorPulse::new(0.05, 0.1);
        pulse.step = -0.1;
        assert!(pulse.advance() < 0.0);
        assert!((pulse.advance() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_pulse_stays_near_unit_range() {
        let mut pulse = ColorPulse::default();
        for _ in 0..1000 {
            let v = pulse.advance();
            assert!(v >= -0.05 - 1e-4 && v <= 1.05 + 1e-4, "value {v} escaped");
        }
    }

    #[test]
    fn test_rgba() {
        let pulse = ColorPulse::new(0.5, 0.05);
        assert_eq!(pulse.rgba(), [0.5, 0.3, 0.8, 1.0]);
    }
}
