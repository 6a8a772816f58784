use crate::window::equilateral_height;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    /// Derived from `width` with [`equilateral_height`] when unset.
    pub height: Option<u32>,
    /// Overrides `width`/`height` with a share of the monitor size when set.
    pub monitor_fraction: Option<f32>,
    pub vsync: bool,
    pub center: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "glstep".to_string(),
            width: 640,
            height: None,
            monitor_fraction: None,
            vsync: true,
            center: true,
        }
    }
}

impl WindowConfig {
    /// Window size before any monitor is known.
    pub fn size(&self) -> (u32, u32) {
        let height = self
            .height
            .unwrap_or_else(|| equilateral_height(self.width, self.width / 2));
        (self.width.max(1), height.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_size_is_equilateral() {
        assert_eq!(WindowConfig::default().size(), (640, 554));
    }

    #[test]
    fn test_explicit_height() {
        let config = WindowConfig {
            height: Some(480),
            ..WindowConfig::default()
        };
        assert_eq!(config.size(), (640, 480));
    }
}
