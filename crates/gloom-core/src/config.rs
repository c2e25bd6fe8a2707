//! Generation configuration

use serde::{Deserialize, Serialize};

use crate::errors::GenerateError;

/// Everything a generation run needs to know up front
///
/// All fields have usable defaults, so partial config files work:
/// `{ "width": 60, "height": 40 }` tweaks the size and keeps the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveConfig {
    /// Map width in cells
    pub width: usize,
    /// Map height in cells
    pub height: usize,
    /// Chance of a cell starting as wall in the noise pass (0.0..=1.0)
    pub fill_percent: f64,
    /// Cellular-automata smoothing passes, may stop early on a fixed point
    pub smoothing_iterations: u32,
    /// Rectangular rooms to carve before smoothing, 0 for pure cellular caves
    pub room_attempts: u32,
    /// Tunnel isolated floor regions into the dominant one
    pub connect_regions: bool,
    /// Grow moss clusters on walls
    pub add_moss: bool,
    /// Chance per wall cell of seeding a moss cluster (0.0..=1.0)
    pub moss_probability: f64,
    /// Pool water on open floor
    pub add_water: bool,
    /// Chance per floor cell of seeding a water pool (0.0..=1.0)
    pub water_probability: f64,
    /// One item is scattered per this many cells
    pub item_density: usize,
    /// Default field-of-view radius in cells
    pub view_radius: u32,
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            fill_percent: 0.45,
            smoothing_iterations: 3,
            room_attempts: 0,
            connect_regions: true,
            add_moss: true,
            moss_probability: 0.05,
            add_water: true,
            water_probability: 0.02,
            item_density: 500,
            view_radius: 8,
        }
    }
}

impl CaveConfig {
    /// Convenience constructor for the common width/height case
    pub fn sized(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Check that a generation run can work with these values
    pub fn validate(&self) -> Result<(), GenerateError> {
        // 3x3 is the smallest grid with an interior inside the border ring.
        if self.width < 3 || self.height < 3 {
            return Err(GenerateError::InvalidConfig(format!(
                "map must be at least 3x3, got {}x{}",
                self.width, self.height
            )));
        }
        if !(0.0..=1.0).contains(&self.fill_percent) {
            return Err(GenerateError::InvalidConfig(format!(
                "fill_percent must be within 0.0..=1.0, got {}",
                self.fill_percent
            )));
        }
        if !(0.0..=1.0).contains(&self.moss_probability) {
            return Err(GenerateError::InvalidConfig(format!(
                "moss_probability must be within 0.0..=1.0, got {}",
                self.moss_probability
            )));
        }
        if !(0.0..=1.0).contains(&self.water_probability) {
            return Err(GenerateError::InvalidConfig(format!(
                "water_probability must be within 0.0..=1.0, got {}",
                self.water_probability
            )));
        }
        if self.item_density == 0 {
            return Err(GenerateError::InvalidConfig(
                "item_density must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(CaveConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_tiny_maps() {
        let config = CaveConfig::sized(2, 50);
        assert!(matches!(
            config.validate(),
            Err(GenerateError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_bad_probabilities() {
        let mut config = CaveConfig::default();
        config.fill_percent = 1.5;
        assert!(config.validate().is_err());

        let mut config = CaveConfig::default();
        config.moss_probability = -0.1;
        assert!(config.validate().is_err());

        let mut config = CaveConfig::default();
        config.water_probability = 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_density() {
        let mut config = CaveConfig::default();
        config.item_density = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CaveConfig = serde_json::from_str(r#"{"width": 60, "height": 40}"#).unwrap();
        assert_eq!(config.width, 60);
        assert_eq!(config.height, 40);
        assert_eq!(config.fill_percent, 0.45);
        assert_eq!(config.smoothing_iterations, 3);
        assert!(config.connect_regions);
    }
}
