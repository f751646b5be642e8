use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::populate::SpawnRates;
use crate::species::SpeciesId;

fn default_depth() -> usize {
    75
}

fn default_width() -> usize {
    120
}

fn default_snapshot_interval_ticks() -> u64 {
    25
}

fn default_climate_period() -> u64 {
    50
}

fn default_mouse_rate() -> f64 {
    0.08
}

fn default_rabbit_rate() -> f64 {
    0.08
}

fn default_fox_rate() -> f64 {
    0.02
}

fn default_snake_rate() -> f64 {
    0.03
}

fn default_hawk_rate() -> f64 {
    0.02
}

fn default_bear_rate() -> f64 {
    0.01
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default = "default_snapshot_interval_ticks")]
    pub snapshot_interval_ticks: u64,
    #[serde(default)]
    pub field: FieldConfig,
    #[serde(default)]
    pub climate: ClimateConfig,
    /// Obstacle map, resolved against the loader's base directory. When
    /// the map loads, its dimensions override the `field` block.
    #[serde(default)]
    pub map_file: Option<PathBuf>,
    #[serde(default)]
    pub spawn: SpawnConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldConfig {
    #[serde(default = "default_depth")]
    pub depth: usize,
    #[serde(default = "default_width")]
    pub width: usize,
}

impl FieldConfig {
    /// Zero dimensions are a configuration slip, not an error: the
    /// documented defaults are substituted.
    pub fn normalized(&self) -> (usize, usize) {
        let depth = if self.depth == 0 {
            default_depth()
        } else {
            self.depth
        };
        let width = if self.width == 0 {
            default_width()
        } else {
            self.width
        };
        (depth, width)
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            depth: default_depth(),
            width: default_width(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClimateConfig {
    #[serde(default = "default_climate_period")]
    pub period_ticks: u64,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            period_ticks: default_climate_period(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpawnConfig {
    #[serde(default = "default_mouse_rate")]
    pub mouse: f64,
    #[serde(default = "default_rabbit_rate")]
    pub rabbit: f64,
    #[serde(default = "default_fox_rate")]
    pub fox: f64,
    #[serde(default = "default_snake_rate")]
    pub snake: f64,
    #[serde(default = "default_hawk_rate")]
    pub hawk: f64,
    #[serde(default = "default_bear_rate")]
    pub bear: f64,
}

impl SpawnConfig {
    pub fn to_rates(&self) -> SpawnRates {
        let mut rates = SpawnRates::default();
        rates.set_rate(SpeciesId::Mouse, self.mouse);
        rates.set_rate(SpeciesId::Rabbit, self.rabbit);
        rates.set_rate(SpeciesId::Fox, self.fox);
        rates.set_rate(SpeciesId::Snake, self.snake);
        rates.set_rate(SpeciesId::Hawk, self.hawk);
        rates.set_rate(SpeciesId::Bear, self.bear);
        rates
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            mouse: default_mouse_rate(),
            rabbit: default_rabbit_rate(),
            fox: default_fox_rate(),
            snake: default_snake_rate(),
            hawk: default_hawk_rate(),
            bear: default_bear_rate(),
        }
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed to read scenario file {}", path.display()))?;
        let mut scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        scenario.map_file = scenario.map_file.take().map(|map| {
            if map.is_relative() {
                self.base_dir.join(map)
            } else {
                map
            }
        });
        Ok(scenario)
    }
}

impl Scenario {
    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_scenario_fills_in_defaults() {
        let scenario: Scenario = serde_yaml::from_str("name: bare\nseed: 7\n").unwrap();
        assert_eq!(scenario.field.normalized(), (75, 120));
        assert_eq!(scenario.climate.period_ticks, 50);
        assert_eq!(scenario.snapshot_interval_ticks, 25);
        assert_eq!(scenario.ticks(None), 500);
        assert_eq!(scenario.ticks(Some(42)), 42);
        assert!(scenario.map_file.is_none());
    }

    #[test]
    fn zero_dimensions_fall_back_to_defaults() {
        let scenario: Scenario =
            serde_yaml::from_str("name: flat\nseed: 1\nfield:\n  depth: 0\n  width: 30\n").unwrap();
        assert_eq!(scenario.field.normalized(), (75, 30));
    }

    #[test]
    fn spawn_rates_carry_over() {
        let scenario: Scenario =
            serde_yaml::from_str("name: foxes\nseed: 1\nspawn:\n  fox: 0.5\n").unwrap();
        let rates = scenario.spawn.to_rates();
        assert_eq!(rates.rate(SpeciesId::Fox), 0.5);
        assert_eq!(rates.rate(SpeciesId::Rabbit), 0.08);
    }
}
