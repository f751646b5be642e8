use rand::Rng;
use serde::{Deserialize, Serialize};

/// Toggle probability rolled once the period has elapsed.
const FLIP_PROBABILITY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClimateState {
    Normal,
    Rainy,
}

/// Two-state environmental process. Every tick the counter advances; once
/// it reaches the configured period, a toggle is rolled each tick until one
/// succeeds, at which point the state flips and the counter restarts. Rainy
/// weather doubles the vegetation growth passes for the tick.
#[derive(Debug, Clone)]
pub struct Climate {
    state: ClimateState,
    cycles_since_change: u64,
    period: u64,
    flip_probability: f64,
}

impl Climate {
    pub fn new(period: u64) -> Self {
        Self {
            state: ClimateState::Normal,
            cycles_since_change: 0,
            period,
            flip_probability: FLIP_PROBABILITY,
        }
    }

    /// Overrides the toggle probability. Useful for forcing deterministic
    /// weather in tests and scripted scenarios.
    pub fn with_flip_probability(mut self, probability: f64) -> Self {
        self.flip_probability = probability;
        self
    }

    pub fn update(&mut self, rng: &mut impl Rng) {
        self.cycles_since_change += 1;
        if self.cycles_since_change >= self.period && rng.gen::<f64>() <= self.flip_probability {
            self.state = match self.state {
                ClimateState::Normal => ClimateState::Rainy,
                ClimateState::Rainy => ClimateState::Normal,
            };
            self.cycles_since_change = 0;
        }
    }

    pub fn state(&self) -> ClimateState {
        self.state
    }

    pub fn is_rainy(&self) -> bool {
        self.state == ClimateState::Rainy
    }

    /// Vegetation growth passes owed this tick.
    pub fn growth_passes(&self) -> u32 {
        if self.is_rainy() {
            2
        } else {
            1
        }
    }

    pub fn reset(&mut self) {
        self.state = ClimateState::Normal;
        self.cycles_since_change = 0;
    }
}
