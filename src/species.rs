use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Food level a newborn starts with, and the level a successful fishing
/// attempt restores.
pub const DEFAULT_FOOD_LEVEL: i32 = 10;

/// Grazers stop accumulating food past this level.
pub const GRAZER_SATIATION_CAP: i32 = 20;

/// The closed set of species shipped with the simulation. The parameter
/// table below is the open end: new entries mean new variants here plus one
/// more `SpeciesParams` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeciesId {
    Mouse,
    Rabbit,
    Fox,
    Snake,
    Hawk,
    Bear,
}

impl SpeciesId {
    pub const ALL: [SpeciesId; 6] = [
        SpeciesId::Mouse,
        SpeciesId::Rabbit,
        SpeciesId::Fox,
        SpeciesId::Snake,
        SpeciesId::Hawk,
        SpeciesId::Bear,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SpeciesId::Mouse => "mouse",
            SpeciesId::Rabbit => "rabbit",
            SpeciesId::Fox => "fox",
            SpeciesId::Snake => "snake",
            SpeciesId::Hawk => "hawk",
            SpeciesId::Bear => "bear",
        }
    }

    /// Single-character legend tag used by the text renderer.
    pub fn glyph(self) -> char {
        match self {
            SpeciesId::Mouse => 'm',
            SpeciesId::Rabbit => 'r',
            SpeciesId::Fox => 'F',
            SpeciesId::Snake => 's',
            SpeciesId::Hawk => 'h',
            SpeciesId::Bear => 'B',
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Feeding strategy: grazers harvest vegetation at their own cell, hunters
/// take adjacent live prey from their diet map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorKind {
    Grazer,
    Hunter,
}

/// Life-stage parameters for one species. `diet` maps prey species to the
/// food level a kill restores; it is only consulted for hunters.
#[derive(Debug, Clone)]
pub struct SpeciesParams {
    pub max_age: u32,
    pub breeding_age: u32,
    pub breeding_probability: f64,
    pub max_litter_size: u32,
    /// Food restored to a hunter that eats a member of this species.
    pub prey_value: i32,
    pub behavior: BehaviorKind,
    pub diet: HashMap<SpeciesId, i32>,
    /// Chance of restoring the default food level when next to a river.
    pub fishing_probability: Option<f64>,
}

/// Per-species parameter table, indexed by [`SpeciesId`]. The default table
/// is the built-in six-species ecosystem; tests and scenarios mutate rows
/// through `params_mut`.
#[derive(Debug, Clone)]
pub struct SpeciesTable {
    params: [SpeciesParams; 6],
}

impl SpeciesTable {
    pub fn params(&self, id: SpeciesId) -> &SpeciesParams {
        &self.params[id.index()]
    }

    pub fn params_mut(&mut self, id: SpeciesId) -> &mut SpeciesParams {
        &mut self.params[id.index()]
    }
}

impl Default for SpeciesTable {
    fn default() -> Self {
        let grazer = |max_age, breeding_age, breeding_probability, max_litter_size, prey_value| {
            SpeciesParams {
                max_age,
                breeding_age,
                breeding_probability,
                max_litter_size,
                prey_value,
                behavior: BehaviorKind::Grazer,
                diet: HashMap::new(),
                fishing_probability: None,
            }
        };
        let hunter = |max_age,
                      breeding_age,
                      breeding_probability,
                      max_litter_size,
                      prey_value,
                      diet: &[(SpeciesId, i32)]| SpeciesParams {
            max_age,
            breeding_age,
            breeding_probability,
            max_litter_size,
            prey_value,
            behavior: BehaviorKind::Hunter,
            diet: diet.iter().copied().collect(),
            fishing_probability: None,
        };

        let mouse = grazer(30, 3, 0.20, 6, 5);
        let rabbit = grazer(50, 5, 0.15, 5, 7);
        let fox = hunter(
            150,
            10,
            0.09,
            3,
            8,
            &[(SpeciesId::Rabbit, 7), (SpeciesId::Mouse, 5)],
        );
        let snake = hunter(
            80,
            8,
            0.10,
            4,
            6,
            &[(SpeciesId::Mouse, 5), (SpeciesId::Rabbit, 7)],
        );
        let hawk = hunter(70, 5, 0.08, 3, 8, &[(SpeciesId::Mouse, 5)]);
        let mut bear = hunter(
            120,
            10,
            0.05,
            2,
            30,
            &[
                (SpeciesId::Fox, 8),
                (SpeciesId::Snake, 6),
                (SpeciesId::Rabbit, 7),
            ],
        );
        bear.fishing_probability = Some(0.3);

        Self {
            params: [mouse, rabbit, fox, snake, hawk, bear],
        }
    }
}
