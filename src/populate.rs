use rand::Rng;

use crate::animal::{Animal, Roster};
use crate::field::{Field, Occupant};
use crate::species::{SpeciesId, SpeciesTable};

/// Order in which species are rolled for each empty cell. The first
/// successful roll wins the cell, so earlier entries are favored.
pub const SPAWN_PRIORITY: [SpeciesId; 6] = [
    SpeciesId::Fox,
    SpeciesId::Rabbit,
    SpeciesId::Mouse,
    SpeciesId::Snake,
    SpeciesId::Hawk,
    SpeciesId::Bear,
];

/// Per-species spawn probability for the initial population scan.
#[derive(Debug, Clone)]
pub struct SpawnRates {
    rates: [f64; 6],
}

impl SpawnRates {
    pub fn rate(&self, species: SpeciesId) -> f64 {
        self.rates[species as usize]
    }

    pub fn set_rate(&mut self, species: SpeciesId, rate: f64) {
        self.rates[species as usize] = rate;
    }
}

impl Default for SpawnRates {
    fn default() -> Self {
        let mut rates = Self { rates: [0.0; 6] };
        rates.set_rate(SpeciesId::Mouse, 0.08);
        rates.set_rate(SpeciesId::Rabbit, 0.08);
        rates.set_rate(SpeciesId::Fox, 0.02);
        rates.set_rate(SpeciesId::Snake, 0.03);
        rates.set_rate(SpeciesId::Hawk, 0.02);
        rates.set_rate(SpeciesId::Bear, 0.01);
        rates
    }
}

/// Scatters the established starting population over the empty cells, one
/// independent roll per species per cell in priority order, then shuffles
/// the activation order so spawn order carries no tick-processing bias.
pub fn populate(
    field: &mut Field,
    roster: &mut Roster,
    table: &SpeciesTable,
    rates: &SpawnRates,
    rng: &mut impl Rng,
) {
    let cells: Vec<_> = field.locations().collect();
    for loc in cells {
        if !field.is_free(loc) {
            continue;
        }
        for species in SPAWN_PRIORITY {
            if rng.gen::<f64>() <= rates.rate(species) {
                let mut animal = Animal::established(species, table.params(species), rng);
                animal.set_location(loc);
                let id = roster.insert(animal);
                field.place(Occupant::Animal(id), loc);
                break;
            }
        }
    }
    roster.shuffle_order(rng);
}
