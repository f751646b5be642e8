use std::collections::HashMap;

use rand::Rng;

use crate::field::{Field, Location, Occupant};
use crate::species::{
    BehaviorKind, SpeciesId, SpeciesParams, SpeciesTable, DEFAULT_FOOD_LEVEL, GRAZER_SATIATION_CAP,
};

/// Handle to a roster entry. Grid cells store these rather than animal
/// state, so no entity ever holds a direct reference to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimalId(u64);

/// One entity. Behavior lives in the free functions below, parameterized
/// by the species table; this struct is only the life-cycle state.
#[derive(Debug, Clone)]
pub struct Animal {
    species: SpeciesId,
    alive: bool,
    age: u32,
    food_level: i32,
    location: Option<Location>,
}

impl Animal {
    /// A cub: age zero, default food level.
    pub fn newborn(species: SpeciesId) -> Self {
        Self {
            species,
            alive: true,
            age: 0,
            food_level: DEFAULT_FOOD_LEVEL,
            location: None,
        }
    }

    /// A member of the established starting population: randomized age and
    /// food level, as if the simulation had already been running.
    pub fn established(species: SpeciesId, params: &SpeciesParams, rng: &mut impl Rng) -> Self {
        Self {
            species,
            alive: true,
            age: rng.gen_range(0..params.max_age),
            food_level: rng.gen_range(0..DEFAULT_FOOD_LEVEL),
            location: None,
        }
    }

    pub fn species(&self) -> SpeciesId {
        self.species
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn food_level(&self) -> i32 {
        self.food_level
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn set_location(&mut self, loc: Location) {
        self.location = Some(loc);
    }

    /// Marks the animal dead. Food is zeroed so the dead state carries no
    /// residual energy.
    pub fn die(&mut self) {
        self.alive = false;
        self.food_level = 0;
    }

    fn on_field(&self) -> Location {
        self.location.expect("an acting animal has been placed on the field")
    }
}

/// Id-keyed animal store plus the activation order for the tick loop.
/// Mid-tick births enter the store immediately (their id must occupy a
/// field cell) but only join the order when the engine merges them.
#[derive(Default)]
pub struct Roster {
    next_id: u64,
    animals: HashMap<AnimalId, Animal>,
    order: Vec<AnimalId>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an animal without scheduling it. Used for births that are
    /// merged into the order at the end of the tick.
    pub fn spawn(&mut self, animal: Animal) -> AnimalId {
        let id = AnimalId(self.next_id);
        self.next_id += 1;
        self.animals.insert(id, animal);
        id
    }

    /// Stores an animal and schedules it immediately.
    pub fn insert(&mut self, animal: Animal) -> AnimalId {
        let id = self.spawn(animal);
        self.order.push(id);
        id
    }

    pub fn merge_births(&mut self, births: &[AnimalId]) {
        self.order.extend_from_slice(births);
    }

    pub fn get(&self, id: AnimalId) -> Option<&Animal> {
        self.animals.get(&id)
    }

    pub fn get_mut(&mut self, id: AnimalId) -> Option<&mut Animal> {
        self.animals.get_mut(&id)
    }

    pub fn is_alive(&self, id: AnimalId) -> bool {
        self.animals.get(&id).map(Animal::is_alive).unwrap_or(false)
    }

    pub fn order(&self) -> &[AnimalId] {
        &self.order
    }

    pub fn shuffle_order(&mut self, rng: &mut impl Rng) {
        use rand::seq::SliceRandom;
        self.order.shuffle(rng);
    }

    /// Drops everything that died this tick from both the store and the
    /// activation order.
    pub fn sweep_dead(&mut self) {
        self.animals.retain(|_, animal| animal.is_alive());
        let animals = &self.animals;
        self.order.retain(|id| animals.contains_key(id));
    }

    pub fn len(&self) -> usize {
        self.animals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animals.is_empty()
    }

    pub fn clear(&mut self) {
        self.animals.clear();
        self.order.clear();
    }

    fn take(&mut self, id: AnimalId) -> Option<Animal> {
        self.animals.remove(&id)
    }

    fn put_back(&mut self, id: AnimalId, animal: Animal) {
        self.animals.insert(id, animal);
    }
}

/// Runs one animal's full tick: age, hunger, feeding, reproduction,
/// movement, and the fishing sub-step for species that have it. Reads the
/// world as it was from `current`; every effect lands in `next`.
pub fn act(
    id: AnimalId,
    roster: &mut Roster,
    table: &SpeciesTable,
    current: &Field,
    next: &mut Field,
    births: &mut Vec<AnimalId>,
    rng: &mut impl Rng,
) {
    let Some(mut animal) = roster.take(id) else {
        return;
    };
    let params = table.params(animal.species);

    animal.age += 1;
    if animal.age > params.max_age {
        animal.die();
    }

    if animal.is_alive() {
        animal.food_level -= 1;
        if animal.food_level <= 0 {
            animal.die();
        }
    }

    let mut hunt_target = None;
    if animal.is_alive() {
        match params.behavior {
            BehaviorKind::Grazer => graze(&mut animal, next),
            BehaviorKind::Hunter => {
                hunt_target = hunt(&mut animal, params, roster, current, rng);
            }
        }
    }

    if animal.is_alive() {
        reproduce(&animal, params, roster, next, births, rng);
    }

    if animal.is_alive() {
        relocate(id, &mut animal, hunt_target, next, rng);
    }

    if animal.is_alive() {
        if let Some(probability) = params.fishing_probability {
            fish(&mut animal, probability, current, rng);
        }
    }

    roster.put_back(id, animal);
}

/// Harvests the write-field vegetation at the animal's own cell, so the
/// graze survives the buffer swap. Food saturates at the grazer cap.
fn graze(animal: &mut Animal, next: &mut Field) {
    let food = next.harvest_vegetation(animal.on_field());
    if food > 0 {
        animal.food_level = (animal.food_level + food).min(GRAZER_SATIATION_CAP);
    }
}

/// Single randomized scan of the read-field neighborhood. The first live
/// diet match is consumed on the spot and its cell becomes the movement
/// target, so a kill and the pounce are one step.
fn hunt(
    animal: &mut Animal,
    params: &SpeciesParams,
    roster: &mut Roster,
    current: &Field,
    rng: &mut impl Rng,
) -> Option<Location> {
    for neighbor in current.adjacent_locations(animal.on_field(), rng) {
        let Some(Occupant::Animal(prey_id)) = current.object_at(neighbor) else {
            continue;
        };
        let Some(prey) = roster.get_mut(prey_id) else {
            continue;
        };
        if !prey.is_alive() {
            continue;
        }
        if let Some(&restored) = params.diet.get(&prey.species) {
            prey.die();
            animal.food_level = restored;
            return Some(neighbor);
        }
    }
    None
}

fn reproduce(
    parent: &Animal,
    params: &SpeciesParams,
    roster: &mut Roster,
    next: &mut Field,
    births: &mut Vec<AnimalId>,
    rng: &mut impl Rng,
) {
    if parent.age < params.breeding_age {
        return;
    }
    if rng.gen::<f64>() > params.breeding_probability {
        return;
    }
    let litter = rng.gen_range(1..=params.max_litter_size);
    for _ in 0..litter {
        // No free cell means this cub simply does not materialize.
        let Some(free) = next.adjacent_free(parent.on_field(), rng) else {
            continue;
        };
        let mut cub = Animal::newborn(parent.species);
        cub.set_location(free);
        let cub_id = roster.spawn(cub);
        next.place(Occupant::Animal(cub_id), free);
        births.push(cub_id);
    }
}

/// Directed move onto a fresh kill, otherwise a free wander. No room
/// anywhere in the neighborhood is an overcrowding death.
fn relocate(
    id: AnimalId,
    animal: &mut Animal,
    hunt_target: Option<Location>,
    next: &mut Field,
    rng: &mut impl Rng,
) {
    let destination = hunt_target.or_else(|| next.adjacent_free(animal.on_field(), rng));
    match destination {
        Some(dest) => {
            animal.set_location(dest);
            next.place(Occupant::Animal(id), dest);
        }
        None => animal.die(),
    }
}

/// One fishing attempt per tick: the first river in the (shuffled)
/// neighborhood is tried, successful or not, and a success restores the
/// default food level.
fn fish(animal: &mut Animal, probability: f64, current: &Field, rng: &mut impl Rng) {
    for neighbor in current.adjacent_locations(animal.on_field(), rng) {
        if let Some(Occupant::Obstacle(obstacle)) = current.object_at(neighbor) {
            if obstacle.fishable() {
                if rng.gen::<f64>() < probability {
                    animal.food_level = DEFAULT_FOOD_LEVEL;
                }
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn dying_zeroes_food() {
        let mut animal = Animal::newborn(SpeciesId::Rabbit);
        assert_eq!(animal.food_level(), DEFAULT_FOOD_LEVEL);
        animal.die();
        assert!(!animal.is_alive());
        assert_eq!(animal.food_level(), 0);
    }

    #[test]
    fn established_animals_start_part_way_through_life() {
        let table = SpeciesTable::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..100 {
            let animal =
                Animal::established(SpeciesId::Mouse, table.params(SpeciesId::Mouse), &mut rng);
            assert!(animal.age() < table.params(SpeciesId::Mouse).max_age);
            assert!(animal.food_level() < DEFAULT_FOOD_LEVEL);
        }
    }

    #[test]
    fn sweep_drops_dead_from_store_and_order() {
        let mut roster = Roster::new();
        let a = roster.insert(Animal::newborn(SpeciesId::Mouse));
        let b = roster.insert(Animal::newborn(SpeciesId::Fox));
        roster.get_mut(a).unwrap().die();

        roster.sweep_dead();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.order(), &[b]);
        assert!(roster.get(a).is_none());
    }
}
