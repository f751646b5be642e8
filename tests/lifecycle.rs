use cerrado::animal::{self, Animal, AnimalId, Roster};
use cerrado::field::{Field, Location, Obstacle, Occupant};
use cerrado::species::{SpeciesId, SpeciesTable, DEFAULT_FOOD_LEVEL};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn place(field: &mut Field, roster: &mut Roster, species: SpeciesId, loc: Location) -> AnimalId {
    let mut animal = Animal::newborn(species);
    animal.set_location(loc);
    let id = roster.insert(animal);
    field.place(Occupant::Animal(id), loc);
    id
}

/// One engine-style tick without climate: stamp the obstacles, carry the
/// vegetation over, grow once, let everyone act, merge births, sweep the
/// dead, swap buffers.
fn run_tick(
    current: &mut Field,
    next: &mut Field,
    roster: &mut Roster,
    table: &SpeciesTable,
    obstacles: &[(Obstacle, Location)],
    rng: &mut ChaCha8Rng,
) {
    for &(obstacle, loc) in obstacles {
        next.place(Occupant::Obstacle(obstacle), loc);
    }
    next.copy_vegetation_from(current);
    next.grow_vegetation();

    let order: Vec<AnimalId> = roster.order().to_vec();
    let mut births = Vec::new();
    for id in order {
        if roster.is_alive(id) {
            animal::act(id, roster, table, current, next, &mut births, rng);
        }
    }
    roster.merge_births(&births);
    roster.sweep_dead();
    std::mem::swap(current, next);
    next.clear();
}

#[test]
fn old_age_is_always_fatal() {
    let mut table = SpeciesTable::default();
    table.params_mut(SpeciesId::Mouse).max_age = 4;
    table.params_mut(SpeciesId::Mouse).breeding_probability = 0.0;

    let mut current = Field::new(8, 8);
    let mut next = Field::new(8, 8);
    let mut roster = Roster::new();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mouse = place(&mut current, &mut roster, SpeciesId::Mouse, Location::new(4, 4));

    // Grazing on mature cells keeps hunger away, so age is the only
    // remaining death cause.
    for _ in 0..4 {
        run_tick(&mut current, &mut next, &mut roster, &table, &[], &mut rng);
        assert!(roster.is_alive(mouse));
    }
    run_tick(&mut current, &mut next, &mut roster, &table, &[], &mut rng);
    assert!(!roster.is_alive(mouse));
}

#[test]
fn a_hunter_with_no_prey_starves_on_schedule() {
    let table = SpeciesTable::default();
    let mut current = Field::new(5, 5);
    let mut next = Field::new(5, 5);
    let mut roster = Roster::new();
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let fox = place(&mut current, &mut roster, SpeciesId::Fox, Location::new(2, 2));

    for tick in 1..DEFAULT_FOOD_LEVEL {
        run_tick(&mut current, &mut next, &mut roster, &table, &[], &mut rng);
        assert!(roster.is_alive(fox), "still alive at tick {tick}");
    }
    run_tick(&mut current, &mut next, &mut roster, &table, &[], &mut rng);
    assert!(!roster.is_alive(fox));
}

#[test]
fn rainy_regrowth_takes_half_the_ticks() {
    let mut field = Field::new(1, 1);
    let loc = Location::new(0, 0);
    field.harvest_vegetation(loc);

    let mut ticks = 0;
    while !field.vegetation_mature(loc) {
        // Two growth passes per tick is exactly what Rainy weather does.
        field.grow_vegetation();
        field.grow_vegetation();
        ticks += 1;
    }
    assert_eq!(ticks, 5);
}

#[test]
fn hunting_kills_feeds_and_relocates_in_one_step() {
    let table = SpeciesTable::default();
    let mut current = Field::new(3, 3);
    let mut next = Field::new(3, 3);
    let mut roster = Roster::new();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let hawk = place(&mut current, &mut roster, SpeciesId::Hawk, Location::new(1, 1));
    let mouse = place(&mut current, &mut roster, SpeciesId::Mouse, Location::new(1, 0));

    run_tick(&mut current, &mut next, &mut roster, &table, &[], &mut rng);

    assert!(!roster.is_alive(mouse));
    let hawk = roster.get(hawk).expect("hawk survived the tick");
    assert_eq!(hawk.food_level(), 5);
    assert_eq!(hawk.location(), Some(Location::new(1, 0)));
}

#[test]
fn eligible_parent_with_room_bears_a_litter_every_tick() {
    let mut table = SpeciesTable::default();
    table.params_mut(SpeciesId::Rabbit).breeding_age = 1;
    table.params_mut(SpeciesId::Rabbit).breeding_probability = 1.0;
    let max_litter = table.params(SpeciesId::Rabbit).max_litter_size as usize;

    let mut current = Field::new(5, 5);
    let mut next = Field::new(5, 5);
    let mut roster = Roster::new();
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    place(&mut current, &mut roster, SpeciesId::Rabbit, Location::new(2, 2));

    run_tick(&mut current, &mut next, &mut roster, &table, &[], &mut rng);

    let cubs = roster.len() - 1;
    assert!(
        (1..=max_litter).contains(&cubs),
        "expected 1..={max_litter} cubs, got {cubs}"
    );
}

#[test]
fn an_enclosed_parent_falls_back_to_its_own_cell_then_overcrowds() {
    let mut table = SpeciesTable::default();
    table.params_mut(SpeciesId::Rabbit).breeding_age = 1;
    table.params_mut(SpeciesId::Rabbit).breeding_probability = 1.0;

    let mut current = Field::new(3, 3);
    let mut next = Field::new(3, 3);
    let mut roster = Roster::new();
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let center = Location::new(1, 1);
    let walls: Vec<(Obstacle, Location)> = current
        .locations()
        .filter(|&loc| loc != center)
        .map(|loc| (Obstacle::Rock, loc))
        .collect();
    for &(obstacle, loc) in &walls {
        current.place(Occupant::Obstacle(obstacle), loc);
    }
    let parent = place(&mut current, &mut roster, SpeciesId::Rabbit, center);

    run_tick(&mut current, &mut next, &mut roster, &table, &walls, &mut rng);

    // Exactly one cub lands on the parent's own cell; every later litter
    // slot finds nothing free. The parent then has nowhere to move.
    assert!(!roster.is_alive(parent));
    assert_eq!(roster.len(), 1);
}

#[test]
fn a_fully_sealed_parent_bears_nothing() {
    let mut table = SpeciesTable::default();
    table.params_mut(SpeciesId::Rabbit).breeding_age = 1;
    table.params_mut(SpeciesId::Rabbit).breeding_probability = 1.0;

    let mut current = Field::new(3, 3);
    let mut next = Field::new(3, 3);
    let mut roster = Roster::new();
    let mut rng = ChaCha8Rng::seed_from_u64(10);
    let center = Location::new(1, 1);
    // Seal the write buffer completely, own cell included, as happens
    // when contention fills the whole neighborhood.
    let walls: Vec<(Obstacle, Location)> = current
        .locations()
        .map(|loc| (Obstacle::Rock, loc))
        .collect();
    for &(obstacle, loc) in &walls {
        if loc != center {
            current.place(Occupant::Obstacle(obstacle), loc);
        }
    }
    let parent = place(&mut current, &mut roster, SpeciesId::Rabbit, center);

    run_tick(&mut current, &mut next, &mut roster, &table, &walls, &mut rng);

    assert!(!roster.is_alive(parent));
    assert_eq!(roster.len(), 0, "a successful roll still yields no cubs");
}

#[test]
fn bears_fish_from_riverbanks() {
    let mut table = SpeciesTable::default();
    table.params_mut(SpeciesId::Bear).fishing_probability = Some(1.0);

    let mut current = Field::new(2, 2);
    let mut next = Field::new(2, 2);
    let mut roster = Roster::new();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let river = (Obstacle::River, Location::new(0, 0));
    current.place(Occupant::Obstacle(river.0), river.1);
    let bear = place(&mut current, &mut roster, SpeciesId::Bear, Location::new(0, 1));

    run_tick(&mut current, &mut next, &mut roster, &table, &[river], &mut rng);

    // Hunger took one point, then the catch restored the default level.
    let bear = roster.get(bear).expect("bear survived the tick");
    assert_eq!(bear.food_level(), DEFAULT_FOOD_LEVEL);
}
