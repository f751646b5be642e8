use std::collections::BTreeMap;

use crate::animal::Roster;
use crate::field::{Field, Location, Obstacle, Occupant};
use crate::species::SpeciesId;

/// Read-only view over one field buffer, resolved against the roster.
/// This is the only surface the engine exposes to collaborators: grid
/// dimensions, occupant lookups, and vegetation maturity.
pub struct FieldView<'a> {
    field: &'a Field,
    roster: &'a Roster,
}

impl<'a> FieldView<'a> {
    pub fn new(field: &'a Field, roster: &'a Roster) -> Self {
        Self { field, roster }
    }

    pub fn depth(&self) -> usize {
        self.field.depth()
    }

    pub fn width(&self) -> usize {
        self.field.width()
    }

    /// Species of the live animal at `loc`, if any. Cells referencing an
    /// animal that died mid-tick read as empty.
    pub fn species_at(&self, loc: Location) -> Option<SpeciesId> {
        match self.field.object_at(loc)? {
            Occupant::Animal(id) => {
                let animal = self.roster.get(id)?;
                animal.is_alive().then(|| animal.species())
            }
            Occupant::Obstacle(_) => None,
        }
    }

    pub fn obstacle_at(&self, loc: Location) -> Option<Obstacle> {
        match self.field.object_at(loc)? {
            Occupant::Obstacle(obstacle) => Some(obstacle),
            Occupant::Animal(_) => None,
        }
    }

    pub fn vegetation_mature(&self, loc: Location) -> bool {
        self.field.vegetation_mature(loc)
    }
}

/// Live head-count per species across the whole grid. Species with no
/// members are present with a zero count so downstream consumers see a
/// stable key set.
pub fn census(view: &FieldView<'_>) -> BTreeMap<SpeciesId, u64> {
    let mut counts: BTreeMap<SpeciesId, u64> =
        SpeciesId::ALL.iter().map(|&id| (id, 0)).collect();
    for row in 0..view.depth() {
        for col in 0..view.width() {
            if let Some(species) = view.species_at(Location::new(row, col)) {
                *counts.entry(species).or_insert(0) += 1;
            }
        }
    }
    counts
}

/// The ecosystem is worth simulating while more than one species still has
/// living members.
pub fn is_viable(view: &FieldView<'_>) -> bool {
    census(view).values().filter(|&&count| count > 0).count() > 1
}

/// Character rendering of the grid, one string per row: obstacles first
/// (`~` river, `#` rock), then live animals by species glyph, then
/// vegetation (`,` mature, `.` growing).
pub fn render_rows(view: &FieldView<'_>) -> Vec<String> {
    (0..view.depth())
        .map(|row| {
            (0..view.width())
                .map(|col| {
                    let loc = Location::new(row, col);
                    match view.obstacle_at(loc) {
                        Some(Obstacle::River) => '~',
                        Some(Obstacle::Rock) => '#',
                        None => match view.species_at(loc) {
                            Some(species) => species.glyph(),
                            None if view.vegetation_mature(loc) => ',',
                            None => '.',
                        },
                    }
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animal::Animal;

    fn place_animal(field: &mut Field, roster: &mut Roster, species: SpeciesId, loc: Location) {
        let mut animal = Animal::newborn(species);
        animal.set_location(loc);
        let id = roster.insert(animal);
        field.place(Occupant::Animal(id), loc);
    }

    #[test]
    fn lone_species_is_not_viable() {
        let mut field = Field::new(2, 2);
        let mut roster = Roster::new();
        place_animal(&mut field, &mut roster, SpeciesId::Fox, Location::new(0, 0));
        place_animal(&mut field, &mut roster, SpeciesId::Fox, Location::new(1, 1));

        let view = FieldView::new(&field, &roster);
        assert!(!is_viable(&view));
        assert_eq!(census(&view)[&SpeciesId::Fox], 2);
    }

    #[test]
    fn predator_and_prey_keep_the_run_viable() {
        let mut field = Field::new(2, 2);
        let mut roster = Roster::new();
        place_animal(&mut field, &mut roster, SpeciesId::Fox, Location::new(0, 0));
        place_animal(&mut field, &mut roster, SpeciesId::Rabbit, Location::new(0, 1));

        assert!(is_viable(&FieldView::new(&field, &roster)));
    }

    #[test]
    fn dead_animals_read_as_empty_cells() {
        let mut field = Field::new(1, 2);
        let mut roster = Roster::new();
        let mut animal = Animal::newborn(SpeciesId::Hawk);
        animal.set_location(Location::new(0, 0));
        let id = roster.insert(animal);
        field.place(Occupant::Animal(id), Location::new(0, 0));
        roster.get_mut(id).unwrap().die();

        let view = FieldView::new(&field, &roster);
        assert_eq!(view.species_at(Location::new(0, 0)), None);
        assert_eq!(census(&view)[&SpeciesId::Hawk], 0);
    }

    #[test]
    fn render_prefers_obstacles_over_vegetation() {
        let mut field = Field::new(1, 3);
        let mut roster = Roster::new();
        field.place(Occupant::Obstacle(Obstacle::River), Location::new(0, 0));
        field.harvest_vegetation(Location::new(0, 2));
        place_animal(&mut field, &mut roster, SpeciesId::Bear, Location::new(0, 1));

        let rows = render_rows(&FieldView::new(&field, &roster));
        assert_eq!(rows, vec!["~B.".to_string()]);
    }
}
