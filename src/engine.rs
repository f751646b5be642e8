use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::animal::{self, AnimalId, Roster};
use crate::climate::{Climate, ClimateState};
use crate::field::Field;
use crate::populate::{populate, SpawnRates};
use crate::rng::RngManager;
use crate::scenario::Scenario;
use crate::snapshot::SnapshotWriter;
use crate::species::{SpeciesId, SpeciesTable};
use crate::stats::{self, FieldView};
use crate::terrain::ObstacleMap;

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub snapshot_interval_ticks: u64,
    pub snapshot_dir: PathBuf,
}

impl EngineSettings {
    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self {
            scenario_name: scenario.name.clone(),
            seed: scenario.seed,
            snapshot_interval_ticks: scenario.snapshot_interval_ticks,
            snapshot_dir: PathBuf::from("snapshots"),
        }
    }

    pub fn with_snapshot_dir(mut self, dir: PathBuf) -> Self {
        self.snapshot_dir = dir;
        self
    }

    pub fn with_snapshot_interval(mut self, interval_ticks: u64) -> Self {
        self.snapshot_interval_ticks = interval_ticks;
        self
    }
}

/// What collaborators see of one completed tick. Serializable so the same
/// frame feeds hooks, snapshots, and the web stream.
#[derive(Debug, Clone, Serialize)]
pub struct TickFrame {
    pub scenario: String,
    pub tick: u64,
    pub climate: ClimateState,
    pub population: BTreeMap<SpeciesId, u64>,
    pub viable: bool,
    pub grid: Vec<String>,
}

#[derive(Debug)]
pub struct TickSummary {
    pub frame: TickFrame,
    pub births: usize,
    pub snapshot_path: Option<PathBuf>,
}

/// Owns the two field buffers, the roster, climate, and the seeded RNG,
/// and advances them one synchronized tick at a time. Reads go against
/// `field`, writes against `next_field`, and the buffers swap at tick end.
pub struct Engine {
    settings: EngineSettings,
    species: SpeciesTable,
    spawn_rates: SpawnRates,
    obstacles: ObstacleMap,
    rng: RngManager,
    field: Field,
    next_field: Field,
    roster: Roster,
    climate: Climate,
    tick: u64,
    paused: bool,
    snapshots: SnapshotWriter,
}

impl Engine {
    pub fn new(scenario: &Scenario, settings: EngineSettings) -> Self {
        let (mut depth, mut width) = scenario.field.normalized();
        let obstacles = match &scenario.map_file {
            Some(path) => match ObstacleMap::load(path) {
                Ok(map) => {
                    // The map file is the authority on dimensions.
                    depth = map.depth();
                    width = map.width();
                    map
                }
                Err(err) => {
                    eprintln!("obstacle map ignored, running open terrain: {err}");
                    ObstacleMap::open_terrain(depth, width)
                }
            },
            None => ObstacleMap::open_terrain(depth, width),
        };

        let snapshots = SnapshotWriter::new(
            settings.snapshot_dir.clone(),
            settings.snapshot_interval_ticks,
        );
        let mut engine = Self {
            rng: RngManager::new(settings.seed),
            settings,
            species: SpeciesTable::default(),
            spawn_rates: scenario.spawn.to_rates(),
            obstacles,
            field: Field::new(depth, width),
            next_field: Field::new(depth, width),
            roster: Roster::new(),
            climate: Climate::new(scenario.climate.period_ticks),
            tick: 0,
            paused: false,
            snapshots,
        };
        engine.seed_population();
        engine
    }

    fn seed_population(&mut self) {
        self.obstacles.stamp(&mut self.field);
        let mut rng = self.rng.stream("populate");
        populate(
            &mut self.field,
            &mut self.roster,
            &self.species,
            &self.spawn_rates,
            &mut rng,
        );
    }

    /// Advances exactly one tick and reports it.
    pub fn step(&mut self) -> Result<TickSummary> {
        self.tick += 1;

        // Prepare the write buffer: re-stamp the static obstacles, carry
        // the vegetation state over, then run this tick's growth.
        self.obstacles.stamp(&mut self.next_field);
        self.next_field.copy_vegetation_from(&self.field);
        {
            let mut climate_rng = self.rng.stream("climate");
            self.climate.update(&mut climate_rng);
        }
        for _ in 0..self.climate.growth_passes() {
            self.next_field.grow_vegetation();
        }

        // Every live animal acts against (read field, write field).
        let order: Vec<AnimalId> = self.roster.order().to_vec();
        let mut births: Vec<AnimalId> = Vec::new();
        {
            let mut animal_rng = self.rng.stream("animals");
            for id in order {
                if self.roster.is_alive(id) {
                    animal::act(
                        id,
                        &mut self.roster,
                        &self.species,
                        &self.field,
                        &mut self.next_field,
                        &mut births,
                        &mut animal_rng,
                    );
                }
            }
        }

        let born = births.len();
        self.roster.merge_births(&births);
        self.roster.sweep_dead();

        std::mem::swap(&mut self.field, &mut self.next_field);
        self.next_field.clear();

        let frame = self.frame();
        let snapshot_path = self.snapshots.maybe_write(&frame)?;
        Ok(TickSummary {
            frame,
            births: born,
            snapshot_path,
        })
    }

    /// Runs up to `ticks` ticks, stopping early once the ecosystem is no
    /// longer viable.
    pub fn run(&mut self, ticks: u64) -> Result<()> {
        self.run_with_hook(ticks, |_| {})
    }

    /// Like [`Engine::run`], invoking the hook with every tick's frame.
    pub fn run_with_hook(&mut self, ticks: u64, mut hook: impl FnMut(TickFrame)) -> Result<()> {
        for _ in 0..ticks {
            let summary = self.step()?;
            let viable = summary.frame.viable;
            hook(summary.frame);
            if !viable {
                break;
            }
        }
        Ok(())
    }

    fn frame(&self) -> TickFrame {
        let view = self.view();
        let population = stats::census(&view);
        let viable = population.values().filter(|&&count| count > 0).count() > 1;
        TickFrame {
            scenario: self.settings.scenario_name.clone(),
            tick: self.tick,
            climate: self.climate.state(),
            population,
            viable,
            grid: stats::render_rows(&view),
        }
    }

    pub fn view(&self) -> FieldView<'_> {
        FieldView::new(&self.field, &self.roster)
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn scenario_name(&self) -> &str {
        &self.settings.scenario_name
    }

    pub fn total_population(&self) -> usize {
        self.roster.len()
    }

    pub fn latest_frame(&self) -> TickFrame {
        self.frame()
    }

    // Control signals are honored between ticks only; the driver checks
    // `is_paused` before each `step` call.

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Back to tick zero: fresh buffers, reseeded RNG, reset climate, and
    /// a new starting population. The engine comes back paused, waiting
    /// for a resume. A reset run replays the original exactly.
    pub fn reset(&mut self) {
        self.tick = 0;
        self.rng = RngManager::new(self.settings.seed);
        self.climate.reset();
        self.roster.clear();
        let depth = self.field.depth();
        let width = self.field.width();
        self.field = Field::new(depth, width);
        self.next_field = Field::new(depth, width);
        self.seed_population();
        self.paused = true;
    }
}
