pub mod animal;
pub mod climate;
pub mod engine;
pub mod field;
pub mod populate;
pub mod rng;
pub mod scenario;
pub mod snapshot;
pub mod species;
pub mod stats;
pub mod terrain;
pub mod vegetation;
pub mod web;

pub use engine::{Engine, EngineSettings, TickFrame, TickSummary};
pub use scenario::{Scenario, ScenarioLoader};
