pub mod agents;
pub mod engine;
pub mod error;
pub mod rng;
pub mod scenario;
pub mod snapshot;
pub mod spatial;
pub mod terrain;
pub mod world;

pub use engine::{Engine, EngineBuilder, EngineSettings, RunSummary};
pub use error::WorldError;
pub use scenario::{Scenario, ScenarioLoader};
pub use world::{World, WorldSettings, WorldSnapshot};
