//! Anno 1800 production calculator
//!
//! Turns a population's consumption into the production facilities and
//! workers needed to supply it.

pub mod calculator;
pub mod catalog;
pub mod db;
pub mod demand;
pub mod error;
pub mod models;
pub mod parse;
pub mod request;

pub use calculator::{ElectricitySelection, WorkerMap};
pub use catalog::Catalog;
pub use demand::{DemandMap, DemandProfiles, DemandSelection, Populations};
pub use error::CalcError;
pub use models::{Product, ProductionRecipe, ResidentType, ResolvedEntry, WorkerCategory};
pub use request::{CalculationRequest, CalculationResponse};
