//! Request and response shapes for callers of the calculator

use serde::{Deserialize, Serialize};

use crate::calculator::{self, ElectricitySelection, WorkerMap};
use crate::catalog::Catalog;
use crate::demand::{self, DemandMap, DemandProfiles, DemandSelection, Populations};
use crate::error::Result;
use crate::models::{ProductionRecipe, ResolvedEntry};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    #[serde(default)]
    pub residents: Populations,
    #[serde(default)]
    pub demands: DemandSelection,
    #[serde(default)]
    pub uses_electricity: ElectricitySelection,
    #[serde(default)]
    pub manual_demand: DemandMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeededProduction {
    pub recipe_name: String,
    pub instance_count: f64,
    pub powered_by_electricity: bool,
}

impl From<&ResolvedEntry<'_>> for NeededProduction {
    fn from(entry: &ResolvedEntry<'_>) -> Self {
        NeededProduction {
            recipe_name: entry.recipe.name.clone(),
            instance_count: entry.instance_count,
            powered_by_electricity: entry.powered_by_electricity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResponse {
    pub demand: DemandMap,
    pub needed_productions: Vec<NeededProduction>,
    pub needed_worker: WorkerMap,
}

/// Run the full pipeline: population needs, manual demand, chain, workers
pub fn calculate(
    catalog: &Catalog,
    profiles: &DemandProfiles,
    request: &CalculationRequest,
) -> Result<CalculationResponse> {
    let derived = demand::aggregate_demand(profiles, &request.residents, &request.demands)?;
    let demand = demand::merge_demand(derived, &request.manual_demand)?;

    let entries = calculator::calculate_production_chain(catalog, &demand, &request.uses_electricity)?;
    let needed_worker = calculator::calculate_needed_workers(&entries);

    tracing::info!(
        products = demand.len(),
        productions = entries.len(),
        workers = needed_worker.values().sum::<f64>(),
        "calculated production chain"
    );

    Ok(CalculationResponse {
        needed_productions: entries.iter().map(NeededProduction::from).collect(),
        demand,
        needed_worker,
    })
}

/// Full, unfiltered recipe table
pub fn productions_snapshot(catalog: &Catalog) -> &[ProductionRecipe] {
    catalog.recipes()
}

/// Full, unfiltered demand profile table, including resident types without needs
pub fn demand_snapshot(profiles: &DemandProfiles) -> DemandProfiles {
    profiles.clone()
}
