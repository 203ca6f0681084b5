//! Production chain calculator logic

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::catalog::Catalog;
use crate::demand::DemandMap;
use crate::error::Result;
use crate::models::{ProductionRecipe, ResolvedEntry, WorkerCategory};

/// Facility names the caller wants to run on electricity
pub type ElectricitySelection = BTreeSet<String>;

pub type WorkerMap = BTreeMap<WorkerCategory, f64>;

/// Calculate the facilities needed to meet `demand`.
///
/// Every visited recipe yields one entry, parents before their prerequisites.
/// A recipe reached along several paths shows up once per path; entries are
/// never merged. Resolution fails as a whole if any demanded product has no
/// producer.
pub fn calculate_production_chain<'a>(
    catalog: &'a Catalog,
    demand: &DemandMap,
    electricity: &ElectricitySelection,
) -> Result<Vec<ResolvedEntry<'a>>> {
    warn_ignored_electricity(catalog, electricity);

    let mut entries = Vec::new();
    for (&product, &rate) in demand {
        let recipe = catalog.producer_for(product)?;
        calculate_chain_recursive(catalog, recipe, rate, electricity, 0, &mut entries)?;
    }
    Ok(entries)
}

fn calculate_chain_recursive<'a>(
    catalog: &'a Catalog,
    recipe: &'a ProductionRecipe,
    rate: f64,
    electricity: &ElectricitySelection,
    depth: usize,
    entries: &mut Vec<ResolvedEntry<'a>>,
) -> Result<()> {
    let boosted = recipe.improved_by_electricity && electricity.iter().any(|s| recipe.is_named(s));
    let multiplier = if boosted { 2.0 } else { 1.0 };

    let instance_count = rate / (recipe.amount_per_minute * multiplier);
    let powered_by_electricity = boosted || recipe.requires_electricity;

    tracing::debug!(
        recipe = %recipe.key,
        rate,
        instance_count,
        powered_by_electricity,
        depth,
        "resolved production"
    );

    entries.push(ResolvedEntry {
        recipe,
        instance_count,
        powered_by_electricity,
        depth,
    });

    // Upstream demand follows the unboosted rate of this facility
    let upstream_rate = instance_count * recipe.amount_per_minute;
    for prerequisite in catalog.prerequisites(recipe)? {
        calculate_chain_recursive(catalog, prerequisite, upstream_rate, electricity, depth + 1, entries)?;
    }
    Ok(())
}

fn warn_ignored_electricity(catalog: &Catalog, electricity: &ElectricitySelection) {
    for name in electricity {
        match catalog.find(name) {
            None => tracing::warn!(facility = %name, "electricity selected for unknown facility"),
            Some(recipe) if !recipe.improved_by_electricity => {
                tracing::warn!(facility = %name, "facility is not improved by electricity")
            }
            Some(_) => {}
        }
    }
}

/// Total workers required per category. Categories totalling zero are omitted.
pub fn calculate_needed_workers(entries: &[ResolvedEntry<'_>]) -> WorkerMap {
    let mut workers = WorkerMap::new();
    for entry in entries {
        *workers.entry(entry.recipe.worker_type).or_default() += entry.workers();
    }
    workers.retain(|_, total| *total != 0.0);
    workers
}

/// Format a production chain as an indented tree
pub fn format_production_chain(entries: &[ResolvedEntry<'_>]) -> String {
    let mut output = String::new();
    for entry in entries {
        let prefix = "  ".repeat(entry.depth);
        let power = if entry.powered_by_electricity { ", electricity" } else { "" };
        output.push_str(&format!(
            "{}{:.2}x {} -> {} @ {:.3}/min ({:.0} {}{})\n",
            prefix,
            entry.instance_count,
            entry.recipe.name,
            entry.recipe.product,
            entry.instance_count * entry.recipe.amount_per_minute,
            entry.workers(),
            entry.recipe.worker_type,
            power
        ));
    }
    output
}

/// Per-facility totals of a resolved chain
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityCount {
    pub name: String,
    pub instances: f64,
    /// Whole buildings to place
    pub buildings: u64,
    pub powered_by_electricity: bool,
}

/// Summary of a production chain calculation
#[derive(Debug)]
pub struct ChainSummary {
    pub demand: DemandMap,
    pub facilities: Vec<FacilityCount>,
    pub workers: WorkerMap,
}

impl ChainSummary {
    pub fn electrified(&self) -> impl Iterator<Item = &FacilityCount> {
        self.facilities.iter().filter(|f| f.powered_by_electricity)
    }

    pub fn total_workers(&self) -> f64 {
        self.workers.values().sum()
    }
}

/// Generate a summary of the production chain, grouping entries by facility
pub fn summarize_chain(demand: &DemandMap, entries: &[ResolvedEntry<'_>]) -> ChainSummary {
    let mut grouped: BTreeMap<&str, (f64, bool)> = BTreeMap::new();
    for entry in entries {
        let slot = grouped.entry(entry.recipe.name.as_str()).or_default();
        slot.0 += entry.instance_count;
        slot.1 |= entry.powered_by_electricity;
    }

    let facilities = grouped
        .into_iter()
        .map(|(name, (instances, powered_by_electricity))| FacilityCount {
            name: name.to_string(),
            instances,
            buildings: whole_buildings(instances),
            powered_by_electricity,
        })
        .collect();

    ChainSummary {
        demand: demand.clone(),
        facilities,
        workers: calculate_needed_workers(entries),
    }
}

fn whole_buildings(instances: f64) -> u64 {
    // Absorb float noise such as 3.0000000000000004 before rounding up
    let snapped = (instances * 1e9).round() / 1e9;
    snapped.ceil() as u64
}

impl fmt::Display for ChainSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Production Summary ===")?;
        writeln!(f, "Demand:")?;
        for (product, rate) in &self.demand {
            writeln!(f, "  {} @ {:.3}/min", product, rate)?;
        }
        writeln!(f)?;

        writeln!(f, "Facilities required:")?;
        for facility in &self.facilities {
            writeln!(
                f,
                "  {:>3}x {} ({:.2})",
                facility.buildings, facility.name, facility.instances
            )?;
        }
        writeln!(f)?;

        let electrified: Vec<_> = self.electrified().map(|c| c.name.as_str()).collect();
        if !electrified.is_empty() {
            writeln!(f, "Running on electricity:")?;
            for name in electrified {
                writeln!(f, "  {}", name)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Workers:")?;
        for (category, total) in &self.workers {
            writeln!(f, "  {:<12} {:>10.0}", category.as_str(), total)?;
        }
        writeln!(f, "  {:<12} {:>10.0}", "Total", self.total_workers())?;

        Ok(())
    }
}
