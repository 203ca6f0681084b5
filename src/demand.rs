//! Resident demand profiles and aggregation of population needs

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, Result};
use crate::models::{DemandEntry, DemandProfile, NeedTier, Product, ResidentType};

/// Aggregate demand in units per minute
pub type DemandMap = BTreeMap<Product, f64>;

pub type Populations = BTreeMap<ResidentType, f64>;

pub type DemandProfiles = BTreeMap<ResidentType, DemandProfile>;

const DEMAND_DECIMALS: i32 = 3;

fn needs(entries: &[(Product, f64)]) -> Vec<DemandEntry> {
    entries
        .iter()
        .map(|&(product, amount)| DemandEntry { product, amount })
        .collect()
}

fn standard_profiles() -> DemandProfiles {
    use Product as P;

    let mut profiles = DemandProfiles::new();
    profiles.insert(
        ResidentType::Farmer,
        DemandProfile {
            basic: needs(&[(P::Fish, 0.0025), (P::WorkClothes, 0.0030769)]),
            luxury: needs(&[(P::Schnapps, 0.0033333)]),
        },
    );
    profiles.insert(
        ResidentType::Worker,
        DemandProfile {
            basic: needs(&[
                (P::Fish, 0.0025),
                (P::WorkClothes, 0.0030769),
                (P::Sausages, 0.001),
                (P::Bread, 0.0009091),
                (P::Soap, 0.0004167),
            ]),
            luxury: needs(&[(P::Schnapps, 0.0033333), (P::Beer, 0.0007692)]),
        },
    );
    profiles.insert(
        ResidentType::Artisan,
        DemandProfile {
            basic: needs(&[
                (P::Sausages, 0.001),
                (P::Bread, 0.0009091),
                (P::Soap, 0.0004167),
                (P::CannedFood, 0.0002941),
                (P::SewingMachines, 0.0006667),
                (P::FurCoats, 0.0004),
            ]),
            luxury: needs(&[(P::Beer, 0.0007692), (P::Rum, 0.0008), (P::Goulash, 0.0006667)]),
        },
    );
    profiles.insert(
        ResidentType::Engineer,
        DemandProfile {
            basic: needs(&[
                (P::CannedFood, 0.0002941),
                (P::SewingMachines, 0.0006667),
                (P::FurCoats, 0.0004),
                (P::Spectacles, 0.0001111),
                (P::Coffee, 0.0005263),
                (P::LightBulbs, 0.0002222),
            ]),
            luxury: needs(&[
                (P::Rum, 0.0008),
                (P::PennyFarthings, 0.0003571),
                (P::PocketWatches, 0.0001282),
            ]),
        },
    );
    profiles.insert(
        ResidentType::Investor,
        DemandProfile {
            basic: needs(&[
                (P::Spectacles, 0.0001111),
                (P::Coffee, 0.0005263),
                (P::LightBulbs, 0.0002222),
                (P::Champagne, 0.0002),
                (P::Cigars, 0.0001667),
            ]),
            luxury: needs(&[
                (P::PocketWatches, 0.0001282),
                (P::Chocolate, 0.0002),
                (P::Jewellery, 0.0001429),
                (P::Gramophones, 0.0000952),
                (P::SteamCarriages, 0.0000667),
            ]),
        },
    );
    profiles.insert(ResidentType::Jornaleros, DemandProfile::default());
    profiles.insert(ResidentType::Obreros, DemandProfile::default());
    profiles
}

static STANDARD: LazyLock<DemandProfiles> = LazyLock::new(standard_profiles);

/// The built-in per-capita demand of every resident type
pub fn standard() -> &'static DemandProfiles {
    &STANDARD
}

/// Products a resident type is counted as consuming, by needs tier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectedNeeds {
    #[serde(default)]
    pub basic: Vec<String>,
    #[serde(default)]
    pub luxury: Vec<String>,
}

impl SelectedNeeds {
    pub fn tier(&self, tier: NeedTier) -> &[String] {
        match tier {
            NeedTier::Basic => &self.basic,
            NeedTier::Luxury => &self.luxury,
        }
    }

    pub fn tier_mut(&mut self, tier: NeedTier) -> &mut Vec<String> {
        match tier {
            NeedTier::Basic => &mut self.basic,
            NeedTier::Luxury => &mut self.luxury,
        }
    }

    fn contains(&self, tier: NeedTier, product: Product) -> bool {
        self.tier(tier).iter().any(|p| p == product.as_str())
    }
}

/// Per resident type selection of needs. Names are free-form; entries that
/// match no resident type or profile product are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DemandSelection(pub BTreeMap<String, SelectedNeeds>);

impl DemandSelection {
    /// Select every need of every profile
    pub fn all(profiles: &DemandProfiles) -> DemandSelection {
        let mut selection = DemandSelection::default();
        for (resident, profile) in profiles {
            let needs = selection.entry(*resident);
            for tier in [NeedTier::Basic, NeedTier::Luxury] {
                needs
                    .tier_mut(tier)
                    .extend(profile.tier(tier).iter().map(|d| d.product.as_str().to_string()));
            }
        }
        selection
    }

    pub fn entry(&mut self, resident: ResidentType) -> &mut SelectedNeeds {
        self.0.entry(resident.as_str().to_string()).or_default()
    }

    /// Selected needs for `resident`, merged over every key naming it
    /// case-insensitively
    pub fn needs(&self, resident: ResidentType) -> Option<SelectedNeeds> {
        let mut matching = self
            .0
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(resident.as_str()))
            .map(|(_, needs)| needs);

        let mut merged = matching.next()?.clone();
        for needs in matching {
            merged.basic.extend(needs.basic.iter().cloned());
            merged.luxury.extend(needs.luxury.iter().cloned());
        }
        Some(merged)
    }
}

fn round_demand(value: f64) -> f64 {
    let scale = 10f64.powi(DEMAND_DECIMALS);
    (value * scale).round() / scale
}

/// Total demand of the given populations for their selected needs.
///
/// Products nobody selected are absent from the result.
pub fn aggregate_demand(
    profiles: &DemandProfiles,
    residents: &Populations,
    selection: &DemandSelection,
) -> Result<DemandMap> {
    if let Some((&resident, &count)) = residents
        .iter()
        .find(|&(_, &count)| !(count.is_finite() && count >= 0.0))
    {
        return Err(CalcError::InvalidPopulation { resident, count });
    }

    let mut demand = DemandMap::new();
    for (&resident, &count) in residents {
        let (Some(profile), Some(selected)) = (profiles.get(&resident), selection.needs(resident)) else {
            continue;
        };

        for tier in [NeedTier::Basic, NeedTier::Luxury] {
            for need in profile.tier(tier) {
                if selected.contains(tier, need.product) {
                    let total = demand.entry(need.product).or_default();
                    *total = round_demand(*total + need.amount * count);
                }
            }
        }
    }

    Ok(demand)
}

/// Union of population demand and manually requested demand, summing rates
/// of shared products.
///
/// Manual rates are taken as given; only population demand is rounded.
pub fn merge_demand(mut demand: DemandMap, manual: &DemandMap) -> Result<DemandMap> {
    if let Some((&product, &rate)) = manual
        .iter()
        .find(|&(_, &rate)| !(rate.is_finite() && rate >= 0.0))
    {
        return Err(CalcError::InvalidDemand { product, rate });
    }

    for (&product, &rate) in manual {
        *demand.entry(product).or_default() += rate;
    }
    Ok(demand)
}
