//! Data models for Anno 1800 products, residents and production recipes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CalcError;

macro_rules! products {
    ($($variant:ident => $tag:literal),* $(,)?) => {
        /// A tradeable good. Serialized with the tags the game data uses.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Product {
            $(
                #[serde(rename = $tag)]
                $variant,
            )*
        }

        impl Product {
            pub const ALL: &'static [Product] = &[$(Product::$variant),*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Product::$variant => $tag,)*
                }
            }
        }
    };
}

products! {
    Fish => "Fish",
    Potato => "Potato",
    Schnapps => "Schnapps",
    Wool => "Wool",
    WorkClothes => "Work_clothes",
    Pigs => "Pigs",
    Sausages => "Sausages",
    Grain => "Grain",
    Flour => "Flour",
    Bread => "Bread",
    Tallow => "Tallow",
    Soap => "Soap",
    Hops => "Hops",
    Malt => "Malt",
    Beer => "Beer",
    Beef => "Beef",
    RedPeppers => "Red_peppers",
    Goulash => "Goulash",
    Iron => "Iron",
    CannedFood => "Canned_food",
    Coal => "Coal",
    Steel => "Steel",
    Wood => "Wood",
    SewingMachines => "Sewing_machines",
    Cotton => "Cotton",
    CottonFabric => "Cotton_fabric",
    Furs => "Furs",
    FurCoats => "Fur_coats",
    Copper => "Copper",
    Zinc => "Zinc",
    QuartzSand => "Quartz_sand",
    Glass => "Glass",
    Brass => "Brass",
    Spectacles => "Spectacles",
    Caoutchouc => "Caoutchouc",
    PennyFarthings => "Penny_farthings",
    CoffeeBeans => "Coffee_beans",
    Coffee => "Coffee",
    GoldOre => "Gold_ore",
    Gold => "Gold",
    PocketWatches => "Pocket_watches",
    Filaments => "Filaments",
    LightBulbs => "Light_bulbs",
    Grapes => "Grapes",
    Champagne => "Champagne",
    WoodVeneers => "Wood_veneers",
    Tobacco => "Tobacco",
    Cigars => "Cigars",
    SugarCane => "Sugar_cane",
    Rum => "Rum",
    Sugar => "Sugar",
    Cocoa => "Cocoa",
    Chocolate => "Chocolate",
    Pearls => "Pearls",
    Jewellery => "Jewerelly",
    Gramophones => "Gramophones",
    SteamMotors => "Steam_motors",
    Chassis => "Chassis",
    SteamCarriages => "Steam_carriages",
}

impl FromStr for Product {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Product::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CalcError::UnknownTag(s.to_string()))
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Population tier. The same tiers staff production facilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResidentType {
    Farmer,
    Worker,
    Artisan,
    Engineer,
    Investor,
    Jornaleros,
    Obreros,
}

/// Labor classification of a facility's staff
pub type WorkerCategory = ResidentType;

impl ResidentType {
    pub const ALL: [ResidentType; 7] = [
        ResidentType::Farmer,
        ResidentType::Worker,
        ResidentType::Artisan,
        ResidentType::Engineer,
        ResidentType::Investor,
        ResidentType::Jornaleros,
        ResidentType::Obreros,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResidentType::Farmer => "Farmer",
            ResidentType::Worker => "Worker",
            ResidentType::Artisan => "Artisan",
            ResidentType::Engineer => "Engineer",
            ResidentType::Investor => "Investor",
            ResidentType::Jornaleros => "Jornaleros",
            ResidentType::Obreros => "Obreros",
        }
    }

    /// Investors never staff a facility
    pub fn labors(self) -> bool {
        self != ResidentType::Investor
    }

    pub fn is_new_world(self) -> bool {
        matches!(self, ResidentType::Jornaleros | ResidentType::Obreros)
    }
}

impl FromStr for ResidentType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResidentType::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CalcError::UnknownTag(s.to_string()))
    }
}

impl fmt::Display for ResidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A facility type converting prerequisite products into one output product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionRecipe {
    /// Stable identifier used by prerequisite references
    pub key: String,
    pub name: String,
    pub product: Product,
    pub amount_per_minute: f64,
    pub worker_type: WorkerCategory,
    pub worker_amount: f64,
    /// Keys of the recipes feeding this one, in declared order
    pub requires: Vec<String>,
    pub improved_by_electricity: bool,
    pub requires_electricity: bool,
}

impl ProductionRecipe {
    /// True if `selection` names this facility, by display name or key
    pub fn is_named(&self, selection: &str) -> bool {
        self.name == selection || self.key == selection
    }
}

/// Per-capita consumption of one product, in units per minute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandEntry {
    pub product: Product,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemandProfile {
    pub basic: Vec<DemandEntry>,
    pub luxury: Vec<DemandEntry>,
}

/// Needs category within a demand profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeedTier {
    Basic,
    Luxury,
}

impl NeedTier {
    pub fn as_str(self) -> &'static str {
        match self {
            NeedTier::Basic => "basic",
            NeedTier::Luxury => "luxury",
        }
    }
}

impl FromStr for NeedTier {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(NeedTier::Basic),
            "luxury" => Ok(NeedTier::Luxury),
            other => Err(CalcError::UnknownTag(other.to_string())),
        }
    }
}

impl DemandProfile {
    pub fn tier(&self, tier: NeedTier) -> &[DemandEntry] {
        match tier {
            NeedTier::Basic => &self.basic,
            NeedTier::Luxury => &self.luxury,
        }
    }
}

/// One visited node of a production chain walk
#[derive(Debug, Clone)]
pub struct ResolvedEntry<'a> {
    pub recipe: &'a ProductionRecipe,
    /// Fractional number of facilities needed
    pub instance_count: f64,
    pub powered_by_electricity: bool,
    /// Distance from the demanded product; 0 for top-level producers
    pub depth: usize,
}

impl ResolvedEntry<'_> {
    pub fn workers(&self) -> f64 {
        self.recipe.worker_amount * self.instance_count
    }
}
