//! The production catalog: every recipe of the game and its prerequisite graph

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::{CalcError, Result};
use crate::models::{Product, ProductionRecipe, ResidentType, WorkerCategory};

struct RecipeRow {
    key: &'static str,
    name: &'static str,
    product: Product,
    amount_per_minute: f64,
    worker_type: WorkerCategory,
    worker_amount: f64,
    requires: &'static [&'static str],
    improved_by_electricity: bool,
    requires_electricity: bool,
}

#[allow(clippy::too_many_arguments)]
const fn row(
    key: &'static str,
    name: &'static str,
    product: Product,
    amount_per_minute: f64,
    worker_type: WorkerCategory,
    worker_amount: f64,
    requires: &'static [&'static str],
    improved_by_electricity: bool,
    requires_electricity: bool,
) -> RecipeRow {
    RecipeRow {
        key,
        name,
        product,
        amount_per_minute,
        worker_type,
        worker_amount,
        requires,
        improved_by_electricity,
        requires_electricity,
    }
}

use Product as P;
use ResidentType::{Artisan, Engineer, Farmer, Jornaleros, Obreros, Worker};

#[rustfmt::skip]
const RECIPES: &[RecipeRow] = &[
    row("ArtisanKitchen", "Artisan Kitchen", P::Goulash, 0.5, Artisan, 75.0, &["CattleFarm", "RedPepperFarm"], true, false),
    row("Bakery", "Bakery", P::Bread, 1.0, Worker, 50.0, &["FlourMill"], true, false),
    row("BicycleFactory", "Bicycle Factory", P::PennyFarthings, 4.0, Engineer, 150.0, &["Furnace", "CaoutchoucPlantation"], false, true),
    row("BrassSmeltery", "Brass Smeltery", P::Brass, 1.0, Worker, 25.0, &["ZincMine", "CopperMine"], true, false),
    row("Brewery", "Brewery", P::Beer, 1.0, Worker, 75.0, &["HopFarm", "Malthouse"], true, false),
    row("CabAssemblyLine", "Cab Assembly Line", P::SteamCarriages, 2.0, Engineer, 500.0, &["Coachmakers", "MotorAssemblyLine"], false, true),
    row("Cannery", "Cannery", P::CannedFood, 2.0 / 3.0, Artisan, 75.0, &["IronMine", "ArtisanKitchen"], true, false),
    row("CaoutchoucPlantation", "Caoutchouc Plantation", P::Caoutchouc, 1.0, Jornaleros, 10.0, &[], false, false),
    row("CattleFarm", "Cattle Farm", P::Beef, 0.5, Farmer, 20.0, &[], false, false),
    row("ChampagneCellar", "Champagne Cellar", P::Champagne, 2.0, Artisan, 150.0, &["Vineyard", "Glassmakers"], true, false),
    row("ChocolateFactory", "Chocolate Factory", P::Chocolate, 2.0, Obreros, 100.0, &["SugarRefinery", "CocoaPlantation"], false, false),
    row("CigarFactory", "Cigar Factory", P::Cigars, 2.0, Obreros, 175.0, &["NewMarquetryWorkshop", "TobaccoPlantation"], false, false),
    row("Clockmakers", "Clockmakers", P::PocketWatches, 4.0 / 3.0, Engineer, 150.0, &["Glassmakers", "Goldsmiths"], false, true),
    row("Coachmakers", "Coachmakers", P::Chassis, 0.5, Engineer, 150.0, &["OldLumberjacksHut", "CaoutchoucPlantation"], true, false),
    row("CoalMine", "Coal Mine", P::Coal, 4.0, Worker, 50.0, &[], true, false),
    row("CocoaPlantation", "Cocoa Plantation", P::Cocoa, 1.0, Jornaleros, 10.0, &[], false, false),
    row("CoffeePlantation", "Coffee Plantation", P::CoffeeBeans, 1.0, Jornaleros, 10.0, &[], false, false),
    row("CoffeeRoaster", "Coffee Roaster", P::Coffee, 2.0, Obreros, 150.0, &["CoffeePlantation"], false, false),
    row("CopperMine", "Copper Mine", P::Copper, 2.0, Worker, 25.0, &[], true, false),
    row("CottonMill", "Cotton Mill", P::CottonFabric, 2.0, Jornaleros, 10.0, &["CottonPlantation"], false, false),
    row("CottonPlantation", "Cotton Plantation", P::Cotton, 1.0, Jornaleros, 10.0, &[], false, false),
    row("Distillery", "Distillery", P::Schnapps, 2.0, Farmer, 50.0, &["PotatoFarm"], true, false),
    row("FilamentFactory", "Filament Factory", P::Filaments, 1.0, Engineer, 150.0, &["CoalMine"], true, false),
    row("Fishery", "Fishery", P::Fish, 2.0, Farmer, 25.0, &[], false, false),
    row("FlourMill", "Flour Mill", P::Flour, 2.0, Farmer, 10.0, &["GrainFarm"], true, false),
    row("FrameworkKnitters", "Framework Knitters", P::WorkClothes, 2.0, Farmer, 50.0, &["SheepFarm"], true, false),
    row("FurDealer", "Fur Dealer", P::FurCoats, 2.0, Artisan, 200.0, &["HuntingCabin", "CottonMill"], true, false),
    row("Furnace", "Furnace", P::Steel, 2.0, Worker, 100.0, &["IronMine", "CoalMine"], true, false),
    row("Glassmakers", "Glassmakers", P::Glass, 2.0, Artisan, 100.0, &["SandMine"], true, false),
    row("GoldMine", "Gold Mine", P::GoldOre, 0.4, Obreros, 100.0, &[], false, false),
    row("Goldsmiths", "Goldsmiths", P::Gold, 1.0, Engineer, 125.0, &["CoalMine", "GoldMine"], true, false),
    row("GrainFarm", "Grain Farm", P::Grain, 1.0, Farmer, 20.0, &[], false, false),
    row("GramophoneFactory", "Gramophone Factory", P::Gramophones, 1.0, Engineer, 150.0, &["OldMarquetryWorkshop", "BrassSmeltery"], false, true),
    row("HopFarm", "Hop Farm", P::Hops, 2.0 / 3.0, Farmer, 20.0, &[], false, false),
    row("HuntingCabin", "Hunting Cabin", P::Furs, 1.0, Farmer, 10.0, &[], false, false),
    row("IronMine", "Iron Mine", P::Iron, 4.0, Worker, 50.0, &[], true, false),
    row("Jewellers", "Jewellers", P::Jewellery, 2.0, Artisan, 150.0, &["PearlFarm", "Goldsmiths"], true, false),
    row("LightBulbFactory", "Light Bulb Factory", P::LightBulbs, 1.0, Engineer, 150.0, &["Glassmakers", "FilamentFactory"], true, false),
    row("OldLumberjacksHut", "Old Lumberjacks Hut", P::Wood, 4.0, Farmer, 5.0, &[], false, false),
    row("NewLumberjacksHut", "New Lumberjacks Hut", P::Wood, 4.0, Jornaleros, 10.0, &[], false, false),
    row("Malthouse", "Malthouse", P::Malt, 2.0, Worker, 25.0, &["GrainFarm"], true, false),
    row("MotorAssemblyLine", "Motor Assembly Line", P::SteamMotors, 4.0 / 3.0, Engineer, 250.0, &["Furnace", "BrassSmeltery"], false, true),
    row("NewMarquetryWorkshop", "New Marquetry Workshop", P::WoodVeneers, 1.0, Obreros, 100.0, &["NewLumberjacksHut"], false, false),
    row("OldMarquetryWorkshop", "Old Marquetry Workshop", P::WoodVeneers, 1.0, Engineer, 150.0, &["OldLumberjacksHut"], true, false),
    row("PearlFarm", "Pearl Farm", P::Pearls, 2.0 / 3.0, Jornaleros, 50.0, &[], false, false),
    row("PigFarm", "Pig Farm", P::Pigs, 1.0, Farmer, 30.0, &[], false, false),
    row("PotatoFarm", "Potato Farm", P::Potato, 2.0, Farmer, 20.0, &[], false, false),
    row("RedPepperFarm", "Red Pepper Farm", P::RedPeppers, 0.5, Farmer, 10.0, &[], false, false),
    row("RenderingWorks", "Rendering Works", P::Tallow, 1.0, Worker, 40.0, &["PigFarm"], true, false),
    row("RumDistillery", "Rum Distillery", P::Rum, 2.0, Jornaleros, 30.0, &["OldLumberjacksHut", "SugarCanePlantation"], false, false),
    row("SandMine", "Sand Mine", P::QuartzSand, 2.0, Worker, 25.0, &[], true, false),
    row("SewingMachineFactory", "Sewing Machine Factory", P::SewingMachines, 2.0, Artisan, 150.0, &["OldLumberjacksHut", "Furnace"], true, false),
    row("SheepFarm", "Sheep Farm", P::Wool, 2.0, Farmer, 10.0, &[], false, false),
    row("SlaughterHouse", "Slaughter House", P::Sausages, 1.0, Worker, 50.0, &["PigFarm"], true, false),
    row("SoapFactory", "Soap Factory", P::Soap, 2.0, Worker, 50.0, &["RenderingWorks"], true, false),
    row("SpectacleFactory", "Spectacle Factory", P::Spectacles, 2.0 / 3.0, Engineer, 100.0, &["Glassmakers", "BrassSmeltery"], true, false),
    row("SugarCanePlantation", "Sugar Cane Plantation", P::SugarCane, 2.0, Jornaleros, 10.0, &[], false, false),
    row("SugarRefinery", "Sugar Refinery", P::Sugar, 2.0, Obreros, 50.0, &["SugarCanePlantation"], false, false),
    row("TobaccoPlantation", "Tobacco Plantation", P::Tobacco, 0.5, Jornaleros, 10.0, &[], false, false),
    row("Vineyard", "Vineyard", P::Grapes, 0.5, Farmer, 10.0, &[], false, false),
    row("ZincMine", "Zinc Mine", P::Zinc, 2.0, Worker, 25.0, &[], true, false),
];

fn standard_recipes() -> Vec<ProductionRecipe> {
    RECIPES
        .iter()
        .map(|r| ProductionRecipe {
            key: r.key.to_string(),
            name: r.name.to_string(),
            product: r.product,
            amount_per_minute: r.amount_per_minute,
            worker_type: r.worker_type,
            worker_amount: r.worker_amount,
            requires: r.requires.iter().map(|k| k.to_string()).collect(),
            improved_by_electricity: r.improved_by_electricity,
            requires_electricity: r.requires_electricity,
        })
        .collect()
}

static STANDARD: LazyLock<Catalog> = LazyLock::new(|| Catalog::index(standard_recipes()));

/// Read-only set of production recipes, indexed by key
#[derive(Debug, Clone)]
pub struct Catalog {
    recipes: Vec<ProductionRecipe>,
    by_key: HashMap<String, usize>,
}

impl Catalog {
    /// The built-in game catalog
    pub fn standard() -> &'static Catalog {
        &STANDARD
    }

    /// Build a catalog from externally supplied recipes, rejecting broken graphs
    pub fn from_recipes(recipes: Vec<ProductionRecipe>) -> Result<Catalog> {
        let catalog = Catalog::index(recipes);
        catalog.validate()?;
        Ok(catalog)
    }

    fn index(recipes: Vec<ProductionRecipe>) -> Catalog {
        let mut by_key = HashMap::with_capacity(recipes.len());
        for (i, recipe) in recipes.iter().enumerate() {
            by_key.entry(recipe.key.clone()).or_insert(i);
        }
        Catalog { recipes, by_key }
    }

    pub fn recipes(&self) -> &[ProductionRecipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn recipe(&self, key: &str) -> Option<&ProductionRecipe> {
        self.by_key.get(key).map(|&i| &self.recipes[i])
    }

    /// Look a recipe up by key or display name
    pub fn find(&self, name_or_key: &str) -> Option<&ProductionRecipe> {
        self.recipe(name_or_key)
            .or_else(|| self.recipes.iter().find(|r| r.name == name_or_key))
    }

    /// All recipes yielding `product`, in catalog order
    pub fn producers(&self, product: Product) -> impl Iterator<Item = &ProductionRecipe> {
        self.recipes.iter().filter(move |r| r.product == product)
    }

    /// The recipe used to satisfy top-level demand for `product`.
    ///
    /// Old World producers win over New World alternates; among equals the
    /// first recipe in catalog order is used.
    pub fn producer_for(&self, product: Product) -> Result<&ProductionRecipe> {
        self.producers(product)
            .find(|r| !r.worker_type.is_new_world())
            .or_else(|| self.producers(product).next())
            .ok_or(CalcError::NoProducer(product))
    }

    /// Resolve the prerequisite keys of `recipe`, in declared order
    pub fn prerequisites<'a>(&'a self, recipe: &ProductionRecipe) -> Result<Vec<&'a ProductionRecipe>> {
        recipe
            .requires
            .iter()
            .map(|key| self.recipe(key).ok_or_else(|| CalcError::UnknownRecipe(key.clone())))
            .collect()
    }

    /// Check the integrity of the recipe graph
    pub fn validate(&self) -> Result<()> {
        if self.by_key.len() != self.recipes.len() {
            let mut seen = std::collections::HashSet::new();
            if let Some(dup) = self.recipes.iter().find(|r| !seen.insert(r.key.as_str())) {
                return Err(CalcError::InvalidRecipe {
                    key: dup.key.clone(),
                    reason: "duplicate key".to_string(),
                });
            }
        }

        for recipe in &self.recipes {
            let invalid = |reason: &str| CalcError::InvalidRecipe {
                key: recipe.key.clone(),
                reason: reason.to_string(),
            };
            if !(recipe.amount_per_minute.is_finite() && recipe.amount_per_minute > 0.0) {
                return Err(invalid("output rate must be positive"));
            }
            if !(recipe.worker_amount.is_finite() && recipe.worker_amount > 0.0) {
                return Err(invalid("worker amount must be positive"));
            }
            if !recipe.worker_type.labors() {
                return Err(invalid("staffed by a non-laboring category"));
            }
            self.prerequisites(recipe)?;
        }

        self.check_acyclic()
    }

    fn check_acyclic(&self) -> Result<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            New,
            Active,
            Done,
        }

        fn visit(catalog: &Catalog, i: usize, marks: &mut [Mark]) -> Result<()> {
            match marks[i] {
                Mark::Done => return Ok(()),
                Mark::Active => return Err(CalcError::CyclicCatalog(catalog.recipes[i].key.clone())),
                Mark::New => {}
            }
            marks[i] = Mark::Active;
            for key in &catalog.recipes[i].requires {
                if let Some(&next) = catalog.by_key.get(key) {
                    visit(catalog, next, marks)?;
                }
            }
            marks[i] = Mark::Done;
            Ok(())
        }

        let mut marks = vec![Mark::New; self.recipes.len()];
        for i in 0..self.recipes.len() {
            visit(self, i, &mut marks)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(key: &str, product: Product) -> ProductionRecipe {
        ProductionRecipe {
            key: key.to_string(),
            name: key.to_string(),
            product,
            amount_per_minute: 1.0,
            worker_type: ResidentType::Farmer,
            worker_amount: 10.0,
            requires: Vec::new(),
            improved_by_electricity: false,
            requires_electricity: false,
        }
    }

    #[test]
    fn test_standard_catalog_is_valid() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.len(), 61);
        catalog.validate().unwrap();
    }

    #[test]
    fn test_every_product_has_a_producer() {
        let catalog = Catalog::standard();
        for &product in Product::ALL {
            assert!(catalog.producer_for(product).is_ok(), "{product} has no producer");
        }
    }

    #[test]
    fn test_producer_prefers_old_world() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.producer_for(Product::Wood).unwrap().key, "OldLumberjacksHut");
        assert_eq!(catalog.producer_for(Product::WoodVeneers).unwrap().key, "OldMarquetryWorkshop");
        assert_eq!(catalog.producer_for(Product::Rum).unwrap().key, "RumDistillery");
    }

    #[test]
    fn test_find_by_name_or_key() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.find("Cab Assembly Line").unwrap().key, "CabAssemblyLine");
        assert_eq!(catalog.find("BrassSmeltery").unwrap().name, "Brass Smeltery");
        assert!(catalog.find("Spaceport").is_none());
    }

    #[test]
    fn test_no_investor_labor() {
        assert!(
            Catalog::standard()
                .recipes()
                .iter()
                .all(|r| r.worker_type != ResidentType::Investor)
        );
    }

    #[test]
    fn test_rejects_dangling_prerequisite() {
        let mut mill = leaf("Mill", Product::Flour);
        mill.requires.push("Farm".to_string());
        let err = Catalog::from_recipes(vec![mill]).unwrap_err();
        assert_eq!(err, CalcError::UnknownRecipe("Farm".to_string()));
    }

    #[test]
    fn test_rejects_cycle() {
        let mut a = leaf("A", Product::Flour);
        let mut b = leaf("B", Product::Grain);
        a.requires.push("B".to_string());
        b.requires.push("A".to_string());
        let err = Catalog::from_recipes(vec![a, b]).unwrap_err();
        assert!(matches!(err, CalcError::CyclicCatalog(_)));
    }

    #[test]
    fn test_rejects_duplicate_keys_and_bad_rates() {
        let err = Catalog::from_recipes(vec![leaf("A", Product::Fish), leaf("A", Product::Grain)]).unwrap_err();
        assert!(matches!(err, CalcError::InvalidRecipe { .. }));

        let mut idle = leaf("Idle", Product::Fish);
        idle.amount_per_minute = 0.0;
        assert!(Catalog::from_recipes(vec![idle]).is_err());

        let mut lazy = leaf("Lazy", Product::Fish);
        lazy.worker_type = ResidentType::Investor;
        assert!(Catalog::from_recipes(vec![lazy]).is_err());
    }
}
