//! End-to-end resolution against the built-in catalog and profiles

use std::collections::BTreeMap;

use anno_calculator::{
    CalcError, CalculationRequest, Catalog, DemandMap, ElectricitySelection, Populations, Product,
    ResidentType, calculator, demand, request,
};

const EPSILON: f64 = 1e-9;

fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "{what}: expected {expected}, got {actual}"
    );
}

#[test]
fn test_steam_carriage_chain() {
    let demand = DemandMap::from([(Product::SteamCarriages, 4.0)]);
    let entries =
        calculator::calculate_production_chain(Catalog::standard(), &demand, &ElectricitySelection::new()).unwrap();

    let expected = [
        ("CabAssemblyLine", 2.0),
        ("Coachmakers", 8.0),
        ("OldLumberjacksHut", 1.0),
        ("CaoutchoucPlantation", 4.0),
        ("MotorAssemblyLine", 3.0),
        ("Furnace", 2.0),
        ("IronMine", 1.0),
        ("CoalMine", 1.0),
        ("BrassSmeltery", 4.0),
        ("ZincMine", 2.0),
        ("CopperMine", 2.0),
    ];

    assert_eq!(entries.len(), expected.len());
    for (entry, (key, count)) in entries.iter().zip(expected) {
        assert_eq!(entry.recipe.key, key);
        assert_close(entry.instance_count, count, key);
    }

    // Assembly lines always run on electricity
    assert!(entries[0].powered_by_electricity);
    assert!(entries[4].powered_by_electricity);
    assert!(!entries[1].powered_by_electricity);
}

#[test]
fn test_steam_carriage_workers() {
    let demand = DemandMap::from([(Product::SteamCarriages, 4.0)]);
    let entries =
        calculator::calculate_production_chain(Catalog::standard(), &demand, &ElectricitySelection::new()).unwrap();
    let workers = calculator::calculate_needed_workers(&entries);

    assert_eq!(workers.len(), 4);
    assert_close(workers[&ResidentType::Engineer], 2.0 * 500.0 + 3.0 * 250.0 + 8.0 * 150.0, "engineers");
    assert_close(
        workers[&ResidentType::Worker],
        2.0 * 100.0 + 50.0 + 50.0 + 4.0 * 25.0 + 2.0 * 25.0 + 2.0 * 25.0,
        "workers",
    );
    assert_close(workers[&ResidentType::Farmer], 5.0, "farmers");
    assert_close(workers[&ResidentType::Jornaleros], 40.0, "jornaleros");
    assert!(!workers.contains_key(&ResidentType::Investor));
}

#[test]
fn test_unknown_recipe_in_electricity_is_harmless() {
    let demand = DemandMap::from([(Product::Steel, 2.0)]);
    let electricity: ElectricitySelection = ["Spaceport".to_string(), "Furnace".to_string()].into();
    let entries = calculator::calculate_production_chain(Catalog::standard(), &demand, &electricity).unwrap();
    assert_close(entries[0].instance_count, 0.5, "boosted furnace");
    // Upstream still receives the furnace's unboosted output
    assert_close(entries[1].instance_count, 0.25, "iron mine");
}

#[test]
fn test_population_request_end_to_end() {
    let mut calc_request = CalculationRequest {
        residents: Populations::from([(ResidentType::Farmer, 1000.0), (ResidentType::Worker, 400.0)]),
        demands: anno_calculator::DemandSelection::all(demand::standard()),
        ..Default::default()
    };
    calc_request.manual_demand.insert(Product::Fish, 1.0);

    let response = request::calculate(Catalog::standard(), demand::standard(), &calc_request).unwrap();

    // 1000 farmers + 400 workers eat 0.0025 fish each, plus 1/min requested by hand
    assert_close(response.demand[&Product::Fish], 4.5, "fish demand");
    assert!(response.demand.contains_key(&Product::Beer));
    assert!(!response.demand.contains_key(&Product::Champagne));

    let fisheries: f64 = response
        .needed_productions
        .iter()
        .filter(|p| p.recipe_name == "Fishery")
        .map(|p| p.instance_count)
        .sum();
    assert_close(fisheries, 2.25, "fisheries");
    assert!(response.needed_worker.values().all(|&total| total > 0.0));
}

#[test]
fn test_missing_producer_aborts_request() {
    let catalog = Catalog::from_recipes(
        Catalog::standard()
            .recipes()
            .iter()
            .filter(|r| r.product != Product::Rum)
            .cloned()
            .collect(),
    )
    .unwrap();

    let calc_request = CalculationRequest {
        manual_demand: BTreeMap::from([(Product::Fish, 2.0), (Product::Rum, 1.0)]),
        ..Default::default()
    };
    let err = request::calculate(&catalog, demand::standard(), &calc_request).unwrap_err();
    assert_eq!(err, CalcError::NoProducer(Product::Rum));
}

#[test]
fn test_negative_population_aborts_request() {
    let calc_request = CalculationRequest {
        residents: Populations::from([(ResidentType::Artisan, -10.0)]),
        ..Default::default()
    };
    let result = request::calculate(Catalog::standard(), demand::standard(), &calc_request);
    assert!(matches!(result, Err(CalcError::InvalidPopulation { .. })));
}

#[test]
fn test_negative_manual_demand_aborts_request() {
    let calc_request = CalculationRequest {
        manual_demand: DemandMap::from([(Product::Fish, -4.0)]),
        ..Default::default()
    };
    let err = request::calculate(Catalog::standard(), demand::standard(), &calc_request).unwrap_err();
    assert_eq!(
        err,
        CalcError::InvalidDemand {
            product: Product::Fish,
            rate: -4.0
        }
    );
}

#[test]
fn test_small_manual_demand_still_resolves() {
    let calc_request = CalculationRequest {
        manual_demand: DemandMap::from([(Product::SteamCarriages, 0.0004)]),
        ..Default::default()
    };
    let response = request::calculate(Catalog::standard(), demand::standard(), &calc_request).unwrap();
    assert_eq!(response.demand[&Product::SteamCarriages], 0.0004);
    assert_eq!(response.needed_productions.len(), 11);
    assert_close(response.needed_productions[0].instance_count, 0.0002, "cab assembly lines");
    assert!(response.needed_productions.iter().all(|p| p.instance_count > 0.0));
}
