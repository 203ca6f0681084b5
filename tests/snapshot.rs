//! SQLite snapshot export and reload

use anno_calculator::{Catalog, DemandMap, ElectricitySelection, Product, calculator, db, demand};
use rusqlite::Connection;

fn exported() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    db::store_snapshot(&mut conn, Catalog::standard(), demand::standard()).unwrap();
    conn
}

#[test]
fn test_catalog_survives_snapshot() {
    let conn = exported();
    let catalog = db::load_catalog(&conn).unwrap();
    assert_eq!(catalog.recipes(), Catalog::standard().recipes());
}

#[test]
fn test_profiles_survive_snapshot() {
    let conn = exported();
    let profiles = db::load_profiles(&conn).unwrap();
    assert_eq!(&profiles, demand::standard());
}

#[test]
fn test_reexport_replaces_snapshot() {
    let mut conn = exported();
    db::store_snapshot(&mut conn, Catalog::standard(), demand::standard()).unwrap();
    let catalog = db::load_catalog(&conn).unwrap();
    assert_eq!(catalog.len(), 61);
    assert_eq!(
        db::get_prerequisites(&conn, "CabAssemblyLine").unwrap(),
        ["Coachmakers", "MotorAssemblyLine"]
    );
}

#[test]
fn test_loaded_catalog_resolves_like_builtin() {
    let conn = exported();
    let catalog = db::load_catalog(&conn).unwrap();
    let demand = DemandMap::from([(Product::SteamCarriages, 4.0)]);
    let none = ElectricitySelection::new();

    let loaded = calculator::calculate_production_chain(&catalog, &demand, &none).unwrap();
    let builtin = calculator::calculate_production_chain(Catalog::standard(), &demand, &none).unwrap();
    let keys = |entries: &[anno_calculator::ResolvedEntry<'_>]| {
        entries.iter().map(|e| e.recipe.key.clone()).collect::<Vec<_>>()
    };
    assert_eq!(keys(&loaded), keys(&builtin));
}

#[test]
fn test_dangling_prerequisite_rejected_on_load() {
    let conn = exported();
    conn.execute(
        "INSERT INTO recipe_prerequisites (recipe_key, position, prerequisite_key) VALUES ('Fishery', 0, 'Harbor')",
        [],
    )
    .unwrap();
    assert!(db::load_catalog(&conn).is_err());
}
