//! SQLite snapshots of the production catalog and demand profiles

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::catalog::Catalog;
use crate::demand::DemandProfiles;
use crate::models::{DemandEntry, DemandProfile, NeedTier, Product, ProductionRecipe, ResidentType};

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Production recipes, in catalog order
        CREATE TABLE IF NOT EXISTS recipes (
            key TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            name TEXT NOT NULL,
            product TEXT NOT NULL,
            amount_per_minute REAL NOT NULL,
            worker_type TEXT NOT NULL,
            worker_amount REAL NOT NULL,
            improved_by_electricity INTEGER NOT NULL,
            requires_electricity INTEGER NOT NULL
        );

        -- Prerequisite edges (what a recipe consumes)
        CREATE TABLE IF NOT EXISTS recipe_prerequisites (
            recipe_key TEXT NOT NULL,
            position INTEGER NOT NULL,
            prerequisite_key TEXT NOT NULL,
            PRIMARY KEY (recipe_key, position)
        );

        -- Per-capita needs of each resident type
        CREATE TABLE IF NOT EXISTS demand_profiles (
            resident TEXT NOT NULL,
            tier TEXT NOT NULL,
            position INTEGER NOT NULL,
            product TEXT NOT NULL,
            amount REAL NOT NULL,
            PRIMARY KEY (resident, tier, position)
        );

        CREATE INDEX IF NOT EXISTS idx_recipes_product ON recipes(product);
        "#,
    )?;
    Ok(())
}

/// Clear all snapshot data (for re-export)
pub fn clear_snapshot(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DELETE FROM demand_profiles;
        DELETE FROM recipe_prerequisites;
        DELETE FROM recipes;
        "#,
    )?;
    Ok(())
}

/// Insert or replace a recipe and its prerequisite edges
pub fn upsert_recipe(conn: &Connection, position: usize, recipe: &ProductionRecipe) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO recipes (key, position, name, product, amount_per_minute, worker_type,
                                         worker_amount, improved_by_electricity, requires_electricity)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        (
            &recipe.key,
            position as i64,
            &recipe.name,
            recipe.product.as_str(),
            recipe.amount_per_minute,
            recipe.worker_type.as_str(),
            recipe.worker_amount,
            recipe.improved_by_electricity,
            recipe.requires_electricity,
        ),
    )?;

    conn.execute("DELETE FROM recipe_prerequisites WHERE recipe_key = ?1", [&recipe.key])?;
    for (i, prerequisite) in recipe.requires.iter().enumerate() {
        conn.execute(
            "INSERT INTO recipe_prerequisites (recipe_key, position, prerequisite_key) VALUES (?1, ?2, ?3)",
            (&recipe.key, i as i64, prerequisite),
        )?;
    }
    Ok(())
}

/// Insert the needs of one resident type
pub fn insert_profile(conn: &Connection, resident: ResidentType, profile: &DemandProfile) -> Result<()> {
    for tier in [NeedTier::Basic, NeedTier::Luxury] {
        for (i, need) in profile.tier(tier).iter().enumerate() {
            conn.execute(
                "INSERT INTO demand_profiles (resident, tier, position, product, amount)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                (resident.as_str(), tier.as_str(), i as i64, need.product.as_str(), need.amount),
            )?;
        }
    }
    Ok(())
}

/// Replace the stored snapshot with `catalog` and `profiles`
pub fn store_snapshot(conn: &mut Connection, catalog: &Catalog, profiles: &DemandProfiles) -> Result<()> {
    let tx = conn.transaction()?;
    clear_snapshot(&tx)?;
    for (position, recipe) in catalog.recipes().iter().enumerate() {
        upsert_recipe(&tx, position, recipe)?;
    }
    for (&resident, profile) in profiles {
        insert_profile(&tx, resident, profile)?;
    }
    tx.commit()?;

    tracing::info!(
        recipes = catalog.len(),
        profiles = profiles.len(),
        "stored catalog snapshot"
    );
    Ok(())
}

/// List all recipes in catalog order, without prerequisites
fn list_recipe_rows(conn: &Connection) -> Result<Vec<ProductionRecipe>> {
    let mut stmt = conn.prepare(
        "SELECT key, name, product, amount_per_minute, worker_type, worker_amount,
                improved_by_electricity, requires_electricity
         FROM recipes ORDER BY position",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, f64>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, f64>(5)?,
            row.get::<_, bool>(6)?,
            row.get::<_, bool>(7)?,
        ))
    })?;

    let mut results = Vec::new();
    for row in rows {
        let (key, name, product, amount_per_minute, worker_type, worker_amount, improved, requires) = row?;
        results.push(ProductionRecipe {
            product: product
                .parse::<Product>()
                .with_context(|| format!("recipe '{}' has an unknown product", key))?,
            worker_type: worker_type
                .parse::<ResidentType>()
                .with_context(|| format!("recipe '{}' has an unknown worker type", key))?,
            key,
            name,
            amount_per_minute,
            worker_amount,
            requires: Vec::new(),
            improved_by_electricity: improved,
            requires_electricity: requires,
        });
    }
    Ok(results)
}

/// Get the prerequisite keys of a recipe, in declared order
pub fn get_prerequisites(conn: &Connection, recipe_key: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT prerequisite_key FROM recipe_prerequisites WHERE recipe_key = ?1 ORDER BY position",
    )?;

    let rows = stmt.query_map([recipe_key], |row| row.get(0))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Load a validated catalog from the snapshot
pub fn load_catalog(conn: &Connection) -> Result<Catalog> {
    let mut recipes = list_recipe_rows(conn)?;
    for recipe in &mut recipes {
        recipe.requires = get_prerequisites(conn, &recipe.key)?;
    }
    Catalog::from_recipes(recipes).context("stored catalog failed validation")
}

/// Load demand profiles from the snapshot
pub fn load_profiles(conn: &Connection) -> Result<DemandProfiles> {
    let mut stmt = conn.prepare(
        "SELECT resident, tier, product, amount FROM demand_profiles ORDER BY resident, tier, position",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, f64>(3)?,
        ))
    })?;

    let mut profiles = DemandProfiles::new();
    for resident in ResidentType::ALL {
        profiles.insert(resident, DemandProfile::default());
    }
    for row in rows {
        let (resident, tier, product, amount) = row?;
        let resident: ResidentType = resident.parse()?;
        let tier: NeedTier = tier.parse()?;
        let product: Product = product.parse()?;

        let profile = profiles.entry(resident).or_default();
        let needs = match tier {
            NeedTier::Basic => &mut profile.basic,
            NeedTier::Luxury => &mut profile.luxury,
        };
        needs.push(DemandEntry { product, amount });
    }
    Ok(profiles)
}
