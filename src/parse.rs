//! Parsing of command-line `Name=value` pairs and need selections

use std::collections::BTreeMap;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use regex::Regex;

use crate::demand::DemandSelection;
use crate::models::{NeedTier, ResidentType};

/// Parse `Key=number` pairs such as `Farmer=1200` or `Steam_carriages=4`.
///
/// Later pairs for the same key replace earlier ones.
pub fn parse_assignments<K>(pairs: &[String]) -> Result<BTreeMap<K, f64>>
where
    K: FromStr + Ord,
    K::Err: std::error::Error + Send + Sync + 'static,
{
    let assignment_re = Regex::new(r"^\s*(\w+)\s*=\s*(-?(?:\d+\.?\d*|\.\d+))\s*$")?;

    let mut values = BTreeMap::new();
    for pair in pairs {
        let cap = assignment_re
            .captures(pair)
            .ok_or_else(|| anyhow!("expected NAME=NUMBER, got '{}'", pair))?;
        let key = cap[1].parse::<K>().with_context(|| format!("in '{}'", pair))?;
        let value = cap[2].parse::<f64>().with_context(|| format!("in '{}'", pair))?;
        values.insert(key, value);
    }
    Ok(values)
}

/// Parse selections such as `Farmer:basic=Fish,Work_clothes`.
///
/// Product names are kept verbatim; unknown products are ignored later on.
pub fn parse_selections(specs: &[String]) -> Result<DemandSelection> {
    let selection_re = Regex::new(r"^\s*(\w+)\s*:\s*(basic|luxury)\s*=\s*([\w,\s]*)$")?;

    let mut selection = DemandSelection::default();
    for spec in specs {
        let cap = selection_re
            .captures(spec)
            .ok_or_else(|| anyhow!("expected RESIDENT:basic|luxury=PRODUCT,..., got '{}'", spec))?;
        let resident = cap[1].parse::<ResidentType>().with_context(|| format!("in '{}'", spec))?;
        let tier = cap[2].parse::<NeedTier>()?;

        let products = cap[3]
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        selection.entry(resident).tier_mut(tier).extend(products);
    }
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_residents() {
        let residents: BTreeMap<ResidentType, f64> =
            parse_assignments(&args(&["Farmer=1200", "engineer = 50.5"])).unwrap();
        assert_eq!(residents[&ResidentType::Farmer], 1200.0);
        assert_eq!(residents[&ResidentType::Engineer], 50.5);
    }

    #[test]
    fn test_parse_negative_count_is_kept_for_validation() {
        let residents: BTreeMap<ResidentType, f64> = parse_assignments(&args(&["Worker=-3"])).unwrap();
        assert_eq!(residents[&ResidentType::Worker], -3.0);
    }

    #[test]
    fn test_parse_products() {
        let demand: BTreeMap<Product, f64> = parse_assignments(&args(&["Steam_carriages=4", "Coal=.5"])).unwrap();
        assert_eq!(demand[&Product::SteamCarriages], 4.0);
        assert_eq!(demand[&Product::Coal], 0.5);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_assignments::<Product>(&args(&["Coal"])).is_err());
        assert!(parse_assignments::<Product>(&args(&["Unobtainium=3"])).is_err());
    }

    #[test]
    fn test_parse_selections() {
        let selection = parse_selections(&args(&[
            "Farmer:basic=Fish, Work_clothes",
            "Farmer:luxury=Schnapps",
            "Investor:luxury=",
        ]))
        .unwrap();
        let farmer = selection.needs(ResidentType::Farmer).unwrap();
        assert_eq!(farmer.basic, ["Fish", "Work_clothes"]);
        assert_eq!(farmer.luxury, ["Schnapps"]);
        assert!(selection.needs(ResidentType::Investor).unwrap().luxury.is_empty());
        assert!(parse_selections(&args(&["Farmer:extra=Fish"])).is_err());
    }
}
