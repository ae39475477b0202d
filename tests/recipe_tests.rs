//! # Recipe Tests
//!
//! Loading recipe documents, costing them end to end and rendering the
//! resulting cost sheet.

use anyhow::Result;
use food_cost::costing::{CostingEngine, RowStatus};
use food_cost::localization::LocalizationManager;
use food_cost::recipe::{CostSheet, Recipe};
use food_cost::report::format_cost_sheet;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/sample_recipe.json")
}

fn expected_sample_total() -> f64 {
    let shallots = 2.0 / 16.0 / 0.8 * 10.0;
    let olive_oil = 24.0 / 3.78541;
    let vinegar = 3.5 / (946.353 / 29.5735) * 8.0;
    shallots + olive_oil + vinegar
}

#[test]
fn test_load_sample_recipe() -> Result<()> {
    let recipe = Recipe::load(sample_path())?;

    assert_eq!(recipe.recipe_name, "House vinaigrette");
    assert_eq!(recipe.portions, 12.0);
    assert_eq!(recipe.spice_factor_percent, 10.0);
    assert_eq!(recipe.items.len(), 5);
    assert_eq!(recipe.items[0].row.ap_price, Some(2.0));
    assert_eq!(recipe.items[4].row.ep_quantity, None);

    Ok(())
}

#[test]
fn test_cost_sample_recipe() -> Result<()> {
    let engine = CostingEngine::default();
    let sheet = Recipe::load(sample_path())?.cost(&engine);

    let statuses: Vec<RowStatus> = sheet.lines.iter().map(|l| l.cost.status).collect();
    assert_eq!(
        statuses,
        vec![
            RowStatus::Ok,
            RowStatus::Ok,
            RowStatus::Ok,
            RowStatus::Error,
            RowStatus::Empty
        ]
    );

    let expected_total = expected_sample_total();
    assert!((sheet.totals.total_cost - expected_total).abs() < 1e-9);
    assert!((sheet.totals.cost_per_portion - expected_total / 12.0).abs() < 1e-9);
    assert!((sheet.totals.total_with_spice - expected_total / 12.0 * 1.1).abs() < 1e-9);

    let unavailable: Vec<&str> = sheet.unavailable_lines().map(|l| l.ingredient.as_str()).collect();
    assert_eq!(unavailable, vec!["dijon mustard"]);

    Ok(())
}

#[test]
fn test_recipe_defaults_and_trimming() -> Result<()> {
    let recipe = Recipe::from_json_str(
        r#"{"recipe_name": "  Toast  ", "items": [{"ingredient": " bread ", "ep_quantity": 2}]}"#,
    )?;

    assert_eq!(recipe.recipe_name, "Toast");
    assert_eq!(recipe.portions, 0.0);
    assert_eq!(recipe.items[0].ingredient, "bread");
    assert_eq!(recipe.items[0].row.ep_unit, "each");
    assert_eq!(recipe.items[0].row.ap_unit, "each");

    let sheet = recipe.cost(&CostingEngine::default());
    assert_eq!(sheet.lines[0].cost.status, RowStatus::Empty);
    assert_eq!(sheet.totals.cost_per_portion, 0.0);

    Ok(())
}

#[test]
fn test_portions_and_spice_as_form_text() -> Result<()> {
    let recipe = Recipe::from_json_str(
        r#"{"recipe_name": "Toast", "portions": "12", "spice_factor_percent": " 10 ",
            "items": [{"ingredient": "bread", "ep_quantity": "2", "ep_unit": "each",
                       "yield_percent": "100", "ap_quantity": "24", "ap_unit": "each",
                       "ap_price": "$-4.80"}]}"#,
    )?;

    assert_eq!(recipe.portions, 12.0);
    assert_eq!(recipe.spice_factor_percent, 10.0);
    assert_eq!(recipe.items[0].row.ap_price, Some(-4.8));

    let sheet = recipe.cost(&CostingEngine::default());
    assert!((sheet.totals.total_cost + 0.4).abs() < 1e-9);
    assert!((sheet.totals.cost_per_portion + 0.4 / 12.0).abs() < 1e-9);

    Ok(())
}

#[test]
fn test_unfilled_portions_and_spice_read_as_zero() -> Result<()> {
    for json in [
        r#"{"recipe_name": "Toast", "portions": null, "spice_factor_percent": null}"#,
        r#"{"recipe_name": "Toast", "portions": "", "spice_factor_percent": "  "}"#,
    ] {
        let recipe = Recipe::from_json_str(json)?;
        assert_eq!(recipe.portions, 0.0);
        assert_eq!(recipe.spice_factor_percent, 0.0);
    }

    let recipe = Recipe::from_json_str(
        r#"{"recipe_name": "Toast", "portions": null,
            "items": [{"ingredient": "bread", "ep_quantity": 2, "yield_percent": 100,
                       "ap_quantity": 1, "ap_price": 0.5}]}"#,
    )?;
    let sheet = recipe.cost(&CostingEngine::default());
    assert!((sheet.totals.total_cost - 1.0).abs() < 1e-9);
    assert_eq!(sheet.totals.cost_per_portion, 0.0);

    assert!(Recipe::from_json_str(r#"{"recipe_name": "Toast", "portions": "a dozen"}"#).is_err());

    Ok(())
}

#[test]
fn test_invalid_recipe_file() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"{\"recipe_name\": 12}")?;

    let err = Recipe::load(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("Invalid recipe file"));

    assert!(Recipe::load("/nonexistent/recipe.json").is_err());

    Ok(())
}

#[test]
fn test_bad_price_text_is_rejected() {
    let result = Recipe::from_json_str(
        r#"{"recipe_name": "Soup", "items": [{"ingredient": "leeks", "ap_price": "a lot"}]}"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_cost_sheet_json_round_trip() -> Result<()> {
    let sheet = Recipe::load(sample_path())?.cost(&CostingEngine::default());

    let json = serde_json::to_value(&sheet)?;
    assert_eq!(json["lines"][0]["ingredient"], "shallots");
    assert_eq!(json["lines"][0]["status"], "ok");
    assert_eq!(json["lines"][3]["status"], "error");
    assert_eq!(json["lines"][4]["status"], "empty");

    let parsed: CostSheet = serde_json::from_value(json)?;
    assert_eq!(parsed.lines.len(), sheet.lines.len());
    assert_eq!(parsed.lines[3].cost.error, sheet.lines[3].cost.error);

    Ok(())
}

#[test]
fn test_text_report() -> Result<()> {
    let sheet = Recipe::load(sample_path())?.cost(&CostingEngine::default());
    let localization = LocalizationManager::new()?;

    let report = format_cost_sheet(&sheet, &localization, "en", "$");
    assert!(report.starts_with("Cost sheet: House vinaigrette"));
    assert!(report.contains("1. shallots: EP 10 ounces | Yield 80% | AP 1 pounds @ $2.00"));
    assert!(report.contains("Extended cost $1.56"));
    assert!(report.contains("4. dijon mustard"));
    assert!(report.contains("Extended cost N/A"));
    assert!(report.contains("Cost not available for 1 ingredient(s): dijon mustard"));
    assert!(report.contains("Portions: 12"));
    assert!(report.contains("Spice factor: 10%"));

    let french = format_cost_sheet(&sheet, &localization, "fr-CA", "€");
    assert!(french.starts_with("Fiche de coût : House vinaigrette"));
    assert!(french.contains("Coût étendu N/D"));
    assert!(french.contains("€1.56"));

    Ok(())
}
