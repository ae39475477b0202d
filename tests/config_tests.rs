//! # Configuration Tests
//!
//! Loading unit tables named by the configuration.

use anyhow::Result;
use food_cost::config::AppConfig;
use food_cost::costing::{CostingEngine, IngredientRow, RowStatus};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_units(json: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(json.as_bytes())?;
    Ok(file)
}

#[test]
fn test_standard_table_without_units_file() -> Result<()> {
    let config = AppConfig::default();
    let units = config.load_unit_table()?;
    assert_eq!(units.len(), 8);
    assert!(units.contains("gallons"));
    Ok(())
}

#[test]
fn test_custom_units_file() -> Result<()> {
    let file = write_units(
        r#"[
            {"name": "grams", "group": "weight", "factor": 1.0},
            {"name": "kilograms", "group": "weight", "factor": 1000.0},
            {"name": "each", "group": "count", "factor": 1.0}
        ]"#,
    )?;
    let config = AppConfig {
        units_file: Some(file.path().to_path_buf()),
        ..AppConfig::default()
    };

    let engine = CostingEngine::new(config.load_unit_table()?);
    let cost = engine.calculate_row(&IngredientRow::new(250.0, "grams", 100.0, 1.0, "kilograms", 8.0));
    assert_eq!(cost.status, RowStatus::Ok);
    assert!((cost.extended_cost - 2.0).abs() < 1e-9);

    // The standard units are gone
    let cost = engine.calculate_row(&IngredientRow::new(1.0, "ounces", 100.0, 1.0, "pounds", 8.0));
    assert_eq!(cost.status, RowStatus::Error);

    Ok(())
}

#[test]
fn test_invalid_units_file() -> Result<()> {
    let file = write_units(r#"[{"name": "grams", "group": "weight", "factor": -1.0}]"#)?;
    let config = AppConfig {
        units_file: Some(file.path().to_path_buf()),
        ..AppConfig::default()
    };

    let err = config.load_unit_table().unwrap_err();
    assert!(format!("{err:#}").contains("Invalid unit table"));

    let file = write_units(r#"[{"name": "grams", "group": "mass", "factor": 1.0}]"#)?;
    let config = AppConfig {
        units_file: Some(file.path().to_path_buf()),
        ..AppConfig::default()
    };
    assert!(config.load_unit_table().is_err());

    Ok(())
}

#[test]
fn test_missing_units_file() {
    let config = AppConfig {
        units_file: Some("/nonexistent/units.json".into()),
        ..AppConfig::default()
    };
    let err = config.load_unit_table().unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read unit table"));
}
