//! # Food Cost
//!
//! A recipe costing engine: converts as-purchased quantities into
//! edible-portion units, computes per-ingredient and per-recipe costs and
//! applies portion division and a spice-factor surcharge.

pub mod config;
pub mod costing;
pub mod costing_errors;
pub mod currency;
pub mod localization;
pub mod recipe;
pub mod report;
pub mod units;
