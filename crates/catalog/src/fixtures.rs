//! Embedded fixture tables.

pub const CEREALS_JSON: &str = include_str!("../data/cereals.json");
pub const MILKS_JSON: &str = include_str!("../data/milks.json");
