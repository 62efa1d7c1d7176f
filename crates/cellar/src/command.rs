use cellar_catalog::{PriceBand, SortKey};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CatalogArgs {
    pub sort: SortKey,
    pub band: PriceBand,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    Show,
    Add { item_id: String },
    Remove { item_id: String },
    Set { item_id: String, quantity: i64 },
    Checkout,
}

#[derive(Debug, Clone)]
pub struct CartArgs {
    pub data_dir: PathBuf,
    pub action: CartAction,
}

#[derive(Debug, Clone)]
pub struct PairArgs {
    pub cereal: Option<String>,
    pub milk: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RateArgs {
    pub data_dir: PathBuf,
    pub item_id: String,
    pub value: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct PaletteArgs {
    pub data_dir: PathBuf,
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct PrerenderArgs {
    pub dist: PathBuf,
    pub site_url: String,
}
