//! Cellar catalog: immutable cereal and milk records, loaded once at startup.
//!
//! - records are validated on construction (unique ids, flavor scores in range)
//! - lookups never fail loudly; an unknown id resolves to `None`
//! - the built-in fixture is embedded at compile time

pub mod browse;
pub mod fixtures;
pub mod types;

use std::collections::BTreeMap;
use std::sync::Arc;

pub use browse::{browse, top_by_nostalgia, CompareSelection, PriceBand, SortKey};
pub use types::{CatalogItem, FlavorProfile, MilkItem, MilkType, Price, Specs};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog has no cereals")]
    Empty,
    #[error("duplicate cereal id: {0}")]
    DuplicateCereal(String),
    #[error("duplicate milk id: {0}")]
    DuplicateMilk(String),
    #[error("flavor score out of range for {id}: {axis}={value}")]
    FlavorOutOfRange {
        id: String,
        axis: &'static str,
        value: u8,
    },
}

/// Read-only resolution of cereal ids. The cart depends on this seam only.
pub trait CatalogLookup {
    fn lookup(&self, id: &str) -> Option<&CatalogItem>;

    fn contains(&self, id: &str) -> bool {
        self.lookup(id).is_some()
    }
}

impl<T: CatalogLookup + ?Sized> CatalogLookup for &T {
    fn lookup(&self, id: &str) -> Option<&CatalogItem> {
        (**self).lookup(id)
    }
}

impl<T: CatalogLookup + ?Sized> CatalogLookup for Arc<T> {
    fn lookup(&self, id: &str) -> Option<&CatalogItem> {
        (**self).lookup(id)
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    cereals: Vec<CatalogItem>,
    milks: Vec<MilkItem>,
    cereal_index: BTreeMap<String, usize>,
    milk_index: BTreeMap<String, usize>,
}

impl Catalog {
    pub fn new(cereals: Vec<CatalogItem>, milks: Vec<MilkItem>) -> Result<Self, CatalogError> {
        if cereals.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut cereal_index = BTreeMap::new();
        for (idx, cereal) in cereals.iter().enumerate() {
            for (axis, value) in cereal.flavor.axes() {
                if value > FlavorProfile::MAX_SCORE {
                    return Err(CatalogError::FlavorOutOfRange {
                        id: cereal.id.clone(),
                        axis,
                        value,
                    });
                }
            }
            if cereal_index.insert(cereal.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateCereal(cereal.id.clone()));
            }
        }

        let mut milk_index = BTreeMap::new();
        for (idx, milk) in milks.iter().enumerate() {
            if milk_index.insert(milk.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateMilk(milk.id.clone()));
            }
        }

        Ok(Self {
            cereals,
            milks,
            cereal_index,
            milk_index,
        })
    }

    pub fn from_json(cereals_json: &str, milks_json: &str) -> Result<Self, CatalogError> {
        let cereals: Vec<CatalogItem> = serde_json::from_str(cereals_json)?;
        let milks: Vec<MilkItem> = serde_json::from_str(milks_json)?;
        Self::new(cereals, milks)
    }

    /// The embedded fifteen-cereal, six-milk fixture.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(fixtures::CEREALS_JSON, fixtures::MILKS_JSON)
    }

    pub fn cereals(&self) -> &[CatalogItem] {
        &self.cereals
    }

    pub fn milks(&self) -> &[MilkItem] {
        &self.milks
    }

    pub fn cereal(&self, id: &str) -> Option<&CatalogItem> {
        self.cereal_index.get(id).map(|&idx| &self.cereals[idx])
    }

    pub fn milk(&self, id: &str) -> Option<&MilkItem> {
        self.milk_index.get(id).map(|&idx| &self.milks[idx])
    }

    /// Default pairing primary. Construction guarantees at least one cereal.
    pub fn first_cereal(&self) -> &CatalogItem {
        &self.cereals[0]
    }
}

impl CatalogLookup for Catalog {
    fn lookup(&self, id: &str) -> Option<&CatalogItem> {
        self.cereal(id)
    }
}
