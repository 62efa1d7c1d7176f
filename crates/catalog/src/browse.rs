use crate::types::{CatalogItem, Price};
use crate::Catalog;
use std::cmp::Ordering;

const BUDGET_CEILING: Price = Price::from_cents(50_000);
const LUXURY_FLOOR: Price = Price::from_cents(100_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceBand {
    #[default]
    All,
    Budget,
    Premium,
    Luxury,
}

impl PriceBand {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(PriceBand::All),
            "budget" => Some(PriceBand::Budget),
            "premium" => Some(PriceBand::Premium),
            "luxury" => Some(PriceBand::Luxury),
            _ => None,
        }
    }

    /// Unknown or missing query values fall back to the default band.
    pub fn from_query(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PriceBand::All => "all",
            PriceBand::Budget => "budget",
            PriceBand::Premium => "premium",
            PriceBand::Luxury => "luxury",
        }
    }

    pub fn contains(self, price: Price) -> bool {
        match self {
            PriceBand::All => true,
            PriceBand::Budget => price < BUDGET_CEILING,
            PriceBand::Premium => price >= BUDGET_CEILING && price < LUXURY_FLOOR,
            PriceBand::Luxury => price >= LUXURY_FLOOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Price,
    #[default]
    Vintage,
    Nostalgia,
    Name,
}

impl SortKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "price" => Some(SortKey::Price),
            "vintage" => Some(SortKey::Vintage),
            "nostalgia" => Some(SortKey::Nostalgia),
            "name" => Some(SortKey::Name),
            _ => None,
        }
    }

    pub fn from_query(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Price => "price",
            SortKey::Vintage => "vintage",
            SortKey::Nostalgia => "nostalgia",
            SortKey::Name => "name",
        }
    }

    fn compare(self, a: &CatalogItem, b: &CatalogItem) -> Ordering {
        match self {
            SortKey::Price => a.price.cmp(&b.price),
            SortKey::Vintage => a.vintage.cmp(&b.vintage),
            SortKey::Nostalgia => b.flavor.nostalgia.cmp(&a.flavor.nostalgia),
            SortKey::Name => a
                .name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name)),
        }
    }
}

/// Filtered, sorted view over the cereal list. Sorting is stable.
pub fn browse(catalog: &Catalog, band: PriceBand, sort: SortKey) -> Vec<&CatalogItem> {
    let mut view: Vec<&CatalogItem> = catalog
        .cereals()
        .iter()
        .filter(|c| band.contains(c.price))
        .collect();
    view.sort_by(|a, b| sort.compare(a, b));
    view
}

pub fn top_by_nostalgia(catalog: &Catalog, n: usize) -> Vec<&CatalogItem> {
    let mut view = browse(catalog, PriceBand::All, SortKey::Nostalgia);
    view.truncate(n);
    view
}

/// Side-by-side comparison slots. Holds at most two ids; a third selection
/// evicts the oldest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompareSelection {
    ids: Vec<String>,
}

impl CompareSelection {
    pub const CAPACITY: usize = 2;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: &str) {
        if let Some(pos) = self.ids.iter().position(|existing| existing == id) {
            self.ids.remove(pos);
            return;
        }
        if self.ids.len() >= Self::CAPACITY {
            self.ids.remove(0);
        }
        self.ids.push(id.to_string());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Selected records in catalog order, skipping ids the catalog lacks.
    pub fn resolve<'a>(&self, catalog: &'a Catalog) -> Vec<&'a CatalogItem> {
        catalog
            .cereals()
            .iter()
            .filter(|c| self.contains(&c.id))
            .collect()
    }
}
