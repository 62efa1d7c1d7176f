//! Cart state machine with write-through persistence.
//!
//! The cart is a list of `{itemId, quantity}` lines, unique by item, in
//! insertion order. Quantities are always at least one; driving a line to
//! zero removes it. Every mutation persists the full cart under a single
//! storage key. Persistence is best-effort: a failed write is logged and the
//! in-memory cart stays authoritative.

use crate::config::CART_STORAGE_KEY;
use cellar_catalog::{CatalogLookup, Price};
use cellar_storage::{KeyValueStore, StorageError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("unknown catalog item: {0}")]
    UnknownItem(String),
    #[error("storage: {0}")]
    Storage(#[from] StorageError),
    #[error("encode: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    item_id: String,
    quantity: u32,
}

impl CartLine {
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Converts a caller-supplied quantity to a storable one. Non-positive values
/// have no line representation.
fn line_quantity(quantity: i64) -> Option<u32> {
    if quantity <= 0 {
        return None;
    }
    Some(u32::try_from(quantity).unwrap_or(u32::MAX))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, item_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.item_id == item_id)
    }

    pub fn quantity(&self, item_id: &str) -> u32 {
        self.line(item_id).map(|l| l.quantity).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of `quantity * price`. Lines the catalog cannot resolve add nothing.
    pub fn total(&self, catalog: &impl CatalogLookup) -> Price {
        self.lines
            .iter()
            .fold(Price::ZERO, |acc, line| match catalog.lookup(&line.item_id) {
                Some(item) => {
                    acc.saturating_add(item.price.saturating_mul(u64::from(line.quantity)))
                }
                None => acc,
            })
    }

    fn position(&self, item_id: &str) -> Option<usize> {
        self.lines.iter().position(|l| l.item_id == item_id)
    }

    fn add_quantity(&mut self, item_id: &str, quantity: u32) -> u32 {
        match self.position(item_id) {
            Some(idx) => {
                let line = &mut self.lines[idx];
                line.quantity = line.quantity.saturating_add(quantity);
                line.quantity
            }
            None => {
                self.lines.push(CartLine {
                    item_id: item_id.to_string(),
                    quantity,
                });
                quantity
            }
        }
    }

    fn set_quantity(&mut self, item_id: &str, quantity: u32) {
        match self.position(item_id) {
            Some(idx) => self.lines[idx].quantity = quantity,
            None => self.lines.push(CartLine {
                item_id: item_id.to_string(),
                quantity,
            }),
        }
    }

    fn remove(&mut self, item_id: &str) -> Option<CartLine> {
        self.position(item_id).map(|idx| self.lines.remove(idx))
    }

    fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.lines)
    }

    /// Decode a persisted cart. Anything that is not a JSON array becomes an
    /// empty cart; individual malformed or non-positive entries are skipped
    /// and duplicate ids are merged.
    pub fn from_json(raw: &str) -> Cart {
        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "persisted cart is not valid json; starting empty");
                return Cart::new();
            }
        };
        let serde_json::Value::Array(entries) = value else {
            warn!("persisted cart is not a list; starting empty");
            return Cart::new();
        };

        let mut cart = Cart::new();
        for (index, entry) in entries.into_iter().enumerate() {
            let stored: StoredLine = match serde_json::from_value(entry) {
                Ok(stored) => stored,
                Err(_) => {
                    debug!(index, "skipping malformed cart entry");
                    continue;
                }
            };
            let (item_id, quantity) = stored.into_parts();
            match line_quantity(quantity) {
                Some(q) => {
                    cart.add_quantity(&item_id, q);
                }
                None => debug!(
                    index,
                    item_id = item_id.as_str(),
                    quantity,
                    "skipping non-positive cart entry"
                ),
            }
        }
        cart
    }
}

/// Wire shapes accepted on load. `Embedded` is the legacy browser layout
/// that stored the whole cereal record next to the quantity.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredLine {
    Current {
        #[serde(rename = "itemId")]
        item_id: String,
        quantity: i64,
    },
    Embedded {
        cereal: EmbeddedItem,
        quantity: i64,
    },
}

#[derive(Deserialize)]
struct EmbeddedItem {
    id: String,
}

impl StoredLine {
    fn into_parts(self) -> (String, i64) {
        match self {
            StoredLine::Current { item_id, quantity } => (item_id, quantity),
            StoredLine::Embedded { cereal, quantity } => (cereal.id, quantity),
        }
    }
}

/// Owns the session cart plus the storage it writes through to.
#[derive(Debug)]
pub struct CartStore<C, S> {
    catalog: C,
    storage: S,
    cart: Cart,
}

impl<C: CatalogLookup, S: KeyValueStore> CartStore<C, S> {
    /// Rehydrate from storage. A missing key, unreadable storage, or a
    /// corrupt payload all yield an empty cart.
    pub fn load(catalog: C, storage: S) -> Self {
        let cart = match storage.get(CART_STORAGE_KEY) {
            Ok(Some(raw)) => Cart::from_json(&raw),
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(error = %e, "cart storage unreadable; starting empty");
                Cart::new()
            }
        };
        debug!(lines = cart.lines().len(), "cart loaded");
        Self {
            catalog,
            storage,
            cart,
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    pub fn total(&self) -> Price {
        self.cart.total(&self.catalog)
    }

    /// Increment the line for `item_id`, creating it at quantity one.
    /// Returns the new quantity. Unknown ids are rejected untouched.
    pub fn add_item(&mut self, item_id: &str) -> Result<u32, CartError> {
        if !self.catalog.contains(item_id) {
            return Err(CartError::UnknownItem(item_id.to_string()));
        }
        let quantity = self.cart.add_quantity(item_id, 1);
        debug!(item_id, quantity, "cart add");
        self.persist();
        Ok(quantity)
    }

    /// Remove the line if present. Absent ids are a no-op.
    pub fn remove_item(&mut self, item_id: &str) -> Option<CartLine> {
        let removed = self.cart.remove(item_id);
        debug!(item_id, removed = removed.is_some(), "cart remove");
        self.persist();
        removed
    }

    /// Set the exact quantity. `quantity <= 0` removes the line. Creating a
    /// line requires a known id; existing lines are updated regardless.
    /// Returns the resulting quantity (zero when removed).
    pub fn set_quantity(&mut self, item_id: &str, quantity: i64) -> Result<u32, CartError> {
        let Some(quantity) = line_quantity(quantity) else {
            self.remove_item(item_id);
            return Ok(0);
        };
        if self.cart.line(item_id).is_none() && !self.catalog.contains(item_id) {
            return Err(CartError::UnknownItem(item_id.to_string()));
        }
        self.cart.set_quantity(item_id, quantity);
        debug!(item_id, quantity, "cart set quantity");
        self.persist();
        Ok(quantity)
    }

    pub fn clear(&mut self) {
        self.cart.clear();
        debug!("cart cleared");
        self.persist();
    }

    pub fn save(&mut self) -> Result<(), CartError> {
        let payload = self.cart.to_json()?;
        self.storage.set(CART_STORAGE_KEY, &payload)?;
        Ok(())
    }

    fn persist(&mut self) {
        if let Err(e) = self.save() {
            warn!(error = %e, "cart persist failed; keeping in-memory state");
        }
    }
}
