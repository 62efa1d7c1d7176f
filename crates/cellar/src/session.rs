//! One visitor's session: the cart, ratings, pairing guide, command palette
//! and the view flags that hang off them.
//!
//! All time-dependent behaviour takes an explicit `now`. Callers drive
//! expiry by calling [`Session::tick`].

use crate::cart::{Cart, CartError, CartLine, CartStore};
use crate::config::{
    ADDED_BADGE_MILLIS, PALETTE_SHORTCUT_COUNT, RATING_FLASH_MILLIS, UNDO_WINDOW_MILLIS,
};
use crate::pairing::{PairingSelection, Synergy};
use crate::palette::{build_actions, filter_actions, PaletteAction, PaletteCommand, PaletteState};
use crate::rating::{load_rating, store_rating, Rating};
use crate::routes::Route;
use crate::timer::{Deferred, OneShot};
use cellar_catalog::{top_by_nostalgia, Catalog, Price};
use cellar_storage::KeyValueStore;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub route: Route,
    pub cart_open: bool,
    pub checkout_open: bool,
}

impl Default for SessionView {
    fn default() -> Self {
        Self {
            route: Route::Home,
            cart_open: false,
            checkout_open: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckoutSummary {
    pub item_count: u64,
    pub total: Price,
}

pub struct Session<S> {
    catalog: Arc<Catalog>,
    cart: CartStore<Arc<Catalog>, S>,
    pairing: PairingSelection,
    palette: PaletteState,
    view: SessionView,
    added_badges: BTreeMap<String, OneShot>,
    rating_flashes: BTreeMap<String, OneShot>,
    undo: Deferred<CartLine>,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(catalog: Arc<Catalog>, storage: S) -> Self {
        let pairing = PairingSelection::new(&catalog);
        let cart = CartStore::load(Arc::clone(&catalog), storage);
        Self {
            catalog,
            cart,
            pairing,
            palette: PaletteState::new(),
            view: SessionView::default(),
            added_badges: BTreeMap::new(),
            rating_flashes: BTreeMap::new(),
            undo: Deferred::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        self.cart.cart()
    }

    pub fn cart_store(&self) -> &CartStore<Arc<Catalog>, S> {
        &self.cart
    }

    pub fn into_storage(self) -> S {
        self.cart.into_storage()
    }

    pub fn view(&self) -> SessionView {
        self.view
    }

    pub fn navigate(&mut self, path: &str) -> Route {
        self.view.route = Route::from_path(path);
        debug!(route = self.view.route.path(), "navigate");
        self.view.route
    }

    /// Show the cart panel. An empty cart keeps it closed.
    pub fn open_cart(&mut self) -> bool {
        if self.cart.cart().is_empty() {
            return false;
        }
        self.view.cart_open = true;
        true
    }

    pub fn close_cart(&mut self) {
        self.view.cart_open = false;
        self.view.checkout_open = false;
    }

    fn close_panels_if_empty(&mut self) {
        if self.cart.cart().is_empty() {
            self.close_cart();
        }
    }

    // cart

    /// Add one unit and flash the "Added!" badge for that item.
    pub fn add_to_cart(&mut self, item_id: &str, now: Instant) -> Result<u32, CartError> {
        let quantity = self.cart.add_item(item_id)?;
        self.added_badges
            .entry(item_id.to_string())
            .or_default()
            .arm(now, Duration::from_millis(ADDED_BADGE_MILLIS));
        Ok(quantity)
    }

    pub fn is_recently_added(&self, item_id: &str) -> bool {
        self.added_badges
            .get(item_id)
            .is_some_and(OneShot::is_armed)
    }

    /// Remove a line and hold it for undo. A newer removal replaces the
    /// pending one.
    pub fn remove_with_undo(&mut self, item_id: &str, now: Instant) -> Option<CartLine> {
        let removed = self.cart.remove_item(item_id)?;
        let window = Duration::from_millis(UNDO_WINDOW_MILLIS);
        if let Some(dropped) = self.undo.schedule(removed.clone(), now, window) {
            debug!(item_id = dropped.item_id(), "undo superseded");
        }
        self.close_panels_if_empty();
        Some(removed)
    }

    pub fn pending_undo(&self) -> Option<&CartLine> {
        self.undo.pending()
    }

    /// Restore the most recent removal if its window is still open.
    pub fn undo_removal(&mut self, now: Instant) -> Result<Option<CartLine>, CartError> {
        let Some(line) = self.undo.take(now) else {
            return Ok(None);
        };
        self.cart
            .set_quantity(line.item_id(), i64::from(line.quantity()))?;
        Ok(Some(line))
    }

    pub fn update_quantity(&mut self, item_id: &str, quantity: i64) -> Result<u32, CartError> {
        let quantity = self.cart.set_quantity(item_id, quantity)?;
        self.close_panels_if_empty();
        Ok(quantity)
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.close_panels_if_empty();
    }

    // checkout

    /// Open the confirmation step. Refused for an empty cart.
    pub fn request_checkout(&mut self) -> bool {
        if self.cart.cart().is_empty() {
            return false;
        }
        self.view.checkout_open = true;
        true
    }

    pub fn cancel_checkout(&mut self) {
        self.view.checkout_open = false;
    }

    /// Clear the cart and close both panels. Only valid while the
    /// confirmation step is open.
    pub fn confirm_checkout(&mut self) -> Option<CheckoutSummary> {
        if !self.view.checkout_open {
            return None;
        }
        let summary = CheckoutSummary {
            item_count: self.cart.item_count(),
            total: self.cart.total(),
        };
        self.cart.clear();
        self.undo.cancel();
        self.close_cart();
        info!(
            items = summary.item_count,
            total = %summary.total,
            "checkout confirmed"
        );
        Some(summary)
    }

    // ratings

    pub fn rating(&self, item_id: &str) -> Option<Rating> {
        load_rating(self.cart.storage(), item_id)
    }

    /// Record a rating and flash the confirmation. Unknown cereals are
    /// ignored. Returns whether the rating was accepted.
    pub fn rate(&mut self, item_id: &str, rating: Rating, now: Instant) -> bool {
        if self.catalog.cereal(item_id).is_none() {
            warn!(item_id, "rating for unknown cereal ignored");
            return false;
        }
        store_rating(self.cart.storage_mut(), item_id, rating);
        self.rating_flashes
            .entry(item_id.to_string())
            .or_default()
            .arm(now, Duration::from_millis(RATING_FLASH_MILLIS));
        true
    }

    pub fn is_rating_flashing(&self, item_id: &str) -> bool {
        self.rating_flashes
            .get(item_id)
            .is_some_and(OneShot::is_armed)
    }

    // pairing

    pub fn pairing(&self) -> &PairingSelection {
        &self.pairing
    }

    pub fn select_cereal(&mut self, id: &str) -> bool {
        self.pairing.select_primary(&self.catalog, id)
    }

    pub fn select_milk(&mut self, id: &str) -> bool {
        self.pairing.select_modifier(&self.catalog, id)
    }

    pub fn synergy(&self) -> Synergy {
        self.pairing.evaluate(&self.catalog)
    }

    // palette

    pub fn palette(&self) -> &PaletteState {
        &self.palette
    }

    pub fn toggle_palette(&mut self) {
        self.palette.toggle();
    }

    pub fn set_palette_query(&mut self, query: &str) {
        self.palette.set_query(query);
    }

    pub fn palette_actions(&self) -> Vec<PaletteAction> {
        let shortcuts = top_by_nostalgia(&self.catalog, PALETTE_SHORTCUT_COUNT);
        build_actions(self.cart.item_count(), &shortcuts)
    }

    pub fn palette_results(&self) -> Vec<PaletteAction> {
        let actions = self.palette_actions();
        filter_actions(&actions, self.palette.query())
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn palette_move_down(&mut self) {
        let len = self.palette_results().len();
        self.palette.move_down(len);
    }

    pub fn palette_move_up(&mut self) {
        self.palette.move_up();
    }

    /// Run the highlighted action and close the palette.
    pub fn execute_palette(&mut self) -> Option<PaletteCommand> {
        let results = self.palette_results();
        let index = self.palette.active_index(results.len())?;
        let command = results.into_iter().nth(index)?.command;
        self.run_command(&command);
        self.palette.close();
        Some(command)
    }

    /// Palette adds skip the "Added!" badge but open the cart panel.
    /// Clearing goes through the checkout confirmation step.
    pub fn run_command(&mut self, command: &PaletteCommand) {
        match command {
            PaletteCommand::Navigate { route } => {
                self.navigate(route.path());
            }
            PaletteCommand::OpenCart => {
                self.open_cart();
            }
            PaletteCommand::ClearCart => {
                self.request_checkout();
            }
            PaletteCommand::AddToCart { item_id } => match self.cart.add_item(item_id) {
                Ok(_) => {
                    self.open_cart();
                }
                Err(e) => {
                    warn!(item_id = item_id.as_str(), error = %e, "palette add failed");
                }
            },
        }
    }

    // timers

    /// Expire badges, flashes and the undo window.
    pub fn tick(&mut self, now: Instant) {
        self.added_badges.retain(|_, timer| !timer.poll(now));
        self.rating_flashes.retain(|_, timer| !timer.poll(now));
        if let Some(line) = self.undo.poll(now) {
            debug!(item_id = line.item_id(), "undo window closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellar_storage::MemoryStore;

    fn session() -> Session<MemoryStore> {
        let catalog = Arc::new(Catalog::builtin().unwrap());
        Session::new(catalog, MemoryStore::new())
    }

    #[test]
    fn starts_on_home_with_first_cereal_selected() {
        let s = session();
        assert_eq!(s.view(), SessionView::default());
        assert_eq!(s.pairing().primary_id(), "c1");
        assert_eq!(s.synergy(), Synergy::NONE);
    }

    #[test]
    fn checkout_requires_items() {
        let mut s = session();
        assert!(!s.request_checkout());
        assert!(s.confirm_checkout().is_none());
    }

    #[test]
    fn palette_add_does_not_flash_badge() {
        let mut s = session();
        s.run_command(&PaletteCommand::AddToCart {
            item_id: "c2".to_string(),
        });
        assert_eq!(s.cart().quantity("c2"), 1);
        assert!(!s.is_recently_added("c2"));
    }

    #[test]
    fn empty_cart_panel_stays_closed() {
        let mut s = session();
        assert!(!s.open_cart());
        assert!(!s.view().cart_open);
        s.run_command(&PaletteCommand::OpenCart);
        assert!(!s.view().cart_open);
    }

    #[test]
    fn tick_clears_expired_badge() {
        let mut s = session();
        let t0 = Instant::now();
        s.add_to_cart("c1", t0).unwrap();
        assert!(s.is_recently_added("c1"));
        s.tick(t0 + Duration::from_millis(1999));
        assert!(s.is_recently_added("c1"));
        s.tick(t0 + Duration::from_millis(2000));
        assert!(!s.is_recently_added("c1"));
    }
}
