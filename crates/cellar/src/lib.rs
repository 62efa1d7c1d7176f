//! Cereal cellar storefront core: cart, pairing guide, ratings, command
//! palette and static route prerendering over the built-in catalog.

pub mod cart;
pub mod command;
pub mod config;
pub mod pairing;
pub mod palette;
pub mod prerender;
pub mod rating;
pub mod routes;
pub mod session;
pub mod timer;

pub use cart::{Cart, CartError, CartLine, CartStore};
pub use pairing::{PairingSelection, Synergy, SynergyLabel};
pub use rating::Rating;
pub use session::Session;

#[cfg(feature = "bin")]
pub mod cli;

#[cfg(feature = "bin")]
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    cli::run()
}
