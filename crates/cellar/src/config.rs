use std::env;
use std::path::PathBuf;

pub const CART_STORAGE_KEY: &str = "cereal-cellar-cart-v1";
pub const RATING_KEY_PREFIX: &str = "cereal-cellar-rating-";

pub const ADDED_BADGE_MILLIS: u64 = 2000;
pub const RATING_FLASH_MILLIS: u64 = 2000;
pub const UNDO_WINDOW_MILLIS: u64 = 5000;

pub const PALETTE_SHORTCUT_COUNT: usize = 3;

pub const SITE_URL: &str = "https://forbiddenlink.github.io/cereal-tasting";

pub const DATA_DIR_ENV: &str = "CELLAR_DATA_DIR";
pub const LOG_ENV: &str = "CELLAR_LOG";
pub const DEFAULT_LOG_FILTER: &str = "cellar=info";
const DEFAULT_DATA_DIR: &str = ".cellar";
const DEFAULT_DIST_DIR: &str = "dist";

pub fn default_data_dir() -> PathBuf {
    if let Some(v) = env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(v);
    }
    PathBuf::from(DEFAULT_DATA_DIR)
}

pub fn default_dist_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DIST_DIR)
}
