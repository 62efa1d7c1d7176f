//! Per-cereal star ratings, one storage key per cereal.

use crate::config::RATING_KEY_PREFIX;
use cellar_storage::KeyValueStore;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Option<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            u8::try_from(value).ok().map(Rating)
        } else {
            None
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Soggy Disappointment",
            2 => "Breakfast Regret",
            3 => "Mediocre Morning",
            4 => "Acceptable Crunch",
            _ => "Nostalgic Perfection",
        }
    }

    /// Read a stored value the way a lenient integer parse would: optional
    /// leading whitespace and sign, then leading digits. Trailing garbage is
    /// ignored; no digits or an out-of-range value yields `None`.
    pub fn parse_persisted(raw: &str) -> Option<Self> {
        let s = raw.trim_start();
        let (negative, digits) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        if end == 0 {
            return None;
        }
        let magnitude: i64 = digits[..end].parse().ok()?;
        Rating::new(if negative { -magnitude } else { magnitude })
    }
}

pub fn rating_key(item_id: &str) -> String {
    format!("{RATING_KEY_PREFIX}{item_id}")
}

/// Missing, unreadable, or out-of-range values all read as unrated.
pub fn load_rating<S: KeyValueStore + ?Sized>(storage: &S, item_id: &str) -> Option<Rating> {
    match storage.get(&rating_key(item_id)) {
        Ok(Some(raw)) => Rating::parse_persisted(&raw),
        Ok(None) => None,
        Err(e) => {
            warn!(item_id, error = %e, "rating storage unreadable");
            None
        }
    }
}

/// Best-effort write. Returns whether the value reached storage.
pub fn store_rating<S: KeyValueStore + ?Sized>(
    storage: &mut S,
    item_id: &str,
    rating: Rating,
) -> bool {
    match storage.set(&rating_key(item_id), &rating.value().to_string()) {
        Ok(()) => {
            debug!(item_id, rating = rating.value(), "rating stored");
            true
        }
        Err(e) => {
            warn!(item_id, error = %e, "rating persist failed");
            false
        }
    }
}
