use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-negative currency amount, held as whole cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(u64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub const fn from_cents(cents: u64) -> Self {
        Price(cents)
    }

    /// Convert a decimal amount (e.g. `450.00`) into cents.
    ///
    /// Returns `None` for negative, NaN, infinite, or unrepresentable values.
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let cents = (value * 100.0).round();
        if cents >= u64::MAX as f64 {
            return None;
        }
        Some(Price(cents as u64))
    }

    pub fn cents(self) -> u64 {
        self.0
    }

    pub fn as_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn saturating_add(self, other: Price) -> Price {
        Price(self.0.saturating_add(other.0))
    }

    pub fn saturating_mul(self, quantity: u64) -> Price {
        Price(self.0.saturating_mul(quantity))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Price::from_decimal(value)
            .ok_or_else(|| de::Error::custom("price must be a finite non-negative amount"))
    }
}

/// Four tasting axes, each scored 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorProfile {
    pub crunch: u8,
    pub sweetness: u8,
    pub nostalgia: u8,
    pub particulate: u8,
}

impl FlavorProfile {
    pub const MAX_SCORE: u8 = 100;

    pub fn axes(&self) -> [(&'static str, u8); 4] {
        [
            ("crunch", self.crunch),
            ("sweetness", self.sweetness),
            ("nostalgia", self.nostalgia),
            ("particulate", self.particulate),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specs {
    /// Seconds until soggy.
    pub decay_rate: u32,
    /// Grams per serving.
    pub sugar_content: u32,
}

/// A cereal record. Read-only fixture data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub vintage: u16,
    pub region: String,
    pub price: Price,
    #[serde(default)]
    pub tasting_notes: Vec<String>,
    pub specs: Specs,
    pub flavor: FlavorProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_milk_pairing: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilkType {
    Dairy,
    Plant,
    Experimental,
}

impl MilkType {
    pub fn as_str(self) -> &'static str {
        match self {
            MilkType::Dairy => "dairy",
            MilkType::Plant => "plant",
            MilkType::Experimental => "experimental",
        }
    }
}

/// A milk record ("solvent" in the pairing guide).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilkItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MilkType,
    pub flavor_notes: String,
    pub fat_content: String,
    pub viscosity: String,
    #[serde(default)]
    pub best_paired_with: Vec<String>,
}
