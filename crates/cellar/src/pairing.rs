//! Cereal x milk synergy scoring.

use cellar_catalog::{Catalog, CatalogItem, MilkItem};
use serde::Serialize;

pub const BASE_SCORE: u8 = 85;
pub const RECOMMENDATION_BONUS: u8 = 10;
pub const CLASH_SCORE: u8 = 12;
pub const MAX_SCORE: u8 = 100;

const CLASH_PRIMARY_MARKER: &str = "Chocolate";
const CLASH_MODIFIER_MARKER: &str = "Strawberry";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SynergyLabel {
    #[serde(rename = "no selection")]
    NoSelection,
    #[serde(rename = "potentially hazardous")]
    PotentiallyHazardous,
    #[serde(rename = "palatable")]
    Palatable,
    #[serde(rename = "harmonious")]
    Harmonious,
    #[serde(rename = "transcendental")]
    Transcendental,
}

impl SynergyLabel {
    /// Band for a score computed with a modifier present.
    pub fn for_score(score: u8) -> Self {
        match score {
            0..=39 => SynergyLabel::PotentiallyHazardous,
            40..=69 => SynergyLabel::Palatable,
            70..=89 => SynergyLabel::Harmonious,
            _ => SynergyLabel::Transcendental,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SynergyLabel::NoSelection => "no selection",
            SynergyLabel::PotentiallyHazardous => "potentially hazardous",
            SynergyLabel::Palatable => "palatable",
            SynergyLabel::Harmonious => "harmonious",
            SynergyLabel::Transcendental => "transcendental",
        }
    }

    /// Display heading used by the pairing guide.
    pub fn title(self) -> &'static str {
        match self {
            SynergyLabel::NoSelection => "Awaiting Solvent...",
            SynergyLabel::PotentiallyHazardous => "Potentially Hazardous",
            SynergyLabel::Palatable => "Palatable",
            SynergyLabel::Harmonious => "Harmonious",
            SynergyLabel::Transcendental => "Transcendental",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Synergy {
    pub score: u8,
    pub label: SynergyLabel,
}

impl Synergy {
    pub const NONE: Synergy = Synergy {
        score: 0,
        label: SynergyLabel::NoSelection,
    };
}

/// True when either side names the other as its pairing.
pub fn is_recommended(primary: &CatalogItem, modifier: &MilkItem) -> bool {
    modifier.best_paired_with.iter().any(|id| *id == primary.id)
        || primary.recommended_milk_pairing.as_deref() == Some(modifier.id.as_str())
}

fn is_flavor_clash(primary: &CatalogItem, modifier: &MilkItem) -> bool {
    primary.name.contains(CLASH_PRIMARY_MARKER) && modifier.name.contains(CLASH_MODIFIER_MARKER)
}

/// Score a pairing. The recommendation bonus applies once even when both
/// directions match; the chocolate/strawberry clash overrides everything.
pub fn evaluate(primary: &CatalogItem, modifier: Option<&MilkItem>) -> Synergy {
    let Some(modifier) = modifier else {
        return Synergy::NONE;
    };

    let mut score = BASE_SCORE;
    if is_recommended(primary, modifier) {
        score = score.saturating_add(RECOMMENDATION_BONUS);
    }
    if is_flavor_clash(primary, modifier) {
        score = CLASH_SCORE;
    }
    let score = score.min(MAX_SCORE);

    Synergy {
        score,
        label: SynergyLabel::for_score(score),
    }
}

/// The pairing guide's transient selection. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingSelection {
    primary_id: String,
    modifier_id: Option<String>,
}

impl PairingSelection {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            primary_id: catalog.first_cereal().id.clone(),
            modifier_id: None,
        }
    }

    pub fn primary_id(&self) -> &str {
        &self.primary_id
    }

    pub fn modifier_id(&self) -> Option<&str> {
        self.modifier_id.as_deref()
    }

    /// Switch cereals. Any chosen milk is reset. Unknown ids are ignored.
    pub fn select_primary(&mut self, catalog: &Catalog, id: &str) -> bool {
        if catalog.cereal(id).is_none() {
            return false;
        }
        self.primary_id = id.to_string();
        self.modifier_id = None;
        true
    }

    pub fn select_modifier(&mut self, catalog: &Catalog, id: &str) -> bool {
        if catalog.milk(id).is_none() {
            return false;
        }
        self.modifier_id = Some(id.to_string());
        true
    }

    pub fn clear_modifier(&mut self) {
        self.modifier_id = None;
    }

    /// Ids that no longer resolve are treated as "no selection".
    pub fn evaluate(&self, catalog: &Catalog) -> Synergy {
        let Some(primary) = catalog.cereal(&self.primary_id) else {
            return Synergy::NONE;
        };
        let modifier = self.modifier_id.as_deref().and_then(|id| catalog.milk(id));
        evaluate(primary, modifier)
    }
}
