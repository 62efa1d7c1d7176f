//! Command palette: action list, substring filter and cursor.

use crate::routes::Route;
use cellar_catalog::CatalogItem;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaletteCommand {
    Navigate { route: Route },
    OpenCart,
    ClearCart,
    AddToCart { item_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteAction {
    pub id: String,
    pub label: String,
    pub subtitle: String,
    pub keywords: String,
    pub command: PaletteCommand,
}

impl PaletteAction {
    fn new(
        id: &str,
        label: String,
        subtitle: &str,
        keywords: String,
        command: PaletteCommand,
    ) -> Self {
        Self {
            id: id.to_string(),
            label,
            subtitle: subtitle.to_string(),
            keywords,
            command,
        }
    }

    fn navigate(id: &str, label: &str, subtitle: &str, keywords: &str, route: Route) -> Self {
        Self::new(
            id,
            label.to_string(),
            subtitle,
            keywords.to_string(),
            PaletteCommand::Navigate { route },
        )
    }

    fn haystack(&self) -> String {
        format!("{} {} {}", self.label, self.subtitle, self.keywords).to_lowercase()
    }
}

/// Fixed navigation entries, the cart entries, then one "add" entry per
/// shortcut cereal in the order given.
pub fn build_actions(item_count: u64, shortcuts: &[&CatalogItem]) -> Vec<PaletteAction> {
    let mut actions = vec![
        PaletteAction::navigate(
            "go-home",
            "Go to The Cellar",
            "Explore the full collection",
            "home cellar collection",
            Route::Home,
        ),
        PaletteAction::navigate(
            "go-pairings",
            "Open Pairing Guide",
            "Build milk and cereal matches",
            "pairing pairings guide milk",
            Route::Pairings,
        ),
        PaletteAction::navigate(
            "go-about",
            "View About",
            "Read the cellar story",
            "about story brand",
            Route::About,
        ),
        PaletteAction::new(
            "open-cart",
            format!("Open Cart ({item_count})"),
            "Review your current flight",
            "cart checkout flight".to_string(),
            PaletteCommand::OpenCart,
        ),
        PaletteAction::navigate(
            "go-contact",
            "Go to Contact",
            "Contact and partnerships",
            "contact email press",
            Route::Contact,
        ),
    ];

    if item_count > 0 {
        actions.push(PaletteAction::new(
            "clear-cart",
            "Clear Current Flight".to_string(),
            "Remove all items from cart",
            "clear reset cart".to_string(),
            PaletteCommand::ClearCart,
        ));
    }

    for item in shortcuts {
        actions.push(PaletteAction {
            id: format!("add-{}", item.id),
            label: format!("Add {}", item.name),
            subtitle: format!("Nostalgia {}/100", item.flavor.nostalgia),
            keywords: format!("add cereal {} nostalgia", item.name.to_lowercase()),
            command: PaletteCommand::AddToCart {
                item_id: item.id.clone(),
            },
        });
    }
    actions
}

pub fn filter_actions<'a>(actions: &'a [PaletteAction], query: &str) -> Vec<&'a PaletteAction> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return actions.iter().collect();
    }
    actions
        .iter()
        .filter(|action| action.haystack().contains(&needle))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaletteState {
    open: bool,
    query: String,
    cursor: usize,
}

impl PaletteState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn open(&mut self) {
        self.open = true;
        self.query.clear();
        self.cursor = 0;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.cursor = 0;
    }

    pub fn move_down(&mut self, len: usize) {
        self.cursor = if len == 0 {
            0
        } else {
            (self.cursor + 1).min(len - 1)
        };
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// The highlighted row, clamped to the current result length.
    pub fn active_index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.cursor.min(len - 1))
        }
    }
}
