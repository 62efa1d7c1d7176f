//! Site routes and their static page metadata.

use crate::config::SITE_URL;
use serde::{Deserialize, Serialize};

const ROUTES_JSON: &str = include_str!("../data/routes.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Home,
    Pairings,
    About,
    Contact,
    PrivacyPolicy,
    NotFound,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Home,
        Route::Pairings,
        Route::About,
        Route::Contact,
        Route::PrivacyPolicy,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Pairings => "/pairings",
            Route::About => "/about",
            Route::Contact => "/contact",
            Route::PrivacyPolicy => "/privacy-policy",
            Route::NotFound => "/404",
        }
    }

    /// Resolve a request path. Trailing slashes are ignored; anything
    /// unrecognised (including `/404` itself) is the not-found route.
    pub fn from_path(path: &str) -> Route {
        let normalized = normalize_path(path);
        Route::ALL
            .into_iter()
            .find(|r| r.path() == normalized)
            .unwrap_or(Route::NotFound)
    }
}

pub fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

pub fn canonical_url(path: &str) -> String {
    absolute_url(SITE_URL, path)
}

pub fn absolute_url(site_url: &str, path: &str) -> String {
    let site_url = site_url.trim_end_matches('/');
    match normalize_path(path) {
        "/" => format!("{site_url}/"),
        path => format!("{site_url}{path}/"),
    }
}

pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
}

pub const NAV_LINKS: [NavLink; 5] = [
    NavLink { href: "/", label: "Home" },
    NavLink { href: "/pairings/", label: "Pairings" },
    NavLink { href: "/about/", label: "About" },
    NavLink { href: "/contact/", label: "Contact" },
    NavLink { href: "/privacy-policy/", label: "Privacy Policy" },
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteMetadata {
    pub path: String,
    pub title: String,
    pub description: String,
    pub heading: String,
    pub kicker: String,
    pub author: String,
    pub date: String,
    pub paragraphs: Vec<String>,
}

impl RouteMetadata {
    /// `date` as an ISO-8601 midnight UTC timestamp.
    pub fn published_at(&self) -> String {
        format!("{}T00:00:00Z", self.date)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTable {
    routes: Vec<RouteMetadata>,
    not_found: RouteMetadata,
}

impl RouteTable {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn builtin() -> Result<Self, serde_json::Error> {
        Self::from_json(ROUTES_JSON)
    }

    pub fn routes(&self) -> &[RouteMetadata] {
        &self.routes
    }

    pub fn not_found(&self) -> &RouteMetadata {
        &self.not_found
    }

    pub fn metadata_for(&self, path: &str) -> &RouteMetadata {
        let path = normalize_path(path);
        self.routes
            .iter()
            .find(|r| r.path == path)
            .unwrap_or(&self.not_found)
    }
}
