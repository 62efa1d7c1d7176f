//! Static HTML prerendering of the built site shell.
//!
//! The built `index.html` is used as a template. For each route the head
//! metadata is rewritten and a crawlable fallback article is injected into
//! the empty application root, so every route explains itself before any
//! script runs.

use crate::routes::{absolute_url, RouteMetadata, RouteTable, NAV_LINKS};
use regex::{NoExpand, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum PrerenderError {
    #[error("read template {}: {source}", .path.display())]
    Template {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Title,
    Description,
    OgTitle,
    OgDescription,
    OgUrl,
    TwitterTitle,
    TwitterDescription,
    Canonical,
    ModifiedTime,
    Author,
    Root,
}

const RULES: [(Slot, &str); 11] = [
    (Slot::Title, r"<title>[^<]*</title>"),
    (Slot::Description, r#"<meta name="description" content="[^"]*"\s*/?>"#),
    (Slot::OgTitle, r#"<meta property="og:title" content="[^"]*"\s*/?>"#),
    (
        Slot::OgDescription,
        r#"<meta property="og:description" content="[^"]*"\s*/?>"#,
    ),
    (Slot::OgUrl, r#"<meta property="og:url" content="[^"]*"\s*/?>"#),
    (
        Slot::TwitterTitle,
        r#"<meta name="twitter:title" content="[^"]*"\s*/?>"#,
    ),
    (
        Slot::TwitterDescription,
        r#"<meta name="twitter:description" content="[^"]*"\s*/?>"#,
    ),
    (Slot::Canonical, r#"<link rel="canonical" href="[^"]*"\s*/?>"#),
    (
        Slot::ModifiedTime,
        r#"<meta property="article:modified_time" content="[^"]*"\s*/?>"#,
    ),
    (Slot::Author, r#"<meta name="author" content="[^"]*"\s*/?>"#),
    (Slot::Root, r#"<div id="root"></div>"#),
];

#[derive(Debug, Clone)]
pub struct Prerenderer {
    rules: Vec<(Slot, Regex)>,
    site_url: String,
}

impl Prerenderer {
    pub fn new(site_url: &str) -> Result<Self, PrerenderError> {
        let mut rules = Vec::with_capacity(RULES.len());
        for (slot, pattern) in RULES {
            rules.push((slot, Regex::new(pattern)?));
        }
        Ok(Self {
            rules,
            site_url: site_url.to_string(),
        })
    }

    /// Rewrite `template` for one route. Each tag is replaced at its first
    /// occurrence only, and only when present. Replacement text is inserted
    /// verbatim.
    pub fn apply(&self, template: &str, route: &RouteMetadata) -> String {
        let canonical = absolute_url(&self.site_url, &route.path);
        let mut html = template.to_string();
        for (slot, regex) in &self.rules {
            if !regex.is_match(&html) {
                continue;
            }
            let replacement = match slot {
                Slot::Title => format!("<title>{}</title>", route.title),
                Slot::Description => meta_name("description", &route.description),
                Slot::OgTitle => meta_property("og:title", &route.title),
                Slot::OgDescription => meta_property("og:description", &route.description),
                Slot::OgUrl => meta_property("og:url", &canonical),
                Slot::TwitterTitle => meta_name("twitter:title", &route.title),
                Slot::TwitterDescription => meta_name("twitter:description", &route.description),
                Slot::Canonical => format!(r#"<link rel="canonical" href="{canonical}" />"#),
                Slot::ModifiedTime => {
                    meta_property("article:modified_time", &route.published_at())
                }
                Slot::Author => meta_name("author", &route.author),
                Slot::Root => format!(r#"<div id="root">{}</div>"#, render_fallback_shell(route)),
            };
            html = regex.replace(&html, NoExpand(&replacement)).into_owned();
        }
        html
    }
}

fn meta_name(name: &str, content: &str) -> String {
    format!(r#"<meta name="{name}" content="{content}" />"#)
}

fn meta_property(property: &str, content: &str) -> String {
    format!(r#"<meta property="{property}" content="{content}" />"#)
}

/// The no-script article placed inside the application root.
pub fn render_fallback_shell(route: &RouteMetadata) -> String {
    let nav: String = NAV_LINKS
        .iter()
        .map(|link| {
            format!(
                r#"<a href="{}" class="prerender-nav-link">{}</a>"#,
                link.href, link.label
            )
        })
        .collect();
    let paragraphs: String = route
        .paragraphs
        .iter()
        .map(|p| format!("<p>{p}</p>"))
        .collect();
    let published = route.published_at();

    format!(
        r#"<main id="main-content" class="prerender-shell">
  <article class="prerender-article">
    <p class="prerender-kicker">{kicker}</p>
    <h1>{heading}</h1>
    <p class="prerender-meta">By <strong>{author}</strong> · <time datetime="{published}">{date}</time></p>
    {paragraphs}
    <nav class="prerender-nav" aria-label="Primary">
      {nav}
    </nav>
  </article>
</main>"#,
        kicker = route.kicker,
        heading = route.heading,
        author = route.author,
        date = route.date,
    )
}

/// `dist/index.html` for the root, `dist/<path>/index.html` otherwise.
pub fn route_output_path(dist: &Path, path: &str) -> PathBuf {
    let relative = path.trim_start_matches('/');
    if relative.is_empty() {
        dist.join("index.html")
    } else {
        dist.join(relative).join("index.html")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrerenderReport {
    pub written: Vec<PathBuf>,
}

fn write_html(path: &Path, html: &str) -> Result<(), PrerenderError> {
    let wrap = |source: std::io::Error| PrerenderError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(wrap)?;
    }
    fs::write(path, html).map_err(wrap)?;
    debug!(path = %path.display(), "wrote prerendered route");
    Ok(())
}

/// Render every route in `table` from `<dist>/index.html`, then the
/// not-found page as both `404.html` and `404/index.html`.
pub fn prerender_dist(
    dist: &Path,
    table: &RouteTable,
    site_url: &str,
) -> Result<PrerenderReport, PrerenderError> {
    let template_path = dist.join("index.html");
    let template =
        fs::read_to_string(&template_path).map_err(|source| PrerenderError::Template {
            path: template_path.clone(),
            source,
        })?;
    let renderer = Prerenderer::new(site_url)?;
    let mut report = PrerenderReport::default();

    for route in table.routes() {
        let out = route_output_path(dist, &route.path);
        write_html(&out, &renderer.apply(&template, route))?;
        report.written.push(out);
    }

    let not_found = table.not_found();
    let not_found_html = renderer.apply(&template, not_found);
    for out in [
        dist.join("404.html"),
        route_output_path(dist, &not_found.path),
    ] {
        write_html(&out, &not_found_html)?;
        report.written.push(out);
    }

    info!(
        dist = %dist.display(),
        "Prerendered {} static HTML routes",
        report.written.len()
    );
    Ok(report)
}
