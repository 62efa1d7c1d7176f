use cellar::prerender::{prerender_dist, route_output_path};
use cellar::routes::RouteTable;
use std::fs;

const TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <title>Vite App</title>
    <meta name="description" content="placeholder" />
    <meta property="og:title" content="placeholder">
    <meta property="og:description" content="placeholder" />
    <meta property="og:url" content="https://example.invalid/" />
    <meta name="twitter:title" content="placeholder" />
    <meta name="twitter:description" content="placeholder" />
    <link rel="canonical" href="https://example.invalid/" />
    <meta property="article:modified_time" content="2000-01-01T00:00:00Z" />
    <meta name="author" content="nobody" />
  </head>
  <body>
    <div id="root"></div>
  </body>
</html>
"#;

const SITE: &str = "https://forbiddenlink.github.io/cereal-tasting";

#[test]
fn writes_every_route_and_not_found_pages() {
    let dist = tempfile::tempdir().expect("tempdir");
    fs::write(dist.path().join("index.html"), TEMPLATE).unwrap();
    let table = RouteTable::builtin().unwrap();

    let report = prerender_dist(dist.path(), &table, SITE).unwrap();
    assert_eq!(report.written.len(), table.routes().len() + 2);

    for rel in [
        "index.html",
        "pairings/index.html",
        "about/index.html",
        "contact/index.html",
        "privacy-policy/index.html",
        "404.html",
        "404/index.html",
    ] {
        assert!(dist.path().join(rel).is_file(), "missing {}", rel);
    }
}

#[test]
fn about_page_metadata_is_rewritten() {
    let dist = tempfile::tempdir().expect("tempdir");
    fs::write(dist.path().join("index.html"), TEMPLATE).unwrap();
    let table = RouteTable::builtin().unwrap();
    prerender_dist(dist.path(), &table, SITE).unwrap();

    let about = table.metadata_for("/about");
    let html = fs::read_to_string(route_output_path(dist.path(), "/about")).unwrap();

    assert!(html.contains(&format!("<title>{}</title>", about.title)));
    assert!(html.contains(&format!(
        r#"<meta name="description" content="{}" />"#,
        about.description
    )));
    assert!(html.contains(&format!(
        r#"<meta property="og:title" content="{}" />"#,
        about.title
    )));
    assert!(html.contains(&format!(r#"<link rel="canonical" href="{}/about/" />"#, SITE)));
    assert!(html.contains(&format!(r#"<meta property="og:url" content="{}/about/" />"#, SITE)));
    let modified = r#"<meta property="article:modified_time" content="2026-02-10T00:00:00Z" />"#;
    assert!(html.contains(modified));
    assert!(html.contains(&format!(r#"<meta name="author" content="{}" />"#, about.author)));
    assert!(html.contains(r#"<div id="root"><main id="main-content" class="prerender-shell">"#));
    assert!(html.contains(&format!("<h1>{}</h1>", about.heading)));
    assert!(!html.contains("placeholder"));
    assert!(!html.contains("Vite App"));
}

#[test]
fn root_and_not_found_canonicals() {
    let dist = tempfile::tempdir().expect("tempdir");
    fs::write(dist.path().join("index.html"), TEMPLATE).unwrap();
    let table = RouteTable::builtin().unwrap();
    prerender_dist(dist.path(), &table, SITE).unwrap();

    let home = fs::read_to_string(dist.path().join("index.html")).unwrap();
    assert!(home.contains(&format!(r#"<link rel="canonical" href="{}/" />"#, SITE)));

    let not_found = fs::read_to_string(dist.path().join("404.html")).unwrap();
    let nested = fs::read_to_string(dist.path().join("404").join("index.html")).unwrap();
    assert_eq!(not_found, nested);
    assert!(not_found.contains("<h1>Page Not Found</h1>"));
    assert!(not_found.contains(&format!(r#"<link rel="canonical" href="{}/404/" />"#, SITE)));
}

#[test]
fn template_without_known_tags_passes_through() {
    let dist = tempfile::tempdir().expect("tempdir");
    let bare = "<html><body><p>static</p></body></html>";
    fs::write(dist.path().join("index.html"), bare).unwrap();
    let table = RouteTable::builtin().unwrap();
    prerender_dist(dist.path(), &table, SITE).unwrap();

    let contact = fs::read_to_string(dist.path().join("contact").join("index.html")).unwrap();
    assert_eq!(contact, bare);
}

#[test]
fn missing_template_is_an_error() {
    let dist = tempfile::tempdir().expect("tempdir");
    let table = RouteTable::builtin().unwrap();
    let err = prerender_dist(dist.path(), &table, SITE).unwrap_err();
    assert!(err.to_string().starts_with("read template"));
}
