use crate::cart::CartError;
use crate::command::{
    CartAction, CartArgs, CatalogArgs, PaletteArgs, PairArgs, PrerenderArgs, RateArgs,
};
use crate::config::{default_data_dir, default_dist_dir, SITE_URL};
use crate::pairing::PairingSelection;
use crate::prerender::prerender_dist;
use crate::rating::{load_rating, store_rating, Rating};
use crate::routes::RouteTable;
use crate::session::Session;
use cellar_catalog::{browse, Catalog, PriceBand, SortKey};
use cellar_storage::FileStore;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

pub(crate) enum Command {
    Catalog(CatalogArgs),
    Cart(CartArgs),
    Pair(PairArgs),
    Rate(RateArgs),
    Palette(PaletteArgs),
    Prerender(PrerenderArgs),
}

#[derive(Debug)]
pub struct CliError {
    reason: &'static str,
    detail: Option<String>,
}

impl CliError {
    pub fn new(reason: &'static str) -> Self {
        Self {
            reason,
            detail: None,
        }
    }

    pub fn with_detail(reason: &'static str, detail: String) -> Self {
        Self {
            reason,
            detail: Some(detail),
        }
    }

    pub fn reason(&self) -> &'static str {
        self.reason
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason)
    }
}

impl std::error::Error for CliError {}

impl From<CartError> for CliError {
    fn from(e: CartError) -> Self {
        match e {
            CartError::UnknownItem(id) => CliError::with_detail("unknown_item", id),
            other => CliError::with_detail("cart_failed", other.to_string()),
        }
    }
}

fn parse_catalog_args_from<I>(mut it: I) -> Result<CatalogArgs, String>
where
    I: Iterator<Item = String>,
{
    let mut sort = SortKey::default();
    let mut band = PriceBand::default();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--sort" => {
                let v = it.next().ok_or("missing value for --sort")?;
                sort = SortKey::parse(&v).ok_or_else(|| format!("unknown sort key: {}", v))?;
            }
            "--price" => {
                let v = it.next().ok_or("missing value for --price")?;
                band = PriceBand::parse(&v).ok_or_else(|| format!("unknown price band: {}", v))?;
            }
            _ => return Err(format!("unexpected argument: {}", a)),
        }
    }
    Ok(CatalogArgs { sort, band })
}

fn parse_cart_args_from<I>(mut it: I) -> Result<CartArgs, String>
where
    I: Iterator<Item = String>,
{
    let mut data_dir: Option<PathBuf> = None;
    let mut positional: Vec<String> = Vec::new();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--data-dir" => {
                data_dir = Some(PathBuf::from(
                    it.next().ok_or("missing value for --data-dir")?,
                ));
            }
            _ => positional.push(a),
        }
    }

    let mut positional = positional.into_iter();
    let action = match positional.next().as_deref() {
        None | Some("show") => CartAction::Show,
        Some("add") => CartAction::Add {
            item_id: positional.next().ok_or("missing item id for cart add")?,
        },
        Some("remove") => CartAction::Remove {
            item_id: positional.next().ok_or("missing item id for cart remove")?,
        },
        Some("set") => {
            let item_id = positional.next().ok_or("missing item id for cart set")?;
            let quantity = positional
                .next()
                .ok_or("missing quantity for cart set")?
                .parse::<i64>()
                .map_err(|_| "invalid quantity for cart set".to_string())?;
            CartAction::Set { item_id, quantity }
        }
        Some("checkout") => CartAction::Checkout,
        Some(other) => return Err(format!("unknown cart subcommand {}", other)),
    };
    if let Some(extra) = positional.next() {
        return Err(format!("unexpected argument: {}", extra));
    }

    Ok(CartArgs {
        data_dir: data_dir.unwrap_or_else(default_data_dir),
        action,
    })
}

fn parse_pair_args_from<I>(mut it: I) -> Result<PairArgs, String>
where
    I: Iterator<Item = String>,
{
    let mut cereal: Option<String> = None;
    let mut milk: Option<String> = None;
    while let Some(a) = it.next() {
        match a.as_str() {
            "--cereal" => {
                if cereal.is_some() {
                    return Err("multiple values provided for --cereal".to_string());
                }
                cereal = Some(it.next().ok_or("missing value for --cereal")?);
            }
            "--milk" => {
                if milk.is_some() {
                    return Err("multiple values provided for --milk".to_string());
                }
                milk = Some(it.next().ok_or("missing value for --milk")?);
            }
            _ => return Err(format!("unexpected argument: {}", a)),
        }
    }
    Ok(PairArgs { cereal, milk })
}

fn parse_rate_args_from<I>(mut it: I) -> Result<RateArgs, String>
where
    I: Iterator<Item = String>,
{
    let mut data_dir: Option<PathBuf> = None;
    let mut item_id: Option<String> = None;
    let mut value: Option<i64> = None;
    while let Some(a) = it.next() {
        match a.as_str() {
            "--data-dir" => {
                data_dir = Some(PathBuf::from(
                    it.next().ok_or("missing value for --data-dir")?,
                ));
            }
            _ if item_id.is_none() => item_id = Some(a),
            _ if value.is_none() => {
                value = Some(
                    a.parse::<i64>()
                        .map_err(|_| format!("invalid rating: {}", a))?,
                );
            }
            _ => return Err(format!("unexpected argument: {}", a)),
        }
    }
    Ok(RateArgs {
        data_dir: data_dir.unwrap_or_else(default_data_dir),
        item_id: item_id.ok_or("missing item id for rate")?,
        value,
    })
}

fn parse_palette_args_from<I>(mut it: I) -> Result<PaletteArgs, String>
where
    I: Iterator<Item = String>,
{
    let mut data_dir: Option<PathBuf> = None;
    let mut words: Vec<String> = Vec::new();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--data-dir" => {
                data_dir = Some(PathBuf::from(
                    it.next().ok_or("missing value for --data-dir")?,
                ));
            }
            _ => words.push(a),
        }
    }
    Ok(PaletteArgs {
        data_dir: data_dir.unwrap_or_else(default_data_dir),
        query: words.join(" "),
    })
}

fn parse_prerender_args_from<I>(mut it: I) -> Result<PrerenderArgs, String>
where
    I: Iterator<Item = String>,
{
    let mut dist: Option<PathBuf> = None;
    let mut site_url: Option<String> = None;
    while let Some(a) = it.next() {
        match a.as_str() {
            "--dist" => {
                dist = Some(PathBuf::from(it.next().ok_or("missing value for --dist")?));
            }
            "--site-url" => {
                site_url = Some(it.next().ok_or("missing value for --site-url")?);
            }
            _ => return Err(format!("unexpected argument: {}", a)),
        }
    }
    Ok(PrerenderArgs {
        dist: dist.unwrap_or_else(default_dist_dir),
        site_url: site_url.unwrap_or_else(|| SITE_URL.to_string()),
    })
}

pub(crate) fn parse_command_from(args: Vec<String>) -> Result<Command, String> {
    let mut it = args.into_iter();
    let first = it.next().ok_or(
        "missing subcommand (expected catalog, cart, pair, rate, palette or prerender)",
    )?;
    match first.as_str() {
        "catalog" => Ok(Command::Catalog(parse_catalog_args_from(it)?)),
        "cart" => Ok(Command::Cart(parse_cart_args_from(it)?)),
        "pair" => Ok(Command::Pair(parse_pair_args_from(it)?)),
        "rate" => Ok(Command::Rate(parse_rate_args_from(it)?)),
        "palette" => Ok(Command::Palette(parse_palette_args_from(it)?)),
        "prerender" => Ok(Command::Prerender(parse_prerender_args_from(it)?)),
        other => Err(format!("unknown subcommand {}", other)),
    }
}

fn emit(value: serde_json::Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(&value)?);
    Ok(())
}

fn emit_error(err: CliError) -> Result<(), Box<dyn std::error::Error>> {
    let mut body = serde_json::json!({ "ok": false, "error": err.reason() });
    if let Some(detail) = err.detail() {
        body["detail"] = serde_json::Value::String(detail.to_string());
    }
    println!("{}", serde_json::to_string(&body)?);
    Err(err.into())
}

fn load_catalog() -> Result<Arc<Catalog>, CliError> {
    Catalog::builtin()
        .map(Arc::new)
        .map_err(|e| CliError::with_detail("catalog_invalid", e.to_string()))
}

fn run_catalog(args: CatalogArgs) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = match load_catalog() {
        Ok(c) => c,
        Err(e) => return emit_error(e),
    };
    let items: Vec<serde_json::Value> = browse(&catalog, args.band, args.sort)
        .into_iter()
        .map(|item| {
            serde_json::json!({
                "id": item.id,
                "name": item.name,
                "vintage": item.vintage,
                "region": item.region,
                "price": item.price.to_string(),
                "nostalgia": item.flavor.nostalgia,
            })
        })
        .collect();
    emit(serde_json::json!({
        "ok": true,
        "sort": args.sort.as_str(),
        "price": args.band.as_str(),
        "items": items,
    }))
}

fn cart_json(session: &Session<FileStore>) -> serde_json::Value {
    let lines: Vec<serde_json::Value> = session
        .cart()
        .lines()
        .iter()
        .map(|line| {
            let item = session.catalog().cereal(line.item_id());
            serde_json::json!({
                "item_id": line.item_id(),
                "name": item.map(|i| i.name.as_str()),
                "quantity": line.quantity(),
                "unit_price": item.map(|i| i.price.to_string()),
            })
        })
        .collect();
    serde_json::json!({
        "lines": lines,
        "item_count": session.cart_store().item_count(),
        "total": session.cart_store().total().to_string(),
    })
}

fn run_cart(args: CartArgs) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = match load_catalog() {
        Ok(c) => c,
        Err(e) => return emit_error(e),
    };
    let mut session = Session::new(catalog, FileStore::new(&args.data_dir));
    let now = Instant::now();

    let outcome: Result<serde_json::Value, CliError> = match &args.action {
        CartAction::Show => Ok(serde_json::json!({ "action": "show" })),
        CartAction::Add { item_id } => session
            .add_to_cart(item_id, now)
            .map(|quantity| serde_json::json!({ "action": "add", "quantity": quantity }))
            .map_err(CliError::from),
        CartAction::Remove { item_id } => {
            let removed = session.remove_with_undo(item_id, now);
            Ok(serde_json::json!({ "action": "remove", "removed": removed.is_some() }))
        }
        CartAction::Set { item_id, quantity } => session
            .update_quantity(item_id, *quantity)
            .map(|quantity| serde_json::json!({ "action": "set", "quantity": quantity }))
            .map_err(CliError::from),
        CartAction::Checkout => {
            if session.request_checkout() {
                match session.confirm_checkout() {
                    Some(summary) => Ok(serde_json::json!({
                        "action": "checkout",
                        "purchased_items": summary.item_count,
                        "purchased_total": summary.total.to_string(),
                    })),
                    None => Err(CliError::new("checkout_failed")),
                }
            } else {
                Err(CliError::new("cart_empty"))
            }
        }
    };

    match outcome {
        Ok(mut body) => {
            body["ok"] = serde_json::Value::Bool(true);
            body["cart"] = cart_json(&session);
            emit(body)
        }
        Err(e) => emit_error(e),
    }
}

fn run_pair(args: PairArgs) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = match load_catalog() {
        Ok(c) => c,
        Err(e) => return emit_error(e),
    };
    let mut selection = PairingSelection::new(&catalog);
    if let Some(id) = args.cereal.as_deref() {
        if !selection.select_primary(&catalog, id) {
            return emit_error(CliError::with_detail("unknown_cereal", id.to_string()));
        }
    }
    if let Some(id) = args.milk.as_deref() {
        if !selection.select_modifier(&catalog, id) {
            return emit_error(CliError::with_detail("unknown_milk", id.to_string()));
        }
    }
    let synergy = selection.evaluate(&catalog);
    emit(serde_json::json!({
        "ok": true,
        "cereal": selection.primary_id(),
        "milk": selection.modifier_id(),
        "score": synergy.score,
        "label": synergy.label.as_str(),
        "title": synergy.label.title(),
    }))
}

fn run_rate(args: RateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = match load_catalog() {
        Ok(c) => c,
        Err(e) => return emit_error(e),
    };
    if catalog.cereal(&args.item_id).is_none() {
        return emit_error(CliError::with_detail("unknown_item", args.item_id));
    }
    let mut store = FileStore::new(&args.data_dir);

    let rating = match args.value {
        Some(value) => {
            let Some(rating) = Rating::new(value) else {
                return emit_error(CliError::with_detail(
                    "rating_out_of_range",
                    value.to_string(),
                ));
            };
            if !store_rating(&mut store, &args.item_id, rating) {
                return emit_error(CliError::new("rating_persist_failed"));
            }
            Some(rating)
        }
        None => load_rating(&store, &args.item_id),
    };

    emit(serde_json::json!({
        "ok": true,
        "item_id": args.item_id,
        "rating": rating.map(Rating::value),
        "label": rating.map(Rating::label),
    }))
}

fn run_palette(args: PaletteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = match load_catalog() {
        Ok(c) => c,
        Err(e) => return emit_error(e),
    };
    let mut session = Session::new(catalog, FileStore::new(&args.data_dir));
    session.toggle_palette();
    session.set_palette_query(&args.query);
    let actions: Vec<serde_json::Value> = session
        .palette_results()
        .into_iter()
        .map(|action| {
            serde_json::json!({
                "id": action.id,
                "label": action.label,
                "subtitle": action.subtitle,
                "command": action.command,
            })
        })
        .collect();
    emit(serde_json::json!({
        "ok": true,
        "query": args.query,
        "actions": actions,
    }))
}

fn run_prerender(args: PrerenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let table = match RouteTable::builtin() {
        Ok(t) => t,
        Err(e) => return emit_error(CliError::with_detail("routes_invalid", e.to_string())),
    };
    match prerender_dist(&args.dist, &table, &args.site_url) {
        Ok(report) => {
            let written: Vec<String> = report
                .written
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect();
            emit(serde_json::json!({
                "ok": true,
                "dist": args.dist.to_string_lossy(),
                "written": written,
            }))
        }
        Err(e) => emit_error(CliError::with_detail("prerender_failed", e.to_string())),
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_command_from(args)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    match command {
        Command::Catalog(args) => run_catalog(args),
        Command::Cart(args) => run_cart(args),
        Command::Pair(args) => run_pair(args),
        Command::Rate(args) => run_rate(args),
        Command::Palette(args) => run_palette(args),
        Command::Prerender(args) => run_prerender(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn cart_set_parses_quantity_and_data_dir() {
        let raw = argv(&["set", "c1", "3", "--data-dir", "/tmp/x"]);
        let args = parse_cart_args_from(raw.into_iter()).unwrap();
        assert_eq!(
            args.action,
            CartAction::Set {
                item_id: "c1".to_string(),
                quantity: 3
            }
        );
        assert_eq!(args.data_dir, PathBuf::from("/tmp/x"));
    }

    #[test]
    fn cart_defaults_to_show() {
        let args = parse_cart_args_from(std::iter::empty()).unwrap();
        assert_eq!(args.action, CartAction::Show);
    }

    #[test]
    fn cart_rejects_unknown_subcommand() {
        let err = parse_cart_args_from(argv(&["empty"]).into_iter()).unwrap_err();
        assert_eq!(err, "unknown cart subcommand empty");
    }

    #[test]
    fn catalog_flags() {
        let args =
            parse_catalog_args_from(argv(&["--sort", "nostalgia", "--price", "luxury"]).into_iter())
                .unwrap();
        assert_eq!(args.sort, SortKey::Nostalgia);
        assert_eq!(args.band, PriceBand::Luxury);
        assert!(parse_catalog_args_from(argv(&["--sort", "age"]).into_iter()).is_err());
    }

    #[test]
    fn pair_rejects_repeated_flags() {
        let err =
            parse_pair_args_from(argv(&["--milk", "m1", "--milk", "m2"]).into_iter()).unwrap_err();
        assert_eq!(err, "multiple values provided for --milk");
    }

    #[test]
    fn rate_positional_value() {
        let args = parse_rate_args_from(argv(&["c2", "5"]).into_iter()).unwrap();
        assert_eq!(args.item_id, "c2");
        assert_eq!(args.value, Some(5));
        assert!(parse_rate_args_from(argv(&["c2", "five"]).into_iter()).is_err());
        assert!(parse_rate_args_from(std::iter::empty()).is_err());
    }

    #[test]
    fn palette_query_joins_words() {
        let args = parse_palette_args_from(argv(&["open", "cart"]).into_iter()).unwrap();
        assert_eq!(args.query, "open cart");
    }

    #[test]
    fn subcommand_required() {
        assert!(parse_command_from(Vec::new()).is_err());
        assert!(parse_command_from(argv(&["dance"])).is_err());
        assert!(matches!(
            parse_command_from(argv(&["prerender"])),
            Ok(Command::Prerender(_))
        ));
    }
}
