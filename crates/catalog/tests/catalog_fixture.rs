use cellar_catalog::{Catalog, CatalogError, CatalogLookup, MilkType, Price};

#[test]
fn builtin_fixture_loads_every_record() {
    let catalog = Catalog::builtin().expect("builtin catalog");
    assert_eq!(catalog.cereals().len(), 15);
    assert_eq!(catalog.milks().len(), 6);
    assert_eq!(catalog.first_cereal().id, "c1");
}

#[test]
fn builtin_fixture_keeps_reference_values() {
    let catalog = Catalog::builtin().unwrap();

    let captain = catalog.lookup("c1").unwrap();
    assert_eq!(captain.name, "Captain's Reserve '97");
    assert_eq!(captain.price, Price::from_cents(45_000));
    assert_eq!(captain.recommended_milk_pairing.as_deref(), Some("m1"));
    assert_eq!(captain.tasting_notes.len(), 3);

    let gravel = catalog.lookup("c10").unwrap();
    assert_eq!(gravel.specs.decay_rate, 999);
    assert_eq!(gravel.flavor.crunch, 100);

    let strawberry = catalog.milk("m4").unwrap();
    assert_eq!(strawberry.name, "Strawberry 2% (Vintage)");
    assert_eq!(strawberry.kind, MilkType::Experimental);
    assert_eq!(strawberry.best_paired_with, vec!["c3", "c6"]);
}

#[test]
fn builtin_cross_references_resolve() {
    let catalog = Catalog::builtin().unwrap();
    for cereal in catalog.cereals() {
        if let Some(milk_id) = &cereal.recommended_milk_pairing {
            assert!(
                catalog.milk(milk_id).is_some(),
                "{} recommends unknown milk {}",
                cereal.id,
                milk_id
            );
        }
    }
    for milk in catalog.milks() {
        for cereal_id in &milk.best_paired_with {
            assert!(
                catalog.contains(cereal_id),
                "{} pairs with unknown cereal {}",
                milk.id,
                cereal_id
            );
        }
    }
}

#[test]
fn rejects_duplicate_milk_ids_from_json() {
    let cereals = r#"[{
        "id": "x1", "name": "X", "vintage": 2000, "region": "R", "price": 1.0,
        "specs": {"decayRate": 1, "sugarContent": 1},
        "flavor": {"crunch": 1, "sweetness": 1, "nostalgia": 1, "particulate": 1}
    }]"#;
    let milks = r#"[
        {"id": "m", "name": "A", "type": "dairy", "flavorNotes": "", "fatContent": "", "viscosity": ""},
        {"id": "m", "name": "B", "type": "plant", "flavorNotes": "", "fatContent": "", "viscosity": ""}
    ]"#;
    let err = Catalog::from_json(cereals, milks).unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateMilk(id) if id == "m"));
}

#[test]
fn rejects_negative_price_from_json() {
    let cereals = r#"[{
        "id": "x1", "name": "X", "vintage": 2000, "region": "R", "price": -5,
        "specs": {"decayRate": 1, "sugarContent": 1},
        "flavor": {"crunch": 1, "sweetness": 1, "nostalgia": 1, "particulate": 1}
    }]"#;
    let err = Catalog::from_json(cereals, "[]").unwrap_err();
    assert!(matches!(err, CatalogError::Json(_)));
}
