use rusqlite::Connection;
use taxoquiz_core::db::open_db_in_memory;
use taxoquiz_core::{
    NewTaxon, SqliteTaxonRepository, TaxonLevel, TaxonomyResolver, TaxonomySelection,
};

fn new_taxon(name: &str, ranks: [&str; 7]) -> NewTaxon {
    TaxonLevel::RANKS
        .into_iter()
        .zip(ranks)
        .fold(NewTaxon::new(name), |taxon, (level, value)| {
            taxon.with(level, value)
        })
}

fn open_seeded() -> Connection {
    let conn = open_db_in_memory().unwrap();
    {
        let repo = SqliteTaxonRepository::try_new(&conn).unwrap();
        for (name, ranks) in [
            ("Lion", ["Animalia", "Chordata", "Mammalia", "Carnivora", "Felidae", "Panthera", "leo"]),
            ("Tiger", ["Animalia", "Chordata", "Mammalia", "Carnivora", "Felidae", "Panthera", "tigris"]),
            ("Cat", ["Animalia", "Chordata", "Mammalia", "Carnivora", "Felidae", "Felis", "catus"]),
            ("Wolf", ["Animalia", "Chordata", "Mammalia", "Carnivora", "Canidae", "Canis", "lupus"]),
            ("Raven", ["Animalia", "Chordata", "Aves", "Passeriformes", "Corvidae", "Corvus", "corax"]),
            ("Oak", ["Plantae", "Tracheophyta", "Magnoliopsida", "Fagales", "Fagaceae", "Quercus", "robur"]),
        ] {
            repo.insert_taxon(&new_taxon(name, ranks)).unwrap();
        }
    }
    conn
}

fn resolver(conn: &Connection) -> TaxonomyResolver<SqliteTaxonRepository<'_>> {
    TaxonomyResolver::new(SqliteTaxonRepository::try_new(conn).unwrap())
}

fn lion_lineage() -> TaxonomySelection {
    TaxonLevel::RANKS
        .into_iter()
        .zip(["Animalia", "Chordata", "Mammalia", "Carnivora", "Felidae", "Panthera", "leo"])
        .fold(TaxonomySelection::default(), |selection, (level, value)| {
            selection.with(level, value)
        })
}

#[test]
fn choosing_a_species_fills_every_rank() {
    let conn = open_seeded();
    let resolver = resolver(&conn);

    let selection = TaxonomySelection::default().with(TaxonLevel::Species, "leo");
    let resolved = resolver
        .resolve(&selection, Some(TaxonLevel::Species))
        .unwrap();

    assert_eq!(resolved, lion_lineage());
    assert!(resolved.is_blank(TaxonLevel::VernacularName));
}

#[test]
fn choosing_a_genus_infers_its_ancestors_only() {
    let conn = open_seeded();
    let resolver = resolver(&conn);

    let selection = TaxonomySelection::default().with(TaxonLevel::Genus, "Canis");
    let resolved = resolver.resolve(&selection, Some(TaxonLevel::Genus)).unwrap();

    assert_eq!(resolved.get(TaxonLevel::Kingdom), "Animalia");
    assert_eq!(resolved.get(TaxonLevel::Order), "Carnivora");
    assert_eq!(resolved.get(TaxonLevel::Family), "Canidae");
    assert_eq!(resolved.get(TaxonLevel::Genus), "Canis");
    assert!(resolved.is_blank(TaxonLevel::Species));
}

#[test]
fn changing_a_rank_clears_more_specific_levels() {
    let conn = open_seeded();
    let resolver = resolver(&conn);

    let selection = lion_lineage()
        .with(TaxonLevel::VernacularName, "Lion")
        .with(TaxonLevel::Kingdom, "Plantae");
    let resolved = resolver
        .resolve(&selection, Some(TaxonLevel::Kingdom))
        .unwrap();

    assert_eq!(resolved.get(TaxonLevel::Kingdom), "Plantae");
    for level in TaxonLevel::Kingdom.descendants() {
        assert!(resolved.is_blank(*level), "{level} should be cleared");
    }
}

#[test]
fn changing_a_middle_rank_keeps_its_ancestors() {
    let conn = open_seeded();
    let resolver = resolver(&conn);

    let selection = lion_lineage().with(TaxonLevel::Family, "Canidae");
    let resolved = resolver
        .resolve(&selection, Some(TaxonLevel::Family))
        .unwrap();

    assert_eq!(resolved.get(TaxonLevel::Order), "Carnivora");
    assert_eq!(resolved.get(TaxonLevel::Family), "Canidae");
    assert!(resolved.is_blank(TaxonLevel::Genus));
    assert!(resolved.is_blank(TaxonLevel::Species));
}

#[test]
fn choosing_a_vernacular_name_fills_its_lineage() {
    let conn = open_seeded();
    let resolver = resolver(&conn);

    let selection = TaxonomySelection::default().with(TaxonLevel::VernacularName, "Lion");
    let resolved = resolver
        .resolve(&selection, Some(TaxonLevel::VernacularName))
        .unwrap();

    assert_eq!(resolved, lion_lineage().with(TaxonLevel::VernacularName, "Lion"));
}

#[test]
fn unknown_values_infer_nothing() {
    let conn = open_seeded();
    let resolver = resolver(&conn);

    let selection = TaxonomySelection::default()
        .with(TaxonLevel::Genus, "Ursus")
        .with(TaxonLevel::VernacularName, "Bear");
    let resolved = resolver
        .resolve(&selection, Some(TaxonLevel::VernacularName))
        .unwrap();

    assert_eq!(resolved, selection);
}

#[test]
fn padded_values_still_resolve_and_filter() {
    let conn = open_seeded();
    let resolver = resolver(&conn);

    let selection = TaxonomySelection::default().with(TaxonLevel::Species, " leo ");
    let resolved = resolver
        .resolve_with_options(&selection, Some(TaxonLevel::Species))
        .unwrap();

    assert_eq!(resolved.selection, lion_lineage());
    assert_eq!(resolved.options.get(TaxonLevel::VernacularName), ["Lion"]);

    let padded_genus = TaxonomySelection::default().with(TaxonLevel::Genus, "Panthera  ");
    let options = resolver.available_options(&padded_genus).unwrap();
    assert_eq!(options.get(TaxonLevel::VernacularName), ["Lion", "Tiger"]);
}

#[test]
fn resolving_again_without_an_edit_is_stable() {
    let conn = open_seeded();
    let resolver = resolver(&conn);

    let edits = [
        (TaxonomySelection::default().with(TaxonLevel::Species, "corax"), TaxonLevel::Species),
        (TaxonomySelection::default().with(TaxonLevel::Family, "Felidae"), TaxonLevel::Family),
        (lion_lineage().with(TaxonLevel::Class, "Aves"), TaxonLevel::Class),
        (TaxonomySelection::default().with(TaxonLevel::VernacularName, "Oak"), TaxonLevel::VernacularName),
    ];
    for (selection, level) in edits {
        let once = resolver.resolve(&selection, Some(level)).unwrap();
        let twice = resolver.resolve(&once, None).unwrap();
        assert_eq!(once, twice, "edit at {level}");
    }
}

#[test]
fn options_follow_the_chosen_ancestors() {
    let conn = open_seeded();
    let resolver = resolver(&conn);

    let unfiltered = resolver
        .available_options(&TaxonomySelection::default())
        .unwrap();
    assert_eq!(unfiltered.get(TaxonLevel::Kingdom), ["Animalia", "Plantae"]);
    assert_eq!(unfiltered.get(TaxonLevel::VernacularName).len(), 6);

    let felids = TaxonomySelection::default()
        .with(TaxonLevel::Kingdom, "Animalia")
        .with(TaxonLevel::Family, "Felidae");
    let options = resolver.available_options(&felids).unwrap();

    // A level is filtered by its ancestors, never by itself.
    assert_eq!(options.get(TaxonLevel::Kingdom), ["Animalia", "Plantae"]);
    assert_eq!(options.get(TaxonLevel::Family), ["Canidae", "Corvidae", "Felidae"]);
    assert_eq!(options.get(TaxonLevel::Genus), ["Felis", "Panthera"]);
    assert_eq!(options.get(TaxonLevel::VernacularName), ["Cat", "Lion", "Tiger"]);
}

#[test]
fn resolve_with_options_lists_values_for_the_resolved_selection() {
    let conn = open_seeded();
    let resolver = resolver(&conn);

    let selection = TaxonomySelection::default().with(TaxonLevel::Genus, "Panthera");
    let resolved = resolver
        .resolve_with_options(&selection, Some(TaxonLevel::Genus))
        .unwrap();

    assert_eq!(resolved.selection.get(TaxonLevel::Family), "Felidae");
    assert_eq!(resolved.options.get(TaxonLevel::Species), ["leo", "tigris"]);
    assert_eq!(resolved.options.get(TaxonLevel::VernacularName), ["Lion", "Tiger"]);
    assert_eq!(resolved.options.get(TaxonLevel::Genus), ["Felis", "Panthera"]);
}

#[test]
fn selection_serializes_with_flat_level_keys() {
    let selection = TaxonomySelection::default()
        .with(TaxonLevel::Order, "Carnivora")
        .with(TaxonLevel::VernacularName, "Wolf");

    let json = serde_json::to_value(&selection).unwrap();
    assert_eq!(json["order"], "Carnivora");
    assert_eq!(json["vernacular_name"], "Wolf");
    assert_eq!(json["kingdom"], "");

    let parsed: TaxonomySelection =
        serde_json::from_value(serde_json::json!({ "genus": "Canis" })).unwrap();
    assert_eq!(parsed, TaxonomySelection::default().with(TaxonLevel::Genus, "Canis"));

    assert_eq!(
        serde_json::to_value(TaxonLevel::VernacularName).unwrap(),
        "vernacular_name"
    );
}
