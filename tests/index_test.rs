//! Index collector tests over converted records.

use grimoire::index::{CrossReferences, IndexCollector};
use grimoire::{Category, ConvertConfig, Converter};
use serde_json::{Value, json};

fn collect(corpus: Value) -> IndexCollector {
    let mut converter = Converter::new(ConvertConfig::default());
    converter.convert_corpus(&corpus).unwrap();
    converter.finish().0
}

fn corpus() -> Value {
    json!({
        "monster": [
            {"name": "Red Dragon Wyrmling", "source": "MM", "cr": "4", "size": ["M"],
             "type": "dragon", "immune": ["fire"], "speed": {"walk": 30, "fly": 60},
             "damageTags": ["F", "P"]},
            {"name": "Goblin", "source": "MM", "cr": "1/4", "size": ["S"],
             "type": {"type": "humanoid", "tags": ["goblinoid"]}, "speed": {"walk": 30},
             "damageTags": ["S"]},
            {"name": "Kobold", "source": "MM", "cr": "1/8", "size": ["S"], "type": "humanoid"}
        ],
        "spell": [
            {"name": "Fireball", "source": "PHB", "level": 3, "school": "V",
             "damageInflict": ["fire"], "classes": {"fromClassList": [{"name": "Wizard"}]}},
            {"name": "Blindness/Deafness", "source": "PHB", "level": 2, "school": "N",
             "conditionInflict": ["blinded", "deafened"]}
        ],
        "item": [
            {"name": "Flame Tongue", "source": "DMG", "rarity": "rare", "reqAttune": true},
            {"name": "Bag of Holding", "source": "DMG", "rarity": "uncommon", "wondrous": true},
            {"name": "Potion of Healing", "source": "DMG", "rarity": "common"}
        ]
    })
}

// ============================================================================
// Global Index
// ============================================================================

#[test]
fn test_global_index_is_name_sorted() {
    let index = collect(corpus()).build_global_index();
    let names: Vec<&str> = index.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Bag of Holding",
            "Blindness/Deafness",
            "Fireball",
            "Flame Tongue",
            "Goblin",
            "Kobold",
            "Potion of Healing",
            "Red Dragon Wyrmling",
        ]
    );
    assert_eq!(index.total, 8);
    assert_eq!(index.categories[&Category::Item].len(), 3);
}

#[test]
fn test_collector_views() {
    let collector = collect(corpus());
    let items: Vec<&str> = collector
        .by_category(Category::Item)
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(items, vec!["Bag of Holding", "Flame Tongue", "Potion of Healing"]);
    assert_eq!(
        collector.categories(),
        vec![Category::Spell, Category::Creature, Category::Item]
    );
    assert_eq!(collector.len(), 8);
}

#[test]
fn test_lookup_by_normalized_key() {
    let index = collect(corpus()).build_global_index();
    let entry = index.lookup("  BLINDNESS/deafness ", None).unwrap();
    assert_eq!(entry.path, "spells/blindnessdeafness.md");
    assert_eq!(index.lookup("FIREBALL!", None).unwrap().category, Category::Spell);
    assert!(index.lookup("fireball", Some(Category::Item)).is_none());
    assert!(index.lookup("Tarrasque", None).is_none());
}

#[test]
fn test_lookup_category_disambiguates() {
    let collector = collect(json!({
        "spell": [{"name": "Shield", "source": "PHB", "level": 1, "school": "A"}],
        "baseitem": [{"name": "Shield", "source": "PHB", "type": "S", "ac": 2}]
    }));
    let index = collector.build_global_index();
    assert_eq!(index.lookup_all("shield").len(), 2);
    let item = index.lookup("shield", Some(Category::Equipment)).unwrap();
    assert_eq!(item.path, "equipment/shield.md");
    let spell = index.lookup("shield", Some(Category::Spell)).unwrap();
    assert_eq!(spell.path, "spells/shield.md");
}

// ============================================================================
// Keyword Index
// ============================================================================

#[test]
fn test_keywords_span_categories() {
    let keywords = collect(corpus()).build_keyword_index();
    let fire = keywords.get("fire").unwrap();
    let creatures: Vec<&str> = fire[&Category::Creature].iter().map(|r| r.name.as_str()).collect();
    let spells: Vec<&str> = fire[&Category::Spell].iter().map(|r| r.name.as_str()).collect();
    assert_eq!(creatures, vec!["Red Dragon Wyrmling"]);
    assert_eq!(spells, vec!["Fireball"]);

    let humanoid = keywords.get("Humanoid").unwrap();
    let names: Vec<&str> = humanoid[&Category::Creature].iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Goblin", "Kobold"]);

    assert!(keywords.get("blinded").is_some());
    assert!(keywords.get("fly").is_some());
    assert!(keywords.get("evocation").is_some());
    assert!(keywords.get("uncommon").is_some());
}

#[test]
fn test_keyword_entries_are_deduplicated() {
    let keywords = collect(corpus()).build_keyword_index();
    // "fire" is both an immunity and a damage type of the wyrmling
    let fire = keywords.get("fire").unwrap();
    assert_eq!(fire[&Category::Creature].len(), 1);
}

#[test]
fn test_item_kinds_and_placeholder_rarities_are_not_keywords() {
    let collector = collect(json!({
        "baseitem": [{"name": "Longsword", "source": "PHB", "type": "M",
                      "weaponCategory": "martial", "rarity": "none"}],
        "item": [{"name": "Bag of Holding", "source": "DMG", "rarity": "uncommon", "wondrous": true},
                 {"name": "Mystery Orb", "source": "DMG", "rarity": "unknown"}]
    }));
    let keywords = collector.build_keyword_index();
    assert!(keywords.get("martial melee weapon").is_none());
    assert!(keywords.get("wondrous item").is_none());
    assert!(keywords.get("none").is_none());
    assert!(keywords.get("unknown").is_none());
    assert_eq!(keywords.keywords().collect::<Vec<_>>(), vec!["uncommon"]);

    let quick = collector.build_quick_references();
    assert_eq!(quick.get(Category::Equipment)[0].summary, "martial melee weapon");
    assert_eq!(quick.get(Category::Item)[0].summary, "uncommon wondrous item");
}

// ============================================================================
// Cross References
// ============================================================================

#[test]
fn test_cross_references_regroup_facets() {
    let xref = collect(corpus()).build_cross_references();

    let crs: Vec<&str> = xref.creatures_by_cr.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(crs, vec!["1/8", "1/4", "4"]);

    let rarities: Vec<&str> = xref.items_by_rarity.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(rarities, vec!["common", "uncommon", "rare"]);

    let evocation = CrossReferences::find(&xref.spells_by_school, "Evocation").unwrap();
    assert_eq!(evocation.entries[0].path, "spells/fireball.md");

    let wizard = CrossReferences::find(&xref.spells_by_class, "Wizard").unwrap();
    assert_eq!(wizard.entries.len(), 1);
}

// ============================================================================
// Quick References
// ============================================================================

#[test]
fn test_quick_reference_summaries() {
    let quick = collect(corpus()).build_quick_references();
    let spells = quick.get(Category::Spell);
    assert_eq!(spells[1].name, "Fireball");
    assert_eq!(spells[1].summary, "3rd-level Evocation");

    let creatures = quick.get(Category::Creature);
    assert_eq!(creatures[0].name, "Goblin");
    assert_eq!(creatures[0].summary, "CR 1/4 Small humanoid");

    let items = quick.get(Category::Item);
    let flame = items.iter().find(|r| r.name == "Flame Tongue").unwrap();
    assert!(flame.summary.starts_with("rare"));
    assert!(flame.summary.ends_with("(requires attunement)"));

    assert!(quick.get(Category::Deck).is_empty());
}

#[test]
fn test_outputs_independent_of_input_order() {
    let mut forward = IndexCollector::new();
    let mut backward = IndexCollector::new();
    let all = collect(corpus());
    let entries = all.entries().to_vec();
    for entry in entries.iter().cloned() {
        forward.push(entry);
    }
    for entry in entries.into_iter().rev() {
        backward.push(entry);
    }
    assert_eq!(forward.build_global_index(), backward.build_global_index());
    assert_eq!(forward.build_quick_references(), backward.build_quick_references());
    assert_eq!(forward.build_cross_references(), backward.build_cross_references());
    assert_eq!(forward.build_keyword_index(), backward.build_keyword_index());
}

#[test]
fn test_json_shapes() {
    let collector = collect(corpus());
    let keywords = serde_json::to_value(collector.build_keyword_index()).unwrap();
    assert_eq!(
        keywords["fire"]["spell"],
        json!([{"name": "Fireball", "path": "spells/fireball.md"}])
    );
    let quick = serde_json::to_value(collector.build_quick_references()).unwrap();
    assert_eq!(quick["creature"][0]["summary"], "CR 1/4 Small humanoid");
}
