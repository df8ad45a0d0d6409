//! End-to-end conversion tests.
//!
//! Each test drives a record from raw JSON to the final Markdown, the way
//! the converter does for a whole corpus file.

use grimoire::markdown::split_table_row;
use grimoire::{
    BuildOutcome, Category, CollisionPolicy, ConvertConfig, Converter, DocumentBuilder, Expander,
    Renderer, SourceFilter,
};
use serde_json::{Value, json};

fn build(category: Category, record: &Value) -> String {
    match DocumentBuilder::default().build(category, record, &SourceFilter::all()) {
        BuildOutcome::Built { document, .. } => document.body,
        BuildOutcome::Skipped(reason) => panic!("record skipped: {reason:?}"),
    }
}

// ============================================================================
// Macro Expansion
// ============================================================================

#[test]
fn test_macro_sentence() {
    let expander = Expander::new();
    assert_eq!(
        expander.expand("Deals {@damage 2d6} {@i fire} damage on a {@hit 5} to hit."),
        "Deals `2d6` *fire* damage on a +5 to hit."
    );
}

#[test]
fn test_nested_macros_inside_entries() {
    let renderer = Renderer::default();
    let entry = json!({"type": "entries", "name": "Bite", "entries": [
        "{@atk mw} {@hit 4} to hit. {@h}{@b 7 ({@damage 2d4 + 2})} piercing damage."
    ]});
    assert_eq!(
        renderer.render_value(&entry, 0),
        "### Bite\n\n*Melee Weapon Attack:* +4 to hit. *Hit:* **7 (`2d4 + 2`)** piercing damage."
    );
}

#[test]
fn test_unknown_macro_falls_back_to_display_text() {
    let expander = Expander::new();
    assert_eq!(expander.expand("A {@mystery shiny thing|xyz} here."), "A shiny thing here.");
}

// ============================================================================
// Creature Documents
// ============================================================================

#[test]
fn test_griffon_statblock_fields() {
    let body = build(
        Category::Creature,
        &json!({
            "name": "Griffon",
            "source": "MM",
            "ac": [{"ac": 15, "from": ["natural armor"]}],
            "hp": {"average": 22, "formula": "5d8"},
            "speed": {"walk": 30, "fly": 60}
        }),
    );
    assert!(body.contains("**Armor Class** 15 (natural armor)"), "{body}");
    assert!(body.contains("**Hit Points** 22 (5d8)"), "{body}");
    assert!(body.contains("**Speed** 30 ft., fly 60 ft."), "{body}");
}

#[test]
fn test_creature_action_groups_in_order() {
    let body = build(
        Category::Creature,
        &json!({
            "name": "Wolf",
            "reaction": [{"name": "Snap", "entries": ["It snaps."]}],
            "action": [{"name": "Bite", "entries": ["It bites."]}],
            "trait": [{"name": "Keen Smell", "entries": ["It smells."]}],
            "bonus": []
        }),
    );
    let traits = body.find("## Traits").expect("traits");
    let actions = body.find("## Actions").expect("actions");
    let reactions = body.find("## Reactions").expect("reactions");
    assert!(traits < actions && actions < reactions);
    assert!(body.contains("***Bite.*** It bites."));
    assert!(!body.contains("## Bonus Actions"));
}

// ============================================================================
// Spell Documents
// ============================================================================

#[test]
fn test_spell_without_higher_levels() {
    let body = build(
        Category::Spell,
        &json!({
            "name": "Fireball",
            "source": "PHB",
            "page": 241,
            "level": 3,
            "school": "V",
            "entries": ["A bright streak flashes to a point you choose."]
        }),
    );
    assert!(body.starts_with("# Fireball\n\n*3rd-level Evocation*\n\n**Source**: PHB, page 241\n"));
    assert!(!body.contains("At Higher Levels"));
}

// ============================================================================
// Tables
// ============================================================================

#[test]
fn test_table_cell_with_pipe_keeps_column_count() {
    let renderer = Renderer::default();
    let table = json!({
        "type": "table",
        "colLabels": ["Roll", "Result"],
        "rows": [["1", "a|b"]]
    });
    let output = renderer.render_value(&table, 0);
    let rows: Vec<&str> = output.lines().filter(|l| l.starts_with('|')).collect();
    assert_eq!(rows.len(), 3, "{output}");
    assert!(rows[2].contains(r"a\|b"));
    assert_eq!(split_table_row(rows[2]).len(), 2);
    assert_eq!(split_table_row(rows[0]), vec!["Roll", "Result"]);
}

// ============================================================================
// Slug Collisions
// ============================================================================

fn shadows() -> Vec<Value> {
    vec![
        json!({"name": "Shadow", "source": "MM", "entries": ["Dark."]}),
        json!({"name": "Shadow", "source": "MPMM", "entries": ["Darker."]}),
    ]
}

#[test]
fn test_shadow_collision_suffixes_source() {
    let mut converter = Converter::new(ConvertConfig::default());
    let docs = converter.convert_value(Category::Creature, &shadows());
    let paths: Vec<&str> = docs.iter().map(|d| d.path.as_str()).collect();
    assert_eq!(paths, vec!["bestiary/shadow.md", "bestiary/shadow-mpmm.md"]);

    let (collector, stats) = converter.finish();
    assert_eq!(stats.collisions, 1);
    let index = collector.build_global_index();
    let all = index.lookup_all("SHADOW");
    assert_eq!(all.len(), 2);
}

#[test]
fn test_shadow_collision_overwrite() {
    let config = ConvertConfig {
        collision: CollisionPolicy::Overwrite,
        ..ConvertConfig::default()
    };
    let mut converter = Converter::new(config);
    let docs = converter.convert_value(Category::Creature, &shadows());
    assert!(docs.iter().all(|d| d.path == "bestiary/shadow.md"));
    assert_eq!(converter.stats().collisions, 1);
}

// ============================================================================
// Whole Corpus
// ============================================================================

#[test]
fn test_corpus_dispatches_keys_and_skips_bad_records() {
    let corpus = json!({
        "_meta": {"sources": []},
        "monster": [{"name": "Goblin", "source": "MM", "cr": "1/4"}, {"source": "MM"}],
        "spell": [{"name": "Light", "source": "PHB", "level": 0, "school": "V"}],
        "condition": [{"name": "Blinded", "source": "XPHB"}],
        "disease": [{"name": "Sewer Plague", "source": "DMG"}]
    });
    let config = ConvertConfig {
        sources: vec!["MM".to_string(), "PHB".to_string(), "DMG".to_string()],
        ..ConvertConfig::default()
    };
    let mut converter = Converter::new(config);
    let docs = converter.convert_corpus(&corpus).unwrap();
    let mut paths: Vec<&str> = docs.iter().map(|d| d.path.as_str()).collect();
    paths.sort();
    assert_eq!(
        paths,
        vec!["bestiary/goblin.md", "conditions/sewer-plague.md", "spells/light.md"]
    );

    let (_, stats) = converter.finish();
    assert_eq!(stats.built, 3);
    assert_eq!(stats.filtered, 1);
    assert_eq!(stats.rejected, 1);
}

#[test]
fn test_corpus_must_be_object() {
    let mut converter = Converter::new(ConvertConfig::default());
    assert!(converter.convert_corpus(&json!([1, 2, 3])).is_err());
}
