//! Benchmarks for the conversion pipeline.
//!
//! Run with: cargo bench

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};

use grimoire::export::{MarkdownExporter, MemorySink};
use grimoire::{Category, ConvertConfig, Converter, DocumentBuilder, Expander, SourceFilter};

const MACRO_TEXT: &str = "{@atk mw} {@hit 7} to hit, reach 10 ft., one target. {@h}18 \
    ({@damage 2d10 + 7}) piercing damage plus 4 ({@damage 1d8}) fire damage. If the target \
    is a {@creature goblin|mm}, it must succeed on a {@dc 15} {@skill Constitution} saving \
    throw or be {@condition poisoned} for 1 minute. {@b {@i nested {@spell fireball} text}}";

fn dragon() -> Value {
    json!({
        "name": "Adult Red Dragon",
        "source": "MM",
        "page": 98,
        "size": ["H"],
        "type": "dragon",
        "alignment": ["C", "E"],
        "ac": [{"ac": 19, "from": ["natural armor"]}],
        "hp": {"average": 256, "formula": "19d12 + 133"},
        "speed": {"walk": 40, "climb": 40, "fly": 80},
        "str": 27, "dex": 10, "con": 25, "int": 16, "wis": 13, "cha": 21,
        "save": {"dex": "+6", "con": "+13", "wis": "+7", "cha": "+11"},
        "skill": {"perception": "+13", "stealth": "+6"},
        "immune": ["fire"],
        "senses": ["blindsight 60 ft.", "darkvision 120 ft."],
        "passive": 23,
        "languages": ["Common", "Draconic"],
        "cr": "17",
        "trait": [{"name": "Legendary Resistance (3/Day)", "entries": ["If the dragon fails a saving throw, it can choose to succeed instead."]}],
        "action": [
            {"name": "Multiattack", "entries": ["The dragon can use its Frightful Presence. It then makes three attacks."]},
            {"name": "Bite", "entries": [MACRO_TEXT]},
            {"name": "Fire Breath {@recharge 5}", "entries": [{"type": "list", "items": ["one", "two", {"type": "item", "name": "Three", "entry": "three"}]}]}
        ],
        "legendary": [{"name": "Detect", "entries": ["The dragon makes a Wisdom ({@skill Perception}) check."]}]
    })
}

fn corpus(copies: usize) -> Value {
    let monsters: Vec<Value> = (0..copies)
        .map(|i| {
            let mut record = dragon();
            record["name"] = json!(format!("Dragon {i}"));
            record
        })
        .collect();
    let spells: Vec<Value> = (0..copies)
        .map(|i| {
            json!({
                "name": format!("Spell {i}"),
                "source": "PHB",
                "level": (i % 9) as i64 + 1,
                "school": "V",
                "entries": [MACRO_TEXT, {"type": "table", "colLabels": ["d6", "Effect"],
                    "rows": [["1", "a|b"], ["2", "{@dice 1d6}"]]}]
            })
        })
        .collect();
    json!({"monster": monsters, "spell": spells})
}

// ============================================================================
// Core Benchmarks
// ============================================================================

fn bench_expand_macros(c: &mut Criterion) {
    let expander = Expander::new();
    c.bench_function("expand_macros", |b| {
        b.iter(|| expander.expand(black_box(MACRO_TEXT)));
    });
}

fn bench_build_creature(c: &mut Criterion) {
    let builder = DocumentBuilder::default();
    let record = dragon();
    let filter = SourceFilter::all();
    c.bench_function("build_creature", |b| {
        b.iter(|| builder.build(Category::Creature, black_box(&record), &filter));
    });
}

// ============================================================================
// Pipeline Benchmarks
// ============================================================================

fn bench_convert_corpus(c: &mut Criterion) {
    let corpus = corpus(200);
    c.bench_function("convert_corpus_400", |b| {
        b.iter(|| {
            let mut converter = Converter::new(ConvertConfig::default());
            converter.convert_corpus(black_box(&corpus))
        });
    });
}

fn bench_export_indexes(c: &mut Criterion) {
    let corpus = corpus(200);
    let mut converter = Converter::new(ConvertConfig::default());
    let documents = converter.convert_corpus(&corpus).unwrap_or_default();
    let (collector, _) = converter.finish();
    c.bench_function("export_400", |b| {
        b.iter(|| {
            let mut sink = MemorySink::new();
            MarkdownExporter::new().export(black_box(&documents), &collector, &mut sink)
        });
    });
}

criterion_group!(
    benches,
    bench_expand_macros,
    bench_build_creature,
    bench_convert_corpus,
    bench_export_indexes,
);
criterion_main!(benches);
