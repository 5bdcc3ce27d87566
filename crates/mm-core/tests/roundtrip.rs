//! Integration tests: parse → transduce → emit → re-parse round-trip.
//!
//! Verifies that no outline structure is lost converting markdown →
//! tree → map → markdown, and that path IDs stay stable across reparses.

use mm_core::transduce::{map_to_markdown, tree_to_map};
use mm_core::tree::parse_outline;

// ─── Helpers ─────────────────────────────────────────────────────────────

/// The outline's shape: (label, level) pairs in document order.
fn shape(text: &str) -> Vec<(String, u32)> {
    tree_to_map(&parse_outline(text))
        .nodes
        .iter()
        .map(|n| (n.label.clone(), n.level))
        .collect()
}

/// Parse, emit, re-parse, and compare shapes.
fn assert_roundtrip_preserves(input: &str) {
    let map = tree_to_map(&parse_outline(input));
    let emitted = map_to_markdown(&map);
    assert_eq!(
        shape(input),
        shape(&emitted),
        "shape mismatch after round-trip.\nOriginal:\n{input}\nEmitted:\n{emitted}"
    );
}

// ─── Fixture-based tests ─────────────────────────────────────────────────

#[test]
fn roundtrip_minimal_fixture() {
    assert_roundtrip_preserves(include_str!("fixtures/minimal.md"));
}

#[test]
fn roundtrip_project_notes_fixture() {
    assert_roundtrip_preserves(include_str!("fixtures/project_notes.md"));
}

#[test]
fn roundtrip_multi_root_fixture() {
    assert_roundtrip_preserves(include_str!("fixtures/multi_root.md"));
}

// ─── Specific contracts ──────────────────────────────────────────────────

#[test]
fn heading_ladder_emits_exactly() {
    let map = tree_to_map(&parse_outline("# Doc\n## Intro\n### Point A\n"));
    assert_eq!(map_to_markdown(&map), "# Doc\n## Intro\n### Point A");
}

#[test]
fn fixture_labels_are_decoded() {
    let input = include_str!("fixtures/project_notes.md");
    let map = tree_to_map(&parse_outline(input));
    assert!(
        map.nodes.iter().any(|n| n.label == "café & bar meeting"),
        "encoded heading should decode"
    );
}

#[test]
fn path_ids_survive_reparse() {
    let input = include_str!("fixtures/project_notes.md");
    let first = tree_to_map(&parse_outline(input));
    let second = tree_to_map(&parse_outline(input));

    let ids = |m: &mm_core::MindMap| -> Vec<String> {
        m.nodes.iter().map(|n| n.id.as_str().to_string()).collect()
    };
    assert_eq!(ids(&first), ids(&second));
}

#[test]
fn canonical_text_is_a_fixed_point() {
    let input = include_str!("fixtures/minimal.md");
    let emitted = map_to_markdown(&tree_to_map(&parse_outline(input)));
    let reemitted = map_to_markdown(&tree_to_map(&parse_outline(&emitted)));
    assert_eq!(emitted, reemitted);
}

#[test]
fn multi_root_fixture_emits_both_sections() {
    let input = include_str!("fixtures/multi_root.md");
    let emitted = map_to_markdown(&tree_to_map(&parse_outline(input)));
    assert_eq!(emitted, "# North\n## Compass\n# South\n## Anchor");
}
