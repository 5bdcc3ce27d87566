//! Integration tests: a full editing session over an imported outline.
//!
//! Covers the spine of the product: import text, mutate the map through
//! the session, undo back to the start, and export edited text that the
//! importer can read again.

use mm_core::graph::MindMap;
use mm_core::id::NodeId;
use mm_core::transduce::tree_to_map;
use mm_core::tree::parse_outline;
use mm_editor::session::EditSession;

const INPUT: &str = "# Plan\n## Spring\n### Seeds\n## Summer\n";

fn import() -> MindMap {
    tree_to_map(&parse_outline(INPUT))
}

fn id_of(map: &MindMap, label: &str) -> NodeId {
    map.nodes
        .iter()
        .find(|n| n.label == label)
        .map(|n| n.id)
        .expect("label present")
}

#[test]
fn every_edit_is_undoable_back_to_the_import() {
    let original = import();
    let mut session = EditSession::new(original.clone());

    let spring = id_of(session.map(), "Spring");
    let summer = id_of(session.map(), "Summer");
    let seeds = id_of(session.map(), "Seeds");

    session.add_child(summer).unwrap();
    session.rename(spring, "Early Spring").unwrap();
    session.reconnect(summer, seeds).unwrap();
    session.remove_subtree(spring).unwrap();

    let mut undone = 0;
    while session.undo().is_some() {
        undone += 1;
    }
    assert_eq!(undone, 4);
    assert!(original.same_contents(session.map()));
    assert!(session.map().is_forest());
}

#[test]
fn edited_map_exports_parseable_text() {
    let mut session = EditSession::new(import());

    let summer = id_of(session.map(), "Summer");
    let added = session.add_child(summer).unwrap();
    session.rename(added, "Harvest").unwrap();

    let exported = session.export_markdown();
    assert_eq!(
        exported,
        "# Plan\n## Spring\n### Seeds\n## Summer\n### Harvest"
    );

    // The export is consumable by the same importer.
    let reimported = tree_to_map(&parse_outline(&exported));
    assert_eq!(reimported.nodes.len(), session.map().nodes.len());
    assert!(reimported.is_forest());
}

#[test]
fn reparenting_moves_whole_subtrees_in_the_export() {
    let mut session = EditSession::new(import());

    let summer = id_of(session.map(), "Summer");
    let seeds = id_of(session.map(), "Seeds");
    session.reconnect(summer, seeds).unwrap();

    assert_eq!(
        session.export_markdown(),
        "# Plan\n## Spring\n## Summer\n### Seeds"
    );
}

#[test]
fn redo_after_undo_replays_the_same_command() {
    let mut session = EditSession::new(import());
    let spring = id_of(session.map(), "Spring");

    session.remove_subtree(spring).unwrap();
    let after_remove = session.map().clone();

    session.undo();
    assert!(import().same_contents(session.map()));

    session.redo();
    assert!(after_remove.same_contents(session.map()));
    assert_eq!(session.export_markdown(), "# Plan\n## Summer");
}
