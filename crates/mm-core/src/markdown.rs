//! Adapter over the external `pulldown-cmark` tokenizer.
//!
//! Walks the event stream and produces the `{content, children}` AST shape
//! the tree builder consumes. Only the outline-bearing constructs matter:
//! ATX headings (H1–H6) and nested list items. Inline code and emphasis
//! collapse to their text; paragraphs, block quotes, and other prose blocks
//! are not part of the outline and are skipped.

use crate::ast::AstNode;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// One outline block in document order, before nesting is recovered.
#[derive(Debug)]
struct Block {
    depth: usize,
    text: String,
}

/// Parse markdown text into an outline AST.
///
/// The returned root carries no content; its children are the top-level
/// headings/items. Input with no outline constructs yields an empty root —
/// the pipeline treats that as a parse failure.
#[must_use]
pub fn to_ast(markdown: &str) -> AstNode {
    fold_blocks(scan_blocks(markdown))
}

/// Flatten the event stream into `(depth, text)` blocks.
///
/// Heading depth is the heading level (H1 = 1). A list item's depth is the
/// depth of the heading governing it plus the list nesting, so items nest
/// under their section and under their parent items.
fn scan_blocks(markdown: &str) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut current: Option<Block> = None;
    let mut heading_depth = 0usize;
    let mut list_depth = 0usize;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                flush(&mut blocks, &mut current);
                heading_depth = level as usize;
                current = Some(Block {
                    depth: heading_depth,
                    text: String::new(),
                });
            }
            Event::End(TagEnd::Heading(_)) => flush(&mut blocks, &mut current),
            Event::Start(Tag::List(_)) => list_depth += 1,
            Event::End(TagEnd::List(_)) => list_depth = list_depth.saturating_sub(1),
            Event::Start(Tag::Item) => {
                flush(&mut blocks, &mut current);
                current = Some(Block {
                    depth: heading_depth + list_depth,
                    text: String::new(),
                });
            }
            Event::End(TagEnd::Item) => flush(&mut blocks, &mut current),
            Event::Text(t) | Event::Code(t) => {
                if let Some(block) = current.as_mut() {
                    block.text.push_str(&t);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(block) = current.as_mut() {
                    block.text.push(' ');
                }
            }
            _ => {}
        }
    }
    flush(&mut blocks, &mut current);
    blocks
}

fn flush(blocks: &mut Vec<Block>, current: &mut Option<Block>) {
    if let Some(block) = current.take() {
        blocks.push(block);
    }
}

/// Recover nesting from the flat block sequence.
///
/// Standard stack fold: a block closes every open block of equal or greater
/// depth, then opens under whatever remains (or the root). Skipped levels
/// (`#` followed by `###`) nest directly — structure follows document order,
/// not the literal heading number.
fn fold_blocks(blocks: Vec<Block>) -> AstNode {
    let mut root = AstNode::default();
    let mut stack: Vec<(usize, AstNode)> = Vec::new();

    for block in blocks {
        loop {
            match stack.last() {
                Some((depth, _)) if *depth >= block.depth => {
                    if let Some((_, done)) = stack.pop() {
                        attach(&mut root, &mut stack, done);
                    }
                }
                _ => break,
            }
        }
        stack.push((block.depth, AstNode::text(block.text)));
    }
    while let Some((_, done)) = stack.pop() {
        attach(&mut root, &mut stack, done);
    }
    root
}

fn attach(root: &mut AstNode, stack: &mut Vec<(usize, AstNode)>, done: AstNode) {
    match stack.last_mut() {
        Some((_, parent)) => parent.children.push(done),
        None => root.children.push(done),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels(node: &AstNode) -> Vec<String> {
        node.children.iter().map(AstNode::label).collect()
    }

    #[test]
    fn headings_nest_by_level() {
        let ast = to_ast("# Doc\n## Intro\n## Body\n### Detail\n");
        assert_eq!(labels(&ast), ["Doc"]);
        let doc = &ast.children[0];
        assert_eq!(labels(doc), ["Intro", "Body"]);
        assert_eq!(labels(&doc.children[1]), ["Detail"]);
    }

    #[test]
    fn list_items_nest_under_heading() {
        let ast = to_ast("## Tasks\n- one\n- two\n  - two-a\n");
        let tasks = &ast.children[0];
        assert_eq!(tasks.label(), "Tasks");
        assert_eq!(labels(tasks), ["one", "two"]);
        assert_eq!(labels(&tasks.children[1]), ["two-a"]);
    }

    #[test]
    fn skipped_heading_level_still_nests() {
        let ast = to_ast("# Top\n### Deep\n");
        let top = &ast.children[0];
        assert_eq!(labels(top), ["Deep"]);
    }

    #[test]
    fn multiple_top_headings_are_siblings() {
        let ast = to_ast("# A\n# B\n");
        assert_eq!(labels(&ast), ["A", "B"]);
    }

    #[test]
    fn inline_code_joins_text() {
        let ast = to_ast("# use `serde` here\n");
        assert_eq!(ast.children[0].label(), "use serde here");
    }

    #[test]
    fn prose_only_input_yields_empty_root() {
        let ast = to_ast("just a paragraph\n\nand another\n");
        assert!(ast.children.is_empty());
    }
}
