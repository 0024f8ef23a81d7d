use inkpaste_parser::{parse_and_prepare, Node, NodeKind};
use proptest::prelude::*;
use rstest::rstest;

fn kinds(nodes: &[Node]) -> Vec<&'static str> {
    nodes.iter().map(|node| node.kind.name()).collect()
}

#[rstest]
#[case("---\ntitle: x\n---\n\nBody\n")]
#[case("+++\ntitle = \"x\"\n+++\n\nBody\n")]
#[case("\u{feff}---\ntitle: x\n---\n\nBody\n")]
fn front_matter_never_survives(#[case] source: &str) {
    let doc = parse_and_prepare(source);
    let mut found = false;
    doc.root.walk(&mut |node| {
        if matches!(node.kind, NodeKind::FrontMatter(_)) {
            found = true;
        }
    });
    assert!(!found);
    assert_eq!(doc.children().len(), 1);
    assert_eq!(doc.children()[0].plain_text(), "Body");
}

#[rstest]
#[case("# H\n", 1)]
#[case("\n\n## H\n", 3)]
#[case("Intro\n\n> quote\n", 3)]
fn blocks_carry_their_first_line(#[case] source: &str, #[case] line: usize) {
    let doc = parse_and_prepare(source);
    let last = doc.children().last().unwrap();
    assert_eq!(last.source_line, Some(line));
}

#[test]
fn sibling_order_is_source_order() {
    let doc = parse_and_prepare("# A\n\nText\n\n- item\n\n---\n\n```\ncode\n```\n");
    assert_eq!(
        kinds(doc.children()),
        vec!["heading", "paragraph", "list", "thematic-break", "code-block"]
    );
}

proptest! {
    #[test]
    fn parsing_never_panics(source in "\\PC{0,300}") {
        let doc = parse_and_prepare(&source);
        let mut lines_ok = true;
        doc.root.walk(&mut |node| {
            if let Some(line) = node.source_line {
                lines_ok &= line >= 1 && node.kind.carries_source_line();
            }
        });
        prop_assert!(lines_ok);
    }
}
