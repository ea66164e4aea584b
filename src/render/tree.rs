//! Directory tree renderings of the current selection.

use crate::domain::{FileTree, Node};
use crate::select::has_selected_descendant;

/// Selected files and directories holding at least one selected file.
fn is_visible(node: &Node) -> bool {
    has_selected_descendant(node)
}

/// Box-drawing tree of every visible node, rooted at `repo_name`.
///
/// Fully deselected subtrees are omitted; the last visible sibling at each
/// level takes the terminal connector.
pub fn render_tree_digest(tree: &FileTree, repo_name: &str) -> String {
    let mut out = format!("└── {}\n", repo_name);
    let visible: Vec<&Node> = tree.roots().iter().filter(|n| is_visible(n)).collect();
    let total = visible.len();
    for (idx, node) in visible.into_iter().enumerate() {
        walk_tree(node, "", idx == total - 1, &mut out);
    }
    out
}

fn walk_tree(node: &Node, prefix: &str, is_last: bool, out: &mut String) {
    let connector = if is_last { "    └── " } else { "    ├── " };
    out.push_str(prefix);
    out.push_str(connector);
    out.push_str(&node.name);
    out.push('\n');

    let children: Vec<&Node> = node.children.iter().filter(|c| is_visible(c)).collect();
    if children.is_empty() {
        return;
    }
    let extension = if is_last { "        " } else { "    │   " };
    let child_prefix = format!("{}{}", prefix, extension);
    let total = children.len();
    for (idx, child) in children.into_iter().enumerate() {
        walk_tree(child, &child_prefix, idx == total - 1, out);
    }
}

/// Heading-per-node outline for export: `# repo`, then `##` for top-level
/// nodes, one more `#` per level of depth.
pub fn render_markdown_tree(tree: &FileTree, repo_name: &str) -> String {
    let mut out = format!("# {}\n", repo_name);
    walk_markdown(tree.roots(), 2, &mut out);
    out
}

fn walk_markdown(nodes: &[Node], level: usize, out: &mut String) {
    for node in nodes.iter().filter(|n| is_visible(n)) {
        out.push_str(&"#".repeat(level));
        out.push(' ');
        out.push_str(&node.name);
        out.push('\n');
        walk_markdown(&node.children, level + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Entry;
    use crate::scan::{IgnoreRules, TreeBuilder};
    use crate::select::toggle;
    use similar_asserts::assert_eq;

    fn tree() -> FileTree {
        let entries = vec![
            Entry::file("src/main.rs", Some(1), "a"),
            Entry::file("src/util/mod.rs", Some(1), "b"),
            Entry::file("docs/guide.md", Some(1), "c"),
            Entry::file("README.md", Some(1), "d"),
        ];
        TreeBuilder::new(IgnoreRules::default()).build(&entries).expect("tree")
    }

    #[test]
    fn test_tree_digest_layout() {
        let expected = "\
└── demo
    ├── docs
    │       └── guide.md
    ├── src
    │       ├── util
    │       │       └── mod.rs
    │       └── main.rs
    └── README.md
";
        assert_eq!(render_tree_digest(&tree(), "demo"), expected);
    }

    #[test]
    fn test_tree_digest_omits_deselected_subtrees() {
        let mut tree = tree();
        toggle(&mut tree, "docs", false).unwrap();
        toggle(&mut tree, "src/main.rs", false).unwrap();
        let expected = "\
└── demo
    ├── src
    │       └── util
    │               └── mod.rs
    └── README.md
";
        assert_eq!(render_tree_digest(&tree, "demo"), expected);
    }

    #[test]
    fn test_tree_digest_with_nothing_selected_is_root_only() {
        let mut tree = tree();
        for path in ["src", "docs", "README.md"] {
            toggle(&mut tree, path, false).unwrap();
        }
        assert_eq!(render_tree_digest(&tree, "demo"), "└── demo\n");
    }

    #[test]
    fn test_markdown_tree() {
        let mut tree = tree();
        toggle(&mut tree, "docs", false).unwrap();
        let expected = "# demo\n## src\n### util\n#### mod.rs\n### main.rs\n## README.md\n";
        assert_eq!(render_markdown_tree(&tree, "demo"), expected);
    }
}
