//! The selectable repository tree.

use super::entry::EntryKind;
use serde::Serialize;
use std::cmp::Ordering;

/// A tree element after ignore filtering and hierarchy construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub path: String,
    pub name: String,
    pub kind: EntryKind,
    /// Lowercased, dot-prefixed (`.rs`). Empty for directories and extension-less names.
    pub extension: String,
    pub size: Option<u64>,
    pub content_hash: Option<String>,
    pub is_selected: bool,
    /// Always empty for files.
    pub children: Vec<Node>,
    /// Present only once fetched, and only for files.
    pub content: Option<String>,
}

impl Node {
    pub fn new_file(
        path: String,
        name: String,
        size: Option<u64>,
        content_hash: Option<String>,
        is_selected: bool,
    ) -> Self {
        let extension = extension_of(&name);
        Self {
            path,
            name,
            kind: EntryKind::File,
            extension,
            size,
            content_hash,
            is_selected,
            children: Vec::new(),
            content: None,
        }
    }

    pub fn new_dir(path: String, name: String) -> Self {
        Self {
            path,
            name,
            kind: EntryKind::Directory,
            extension: String::new(),
            size: None,
            content_hash: None,
            is_selected: true,
            children: Vec::new(),
            content: None,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    pub fn is_file(&self) -> bool {
        !self.is_dir()
    }

    /// Sibling order: directories first, then byte-wise by name.
    pub fn sibling_order(&self, other: &Node) -> Ordering {
        other.is_dir().cmp(&self.is_dir()).then_with(|| self.name.cmp(&other.name))
    }

    fn collect_files<'a>(&'a self, out: &mut Vec<&'a Node>) {
        if self.is_file() {
            out.push(self);
            return;
        }
        for child in &self.children {
            child.collect_files(out);
        }
    }

    fn find(&self, path: &str) -> Option<&Node> {
        if self.path == path {
            return Some(self);
        }
        if !is_ancestor_path(&self.path, path) {
            return None;
        }
        self.children.iter().find_map(|child| child.find(path))
    }

    fn find_mut(&mut self, path: &str) -> Option<&mut Node> {
        if self.path == path {
            return Some(self);
        }
        if !is_ancestor_path(&self.path, path) {
            return None;
        }
        self.children.iter_mut().find_map(|child| child.find_mut(path))
    }

    pub(crate) fn for_each_file_mut(&mut self, f: &mut impl FnMut(&mut Node)) {
        if self.is_file() {
            f(self);
            return;
        }
        for child in &mut self.children {
            child.for_each_file_mut(f);
        }
    }
}

/// `.` followed by the text after the last dot, lowercased; empty when the name has no dot.
pub fn extension_of(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((_, ext)) => format!(".{}", ext.to_lowercase()),
        None => String::new(),
    }
}

fn is_ancestor_path(ancestor: &str, path: &str) -> bool {
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path.as_bytes()[ancestor.len()] == b'/'
}

/// The canonical node forest for one ingestion session.
///
/// The flat file list is never stored: [`FileTree::files`] derives it by
/// depth-first traversal, so the flat and tree views cannot diverge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileTree {
    roots: Vec<Node>,
}

impl FileTree {
    pub fn from_roots(roots: Vec<Node>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// File nodes in traversal order (the "flat file list").
    pub fn files(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        for root in &self.roots {
            root.collect_files(&mut out);
        }
        out
    }

    pub fn selected_files(&self) -> Vec<&Node> {
        self.files().into_iter().filter(|f| f.is_selected).collect()
    }

    pub fn find(&self, path: &str) -> Option<&Node> {
        self.roots.iter().find_map(|root| root.find(path))
    }

    pub(crate) fn find_mut(&mut self, path: &str) -> Option<&mut Node> {
        self.roots.iter_mut().find_map(|root| root.find_mut(path))
    }

    pub(crate) fn for_each_file_mut(&mut self, mut f: impl FnMut(&mut Node)) {
        for root in &mut self.roots {
            root.for_each_file_mut(&mut f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("main.RS"), ".rs");
        assert_eq!(extension_of("app.min.js"), ".js");
        assert_eq!(extension_of(".gitignore"), ".gitignore");
        assert_eq!(extension_of("Makefile"), "");
    }

    #[test]
    fn test_sibling_order_puts_directories_first() {
        let dir = Node::new_dir("zeta".into(), "zeta".into());
        let file = Node::new_file("alpha.rs".into(), "alpha.rs".into(), None, None, true);
        assert_eq!(dir.sibling_order(&file), Ordering::Less);
        assert_eq!(file.sibling_order(&dir), Ordering::Greater);
    }

    #[test]
    fn test_find_does_not_confuse_prefix_siblings() {
        let mut src = Node::new_dir("src".into(), "src".into());
        src.children.push(Node::new_file("src/a.rs".into(), "a.rs".into(), None, None, true));
        let srcx = Node::new_file("srcx".into(), "srcx".into(), None, None, true);
        let tree = FileTree::from_roots(vec![src, srcx]);

        assert_eq!(tree.find("src/a.rs").map(|n| n.name.as_str()), Some("a.rs"));
        assert!(tree.find("srcx").is_some());
        assert!(tree.find("src/b.rs").is_none());
    }
}
