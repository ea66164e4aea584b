//! Ignore rules applied to repository listings.

use crate::domain::{extension_of, normalize_extension, Config, Entry, EntryKind};
use crate::error::IngestError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;

/// Decides which listing entries never make it into the tree.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    dirs: HashSet<String>,
    extensions: HashSet<String>,
    /// Multi-dot entries such as `.min.js`, matched against the end of the file name.
    suffixes: Vec<String>,
    globs: GlobSet,
}

impl IgnoreRules {
    pub fn new<D, E, G>(dirs: D, extensions: E, exclude_globs: G) -> Result<Self, IngestError>
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
        G: IntoIterator,
        G::Item: AsRef<str>,
    {
        let dirs = dirs.into_iter().map(|d| d.as_ref().to_string()).collect();

        let mut plain = HashSet::new();
        let mut suffixes = Vec::new();
        for ext in extensions {
            let ext = normalize_extension(ext.as_ref());
            if ext.matches('.').count() > 1 {
                suffixes.push(ext);
            } else {
                plain.insert(ext);
            }
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in exclude_globs {
            let pattern = pattern.as_ref();
            let glob = Glob::new(pattern).map_err(|e| IngestError::InvalidGlob {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
            builder.add(glob);
        }
        let globs = builder.build().map_err(|e| IngestError::InvalidGlob {
            pattern: String::new(),
            message: e.to_string(),
        })?;

        Ok(Self { dirs, extensions: plain, suffixes, globs })
    }

    pub fn from_config(config: &Config) -> Result<Self, IngestError> {
        Self::new(&config.ignored_dirs, &config.ignored_extensions, &config.exclude_globs)
    }

    pub fn is_ignored(&self, entry: &Entry) -> bool {
        self.in_ignored_dir(entry)
            || (entry.kind == EntryKind::File && self.has_ignored_extension(&entry.path))
            || self.globs.is_match(&entry.path)
    }

    /// Directory segments only: a file that happens to be named `build` is kept.
    fn in_ignored_dir(&self, entry: &Entry) -> bool {
        let mut segments: Vec<&str> = entry.path.split('/').collect();
        if entry.kind == EntryKind::File {
            segments.pop();
        }
        segments.iter().any(|segment| self.dirs.contains(*segment))
    }

    fn has_ignored_extension(&self, path: &str) -> bool {
        let name = path.rsplit('/').next().unwrap_or(path).to_lowercase();
        let ext = extension_of(&name);
        if !ext.is_empty() && self.extensions.contains(&ext) {
            return true;
        }
        self.suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        let config = Config::default();
        Self::new(&config.ignored_dirs, &config.ignored_extensions, std::iter::empty::<&str>())
            .unwrap_or_else(|_| unreachable!("default rules contain no globs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> Entry {
        Entry::file(path, Some(10), "sha")
    }

    #[test]
    fn test_ignores_known_directories_anywhere_in_path() {
        let rules = IgnoreRules::default();
        assert!(rules.is_ignored(&file("node_modules/react/index.js")));
        assert!(rules.is_ignored(&file("packages/app/dist/main.js")));
        assert!(rules.is_ignored(&Entry::directory("web/.next")));
        assert!(!rules.is_ignored(&file("src/build.rs")));
        assert!(!rules.is_ignored(&file("scripts/build")));
    }

    #[test]
    fn test_ignores_binary_and_media_extensions() {
        let rules = IgnoreRules::default();
        assert!(rules.is_ignored(&file("assets/logo.PNG")));
        assert!(rules.is_ignored(&file("yarn.lock")));
        assert!(rules.is_ignored(&file("static/app.js.map")));
        assert!(!rules.is_ignored(&file("src/lib.rs")));
        assert!(!rules.is_ignored(&Entry::directory("docs.png")));
    }

    #[test]
    fn test_multi_dot_suffixes_match_file_name_end() {
        let rules = IgnoreRules::default();
        assert!(rules.is_ignored(&file("public/vendor.min.js")));
        assert!(rules.is_ignored(&file("public/site.min.css")));
        assert!(!rules.is_ignored(&file("public/site.js")));
    }

    #[test]
    fn test_exclude_globs() {
        let rules = IgnoreRules::new(
            std::iter::empty::<&str>(),
            std::iter::empty::<&str>(),
            ["**/*_test.go", "fixtures/**"],
        )
        .expect("rules");
        assert!(rules.is_ignored(&file("pkg/server_test.go")));
        assert!(rules.is_ignored(&file("fixtures/data.json")));
        assert!(!rules.is_ignored(&file("pkg/server.go")));
    }

    #[test]
    fn test_invalid_glob_is_reported() {
        let err = IgnoreRules::new(std::iter::empty::<&str>(), std::iter::empty::<&str>(), ["a[b"])
            .expect_err("invalid glob");
        assert!(matches!(err, IngestError::InvalidGlob { .. }));
    }
}
