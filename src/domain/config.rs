//! Tunable settings shared by the pipeline stages.

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_MAX_AUTO_SELECT_BYTES: u64 = 25 * 1024;
pub const DEFAULT_FETCH_BATCH_SIZE: usize = 5;
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-lite";

pub fn default_ignored_dirs() -> &'static [&'static str] {
    &[
        ".git",
        "node_modules",
        "dist",
        "build",
        "coverage",
        ".next",
        ".vscode",
        ".idea",
        "__pycache__",
    ]
}

pub fn default_ignored_extensions() -> &'static [&'static str] {
    &[
        // Images
        ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".webp",
        // Video and audio
        ".mp4", ".mov", ".avi", ".webm", ".mp3", ".wav", ".ogg",
        // Archives
        ".zip", ".tar", ".gz", ".7z", ".rar",
        // Binaries
        ".exe", ".dll", ".so", ".dylib", ".bin",
        // Documents
        ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx",
        // Fonts
        ".eot", ".ttf", ".woff", ".woff2",
        // Lock files, minified bundles, source maps
        ".lock", ".min.js", ".min.css", ".map",
    ]
}

/// Heuristic weights for query relevance scoring.
///
/// Only the relative ordering these produce matters; none of the magnitudes
/// are part of any output contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    pub readme_bonus: u32,
    pub manifest_bonus: u32,
    pub filename_bonus: u32,
    pub path_bonus: u32,
    /// Per-token cap on content occurrences.
    pub content_cap: u32,
    /// Query tokens shorter than this are skipped.
    pub min_token_len: usize,
    pub max_results: usize,
    /// Files returned, unscored, when the query has no tokens.
    pub generic_results: usize,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            readme_bonus: 5,
            manifest_bonus: 5,
            filename_bonus: 20,
            path_bonus: 10,
            content_cap: 10,
            min_token_len: 3,
            max_results: 20,
            generic_results: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_extensions")]
    pub ignored_extensions: Vec<String>,
    #[serde(deserialize_with = "deserialize_list")]
    pub ignored_dirs: Vec<String>,
    #[serde(deserialize_with = "deserialize_list")]
    pub exclude_globs: Vec<String>,
    pub max_auto_select_bytes: u64,
    pub fetch_batch_size: usize,
    pub github_api_url: String,
    pub gemini_api_url: String,
    pub gemini_model: String,
    pub ranking: RankingWeights,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignored_extensions: default_ignored_extensions()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ignored_dirs: default_ignored_dirs().iter().map(|s| s.to_string()).collect(),
            exclude_globs: Vec::new(),
            max_auto_select_bytes: DEFAULT_MAX_AUTO_SELECT_BYTES,
            fetch_batch_size: DEFAULT_FETCH_BATCH_SIZE,
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            gemini_api_url: DEFAULT_GEMINI_API_URL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            ranking: RankingWeights::default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    fn into_items(self) -> Vec<String> {
        let raw = match self {
            StringOrList::One(s) => s.split(',').map(str::to_string).collect(),
            StringOrList::Many(items) => items,
        };
        raw.into_iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
    }
}

/// Accepts `"a, b"` or `["a", "b"]`.
fn deserialize_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(StringOrList::deserialize(deserializer)?.into_items())
}

/// Like [`deserialize_list`], lowercasing and adding the leading dot.
fn deserialize_extensions<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(StringOrList::deserialize(deserializer)?
        .into_items()
        .into_iter()
        .map(|ext| normalize_extension(&ext))
        .collect())
}

pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}
