//! Config file loading and environment overrides

use crate::domain::Config;
use anyhow::{Context, Result};
use figment::providers::{Env, Serialized};
use figment::Figment;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix for environment overrides; `__` separates nested keys
/// (`REPO_DIGEST_RANKING__README_BONUS=8`).
pub const ENV_PREFIX: &str = "REPO_DIGEST_";

const SECTION: &str = "repo-digest";

/// Load config from `config_path`, or from a config file discovered in
/// `search_root`, then apply environment overrides.
///
/// An explicitly named file must parse. A discovered file that does not is
/// skipped with a warning.
pub fn load_config(search_root: &Path, config_path: Option<&Path>) -> Result<Config> {
    let from_file = load_file_config(search_root, config_path)?;
    apply_env_overrides(from_file)
}

fn load_file_config(search_root: &Path, config_path: Option<&Path>) -> Result<Config> {
    let explicit = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(search_root),
    };
    let Some(config_file) = discovered else {
        return Ok(Config::default());
    };

    let content = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;
    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "toml" => parse_toml_config(&content, &config_file),
        "yaml" | "yml" => parse_yaml_config(&content, &config_file),
        other => Err(anyhow::anyhow!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        )),
    };

    match parsed {
        Ok(cfg) => {
            tracing::debug!("Loaded config from {}", config_file.display());
            Ok(cfg)
        }
        Err(e) if explicit => Err(e),
        Err(e) => {
            tracing::warn!(
                "Ignoring auto-discovered config {}: {:#}",
                config_file.display(),
                e
            );
            Ok(Config::default())
        }
    }
}

/// Parse TOML config, supporting a nested `[repo-digest]` section.
fn parse_toml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    config_val.try_into().with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

/// Parse YAML config, supporting a nested `repo-digest:` mapping.
fn parse_yaml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    serde_yaml::from_value(config_val)
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

fn apply_env_overrides(base: Config) -> Result<Config> {
    Figment::from(Serialized::defaults(base))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .context("Invalid configuration in REPO_DIGEST_* environment variables")
}

fn discover_config(search_root: &Path) -> Option<PathBuf> {
    let candidates = [
        "repo-digest.toml",
        ".repo-digest.toml",
        "repo-digest.yml",
        ".repo-digest.yml",
        "repo-digest.yaml",
        ".repo-digest.yaml",
    ];

    candidates.iter().map(|c| search_root.join(c)).find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_defaults_when_missing() {
        let tmp = TempDir::new().expect("tmp");
        let cfg = load_file_config(tmp.path(), None).expect("config");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_load_toml_config() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("repo-digest.toml"),
            "max_auto_select_bytes = 999\nfetch_batch_size = 2\n\n[ranking]\nreadme_bonus = 7\n",
        )
        .expect("write");

        let cfg = load_file_config(tmp.path(), None).expect("config");
        assert_eq!(cfg.max_auto_select_bytes, 999);
        assert_eq!(cfg.fetch_batch_size, 2);
        assert_eq!(cfg.ranking.readme_bonus, 7);
        assert_eq!(cfg.ranking.filename_bonus, 20);
    }

    #[test]
    fn test_nested_section_in_yaml() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join(".repo-digest.yml"),
            "repo-digest:\n  ignored_extensions: [\"CSV\", \".parquet\"]\n",
        )
        .expect("write");

        let cfg = load_file_config(tmp.path(), None).expect("config");
        assert_eq!(cfg.ignored_extensions, vec![".csv".to_string(), ".parquet".to_string()]);
    }

    #[test]
    fn test_explicit_config_invalid_type_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "ignored_dirs = 123\n").expect("write");

        let result = load_file_config(tmp.path(), Some(&path));
        assert!(result.is_err(), "explicit config with invalid type should return Err");
    }

    #[test]
    fn test_explicit_config_unsupported_extension_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("config.ini");
        fs::write(&path, "x=1\n").expect("write");
        assert!(load_file_config(tmp.path(), Some(&path)).is_err());
    }

    #[test]
    fn test_auto_discovered_invalid_type_returns_default() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("repo-digest.toml"), "exclude_globs = false\n").expect("write");

        let cfg = load_file_config(tmp.path(), None).expect("should not error on auto-discovery");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_comma_separated_lists() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("custom.toml");
        let body = "exclude_globs = \"docs/**, *.snap\"\n\
                    ignored_dirs = \"vendor,  target\"\n";
        fs::write(&path, body).expect("write");

        let cfg = load_file_config(tmp.path(), Some(&path)).expect("config");
        assert_eq!(cfg.exclude_globs, vec!["docs/**".to_string(), "*.snap".to_string()]);
        assert_eq!(cfg.ignored_dirs, vec!["vendor".to_string(), "target".to_string()]);
    }

    #[test]
    fn test_env_overrides_file_values() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "repo-digest.toml",
                "max_auto_select_bytes = 999\nfetch_batch_size = 2\n",
            )?;
            jail.set_env("REPO_DIGEST_FETCH_BATCH_SIZE", "9");
            jail.set_env("REPO_DIGEST_RANKING__PATH_BONUS", "3");

            let cfg = load_config(jail.directory(), None).expect("config");
            assert_eq!(cfg.max_auto_select_bytes, 999);
            assert_eq!(cfg.fetch_batch_size, 9);
            assert_eq!(cfg.ranking.path_bonus, 3);
            Ok(())
        });
    }
}
