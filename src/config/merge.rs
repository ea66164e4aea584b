//! CLI overrides on top of file/env configuration

use crate::domain::Config;

/// Values given on the command line. `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub max_auto_select_bytes: Option<u64>,
    pub fetch_batch_size: Option<usize>,
    /// Appended to the configured globs.
    pub exclude_globs: Vec<String>,
    pub github_api_url: Option<String>,
    pub gemini_model: Option<String>,
}

pub fn merge_cli_with_config(mut config: Config, cli: CliOverrides) -> Config {
    if let Some(bytes) = cli.max_auto_select_bytes {
        config.max_auto_select_bytes = bytes;
    }
    if let Some(size) = cli.fetch_batch_size {
        config.fetch_batch_size = size;
    }
    for glob in cli.exclude_globs {
        if !config.exclude_globs.contains(&glob) {
            config.exclude_globs.push(glob);
        }
    }
    if let Some(url) = cli.github_api_url {
        config.github_api_url = url;
    }
    if let Some(model) = cli.gemini_model {
        config.gemini_model = model;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_overrides_keep_config() {
        let mut base = Config::default();
        base.fetch_batch_size = 3;
        let merged = merge_cli_with_config(base.clone(), CliOverrides::default());
        assert_eq!(merged, base);
    }

    #[test]
    fn test_overrides_win_and_globs_append() {
        let mut base = Config::default();
        base.exclude_globs = vec!["docs/**".into()];
        let merged = merge_cli_with_config(
            base,
            CliOverrides {
                max_auto_select_bytes: Some(10),
                fetch_batch_size: Some(8),
                exclude_globs: vec!["docs/**".into(), "*.snap".into()],
                github_api_url: None,
                gemini_model: Some("other-model".into()),
            },
        );
        assert_eq!(merged.max_auto_select_bytes, 10);
        assert_eq!(merged.fetch_batch_size, 8);
        assert_eq!(merged.exclude_globs, vec!["docs/**".to_string(), "*.snap".to_string()]);
        assert_eq!(merged.gemini_model, "other-model");
    }
}
