use std::path::{Path, PathBuf};

use figdom_lib::{Config, FigdomError};

/// Tracks which CLI flags were explicitly provided vs. defaulted.
#[derive(Debug, Default)]
pub struct ConvertFlagSources {
    pub output: bool,
    pub file_name: bool,
    pub prefer_component_images: bool,
    pub save_document: bool,
}

impl ConvertFlagSources {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            output: flag_present(args, "--output") || flag_present(args, "-o"),
            file_name: flag_present(args, "--file-name"),
            prefer_component_images: flag_present(args, "--prefer-component-images"),
            save_document: flag_present(args, "--save-document"),
        }
    }
}

/// Checks if a flag was present in the command-line arguments.
pub fn flag_present(args: &[String], flag: &str) -> bool {
    args.iter()
        .any(|arg| arg == flag || arg.starts_with(&format!("{flag}=")))
}

/// Resolved settings after merging CLI args and config file.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConvertSettings {
    pub directory: PathBuf,
    pub file_name: String,
    pub prefer_component_images: bool,
    pub save_document: bool,
}

impl ResolvedConvertSettings {
    pub fn output_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Merge CLI arguments with config file, preferring CLI when flags are present.
pub fn resolve_convert_settings(
    cli_output: Option<PathBuf>,
    cli_file_name: Option<String>,
    cli_prefer_component_images: bool,
    cli_save_document: bool,
    config: &Config,
    flags: &ConvertFlagSources,
) -> ResolvedConvertSettings {
    ResolvedConvertSettings {
        directory: cli_output
            .filter(|_| flags.output)
            .unwrap_or_else(|| config.output.directory.clone()),
        file_name: cli_file_name
            .filter(|_| flags.file_name)
            .unwrap_or_else(|| config.output.file_name.clone()),
        prefer_component_images: if flags.prefer_component_images {
            cli_prefer_component_images
        } else {
            config.images.prefer_component_images
        },
        save_document: if flags.save_document {
            cli_save_document
        } else {
            config.output.save_document
        },
    }
}

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/figdom/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, FigdomError> {
    let cfg = Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .or_else(|| Config::central_config_path().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "defaults".to_string());
        FigdomError::Config(format!("Failed to read config file {}: {}", loc, e))
    })?;

    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        FigdomError::Config(prefix)
    })?;
    Ok(cfg)
}

/// Format effective config as a single-line string.
pub fn format_effective_config(
    settings: &ResolvedConvertSettings,
    config: &Config,
    config_source: Option<&Path>,
) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    format!(
        "Effective config [{source}]: api={} (timeout {}s), output={}, prefer_component_images={}, save_document={}, component_images={}, rules: unwrap={:?}, drop={:?}, drop_hidden={}, loops={}",
        config.api.base_url,
        config.api.timeout,
        settings.output_path().display(),
        settings.prefer_component_images,
        settings.save_document,
        config.images.component_images.len(),
        config.rules.unwrap_types,
        config.rules.drop_names,
        config.rules.drop_hidden,
        config.rules.loops.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flag_present_matches_bare_and_assigned_forms() {
        let raw = args(&["figdom", "convert", "--file-name=jobs.html", "-o", "site"]);
        assert!(flag_present(&raw, "--file-name"));
        assert!(flag_present(&raw, "-o"));
        assert!(!flag_present(&raw, "--output"));
        assert!(!flag_present(&raw, "--file"));
    }

    #[test]
    fn resolve_convert_settings_prefers_config_when_flags_absent() {
        let mut cfg = Config::default();
        cfg.output.directory = PathBuf::from("public");
        cfg.output.file_name = "careers.html".to_string();
        cfg.output.save_document = true;
        cfg.images.prefer_component_images = true;

        let resolved = resolve_convert_settings(
            None,
            None,
            false,
            false,
            &cfg,
            &ConvertFlagSources::default(),
        );

        assert_eq!(resolved.output_path(), PathBuf::from("public/careers.html"));
        assert!(resolved.prefer_component_images);
        assert!(resolved.save_document);
    }

    #[test]
    fn resolve_convert_settings_prefers_cli_when_flags_present() {
        let raw = args(&[
            "figdom",
            "convert",
            "--output",
            "out",
            "--file-name",
            "index.erb",
            "--prefer-component-images",
        ]);
        let flags = ConvertFlagSources::from_args(&raw);
        let resolved = resolve_convert_settings(
            Some(PathBuf::from("out")),
            Some("index.erb".to_string()),
            true,
            false,
            &Config::default(),
            &flags,
        );

        assert_eq!(resolved.directory, PathBuf::from("out"));
        assert_eq!(resolved.file_name, "index.erb");
        assert!(resolved.prefer_component_images);
        assert!(!resolved.save_document);
    }

    #[test]
    fn load_config_reports_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figdom.toml");
        std::fs::write(&path, "[api]\ntimeout = 0\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        match err {
            FigdomError::Config(msg) => {
                assert!(msg.contains("Invalid config"));
                assert!(msg.contains("timeout"));
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn format_effective_config_includes_fields() {
        let cfg = Config::default();
        let resolved =
            resolve_convert_settings(None, None, false, false, &cfg, &ConvertFlagSources::default());
        let summary = format_effective_config(&resolved, &cfg, Some(Path::new("figdom.toml")));
        assert!(summary.contains("https://api.figma.com"));
        assert!(summary.contains("timeout 30s"));
        assert!(summary.contains("index.html"));
        assert!(summary.contains("drop_hidden=true"));
        assert!(summary.contains("figdom.toml"));
    }
}
