use std::path::{Path, PathBuf};

use log::debug;

use figdom_lib::config::RulesConfig;
use figdom_lib::figma::{FigmaFile, ImageUrlMap};
use figdom_lib::{rules, serialize, FigdomError, OutputNode, Result};

/// File name of the document snapshot written next to the HTML.
pub const DOCUMENT_SNAPSHOT: &str = "document.json";

/// Read a saved Figma file response.
pub fn read_document(path: &Path) -> Result<FigmaFile> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        FigdomError::Config(format!("Failed to read document {}: {}", path.display(), e))
    })?;
    let file: FigmaFile = serde_json::from_str(&raw)?;
    debug!("loaded document {:?} from {}", file.name, path.display());
    Ok(file)
}

/// Read an id -> URL map; `null` entries are dropped.
pub fn read_image_map(path: &Path) -> Result<ImageUrlMap> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        FigdomError::Config(format!("Failed to read image map {}: {}", path.display(), e))
    })?;
    let entries: std::collections::HashMap<String, Option<String>> = serde_json::from_str(&raw)?;
    Ok(entries
        .into_iter()
        .filter_map(|(key, url)| url.map(|url| (key, url)))
        .collect())
}

/// Serialize the tree with the configured rule set.
pub fn render_html(root: &OutputNode, rules_config: &RulesConfig) -> String {
    let chain = rules::from_config(rules_config);
    debug!("serializing with {} rule(s)", chain.len());
    serialize(root, Some(&chain))
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    debug!("wrote {} byte(s) to {}", contents.len(), path.display());
    Ok(())
}

/// Snapshot the fetched document into `directory`.
pub fn write_document(directory: &Path, file: &FigmaFile) -> Result<PathBuf> {
    let path = directory.join(DOCUMENT_SNAPSHOT);
    let json = serde_json::to_string_pretty(file)?;
    write_file(&path, &json)?;
    Ok(path)
}
