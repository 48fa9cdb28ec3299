//! Figma document conversion.
//!
//! This module provides:
//! - [`FigmaClient`] / [`DesignApi`] - access to the Figma REST API
//! - [`convert_document`] - fetch a file, resolve its images and build the output tree
//! - [`resolve_image_urls`] - concurrent image URL lookup, one request per format
//! - API types for parsing Figma JSON responses

pub mod api_types;
pub mod client;
pub mod conversion;
pub mod style;
pub mod transform;


use std::collections::HashMap;

use futures::future::try_join_all;
use log::debug;

pub use api_types::{ComponentMap, FigmaFile, ImageFormat, NodeType, VisualNode};
pub use client::{DesignApi, FigmaAuth, FigmaClient};
pub use conversion::{build_output_tree, collect_image_ids, BuildOptions, ImageIds, ImageUrlMap};

use crate::error::{FigdomError, Result};
use crate::vdom::OutputNode;

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub prefer_component_images: bool,
    /// Pre-rendered library component images, keyed by component name.
    pub component_images: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct ConvertedDocument {
    pub file: FigmaFile,
    /// Every URL the tree was built with, configured component images included.
    pub images: ImageUrlMap,
    /// URLs returned by the image export endpoint only.
    pub exported_images: usize,
    pub root: OutputNode,
}

/// Fetch every non-empty image bucket concurrently and merge the results.
///
/// The first failing request fails the whole lookup.
pub async fn resolve_image_urls<A: DesignApi>(
    api: &A,
    file_key: &str,
    ids: &ImageIds,
) -> Result<ImageUrlMap> {
    let requests = ImageFormat::ALL
        .into_iter()
        .filter(|format| !ids.bucket(*format).is_empty())
        .map(|format| api.fetch_image_urls(file_key, ids.bucket(format), format));

    let batches = try_join_all(requests).await?;
    let mut urls = ImageUrlMap::new();
    for batch in batches {
        urls.merge(batch);
    }
    Ok(urls)
}

pub async fn convert_document<A: DesignApi>(
    api: &A,
    file_key: &str,
    options: &ConvertOptions,
) -> Result<ConvertedDocument> {
    let file = api.fetch_document(file_key).await?;
    debug!("fetched document {:?} ({})", file.name, file_key);

    let ids = collect_image_ids(&file.document);
    debug!(
        "found {} exported node(s): {} jpg, {} png, {} svg",
        ids.len(),
        ids.jpg.len(),
        ids.png.len(),
        ids.svg.len()
    );

    let mut images: ImageUrlMap = options
        .component_images
        .iter()
        .map(|(name, url)| (name.clone(), url.clone()))
        .collect();
    let exported = resolve_image_urls(api, file_key, &ids).await?;
    let exported_images = exported.len();
    images.merge(exported);

    let root = render_file(&file, &images, options.prefer_component_images)?;
    Ok(ConvertedDocument {
        file,
        images,
        exported_images,
        root,
    })
}

/// Build the output tree of an already fetched file.
pub fn render_file(
    file: &FigmaFile,
    images: &ImageUrlMap,
    prefer_component_images: bool,
) -> Result<OutputNode> {
    let options = BuildOptions {
        prefer_component_images,
    };
    build_output_tree(&file.document, &file.components, images, &options).ok_or_else(|| {
        FigdomError::document(format!(
            "document root {} ({}) produced no output",
            file.document.id,
            file.document.node_type.as_str()
        ))
    })
}
