//! Figma-to-HTML conversion library.
//!
//! Turns a Figma document tree into an absolutely positioned HTML page:
//! constraint-driven layout, extracted visual styles, exported images, and a
//! serializer whose output can be rewritten per node by pluggable rules
//! (for example to splice in templating loops).
//!
//! # Module Overview
//!
//! - [`figma`] - Figma API types, client, layout/style resolution and tree building
//! - [`vdom`] - Output tree (`OutputNode`, `Child`, `NodePath`)
//! - [`serialize`] - Markup serialization with rewrite rules
//! - [`rules`] - Generic reusable rewrite rules
//! - [`config`] - Configuration file support
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```no_run
//! use figdom_lib::figma::{convert_document, ConvertOptions, FigmaAuth, FigmaClient};
//! use figdom_lib::{rules, serialize, Config};
//!
//! # async fn example() -> figdom_lib::Result<()> {
//! let config = Config::default();
//! let auth = FigmaAuth::from_env().expect("FIGMA_TOKEN");
//! let client = FigmaClient::from_config(auth, &config.api)?;
//!
//! let converted = convert_document(&client, "FILE_KEY", &ConvertOptions::default()).await?;
//! let chain = rules::from_config(&config.rules);
//! let html = serialize(&converted.root, Some(&chain));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod figma;
pub mod output;
pub mod rules;
pub mod serialize;
pub mod vdom;

pub use config::Config;
pub use error::{FigdomError, Result};
pub use figma::{
    convert_document, render_file, resolve_image_urls, ConvertOptions, ConvertedDocument,
    DesignApi, FigmaAuth, FigmaClient,
};
pub use output::{
    ConvertOutput, ErrorOutput, FigdomOutput, ImageIdsOutput, RenderOutput, OUTPUT_VERSION,
};
pub use serialize::{serialize, serialize_node, Continuation, RewriteRule};
pub use vdom::{BoxMetrics, Child, NodePath, OutputNode, Tag};
