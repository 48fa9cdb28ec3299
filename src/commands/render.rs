use std::path::PathBuf;
use std::process::ExitCode;

use log::debug;

use figdom_lib::figma::ImageUrlMap;
use figdom_lib::output::OUTPUT_VERSION;
use figdom_lib::{render_file, FigdomError, FigdomOutput, RenderOutput};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::pipeline::{read_document, read_image_map, render_html, write_file};
use crate::settings::{flag_present, load_config};

/// Run the render command: offline conversion of a saved document.
pub fn run_render(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    input: PathBuf,
    images: Option<PathBuf>,
    output: Option<PathBuf>,
    prefer_component_images: bool,
    format: OutputFormat,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, None),
    };
    let prefer_component_images = if flag_present(raw_args, "--prefer-component-images") {
        prefer_component_images
    } else {
        config.images.prefer_component_images
    };

    let file = match read_document(&input) {
        Ok(file) => file,
        Err(err) => return render_error(err, format, None),
    };

    let mut image_map: ImageUrlMap = config
        .images
        .component_images
        .iter()
        .map(|(name, url)| (name.clone(), url.clone()))
        .collect();
    if let Some(path) = &images {
        match read_image_map(path) {
            Ok(map) => image_map.merge(map),
            Err(err) => return render_error(err, format, None),
        }
    }
    debug!("rendering with {} known image URL(s)", image_map.len());

    let root = match render_file(&file, &image_map, prefer_component_images) {
        Ok(root) => root,
        Err(err) => return render_error(err, format, None),
    };
    let html = render_html(&root, &config.rules);

    let inline_html = match &output {
        Some(path) => {
            if let Err(err) = write_file(path, &html) {
                return render_error(err, format, None);
            }
            None
        }
        None => Some(html),
    };

    let body = FigdomOutput::Render(RenderOutput {
        version: OUTPUT_VERSION.to_string(),
        input,
        images,
        output_path: output,
        html: inline_html,
    });
    if let Err(err) = write_output(&body, format, None) {
        return render_error(FigdomError::Config(err.to_string()), format, None);
    }
    ExitCode::SUCCESS
}
