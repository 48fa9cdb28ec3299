use std::path::PathBuf;
use std::process::ExitCode;

use log::{debug, info};

use figdom_lib::figma::{collect_image_ids, convert_document, ConvertOptions};
use figdom_lib::output::OUTPUT_VERSION;
use figdom_lib::{ConvertOutput, FigdomError, FigdomOutput, FigmaAuth, FigmaClient};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::pipeline::{render_html, write_document, write_file};
use crate::settings::{
    format_effective_config, load_config, resolve_convert_settings, ConvertFlagSources,
};

/// Run the convert command.
#[allow(clippy::too_many_arguments)]
pub async fn run_convert(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    file_key: String,
    token: Option<String>,
    output: Option<PathBuf>,
    file_name: Option<String>,
    prefer_component_images: bool,
    save_document: bool,
    format: OutputFormat,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, None),
    };
    let flags = ConvertFlagSources::from_args(raw_args);
    let settings = resolve_convert_settings(
        output,
        file_name,
        prefer_component_images,
        save_document,
        &config,
        &flags,
    );
    debug!(
        "{}",
        format_effective_config(&settings, &config, config_path.as_deref())
    );

    let auth = match token
        .filter(|t| !t.is_empty())
        .map(FigmaAuth::PersonalAccessToken)
        .or_else(FigmaAuth::from_env)
    {
        Some(auth) => auth,
        None => {
            return render_error(
                FigdomError::Config(
                    "FIGMA_TOKEN environment variable is required for Figma access".to_string(),
                ),
                format,
                None,
            )
        }
    };
    let client = match FigmaClient::from_config(auth, &config.api) {
        Ok(client) => client,
        Err(err) => return render_error(err, format, None),
    };

    let options = ConvertOptions {
        prefer_component_images: settings.prefer_component_images,
        component_images: config.images.component_images.clone(),
    };
    info!("Converting Figma file {file_key}…");
    let converted = match convert_document(&client, &file_key, &options).await {
        Ok(converted) => converted,
        Err(err) => return render_error(err, format, None),
    };

    let html = render_html(&converted.root, &config.rules);
    let output_path = settings.output_path();
    if let Err(err) = write_file(&output_path, &html) {
        return render_error(err, format, None);
    }

    let document_path = if settings.save_document {
        match write_document(&settings.directory, &converted.file) {
            Ok(path) => Some(path),
            Err(err) => return render_error(err, format, None),
        }
    } else {
        None
    };

    let body = FigdomOutput::Convert(ConvertOutput {
        version: OUTPUT_VERSION.to_string(),
        file_key,
        document_name: converted.file.name.clone(),
        output_path,
        document_path,
        exported_nodes: collect_image_ids(&converted.file.document).len(),
        resolved_images: converted.exported_images,
    });
    if let Err(err) = write_output(&body, format, None) {
        return render_error(FigdomError::Config(err.to_string()), format, None);
    }
    ExitCode::SUCCESS
}
