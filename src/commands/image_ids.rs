use std::path::PathBuf;
use std::process::ExitCode;

use figdom_lib::figma::collect_image_ids;
use figdom_lib::output::OUTPUT_VERSION;
use figdom_lib::{FigdomError, FigdomOutput, ImageIdsOutput};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::pipeline::read_document;

/// Run the image-ids command.
pub fn run_image_ids(input: PathBuf, format: OutputFormat) -> ExitCode {
    let file = match read_document(&input) {
        Ok(file) => file,
        Err(err) => return render_error(err, format, None),
    };

    let body = FigdomOutput::ImageIds(ImageIdsOutput {
        version: OUTPUT_VERSION.to_string(),
        ids: collect_image_ids(&file.document),
        input,
    });
    if let Err(err) = write_output(&body, format, None) {
        return render_error(FigdomError::Config(err.to_string()), format, None);
    }
    ExitCode::SUCCESS
}
