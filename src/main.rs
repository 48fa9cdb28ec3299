mod cli;
mod commands;
mod formatting;
mod pipeline;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::{run_convert, run_image_ids, run_render};

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

async fn run() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = cli::parse();
    init_logging(args.verbose);

    match args.command {
        Commands::Convert {
            file_key,
            token,
            output,
            file_name,
            prefer_component_images,
            save_document,
            format,
        } => {
            run_convert(
                &raw_args,
                args.config,
                file_key,
                token,
                output,
                file_name,
                prefer_component_images,
                save_document,
                format,
            )
            .await
        }
        Commands::Render {
            input,
            images,
            output,
            prefer_component_images,
            format,
        } => run_render(
            &raw_args,
            args.config,
            input,
            images,
            output,
            prefer_component_images,
            format,
        ),
        Commands::ImageIds { input, format } => run_image_ids(input, format),
    }
}
