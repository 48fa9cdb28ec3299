use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "figdom")]
#[command(
    version,
    about = "Convert Figma documents into absolutely positioned HTML",
    long_about = "figdom\n\nModes:\n- convert: fetch a Figma file, resolve exported images and write HTML.\n- render: convert a saved document JSON offline, with an optional id->url image map.\n- image-ids: list the node ids flagged for image export, by format.\n\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose (debug) logging")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) for API, image, output and rule defaults; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a Figma file and write it as HTML
    Convert {
        #[arg(long, help = "Figma file key (the segment after /file/ in the URL)")]
        file_key: String,

        #[arg(
            long,
            help = "Personal access token (defaults to FIGMA_TOKEN, then FIGMA_OAUTH_TOKEN)"
        )]
        token: Option<String>,

        #[arg(long, short, value_name = "DIR", help = "Output directory")]
        output: Option<PathBuf>,

        #[arg(long, value_name = "NAME", help = "Output file name")]
        file_name: Option<String>,

        #[arg(
            long,
            help = "Look up library component images before a node's own export"
        )]
        prefer_component_images: bool,

        #[arg(long, help = "Also write the fetched document JSON next to the HTML")]
        save_document: bool,

        #[arg(long, value_enum, default_value = "json", help = "Status output format")]
        format: OutputFormat,
    },

    /// Convert a saved document JSON without network access
    Render {
        #[arg(long, help = "Figma file response JSON")]
        input: PathBuf,

        #[arg(long, help = "JSON object mapping node id (or component name) to image URL")]
        images: Option<PathBuf>,

        #[arg(long, short, help = "Write HTML to this file (inlined in the status if omitted)")]
        output: Option<PathBuf>,

        #[arg(
            long,
            help = "Look up library component images before a node's own export"
        )]
        prefer_component_images: bool,

        #[arg(long, value_enum, default_value = "json", help = "Status output format")]
        format: OutputFormat,
    },

    /// List node ids flagged for image export, bucketed by format
    ImageIds {
        #[arg(long, help = "Figma file response JSON")]
        input: PathBuf,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
