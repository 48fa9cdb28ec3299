use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use figdom_lib::output::OUTPUT_VERSION;
use figdom_lib::{ErrorOutput, FigdomError, FigdomOutput};

use crate::cli::OutputFormat;

/// Write output in the requested format.
pub fn write_output(
    body: &FigdomOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
    };
    Ok(())
}

/// Render an error and return the fatal exit code.
pub fn render_error(err: FigdomError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    let error_payload = err.to_payload();
    let payload = FigdomOutput::Error(ErrorOutput {
        version: OUTPUT_VERSION.to_string(),
        message: Some(error_payload.message.clone()),
        error: error_payload,
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    log::error!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                log::error!("Failed to write error output: {}", write_err);
            }
        }
    };

    ExitCode::from(2)
}

/// Write JSON output to file or stdout.
fn write_json_output(
    body: &FigdomOutput,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Write pretty output to file or stdout.
fn write_pretty_output(body: &FigdomOutput, output: Option<&Path>) -> io::Result<()> {
    let stdout_is_tty = std::io::stdout().is_terminal();
    let use_human = output.is_none() && stdout_is_tty;

    if use_human {
        let content = format_pretty(body, true);
        println!("{content}");
        return Ok(());
    }

    // Non-tty or file output: keep JSON shape for pipelines/files.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &FigdomOutput, colorize: bool) -> String {
    let mut buf = String::new();
    match body {
        FigdomOutput::Convert(out) => {
            let header = color("[CONVERT]", "32", colorize);
            writeln!(buf, "{} {} ({})", header, out.document_name, out.file_key).ok();
            writeln!(buf, "HTML: {}", out.output_path.display()).ok();
            if let Some(document) = &out.document_path {
                writeln!(buf, "Document: {}", document.display()).ok();
            }
            let images = format!("{}/{}", out.resolved_images, out.exported_nodes);
            let code = if out.resolved_images >= out.exported_nodes {
                "32"
            } else {
                "33"
            };
            writeln!(buf, "Images resolved: {}", color(&images, code, colorize)).ok();
        }
        FigdomOutput::Render(out) => {
            let header = color("[RENDER]", "36", colorize);
            writeln!(buf, "{} {}", header, out.input.display()).ok();
            if let Some(images) = &out.images {
                writeln!(buf, "Images: {}", images.display()).ok();
            }
            match (&out.output_path, &out.html) {
                (Some(path), _) => {
                    writeln!(buf, "HTML: {}", path.display()).ok();
                }
                (None, Some(html)) => {
                    writeln!(buf, "{html}").ok();
                }
                (None, None) => {}
            }
        }
        FigdomOutput::ImageIds(out) => {
            let header = color("[IMAGE-IDS]", "34", colorize);
            writeln!(buf, "{} {}", header, out.input.display()).ok();
            for (label, ids) in [("jpg", &out.ids.jpg), ("png", &out.ids.png), ("svg", &out.ids.svg)]
            {
                writeln!(buf, "- {:4} {:>3}  {}", label, ids.len(), ids.join(", ")).ok();
            }
        }
        FigdomOutput::Error(out) => {
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
        }
    }
    buf
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figdom_lib::figma::ImageIds;
    use figdom_lib::{ConvertOutput, ImageIdsOutput};

    #[test]
    fn render_error_always_returns_fatal_exit_code() {
        let code = render_error(
            FigdomError::Config("boom".to_string()),
            OutputFormat::Json,
            None,
        );
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn format_pretty_summarizes_convert_runs() {
        let output = FigdomOutput::Convert(ConvertOutput {
            version: OUTPUT_VERSION.to_string(),
            file_key: "AbC123".into(),
            document_name: "Careers".into(),
            output_path: PathBuf::from("site/index.html"),
            document_path: Some(PathBuf::from("site/document.json")),
            exported_nodes: 4,
            resolved_images: 3,
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[CONVERT] Careers (AbC123)"));
        assert!(pretty.contains("HTML: site/index.html"));
        assert!(pretty.contains("Document: site/document.json"));
        assert!(pretty.contains("Images resolved: 3/4"));
    }

    #[test]
    fn format_pretty_lists_image_buckets() {
        let output = FigdomOutput::ImageIds(ImageIdsOutput {
            version: OUTPUT_VERSION.to_string(),
            input: PathBuf::from("document.json"),
            ids: ImageIds {
                jpg: vec![],
                png: vec!["1:3".into()],
                svg: vec!["1:2".into(), "1:4".into()],
            },
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("svg"));
        assert!(pretty.contains("1:2, 1:4"));
    }

    #[test]
    fn format_pretty_handles_errors() {
        let output = FigdomOutput::Error(ErrorOutput {
            version: OUTPUT_VERSION.to_string(),
            message: Some("bad input".to_string()),
            error: figdom_lib::error::ErrorPayload {
                category: figdom_lib::error::ErrorCategory::Config,
                message: "bad input".to_string(),
                remediation: Some("check flags".to_string()),
            },
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[ERROR] bad input"));
        assert!(pretty.contains("Hint: check flags"));
    }
}
