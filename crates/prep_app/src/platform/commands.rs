use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{bail, Context};
use prep_core::{FormField, ResultView};
use prep_engine::{copy_section, format_result, CopyFormat, EndpointMode, ResultDocument};
use prep_logging::prep_info;

use crate::cli::{CopyFormatArg, EndpointModeArg, PrepareArgs};

use super::app::{run_prepare, PrepareRequest};
use super::clipboard::clipboard_for;
use super::config::{default_config_ron, AppConfig};
use super::export::COMPANY_FIELD;

impl From<CopyFormatArg> for CopyFormat {
    fn from(arg: CopyFormatArg) -> Self {
        match arg {
            CopyFormatArg::PlainText => CopyFormat::PlainText,
            CopyFormatArg::HtmlStripped => CopyFormat::HtmlStripped,
        }
    }
}

pub fn prepare(mut config: AppConfig, args: PrepareArgs) -> anyhow::Result<()> {
    apply_overrides(&mut config, &args);
    let request = PrepareRequest {
        fields: form_fields(&args),
        copy_section: args.copy_section,
        export: !args.no_export,
    };
    let clipboard = clipboard_for(config.clipboard_file.clone());
    let report = run_prepare(&config, request, clipboard, io::stdout())?;

    if let Some(path) = &report.export_path {
        println!("Exported to {}", path.display());
    }
    if let Some(copied) = &report.copied {
        match &copied.detail {
            Some(detail) => println!(
                "Section {}: {} ({detail})",
                copied.heading_index, copied.label
            ),
            None => println!("Section {}: {}", copied.heading_index, copied.label),
        }
    }
    if let ResultView::Error { message, .. } = &report.view.result {
        bail!("submission failed: {message}");
    }
    Ok(())
}

pub fn format(file: Option<&Path>) -> anyhow::Result<()> {
    let text = match file {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("reading stdin")?;
            text
        }
    };
    println!("{}", format_result(Some(&text)));
    Ok(())
}

pub fn sections(
    config: &AppConfig,
    file: &Path,
    copy: Option<usize>,
    format: Option<CopyFormatArg>,
) -> anyhow::Result<()> {
    let html = fs::read_to_string(file).with_context(|| format!("reading {file:?}"))?;
    let mut document = ResultDocument::parse(&html);
    document.augment();

    let headings = document.headings();
    if headings.is_empty() {
        println!("No sections.");
    }
    for heading in &headings {
        println!("[{}] {}", heading.index, heading.label);
    }

    if let Some(index) = copy {
        let format = format.map(CopyFormat::from).unwrap_or(config.copy_format);
        let clipboard = clipboard_for(config.clipboard_file.clone());
        let content = copy_section(&document, index, format, clipboard.as_ref())?;
        println!("Copied section {index} ({} chars)", content.chars().count());
    }
    Ok(())
}

pub fn print_default_config() -> anyhow::Result<()> {
    println!("{}", default_config_ron()?);
    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &PrepareArgs) {
    if let Some(host) = &args.page_host {
        config.page_host = host.clone();
    }
    match args.endpoint_mode {
        Some(EndpointModeArg::Relative) => {
            let origin = args
                .origin
                .clone()
                .unwrap_or_else(|| format!("http://{}", config.page_host));
            config.endpoint_mode = EndpointMode::Relative { origin };
        }
        Some(EndpointModeArg::AbsoluteByHost) => {
            if !matches!(config.endpoint_mode, EndpointMode::AbsoluteByHost { .. }) {
                config.endpoint_mode = EndpointMode::default();
            }
        }
        None => {
            if let (Some(origin), EndpointMode::Relative { .. }) =
                (&args.origin, &config.endpoint_mode)
            {
                config.endpoint_mode = EndpointMode::Relative {
                    origin: origin.clone(),
                };
            }
        }
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(format) = args.copy_format {
        config.copy_format = format.into();
    }
    prep_info!(
        "endpoint mode {:?}, page host {}",
        config.endpoint_mode,
        config.page_host
    );
}

fn form_fields(args: &PrepareArgs) -> Vec<FormField> {
    vec![
        FormField::new(COMPANY_FIELD, args.company.as_str()),
        FormField::new("meeting_objective", args.objective.as_str()),
        FormField::new("attendees", args.attendees.as_str()),
        FormField::new("meeting_duration", args.duration.to_string()),
        FormField::new("focus_areas", args.focus.as_deref().unwrap_or_default()),
    ]
}
