use super::{load_service, Settings, SourceArgs};
use crate::println_pad;
use colored::Colorize;
use launcher_assets::{PlatformCatalog, PlatformId};
use miette::IntoDiagnostic;
use std::io::Write;

pub struct ShowConfigArgs {
    pub source: SourceArgs,
    pub platform: PlatformId,
    pub output: Option<String>,
}

pub fn show_config(args: ShowConfigArgs) -> miette::Result<()> {
    let settings = Settings::resolve(&args.source)?;
    let catalog = PlatformCatalog::default().subset(&[args.platform]);
    let service = load_service(&settings, &catalog)?.service;

    let config = service.config(args.platform);

    match args.output {
        Some(output) => {
            std::fs::write(&output, config).into_diagnostic()?;
            println_pad!(
                "{} {} {}",
                "📝 Wrote".bright_green().bold(),
                format!("{} bytes to", config.len()).bright_white(),
                output.bright_cyan().bold()
            );
        }
        None => {
            std::io::stdout().write_all(config).into_diagnostic()?;
        }
    }

    Ok(())
}
