use crate::println_pad;
use colored::Colorize;
use launcher_assets::PlatformCatalog;
use miette::IntoDiagnostic;
use serde_json::to_string_pretty;

pub struct ListCatalogArgs {
    pub json: bool,
}

pub fn list_catalog(args: ListCatalogArgs) -> miette::Result<()> {
    let catalog = PlatformCatalog::default();

    if args.json {
        println!("{}", to_string_pretty(&catalog).into_diagnostic()?);
        return Ok(());
    }

    println_pad!("{}", "🗂️  Platforms:".bright_magenta().bold());
    for descriptor in &catalog {
        println_pad!(
            "   {} {} {} {}",
            "•".bright_cyan(),
            descriptor.id.to_string().bright_cyan().bold(),
            format!("(wire: {})", descriptor.id.wire_value()).dimmed(),
            descriptor.source_path.as_str().bright_white()
        );
        if let Some(primary) = &descriptor.primary_file {
            println_pad!("       {} {}", "primary:".bright_green(), primary);
        }
        for auxiliary in &descriptor.auxiliary_files {
            println_pad!("       {} {}", "auxiliary:".bright_yellow(), auxiliary);
        }
    }

    Ok(())
}
