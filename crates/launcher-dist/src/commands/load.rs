use super::{load_service_with_progress, Settings, SourceArgs};
use crate::println_pad;
use crate::utils::{format_size, ratio_percent};
use colored::Colorize;
use launcher_assets::{LoadStage, PlatformCatalog, PlatformId};

pub struct LoadBundlesArgs {
    pub source: SourceArgs,
    /// Empty means every platform in the catalog.
    pub platforms: Vec<PlatformId>,
}

pub fn load_bundles(args: LoadBundlesArgs) -> miette::Result<()> {
    let settings = Settings::resolve(&args.source)?;
    let catalog = select_platforms(&args.platforms);

    println_pad!(
        "{} {} {}",
        "📦 Loading".bright_blue().bold(),
        catalog.len().to_string().bright_cyan().bold(),
        format!("platform(s) from {}", settings.content_root).bright_white()
    );

    let loaded = load_service_with_progress(&settings, &catalog, |progress| {
        if progress.stage == LoadStage::PlatformLoaded {
            if let Some(platform) = progress.platform {
                println_pad!(
                    "   {} {} {}",
                    "✔".bright_green(),
                    platform.to_string().bright_cyan(),
                    format!("({}/{})", progress.current, progress.total).dimmed()
                );
            }
        }
    })?;

    println_pad!("\n{}", "📊 Bundles:".bright_magenta().bold());
    println_pad!(
        "   {:<24} {:>6} {:>12} {:>12} {:>8}",
        "PLATFORM".bold(),
        "FILES".bold(),
        "RAW".bold(),
        "STORED".bold(),
        "RATIO".bold()
    );

    let mut total_raw = 0;
    let mut total_stored = 0;
    for stats in &loaded.stats {
        total_raw += stats.raw_bytes;
        total_stored += stats.stored_bytes;
        println_pad!(
            "   {:<24} {:>6} {:>12} {:>12} {:>7.1}%",
            stats.platform.to_string().bright_cyan(),
            stats.files,
            format_size(stats.raw_bytes),
            format_size(stats.stored_bytes),
            ratio_percent(stats.stored_bytes, stats.raw_bytes)
        );
    }

    println_pad!(
        "\n{} {} raw, {} stored ({:.1}%) in {:.2?}",
        "✅ Loaded".bright_green().bold(),
        format_size(total_raw).bright_white().bold(),
        format_size(total_stored).bright_white().bold(),
        ratio_percent(total_stored, total_raw),
        loaded.load_time
    );
    tracing::debug!(
        "Cache holds {} platform(s), checksum policy {:?}",
        loaded.service.cache().len(),
        loaded.service.checksum_policy()
    );

    Ok(())
}

fn select_platforms(platforms: &[PlatformId]) -> PlatformCatalog {
    let catalog = PlatformCatalog::default();
    if platforms.is_empty() {
        catalog
    } else {
        catalog.subset(platforms)
    }
}
