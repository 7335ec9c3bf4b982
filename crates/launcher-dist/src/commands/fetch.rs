use super::{load_service, Settings, SourceArgs};
use crate::errors::CliError;
use crate::println_pad;
use crate::utils::format_size;
use colored::Colorize;
use launcher_assets::utils::checksum_from_wire;
use launcher_assets::{AssetService, ChecksumPolicy, PlatformCatalog, PlatformId};
use miette::IntoDiagnostic;

pub struct FetchFileArgs {
    pub source: SourceArgs,
    pub platform: PlatformId,
    pub file_name: String,
    /// Checksum as it arrives on the wire.
    pub crc: i64,
    pub decode: bool,
    pub output: String,
}

pub fn fetch_file(args: FetchFileArgs) -> miette::Result<()> {
    let settings = Settings::resolve(&args.source)?;
    let catalog = PlatformCatalog::default().subset(&[args.platform]);
    let service = load_service(&settings, &catalog)?.service;

    let bytes = payload(
        &service,
        args.platform,
        &args.file_name,
        checksum_from_wire(args.crc),
        args.decode,
    )?;
    std::fs::write(&args.output, &bytes).into_diagnostic()?;

    let encoding = service
        .entry(args.platform, &args.file_name)
        .map(|entry| entry.transform.content_encoding())
        .unwrap_or("identity");
    println_pad!(
        "{} {} {} {}",
        "📥 Fetched".bright_green().bold(),
        args.file_name.bright_cyan().bold(),
        format!("({}, {})", format_size(bytes.len()), encoding).dimmed(),
        format!("-> {}", args.output).bright_white()
    );

    Ok(())
}

/// Bytes to write for a fetch: the stored payload, or its decoded form.
fn payload(
    service: &AssetService,
    platform: PlatformId,
    file_name: &str,
    crc: u32,
    decode: bool,
) -> Result<Vec<u8>, CliError> {
    let Some(entry) = service.entry(platform, file_name) else {
        return Err(CliError::file_not_in_bundle(platform, file_name));
    };

    if service.checksum_policy() == ChecksumPolicy::Verify && entry.checksum != crc {
        return Err(CliError::ChecksumMismatch {
            file_name: file_name.to_string(),
            crc,
        });
    }
    let stored = service.file(platform, file_name, crc);

    if !decode {
        return Ok(stored.to_vec());
    }

    entry
        .transform
        .decode(stored)
        .map_err(|source| CliError::DecodeFailed {
            file_name: file_name.to_string(),
            source,
        })
}
