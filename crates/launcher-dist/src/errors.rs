use camino::Utf8PathBuf;
use launcher_assets::PlatformId;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("No content root configured")]
    #[diagnostic(
        code(config::missing_content_root),
        help("Pass --content-root <dir> or set content_root in launcher-dist.toml")
    )]
    MissingContentRoot,

    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(config::not_found),
        help("Check the --config path, or omit it to use launcher-dist.toml next to the executable")
    )]
    ConfigNotFound { path: Utf8PathBuf },

    #[error("Configuration file error: {path}")]
    #[diagnostic(
        code(config::parse_error),
        help("Check launcher-dist.toml for syntax errors and unknown keys")
    )]
    ConfigParseError {
        path: Utf8PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Asset load failed")]
    #[diagnostic(
        code(assets::load_failed),
        help("Every file declared in the catalog must exist under the content root")
    )]
    LoadFailed {
        #[source]
        source: launcher_assets::Error,
    },

    #[error("'{file_name}' is not part of the {platform} bundle")]
    #[diagnostic(
        code(assets::file_not_found),
        help("Run `launcher-dist catalog` to list the files of each platform")
    )]
    FileNotInBundle {
        platform: PlatformId,
        file_name: String,
    },

    #[error("Checksum {crc:08x} does not match {file_name}")]
    #[diagnostic(
        code(assets::checksum_mismatch),
        help("Omit --crc, or drop --verify-checksums to fetch regardless of the checksum")
    )]
    ChecksumMismatch { file_name: String, crc: u32 },

    #[error("Failed to decode {file_name}")]
    #[diagnostic(code(assets::decode_failed))]
    DecodeFailed {
        file_name: String,
        #[source]
        source: launcher_assets::Error,
    },

    #[error("IO operation failed")]
    #[diagnostic(code(io::operation_failed))]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl CliError {
    pub fn config_not_found(path: Utf8PathBuf) -> Self {
        Self::ConfigNotFound { path }
    }

    pub fn config_parse_error(path: Utf8PathBuf, source: toml::de::Error) -> Self {
        Self::ConfigParseError { path, source }
    }

    pub fn load_failed(source: launcher_assets::Error) -> Self {
        Self::LoadFailed { source }
    }

    pub fn file_not_in_bundle(platform: PlatformId, file_name: impl Into<String>) -> Self {
        Self::FileNotInBundle {
            platform,
            file_name: file_name.into(),
        }
    }
}
