//! Per-file compression policy.
//!
//! Which transform a file receives depends only on its name and its role in the
//! bundle:
//!
//! | extension | role      | transform                        |
//! |-----------|-----------|----------------------------------|
//! | `.jar`    | primary   | [`Transform::Repackage`] (gzip)  |
//! | `.jar`    | auxiliary | [`Transform::Passthrough`]       |
//! | other     | any       | [`Transform::EntropyCode`] (LZMA)|
//!
//! Jar files are zip containers and already compressed, so auxiliary jars are
//! shipped untouched. The primary gamepack is re-wrapped in gzip because that is
//! what Java launchers unpack.

use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use lzma_rs::compress::{Options as LzmaOptions, UnpackedSize};
use serde::Serialize;
use std::io::{Read, Write};

/// Container-archive extension that triggers repackaging or passthrough.
pub const ARCHIVE_EXTENSION: &str = ".jar";

/// Offset of the little-endian u64 uncompressed size in an LZMA-alone header.
pub const LZMA_SIZE_OFFSET: usize = 5;

/// Role of a file within its platform bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileRole {
    /// The platform's main executable or library.
    Primary,
    /// A supporting file shipped next to the primary file.
    Auxiliary,
}

/// Transform applied to raw file bytes before they are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Transform {
    /// Re-wrap an archive in a gzip stream.
    Repackage,
    /// Compress with LZMA (alone format).
    EntropyCode,
    /// Store bytes unmodified.
    Passthrough,
}

impl Transform {
    /// HTTP `Content-Encoding` label for bytes produced by this transform.
    pub const fn content_encoding(self) -> &'static str {
        match self {
            Transform::Repackage => "gzip",
            Transform::EntropyCode => "lzma",
            Transform::Passthrough => "identity",
        }
    }

    /// Apply the transform to raw bytes.
    pub fn encode(self, raw: &[u8]) -> Result<Vec<u8>> {
        match self {
            Transform::Repackage => compress_gzip(raw),
            Transform::EntropyCode => compress_lzma(raw),
            Transform::Passthrough => Ok(raw.to_vec()),
        }
    }

    /// Reverse the transform, recovering the raw bytes.
    pub fn decode(self, stored: &[u8]) -> Result<Vec<u8>> {
        match self {
            Transform::Repackage => decompress_gzip(stored),
            Transform::EntropyCode => decompress_lzma(stored),
            Transform::Passthrough => Ok(stored.to_vec()),
        }
    }
}

/// Whether a file name carries the container-archive extension (case-insensitive).
pub fn is_archive(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(ARCHIVE_EXTENSION)
}

/// Choose the transform for a file. Pure and total: unknown extensions get
/// [`Transform::EntropyCode`].
pub fn choose_transform(file_name: &str, role: FileRole) -> Transform {
    if !is_archive(file_name) {
        return Transform::EntropyCode;
    }

    match role {
        FileRole::Primary => Transform::Repackage,
        FileRole::Auxiliary => Transform::Passthrough,
    }
}

/// Compress data into a gzip stream (default level).
pub fn compress_gzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| Error::Compression(format!("gzip: {e}")))?;
    encoder
        .finish()
        .map_err(|e| Error::Compression(format!("gzip: {e}")))
}

/// Compress data into an LZMA-alone stream.
///
/// The header declares the exact uncompressed size, never the unknown-size marker.
pub fn compress_lzma(data: &[u8]) -> Result<Vec<u8>> {
    let options = LzmaOptions {
        unpacked_size: UnpackedSize::WriteToHeader(Some(data.len() as u64)),
    };

    let mut input = data;
    let mut out = Vec::with_capacity(data.len() / 2 + 13);
    lzma_rs::lzma_compress_with_options(&mut input, &mut out, &options)
        .map_err(|e| Error::Compression(format!("lzma: {e}")))?;
    Ok(out)
}

pub fn decompress_gzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| Error::Compression(format!("gzip: {e}")))?;
    Ok(out)
}

pub fn decompress_lzma(data: &[u8]) -> Result<Vec<u8>> {
    let mut input = data;
    let mut out = Vec::new();
    lzma_rs::lzma_decompress(&mut input, &mut out)
        .map_err(|e| Error::Compression(format!("lzma: {e}")))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_policy_table() {
        assert_eq!(
            choose_transform("gamepack.jar", FileRole::Primary),
            Transform::Repackage
        );
        assert_eq!(
            choose_transform("browsercontrol_0.jar", FileRole::Auxiliary),
            Transform::Passthrough
        );
        assert_eq!(
            choose_transform("librs2client.so", FileRole::Primary),
            Transform::EntropyCode
        );
        assert_eq!(
            choose_transform("libEGL.dll", FileRole::Auxiliary),
            Transform::EntropyCode
        );
    }

    #[test]
    fn test_archive_extension_is_case_insensitive() {
        assert!(is_archive("GamePack.JAR"));
        assert!(!is_archive("jar"));
        assert!(!is_archive("gamepack.jar.bak"));
    }

    #[test]
    fn test_unknown_extension_defaults_to_entropy_code() {
        assert_eq!(
            choose_transform("no_extension", FileRole::Auxiliary),
            Transform::EntropyCode
        );
        assert_eq!(choose_transform("", FileRole::Primary), Transform::EntropyCode);
    }

    #[test]
    fn test_content_encoding_labels() {
        assert_eq!(Transform::Repackage.content_encoding(), "gzip");
        assert_eq!(Transform::EntropyCode.content_encoding(), "lzma");
        assert_eq!(Transform::Passthrough.content_encoding(), "identity");
    }

    #[test]
    fn test_repackage_rewraps_bytes() {
        let raw = b"PK\x03\x04 not really a jar".to_vec();
        let stored = Transform::Repackage.encode(&raw).unwrap();

        assert_ne!(stored, raw);
        // gzip member header
        assert_eq!(&stored[..2], &[0x1f, 0x8b]);
        assert_eq!(Transform::Repackage.decode(&stored).unwrap(), raw);
    }

    #[test]
    fn test_passthrough_is_identity() {
        let raw = b"PK\x03\x04 auxiliary".to_vec();
        assert_eq!(Transform::Passthrough.encode(&raw).unwrap(), raw);
    }

    #[test]
    fn test_lzma_compresses_redundant_data() {
        let raw = b"ELF native library padding ".repeat(512);
        let stored = compress_lzma(&raw).unwrap();

        assert!(stored.len() < raw.len());
        assert_eq!(decompress_lzma(&stored).unwrap(), raw);
    }

    #[test]
    fn test_lzma_header_declares_size() {
        let raw: Vec<u8> = (0..1500u32).map(|i| (i % 7) as u8).collect();
        let stored = compress_lzma(&raw).unwrap();

        let size_field: [u8; 8] = stored[LZMA_SIZE_OFFSET..LZMA_SIZE_OFFSET + 8]
            .try_into()
            .unwrap();
        assert_eq!(u64::from_le_bytes(size_field), raw.len() as u64);
        assert_eq!(decompress_lzma(&stored).unwrap(), raw);
    }

    #[test]
    fn test_lzma_empty_input() {
        let stored = compress_lzma(&[]).unwrap();
        assert!(!stored.is_empty());
        assert_eq!(&stored[LZMA_SIZE_OFFSET..LZMA_SIZE_OFFSET + 8], &[0u8; 8]);
        assert!(decompress_lzma(&stored).unwrap().is_empty());
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(
            decompress_lzma(&[0xff; 32]),
            Err(Error::Compression(_))
        ));
        assert!(matches!(
            decompress_gzip(b"definitely not gzip"),
            Err(Error::Compression(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_entropy_code_round_trips(raw in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let stored = Transform::EntropyCode.encode(&raw).unwrap();
            prop_assert_eq!(Transform::EntropyCode.decode(&stored).unwrap(), raw);
        }

        #[test]
        fn prop_policy_is_deterministic(name in "[a-zA-Z0-9_.]{0,24}") {
            for role in [FileRole::Primary, FileRole::Auxiliary] {
                prop_assert_eq!(choose_transform(&name, role), choose_transform(&name, role));
            }
        }
    }
}
