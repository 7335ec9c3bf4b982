//! Static platform catalog.
//!
//! A [`PlatformCatalog`] lists, in order, which directory holds each platform's
//! bundle and which files make it up. The catalog is plain data: it is fixed when
//! the process starts and never mutated afterwards.

use crate::error::{Error, Result};
use crate::platform::PlatformId;
use camino::Utf8PathBuf;
use serde::Serialize;
use std::collections::HashSet;

/// Name of the per-platform configuration blob inside each source directory.
pub const CONFIG_FILE_NAME: &str = "jav_config.ws";

/// Layout of one platform's bundle on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformDescriptor {
    pub id: PlatformId,
    /// Directory of the bundle, relative to the content root.
    pub source_path: Utf8PathBuf,
    /// Main executable or library. Absent for platforms that only ship auxiliary files.
    pub primary_file: Option<String>,
    /// Additional files shipped alongside the primary file.
    pub auxiliary_files: Vec<String>,
}

impl PlatformDescriptor {
    pub fn new(id: PlatformId, source_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            id,
            source_path: source_path.into(),
            primary_file: None,
            auxiliary_files: Vec::new(),
        }
    }

    pub fn with_primary(mut self, file_name: impl Into<String>) -> Self {
        self.primary_file = Some(file_name.into());
        self
    }

    pub fn with_auxiliary<I, S>(mut self, file_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auxiliary_files.extend(file_names.into_iter().map(Into::into));
        self
    }

    /// Relative path of the config blob for this platform.
    pub fn config_path(&self) -> Utf8PathBuf {
        self.source_path.join(CONFIG_FILE_NAME)
    }

    /// Number of distributable files (primary plus auxiliaries).
    pub fn file_count(&self) -> usize {
        usize::from(self.primary_file.is_some()) + self.auxiliary_files.len()
    }
}

/// Ordered list of platform descriptors with unique ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PlatformCatalog {
    descriptors: Vec<PlatformDescriptor>,
}

impl PlatformCatalog {
    /// Build a catalog, rejecting repeated platform ids.
    pub fn new(descriptors: Vec<PlatformDescriptor>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(descriptors.len());
        for descriptor in &descriptors {
            if !seen.insert(descriptor.id) {
                return Err(Error::DuplicatePlatform(descriptor.id));
            }
        }
        Ok(Self { descriptors })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlatformDescriptor> {
        self.descriptors.iter()
    }

    pub fn descriptors(&self) -> &[PlatformDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn get(&self, id: PlatformId) -> Option<&PlatformDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }

    /// Keep only the listed platforms, preserving catalog order.
    pub fn subset(&self, ids: &[PlatformId]) -> Self {
        Self {
            descriptors: self
                .descriptors
                .iter()
                .filter(|d| ids.contains(&d.id))
                .cloned()
                .collect(),
        }
    }
}

impl Default for PlatformCatalog {
    /// The production layout shipped to launchers.
    fn default() -> Self {
        let descriptors = vec![
            PlatformDescriptor::new(PlatformId::WindowsXp, "nxt/client/windows/x86/normal_xp")
                .with_primary("rs2client.exe"),
            PlatformDescriptor::new(PlatformId::WindowsX86, "nxt/client/windows/x86/normal")
                .with_primary("rs2client.exe"),
            PlatformDescriptor::new(PlatformId::WindowsX86_64, "nxt/client/windows/x86_64/normal")
                .with_primary("rs2client.exe"),
            PlatformDescriptor::new(PlatformId::Macintosh, "nxt/client/mac")
                .with_primary("librs2client.dylib"),
            PlatformDescriptor::new(PlatformId::Linux, "nxt/client/linux")
                .with_primary("librs2client.so"),
            PlatformDescriptor::new(
                PlatformId::WindowsX86Compat,
                "nxt/client/windows/x86/compatibility",
            )
            .with_primary("rs2client.exe")
            .with_auxiliary(["libEGL.dll", "libGLESv2.dll", "D3Dcompiler_43.dll"]),
            PlatformDescriptor::new(
                PlatformId::WindowsX86_64Compat,
                "nxt/client/windows/x86_64/compatibility",
            )
            .with_primary("rs2client.exe")
            .with_auxiliary(["libEGL.dll", "libGLESv2.dll", "D3Dcompiler_47.dll"]),
            PlatformDescriptor::new(PlatformId::Android, "nxt/client/android"),
            PlatformDescriptor::new(PlatformId::Ios, "nxt/client/ios"),
            PlatformDescriptor::new(PlatformId::Java, "jav/client")
                .with_primary("gamepack.jar")
                .with_auxiliary(["browsercontrol_0.jar", "browsercontrol_1.jar"]),
        ];

        Self { descriptors }
    }
}

impl<'a> IntoIterator for &'a PlatformCatalog {
    type Item = &'a PlatformDescriptor;
    type IntoIter = std::slice::Iter<'a, PlatformDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}
