mod catalog;
mod config;
mod fetch;
mod load;

pub use catalog::{list_catalog, ListCatalogArgs};
pub use config::{show_config, ShowConfigArgs};
pub use fetch::{fetch_file, FetchFileArgs};
pub use load::{load_bundles, LoadBundlesArgs};

use crate::errors::CliError;
use crate::utils::config::{load_config, ServiceConfig};
use camino::{Utf8Path, Utf8PathBuf};
use launcher_assets::{
    AssetLoader, AssetService, AssetSlot, ChecksumPolicy, FsAssetSource, LoadProgress,
    PlatformCatalog, PlatformStats,
};
use std::time::Duration;

/// Options shared by every command that loads bundles.
#[derive(Debug, Clone, Default)]
pub struct SourceArgs {
    pub config_path: Option<String>,
    pub content_root: Option<String>,
    pub workers: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub verify_checksums: bool,
}

/// Effective settings after merging the config file with command-line flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub content_root: Utf8PathBuf,
    pub workers: Option<usize>,
    pub timeout: Option<Duration>,
    pub checksum_policy: ChecksumPolicy,
}

impl Settings {
    pub fn resolve(args: &SourceArgs) -> Result<Self, CliError> {
        let cfg = load_config(args.config_path.as_deref().map(Utf8Path::new))?;
        Self::merge(cfg, args)
    }

    /// Flags win over file values.
    fn merge(cfg: ServiceConfig, args: &SourceArgs) -> Result<Self, CliError> {
        let content_root = args
            .content_root
            .as_deref()
            .map(Utf8PathBuf::from)
            .or(cfg.content_root)
            .ok_or(CliError::MissingContentRoot)?;

        let verify = args.verify_checksums || cfg.verify_checksums;

        Ok(Self {
            content_root,
            workers: args.workers.or(cfg.workers),
            timeout: args
                .timeout_secs
                .or(cfg.load_timeout_secs)
                .map(Duration::from_secs),
            checksum_policy: if verify {
                ChecksumPolicy::Verify
            } else {
                ChecksumPolicy::Ignore
            },
        })
    }

    fn loader(&self) -> AssetLoader {
        let mut loader = AssetLoader::new(FsAssetSource::new(self.content_root.clone()));
        if let Some(workers) = self.workers {
            loader = loader.with_workers(workers);
        }
        if let Some(timeout) = self.timeout {
            loader = loader.with_timeout(timeout);
        }
        loader
    }
}

/// A published cache plus what the load reported.
pub struct LoadedBundles {
    pub service: AssetService,
    /// One entry per platform, in catalog order.
    pub stats: Vec<PlatformStats>,
    pub load_time: Duration,
}

/// Load `catalog` from the configured content root and publish it.
pub fn load_service(
    settings: &Settings,
    catalog: &PlatformCatalog,
) -> Result<LoadedBundles, CliError> {
    publish(settings, settings.loader(), catalog)
}

/// Same as [`load_service`], reporting each finished platform to `progress`.
pub fn load_service_with_progress<F>(
    settings: &Settings,
    catalog: &PlatformCatalog,
    progress: F,
) -> Result<LoadedBundles, CliError>
where
    F: Fn(LoadProgress) + Send + Sync + 'static,
{
    publish(settings, settings.loader().with_progress(progress), catalog)
}

fn publish(
    settings: &Settings,
    loader: AssetLoader,
    catalog: &PlatformCatalog,
) -> Result<LoadedBundles, CliError> {
    let report = loader.load_all(catalog).map_err(CliError::load_failed)?;

    let slot = AssetSlot::new();
    slot.publish(report.cache).map_err(CliError::load_failed)?;
    let service = slot
        .service()
        .map_err(CliError::load_failed)?
        .with_checksum_policy(settings.checksum_policy);

    Ok(LoadedBundles {
        service,
        stats: report.stats,
        load_time: report.load_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use launcher_assets::{PlatformDescriptor, PlatformId};
    use std::fs;

    #[test]
    fn flags_override_config() {
        let cfg = ServiceConfig {
            content_root: Some(Utf8PathBuf::from("/from/config")),
            workers: Some(2),
            load_timeout_secs: Some(30),
            verify_checksums: false,
        };
        let args = SourceArgs {
            content_root: Some("/from/flag".to_string()),
            workers: Some(6),
            ..Default::default()
        };

        let settings = Settings::merge(cfg, &args).unwrap();
        assert_eq!(settings.content_root, "/from/flag");
        assert_eq!(settings.workers, Some(6));
        assert_eq!(settings.timeout, Some(Duration::from_secs(30)));
        assert_eq!(settings.checksum_policy, ChecksumPolicy::Ignore);
    }

    #[test]
    fn config_fills_missing_flags() {
        let cfg = ServiceConfig {
            content_root: Some(Utf8PathBuf::from("/srv/clients")),
            verify_checksums: true,
            ..Default::default()
        };

        let settings = Settings::merge(cfg, &SourceArgs::default()).unwrap();
        assert_eq!(settings.content_root, "/srv/clients");
        assert_eq!(settings.workers, None);
        assert_eq!(settings.timeout, None);
        assert_eq!(settings.checksum_policy, ChecksumPolicy::Verify);
    }

    #[test]
    fn content_root_is_required() {
        let result = Settings::merge(ServiceConfig::default(), &SourceArgs::default());
        assert!(matches!(result, Err(CliError::MissingContentRoot)));
    }

    fn linux_tree() -> (tempfile::TempDir, Settings) {
        let dir = tempfile::tempdir().unwrap();
        let linux = dir.path().join("nxt/client/linux");
        fs::create_dir_all(&linux).unwrap();
        fs::write(linux.join("jav_config.ws"), b"title=Linux\n").unwrap();
        fs::write(linux.join("librs2client.so"), b"\x7fELF".repeat(256)).unwrap();

        let settings = Settings {
            content_root: Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap(),
            workers: Some(2),
            timeout: None,
            checksum_policy: ChecksumPolicy::Verify,
        };
        (dir, settings)
    }

    #[test]
    fn load_service_publishes_requested_platforms() {
        let (_dir, settings) = linux_tree();
        let catalog = PlatformCatalog::default().subset(&[PlatformId::Linux]);

        let loaded = load_service(&settings, &catalog).unwrap();
        assert_eq!(loaded.service.cache().platforms(), vec![PlatformId::Linux]);
        assert_eq!(loaded.service.checksum_policy(), ChecksumPolicy::Verify);
        assert_eq!(loaded.service.config(PlatformId::Linux), b"title=Linux\n");
        assert_eq!(loaded.stats.len(), 1);
        assert_eq!(loaded.stats[0].platform, PlatformId::Linux);
        assert_eq!(loaded.stats[0].raw_bytes, 4 * 256);
    }

    #[test]
    fn load_service_reports_progress() {
        let (_dir, settings) = linux_tree();
        let catalog = PlatformCatalog::new(vec![
            PlatformDescriptor::new(PlatformId::Linux, "nxt/client/linux")
                .with_primary("librs2client.so"),
        ])
        .unwrap();

        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();
        let loaded = load_service_with_progress(&settings, &catalog, move |progress| {
            sink.lock().unwrap().push(progress.platform);
        })
        .unwrap();

        assert_eq!(loaded.service.cache().len(), 1);
        assert!(seen.lock().unwrap().contains(&Some(PlatformId::Linux)));
    }

    #[test]
    fn load_service_fails_on_missing_files() {
        let (_dir, settings) = linux_tree();
        let catalog = PlatformCatalog::default().subset(&[PlatformId::Macintosh]);

        let result = load_service(&settings, &catalog);
        assert!(matches!(result, Err(CliError::LoadFailed { .. })));
    }
}
