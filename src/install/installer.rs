//! Install pipeline
//!
//! Artifacts are processed one at a time. Each one is downloaded to a
//! uniquely named temp archive, unpacked into a staging directory next to
//! it and promoted into its cache slot in one step. Temp files are owned by
//! [`Scratch`] guards so every exit path removes them.

use crate::artifact::{
    derive_location, enumerate_keys, AbiSet, ArchTable, ArtifactKey, ArtifactLocation,
    ArtifactSpec, Platform,
};
use crate::cache::{promote, unique_suffix, CacheLayout, Scratch, VersionManifest};
use crate::config::Config;
use crate::error::{StcError, StcResult};
use crate::extract::{Extractor, TarExtractor};
use crate::fetch::{CurlFetcher, Fetcher, PowerShellFetcher, SystemFetcher};
use crate::install::report::{
    InstallEvent, InstallOutcome, InstallResult, InstallSummary, KeyOutcome,
};
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info, warn};

/// Everything the pipeline needs to know about what to install and where
#[derive(Debug, Clone)]
pub struct InstallSettings {
    pub spec: ArtifactSpec,
    pub abis: AbiSet,
    /// Binding file name inside `build/Release`
    pub binding: String,
    pub layout: CacheLayout,
    /// Where archives are downloaded and staged
    pub temp_dir: PathBuf,
    /// Ignore the manifest and existing slots
    pub force: bool,
}

impl InstallSettings {
    /// Resolve settings from configuration
    pub fn from_config(config: &Config) -> StcResult<Self> {
        let layout = CacheLayout::resolve(config.cache.root.as_deref())?;
        let temp_dir = config
            .cache
            .temp_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);

        Ok(Self {
            spec: config.artifact_spec(),
            abis: config.abi_set(),
            binding: config.artifact.binding.clone(),
            layout,
            temp_dir,
            force: false,
        })
    }
}

/// Installs every artifact for the current platform into the cache
pub struct Installer {
    settings: InstallSettings,
    platform: Platform,
    archs: ArchTable,
    fetcher: Box<dyn Fetcher>,
    extractor: Box<dyn Extractor>,
}

impl Installer {
    pub fn new(
        settings: InstallSettings,
        platform: Platform,
        archs: ArchTable,
        fetcher: Box<dyn Fetcher>,
        extractor: Box<dyn Extractor>,
    ) -> Self {
        Self {
            settings,
            platform,
            archs,
            fetcher,
            extractor,
        }
    }

    /// Build an installer wired to the system download and extract tools
    pub fn from_config(config: &Config, platform: Platform) -> StcResult<Self> {
        let settings = InstallSettings::from_config(config)?;
        let fetch = &config.fetch;

        let curl = CurlFetcher::new(
            fetch.curl.clone(),
            Duration::from_secs(fetch.connect_timeout_secs),
            Duration::from_secs(fetch.max_time_secs),
        );
        let powershell =
            PowerShellFetcher::new(fetch.powershell.clone(), Duration::from_secs(fetch.max_time_secs));
        let fetcher = SystemFetcher::for_platform(platform, Box::new(curl), Box::new(powershell));

        Ok(Self::new(
            settings,
            platform,
            ArchTable::builtin(),
            Box::new(fetcher),
            Box::new(TarExtractor::new(config.extract.tar.clone())),
        ))
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.settings.force = force;
        self
    }

    pub fn settings(&self) -> &InstallSettings {
        &self.settings
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn manifest(&self) -> VersionManifest {
        VersionManifest::new(self.settings.layout.manifest_path())
    }

    /// Every artifact this platform needs, with its derived location
    pub fn plan(&self) -> Vec<(ArtifactKey, ArtifactLocation)> {
        let archs = self.archs.architectures_for(self.platform);
        enumerate_keys(&self.settings.abis, &archs)
            .into_iter()
            .map(|key| (key, self.location(&key)))
            .collect()
    }

    pub fn location(&self, key: &ArtifactKey) -> ArtifactLocation {
        derive_location(&self.settings.spec, key.abi, self.platform, key.arch)
    }

    /// A slot counts as installed when its binding file exists
    pub fn is_cached(&self, location: &ArtifactLocation) -> bool {
        self.settings
            .layout
            .binding_path(&location.cache_name, &self.settings.binding)
            .is_file()
    }

    /// Run the install
    ///
    /// Never fails as a whole: per-artifact errors are recorded in the
    /// summary and processing moves on to the next artifact.
    pub async fn install(
        &self,
        on_event: &mut (dyn FnMut(InstallEvent<'_>) + Send),
    ) -> InstallOutcome {
        let target = self.settings.spec.binaries_version.as_str();
        let manifest = self.manifest();
        let previous = manifest.read().await;

        if !self.settings.force && previous.as_deref() == Some(target) {
            debug!("Manifest at {} records {}", manifest.path().display(), target);
            on_event(InstallEvent::UpToDate { version: target });
            return InstallOutcome::UpToDate {
                version: target.to_string(),
            };
        }

        // Slots from another artifact-set version can't be trusted as cache hits
        let upgrading = matches!(previous.as_deref(), Some(v) if v != target);
        if let Some(from) = previous.as_deref().filter(|_| upgrading) {
            info!("Upgrading binaries from {} to {}", from, target);
            on_event(InstallEvent::Upgrading { from, to: target });
        }
        let reuse_slots = !upgrading && !self.settings.force;

        let archs = self.archs.architectures_for(self.platform);
        on_event(InstallEvent::Started {
            platform: self.platform,
            archs: &archs,
        });

        let keys = enumerate_keys(&self.settings.abis, &archs);
        let total = keys.len();
        let mut results = Vec::with_capacity(total);

        for (index, key) in keys.into_iter().enumerate() {
            let location = self.location(&key);
            on_event(InstallEvent::KeyStarted {
                key: &key,
                location: &location,
                index,
                total,
            });

            let result = if reuse_slots && self.is_cached(&location) {
                debug!("{} already cached", location.cache_name);
                InstallResult::AlreadyCached
            } else {
                match self.install_one(&key, &location).await {
                    Ok(()) => {
                        info!("Installed {}", location.cache_name);
                        InstallResult::Installed
                    }
                    Err(e) => {
                        info!("{} failed: {}", location.cache_name, e);
                        InstallResult::failed(e)
                    }
                }
            };

            on_event(InstallEvent::KeyFinished {
                key: &key,
                location: &location,
                result: &result,
            });
            results.push(KeyOutcome {
                key,
                location,
                result,
            });
        }

        let mut summary = InstallSummary {
            platform: self.platform,
            target_version: target.to_string(),
            previous_version: previous,
            results,
            manifest_written: false,
        };

        if summary.any_usable() {
            match manifest.write(target).await {
                Ok(()) => summary.manifest_written = true,
                Err(e) => warn!("Could not record binaries version: {}", e),
            }
        } else {
            info!("No binaries available for {}", self.platform);
        }

        InstallOutcome::Completed(summary)
    }

    /// Fetch, extract and promote one artifact
    async fn install_one(&self, key: &ArtifactKey, location: &ArtifactLocation) -> StcResult<()> {
        let settings = &self.settings;
        let stem = format!(
            "{}-{}-{}-{}",
            settings.spec.package,
            key.abi,
            key.arch,
            unique_suffix()
        );

        fs::create_dir_all(&settings.temp_dir).await.map_err(|e| {
            StcError::io(
                format!("creating temp directory {}", settings.temp_dir.display()),
                e,
            )
        })?;

        let archive = Scratch::new(settings.temp_dir.join(format!("{}.tar.gz", stem)));
        debug!("Downloading {} to {}", location.url, archive.path().display());
        self.fetcher.fetch(&location.url, archive.path()).await?;

        let staging = Scratch::new(settings.temp_dir.join(format!("{}.staging", stem)));
        fs::create_dir_all(staging.path()).await.map_err(|e| {
            StcError::io(
                format!("creating staging directory {}", staging.path().display()),
                e,
            )
        })?;
        self.extractor.extract(archive.path(), staging.path()).await?;

        let binding = staging
            .path()
            .join("build")
            .join("Release")
            .join(&settings.binding);
        if !binding.is_file() {
            return Err(StcError::Extract {
                archive: archive.path().to_path_buf(),
                code: None,
                stderr: format!("archive has no build/Release/{}", settings.binding),
            });
        }
        drop(archive);

        promote(staging.path(), &settings.layout.slot_dir(&location.cache_name)).await
    }
}
