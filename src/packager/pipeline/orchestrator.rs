//! Sequential stage machine behind a packaging run.

use crate::packager::{
    archive::{self, PackageArtifact},
    build_info::BuildInfoStore,
    error::Result,
    platform::{BuildConfiguration, BuildContext, PlatformTarget},
    settings::Settings,
    timestamp::Timestamp,
    tool::{ToolCommand, ToolRunner},
    utils::fs,
};
use std::fmt;

/// Position of a [`Pipeline`] in its run.
///
/// Stages only move forward; a failed run stays at the last stage it reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    StagingCleared,
    Provisioned,
    /// Native project generated; `None` for multi-configuration generators.
    Configured(Option<BuildConfiguration>),
    Built(BuildConfiguration),
    Installed,
    InfoStamped,
    Archived,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::StagingCleared => f.write_str("staging cleared"),
            Self::Provisioned => f.write_str("provisioned"),
            Self::Configured(Some(configuration)) => write!(f, "configured ({configuration})"),
            Self::Configured(None) => f.write_str("configured"),
            Self::Built(configuration) => write!(f, "built ({configuration})"),
            Self::Installed => f.write_str("installed"),
            Self::InfoStamped => f.write_str("build info stamped"),
            Self::Archived => f.write_str("archived"),
            Self::Done => f.write_str("done"),
        }
    }
}

/// Drives one packaging run for a platform.
///
/// Every external step goes through the injected [`ToolRunner`], awaited in
/// order. There are no retries: the first failure ends the run.
pub struct Pipeline<'a, R> {
    settings: &'a Settings,
    runner: &'a R,
    platform: PlatformTarget,
    stage: Stage,
}

impl<R> fmt::Debug for Pipeline<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("settings", self.settings)
            .field("platform", &self.platform)
            .field("stage", &self.stage)
            .finish()
    }
}

impl<'a, R: ToolRunner> Pipeline<'a, R> {
    pub fn new(settings: &'a Settings, runner: &'a R, platform: PlatformTarget) -> Self {
        Self {
            settings,
            runner,
            platform,
            stage: Stage::Idle,
        }
    }

    /// Current stage; after a failed [`Pipeline::run`] this is where it halted.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Runs every stage and returns the produced artifact.
    ///
    /// `timestamp` names the artifact and is baked into the build, so it is
    /// taken once by the caller for the whole run.
    pub async fn run(&mut self, timestamp: Timestamp) -> Result<PackageArtifact> {
        self.stage = Stage::Idle;
        log::info!(
            "Packaging {} for {} ({})",
            self.settings.product_name(),
            self.platform,
            timestamp
        );

        match self.execute(&timestamp).await {
            Ok(artifact) => Ok(artifact),
            Err(e) => {
                log::error!("Packaging halted at stage '{}': {}", self.stage, e);
                Err(e)
            }
        }
    }

    async fn execute(&mut self, timestamp: &Timestamp) -> Result<PackageArtifact> {
        let settings = self.settings;
        let options = settings.options();
        let store = BuildInfoStore::new(
            settings.build_info_path(),
            settings.packaged_build_info_path(),
        );

        let info = store.load().await?;
        if options.clean {
            clean_previous_builds(settings, self.platform).await?;
        }

        fs::create_dir_all(&settings.staging_path(), true).await?;
        self.advance(Stage::StagingCleared);

        if options.provision {
            self.platform.provision(settings, self.runner).await?;
            self.advance(Stage::Provisioned);
        } else {
            log::info!("Skipping dependency provisioning");
        }

        store.increment_and_persist(info).await?;
        let revision = self.git_revision().await?;

        let ctx = BuildContext {
            settings,
            runner: self.runner,
            timestamp,
            revision: &revision,
        };
        self.build_all(&ctx).await?;
        self.platform.finish_install(settings).await?;
        self.advance(Stage::Installed);

        // Commit point: name and stamp from what is on disk now.
        let committed = store.load().await?;
        store.stamp(&committed, &revision, timestamp).await?;
        self.advance(Stage::InfoStamped);

        let artifact = archive::archive(
            settings,
            self.runner,
            self.platform,
            &committed,
            timestamp,
            options.zip,
        )
        .await?;
        self.advance(Stage::Archived);
        self.advance(Stage::Done);

        Ok(artifact)
    }

    /// Configures and builds every configuration into the staging tree.
    async fn build_all(&mut self, ctx: &BuildContext<'_, R>) -> Result<()> {
        let configurations = self.settings.configurations();

        if self.platform.is_multi_config() {
            self.platform.configure(ctx, None).await?;
            self.advance(Stage::Configured(None));
            for &configuration in configurations {
                self.platform.build_and_install(ctx, configuration).await?;
                self.advance(Stage::Built(configuration));
            }
        } else {
            for &configuration in configurations {
                self.platform.configure(ctx, Some(configuration)).await?;
                self.advance(Stage::Configured(Some(configuration)));
                self.platform.build_and_install(ctx, configuration).await?;
                self.advance(Stage::Built(configuration));
            }
        }

        Ok(())
    }

    /// Current commit of the source tree.
    async fn git_revision(&self) -> Result<String> {
        let output = self
            .runner
            .run(
                &ToolCommand::new("git")
                    .args(["rev-parse", "HEAD"])
                    .current_dir(self.settings.root())
                    .capture_output(),
            )
            .await?;
        let revision = output.stdout.trim().to_string();
        log::debug!("Source revision: {}", revision);
        Ok(revision)
    }

    fn advance(&mut self, next: Stage) {
        log::info!("Stage: {} -> {}", self.stage, next);
        self.stage = next;
    }
}

/// Removes the build directories of every configuration and the extra
/// output directories. Directories that do not exist are skipped.
pub async fn clean_previous_builds(settings: &Settings, platform: PlatformTarget) -> Result<()> {
    for path in settings.clean_paths(platform) {
        if fs::remove_dir_all(&path).await? {
            log::info!("Removed {}", path.display());
        } else {
            log::debug!("Nothing to clean at {}", path.display());
        }
    }
    Ok(())
}
