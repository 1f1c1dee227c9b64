//! ToolInstaller - コンパイラプラグインが無ければ取得・ビルドする

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use super::Task;
use crate::app::Context;
use crate::config::{GenConfig, ResolvedEnv};
use crate::domain::{CommandSpec, GenError, StaleReason, Staleness, TaskName};

pub const INSTALL_TASK: &str = "install-plugin";

/// Installs the plugin binary with a package-fetch command when it is absent.
pub struct ToolInstaller {
    name: TaskName,
    binary: PathBuf,
    fetch_program: String,
    fetch_args: Vec<String>,
    package_ref: String,
}

impl ToolInstaller {
    pub fn new(
        binary: impl Into<PathBuf>,
        fetch_program: impl Into<String>,
        package_ref: impl Into<String>,
    ) -> Self {
        Self {
            name: TaskName::new(INSTALL_TASK),
            binary: binary.into(),
            fetch_program: fetch_program.into(),
            fetch_args: Vec::new(),
            package_ref: package_ref.into(),
        }
    }

    pub fn from_config(config: &GenConfig, env: &ResolvedEnv) -> Self {
        Self::new(
            env.plugin_path(&config.plugin.binary),
            config.plugin.fetch_program.clone(),
            config.plugin.package_ref.clone(),
        )
        .with_fetch_args(config.plugin.fetch_args.clone())
    }

    /// Arguments placed between the fetch program and the package reference.
    pub fn with_fetch_args(mut self, args: Vec<String>) -> Self {
        self.fetch_args = args;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn fetch_command(&self) -> CommandSpec {
        CommandSpec::new(self.fetch_program.clone())
            .args(&self.fetch_args)
            .arg(&self.package_ref)
    }
}

#[async_trait]
impl Task for ToolInstaller {
    fn name(&self) -> &TaskName {
        &self.name
    }

    async fn check(&self, _ctx: &Context) -> Result<Staleness, GenError> {
        let present = tokio::fs::try_exists(&self.binary)
            .await
            .map_err(|e| GenError::io(&self.binary, e))?;
        if present {
            Ok(Staleness::Fresh)
        } else {
            Ok(Staleness::Stale(vec![StaleReason::MissingFile(
                self.binary.clone(),
            )]))
        }
    }

    async fn run(&self, ctx: &Context) -> Result<(), GenError> {
        info!(package = %self.package_ref, binary = %self.binary.display(), "installing plugin");
        ctx.runner().run(&self.fetch_command()).await
    }
}
