//! Configuration.
//!
//! Every field has a default, so an empty config (or no file at all)
//! reproduces the stock setup: install `protoc-gen-go` into `$GOPATH/bin`
//! and regenerate the `messages` Go package from the four schemas in
//! `protob/`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("failed to read config {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenConfig {
    /// Environment variable naming the root directory the plugin is installed under.
    pub root_env: String,

    pub plugin: PluginConfig,

    pub compiler: CompilerConfig,

    /// Sidecar file holding the baseline input hashes.
    pub hash_store: PathBuf,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            root_env: "GOPATH".to_string(),
            plugin: PluginConfig::default(),
            compiler: CompilerConfig::default(),
            hash_store: PathBuf::from(".protoregen-hashes.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginConfig {
    /// Binary name looked up in `<root>/bin`.
    pub binary: String,

    pub fetch_program: String,

    pub fetch_args: Vec<String>,

    pub package_ref: String,

    /// Language tag used to form `--<lang>_out` / `--<lang>_opt`.
    pub lang: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            binary: "protoc-gen-go".to_string(),
            fetch_program: "go".to_string(),
            fetch_args: vec!["get".to_string(), "-u".to_string()],
            package_ref: "github.com/golang/protobuf/protoc-gen-go".to_string(),
            lang: "go".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    pub program: String,
    pub out_dir: PathBuf,
    pub import_path: String,
    pub system_include: PathBuf,
    pub schema_dir: PathBuf,

    /// Schema file names inside `schema_dir`.
    pub schemas: Vec<String>,

    /// File names the compiler is expected to leave in `out_dir`.
    pub outputs: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        let stems = ["messages", "types", "config", "storage"];
        Self {
            program: "protoc".to_string(),
            out_dir: PathBuf::from("messages"),
            import_path: "messages".to_string(),
            system_include: PathBuf::from("/usr/include"),
            schema_dir: PathBuf::from("protob"),
            schemas: stems.iter().map(|s| format!("{s}.proto")).collect(),
            outputs: stems.iter().map(|s| format!("{s}.pb.go")).collect(),
        }
    }
}

impl CompilerConfig {
    /// Schema paths as passed to the compiler.
    pub fn schema_paths(&self) -> Vec<PathBuf> {
        self.schemas
            .iter()
            .map(|s| self.schema_dir.join(s))
            .collect()
    }

    pub fn output_paths(&self) -> Vec<PathBuf> {
        self.outputs.iter().map(|o| self.out_dir.join(o)).collect()
    }
}

impl GenConfig {
    /// Loads `path` if given, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("root_env", self.root_env.as_str()),
            ("plugin.binary", self.plugin.binary.as_str()),
            ("plugin.fetch_program", self.plugin.fetch_program.as_str()),
            ("plugin.package_ref", self.plugin.package_ref.as_str()),
            ("plugin.lang", self.plugin.lang.as_str()),
            ("compiler.program", self.compiler.program.as_str()),
            ("compiler.import_path", self.compiler.import_path.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    field.to_string(),
                    "must not be empty".to_string(),
                ));
            }
        }
        if self.compiler.schemas.is_empty() {
            return Err(ConfigError::InvalidValue(
                "compiler.schemas".to_string(),
                "at least one schema is required".to_string(),
            ));
        }
        if self.compiler.outputs.is_empty() {
            return Err(ConfigError::InvalidValue(
                "compiler.outputs".to_string(),
                "at least one output is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Values taken from the process environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEnv {
    /// Root directory named by `root_env`.
    pub root: PathBuf,

    /// Inherited executable search path.
    pub search_path: Option<OsString>,
}

impl ResolvedEnv {
    pub fn from_process(config: &GenConfig) -> Result<Self, ConfigError> {
        Self::from_lookup(config, |key| std::env::var_os(key))
    }

    pub fn from_lookup(
        config: &GenConfig,
        lookup: impl Fn(&str) -> Option<OsString>,
    ) -> Result<Self, ConfigError> {
        let root = lookup(&config.root_env)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| ConfigError::MissingEnvVar(config.root_env.clone()))?;
        Ok(Self {
            root,
            search_path: lookup("PATH"),
        })
    }

    /// Directory the fetch command installs binaries into.
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    pub fn plugin_path(&self, binary: &str) -> PathBuf {
        self.bin_dir().join(binary)
    }
}
