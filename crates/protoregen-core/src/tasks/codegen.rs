//! CodegenRunner - スキーマが変わったか出力が欠けていれば protoc を走らせる

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use super::Task;
use crate::app::Context;
use crate::config::{CompilerConfig, GenConfig, ResolvedEnv};
use crate::domain::{CommandSpec, ContentHash, GenError, StaleReason, Staleness, TaskName};

pub const CODEGEN_TASK: &str = "codegen";

/// Regenerates bindings when any output is missing or any schema changed.
///
/// The compiler is called as
/// `protoc --go_out=<out> --go_opt=import_path=<label> -I<system> -I<schemas> <inputs...>`
/// with the plugin directory appended to `PATH`.
pub struct CodegenRunner {
    name: TaskName,
    compiler: String,
    lang: String,
    out_dir: PathBuf,
    import_path: String,
    system_include: PathBuf,
    schema_dir: PathBuf,
    inputs: Vec<PathBuf>,
    outputs: Vec<PathBuf>,
    search_path: OsString,
}

impl CodegenRunner {
    pub fn new(
        compiler: &CompilerConfig,
        lang: impl Into<String>,
        search_path: OsString,
    ) -> Self {
        Self {
            name: TaskName::new(CODEGEN_TASK),
            compiler: compiler.program.clone(),
            lang: lang.into(),
            out_dir: compiler.out_dir.clone(),
            import_path: compiler.import_path.clone(),
            system_include: compiler.system_include.clone(),
            schema_dir: compiler.schema_dir.clone(),
            inputs: compiler.schema_paths(),
            outputs: compiler.output_paths(),
            search_path,
        }
    }

    pub fn from_config(config: &GenConfig, env: &ResolvedEnv) -> Result<Self, GenError> {
        let search_path = extend_search_path(env.search_path.as_deref(), &env.bin_dir())?;
        Ok(Self::new(
            &config.compiler,
            config.plugin.lang.clone(),
            search_path,
        ))
    }

    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[PathBuf] {
        &self.outputs
    }

    pub fn compile_command(&self) -> CommandSpec {
        CommandSpec::new(self.compiler.clone())
            .arg(flag(&format!("--{}_out=", self.lang), &self.out_dir))
            .arg(format!("--{}_opt=import_path={}", self.lang, self.import_path))
            .arg(flag("-I", &self.system_include))
            .arg(flag("-I", &self.schema_dir))
            .args(&self.inputs)
            .env("PATH", &self.search_path)
    }

    async fn hash_inputs(&self) -> Result<Vec<(PathBuf, ContentHash)>, GenError> {
        let mut hashes = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            hashes.push((input.clone(), ContentHash::of_file(input).await?));
        }
        Ok(hashes)
    }
}

#[async_trait]
impl Task for CodegenRunner {
    fn name(&self) -> &TaskName {
        &self.name
    }

    async fn check(&self, ctx: &Context) -> Result<Staleness, GenError> {
        let mut reasons = Vec::new();

        for output in &self.outputs {
            let present = tokio::fs::try_exists(output)
                .await
                .map_err(|e| GenError::io(output, e))?;
            if !present {
                reasons.push(StaleReason::MissingFile(output.clone()));
            }
        }

        for (input, hash) in self.hash_inputs().await? {
            match ctx.hashes().baseline(&input).await {
                None => reasons.push(StaleReason::NoBaseline(input)),
                Some(baseline) if baseline != hash => {
                    reasons.push(StaleReason::InputChanged(input))
                }
                Some(_) => {}
            }
        }

        for reason in &reasons {
            debug!(task = %self.name, %reason, "stale");
        }
        Ok(Staleness::from_reasons(reasons))
    }

    async fn run(&self, ctx: &Context) -> Result<(), GenError> {
        // Hash before compiling: an edit made while the compiler runs must
        // still look changed next time.
        let hashes = self.hash_inputs().await?;

        tokio::fs::create_dir_all(&self.out_dir)
            .await
            .map_err(|e| GenError::io(&self.out_dir, e))?;

        info!(
            compiler = %self.compiler,
            inputs = self.inputs.len(),
            out_dir = %self.out_dir.display(),
            "regenerating bindings"
        );
        ctx.runner().run(&self.compile_command()).await?;

        ctx.hashes().record(hashes).await
    }
}

/// Appends `dir` to an inherited search path, dropping empty entries.
pub fn extend_search_path(existing: Option<&OsStr>, dir: &Path) -> Result<OsString, GenError> {
    let mut dirs: Vec<PathBuf> = existing
        .map(|p| {
            std::env::split_paths(p)
                .filter(|d| !d.as_os_str().is_empty())
                .collect()
        })
        .unwrap_or_default();
    dirs.push(dir.to_path_buf());
    std::env::join_paths(dirs).map_err(|_| GenError::SearchPath(dir.to_path_buf()))
}

fn flag(prefix: &str, path: &Path) -> OsString {
    let mut f = OsString::from(prefix);
    f.push(path.as_os_str());
    f
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rstest::rstest;
    use tempfile::TempDir;

    use crate::impls::{InMemoryHashStore, RecordingRunner};

    struct Fixture {
        _dir: TempDir,
        config: CompilerConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let config = CompilerConfig {
                out_dir: dir.path().join("messages"),
                system_include: dir.path().join("include"),
                schema_dir: dir.path().join("protob"),
                ..CompilerConfig::default()
            };

            std::fs::create_dir_all(&config.schema_dir).unwrap();
            for schema in config.schema_paths() {
                std::fs::write(&schema, format!("// {}\n", schema.display())).unwrap();
            }
            Self { _dir: dir, config }
        }

        fn write_outputs(&self) {
            std::fs::create_dir_all(&self.config.out_dir).unwrap();
            for output in self.config.output_paths() {
                std::fs::write(output, "package messages\n").unwrap();
            }
        }

        fn task(&self) -> CodegenRunner {
            CodegenRunner::new(&self.config, "go", OsString::from("/usr/bin:/opt/go/bin"))
        }

        /// Baseline equal to the current schema contents.
        fn current_baseline(&self) -> InMemoryHashStore {
            InMemoryHashStore::with_entries(self.config.schema_paths().into_iter().map(|p| {
                let bytes = std::fs::read(&p).unwrap();
                (p, ContentHash::of_bytes(&bytes))
            }))
        }
    }

    fn context(
        runner: &Arc<RecordingRunner>,
        hashes: InMemoryHashStore,
    ) -> (Context, Arc<InMemoryHashStore>) {
        let hashes = Arc::new(hashes);
        (Context::new(runner.clone(), hashes.clone()), hashes)
    }

    #[tokio::test]
    async fn outputs_present_and_hashes_unchanged_is_fresh() {
        let fx = Fixture::new();
        fx.write_outputs();
        let runner = Arc::new(RecordingRunner::new());
        let (ctx, _) = context(&runner, fx.current_baseline());

        assert_eq!(fx.task().check(&ctx).await.unwrap(), Staleness::Fresh);
        assert!(runner.calls().await.is_empty());
    }

    #[rstest]
    #[case::first(0)]
    #[case::last(3)]
    #[tokio::test]
    async fn one_missing_output_is_stale_regardless_of_hashes(#[case] missing: usize) {
        let fx = Fixture::new();
        fx.write_outputs();
        let gone = fx.config.output_paths()[missing].clone();
        std::fs::remove_file(&gone).unwrap();
        let runner = Arc::new(RecordingRunner::new());
        let (ctx, _) = context(&runner, fx.current_baseline());

        assert_eq!(
            fx.task().check(&ctx).await.unwrap(),
            Staleness::Stale(vec![StaleReason::MissingFile(gone)])
        );
    }

    #[tokio::test]
    async fn changed_schema_is_stale_with_outputs_present() {
        let fx = Fixture::new();
        fx.write_outputs();
        let runner = Arc::new(RecordingRunner::new());
        let (ctx, _) = context(&runner, fx.current_baseline());

        let edited = fx.config.schema_paths()[1].clone();
        std::fs::write(&edited, "message Changed {}\n").unwrap();

        assert_eq!(
            fx.task().check(&ctx).await.unwrap(),
            Staleness::Stale(vec![StaleReason::InputChanged(edited)])
        );
    }

    #[tokio::test]
    async fn unrecorded_schemas_are_stale() {
        let fx = Fixture::new();
        fx.write_outputs();
        let runner = Arc::new(RecordingRunner::new());
        let (ctx, _) = context(&runner, InMemoryHashStore::new());

        let staleness = fx.task().check(&ctx).await.unwrap();
        assert_eq!(staleness.reasons().len(), 4);
        assert!(
            staleness
                .reasons()
                .iter()
                .all(|r| matches!(r, StaleReason::NoBaseline(_)))
        );
    }

    #[cfg(unix)]
    #[test]
    fn compile_command_shape() {
        let fx = Fixture::new();
        let cmd = fx.task().compile_command();
        let args: Vec<String> = cmd
            .get_args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(cmd.program(), "protoc");
        assert_eq!(
            args[0],
            format!("--go_out={}", fx.config.out_dir.display())
        );
        assert_eq!(args[1], "--go_opt=import_path=messages");
        assert_eq!(args.iter().filter(|a| a.starts_with("-I")).count(), 2);
        assert_eq!(
            args[2],
            format!("-I{}", fx.config.system_include.display())
        );
        assert_eq!(args[3], format!("-I{}", fx.config.schema_dir.display()));
        let inputs: Vec<String> = fx
            .config
            .schema_paths()
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        assert_eq!(&args[4..], inputs.as_slice());
        assert_eq!(cmd.get_env("PATH"), Some(OsStr::new("/usr/bin:/opt/go/bin")));
    }

    #[tokio::test]
    async fn run_creates_out_dir_invokes_compiler_and_records_baseline() {
        let fx = Fixture::new();
        let runner = Arc::new(RecordingRunner::new());
        let (ctx, hashes) = context(&runner, InMemoryHashStore::new());

        fx.task().run(&ctx).await.unwrap();

        assert!(fx.config.out_dir.is_dir());
        assert_eq!(runner.calls_to("protoc").await.len(), 1);
        let recorded = hashes.snapshot().await;
        assert_eq!(recorded.len(), 4);
        let schemas = fx.config.schema_paths();
        let first = &schemas[0];
        let expected = ContentHash::of_bytes(&std::fs::read(first).unwrap());
        assert_eq!(recorded.get(first), Some(&expected));
    }

    #[tokio::test]
    async fn failed_compile_keeps_previous_baseline() {
        let fx = Fixture::new();
        let runner = Arc::new(RecordingRunner::new().fail_program("protoc", 1));
        let (ctx, hashes) = context(&runner, InMemoryHashStore::new());

        let err = fx.task().run(&ctx).await.unwrap_err();

        assert!(matches!(err, GenError::CommandFailed { code: Some(1), .. }));
        assert!(hashes.snapshot().await.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn search_path_gets_plugin_dir_appended() {
        let joined = extend_search_path(
            Some(OsStr::new("/usr/local/bin:/usr/bin")),
            Path::new("/home/dev/go/bin"),
        )
        .unwrap();
        assert_eq!(joined, OsString::from("/usr/local/bin:/usr/bin:/home/dev/go/bin"));
    }

    #[cfg(unix)]
    #[test]
    fn search_path_without_inherited_value() {
        let joined = extend_search_path(None, Path::new("/home/dev/go/bin")).unwrap();
        assert_eq!(joined, OsString::from("/home/dev/go/bin"));

        let joined = extend_search_path(Some(OsStr::new("")), Path::new("/go/bin")).unwrap();
        assert_eq!(joined, OsString::from("/go/bin"));
    }

    #[cfg(unix)]
    #[test]
    fn search_path_rejects_separator_in_dir() {
        let err = extend_search_path(None, Path::new("/weird:dir/bin")).unwrap_err();
        assert!(matches!(err, GenError::SearchPath(_)));
    }
}
