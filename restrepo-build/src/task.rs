//! The generation task: configuration, orchestration, and the run summary.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GenerateError, WriteError};
use crate::generator::{render_module_index, write_if_changed, RepositorySpec};
use crate::report::{CargoReporter, Diagnostics, Reporter};
use crate::resolver::TypeUniverse;
use crate::scanner::{self, scan_entities, MARKER};

/// Configures and runs one repository generation pass.
///
/// Obtained from [`crate::generate_repositories`]. Every setting has a
/// build-script-friendly default except the base module, which names the
/// part of the host crate that holds the entities:
///
/// ```ignore
/// restrepo_build::generate_repositories()
///     .base_module("models")
///     .run()
///     .expect("repository generation failed");
/// ```
pub struct RepositoryGenerator {
    source_root: PathBuf,
    base_module: Option<String>,
    repository_module: Option<String>,
    out_dir: Option<PathBuf>,
    id_type: String,
    crate_name: String,
}

impl RepositoryGenerator {
    pub fn new() -> Self {
        Self {
            source_root: PathBuf::from("src"),
            base_module: None,
            repository_module: None,
            out_dir: None,
            id_type: "i64".to_string(),
            crate_name: "crate".to_string(),
        }
    }

    /// Root of the source tree to scan. Defaults to `src`, which is right
    /// for a build script running at the package root.
    pub fn source_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_root = path.into();
        self
    }

    /// Module whose directory holds the entities, as a `::`-separated path
    /// relative to the crate root. Required.
    pub fn base_module(mut self, module: impl Into<String>) -> Self {
        self.base_module = Some(module.into());
        self
    }

    /// Module the generated repositories belong to. Defaults to
    /// `{base_module}::repository`.
    pub fn repository_module(mut self, module: impl Into<String>) -> Self {
        self.repository_module = Some(module.into());
        self
    }

    /// Directory the artifacts are written under. Defaults to the `OUT_DIR`
    /// cargo hands to build scripts; outside a build script it must be set
    /// explicitly.
    pub fn out_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(path.into());
        self
    }

    /// Identifier type every generated repository is keyed by. Defaults to
    /// `i64`.
    pub fn id_type(mut self, id_type: impl Into<String>) -> Self {
        self.id_type = id_type.into();
        self
    }

    /// Path the entity references are anchored to in the generated source.
    /// Defaults to `crate`, which is right when the artifacts are spliced
    /// into the crate that declares the entities.
    pub fn crate_name(mut self, name: impl Into<String>) -> Self {
        self.crate_name = name.into();
        self
    }

    /// Run the generation pass, reporting through the build-script channel.
    pub fn run(self) -> Result<RunSummary, GenerateError> {
        self.run_with(&CargoReporter)
    }

    /// Run the generation pass, reporting through `reporter`.
    ///
    /// Fatal errors (bad configuration, an unwalkable source tree, a
    /// repository name collision) abort with `Err` before any artifact is
    /// written. Everything else is recoverable: it is reported as a warning,
    /// tallied in the [`RunSummary`], and the run continues.
    pub fn run_with(self, reporter: &dyn Reporter) -> Result<RunSummary, GenerateError> {
        let request = match self.into_request() {
            Ok(request) => request,
            Err(err) => {
                reporter.error(&err.to_string());
                return Err(err);
            }
        };

        let mut diagnostics = Diagnostics::new(reporter);
        match run_generation(&request, &mut diagnostics) {
            Ok(mut summary) => {
                summary.warnings = diagnostics.into_warnings();
                Ok(summary)
            }
            Err(err) => {
                diagnostics.error(&err.to_string());
                Err(err)
            }
        }
    }

    /// Validate the builder into an immutable request.
    fn into_request(self) -> Result<GenerationRequest, GenerateError> {
        let base_module = self
            .base_module
            .ok_or_else(|| GenerateError::config("base module is not set"))?;
        validate_module_path("base module", &base_module)?;

        let repository_module = self
            .repository_module
            .unwrap_or_else(|| format!("{base_module}::repository"));
        validate_module_path("repository module", &repository_module)?;

        let out_dir = match self.out_dir {
            Some(dir) => dir,
            None => env::var_os("OUT_DIR").map(PathBuf::from).ok_or_else(|| {
                GenerateError::config(
                    "no output directory: OUT_DIR is unset outside a build script, \
                     configure one with `out_dir`",
                )
            })?,
        };

        let id_type = syn::parse_str::<syn::Type>(&self.id_type).map_err(|err| {
            GenerateError::config(format!(
                "id type `{}` is not a valid Rust type: {err}",
                self.id_type
            ))
        })?;
        syn::parse_str::<syn::Path>(&self.crate_name).map_err(|err| {
            GenerateError::config(format!(
                "crate name `{}` is not a valid Rust path: {err}",
                self.crate_name
            ))
        })?;

        Ok(GenerationRequest {
            source_root: self.source_root,
            base_module,
            repository_module,
            out_dir,
            id_type,
            crate_name: self.crate_name,
        })
    }
}

impl Default for RepositoryGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// A validated, immutable configuration for one generation run.
#[derive(Clone)]
pub struct GenerationRequest {
    pub source_root: PathBuf,
    pub base_module: String,
    pub repository_module: String,
    pub out_dir: PathBuf,
    pub id_type: syn::Type,
    pub crate_name: String,
}

// `syn::Type` implements `Debug` only with syn's `extra-traits` feature, so
// the id type is left out of the rendering.
impl fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("source_root", &self.source_root)
            .field("base_module", &self.base_module)
            .field("repository_module", &self.repository_module)
            .field("out_dir", &self.out_dir)
            .field("crate_name", &self.crate_name)
            .finish_non_exhaustive()
    }
}

/// Outcome of one generation run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Entities discovered carrying the marker.
    pub entities_found: usize,
    /// Artifacts up to date on disk after the run, whether or not their
    /// bytes changed.
    pub artifacts_written: usize,
    /// Artifacts that could not be produced.
    pub artifacts_failed: usize,
    /// Leftover artifacts from earlier runs that were deleted.
    pub artifacts_removed: usize,
    /// Recoverable problems, in the order they were reported.
    pub warnings: Vec<String>,
}

fn run_generation(
    request: &GenerationRequest,
    diagnostics: &mut Diagnostics<'_>,
) -> Result<RunSummary, GenerateError> {
    let base_dir = scanner::module_dir(&request.source_root, &request.base_module);
    diagnostics.info(&format!(
        "scanning {} for `{MARKER}` entities",
        base_dir.display()
    ));

    let universe = TypeUniverse::new(&request.source_root);
    let entities =
        scan_entities(&request.source_root, &request.base_module, &universe, diagnostics)?;
    diagnostics.info(&format!("found {} `{MARKER}` entities", entities.len()));
    declare_build_inputs(&base_dir);

    let mut summary = RunSummary {
        entities_found: entities.len(),
        ..RunSummary::default()
    };

    let mut specs = Vec::with_capacity(entities.len());
    for descriptor in &entities {
        match RepositorySpec::new(descriptor, &request.crate_name, &request.id_type) {
            Ok(spec) => specs.push(spec),
            Err(err) => {
                diagnostics.warn(format!(
                    "skipping `{}`: entity path does not parse: {err}",
                    descriptor.fqn
                ));
                summary.artifacts_failed += 1;
            }
        }
    }
    detect_collisions(&specs)?;

    let repository_dir = scanner::module_dir(&request.out_dir, &request.repository_module);
    if let Err(err) = fs::create_dir_all(&repository_dir) {
        diagnostics.warn(format!(
            "failed to create {}: {err}",
            repository_dir.display()
        ));
        summary.artifacts_failed += specs.len();
        report_outcome(&summary, diagnostics);
        return Ok(summary);
    }

    for spec in &specs {
        match write_artifact(spec, &repository_dir) {
            Ok(true) => {
                diagnostics.info(&format!("generated repository `{}`", spec.name));
                summary.artifacts_written += 1;
            }
            Ok(false) => summary.artifacts_written += 1,
            Err(message) => {
                diagnostics.warn(message);
                summary.artifacts_failed += 1;
            }
        }
    }

    summary.artifacts_removed = remove_stale_artifacts(&repository_dir, &specs, diagnostics);

    // The index lists every planned artifact present on disk, including any
    // left over from an earlier run when this one failed to rewrite it.
    let available: Vec<String> = specs
        .iter()
        .map(|spec| spec.file_name.clone())
        .filter(|name| repository_dir.join(name).is_file())
        .collect();
    let index_path = repository_dir.join("mod.rs");
    if let Err(err) = write_if_changed(&index_path, &render_module_index(&available)) {
        diagnostics.warn(
            WriteError {
                path: index_path,
                source: err,
            }
            .to_string(),
        );
    }

    report_outcome(&summary, diagnostics);
    Ok(summary)
}

/// Reject runs in which two entities would produce the same artifact file.
///
/// Checked against the full planned set before the first write, so a
/// colliding run leaves the output directory untouched.
fn detect_collisions(specs: &[RepositorySpec]) -> Result<(), GenerateError> {
    let mut owners: HashMap<&str, &str> = HashMap::new();
    for spec in specs {
        if let Some(first) = owners.insert(&spec.file_name, &spec.entity_fqn) {
            return Err(GenerateError::NameCollision {
                target: spec.file_name.clone(),
                first: first.to_string(),
                second: spec.entity_fqn.clone(),
            });
        }
    }
    Ok(())
}

fn write_artifact(spec: &RepositorySpec, repository_dir: &Path) -> Result<bool, String> {
    let source = spec
        .render()
        .map_err(|err| format!("failed to render `{}`: {err}", spec.name))?;
    let path = repository_dir.join(&spec.file_name);
    write_if_changed(&path, &source).map_err(|source| {
        WriteError {
            path: path.clone(),
            source,
        }
        .to_string()
    })
}

/// Delete `.rs` files in the repository directory that this run did not
/// plan. The output directory persists across builds, so a renamed or
/// unmarked entity would otherwise leave its old repository behind.
fn remove_stale_artifacts(
    repository_dir: &Path,
    specs: &[RepositorySpec],
    diagnostics: &mut Diagnostics<'_>,
) -> usize {
    let entries = match fs::read_dir(repository_dir) {
        Ok(entries) => entries,
        Err(err) => {
            diagnostics.warn(format!(
                "failed to list {}: {err}",
                repository_dir.display()
            ));
            return 0;
        }
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || path.extension().is_none_or(|ext| ext != "rs") {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if name == "mod.rs" || specs.iter().any(|spec| spec.file_name == name) {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => {
                diagnostics.info(&format!("removed stale artifact {name}"));
                removed += 1;
            }
            Err(err) => {
                diagnostics.warn(format!("failed to remove {}: {err}", path.display()));
            }
        }
    }
    removed
}

/// Declare the scanned tree as a build input when running under cargo.
///
/// Cargo then re-runs the build script whenever anything below the base
/// directory changes, which is the up-to-date contract the artifacts rely
/// on. `OUT_DIR` doubles as the build-script indicator; outside one the
/// directive would be meaningless noise on stdout.
fn declare_build_inputs(base_dir: &Path) {
    if env::var_os("OUT_DIR").is_some() {
        println!("cargo:rerun-if-changed={}", base_dir.display());
    }
}

fn report_outcome(summary: &RunSummary, diagnostics: &Diagnostics<'_>) {
    diagnostics.info(&format!(
        "repository generation complete: {} written, {} failed, {} stale removed, {} warnings",
        summary.artifacts_written,
        summary.artifacts_failed,
        summary.artifacts_removed,
        diagnostics.warning_count()
    ));
}

/// Check a `::`-separated module path of Rust identifiers.
fn validate_module_path(what: &str, value: &str) -> Result<(), GenerateError> {
    if value.is_empty() {
        return Err(GenerateError::config(format!("{what} is empty")));
    }
    if value.contains('.') {
        return Err(GenerateError::config(format!(
            "{what} `{value}` contains `.`: separate module segments with `::`"
        )));
    }
    for segment in value.split("::") {
        if !is_identifier(segment) {
            return Err(GenerateError::config(format!(
                "{what} `{value}` has an invalid segment `{segment}`"
            )));
        }
    }
    Ok(())
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|ch| ch == '_' || ch.is_ascii_alphanumeric())
}
