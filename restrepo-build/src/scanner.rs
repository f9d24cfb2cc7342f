//! Entity discovery over the configured source tree.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::GenerateError;
use crate::report::Diagnostics;
use crate::resolver::{EntityDescriptor, TypeUniverse};

/// The derive an entity must carry to get a repository generated.
pub const MARKER: &str = "RestEntity";

/// File stems that never follow the one-type-per-file naming convention.
const NON_TYPE_STEMS: &[&str] = &["mod", "lib", "main"];

/// Scan the base module's directory for marker-carrying entities.
///
/// The base module must be directory-backed (`models` lives at
/// `src/models/`). Each `.rs` file below it yields one candidate name: the
/// relative path maps to module segments and the Pascal-cased file stem
/// names the type, so `models/hr/employee.rs` becomes
/// `models::hr::employee::Employee`. Candidates that fail to resolve or
/// that resolve without the marker are skipped; resolution failures are
/// reported through `diagnostics`. A walk failure aborts the scan.
///
/// The result is sorted by fully-qualified name so downstream synthesis is
/// deterministic regardless of directory iteration order.
pub fn scan_entities(
    source_root: &Path,
    base_module: &str,
    universe: &TypeUniverse,
    diagnostics: &mut Diagnostics<'_>,
) -> Result<Vec<EntityDescriptor>, GenerateError> {
    let base_dir = module_dir(source_root, base_module);
    let mut found = Vec::new();

    for entry in WalkDir::new(&base_dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let message = err.to_string();
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other(message));
                return Err(GenerateError::Scan {
                    path: base_dir.clone(),
                    source,
                });
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "rs") {
            continue;
        }
        if path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .is_none_or(|stem| NON_TYPE_STEMS.contains(&stem))
        {
            continue;
        }

        let Some(candidate) = candidate_name(path, &base_dir, base_module) else {
            continue;
        };

        match universe.resolve(&candidate) {
            Ok(descriptor) => {
                if !descriptor.has_annotation(MARKER) {
                    continue;
                }
                if descriptor.generic_params > 0 {
                    diagnostics.warn(format!(
                        "skipping `{}`: generic entities cannot instantiate a repository",
                        descriptor.fqn
                    ));
                    continue;
                }
                found.push(descriptor);
            }
            Err(err) => {
                diagnostics.warn(format!("skipping {}: {err}", path.display()));
            }
        }
    }

    found.sort_by(|a, b| a.fqn.cmp(&b.fqn));
    found.dedup_by(|a, b| a.fqn == b.fqn);
    Ok(found)
}

/// Map a `::`-separated module path to its directory under the source root.
pub(crate) fn module_dir(source_root: &Path, module: &str) -> PathBuf {
    let mut dir = source_root.to_path_buf();
    for segment in module.split("::") {
        dir.push(segment);
    }
    dir
}

/// Derive the candidate fully-qualified name for a file below the base
/// directory: `hr/employee.rs` under base `models` gives
/// `models::hr::employee::Employee`.
fn candidate_name(path: &Path, base_dir: &Path, base_module: &str) -> Option<String> {
    let relative = path.strip_prefix(base_dir).ok()?;
    let stem = relative.file_stem()?.to_str()?;

    let mut segments = vec![base_module.to_string()];
    for component in relative.parent()?.components() {
        segments.push(component.as_os_str().to_str()?.to_string());
    }
    segments.push(stem.to_string());
    segments.push(pascal_case(stem));
    Some(segments.join("::"))
}

/// Convert a snake_case file stem to the PascalCase type it names.
fn pascal_case(stem: &str) -> String {
    let mut result = String::with_capacity(stem.len());
    let mut upper_next = true;
    for ch in stem.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            result.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            result.push(ch);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::TempDir;

    use crate::report::MemoryReporter;

    fn write_source(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn scan(root: &Path, base_module: &str) -> (Vec<EntityDescriptor>, Vec<String>) {
        let reporter = MemoryReporter::new();
        let universe = TypeUniverse::new(root);
        let mut diagnostics = Diagnostics::new(&reporter);
        let found = scan_entities(root, base_module, &universe, &mut diagnostics)
            .expect("scan should succeed");
        (found, diagnostics.into_warnings())
    }

    #[test]
    fn finds_exactly_the_marked_entities() {
        let dir = TempDir::new().unwrap();
        write_source(
            dir.path(),
            "models/employee.rs",
            "#[derive(RestEntity)] pub struct Employee { pub id: Option<i64> }",
        );
        write_source(
            dir.path(),
            "models/hr/department.rs",
            "#[derive(Debug, RestEntity)] pub struct Department { pub id: Option<i64> }",
        );
        write_source(
            dir.path(),
            "models/note.rs",
            "#[derive(Debug)] pub struct Note { pub body: String }",
        );
        write_source(dir.path(), "models/mod.rs", "pub mod employee;");

        let (found, warnings) = scan(dir.path(), "models");
        let names: Vec<&str> = found.iter().map(|e| e.fqn.as_str()).collect();
        assert_eq!(
            names,
            vec!["models::employee::Employee", "models::hr::department::Department"]
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn empty_tree_finds_nothing() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("models")).unwrap();

        let (found, warnings) = scan(dir.path(), "models");
        assert!(found.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn unresolvable_candidate_is_skipped_with_a_warning() {
        let dir = TempDir::new().unwrap();
        write_source(dir.path(), "models/helpers.rs", "pub fn run() {}");
        write_source(
            dir.path(),
            "models/employee.rs",
            "#[derive(RestEntity)] pub struct Employee { pub id: Option<i64> }",
        );

        let (found, warnings) = scan(dir.path(), "models");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].simple_name, "Employee");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("helpers.rs"));
    }

    #[test]
    fn generic_entity_is_skipped_with_a_warning() {
        let dir = TempDir::new().unwrap();
        write_source(
            dir.path(),
            "models/wrapper.rs",
            "#[derive(RestEntity)] pub struct Wrapper<T> { pub inner: T }",
        );

        let (found, warnings) = scan(dir.path(), "models");
        assert!(found.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("models::wrapper::Wrapper"));
    }

    #[test]
    fn missing_base_directory_aborts_the_scan() {
        let dir = TempDir::new().unwrap();
        let reporter = MemoryReporter::new();
        let universe = TypeUniverse::new(dir.path());
        let mut diagnostics = Diagnostics::new(&reporter);

        let err = scan_entities(dir.path(), "models", &universe, &mut diagnostics).unwrap_err();
        assert!(matches!(err, GenerateError::Scan { .. }));
    }

    #[test]
    fn mod_lib_and_main_stems_are_not_candidates() {
        let dir = TempDir::new().unwrap();
        write_source(
            dir.path(),
            "models/mod.rs",
            "#[derive(RestEntity)] pub struct Mod { pub id: Option<i64> }",
        );
        write_source(
            dir.path(),
            "models/main.rs",
            "#[derive(RestEntity)] pub struct Main { pub id: Option<i64> }",
        );

        let (found, warnings) = scan(dir.path(), "models");
        assert!(found.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn nested_base_module_paths_are_joined() {
        let dir = TempDir::new().unwrap();
        write_source(
            dir.path(),
            "app/models/employee.rs",
            "#[derive(RestEntity)] pub struct Employee { pub id: Option<i64> }",
        );

        let (found, _) = scan(dir.path(), "app::models");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].fqn, "app::models::employee::Employee");
    }

    #[test]
    fn pascal_case_handles_multi_word_stems() {
        assert_eq!(pascal_case("employee"), "Employee");
        assert_eq!(pascal_case("order_item"), "OrderItem");
        assert_eq!(pascal_case("x"), "X");
    }
}
