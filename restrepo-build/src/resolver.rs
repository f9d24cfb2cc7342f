//! Lazy, cached symbol resolution over a source tree.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use syn::Attribute;

use crate::error::ResolveError;

/// Declaration-level metadata for one resolved type.
#[derive(Debug, Clone)]
pub struct EntityDescriptor {
    /// Fully-qualified name, e.g. `models::employee::Employee`.
    pub fqn: String,
    /// The final name segment, e.g. `Employee`.
    pub simple_name: String,
    /// Names attached to the declaration: derive idents plus outer attribute
    /// idents. Presence only; arguments are not recorded.
    pub annotations: BTreeSet<String>,
    /// Number of generic parameters on the declaration.
    pub generic_params: usize,
}

impl EntityDescriptor {
    /// Whether the declaration carries the named derive or attribute.
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.contains(name)
    }
}

/// Lookup from fully-qualified name to type metadata, backed by the source
/// tree itself.
///
/// Files are parsed on first use and cached, so resolving many names from
/// the same module costs one parse. Resolution is read-only and idempotent:
/// the same name always yields the same descriptor for an unchanged tree.
pub struct TypeUniverse {
    root: PathBuf,
    files: RefCell<HashMap<PathBuf, Rc<syn::File>>>,
}

impl TypeUniverse {
    /// A universe rooted at a crate source directory (usually `src`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: RefCell::new(HashMap::new()),
        }
    }

    /// Resolve a `::`-separated fully-qualified name to its descriptor.
    ///
    /// The final segment names the type and the preceding segments name the
    /// module file: `models::employee::Employee` resolves against
    /// `models/employee.rs`, falling back to `models/employee/mod.rs`. Both
    /// structs and enums are matched.
    pub fn resolve(&self, name: &str) -> Result<EntityDescriptor, ResolveError> {
        let segments: Vec<&str> = name.split("::").filter(|s| !s.is_empty()).collect();
        let Some((type_name, modules)) = segments.split_last() else {
            return Err(ResolveError::ModuleNotFound {
                name: name.to_string(),
            });
        };
        if modules.is_empty() {
            return Err(ResolveError::ModuleNotFound {
                name: name.to_string(),
            });
        }

        let Some(path) = self.module_file(modules) else {
            return Err(ResolveError::ModuleNotFound {
                name: name.to_string(),
            });
        };
        let file = self.parse_module(&path)?;

        let Some((attrs, generic_params)) = find_declaration(&file, type_name) else {
            return Err(ResolveError::SymbolNotFound {
                name: type_name.to_string(),
                path,
            });
        };

        Ok(EntityDescriptor {
            fqn: segments.join("::"),
            simple_name: type_name.to_string(),
            annotations: collect_annotations(attrs),
            generic_params,
        })
    }

    /// Map module segments to the file declaring them, if one exists.
    fn module_file(&self, modules: &[&str]) -> Option<PathBuf> {
        let mut path = self.root.clone();
        for segment in modules {
            path.push(segment);
        }

        let direct = path.with_extension("rs");
        if direct.is_file() {
            return Some(direct);
        }
        let index = path.join("mod.rs");
        if index.is_file() {
            return Some(index);
        }
        None
    }

    /// Parse a module file, serving repeated lookups from the cache.
    fn parse_module(&self, path: &Path) -> Result<Rc<syn::File>, ResolveError> {
        if let Some(parsed) = self.files.borrow().get(path) {
            return Ok(Rc::clone(parsed));
        }

        let content = fs::read_to_string(path).map_err(|source| ResolveError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed = syn::parse_file(&content).map_err(|source| ResolveError::Unparsable {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = Rc::new(parsed);
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), Rc::clone(&parsed));
        Ok(parsed)
    }
}

/// Find the top-level struct or enum with the given name.
fn find_declaration<'a>(file: &'a syn::File, type_name: &str) -> Option<(&'a [Attribute], usize)> {
    for item in &file.items {
        match item {
            syn::Item::Struct(item_struct) if item_struct.ident == type_name => {
                return Some((&item_struct.attrs, item_struct.generics.params.len()));
            }
            syn::Item::Enum(item_enum) if item_enum.ident == type_name => {
                return Some((&item_enum.attrs, item_enum.generics.params.len()));
            }
            _ => {}
        }
    }
    None
}

/// Collect derive idents and outer attribute idents by their last segment,
/// so both `RestEntity` and `restrepo::RestEntity` register as `RestEntity`.
fn collect_annotations(attrs: &[Attribute]) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for attr in attrs {
        if attr.path().is_ident("derive") {
            if let Ok(nested) = attr.parse_args_with(
                syn::punctuated::Punctuated::<syn::Path, syn::Token![,]>::parse_terminated,
            ) {
                for path in nested {
                    if let Some(segment) = path.segments.last() {
                        names.insert(segment.ident.to_string());
                    }
                }
            }
        } else if let Some(segment) = attr.path().segments.last() {
            names.insert(segment.ident.to_string());
        }
    }
    names
}
