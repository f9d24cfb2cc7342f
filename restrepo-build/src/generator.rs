//! Repository artifact synthesis.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::resolver::EntityDescriptor;

/// First line of every generated file.
///
/// A plain comment rather than an inner doc attribute: artifacts are spliced
/// into the host crate with `include!`, where inner attributes are only
/// legal at the very start of a module body.
const HEADER: &str = "// Generated by restrepo-build. Do not edit manually.\n\n";

/// One generated repository interface, in memory.
///
/// A pure function of the entity descriptor and the run configuration: the
/// same inputs always render byte-identical source, so an unchanged tree
/// leaves the output directory untouched.
#[derive(Clone)]
pub struct RepositorySpec {
    /// Trait name, `{Simple}Repository`.
    pub name: String,
    /// Artifact file name, `{snake(simple)}_repository.rs`.
    pub file_name: String,
    /// Fully-qualified name of the entity, for collision reports.
    pub entity_fqn: String,
    entity_path: syn::Path,
    id_type: syn::Type,
}

impl RepositorySpec {
    /// Plan the artifact for one entity.
    ///
    /// `entity_crate` anchors the entity path inside the host crate
    /// (`crate` by default), so the artifact compiles no matter which
    /// module it is spliced into.
    pub fn new(
        descriptor: &EntityDescriptor,
        entity_crate: &str,
        id_type: &syn::Type,
    ) -> Result<Self, syn::Error> {
        let name = format!("{}Repository", descriptor.simple_name);
        let file_name = format!("{}.rs", to_snake_case(&name));
        let full_path = format!("{entity_crate}::{}", descriptor.fqn);
        let entity_path: syn::Path = syn::parse_str(&full_path)?;

        Ok(Self {
            name,
            file_name,
            entity_fqn: descriptor.fqn.clone(),
            entity_path,
            id_type: id_type.clone(),
        })
    }

    /// Item tokens for the artifact: doc line, marker attribute, empty
    /// trait body.
    fn trait_tokens(&self) -> TokenStream {
        let trait_ident = format_ident!("{}", self.name);
        let entity = &self.entity_path;
        let id = &self.id_type;
        let doc = format!(
            "Generated REST repository over [`{}`].",
            path_to_string(entity)
        );

        quote! {
            #[doc = #doc]
            #[restrepo::rest_resource]
            pub trait #trait_ident: ::restrepo::Repository<#entity, #id> {}
        }
    }

    /// Render the artifact source.
    ///
    /// The emitted trait references everything by absolute path and carries
    /// no imports, so any number of artifacts can share one module without
    /// colliding.
    pub fn render(&self) -> Result<String, syn::Error> {
        let file: syn::File = syn::parse2(self.trait_tokens())?;
        Ok(format!("{HEADER}{}", prettyplease::unparse(&file)))
    }
}

/// Render the `mod.rs` that splices the artifact set into the host crate.
///
/// `include!` resolves relative to the file containing the invocation, so
/// listing bare file names keeps the index position-independent. Only listed
/// artifacts are compiled; anything else in the directory is inert.
pub fn render_module_index(file_names: &[String]) -> String {
    let mut names: Vec<&String> = file_names.iter().collect();
    names.sort();

    let mut content = String::from(HEADER);
    for name in names {
        let _ = writeln!(content, "include!(\"{name}\");");
    }
    content
}

/// Write `content` to `path` only when the bytes differ.
///
/// Returns whether the file was actually written. Leaving an up-to-date
/// artifact untouched preserves its mtime, which keeps downstream
/// recompilation to a minimum.
pub fn write_if_changed(path: &Path, content: &str) -> io::Result<bool> {
    let unchanged = matches!(fs::read_to_string(path), Ok(existing) if existing == content);
    if unchanged {
        return Ok(false);
    }
    fs::write(path, content)?;
    Ok(true)
}

/// Render a path as source text. `TokenStream::to_string` inserts spaces
/// around `::`, which reads poorly in docs and registry strings.
pub(crate) fn path_to_string(path: &syn::Path) -> String {
    let leading = if path.leading_colon.is_some() { "::" } else { "" };
    let segments: Vec<String> = path
        .segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect();
    format!("{leading}{}", segments.join("::"))
}

/// Convert PascalCase to snake_case.
fn to_snake_case(name: &str) -> String {
    let mut result = String::new();
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(ch.to_ascii_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
