use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod resource_macro;

/// Mark a type as a REST entity.
///
/// The derive emits only the `restrepo::RestEntity` marker impl; the
/// build-time generator discovers the attribute in source text and emits a
/// repository trait for the type.
#[proc_macro_derive(RestEntity)]
pub fn derive_rest_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    resource_macro::expand_derive(&input).into()
}

/// Mark a repository trait as an exposed REST resource.
///
/// Applied to a trait extending `restrepo::Repository<Entity, Id>`. The
/// expansion keeps the trait, implements it for every matching repository,
/// and registers the resource for runtime discovery:
///
/// ```ignore
/// #[restrepo::rest_resource]
/// pub trait EmployeeRepository: restrepo::Repository<Employee, i64> {}
///
/// // Any Repository<Employee, i64> now also implements EmployeeRepository,
/// // and restrepo::registered_resources() yields an "employees" resource.
/// ```
#[proc_macro_attribute]
pub fn rest_resource(args: TokenStream, input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as syn::ItemTrait);
    match resource_macro::expand_rest_resource(args.into(), item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
