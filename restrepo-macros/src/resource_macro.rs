//! Expansion of the `RestEntity` derive and the `rest_resource` attribute.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    DeriveInput, Error, GenericArgument, ItemTrait, PathArguments, Result, TraitItem, Type,
    TypeParamBound, TypePath,
};

/// Emit the marker impl for `#[derive(RestEntity)]`.
pub fn expand_derive(input: &DeriveInput) -> TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    quote! {
        impl #impl_generics ::restrepo::RestEntity for #name #ty_generics #where_clause {}
    }
}

/// Expand `#[rest_resource]` on a repository trait.
///
/// Keeps the trait as written, adds a blanket impl so every
/// `Repository<Entity, Id>` value satisfies it, and submits a
/// `ResourceRegistration` to the inventory.
pub fn expand_rest_resource(args: TokenStream, item: ItemTrait) -> Result<TokenStream> {
    if !args.is_empty() {
        return Err(Error::new_spanned(&args, "rest_resource takes no arguments"));
    }
    if !item.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &item.generics,
            "a rest_resource trait cannot be generic",
        ));
    }
    for member in &item.items {
        if let TraitItem::Fn(method) = member {
            if method.default.is_none() {
                return Err(Error::new_spanned(
                    method,
                    "methods on a rest_resource trait need default bodies; \
                     a required method would break the blanket implementation",
                ));
            }
        }
    }

    let target = resource_target(&item)?;
    let entity = target.entity;
    let id = target.id;
    let entity_name = simple_type_name(entity)?;
    let repository_name = item.ident.to_string();
    let rel = pluralize(&to_snake_case(&entity_name));
    let trait_ident = &item.ident;

    Ok(quote! {
        #item

        impl<R> #trait_ident for R where R: ::restrepo::Repository<#entity, #id> + ?Sized {}

        ::restrepo::inventory::submit! {
            ::restrepo::ResourceRegistration {
                repository_name: #repository_name,
                entity_name: #entity_name,
                rel: #rel,
                entity_type: || ::core::any::TypeId::of::<#entity>(),
            }
        }
    })
}

struct ResourceTarget<'a> {
    entity: &'a Type,
    id: &'a Type,
}

/// Pull the entity and id types out of the `Repository<Entity, Id>`
/// supertrait.
fn resource_target(item: &ItemTrait) -> Result<ResourceTarget<'_>> {
    for bound in &item.supertraits {
        let TypeParamBound::Trait(bound) = bound else {
            continue;
        };
        let Some(segment) = bound.path.segments.last() else {
            continue;
        };
        if segment.ident != "Repository" {
            continue;
        }

        let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
            return Err(Error::new_spanned(
                bound,
                "expected `Repository<Entity, Id>` with two type parameters",
            ));
        };
        let types: Vec<&Type> = arguments
            .args
            .iter()
            .filter_map(|argument| match argument {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect();
        if let [entity, id] = types[..] {
            return Ok(ResourceTarget { entity, id });
        }
        return Err(Error::new_spanned(
            bound,
            "expected `Repository<Entity, Id>` with two type parameters",
        ));
    }

    Err(Error::new_spanned(
        &item.ident,
        "a rest_resource trait must extend `restrepo::Repository<Entity, Id>`",
    ))
}

/// The last path segment of a named entity type, e.g. `Employee` out of
/// `crate::models::employee::Employee`.
fn simple_type_name(ty: &Type) -> Result<String> {
    match ty {
        Type::Path(TypePath { qself: None, path }) => match path.segments.last() {
            Some(segment) => Ok(segment.ident.to_string()),
            None => Err(Error::new_spanned(ty, "entity type has no name")),
        },
        other => Err(Error::new_spanned(other, "entity must be a named type")),
    }
}

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

/// Simple pluralization rules
fn pluralize(word: &str) -> String {
    if word.ends_with('s') || word.ends_with('x') || word.ends_with("ch") || word.ends_with("sh") {
        format!("{}es", word)
    } else if word.ends_with('y')
        && !word.ends_with("ay")
        && !word.ends_with("ey")
        && !word.ends_with("oy")
        && !word.ends_with("uy")
    {
        format!("{}ies", &word[..word.len() - 1])
    } else {
        format!("{}s", word)
    }
}
