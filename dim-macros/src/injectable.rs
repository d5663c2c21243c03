//! Implementation of `#[derive(Injectable)]`.

use darling::ast::{Data, Style};
use darling::util::{Ignored, Override};
use darling::{FromDeriveInput, FromField};
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{DeriveInput, GenericArgument, Ident, PathArguments, PathSegment, Type, TypeParamBound};

/// Field types never autowired.
const UNTYPED: &[&str] = &[
    "bool", "char", "str", "String", "Option", "Vec", "i8", "i16", "i32", "i64", "i128", "isize",
    "u8", "u16", "u32", "u64", "u128", "usize", "f32", "f64",
];

/// Smart pointers looked through when inferring a declared type.
const POINTERS: &[&str] = &["Arc", "Box", "Rc"];

#[derive(FromDeriveInput)]
#[darling(attributes(dim), supports(struct_named, struct_unit))]
struct InjectableInput {
    ident: Ident,
    generics: syn::Generics,
    data: Data<Ignored, InjectableField>,
    name: Option<String>,
}

#[derive(FromField)]
#[darling(attributes(dim))]
struct InjectableField {
    ident: Option<Ident>,
    ty: Type,
    default: Option<Override<syn::Path>>,
    service: Option<String>,
    #[darling(default)]
    untyped: bool,
}

impl InjectableField {
    fn declared_type(&self) -> Option<String> {
        if self.untyped {
            return None;
        }
        self.service.clone().or_else(|| declared_type(&self.ty))
    }

    fn default_value(&self) -> Option<TokenStream> {
        let ty = &self.ty;
        self.default.as_ref().map(|default| match default {
            Override::Inherit => {
                quote!(::dim::Value::new(<#ty as ::core::default::Default>::default()))
            }
            Override::Explicit(path) => quote!(::dim::Value::new(#path())),
        })
    }
}

pub(crate) fn derive_injectable_impl(input: DeriveInput) -> darling::Result<TokenStream> {
    let input = InjectableInput::from_derive_input(&input)?;
    if !input.generics.params.is_empty() {
        return Err(darling::Error::custom("Injectable cannot be derived for generic types")
            .with_span(&input.generics));
    }

    let ident = &input.ident;
    let type_name = input.name.clone().unwrap_or_else(|| ident.unraw().to_string());
    let fields = input
        .data
        .take_struct()
        .ok_or_else(|| darling::Error::unsupported_shape("enum"))?;

    let recipe = if fields.style == Style::Unit {
        quote!(.without_constructor(|| #ident))
    } else {
        let mut parameters = Vec::with_capacity(fields.len());
        let mut initializers = Vec::with_capacity(fields.len());

        for (position, field) in fields.fields.iter().enumerate() {
            let field_ident = field
                .ident
                .as_ref()
                .ok_or_else(|| darling::Error::unsupported_shape("tuple struct"))?;
            let name = field_ident.unraw().to_string();

            parameters.push(match (field.declared_type(), field.default_value()) {
                (None, None) => quote!(.param(#name)),
                (Some(declared), None) => quote!(.typed(#name, #declared)),
                (None, Some(default)) => quote!(.optional(#name, #default)),
                (Some(declared), Some(default)) => {
                    quote!(.optional_typed(#name, #declared, #default))
                }
            });

            let ty = &field.ty;
            initializers.push(match arc_inner(ty) {
                Some(inner) => quote!(#field_ident: arguments.arg_arc::<#inner>(#position)?),
                None => quote!(#field_ident: arguments.arg::<#ty>(#position)?),
            });
        }

        quote! {
            .constructor(
                ::dim::Signature::new() #(#parameters)*,
                |arguments: ::dim::ResolvedArguments| {
                    ::core::result::Result::Ok(#ident { #(#initializers),* })
                },
            )
        }
    };

    Ok(quote! {
        impl ::dim::Injectable for #ident {
            const TYPE_NAME: &'static str = #type_name;

            fn type_info() -> ::dim::TypeInfo {
                ::dim::TypeInfo::builder::<Self>(<Self as ::dim::Injectable>::TYPE_NAME)
                    #recipe
                    .build()
            }
        }

        ::dim::inventory::submit! {
            ::dim::registry::TypeRegistration::new(<#ident as ::dim::Injectable>::type_info)
        }
    })
}

/// Name a field of type `ty` is autowired by, if any.
fn declared_type(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(path) => {
            let segment = path.path.segments.last()?;
            let ident = segment.ident.to_string();
            if POINTERS.contains(&ident.as_str()) {
                return first_type_argument(segment).and_then(declared_type);
            }
            (!UNTYPED.contains(&ident.as_str())).then_some(ident)
        }
        Type::TraitObject(object) => object.bounds.iter().find_map(|bound| match bound {
            TypeParamBound::Trait(bound) => {
                bound.path.segments.last().map(|segment| segment.ident.to_string())
            }
            _ => None,
        }),
        Type::Paren(inner) => declared_type(&inner.elem),
        Type::Group(inner) => declared_type(&inner.elem),
        _ => None,
    }
}

fn first_type_argument(segment: &PathSegment) -> Option<&Type> {
    match &segment.arguments {
        PathArguments::AngleBracketed(arguments) => {
            arguments.args.iter().find_map(|argument| match argument {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
        }
        _ => None,
    }
}

/// `T` for an `Arc<T>` field with a sized `T`.
fn arc_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Arc" {
        return None;
    }
    first_type_argument(segment).filter(|inner| !matches!(inner, Type::TraitObject(_)))
}
