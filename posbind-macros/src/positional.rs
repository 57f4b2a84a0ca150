use posbind_convention::{order_fields, parse_order_key, validate_prefix, DEFAULT_PREFIX};
use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{
    Data, DataEnum, DataStruct, DataUnion, DeriveInput, Field, Fields, GenericArgument, Ident,
    LitStr, PathArguments, Type, TypePath,
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
    Raw,
    Nullable,
}

impl Kind {
    fn variant(self) -> Ident {
        match self {
            Kind::Raw => format_ident!("Raw"),
            Kind::Nullable => format_ident!("Nullable"),
        }
    }
}

struct ScalarField<'a> {
    name: String,
    field: &'a Field,
    kind: Kind,
}

fn is_i32(ty: &Type) -> bool {
    match ty {
        Type::Group(group) => is_i32(&group.elem),
        Type::Paren(paren) => is_i32(&paren.elem),
        Type::Path(TypePath { qself: None, path }) => path
            .segments
            .last()
            .is_some_and(|last| last.ident == "i32" && last.arguments.is_none()),
        _ => false,
    }
}

/// `i32` is raw and `Option<i32>` is nullable. Type aliases are not seen through.
fn scalar_kind(ty: &Type) -> Option<Kind> {
    match ty {
        Type::Group(group) => scalar_kind(&group.elem),
        Type::Paren(paren) => scalar_kind(&paren.elem),
        _ if is_i32(ty) => Some(Kind::Raw),
        Type::Path(TypePath { qself: None, path }) => {
            let last = path.segments.last()?;
            if last.ident != "Option" {
                return None;
            }
            let PathArguments::AngleBracketed(args) = &last.arguments else {
                return None;
            };
            match args.args.first() {
                Some(GenericArgument::Type(inner)) if args.args.len() == 1 && is_i32(inner) => {
                    Some(Kind::Nullable)
                }
                _ => None,
            }
        }
        _ => None,
    }
}

fn combine(errors: &mut Option<syn::Error>, error: syn::Error) {
    match errors {
        Some(errors) => errors.combine(error),
        None => *errors = Some(error),
    }
}

fn parse_prefix(input: &DeriveInput) -> syn::Result<LitStr> {
    let mut prefix = None;

    for attr in &input.attrs {
        if !attr.path().is_ident("positional") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("prefix") {
                if prefix.is_some() {
                    return Err(meta.error("duplicate `prefix`"));
                }
                let lit: LitStr = meta.value()?.parse()?;
                validate_prefix(&lit.value()).map_err(|e| syn::Error::new(lit.span(), e))?;
                prefix = Some(lit);
                Ok(())
            } else {
                Err(meta.error("unsupported attribute, expected `prefix = \"...\"`"))
            }
        })?;
    }

    Ok(prefix.unwrap_or_else(|| LitStr::new(DEFAULT_PREFIX, Span::call_site())))
}

pub fn impl_positional(input: DeriveInput) -> syn::Result<TokenStream> {
    let fields = match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(fields),
            ..
        }) => fields,
        Data::Struct(DataStruct { struct_token, .. }) => {
            return Err(syn::Error::new(
                struct_token.span,
                "cannot derive Positional for a struct without named fields",
            ))
        }
        Data::Enum(DataEnum { enum_token, .. }) => {
            return Err(syn::Error::new(
                enum_token.span,
                "cannot derive Positional for an enum",
            ))
        }
        Data::Union(DataUnion { union_token, .. }) => {
            return Err(syn::Error::new(
                union_token.span,
                "cannot derive Positional for a union",
            ))
        }
    };

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "cannot derive Positional for a generic struct",
        ));
    }

    let prefix = parse_prefix(&input)?;
    let prefix_value = prefix.value();

    let mut errors = None;
    let mut scalars = Vec::new();

    for field in &fields.named {
        let Some(ident) = &field.ident else {
            continue;
        };
        let name = ident.unraw().to_string();

        if let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("positional")) {
            combine(
                &mut errors,
                syn::Error::new(attr.span(), "`positional` attributes go on the struct"),
            );
        }

        let kind = scalar_kind(&field.ty);
        match (parse_order_key(&prefix_value, &name), kind) {
            (Err(e), _) => combine(&mut errors, syn::Error::new(ident.span(), e)),
            (Ok(Some(_)), None) => combine(
                &mut errors,
                syn::Error::new(
                    field.ty.span(),
                    format!("positional field `{name}` must be `i32` or `Option<i32>`"),
                ),
            ),
            (Ok(_), Some(kind)) => scalars.push(ScalarField { name, field, kind }),
            (Ok(None), None) => {}
        }
    }

    if let Some(errors) = errors {
        return Err(errors);
    }

    // the runtime does the same when it builds the index, this only moves the error earlier
    if let Err(e) = order_fields(&prefix_value, &scalars, |s| s.name.as_str()) {
        let span = scalars
            .iter()
            .find(|s| Some(s.name.as_str()) == e.field())
            .map_or_else(Span::call_site, |s| s.field.span());
        return Err(syn::Error::new(span, e));
    }

    let name = &input.ident;
    let name_str = name.to_string();
    let count = scalars.len();

    let accessors = scalars.iter().map(|s| {
        let field = s.field.ident.as_ref();
        let getter = format_ident!("get_{}", s.name);
        let setter = format_ident!("set_{}", s.name);
        let variant = s.kind.variant();

        quote! {
            fn #getter(record: &#name) -> posbind::Scalar {
                posbind::Scalar::#variant(record.#field)
            }

            fn #setter(
                record: &mut #name,
                value: posbind::Scalar,
            ) -> ::std::result::Result<(), posbind::AccessError> {
                match value {
                    posbind::Scalar::#variant(value) => {
                        record.#field = value;
                        ::std::result::Result::Ok(())
                    }
                    other => ::std::result::Result::Err(posbind::AccessError::KindMismatch {
                        expected: posbind::ScalarKind::#variant,
                        found: other.kind(),
                    }),
                }
            }
        }
    });

    let decls = scalars.iter().map(|s| {
        let field_name = &s.name;
        let getter = format_ident!("get_{}", s.name);
        let setter = format_ident!("set_{}", s.name);
        let variant = s.kind.variant();

        quote! {
            posbind::FieldDecl::new(#field_name, posbind::ScalarKind::#variant, #getter, #setter)
        }
    });

    Ok(quote! {
        impl posbind::Record for #name {
            const NAME: &'static str = #name_str;
            const PREFIX: &'static str = #prefix;

            fn declared_fields() -> &'static [posbind::FieldDecl<Self>] {
                #(#accessors)*

                static FIELDS: [posbind::FieldDecl<#name>; #count] = [
                    #(#decls),*
                ];
                &FIELDS
            }
        }

        posbind::impl_positional!(#name);
    })
}
