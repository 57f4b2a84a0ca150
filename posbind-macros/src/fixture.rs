use posbind_convention::{validate_prefix, DEFAULT_PREFIX};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::parse::{Parse, ParseStream};
use syn::{braced, bracketed, Attribute, Ident, LitInt, LitStr, Token, Visibility};

pub(crate) struct FixtureInput {
    attrs: Vec<Attribute>,
    vis: Visibility,
    _struct: Token![struct],
    name: Ident,
    fields: LitInt,
    prefix: Option<LitStr>,
    nullable: Option<NullableKeys>,
}

/// `[3, 6, 9] mod 10`
pub(crate) struct NullableKeys {
    residues: Vec<LitInt>,
    _mod: Token![mod],
    modulus: LitInt,
}

impl Parse for NullableKeys {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let content;
        bracketed!(content in input);
        let residues = content
            .parse_terminated(LitInt::parse, Token![,])?
            .into_iter()
            .collect();
        Ok(Self {
            residues,
            _mod: input.parse()?,
            modulus: input.parse()?,
        })
    }
}

fn set_once<T>(slot: &mut Option<T>, key: &Ident, value: T) -> syn::Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new(key.span(), format!("duplicate `{key}`")));
    }
    *slot = Some(value);
    Ok(())
}

impl Parse for FixtureInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis = input.parse()?;
        let _struct = input.parse()?;
        let name: Ident = input.parse()?;

        let content;
        braced!(content in input);

        let mut fields = None;
        let mut prefix = None;
        let mut nullable = None;

        while !content.is_empty() {
            let key: Ident = content.parse()?;
            content.parse::<Token![:]>()?;

            match key.to_string().as_str() {
                "fields" => set_once(&mut fields, &key, content.parse()?)?,
                "prefix" => set_once(&mut prefix, &key, content.parse()?)?,
                "nullable" => set_once(&mut nullable, &key, content.parse()?)?,
                _ => {
                    return Err(syn::Error::new(
                        key.span(),
                        format!("unknown option `{key}`, expected `fields`, `prefix` or `nullable`"),
                    ))
                }
            }

            if content.is_empty() {
                break;
            }
            content.parse::<Token![,]>()?;
        }

        let fields = fields
            .ok_or_else(|| syn::Error::new(name.span(), "missing the `fields: <count>` option"))?;

        Ok(Self {
            attrs,
            vis,
            _struct,
            name,
            fields,
            prefix,
            nullable,
        })
    }
}

impl NullableKeys {
    /// Returns a predicate on order keys.
    fn compile(&self) -> syn::Result<impl Fn(u32) -> bool> {
        let modulus: u32 = self.modulus.base10_parse()?;
        if modulus == 0 {
            return Err(syn::Error::new(self.modulus.span(), "modulus must be positive"));
        }

        let mut residues = Vec::new();
        for lit in &self.residues {
            let residue: u32 = lit.base10_parse()?;
            if residue >= modulus {
                return Err(syn::Error::new(
                    lit.span(),
                    format!("{residue} mod {modulus} never matches, residues must be below {modulus}"),
                ));
            }
            residues.push(residue);
        }

        Ok(move |key: u32| residues.contains(&(key % modulus)))
    }
}

impl FixtureInput {
    pub(crate) fn compile(&self) -> syn::Result<TokenStream> {
        let count: u32 = self.fields.base10_parse()?;
        if count == 0 {
            return Err(syn::Error::new(
                self.fields.span(),
                "a fixture record needs at least one field",
            ));
        }

        let prefix = match &self.prefix {
            Some(lit) => {
                let value = lit.value();
                validate_prefix(&value).map_err(|e| syn::Error::new(lit.span(), e))?;
                // format_ident! panics on names that aren't identifiers
                syn::parse_str::<Ident>(&format!("{value}1")).map_err(|_| {
                    syn::Error::new(lit.span(), format!("`{value}1` is not an identifier"))
                })?;
                value
            }
            None => DEFAULT_PREFIX.to_owned(),
        };

        let is_nullable: Box<dyn Fn(u32) -> bool> = match &self.nullable {
            Some(nullable) => Box::new(nullable.compile()?),
            None => Box::new(|_| false),
        };

        let vis = &self.vis;
        let fields = (1..=count).map(|key| {
            let ident = format_ident!("{}{}", prefix, key);
            if is_nullable(key) {
                quote!(#vis #ident: ::std::option::Option<i32>)
            } else {
                quote!(#vis #ident: i32)
            }
        });

        let attrs = &self.attrs;
        let name = &self.name;

        Ok(quote! {
            #(#attrs)*
            #[derive(::std::default::Default, posbind::Positional)]
            #[positional(prefix = #prefix)]
            #vis struct #name {
                #(#fields),*
            }
        })
    }
}
