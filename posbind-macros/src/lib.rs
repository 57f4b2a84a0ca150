use crate::fixture::FixtureInput;
use crate::positional::impl_positional;
use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod fixture;
mod positional;

/// Derives `posbind::Record` and `posbind::Positional`.
///
/// ```rust
/// use posbind::Positional;
///
/// #[derive(Positional, Default)]
/// struct Triple {
///     a2: i32,
///     a3: Option<i32>,
///     a1: i32,
/// }
///
/// let triple = Triple::from_values(&[1, 2, 3]).unwrap();
/// assert_eq!(triple.a3, Some(3));
/// ```
#[proc_macro_derive(Positional, attributes(positional))]
pub fn positional_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    impl_positional(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[proc_macro]
pub fn fixture_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as FixtureInput);
    input
        .compile()
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
