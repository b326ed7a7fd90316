use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod ordinal;

#[proc_macro_derive(Ordinal)]
pub fn derive_ordinal(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match ordinal::expand_ordinal(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error().into(),
    }
}
