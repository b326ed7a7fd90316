use std::collections::HashSet;

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, Expr, ExprLit, Fields, Ident, Lit, LitInt, Result, Variant,
    spanned::Spanned,
};

pub(crate) fn expand_ordinal(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Enum(data) = &input.data else {
        Err(Error::new(
            input.span(),
            "`Ordinal` may only be derived on enums.",
        ))?
    };

    if data.variants.is_empty() {
        Err(Error::new(
            input.span(),
            "`Ordinal` may only be derived on enums with at least one variant.",
        ))?
    }

    let mut next = 0u16; // Implicit discriminants count up from the last one.
    let mut seen = HashSet::new();
    let mut variants = Vec::with_capacity(data.variants.len());

    for variant in &data.variants {
        let VariantMetadata { name, ordinal } = VariantMetadata::parse(variant, next)?;

        if !seen.insert(ordinal) {
            Err(Error::new_spanned(
                variant,
                "Variant ordinals must be unique.",
            ))?
        }

        next = ordinal as u16 + 1;
        variants.push((name, ordinal));
    }

    let from_cases = variants.iter().map(|(name, ordinal)| {
        let ordinal = LitInt::new(&format!("{ordinal}u8"), name.span());
        quote! { #ordinal => Some(Self::#name), }
    });

    let into_cases = variants.iter().map(|(name, ordinal)| {
        let ordinal = LitInt::new(&format!("{ordinal}u8"), name.span());
        quote! { Self::#name => #ordinal, }
    });

    let name = &input.ident;
    let kind = name.to_string();

    let expanded = quote! {
        impl Ordinal for #name {
            const KIND: &'static str = #kind;

            fn from_ordinal(value: u8) -> Option<Self> {
                match value {
                    #(#from_cases)*
                    _ => None,
                }
            }

            fn ordinal(self) -> u8 {
                match self {
                    #(#into_cases)*
                }
            }
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct VariantMetadata {
    name: Ident,
    ordinal: u8,
}

impl VariantMetadata {
    fn parse(variant: &Variant, implicit: u16) -> Result<Self> {
        let Fields::Unit = &variant.fields else {
            Err(Error::new_spanned(
                &variant.fields,
                "`Ordinal` variants may not carry fields.",
            ))?
        };

        let ordinal = match &variant.discriminant {
            Some((_, expr)) => {
                let Expr::Lit(ExprLit {
                    lit: Lit::Int(lit), ..
                }) = expr
                else {
                    Err(Error::new_spanned(
                        expr,
                        "Discriminant must be an integer literal.",
                    ))?
                };

                lit.base10_parse::<u16>()?
            }
            None => implicit,
        };

        let Ok(ordinal) = u8::try_from(ordinal) else {
            Err(Error::new_spanned(
                variant,
                "Ordinal must fit in a `u8`.",
            ))?
        };

        Ok(Self {
            name: variant.ident.clone(),
            ordinal,
        })
    }
}
