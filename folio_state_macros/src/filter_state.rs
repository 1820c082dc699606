use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, LitStr};

pub fn derive_filter_state(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let key = match extract_key(&input) {
        Ok(key) => key,
        Err(err) => return err.to_compile_error().into(),
    };

    let expanded = quote! {
        impl #impl_generics folio_state::FilterState for #name #ty_generics #where_clause {
            const STORAGE_KEY: &'static str = #key;
        }
    };

    TokenStream::from(expanded)
}

fn extract_key(input: &DeriveInput) -> syn::Result<String> {
    for attr in &input.attrs {
        if !attr.path().is_ident("filter") {
            continue;
        }

        let mut key = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("key") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(meta.error("filter key must not be empty"));
                }
                key = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported filter attribute, expected `key`"))
            }
        })?;

        if let Some(k) = key {
            return Ok(k);
        }
    }

    // Default: snake_case struct name
    Ok(to_snake_case(&input.ident.to_string()))
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
