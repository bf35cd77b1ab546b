//! Derive macros for `Encode` and `Decode`.
//!
//! Structs encode their fields in declaration order. Enums encode the
//! variant index (in declaration order, as `u64`) followed by the variant's
//! fields; decoding an out-of-range index fails with the union index error.
//!
//! Refer to the `golcode` crate for examples.
use {
    proc_macro::TokenStream,
    proc_macro2::TokenStream as TokenStream2,
    quote::{format_ident, quote},
    syn::{
        parse_macro_input, parse_quote, Data, DataEnum, DeriveInput, Fields, GenericParam,
        Generics, Ident, Index,
    },
};

/// Implement `Encode` for a struct or enum.
#[proc_macro_derive(Encode)]
pub fn derive_encode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_encode(input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// Implement `Decode` for a struct or enum.
#[proc_macro_derive(Decode)]
pub fn derive_decode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_decode(input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// Bound every type parameter by the given trait.
fn add_trait_bounds(mut generics: Generics, bound: syn::TypeParamBound) -> Generics {
    for param in &mut generics.params {
        if let GenericParam::Type(type_param) = param {
            type_param.bounds.push(bound.clone());
        }
    }
    generics
}

fn variant_index(index: usize, variant: &syn::Variant) -> syn::Result<u64> {
    u64::try_from(index)
        .map_err(|_| syn::Error::new_spanned(variant, "too many variants for a u64 index"))
}

fn expand_encode(input: DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let generics = add_trait_bounds(input.generics.clone(), parse_quote!(::golcode::Encode));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let body = match &input.data {
        Data::Struct(data) => encode_struct_fields(&data.fields),
        Data::Enum(data) => encode_enum(data)?,
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Encode cannot be derived for unions",
            ))
        }
    };

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::golcode::Encode for #name #ty_generics #where_clause {
            fn encode<__S: ::golcode::Serializer>(
                &self,
                serializer: &mut __S,
            ) -> ::golcode::WriteResult<()> {
                #body
                ::core::result::Result::Ok(())
            }
        }
    })
}

fn encode_struct_fields(fields: &Fields) -> TokenStream2 {
    match fields {
        Fields::Named(named) => {
            let fields = named.named.iter().map(|field| {
                let ident = field.ident.as_ref().unwrap();
                quote! { ::golcode::Encode::encode(&self.#ident, serializer)?; }
            });
            quote! { #(#fields)* }
        }
        Fields::Unnamed(unnamed) => {
            let fields = (0..unnamed.unnamed.len()).map(|i| {
                let index = Index::from(i);
                quote! { ::golcode::Encode::encode(&self.#index, serializer)?; }
            });
            quote! { #(#fields)* }
        }
        Fields::Unit => quote! {},
    }
}

fn encode_enum(data: &DataEnum) -> syn::Result<TokenStream2> {
    if data.variants.is_empty() {
        // no values to encode; make the match exhaustive over the empty type
        return Ok(quote! { match *self {} });
    }
    let arms = data
        .variants
        .iter()
        .enumerate()
        .map(|(index, variant)| {
            let index = variant_index(index, variant)?;
            let ident = &variant.ident;
            let arm = match &variant.fields {
                Fields::Unit => quote! {
                    Self::#ident => {
                        ::golcode::Serializer::write_u64(serializer, #index)?;
                    }
                },
                Fields::Named(named) => {
                    let names: Vec<&Ident> = named
                        .named
                        .iter()
                        .map(|field| field.ident.as_ref().unwrap())
                        .collect();
                    // rebind so field names cannot shadow `serializer`
                    let bindings: Vec<Ident> = names
                        .iter()
                        .map(|name| format_ident!("__field_{}", name))
                        .collect();
                    quote! {
                        Self::#ident { #(#names: #bindings),* } => {
                            ::golcode::Serializer::write_u64(serializer, #index)?;
                            #( ::golcode::Encode::encode(#bindings, serializer)?; )*
                        }
                    }
                }
                Fields::Unnamed(unnamed) => {
                    let bindings: Vec<Ident> = (0..unnamed.unnamed.len())
                        .map(|i| format_ident!("__field{}", i))
                        .collect();
                    quote! {
                        Self::#ident ( #(#bindings),* ) => {
                            ::golcode::Serializer::write_u64(serializer, #index)?;
                            #( ::golcode::Encode::encode(#bindings, serializer)?; )*
                        }
                    }
                }
            };
            Ok(arm)
        })
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        match self {
            #(#arms)*
        }
    })
}

fn expand_decode(input: DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let generics = add_trait_bounds(input.generics.clone(), parse_quote!(::golcode::Decode));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let body = match &input.data {
        Data::Struct(data) => {
            let value = decode_fields(quote!(Self), &data.fields);
            quote! { ::core::result::Result::Ok(#value) }
        }
        Data::Enum(data) => decode_enum(data)?,
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Decode cannot be derived for unions",
            ))
        }
    };

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::golcode::Decode for #name #ty_generics #where_clause {
            fn decode<__D: ::golcode::Deserializer>(
                deserializer: &mut __D,
            ) -> ::golcode::ReadResult<Self> {
                #body
            }
        }
    })
}

/// Build a `path { .. }` constructor decoding each field in declaration
/// order. Struct expression fields evaluate in written order, so the reads
/// happen in wire order.
fn decode_fields(path: TokenStream2, fields: &Fields) -> TokenStream2 {
    match fields {
        Fields::Named(named) => {
            let fields = named.named.iter().map(|field| {
                let ident = field.ident.as_ref().unwrap();
                quote! { #ident: ::golcode::Decode::decode(deserializer)? }
            });
            quote! { #path { #(#fields),* } }
        }
        Fields::Unnamed(unnamed) => {
            let fields = (0..unnamed.unnamed.len())
                .map(|_| quote! { ::golcode::Decode::decode(deserializer)? });
            quote! { #path ( #(#fields),* ) }
        }
        Fields::Unit => path,
    }
}

fn decode_enum(data: &DataEnum) -> syn::Result<TokenStream2> {
    let arms = data
        .variants
        .iter()
        .enumerate()
        .map(|(index, variant)| {
            let index = variant_index(index, variant)?;
            let ident = &variant.ident;
            let value = decode_fields(quote!(Self::#ident), &variant.fields);
            Ok(quote! { #index => ::core::result::Result::Ok(#value), })
        })
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        let index = ::golcode::Deserializer::read_u64(deserializer)?;
        match index {
            #(#arms)*
            other => ::core::result::Result::Err(::golcode::error::invalid_union_index(other)),
        }
    })
}
