//! `#[derive(Query)]` for qstring.
//!
//! Expands a struct into a static, declaration-ordered walk over its fields:
//! one `Decoder::field` call and one `Encoder::field` call per field, each
//! passing the field's raw declaration string and name. Key resolution
//! happens at run time in `qstring::tag`.
//!
//! Generated impls: `Unmarshal`, `Marshal`, `QueryField`, and by-value
//! `DecodeTarget` / `EncodeTarget` that reject the record with the
//! "non-pointer" error.
//!
//! With `#[qstring(custom)]` the type must implement `UnmarshalQuery` and
//! `MarshalQuery`; its `QueryField` becomes a custom codec and its `Marshal`
//! defers to `MarshalQuery`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DeriveInput, Error, Fields, Ident, LitStr,
    Type, Visibility,
};

/// Derive the query string codec for a struct.
///
/// Field attribute: `#[qstring("key")]`, `#[qstring("key,omitempty")]` or
/// `#[qstring("-")]`. Container attribute: `#[qstring(custom)]`.
#[proc_macro_derive(Query, attributes(qstring))]
pub fn derive_query(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_query(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

/// A field that takes part in the traversal.
struct QueryFieldDef {
    ident: Ident,
    ty: Type,
    declaration: String,
}

fn expand_query(input: DeriveInput) -> Result<TokenStream2, Error> {
    let custom = parse_container_attrs(&input.attrs)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => Some(collect_fields(named.named.iter())?),
            Fields::Unit => Some(Vec::new()),
            Fields::Unnamed(_) if custom => None,
            Fields::Unnamed(unnamed) => {
                return Err(Error::new(
                    unnamed.span(),
                    "#[derive(Query)] needs named fields; use #[qstring(custom)] for tuple structs",
                ))
            }
        },
        Data::Enum(_) if custom => None,
        Data::Enum(data) => {
            return Err(Error::new(
                data.enum_token.span(),
                "#[derive(Query)] on an enum requires #[qstring(custom)]",
            ))
        }
        Data::Union(data) => {
            return Err(Error::new(
                data.union_token.span(),
                "#[derive(Query)] does not support unions",
            ))
        }
    };

    let ident = &input.ident;
    let mut generics = input.generics.clone();
    if !generics.params.is_empty() {
        let where_clause = generics.make_where_clause();
        for field in fields.iter().flatten() {
            let ty = &field.ty;
            where_clause
                .predicates
                .push(parse_quote!(#ty: ::qstring::QueryField));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let unmarshal = fields.as_deref().map(|fields| {
        let steps = fields.iter().map(|field| {
            let field_ident = &field.ident;
            let declaration = &field.declaration;
            let name = field.ident.unraw().to_string();
            quote! {
                if __decoder.field(&mut self.#field_ident, #declaration, #name)?.is_break() {
                    return ::core::result::Result::Ok(());
                }
            }
        });
        quote! {
            impl #impl_generics ::qstring::Unmarshal for #ident #ty_generics #where_clause {
                #[allow(unused_variables)]
                fn unmarshal_fields(
                    &mut self,
                    data: &::qstring::QueryValues,
                ) -> ::qstring::Result<()> {
                    let __decoder = ::qstring::Decoder::new(data);
                    #(#steps)*
                    ::core::result::Result::Ok(())
                }
            }
        }
    });

    let marshal = if custom {
        quote! {
            impl #impl_generics ::qstring::Marshal for #ident #ty_generics #where_clause {
                fn marshal_fields(&self) -> ::qstring::Result<::qstring::QueryValues> {
                    ::qstring::MarshalQuery::marshal_query(self).map_err(::qstring::QueryError::Custom)
                }
            }
        }
    } else {
        let steps = fields.iter().flatten().map(|field| {
            let field_ident = &field.ident;
            let declaration = &field.declaration;
            let name = field.ident.unraw().to_string();
            quote! {
                __encoder.field(&self.#field_ident, #declaration, #name)?;
            }
        });
        quote! {
            impl #impl_generics ::qstring::Marshal for #ident #ty_generics #where_clause {
                #[allow(unused_mut)]
                fn marshal_fields(&self) -> ::qstring::Result<::qstring::QueryValues> {
                    let mut __encoder = ::qstring::Encoder::new();
                    #(#steps)*
                    ::core::result::Result::Ok(__encoder.finish())
                }
            }
        }
    };

    let query_field = if custom {
        let decode_nested = if fields.is_some() {
            quote!(::qstring::Unmarshal::unmarshal_fields(self, data))
        } else {
            quote!(::core::result::Result::Ok(()))
        };
        quote! {
            impl #impl_generics ::qstring::QueryField for #ident #ty_generics #where_clause {
                const SHAPE: ::qstring::Shape = ::qstring::Shape::CustomCodec;

                fn decode_values(
                    &mut self,
                    values: &[::std::string::String],
                ) -> ::qstring::Result<()> {
                    ::qstring::UnmarshalQuery::unmarshal_query(self, values)
                        .map_err(::qstring::QueryError::Custom)
                }

                #[allow(unused_variables)]
                fn decode_nested(&mut self, data: &::qstring::QueryValues) -> ::qstring::Result<()> {
                    #decode_nested
                }

                fn encode_values(
                    &self,
                    _key: &str,
                    output: &mut ::qstring::QueryValues,
                ) -> ::qstring::Result<()> {
                    output.merge(::qstring::Marshal::marshal_fields(self)?);
                    ::core::result::Result::Ok(())
                }

                fn is_empty_value(&self) -> bool {
                    ::qstring::MarshalQuery::is_empty_query(self)
                }
            }
        }
    } else {
        quote! {
            impl #impl_generics ::qstring::QueryField for #ident #ty_generics #where_clause {
                const SHAPE: ::qstring::Shape = ::qstring::Shape::NestedRecord;

                fn decode_values(
                    &mut self,
                    _values: &[::std::string::String],
                ) -> ::qstring::Result<()> {
                    ::core::result::Result::Ok(())
                }

                fn decode_nested(&mut self, data: &::qstring::QueryValues) -> ::qstring::Result<()> {
                    ::qstring::Unmarshal::unmarshal_fields(self, data)
                }

                fn encode_values(
                    &self,
                    _key: &str,
                    output: &mut ::qstring::QueryValues,
                ) -> ::qstring::Result<()> {
                    output.merge(::qstring::Marshal::marshal_fields(self)?);
                    ::core::result::Result::Ok(())
                }

                fn is_empty_value(&self) -> bool {
                    false
                }
            }
        }
    };

    let targets = quote! {
        impl #impl_generics ::qstring::DecodeTarget for #ident #ty_generics #where_clause {
            fn decode_target(
                &mut self,
            ) -> ::core::result::Result<&mut dyn ::qstring::Unmarshal, ::qstring::InvalidUnmarshalError> {
                ::core::result::Result::Err(::qstring::InvalidUnmarshalError::NonPointer(
                    ::core::any::type_name::<Self>(),
                ))
            }
        }

        impl #impl_generics ::qstring::EncodeTarget for #ident #ty_generics #where_clause {
            fn encode_target(
                &self,
            ) -> ::core::result::Result<&dyn ::qstring::Marshal, ::qstring::InvalidMarshalError> {
                ::core::result::Result::Err(::qstring::InvalidMarshalError::NonPointer(
                    ::core::any::type_name::<Self>(),
                ))
            }
        }
    };

    Ok(quote! {
        #unmarshal
        #marshal
        #query_field
        #targets
    })
}

/// Returns whether `#[qstring(custom)]` is present.
fn parse_container_attrs(attrs: &[Attribute]) -> Result<bool, Error> {
    let mut custom = false;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("qstring")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("custom") {
                custom = true;
                Ok(())
            } else {
                Err(meta.error("unsupported qstring container attribute, expected `custom`"))
            }
        })?;
    }
    Ok(custom)
}

/// Keep the fields that take part: visible (`pub` in any form) and not
/// declared `-`.
fn collect_fields<'a>(
    fields: impl Iterator<Item = &'a syn::Field>,
) -> Result<Vec<QueryFieldDef>, Error> {
    let mut out = Vec::new();
    for field in fields {
        let declaration = field_declaration(field)?;
        if matches!(field.vis, Visibility::Inherited) {
            continue;
        }
        if declaration.split(',').next() == Some("-") {
            continue;
        }
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new(field.span(), "expected a named field"))?;
        out.push(QueryFieldDef {
            ident,
            ty: field.ty.clone(),
            declaration,
        });
    }
    Ok(out)
}

/// The raw declaration string, empty when the field has no attribute.
fn field_declaration(field: &syn::Field) -> Result<String, Error> {
    let mut declaration = None;
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("qstring")) {
        if declaration.is_some() {
            return Err(Error::new(attr.span(), "duplicate #[qstring(..)] attribute"));
        }
        let lit: LitStr = attr.parse_args().map_err(|err| {
            Error::new(
                err.span(),
                "expected a declaration string, e.g. #[qstring(\"name,omitempty\")]",
            )
        })?;
        declaration = Some(lit.value());
    }
    Ok(declaration.unwrap_or_default())
}
