//! Implementation of the Record derive macro.
//!
//! Builds the static field descriptor table of a struct from its named
//! fields, in declaration order, honoring `#[record(...)]` attributes.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Error, Field, Fields, Ident, LitStr, Result};

/// Parsed definition of a struct with `#[derive(Record)]`.
#[derive(Debug)]
pub struct RecordDef {
    /// The struct name.
    pub name: Ident,
    /// Generics from the struct.
    pub generics: syn::Generics,
    /// Data fields in declaration order (state and skipped fields removed).
    pub fields: Vec<RecordFieldDef>,
    /// The member holding the `OperationState`.
    pub state: Ident,
    /// Curated field order from `#[record(expose(...))]`.
    pub expose: Option<Vec<Ident>>,
}

/// Parsed data field.
#[derive(Debug)]
pub struct RecordFieldDef {
    /// The Rust member name.
    pub ident: Ident,
    /// The name reported to persistence code.
    pub column: String,
}

#[derive(Debug, Default)]
struct FieldAttrs {
    state: bool,
    skip: bool,
    rename: Option<String>,
}

/// Parse a `DeriveInput` into a `RecordDef`.
pub fn parse_record(input: &DeriveInput) -> Result<RecordDef> {
    let name = input.ident.clone();
    let generics = input.generics.clone();

    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
            Fields::Unnamed(_) => {
                return Err(Error::new_spanned(
                    &data.fields,
                    "Record requires a struct with named fields",
                ));
            }
            Fields::Unit => Vec::new(),
        },
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                input,
                "Record can only be derived for structs, not enums",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Record can only be derived for structs, not unions",
            ));
        }
    };

    let mut fields = Vec::new();
    let mut state: Option<Ident> = None;
    for field in named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new_spanned(field, "expected named field"))?;
        let attrs = parse_field_attrs(field)?;

        if attrs.state {
            if state.is_some() {
                return Err(Error::new_spanned(
                    field,
                    "only one field may be marked #[record(state)]",
                ));
            }
            state = Some(ident);
            continue;
        }
        if attrs.skip {
            continue;
        }

        let column = attrs.rename.unwrap_or_else(|| member_name(&ident));
        fields.push(RecordFieldDef { ident, column });
    }

    let state = state.ok_or_else(|| {
        Error::new_spanned(
            &input.ident,
            "Record requires one field marked #[record(state)] of type OperationState",
        )
    })?;

    let expose = parse_expose(input)?;
    if let Some(expose) = &expose {
        for ident in expose {
            if !fields.iter().any(|f| f.ident == *ident) {
                return Err(Error::new_spanned(
                    ident,
                    format!("`{ident}` in #[record(expose(...))] is not a data field of this struct"),
                ));
            }
        }
    }

    Ok(RecordDef {
        name,
        generics,
        fields,
        state,
        expose,
    })
}

/// The field name as written, without a raw-identifier prefix.
fn member_name(ident: &Ident) -> String {
    ident.unraw().to_string()
}

/// Parse `#[record(...)]` attributes on a field.
fn parse_field_attrs(field: &Field) -> Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();

    for attr in &field.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            let path = &meta.path;

            if path.is_ident("state") {
                attrs.state = true;
            } else if path.is_ident("skip") {
                attrs.skip = true;
            } else if path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(Error::new_spanned(value, "rename must not be empty"));
                }
                attrs.rename = Some(value.value());
            } else {
                let attr_name = path.to_token_stream().to_string();
                return Err(Error::new_spanned(
                    path,
                    format!(
                        "unknown record attribute `{attr_name}`. \
                         Valid field attributes are: state, skip, rename"
                    ),
                ));
            }

            Ok(())
        })?;
    }

    if attrs.state && (attrs.skip || attrs.rename.is_some()) {
        return Err(Error::new_spanned(
            field,
            "#[record(state)] cannot be combined with skip or rename",
        ));
    }

    Ok(attrs)
}

/// Parse the container attribute `#[record(expose(a, b, ...))]`.
fn parse_expose(input: &DeriveInput) -> Result<Option<Vec<Ident>>> {
    let mut expose = None;

    for attr in &input.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("expose") {
                let mut names = Vec::new();
                meta.parse_nested_meta(|inner| {
                    let ident = inner
                        .path
                        .get_ident()
                        .cloned()
                        .ok_or_else(|| inner.error("expected a field name"))?;
                    names.push(ident);
                    Ok(())
                })?;
                expose = Some(names);
                Ok(())
            } else {
                let attr_name = meta.path.to_token_stream().to_string();
                Err(meta.error(format!(
                    "unknown record attribute `{attr_name}`. Valid struct attributes are: expose"
                )))
            }
        })?;
    }

    Ok(expose)
}

/// Generate the `Record` trait implementation.
pub fn generate_record_impl(def: &RecordDef) -> TokenStream {
    let name = &def.name;
    let state = &def.state;
    let (impl_generics, ty_generics, where_clause) = def.generics.split_for_impl();

    let declared = def.fields.iter().map(field_descriptor);

    let exposed_override = def.expose.as_ref().map(|expose| {
        let curated = expose.iter().filter_map(|ident| {
            def.fields
                .iter()
                .find(|f| f.ident == *ident)
                .map(field_descriptor)
        });
        quote! {
            fn exposed_override(&self) -> ::std::option::Option<::std::vec::Vec<::sqlrecord_core::Field>> {
                ::std::option::Option::Some(::std::vec![#(#curated),*])
            }
        }
    });

    quote! {
        impl #impl_generics ::sqlrecord_core::Record for #name #ty_generics #where_clause {
            fn declared_fields(&self) -> ::std::vec::Vec<::sqlrecord_core::Field> {
                ::std::vec![#(#declared),*]
            }

            #exposed_override

            fn state(&self) -> &::sqlrecord_core::OperationState {
                &self.#state
            }

            fn state_mut(&mut self) -> &mut ::sqlrecord_core::OperationState {
                &mut self.#state
            }
        }
    }
}

fn field_descriptor(field: &RecordFieldDef) -> TokenStream {
    let ident = &field.ident;
    let column = &field.column;
    quote! {
        ::sqlrecord_core::Field::of(#column, &self.#ident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_parse_record_fields_in_order() {
        let input: DeriveInput = parse_quote! {
            struct User {
                id: i64,
                _rev: i64,
                #[record(rename = "display_name")]
                name: String,
                #[record(skip)]
                cache: Vec<u8>,
                #[record(state)]
                state: OperationState,
            }
        };
        let def = parse_record(&input).unwrap();
        let columns: Vec<_> = def.fields.iter().map(|f| f.column.as_str()).collect();
        assert_eq!(columns, vec!["id", "_rev", "display_name"]);
        assert_eq!(def.state, "state");
        assert!(def.expose.is_none());
    }

    #[test]
    fn test_parse_expose_list() {
        let input: DeriveInput = parse_quote! {
            #[record(expose(name, id))]
            struct User {
                id: i64,
                name: String,
                #[record(state)]
                state: OperationState,
            }
        };
        let def = parse_record(&input).unwrap();
        let expose: Vec<String> = def
            .expose
            .unwrap()
            .iter()
            .map(|i| i.to_string())
            .collect();
        assert_eq!(expose, vec!["name", "id"]);
    }

    #[test]
    fn test_expose_unknown_field_is_rejected() {
        let input: DeriveInput = parse_quote! {
            #[record(expose(missing))]
            struct User {
                id: i64,
                #[record(state)]
                state: OperationState,
            }
        };
        assert!(parse_record(&input).is_err());
    }

    #[test]
    fn test_missing_state_is_rejected() {
        let input: DeriveInput = parse_quote! {
            struct User {
                id: i64,
            }
        };
        let err = parse_record(&input).unwrap_err();
        assert!(err.to_string().contains("#[record(state)]"));
    }

    #[test]
    fn test_duplicate_state_is_rejected() {
        let input: DeriveInput = parse_quote! {
            struct User {
                #[record(state)]
                a: OperationState,
                #[record(state)]
                b: OperationState,
            }
        };
        assert!(parse_record(&input).is_err());
    }

    #[test]
    fn test_unknown_attribute_is_rejected() {
        let input: DeriveInput = parse_quote! {
            struct User {
                #[record(primary_key)]
                id: i64,
                #[record(state)]
                state: OperationState,
            }
        };
        let err = parse_record(&input).unwrap_err();
        assert!(err.to_string().contains("unknown record attribute"));
    }

    #[test]
    fn test_enums_are_rejected() {
        let input: DeriveInput = parse_quote! {
            enum Kind { A, B }
        };
        assert!(parse_record(&input).is_err());
    }

    #[test]
    fn test_raw_identifier_name() {
        let ident: Ident = parse_quote!(r#type);
        assert_eq!(member_name(&ident), "type");
    }

    #[test]
    fn test_generated_impl_mentions_override_only_when_exposed() {
        let input: DeriveInput = parse_quote! {
            struct User {
                id: i64,
                #[record(state)]
                state: OperationState,
            }
        };
        let tokens = generate_record_impl(&parse_record(&input).unwrap()).to_string();
        assert!(tokens.contains("declared_fields"));
        assert!(!tokens.contains("exposed_override"));
    }
}
