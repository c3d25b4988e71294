use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields};

// derive_record
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = if let Data::Struct(data) = &input.data {
        if let Fields::Named(named) = &data.fields {
            &named.named
        } else {
            let err = Error::new_spanned(
                &data.fields,
                "Record can only be derived for structs with named fields",
            );
            return err.to_compile_error();
        }
    } else {
        let err = Error::new_spanned(
            &input.ident,
            "Record can only be derived for structs with named fields",
        );
        return err.to_compile_error();
    };

    let declare_stmts = fields.iter().map(|field| {
        let field_ty = &field.ty;
        let field_name = field.ident.as_ref().expect("named field").to_string();

        quote! {
            <#field_ty as ::flatrow::traits::Record>::declare_fields(
                &::flatrow::flatten::join_key(prefix, #field_name)?,
                out,
            )?;
        }
    });

    let node_entries = fields.iter().map(|field| {
        let field_ident = field.ident.as_ref().expect("named field");
        let field_name = field_ident.to_string();

        quote! {
            (
                #field_name.to_string(),
                ::flatrow::traits::Record::to_node(&self.#field_ident),
            ),
        }
    });

    let from_fields = fields.iter().map(|field| {
        let field_ident = field.ident.as_ref().expect("named field");
        let field_name = field_ident.to_string();

        quote! {
            #field_ident: ::flatrow::traits::Record::from_node(
                node.and_then(|n| n.get(#field_name)),
            ),
        }
    });

    quote! {
        impl #impl_generics ::flatrow::traits::Record for #ident #ty_generics #where_clause {
            fn declare_fields(
                prefix: &str,
                out: &mut ::std::vec::Vec<::flatrow::metadata::FieldDeclaration>,
            ) -> ::std::result::Result<(), ::flatrow::error::CodecError> {
                #(#declare_stmts)*
                Ok(())
            }

            fn to_node(&self) -> ::flatrow::property::PropertyNode {
                ::flatrow::property::PropertyNode::Object(vec![
                    #(#node_entries)*
                ])
            }

            fn from_node(
                node: ::std::option::Option<&::flatrow::property::PropertyNode>,
            ) -> Self {
                Self {
                    #(#from_fields)*
                }
            }
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_struct_expands_to_record_impl() {
        let out = derive_record(quote! {
            struct Point {
                x: f64,
                y: f64,
            }
        });

        let rendered = out.to_string();
        assert!(rendered.contains("impl :: flatrow :: traits :: Record for Point"));
        assert!(rendered.contains("join_key"));
        assert!(!rendered.contains("compile_error"));
    }

    #[test]
    fn enums_are_rejected() {
        let out = derive_record(quote! {
            enum Shape {
                Circle,
            }
        });
        assert!(out.to_string().contains("compile_error"));
    }

    #[test]
    fn tuple_structs_are_rejected() {
        let out = derive_record(quote! {
            struct Pair(i32, i32);
        });
        assert!(out.to_string().contains("compile_error"));
    }
}
