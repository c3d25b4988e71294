use darling::FromDeriveInput;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, Ident, Type};

///
/// EntityOpts
///
/// `#[entity(partition_key = "...", row_key = "...")]` on the struct,
/// naming the two identity source fields.
///

#[derive(FromDeriveInput)]
#[darling(attributes(entity))]
struct EntityOpts {
    ident: Ident,
    generics: syn::Generics,
    partition_key: String,
    row_key: String,
}

// derive_table_entity
pub fn derive_table_entity(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    let opts = match EntityOpts::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(err) => return err.write_errors(),
    };

    let partition_ident = match identity_field(&input, &opts.partition_key, "partition_key") {
        Ok(ident) => ident,
        Err(err) => return err.to_compile_error(),
    };
    let row_ident = match identity_field(&input, &opts.row_key, "row_key") {
        Ok(ident) => ident,
        Err(err) => return err.to_compile_error(),
    };

    let ident = &opts.ident;
    let (impl_generics, ty_generics, where_clause) = opts.generics.split_for_impl();
    let partition_name = &opts.partition_key;
    let row_name = &opts.row_key;

    let restore_body = if partition_ident == row_ident {
        quote! {
            let _ = partition_key;
            self.#row_ident = row_key.to_string();
        }
    } else {
        quote! {
            self.#partition_ident = partition_key.to_string();
            self.#row_ident = row_key.to_string();
        }
    };

    quote! {
        impl #impl_generics ::flatrow::traits::TableEntity for #ident #ty_generics #where_clause {
            const PARTITION_SOURCE: &'static str = #partition_name;
            const ROW_SOURCE: &'static str = #row_name;

            fn partition_key(&self) -> ::std::string::String {
                self.#partition_ident.clone()
            }

            fn row_key(&self) -> ::std::string::String {
                self.#row_ident.clone()
            }

            fn restore_keys(&mut self, partition_key: &str, row_key: &str) {
                #restore_body
            }
        }
    }
}

/// Resolve an identity source name to a `String` field of the struct.
fn identity_field(input: &DeriveInput, name: &str, attr: &str) -> Result<Ident, Error> {
    let Data::Struct(data) = &input.data else {
        return Err(Error::new_spanned(
            &input.ident,
            "TableEntity can only be derived for structs with named fields",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(Error::new_spanned(
            &data.fields,
            "TableEntity can only be derived for structs with named fields",
        ));
    };

    let field = named
        .named
        .iter()
        .find(|field| field.ident.as_ref().is_some_and(|ident| ident == name))
        .ok_or_else(|| {
            Error::new_spanned(
                &input.ident,
                format!("{attr} names no field `{name}` on this struct"),
            )
        })?;

    if !is_string(&field.ty) {
        return Err(Error::new_spanned(
            &field.ty,
            format!("{attr} source field `{name}` must be a String"),
        ));
    }

    Ok(field.ident.clone().expect("named field"))
}

fn is_string(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };

    path.path
        .segments
        .last()
        .is_some_and(|segment| segment.ident == "String")
}

///
/// TESTS
///
