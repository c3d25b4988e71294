//! Derive macros for flatrow entity types.

use proc_macro::TokenStream;

mod entity;
mod record;

#[proc_macro_derive(Record)]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input.into()).into()
}

#[proc_macro_derive(TableEntity, attributes(entity))]
pub fn derive_table_entity(input: TokenStream) -> TokenStream {
    entity::derive_table_entity(input.into()).into()
}
