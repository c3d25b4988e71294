//! ## Crate layout
//! - `core`: the codec runtime: flattening, value mapping, temporal
//!   patterns, and the metadata cache.
//! - `derive`: `#[derive(Record)]` and `#[derive(TableEntity)]` for user
//!   structs.
//!
//! The `prelude` module mirrors the surface a storage adapter uses:
//! construct an [`codec::EntityCodec`], derive `Record`/`TableEntity` on
//! the domain structs, and exchange [`storage::PropertyMap`]s with the
//! row store.

pub use flatrow_core::{
    KEY_SEPARATOR, PARTITION_KEY, ROW_KEY, codec, error, flatten,
    impl_field_value_via_display, mapper, metadata, property, storage, temporal, traits,
};
pub use flatrow_derive::{Record, TableEntity};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
/// the core vocabulary plus the derive macros
///

pub mod prelude {
    pub use flatrow_core::prelude::*;
    pub use flatrow_derive::{Record, TableEntity};
}
