//! # hydrate-schema — JSON Schema 2020-12 Document Model
//!
//! The domain half of Hydrate: a recursive tree of schema nodes covering
//! the full 2020-12 vocabulary, materialized from decoded JSON values by
//! the `hydrate-core` engine.
//!
//! ## Key Design Principles
//!
//! 1. **One node type.** [`Schema`] is a cheap `Rc` handle; vocabulary
//!    fields live in composed per-vocabulary groups behind it. Boolean
//!    schemas are nodes with a flag, not a separate type.
//!
//! 2. **References resolve through parent links.** Each nested node keeps
//!    a non-owning back-link to its container; `$ref` walks to the root
//!    and descends the pointer path. Accessors read through exactly one
//!    level of indirection, so recursive documents cannot loop a read.
//!
//! 3. **The engine stays domain-blind.** Everything schema-specific —
//!    `$`-keyword renaming, the `const: null` sentinel, boolean
//!    subschemas, the `items` single-vs-tuple ambiguity — lives in event
//!    subscribers registered by [`SchemaFactory`].
//!
//! 4. **Representation round-trips.** `serialize ∘ deserialize` is the
//!    identity on documents, modulo key order; boolean schemas serialize
//!    to bare booleans and the empty schema to `{}`.
//!
//! This crate models schema documents; it does not validate instances
//! against them.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod factory;
pub mod keyword;
pub mod node;
pub mod path;
pub mod registry;
mod rules;
pub mod vocabulary;

// Re-export primary types for ergonomic imports.
pub use error::SchemaError;
pub use factory::SchemaFactory;
pub use keyword::{ConstKeyword, Items, SchemaType, TypeKeyword};
pub use node::{Schema, SchemaParts};
pub use path::PathValue;
pub use registry::{SchemaMetadataProvider, SCHEMA_TYPE};
