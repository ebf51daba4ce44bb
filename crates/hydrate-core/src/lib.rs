//! # hydrate-core — Type-Directed Object Construction
//!
//! This crate is the generic half of Hydrate: an engine that builds
//! strongly-typed object graphs out of loosely-typed decoded data
//! (`serde_json::Value` trees) by consulting declarative per-type
//! parameter metadata. It knows nothing about any particular domain;
//! domain rules subscribe to its event pipeline and steer resolution from
//! the outside.
//!
//! ## Key Design Principles
//!
//! 1. **Metadata over reflection.** A [`TypeMetadataProvider`] hands the
//!    engine ordered [`ParameterMetadata`] per type — hand-written tables
//!    or generated ones, the engine cannot tell the difference.
//!
//! 2. **Candidate order is policy.** Each parameter lists its acceptable
//!    types in order; the first candidate that succeeds wins and nothing
//!    else is tried.
//!
//! 3. **Events as mailboxes.** Four interception points
//!    ([`BeforeParamsResolution`], [`BeforeParamResolution`],
//!    [`BeforeValueResolution`], [`AfterParamsResolution`]) let
//!    subscribers rewrite values, swap representations, or short-circuit
//!    with a finished instance.
//!
//! 4. **Deterministic failures.** Every failed candidate is recorded;
//!    exhausting a parameter's candidates produces an
//!    [`InstantiationError`] that names the parameter and chains nested
//!    failures into a root-to-leaf trail.
//!
//! ## Crate Policy
//!
//! - No dependencies on other hydrate crates (this is the leaf).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod args;
pub mod construct;
pub mod error;
pub mod events;
pub mod metadata;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use args::Arguments;
pub use construct::Constructor;
pub use error::{ConstructError, InstantiationError};
pub use events::{
    AfterParamsResolution, BeforeParamResolution, BeforeParamsResolution, BeforeValueResolution,
    EventBus,
};
pub use metadata::{
    CandidateType, Container, ParameterMetadata, TypeDescriptor, TypeMetadataProvider, TypeRef,
};
pub use value::{record_from_object, Instance, ParamMap, Slot};
