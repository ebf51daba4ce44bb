//! # Parameter Metadata — Declarative Construction Contracts
//!
//! A constructible type is described by a [`TypeDescriptor`]: its ordered
//! constructor parameters, an `invoke` function that builds an instance
//! from merged arguments, and an `is_instance` probe used to pass
//! already-built values through untouched.
//!
//! Descriptors come from a [`TypeMetadataProvider`] — hand-written tables
//! in the consuming crate, or generated ones; the engine does not care.
//! Providers must be deterministic and side-effect-free: the engine caches
//! each descriptor per type name for the process lifetime.
//!
//! ## Candidate order
//!
//! The order of [`ParameterMetadata::candidates`] is the complete
//! disambiguation policy: candidates are tried first to last and the first
//! success wins. There is no scoring or best-fit pass.

use std::rc::Rc;

use serde_json::Value;

use crate::args::Arguments;
use crate::error::ConstructError;
use crate::value::Instance;

/// How a candidate type contains its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// A single value of the target type.
    Scalar,
    /// A list of values of the target type.
    List,
    /// A string-keyed map whose values are of the target type.
    Map,
}

/// What a candidate type resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A language primitive: accepted as-is, never constructed.
    Primitive,
    /// A composite type, constructed recursively under the given name.
    Composite(String),
}

/// One of the ordered types a parameter may accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateType {
    pub target: TypeRef,
    pub container: Container,
}

impl CandidateType {
    pub fn primitive() -> Self {
        CandidateType {
            target: TypeRef::Primitive,
            container: Container::Scalar,
        }
    }

    pub fn composite(name: impl Into<String>) -> Self {
        CandidateType {
            target: TypeRef::Composite(name.into()),
            container: Container::Scalar,
        }
    }

    pub fn list_of(name: impl Into<String>) -> Self {
        CandidateType {
            target: TypeRef::Composite(name.into()),
            container: Container::List,
        }
    }

    pub fn map_of(name: impl Into<String>) -> Self {
        CandidateType {
            target: TypeRef::Composite(name.into()),
            container: Container::Map,
        }
    }

    /// True when this candidate targets the named composite type with the
    /// given containment.
    pub fn is(&self, name: &str, container: Container) -> bool {
        self.container == container
            && matches!(&self.target, TypeRef::Composite(target) if target == name)
    }
}

/// Declarative metadata for one constructor parameter.
#[derive(Debug, Clone)]
pub struct ParameterMetadata {
    name: String,
    candidates: Vec<CandidateType>,
    nullable: bool,
    default: Option<Value>,
}

impl ParameterMetadata {
    pub fn new(name: impl Into<String>, candidates: Vec<CandidateType>) -> Self {
        ParameterMetadata {
            name: name.into(),
            candidates,
            nullable: false,
            default: None,
        }
    }

    /// Mark the parameter as accepting an explicit null.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Value used when the parameter is absent from the raw map.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn candidates(&self) -> &[CandidateType] {
        &self.candidates
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// True when at least one candidate is a composite type, i.e. the
    /// parameter takes part in the recursive resolution loop.
    pub fn is_composite(&self) -> bool {
        self.candidates
            .iter()
            .any(|candidate| matches!(candidate.target, TypeRef::Composite(_)))
    }

    /// True when some candidate targets the named composite type with the
    /// given containment.
    pub fn accepts(&self, name: &str, container: Container) -> bool {
        self.candidates
            .iter()
            .any(|candidate| candidate.is(name, container))
    }
}

/// Everything the engine needs to construct one type.
pub struct TypeDescriptor {
    name: String,
    parameters: Vec<Rc<ParameterMetadata>>,
    invoke: fn(Arguments) -> Result<Instance, ConstructError>,
    is_instance: fn(&Instance) -> bool,
}

impl TypeDescriptor {
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<ParameterMetadata>,
        invoke: fn(Arguments) -> Result<Instance, ConstructError>,
        is_instance: fn(&Instance) -> bool,
    ) -> Self {
        TypeDescriptor {
            name: name.into(),
            parameters: parameters.into_iter().map(Rc::new).collect(),
            invoke,
            is_instance,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Constructor parameters in declaration order.
    pub fn parameters(&self) -> &[Rc<ParameterMetadata>] {
        &self.parameters
    }

    /// Build an instance from merged arguments.
    pub fn invoke(&self, args: Arguments) -> Result<Instance, ConstructError> {
        (self.invoke)(args)
    }

    /// Probe whether an opaque instance already is this type.
    pub fn is_instance(&self, instance: &Instance) -> bool {
        (self.is_instance)(instance)
    }
}

impl std::fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("parameters", &self.parameters.len())
            .finish()
    }
}

/// Source of type descriptors, supplied by the consuming crate.
///
/// Implementations must be deterministic: the engine caches the returned
/// descriptor per type name and never asks again.
pub trait TypeMetadataProvider {
    fn describe(&self, type_name: &str) -> Option<Rc<TypeDescriptor>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_detection() {
        let primitive = ParameterMetadata::new("title", vec![CandidateType::primitive()]);
        assert!(!primitive.is_composite());

        let mixed = ParameterMetadata::new(
            "items",
            vec![CandidateType::list_of("schema"), CandidateType::composite("schema")],
        );
        assert!(mixed.is_composite());
        assert!(mixed.accepts("schema", Container::Scalar));
        assert!(mixed.accepts("schema", Container::List));
        assert!(!mixed.accepts("schema", Container::Map));
        assert!(!mixed.accepts("other", Container::Scalar));
    }

    #[test]
    fn test_builder_flags() {
        let meta = ParameterMetadata::new("deprecated", vec![CandidateType::primitive()])
            .nullable()
            .with_default(Value::Bool(false));
        assert!(meta.is_nullable());
        assert_eq!(meta.default(), Some(&Value::Bool(false)));
    }
}
