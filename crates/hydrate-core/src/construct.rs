//! # Constructor — Recursive Type-Directed Resolution
//!
//! The engine that turns a raw parameter map into an instance of a target
//! type. For every composite parameter it walks the declared candidate
//! types in order and takes the first one that succeeds; composite values
//! recurse through the same entry point, so nested documents become nested
//! object graphs.
//!
//! ## Resolution order
//!
//! Candidate declaration order is the whole disambiguation policy. There
//! is no backtracking across parameters and no retry beyond the declared
//! fallback: failures are deterministic functions of the input.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::args::Arguments;
use crate::error::{ConstructError, InstantiationError};
use crate::events::{
    AfterParamsResolution, BeforeParamResolution, BeforeParamsResolution, BeforeValueResolution,
    EventBus,
};
use crate::metadata::{
    CandidateType, Container, ParameterMetadata, TypeDescriptor, TypeMetadataProvider, TypeRef,
};
use crate::value::{Instance, ParamMap, Slot};

/// Type-directed object constructor.
///
/// Holds the metadata provider, the event bus, and the per-type
/// descriptor cache (append-only, keyed by type name — the engine's only
/// shared mutable state).
pub struct Constructor {
    provider: Box<dyn TypeMetadataProvider>,
    bus: EventBus,
    cache: RefCell<HashMap<String, Rc<TypeDescriptor>>>,
}

impl Constructor {
    pub fn new(provider: Box<dyn TypeMetadataProvider>, bus: EventBus) -> Self {
        Constructor {
            provider,
            bus,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Construct an instance of `type_name` from a raw parameter map.
    ///
    /// # Errors
    ///
    /// Fails with [`ConstructError::UnknownType`] when the provider has no
    /// descriptor for the name, and with
    /// [`ConstructError::Instantiation`] when no candidate type of some
    /// parameter could be satisfied.
    pub fn construct(&self, type_name: &str, params: ParamMap) -> Result<Instance, ConstructError> {
        let descriptor = self.descriptor(type_name)?;
        trace!(type_name, params = params.len(), "constructing");

        let mut event = BeforeParamsResolution::new(descriptor.clone(), params);
        self.bus.publish_before_params(self, &mut event)?;
        if let Some(instance) = event.take_instance() {
            return Ok(instance);
        }
        let params = event.into_params();

        let merged = self.resolve_parameters(&descriptor, params)?;

        let mut event = AfterParamsResolution::new(descriptor.clone(), merged);
        self.bus.publish_after_params(self, &mut event)?;
        if let Some(instance) = event.take_instance() {
            return Ok(instance);
        }

        descriptor.invoke(Arguments::new(event.into_params()))
    }

    /// Fetch-or-cache the descriptor for a type name.
    pub fn descriptor(&self, type_name: &str) -> Result<Rc<TypeDescriptor>, ConstructError> {
        if let Some(descriptor) = self.cache.borrow().get(type_name) {
            return Ok(descriptor.clone());
        }

        let descriptor = self
            .provider
            .describe(type_name)
            .ok_or_else(|| ConstructError::UnknownType(type_name.into()))?;
        self.cache
            .borrow_mut()
            .insert(type_name.into(), descriptor.clone());
        Ok(descriptor)
    }

    /// Resolve composite parameters and merge the three argument layers:
    /// defaults, then raw values, then resolved composites.
    fn resolve_parameters(
        &self,
        descriptor: &TypeDescriptor,
        mut params: ParamMap,
    ) -> Result<ParamMap, ConstructError> {
        let mut resolved = ParamMap::new();

        for metadata in descriptor.parameters().iter().filter(|m| m.is_composite()) {
            let raw = params
                .get(metadata.name())
                .cloned()
                .unwrap_or_else(Slot::null);

            let mut event = BeforeParamResolution::new(metadata.clone(), raw);
            self.bus.publish_before_param(self, &mut event)?;
            let value = event.into_value();

            if metadata.is_nullable() && value.is_null() {
                resolved.insert(metadata.name().into(), Slot::null());
                continue;
            }

            let slot = self.resolve_value(metadata, value)?;
            resolved.insert(metadata.name().into(), slot);
        }

        // Merge in declaration order; raw keys named by no parameter drop out.
        let mut merged = ParamMap::new();
        for metadata in descriptor.parameters() {
            let slot = resolved
                .shift_remove(metadata.name())
                .or_else(|| params.shift_remove(metadata.name()))
                .or_else(|| metadata.default().cloned().map(Slot::Value))
                .unwrap_or_else(Slot::null);
            merged.insert(metadata.name().into(), slot);
        }

        Ok(merged)
    }

    /// Try each candidate type in declaration order; first success wins.
    fn resolve_value(
        &self,
        metadata: &Rc<ParameterMetadata>,
        value: Slot,
    ) -> Result<Slot, ConstructError> {
        let mut attempts = Vec::new();

        for candidate in metadata.candidates() {
            match self.try_candidate(metadata, candidate, value.clone()) {
                Ok(slot) => return Ok(slot),
                Err(error) => {
                    debug!(
                        parameter = metadata.name(),
                        candidate = ?candidate,
                        %error,
                        "candidate failed"
                    );
                    attempts.push(error);
                }
            }
        }

        Err(InstantiationError::new(metadata.name(), attempts).into())
    }

    fn try_candidate(
        &self,
        metadata: &Rc<ParameterMetadata>,
        candidate: &CandidateType,
        value: Slot,
    ) -> Result<Slot, ConstructError> {
        let type_name = match &candidate.target {
            TypeRef::Primitive => {
                // Primitive coercion is the caller's concern: the value is
                // accepted as-is after the event hook.
                let mut event =
                    BeforeValueResolution::new(metadata.clone(), candidate.clone(), value);
                self.bus.publish_before_value(self, &mut event)?;
                return Ok(event.into_value());
            }
            TypeRef::Composite(name) => name,
        };

        match candidate.container {
            Container::Scalar => {
                let mut event =
                    BeforeValueResolution::new(metadata.clone(), candidate.clone(), value);
                self.bus.publish_before_value(self, &mut event)?;
                self.construct_one(metadata, type_name, event.into_value())
            }
            Container::List => {
                let elements = match value {
                    Slot::Value(Value::Array(items)) => {
                        items.into_iter().map(Slot::Value).collect()
                    }
                    Slot::List(slots) => slots,
                    other => {
                        return Err(ConstructError::Mismatch {
                            parameter: metadata.name().into(),
                            expected: format!("a list of {type_name}"),
                            found: other.describe().into(),
                        })
                    }
                };

                let mut out = Vec::with_capacity(elements.len());
                for element in elements {
                    let mut event =
                        BeforeValueResolution::new(metadata.clone(), candidate.clone(), element);
                    self.bus.publish_before_value(self, &mut event)?;
                    out.push(self.construct_one(metadata, type_name, event.into_value())?);
                }
                Ok(Slot::List(out))
            }
            Container::Map => {
                let shape = value.describe();
                let entries = match value.into_record() {
                    Some(record) => record,
                    None => {
                        return Err(ConstructError::Mismatch {
                            parameter: metadata.name().into(),
                            expected: format!("a map of {type_name}"),
                            found: shape.into(),
                        })
                    }
                };

                let mut out = ParamMap::new();
                for (key, element) in entries {
                    let mut event =
                        BeforeValueResolution::new(metadata.clone(), candidate.clone(), element);
                    self.bus.publish_before_value(self, &mut event)?;
                    out.insert(key, self.construct_one(metadata, type_name, event.into_value())?);
                }
                Ok(Slot::Record(out))
            }
        }
    }

    /// Resolve a single value against a composite type: pass matching
    /// instances through, recursively construct map-shaped data.
    fn construct_one(
        &self,
        metadata: &Rc<ParameterMetadata>,
        type_name: &str,
        value: Slot,
    ) -> Result<Slot, ConstructError> {
        if let Slot::Instance(instance) = &value {
            if self.descriptor(type_name)?.is_instance(instance) {
                return Ok(value);
            }
        }

        let shape = value.describe();
        match value.into_record() {
            Some(record) => self.construct(type_name, record).map(Slot::Instance),
            None => Err(ConstructError::Mismatch {
                parameter: metadata.name().into(),
                expected: format!("a map constructible as {type_name}"),
                found: shape.into(),
            }),
        }
    }
}
