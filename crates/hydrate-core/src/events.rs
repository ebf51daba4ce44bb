//! # Construction Events — The Extension Pipeline
//!
//! The engine publishes four events while constructing a type. Each event
//! is a mailbox: handlers mutate sanctioned fields on it (a replacement
//! value, a replacement parameter map, a finished instance) instead of
//! returning values. The engine reads the mailbox after dispatch. This is
//! what lets domain rules skip remaining resolution or swap
//! representations without the engine knowing anything about the domain.
//!
//! Handlers for one event kind run in subscription order. A handler also
//! receives the constructor itself, so it can recursively construct values
//! as part of its rewrite. There is no unsubscription: a bus is assembled
//! once and moved into the constructor it serves.

use std::rc::Rc;

use crate::construct::Constructor;
use crate::error::ConstructError;
use crate::metadata::{CandidateType, ParameterMetadata, TypeDescriptor};
use crate::value::{Instance, ParamMap, Slot};

/// Fired before any parameter of a type is resolved.
///
/// Handlers may rewrite the whole parameter map or supply a finished
/// instance, which short-circuits resolution entirely.
pub struct BeforeParamsResolution {
    descriptor: Rc<TypeDescriptor>,
    original: ParamMap,
    replacement: Option<ParamMap>,
    instance: Option<Instance>,
}

impl BeforeParamsResolution {
    pub(crate) fn new(descriptor: Rc<TypeDescriptor>, original: ParamMap) -> Self {
        BeforeParamsResolution {
            descriptor,
            original,
            replacement: None,
            instance: None,
        }
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn original_params(&self) -> &ParamMap {
        &self.original
    }

    /// The effective parameter map: the latest replacement, or the
    /// original when no handler rewrote it.
    pub fn params(&self) -> &ParamMap {
        self.replacement.as_ref().unwrap_or(&self.original)
    }

    pub fn set_params(&mut self, params: ParamMap) {
        self.replacement = Some(params);
    }

    /// Supply a finished instance; the engine returns it unconditionally.
    pub fn set_instance(&mut self, instance: Instance) {
        self.instance = Some(instance);
    }

    pub fn has_instance(&self) -> bool {
        self.instance.is_some()
    }

    pub(crate) fn take_instance(&mut self) -> Option<Instance> {
        self.instance.take()
    }

    pub(crate) fn into_params(self) -> ParamMap {
        self.replacement.unwrap_or(self.original)
    }
}

/// Fired once per composite parameter, before its candidate types are
/// tried. Handlers may replace the raw value.
pub struct BeforeParamResolution {
    metadata: Rc<ParameterMetadata>,
    original: Slot,
    replacement: Option<Slot>,
}

impl BeforeParamResolution {
    pub(crate) fn new(metadata: Rc<ParameterMetadata>, original: Slot) -> Self {
        BeforeParamResolution {
            metadata,
            original,
            replacement: None,
        }
    }

    pub fn metadata(&self) -> &ParameterMetadata {
        &self.metadata
    }

    pub fn original_value(&self) -> &Slot {
        &self.original
    }

    /// The effective value: the latest replacement, or the original.
    pub fn value(&self) -> &Slot {
        self.replacement.as_ref().unwrap_or(&self.original)
    }

    pub fn set_value(&mut self, value: Slot) {
        self.replacement = Some(value);
    }

    pub(crate) fn into_value(self) -> Slot {
        self.replacement.unwrap_or(self.original)
    }
}

/// Fired immediately before a value is matched against one candidate
/// type — on the whole value for scalar candidates, per element for list
/// and map candidates. Handlers may replace the value; the original stays
/// readable even after a replacement, so detection rules can keep keying
/// off the raw data.
pub struct BeforeValueResolution {
    metadata: Rc<ParameterMetadata>,
    candidate: CandidateType,
    original: Slot,
    replacement: Option<Slot>,
}

impl BeforeValueResolution {
    pub(crate) fn new(
        metadata: Rc<ParameterMetadata>,
        candidate: CandidateType,
        original: Slot,
    ) -> Self {
        BeforeValueResolution {
            metadata,
            candidate,
            original,
            replacement: None,
        }
    }

    pub fn metadata(&self) -> &ParameterMetadata {
        &self.metadata
    }

    /// The candidate type about to be attempted.
    pub fn candidate(&self) -> &CandidateType {
        &self.candidate
    }

    pub fn original_value(&self) -> &Slot {
        &self.original
    }

    pub fn value(&self) -> &Slot {
        self.replacement.as_ref().unwrap_or(&self.original)
    }

    pub fn set_value(&mut self, value: Slot) {
        self.replacement = Some(value);
    }

    pub(crate) fn into_value(self) -> Slot {
        self.replacement.unwrap_or(self.original)
    }
}

/// Fired after all parameters are resolved and merged, before the type's
/// `invoke` runs. Handlers may edit the final arguments or supply a
/// finished instance.
pub struct AfterParamsResolution {
    descriptor: Rc<TypeDescriptor>,
    original: ParamMap,
    replacement: Option<ParamMap>,
    instance: Option<Instance>,
}

impl AfterParamsResolution {
    pub(crate) fn new(descriptor: Rc<TypeDescriptor>, original: ParamMap) -> Self {
        AfterParamsResolution {
            descriptor,
            original,
            replacement: None,
            instance: None,
        }
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn params(&self) -> &ParamMap {
        self.replacement.as_ref().unwrap_or(&self.original)
    }

    pub fn set_params(&mut self, params: ParamMap) {
        self.replacement = Some(params);
    }

    pub fn set_instance(&mut self, instance: Instance) {
        self.instance = Some(instance);
    }

    pub fn has_instance(&self) -> bool {
        self.instance.is_some()
    }

    pub(crate) fn take_instance(&mut self) -> Option<Instance> {
        self.instance.take()
    }

    pub(crate) fn into_params(self) -> ParamMap {
        self.replacement.unwrap_or(self.original)
    }
}

type Handler<E> = Box<dyn Fn(&Constructor, &mut E) -> Result<(), ConstructError>>;

/// Minimal typed publish/subscribe register for construction events.
#[derive(Default)]
pub struct EventBus {
    before_params: Vec<Handler<BeforeParamsResolution>>,
    before_param: Vec<Handler<BeforeParamResolution>>,
    before_value: Vec<Handler<BeforeValueResolution>>,
    after_params: Vec<Handler<AfterParamsResolution>>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus::default()
    }

    pub fn on_before_params(
        &mut self,
        handler: impl Fn(&Constructor, &mut BeforeParamsResolution) -> Result<(), ConstructError>
            + 'static,
    ) {
        self.before_params.push(Box::new(handler));
    }

    pub fn on_before_param(
        &mut self,
        handler: impl Fn(&Constructor, &mut BeforeParamResolution) -> Result<(), ConstructError>
            + 'static,
    ) {
        self.before_param.push(Box::new(handler));
    }

    pub fn on_before_value(
        &mut self,
        handler: impl Fn(&Constructor, &mut BeforeValueResolution) -> Result<(), ConstructError>
            + 'static,
    ) {
        self.before_value.push(Box::new(handler));
    }

    pub fn on_after_params(
        &mut self,
        handler: impl Fn(&Constructor, &mut AfterParamsResolution) -> Result<(), ConstructError>
            + 'static,
    ) {
        self.after_params.push(Box::new(handler));
    }

    pub(crate) fn publish_before_params(
        &self,
        constructor: &Constructor,
        event: &mut BeforeParamsResolution,
    ) -> Result<(), ConstructError> {
        for handler in &self.before_params {
            handler(constructor, event)?;
        }
        Ok(())
    }

    pub(crate) fn publish_before_param(
        &self,
        constructor: &Constructor,
        event: &mut BeforeParamResolution,
    ) -> Result<(), ConstructError> {
        for handler in &self.before_param {
            handler(constructor, event)?;
        }
        Ok(())
    }

    pub(crate) fn publish_before_value(
        &self,
        constructor: &Constructor,
        event: &mut BeforeValueResolution,
    ) -> Result<(), ConstructError> {
        for handler in &self.before_value {
            handler(constructor, event)?;
        }
        Ok(())
    }

    pub(crate) fn publish_after_params(
        &self,
        constructor: &Constructor,
        event: &mut AfterParamsResolution,
    ) -> Result<(), ConstructError> {
        for handler in &self.after_params {
            handler(constructor, event)?;
        }
        Ok(())
    }
}
