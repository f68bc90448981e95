//! Tracing hooks for the host surface.
//!
//! [`EnumProjection`](crate::EnumProjection) is parameterized over a
//! [`BindingTracer`], so the default [`NoopTracer`] compiles away entirely via
//! monomorphization.
//!
//! | Tracer | Purpose |
//! |--------|---------|
//! | [`NoopTracer`] | Zero-cost no-op (default) |
//! | [`StderrTracer`] | Human-readable log of lookups, constructions and calls on stderr |
//! | [`RecordingTracer`] | Captures every event for assertions or post-mortem inspection |
//!
//! ```
//! use std::sync::Arc;
//!
//! use enumbridge::{EnumDef, EnumProjection, RecordingTracer, RegistryBuilder, TraceEvent};
//!
//! let mut builder = RegistryBuilder::new();
//! let scope = builder.add_scope(None, "SampleNamespace").unwrap();
//! builder.add_enum(scope, EnumDef::new("Option", [("None", 0), ("RandomNumber", 1)])).unwrap();
//! let registry = Arc::new(builder.finish());
//!
//! let mut projection = EnumProjection::with_tracer(registry, RecordingTracer::new());
//! let option = projection.resolve("SampleNamespace.Option").unwrap();
//! projection.call(&option, ()).unwrap();
//! assert!(matches!(projection.tracer().events().last(), Some(TraceEvent::Construct { .. })));
//! ```

use crate::{
    exception::{ExcType, Exception},
    types::ConstructorKind,
};

/// Trace event captured by [`RecordingTracer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// `owner.attr` was looked up.
    GetAttr { owner: String, attr: String },
    /// An enum instance was constructed.
    Construct {
        /// Qualified enum name.
        type_name: String,
        kind: ConstructorKind,
        value: i64,
    },
    /// A native function was entered.
    Call { function: String, argc: usize },
    /// A native function returned successfully.
    Return { function: String },
    /// An operation raised.
    Error {
        exc_type: ExcType,
        message: Option<String>,
    },
}

/// Hooks fired by [`EnumProjection`](crate::EnumProjection).
///
/// All methods have default no-op implementations; implementations override
/// only the hooks they care about.
pub trait BindingTracer: std::fmt::Debug {
    /// Called for every attribute lookup, before it is resolved.
    #[inline(always)]
    fn on_getattr(&mut self, _owner: &str, _attr: &str) {}

    /// Called after an enum instance has been constructed.
    #[inline(always)]
    fn on_construct(&mut self, _type_name: &str, _kind: ConstructorKind, _value: i64) {}

    /// Called before a native function body runs (and before its arguments are checked).
    #[inline(always)]
    fn on_call(&mut self, _function: &str, _argc: usize) {}

    /// Called after a native function returned and its result was marshaled.
    #[inline(always)]
    fn on_return(&mut self, _function: &str) {}

    /// Called whenever an operation on the host surface raises.
    #[inline(always)]
    fn on_error(&mut self, _exc: &Exception) {}
}

/// A tracer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl BindingTracer for NoopTracer {}

/// Tracer that prints a human-readable log to stderr.
///
/// Output format:
/// ```text
/// [enumbridge] getattr SampleNamespace.getNumber
/// [enumbridge]   >>> CALL getNumber argc=1
/// [enumbridge]   !!! TypeError: 'getNumber' called with wrong argument types: ...
/// [enumbridge] construct SampleNamespace.Option fromint -> 1
/// ```
#[derive(Debug, Default)]
pub struct StderrTracer {
    /// Skip `getattr` lines, which dominate the output of attribute-heavy callers.
    quiet_lookups: bool,
}

impl StderrTracer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tracer that logs constructions, calls and errors but not lookups.
    #[must_use]
    pub fn without_lookups() -> Self {
        Self { quiet_lookups: true }
    }
}

impl BindingTracer for StderrTracer {
    fn on_getattr(&mut self, owner: &str, attr: &str) {
        if !self.quiet_lookups {
            eprintln!("[enumbridge] getattr {owner}.{attr}");
        }
    }

    fn on_construct(&mut self, type_name: &str, kind: ConstructorKind, value: i64) {
        eprintln!("[enumbridge] construct {type_name} {kind} -> {value}");
    }

    fn on_call(&mut self, function: &str, argc: usize) {
        eprintln!("[enumbridge]   >>> CALL {function} argc={argc}");
    }

    fn on_return(&mut self, function: &str) {
        eprintln!("[enumbridge]   <<< RETURN {function}");
    }

    fn on_error(&mut self, exc: &Exception) {
        let first_line = exc.to_string();
        let first_line = first_line.lines().next().unwrap_or_default();
        eprintln!("[enumbridge]   !!! {first_line}");
    }
}

/// Tracer that records every event.
///
/// Allocates per event, so use it for tests and short debugging sessions.
#[derive(Debug, Default)]
pub struct RecordingTracer {
    events: Vec<TraceEvent>,
}

impl RecordingTracer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    #[must_use]
    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl BindingTracer for RecordingTracer {
    fn on_getattr(&mut self, owner: &str, attr: &str) {
        self.events.push(TraceEvent::GetAttr {
            owner: owner.to_owned(),
            attr: attr.to_owned(),
        });
    }

    fn on_construct(&mut self, type_name: &str, kind: ConstructorKind, value: i64) {
        self.events.push(TraceEvent::Construct {
            type_name: type_name.to_owned(),
            kind,
            value,
        });
    }

    fn on_call(&mut self, function: &str, argc: usize) {
        self.events.push(TraceEvent::Call {
            function: function.to_owned(),
            argc,
        });
    }

    fn on_return(&mut self, function: &str) {
        self.events.push(TraceEvent::Return {
            function: function.to_owned(),
        });
    }

    fn on_error(&mut self, exc: &Exception) {
        self.events.push(TraceEvent::Error {
            exc_type: exc.exc_type(),
            message: exc.message().map(str::to_owned),
        });
    }
}
