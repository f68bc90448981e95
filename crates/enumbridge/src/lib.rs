#![doc = include_str!("../../../README.md")]
#![expect(clippy::cast_possible_truncation, reason = "float to int truncation matches host int()")]
#![expect(clippy::float_cmp, reason = "host equality compares numbers exactly")]

mod args;
pub mod config;
mod exception;
mod intern;
mod native;
mod projection;
mod registry;
pub mod tracer;
mod types;
mod value;

pub use crate::{
    args::ArgValues,
    config::{BindingSpec, EnumSpec, LoadError, ScopeSpec, load_file, load_str},
    exception::{ExcType, Exception, RunResult},
    native::NativeEnum,
    projection::EnumProjection,
    registry::{DefinitionError, EnumTypeId, FunctionId, MemberId, Registry, RegistryBuilder, ScopeId},
    tracer::{BindingTracer, NoopTracer, RecordingTracer, StderrTracer, TraceEvent},
    types::{
        ConstructorKind, EnumDef, EnumOptions, EnumType, NativeArgs, NativeFunction, NativeValue, ParamType, Scope,
        Signature,
    },
    value::{EnumValue, Value},
};
