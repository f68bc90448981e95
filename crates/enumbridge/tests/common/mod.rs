//! The `SampleNamespace` bindings shared by the integration tests.
#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::Arc;

use enumbridge::{
    EnumOptions, NativeEnum, NativeValue, ParamType, Registry, RegistryBuilder, Signature, native_enum,
};

native_enum! {
    #[derive(Debug, PartialEq, Eq)]
    pub enum Option {
        None = 0,
        RandomNumber = 1,
        UnixTime = 2,
    }
}

native_enum! {
    #[derive(Debug, PartialEq, Eq)]
    pub enum InValue {
        ZeroIn = 0,
        OneIn = 1,
        TwoIn = 2,
    }
}

native_enum! {
    #[derive(Debug, PartialEq, Eq)]
    pub enum OutValue {
        ZeroOut = 0,
        OneOut = 1,
        TwoOut = 2,
    }
}

/// Stand-ins for the random number and clock the sample library reads.
pub const RANDOM_NUMBER: i64 = 4;
pub const UNIX_TIME: i64 = 1_234_567_890;

pub fn get_number(option: Option) -> i64 {
    match option {
        Option::None => 0,
        Option::RandomNumber => RANDOM_NUMBER,
        Option::UnixTime => UNIX_TIME,
    }
}

pub fn enum_in_enum_out(value: InValue) -> OutValue {
    match value {
        InValue::ZeroIn => OutValue::ZeroOut,
        InValue::OneIn => OutValue::OneOut,
        InValue::TwoIn => OutValue::TwoOut,
    }
}

/// Declares `SampleNamespace` with its three enums and two functions.
pub fn sample_builder() -> RegistryBuilder {
    let mut builder = RegistryBuilder::new();
    let scope = builder.add_scope(None, "SampleNamespace").unwrap();
    let option = builder.add_native_enum::<Option>(scope, EnumOptions::default()).unwrap();
    builder.add_native_enum::<InValue>(scope, EnumOptions::default()).unwrap();
    builder.add_native_enum::<OutValue>(scope, EnumOptions::default()).unwrap();

    builder
        .add_function(
            scope,
            "getNumber",
            Signature::new([ParamType::Enum(option)], ParamType::Int),
            |args| Ok(NativeValue::Int(get_number(args.get_enum::<Option>(0)?))),
        )
        .unwrap();
    builder
        .add_enum_fn(scope, "enumInEnumOut", enum_in_enum_out)
        .unwrap();
    builder
}

pub fn sample_registry() -> Arc<Registry> {
    Arc::new(sample_builder().finish())
}

/// Raw `(name, value)` pairs, for comparing against the registry's view.
pub fn declared_members<E: NativeEnum>() -> Vec<(&'static str, i64)> {
    E::MEMBERS.to_vec()
}
