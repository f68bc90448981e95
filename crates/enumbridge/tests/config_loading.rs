mod common;

use std::{path::PathBuf, sync::Arc};

use enumbridge::{EnumProjection, LoadError, Value, load_file, load_str};
use pretty_assertions::assert_eq;

use crate::common::sample_builder;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

#[test]
fn json_description_matches_programmatic_registry() {
    let loaded = load_file(fixture("sample.json")).unwrap().finish();
    let programmatic = sample_builder().finish();
    assert_eq!(loaded.describe(), programmatic.describe());
}

#[test]
fn loaded_bindings_behave_like_declared_ones() {
    let mut p = EnumProjection::new(Arc::new(load_file(fixture("sample.json")).unwrap().finish()));
    let option = p.resolve("SampleNamespace.Option").unwrap();
    let default = p.call(&option, ()).unwrap();
    let expected = p.resolve("SampleNamespace.None").unwrap();
    assert!(p.eq(&default, &expected));
    let in_value = p.resolve("SampleNamespace.InValue").unwrap();
    let two = p.call(&in_value, Value::Int(2)).unwrap();
    assert_eq!(p.repr(&two), "SampleNamespace.InValue.TwoIn");
}

#[test]
fn native_functions_can_be_attached_after_loading() {
    let mut builder = load_str(r#"{"scopes": [{"name": "ns", "enums": [{"name": "Mode", "members": {"Off": 0, "On": 1}}]}]}"#)
        .unwrap();
    let scope = builder.find_scope("ns").unwrap();
    let mode = builder.find_enum("ns.Mode").unwrap();
    builder
        .add_function(
            scope,
            "isOn",
            enumbridge::Signature::new([enumbridge::ParamType::Enum(mode)], enumbridge::ParamType::Bool),
            |args| Ok(enumbridge::NativeValue::Bool(args.enum_raw(0)? == 1)),
        )
        .unwrap();
    let mut p = EnumProjection::new(Arc::new(builder.finish()));
    let is_on = p.resolve("ns.isOn").unwrap();
    let on = p.resolve("ns.On").unwrap();
    assert_eq!(p.call(&is_on, on).unwrap(), Value::Bool(true));
}

#[test]
fn explicit_default_and_nested_scopes() {
    let json = r#"{
        "scopes": [{
            "name": "outer",
            "scopes": [{
                "name": "inner",
                "enums": [{"name": "Level", "members": {"Low": 1, "High": 2}, "default": "High"}]
            }]
        }]
    }"#;
    let mut p = EnumProjection::new(Arc::new(load_str(json).unwrap().finish()));
    let level = p.resolve("outer.inner.Level").unwrap();
    let default = p.call(&level, ()).unwrap();
    assert_eq!(p.repr(&default), "outer.inner.Level.High");
}

#[test]
fn hoisting_collision_in_json_is_a_definition_error() {
    let json = r#"{"scopes": [{"name": "ns", "enums": [
        {"name": "A", "members": {"Same": 0}},
        {"name": "B", "members": {"Same": 1}}
    ]}]}"#;
    let err = load_str(json).unwrap_err();
    assert!(matches!(err, LoadError::Definition(_)));
    assert_eq!(err.to_string(), "invalid binding: 'ns' already defines 'Same'");
}
