mod common;

use enumbridge::{ConstructorKind, EnumProjection, ExcType, RecordingTracer, TraceEvent, Value};
use pretty_assertions::assert_eq;

use crate::common::sample_registry;

#[test]
fn construction_and_calls_are_recorded() {
    let mut p = EnumProjection::with_tracer(sample_registry(), RecordingTracer::new());
    let option = p.resolve("SampleNamespace.Option").unwrap();
    let unix_time = p.call(&option, Value::Int(2)).unwrap();
    let get_number = p.resolve("SampleNamespace.getNumber").unwrap();
    p.call(&get_number, unix_time).unwrap();

    assert_eq!(
        p.into_tracer().into_events(),
        vec![
            TraceEvent::GetAttr {
                owner: "SampleNamespace".to_owned(),
                attr: "Option".to_owned(),
            },
            TraceEvent::Construct {
                type_name: "SampleNamespace.Option".to_owned(),
                kind: ConstructorKind::FromInt,
                value: 2,
            },
            TraceEvent::GetAttr {
                owner: "SampleNamespace".to_owned(),
                attr: "getNumber".to_owned(),
            },
            TraceEvent::Call {
                function: "getNumber".to_owned(),
                argc: 1,
            },
            TraceEvent::Return {
                function: "getNumber".to_owned(),
            },
        ]
    );
}

#[test]
fn failures_are_recorded_without_return() {
    let mut p = EnumProjection::with_tracer(sample_registry(), RecordingTracer::new());
    let get_number = p.resolve("SampleNamespace.getNumber").unwrap();
    p.tracer_mut().clear();

    p.call(&get_number, Value::Int(1)).unwrap_err();
    let events = p.tracer().events();
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], TraceEvent::Call { argc: 1, .. }));
    assert!(matches!(
        &events[1],
        TraceEvent::Error {
            exc_type: ExcType::TypeError,
            ..
        }
    ));
}

#[test]
fn default_construction_kind_is_reported() {
    let mut p = EnumProjection::with_tracer(sample_registry(), RecordingTracer::new());
    let in_value = p.resolve("SampleNamespace.InValue").unwrap();
    p.tracer_mut().clear();
    p.call(&in_value, ()).unwrap();
    assert_eq!(
        p.tracer().events(),
        &[TraceEvent::Construct {
            type_name: "SampleNamespace.InValue".to_owned(),
            kind: ConstructorKind::Default,
            value: 0,
        }]
    );
    assert_eq!(ConstructorKind::Default.to_string(), "default");
}
