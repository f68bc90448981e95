mod common;

use std::{sync::Arc, thread};

use enumbridge::{EnumProjection, Registry, Value};

use crate::common::{UNIX_TIME, sample_registry};

#[test]
fn registry_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Registry>();
    assert_send_sync::<Arc<Registry>>();
}

#[test]
fn projections_on_many_threads_share_one_registry() {
    let registry = sample_registry();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let mut p = EnumProjection::new(registry);
                let option = p.resolve("SampleNamespace.Option").unwrap();
                let unix_time = p.call(&option, Value::Int(2)).unwrap();
                let get_number = p.resolve("SampleNamespace.getNumber").unwrap();
                p.call(&get_number, unix_time).unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), Value::Int(UNIX_TIME));
    }
}
