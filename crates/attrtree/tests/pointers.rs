use std::rc::Rc;
use std::sync::Arc;

use attrtree::{Sentinel, Value, normalize};
use proptest::prelude::*;
use serde::Serialize;

#[derive(Serialize)]
struct Meters(u32);

#[test]
fn nil_pointers_are_nil() {
    assert_eq!(normalize(&None::<Box<i32>>), Value::Sentinel(Sentinel::Nil));
    assert_eq!(normalize(&None::<Rc<String>>), Value::Sentinel(Sentinel::Nil));
    assert_eq!(normalize(&None::<Arc<Vec<u8>>>), Value::Sentinel(Sentinel::Nil));
    assert_eq!(normalize(&None::<&Meters>), Value::Sentinel(Sentinel::Nil));
}

#[test]
fn pointers_dereference() {
    let x = vec![1, 2];
    assert_eq!(normalize(&Box::new(x.clone())), normalize(&x));
    assert_eq!(normalize(&Rc::new(x.clone())), normalize(&x));
    assert_eq!(normalize(&Some(Arc::new(x.clone()))), normalize(&x));
    assert_eq!(normalize(&&&x), normalize(&x));
}

#[test]
fn newtypes_unwrap_one_layer_each() {
    assert_eq!(normalize(&Meters(3)), Value::uint64(3));
    assert_eq!(normalize(&Some(Box::new(Meters(3)))), Value::uint64(3));
}

proptest! {
    #[test]
    fn pointer_round_trip(x in any::<i32>(), s in ".*", v in proptest::collection::vec(any::<u16>(), 0..4)) {
        prop_assert_eq!(normalize(&Box::new(x)), normalize(&x));
        prop_assert_eq!(normalize(&Some(&s)), normalize(&s));
        prop_assert_eq!(normalize(&Rc::new(v.clone())), normalize(&v));
    }
}
