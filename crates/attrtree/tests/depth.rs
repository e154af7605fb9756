use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, UNIX_EPOCH};

use attrtree::{Normalizer, Options, Sentinel, Value, normalize};
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
struct Node {
    id: u32,
    next: Option<Rc<RefCell<Node>>>,
}

#[derive(Serialize)]
struct Link(Option<Rc<RefCell<Link>>>);

#[test]
fn struct_cycle_terminates() {
    let a = Rc::new(RefCell::new(Node { id: 1, next: None }));
    a.borrow_mut().next = Some(a.clone());

    let v = normalize(&a);
    assert!(matches!(v, Value::Scalar(attrtree::Scalar::Any(_))));
    assert!(v.to_string().contains("<truncated>"));

    a.borrow_mut().next = None;
}

#[test]
fn newtype_cycle_terminates() {
    let a = Rc::new(RefCell::new(Link(None)));
    a.borrow_mut().0 = Some(a.clone());

    assert_eq!(normalize(&a), Value::Sentinel(Sentinel::Truncated));

    a.borrow_mut().0 = None;
}

#[test]
fn limit_applies_to_nesting() {
    let doc = json!([[[[[1, 2]]]]]);
    let shallow = Normalizer::new(Options::default().with_max_depth(Some(3)));
    assert_eq!(shallow.normalize(&doc), Value::Sentinel(Sentinel::Truncated));

    let unlimited = Normalizer::new(Options::default().with_max_depth(None));
    assert_eq!(unlimited.normalize(&doc), normalize(&json!([1, 2])));
}

#[test]
fn truncation_is_local_to_the_branch() {
    let doc = json!({"flat": 1, "deep": {"a": {"b": 2}}});
    let n = Normalizer::new(Options::default().with_max_depth(Some(2)));
    let v = n.normalize(&doc);
    assert_eq!(v.get("flat"), Some(&Value::uint64(1)));
    assert_eq!(
        v.get("deep").and_then(|d| d.get("a")),
        Some(&Value::Sentinel(Sentinel::Truncated))
    );
}

#[test]
fn zero_depth_keeps_scalars() {
    let n = Normalizer::new(Options::default().with_max_depth(Some(0)));
    assert_eq!(n.normalize(&5), Value::int64(5));
    assert_eq!(n.normalize(&vec![1, 2]), Value::Sentinel(Sentinel::Truncated));
}

#[derive(Serialize)]
struct Meters(u32);

#[test]
fn leaves_behind_pointers_survive_the_limit() {
    let n = Normalizer::new(Options::default().with_max_depth(Some(0)));
    assert_eq!(n.normalize(&Some(5)), Value::int64(5));
    assert_eq!(n.normalize(&Some(Some("x"))), Value::string("x"));
    assert_eq!(n.normalize(&Meters(3)), Value::uint64(3));
    assert_eq!(
        n.normalize(&Duration::from_secs(1)),
        Value::duration(Duration::from_secs(1))
    );
    assert_eq!(
        n.normalize(&Some(Duration::from_millis(2))),
        Value::duration(Duration::from_millis(2))
    );
    let at = UNIX_EPOCH + Duration::from_secs(60);
    assert_eq!(n.normalize(&at), normalize(&at));
    assert_eq!(n.normalize(&Some(vec![1])), Value::Sentinel(Sentinel::Truncated));
}

#[test]
fn pointer_round_trip_holds_at_the_limit() {
    let n = Normalizer::new(Options::default().with_max_depth(Some(1)));
    let rows = vec![vec![1, 2]];
    let boxed: Vec<Option<Box<Vec<i32>>>> = vec![Some(Box::new(vec![1, 2]))];
    assert_eq!(n.normalize(&rows), n.normalize(&boxed));
    assert_eq!(n.normalize(&rows), Value::Sentinel(Sentinel::Truncated));
}

#[test]
fn opaque_values_are_truncated_natively() {
    let n = Normalizer::new(Options::default().with_max_depth(Some(2)));
    let v = n.normalize(&Node {
        id: 1,
        next: Some(Rc::new(RefCell::new(Node { id: 2, next: None }))),
    });
    assert_eq!(
        v,
        Value::opaque(json!({"id": 1, "next": {"id": 2, "next": null}}))
    );

    let n = Normalizer::new(Options::default().with_max_depth(Some(1)));
    let v = n.normalize(&Node {
        id: 1,
        next: Some(Rc::new(RefCell::new(Node { id: 2, next: None }))),
    });
    assert_eq!(v, Value::opaque(json!({"id": 1, "next": "<truncated>"})));
}
