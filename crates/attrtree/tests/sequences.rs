use attrtree::{Attr, Value, normalize, seq_value};
use proptest::prelude::*;

#[test]
fn singleton_unpacks_to_scalar() {
    assert_eq!(seq_value(&["only"], true), Value::string("only"));
    assert_eq!(normalize(&vec!["only".to_string()]), Value::string("only"));
}

#[test]
fn singleton_without_unpack_is_indexed() {
    assert_eq!(
        seq_value(&["only"], false),
        Value::group([Attr::string("0", "only")])
    );
}

#[test]
fn nested_sequences_always_unpack() {
    let v = seq_value(&[vec![7], vec![8, 9]], false);
    assert_eq!(
        v,
        Value::group([
            Attr::int64("0", 7),
            Attr::group("1", [Attr::int64("0", 8), Attr::int64("1", 9)]),
        ])
    );
}

#[test]
fn tuples_are_sequences() {
    assert_eq!(
        normalize(&(1, "a", true)),
        Value::group([
            Attr::int64("0", 1),
            Attr::string("1", "a"),
            Attr::bool("2", true),
        ])
    );
}

#[test]
fn arrays_and_slices_are_sequences() {
    let arr = [1u8, 2, 3];
    assert_eq!(normalize(&arr), normalize(&arr[..]));
    assert_eq!(normalize(&arr).as_group().map(|g| g.len()), Some(3));
}

proptest! {
    #[test]
    fn singleton_equals_element(x in any::<i64>(), s in ".*") {
        prop_assert_eq!(seq_value(&[x], true), normalize(&x));
        prop_assert_eq!(seq_value(&[s.clone()], true), normalize(&s));
    }

    #[test]
    fn long_sequences_are_indexed_in_order(
        items in proptest::collection::vec(any::<String>(), 2..16),
        unpack in any::<bool>(),
    ) {
        let v = seq_value(&items, unpack);
        let group = v.as_group().expect("group");
        prop_assert_eq!(group.len(), items.len());
        for (i, (a, item)) in group.iter().zip(&items).enumerate() {
            prop_assert_eq!(&a.key, &i.to_string());
            prop_assert_eq!(&a.value, &normalize(item));
        }
    }
}
