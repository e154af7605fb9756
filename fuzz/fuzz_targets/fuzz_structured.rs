#![no_main]
use arbitrary::Arbitrary;
use attrtree::{Normalizer, Options, Sentinel, Value as Tree};
use libfuzzer_sys::{arbitrary, fuzz_target};
use serde_json::{Number, Value};

const MAX_DEPTH: usize = 8;
const MAX_ARRAY_SIZE: usize = 20;
const MAX_OBJECT_SIZE: usize = 20;

#[derive(Arbitrary, Debug)]
struct FuzzValue {
    choice: u8,
}

impl FuzzValue {
    fn to_json_value(&self, u: &mut arbitrary::Unstructured, depth: usize) -> arbitrary::Result<Value> {
        if depth >= MAX_DEPTH {
            return Ok(Value::Null);
        }

        Ok(match self.choice % 10 {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: i64 = u.arbitrary()?;
                Value::Number(Number::from(n))
            }
            3 => {
                let n: f64 = u.arbitrary()?;
                if n.is_finite() {
                    serde_json::json!(n)
                } else {
                    Value::Null
                }
            }
            4 => {
                let s: String = u.arbitrary()?;
                Value::String(s)
            }
            5..=7 => {
                let size = u.int_in_range(0..=MAX_ARRAY_SIZE)?;
                let mut arr = Vec::with_capacity(size);
                for _ in 0..size {
                    let fv: FuzzValue = u.arbitrary()?;
                    arr.push(fv.to_json_value(u, depth + 1)?);
                }
                Value::Array(arr)
            }
            _ => {
                let size = u.int_in_range(0..=MAX_OBJECT_SIZE)?;
                let mut obj = serde_json::Map::new();
                for _ in 0..size {
                    let key: String = u.arbitrary()?;
                    let fv: FuzzValue = u.arbitrary()?;
                    obj.insert(key, fv.to_json_value(u, depth + 1)?);
                }
                Value::Object(obj)
            }
        })
    }
}

/// Empty containers always come out as sentinels, never as empty groups.
fn check(tree: &Tree) {
    if let Some(members) = tree.as_group() {
        assert!(!members.is_empty(), "empty group in {tree}");
        for m in members {
            check(&m.value);
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let mut u = arbitrary::Unstructured::new(data);

    if let Ok(fv) = u.arbitrary::<FuzzValue>() {
        if let Ok(value) = fv.to_json_value(&mut u, 0) {
            let tree = Normalizer::default().normalize(&value);
            check(&tree);

            let shallow = Normalizer::new(Options::default().with_max_depth(Some(2))).normalize(&value);
            if shallow != tree {
                assert!(
                    shallow.to_string().contains(Sentinel::Truncated.as_str()),
                    "limited normalization differs without truncation\nInput: {}\nTree: {}",
                    value,
                    shallow
                );
            }
        }
    }
});
