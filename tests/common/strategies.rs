use proptest::prelude::*;
use serde_json::{json, Value};

/// Strategy for generating store class names
pub fn class_name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z0-9_]{0,31}"
}

/// Strategy for generating person names
pub fn name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z ]{0,40}"
}

/// Strategy for generating 32-bit integer values in the shapes the store
/// sends them: native numbers, numeric strings, and integral floats.
pub fn integer_shape_strategy() -> impl Strategy<Value = (i64, Value)> {
    prop_oneof![
        any::<i32>().prop_map(|n| (i64::from(n), json!(n))),
        any::<i32>().prop_map(|n| (i64::from(n), json!(n.to_string()))),
        any::<i32>().prop_map(|n| (i64::from(n), json!(f64::from(n)))),
    ]
}

/// Strategy for generating strings that are not integers
pub fn non_integer_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z ]{0,15}"
}

/// Strategy for generating RIDs
pub fn rid_strategy() -> impl Strategy<Value = (i32, i64)> {
    (0i32..1_000, 0i64..1_000_000)
}

/// Strategy for discriminator values that must be rejected as empty
pub fn empty_discriminator_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(json!("")),
        Just(Value::Null),
        Just(json!(false)),
        Just(json!(0)),
        Just(json!([])),
        Just(json!({})),
    ]
}
