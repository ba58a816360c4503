//! Default merging for loosely typed option objects

use serde_json::Value;

/// Fill `given` with every key of `defaults` it does not already carry.
///
/// Nested objects are merged recursively. Anything else the caller supplied
/// (scalars, arrays, keys unknown to `defaults`) is kept untouched. A missing
/// or `null` input yields the defaults.
pub fn merge_defaults(defaults: &Value, given: Option<Value>) -> Value {
    let mut given = match given {
        None | Some(Value::Null) => return defaults.clone(),
        Some(given) => given,
    };

    if let (Value::Object(defaults), Value::Object(target)) = (defaults, &mut given) {
        for (key, default) in defaults {
            match target.get_mut(key) {
                None => {
                    target.insert(key.clone(), default.clone());
                }
                Some(slot) if slot.is_object() => {
                    let nested = std::mem::take(slot);
                    *slot = merge_defaults(default, Some(nested));
                }
                Some(_) => {}
            }
        }
    }

    given
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_input_returns_defaults() {
        let defaults = json!({ "prefix": "/", "selfBot": false });
        assert_eq!(merge_defaults(&defaults, None), defaults);
        assert_eq!(merge_defaults(&defaults, Some(Value::Null)), defaults);
    }

    #[test]
    fn test_caller_scalars_win() {
        let defaults = json!({ "dmOnly": false, "description": "Default Description" });
        let merged = merge_defaults(&defaults, Some(json!({ "dmOnly": true })));

        assert_eq!(merged["dmOnly"], json!(true));
        assert_eq!(merged["description"], json!("Default Description"));
    }

    #[test]
    fn test_nested_objects_are_filled() {
        let defaults = json!({ "limits": { "max": 10, "min": 1 }, "name": "x" });
        let merged = merge_defaults(&defaults, Some(json!({ "limits": { "max": 99 } })));

        assert_eq!(merged["limits"]["max"], json!(99));
        assert_eq!(merged["limits"]["min"], json!(1));
        assert_eq!(merged["name"], json!("x"));
    }

    #[test]
    fn test_arrays_and_extra_keys_pass_through() {
        let defaults = json!({ "roles": ["@everyone"] });
        let merged = merge_defaults(&defaults, Some(json!({ "roles": [], "custom": 3 })));

        assert_eq!(merged["roles"], json!([]));
        assert_eq!(merged["custom"], json!(3));
    }

    #[test]
    fn test_scalar_over_nested_default_is_kept() {
        let defaults = json!({ "limits": { "max": 10 } });
        let merged = merge_defaults(&defaults, Some(json!({ "limits": 5 })));
        assert_eq!(merged["limits"], json!(5));
    }
}
