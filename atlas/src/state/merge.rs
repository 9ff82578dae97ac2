//! Recursive key-wise merge for JSON-object state fields.

use serde_json::Value;

/// Merges `update` into `current` in place.
///
/// Object-valued keys on both sides recurse; any other collision overrides
/// the existing leaf (scalars and arrays replace, they do not concatenate);
/// disjoint keys union. Sibling keys of a recursed object always survive.
///
/// This is the merge law behind every map field of
/// [`SharedState`](super::SharedState), and the reason stage outputs under
/// `results` accumulate instead of clobbering each other.
pub fn merge_values(current: &mut Value, update: Value) {
    match update {
        Value::Object(fields) => {
            if let Value::Object(existing) = current {
                for (key, value) in fields {
                    match existing.get_mut(&key) {
                        Some(slot) => merge_values(slot, value),
                        None => {
                            existing.insert(key, value);
                        }
                    }
                }
            } else {
                *current = Value::Object(fields);
            }
        }
        other => *current = other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// **Scenario**: the documented merge law — recursive on object keys,
    /// override on scalar collision, union on disjoint keys.
    #[test]
    fn merge_recurses_objects_and_unions_disjoint_keys() {
        let mut current = json!({"a": {"x": 1}, "b": 2});
        merge_values(&mut current, json!({"a": {"y": 2}, "c": 3}));
        assert_eq!(current, json!({"a": {"x": 1, "y": 2}, "b": 2, "c": 3}));
    }

    /// **Scenario**: a later scalar write overrides the existing leaf but
    /// leaves siblings intact.
    #[test]
    fn merge_overrides_scalar_collision_preserving_siblings() {
        let mut current = json!({"plan": {"status": "draft", "steps": 3}});
        merge_values(&mut current, json!({"plan": {"status": "final"}}));
        assert_eq!(current, json!({"plan": {"status": "final", "steps": 3}}));
    }

    /// **Scenario**: arrays are leaves — they replace rather than concatenate.
    #[test]
    fn merge_replaces_arrays_wholesale() {
        let mut current = json!({"events": [1, 2]});
        merge_values(&mut current, json!({"events": [3]}));
        assert_eq!(current, json!({"events": [3]}));
    }

    /// **Scenario**: nesting recurses more than one level down.
    #[test]
    fn merge_recurses_nested_levels() {
        let mut current = json!({"results": {"coordinator_analysis": {"priority": {"PLANNER": 1}}}});
        merge_values(
            &mut current,
            json!({"results": {"coordinator_analysis": {"priority": {"ADVISOR": 2}}}}),
        );
        assert_eq!(
            current,
            json!({"results": {"coordinator_analysis": {"priority": {"PLANNER": 1, "ADVISOR": 2}}}})
        );
    }

    /// **Scenario**: an object update over a scalar leaf overrides it, and a
    /// scalar over an object does the same — type changes are overrides.
    #[test]
    fn merge_overrides_on_type_change() {
        let mut current = json!({"slot": 1});
        merge_values(&mut current, json!({"slot": {"inner": true}}));
        assert_eq!(current, json!({"slot": {"inner": true}}));

        let mut current = json!({"slot": {"inner": true}});
        merge_values(&mut current, json!({"slot": "done"}));
        assert_eq!(current, json!({"slot": "done"}));
    }
}
