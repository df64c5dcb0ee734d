// Copyright 2022 jmjoy
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Dot-path lookup over nested input values.
//!
//! A path such as `products.0.name` descends one level per segment: into an
//! object by key, or into an array by index. Lookup is total; any segment
//! that is missing or does not fit the shape of the value yields `None`.

use serde_json::{Map, Value};

/// Separator between path segments.
pub const SEPARATOR: char = '.';

/// Resolves `path` against a top-level mapping.
pub fn resolve<'a>(root: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split(SEPARATOR);
    let head = segments.next()?;
    segments.try_fold(root.get(head)?, step)
}

fn step<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => parse_index(segment).and_then(|index| items.get(index)),
        _ => None,
    }
}

/// Only plain ascii digits index into an array; `+1` or `-0` do not.
fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn root(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("root must be an object"),
        }
    }

    #[test]
    fn test_flat_key() {
        let root = root(json!({"name": "Bob", "empty": null}));
        assert_eq!(resolve(&root, "name"), Some(&json!("Bob")));
        assert_eq!(resolve(&root, "empty"), Some(&Value::Null));
        assert_eq!(resolve(&root, "missing"), None);
    }

    #[test]
    fn test_nested_object_and_array() {
        let root = root(json!({"products": [{"name": "Widget"}], "tags": ["x", "y"]}));
        assert_eq!(resolve(&root, "products.0.name"), Some(&json!("Widget")));
        assert_eq!(resolve(&root, "tags.1"), Some(&json!("y")));
        assert_eq!(resolve(&root, "tags.5"), None);
    }

    #[test]
    fn test_shape_mismatch() {
        let root = root(json!({"products": {}, "name": "Bob", "tags": ["x"]}));
        assert_eq!(resolve(&root, "products.0.name"), None);
        assert_eq!(resolve(&root, "name.first"), None);
        assert_eq!(resolve(&root, "tags.first"), None);
        assert_eq!(resolve(&root, "tags.+0"), None);
        assert_eq!(resolve(&root, "tags."), None);
    }

    #[test]
    fn test_numeric_object_keys() {
        let root = root(json!({"products": {"0": {"name": "Widget"}}}));
        assert_eq!(resolve(&root, "products.0.name"), Some(&json!("Widget")));
    }
}
