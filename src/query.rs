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

//! Decoding of `application/x-www-form-urlencoded` pairs with bracket keys.
//!
//! Browsers send "array" form fields as `products[0][name]=Widget` or
//! `tags[]=x&tags[]=y`. Each bracket opens one nesting level:
//!
//! * `[]` appends to a list,
//! * `[n]` addresses a list slot when `n` is an existing index or the next
//!   one, otherwise the level becomes an object keyed by `n`,
//! * `[name]` addresses an object key.
//!
//! Repeated plain keys keep the last value.

use serde_json::{Map, Value};
use tracing::trace;

/// Decodes url-encoded `input` into a nested top-level mapping.
///
/// Keys nesting deeper than `max_depth` brackets are dropped.
pub fn parse(input: &[u8], max_depth: usize) -> Map<String, Value> {
    let mut root = Map::new();
    for (name, value) in form_urlencoded::parse(input) {
        let (head, segments) = split_key(&name);
        if head.is_empty() {
            continue;
        }
        if segments.len() > max_depth {
            trace!(key = %name, max_depth, "Dropped form key nested too deep.");
            continue;
        }

        let value = Value::String(value.into_owned());
        if segments.is_empty() {
            root.insert(head.to_owned(), value);
        } else {
            let slot = root.entry(head.to_owned()).or_insert(Value::Null);
            insert(slot, &segments, value);
        }
    }
    root
}

/// Splits `a[b][]` into `("a", ["b", ""])`.
///
/// A name whose first `[` is never closed is taken literally. Anything after
/// the last well-formed bracket pair is ignored.
fn split_key(name: &str) -> (&str, Vec<&str>) {
    let Some(open) = name.find('[') else {
        return (name, Vec::new());
    };
    if open == 0 {
        return (name, Vec::new());
    }

    let (head, mut rest) = name.split_at(open);
    let mut segments = Vec::new();
    while let Some(tail) = rest.strip_prefix('[') {
        let Some(close) = tail.find(']') else {
            break;
        };
        segments.push(&tail[..close]);
        rest = &tail[close + 1..];
    }

    if segments.is_empty() {
        (name, Vec::new())
    } else {
        (head, segments)
    }
}

fn insert(slot: &mut Value, segments: &[&str], value: Value) {
    let Some((&segment, rest)) = segments.split_first() else {
        *slot = value;
        return;
    };

    if !matches!(slot, Value::Array(_) | Value::Object(_)) {
        *slot = if segment.is_empty() || segment == "0" {
            Value::Array(Vec::new())
        } else {
            Value::Object(Map::new())
        };
    }

    if let Value::Array(items) = slot {
        let index = if segment.is_empty() {
            Some(items.len())
        } else {
            parse_index(segment)
        };
        match index {
            Some(index) if index < items.len() => return insert(&mut items[index], rest, value),
            Some(index) if index == items.len() => {
                items.push(Value::Null);
                return insert(&mut items[index], rest, value);
            }
            _ => {}
        }
        let object = into_object(std::mem::take(items));
        *slot = Value::Object(object);
    }

    if let Value::Object(map) = slot {
        let key = if segment.is_empty() {
            next_index(map).to_string()
        } else {
            segment.to_owned()
        };
        insert(map.entry(key).or_insert(Value::Null), rest, value);
    }
}

fn parse_index(segment: &str) -> Option<usize> {
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn into_object(items: Vec<Value>) -> Map<String, Value> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| (index.to_string(), item))
        .collect()
}

fn next_index(map: &Map<String, Value>) -> usize {
    map.keys()
        .filter_map(|key| parse_index(key))
        .max()
        .map_or(0, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(input: &str) -> Value {
        Value::Object(parse(input.as_bytes(), 64))
    }

    #[test]
    fn test_plain_pairs() {
        assert_eq!(
            decode("name=Sally&city=New+York&note=a%26b"),
            json!({"name": "Sally", "city": "New York", "note": "a&b"})
        );
    }

    #[test]
    fn test_last_plain_key_wins() {
        assert_eq!(decode("name=Sally&name=Bob"), json!({"name": "Bob"}));
    }

    #[test]
    fn test_append_brackets() {
        assert_eq!(decode("tags[]=x&tags[]=y"), json!({"tags": ["x", "y"]}));
    }

    #[test]
    fn test_indexed_objects() {
        assert_eq!(
            decode("products[0][name]=Widget&products[0][qty]=2&products[1][name]=Gadget"),
            json!({"products": [{"name": "Widget", "qty": "2"}, {"name": "Gadget"}]})
        );
    }

    #[test]
    fn test_sparse_index_becomes_object() {
        assert_eq!(
            decode("ids[0]=a&ids[5]=b&ids[]=c"),
            json!({"ids": {"0": "a", "5": "b", "6": "c"}})
        );
    }

    #[test]
    fn test_named_segments() {
        assert_eq!(
            decode("user[name]=al&user[address][city]=Oslo"),
            json!({"user": {"name": "al", "address": {"city": "Oslo"}}})
        );
    }

    #[test]
    fn test_scalar_replaced_by_container() {
        assert_eq!(decode("a=1&a[]=2"), json!({"a": ["2"]}));
    }

    #[test]
    fn test_malformed_brackets() {
        assert_eq!(decode("a[b=1"), json!({"a[b": "1"}));
        assert_eq!(decode("[a]=1"), json!({"[a]": "1"}));
        assert_eq!(decode("a[b]junk[c]=1"), json!({"a": {"b": "1"}}));
    }

    #[test]
    fn test_max_depth() {
        let parsed = Value::Object(parse(b"a[b][c]=1&d[e]=2", 1));
        assert_eq!(parsed, json!({"d": {"e": "2"}}));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(decode(""), json!({}));
        assert_eq!(decode("=orphan"), json!({}));
    }
}
