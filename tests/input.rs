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

use request_input::{Input, InputConfig, Params};
use serde_json::{Value, json};

mod common;

fn store() -> Input {
    Input::builder()
        .query_str("name=Sally")
        .raw_body(
            Some("application/json"),
            r#"{"name": "Bob", "tags": ["x", "y"], "products": [{"name": "Widget"}]}"#,
        )
        .build()
}

#[test]
fn test_get() {
    common::setup();

    let input = store();
    assert_eq!(input.get("name"), Some(&json!("Bob")));
    assert_eq!(input.get("tags.1"), Some(&json!("y")));
    assert_eq!(input.get_or("tags.5", "none"), json!("none"));
    assert_eq!(input.get_str("products.0.name"), Some("Widget"));
}

#[test]
fn test_get_against_empty_object() {
    common::setup();

    let input = Input::new(Params::new().custom("products", json!({})));
    assert_eq!(input.get("products.0.name"), None);
    assert_eq!(input.get_or("products.0.name", "default"), json!("default"));
}

#[test]
fn test_get_matches_manual_walk() {
    common::setup();

    let input = store();
    let root = Value::from(input.all().clone());
    for key in [
        "name",
        "tags",
        "tags.0",
        "tags.1",
        "tags.2",
        "products.0.name",
        "products.0.price",
        "products.name",
        "name.0",
        "",
        "missing.deep.path",
    ] {
        // Dot-paths map onto JSON pointers for keys without `~` or `/`.
        let pointer = format!("/{}", key.replace('.', "/"));
        assert_eq!(input.get(key), root.pointer(&pointer), "key {key:?}");
        assert_eq!(input.has(key), input.get(key).is_some(), "key {key:?}");
    }
}

#[test]
fn test_precedence() {
    common::setup();

    let input = Input::builder()
        .route_param("id", "route")
        .query_str("id=query")
        .body(Params::new().custom("id", "body"))
        .build();
    assert_eq!(input.get_str("id"), Some("body"));

    let input = Input::builder()
        .route_param("id", "route")
        .query_str("id=query")
        .build();
    assert_eq!(input.get_str("id"), Some("query"));

    let input = Input::builder().route_param("id", "route").build();
    assert_eq!(input.get_str("id"), Some("route"));
}

#[test]
fn test_only_and_except_partition_all() {
    common::setup();

    let input = Input::builder()
        .query_str("username=al&password=secret&remember=1")
        .raw_body(Some("application/json"), r#"{"email": "al@example.com"}"#)
        .build();

    let keys = ["password", "email"];
    let only = input.only(keys);
    let except = input.except(keys);

    assert_eq!(only.len(), 2);
    assert_eq!(except.len(), 2);
    assert!(only.keys().all(|key| !except.contains_key(key)));

    let mut merged = only.clone();
    merged.merge(except);
    assert_eq!(merged.len(), input.len());
    for (key, value) in input.all().iter() {
        assert_eq!(merged.get(key), Some(value));
    }
}

#[test]
fn test_only_ignores_missing_and_dot_paths() {
    common::setup();

    let input = store();
    let only = input.only(["name", "missing", "tags.0"]);
    assert_eq!(Value::from(only), json!({"name": "Bob"}));
}

#[test]
fn test_form_arrays() {
    common::setup();

    let input = Input::builder()
        .raw_body(
            Some("application/x-www-form-urlencoded; charset=UTF-8"),
            "products%5B0%5D%5Bname%5D=Widget&products%5B1%5D%5Bname%5D=Gadget",
        )
        .build();
    assert_eq!(input.get_str("products.0.name"), Some("Widget"));
    assert_eq!(input.get_str("products.1.name"), Some("Gadget"));
}

#[test]
fn test_malformed_body_is_empty() {
    common::setup();

    let input = Input::builder()
        .query_str("page=2")
        .raw_body(Some("application/json"), "{\"name\": ")
        .build();
    assert_eq!(Value::from(input.all().clone()), json!({"page": "2"}));
}

#[test]
fn test_absent_sources() {
    common::setup();

    let input = Input::builder().build();
    assert!(input.is_empty());
    assert_eq!(input.get("anything"), None);
    assert_eq!(input.keys().count(), 0);
}

#[test]
fn test_nesting_depth_config() {
    common::setup();

    let input = Input::builder()
        .config(InputConfig::new().set_max_nesting_depth(2))
        .query_str("a[b][c]=1&x[y][z][w]=2")
        .build();
    assert_eq!(input.get_str("a.b.c"), Some("1"));
    assert!(!input.has("x"));
}
