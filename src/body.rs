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

//! Request body decoding, dispatched on the declared content type.
//!
//! JSON bodies (sent by javascript clients instead of forms) and url-encoded
//! forms decode into the same value shape, so both are read the same way.
//! Everything else, multipart included, is left to other layers and decodes
//! to an empty mapping.

use crate::query;
use serde_json::{Map, Value};
use tracing::warn;

/// Body encodings this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// `application/json` or any `+json` suffixed type.
    Json,
    /// `application/x-www-form-urlencoded`.
    Form,
    /// Anything else.
    Other,
}

impl BodyKind {
    /// Classifies a `Content-Type` header value, ignoring its parameters.
    pub fn from_content_type(content_type: &str) -> Self {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence == "application/json" || essence.ends_with("+json") {
            BodyKind::Json
        } else if essence == "application/x-www-form-urlencoded" {
            BodyKind::Form
        } else {
            BodyKind::Other
        }
    }
}

/// Decodes `body` according to `content_type`.
///
/// Never fails: an undecodable body, or a JSON body whose top level is not
/// an object, yields an empty mapping.
pub fn decode(content_type: Option<&str>, body: &[u8], max_depth: usize) -> Map<String, Value> {
    if body.is_empty() {
        return Map::new();
    }

    match content_type.map(BodyKind::from_content_type) {
        Some(BodyKind::Json) => decode_json(body),
        Some(BodyKind::Form) => query::parse(body, max_depth),
        Some(BodyKind::Other) | None => Map::new(),
    }
}

fn decode_json(body: &[u8]) -> Map<String, Value> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            warn!(kind = json_kind(&other), "Ignored JSON body without a top-level object.");
            Map::new()
        }
        Err(err) => {
            warn!(error = %err, "Ignored malformed JSON body.");
            Map::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
