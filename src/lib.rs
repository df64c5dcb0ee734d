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

#![warn(rust_2018_idioms)]
#![warn(clippy::dbg_macro, clippy::print_stdout)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Request input with dot-path lookup, and old input flashed across one
//! request through the session.
//!
//! ## Examples
//!
//! ```rust
//! use request_input::{Input, InputConfig, MemorySession, RequestContext};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn demo() -> request_input::SessionResult<()> {
//! let session = Arc::new(MemorySession::new());
//! let config = InputConfig::default();
//!
//! // The form post fails validation and redirects back.
//! let input = Input::builder()
//!     .query_str("name=Sally")
//!     .raw_body(
//!         Some("application/json"),
//!         r#"{"name": "Bob", "password": "secret", "tags": ["x", "y"]}"#,
//!     )
//!     .build();
//! assert_eq!(input.get_str("name"), Some("Bob"));
//! assert_eq!(input.get_or("tags.5", "none"), json!("none"));
//!
//! let ctx = RequestContext::begin(input, session.clone(), &config).await?;
//! ctx.flash_except(["password"]).await?;
//!
//! // The redirected request repopulates the form.
//! let ctx = RequestContext::begin(Input::default(), session, &config).await?;
//! assert_eq!(ctx.old("name").await?, Some(&json!("Bob")));
//! assert_eq!(ctx.old_or("password", "").await?, json!(""));
//! # Ok(())
//! # }
//! ```

pub mod body;
pub mod config;
pub mod context;
mod error;
pub mod flash;
pub mod input;
pub mod params;
pub mod path;
pub mod query;
pub mod session;
pub mod upload;

pub use crate::{
    config::InputConfig,
    context::RequestContext,
    error::*,
    flash::{FlashRelay, FlashedBatch, Generation},
    input::{Input, InputBuilder},
    params::Params,
    session::{MemorySession, SessionStore},
    upload::{TempUpload, UploadStatus, UploadedFile},
};
