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

//! Signup form repopulated with old input after a failed submit.
//!
//! Run with `cargo run --example axum_old_input --features http`, then open
//! <http://127.0.0.1:3000/signup>. The demo keeps one session for everyone.

use axum::{
    Router,
    body::to_bytes,
    extract::{Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use request_input::{Input, InputConfig, MemorySession, RequestContext, SessionError};
use std::sync::Arc;
use tokio::net::TcpListener;

const BODY_LIMIT: usize = 64 * 1024;

#[derive(Clone)]
struct AppState {
    session: Arc<MemorySession>,
    config: Arc<InputConfig>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let state = AppState {
        session: Arc::new(MemorySession::new()),
        config: Arc::new(InputConfig::default()),
    };
    let app = Router::new()
        .route("/signup", get(show_form).post(submit_form))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:3000").await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

async fn show_form(State(state): State<AppState>, request: Request) -> Response {
    let ctx = match context(&state, request).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let username = match ctx.old_or("username", "").await {
        Ok(username) => username,
        Err(err) => return session_error(err),
    };

    Html(format!(
        r#"<form method="post" action="/signup">
  <input name="username" value="{}">
  <input name="password" type="password">
  <button>Sign up</button>
</form>"#,
        escape(username.as_str().unwrap_or_default())
    ))
    .into_response()
}

async fn submit_form(State(state): State<AppState>, request: Request) -> Response {
    let ctx = match context(&state, request).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    if ctx.input().filled("username") && ctx.input().filled("password") {
        return Html("Welcome!").into_response();
    }

    match ctx.flash_except(["password"]).await {
        Ok(()) => Redirect::to("/signup").into_response(),
        Err(err) => session_error(err),
    }
}

async fn context(
    state: &AppState, request: Request,
) -> Result<RequestContext<MemorySession>, Response> {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, BODY_LIMIT)
        .await
        .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()).into_response())?;

    let input = Input::builder()
        .config(state.config.as_ref().clone())
        .http_parts(&parts, body)
        .build();
    RequestContext::begin(input, state.session.clone(), &state.config)
        .await
        .map_err(session_error)
}

fn session_error(err: SessionError) -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, err.to_string()).into_response()
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('"', "&quot;")
}
