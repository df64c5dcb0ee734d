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

//! Error types for session and upload operations.
//!
//! Looking up input never fails: absent keys and paths that do not fit the
//! shape of the data resolve to the caller's default. Only the collaborators
//! that touch external state report errors.

use std::io;

/// Result type alias for session-backed operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Result type alias for uploaded file operations.
pub type UploadResult<T> = Result<T, UploadError>;

/// Error returned by the session store and the flash relay on top of it.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The backing session store could not be read or written.
    #[error("Session store is unavailable: {reason}")]
    Unavailable {
        /// Backend specific description.
        reason: String,
    },

    /// The value stored under the flash key is not a flashed input batch.
    #[error("Flashed input under key `{key}` is malformed")]
    Malformed {
        /// Session key holding the value.
        key: String,
        /// Decoding error.
        #[source]
        source: serde_json::Error,
    },
}

impl SessionError {
    /// Creates an [`SessionError::Unavailable`] with the given reason.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        SessionError::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Error returned when handling an uploaded file.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Wrapper of `std::io::Error`.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The upload did not complete, so there is nothing to move.
    #[error("Uploaded file `{name}` is not valid")]
    Invalid {
        /// Client original name of the file.
        name: String,
    },

    /// The file was already moved out of its temporary location.
    #[error("Uploaded file `{name}` has already been moved")]
    AlreadyMoved {
        /// Client original name of the file.
        name: String,
    },
}
