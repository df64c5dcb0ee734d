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

//! Uploaded file capability.
//!
//! Receiving and parsing uploads belongs to the transport layer. Once it has
//! spooled a file to a temporary location, it hands this crate an
//! [`UploadedFile`], which [`crate::Input`] exposes by form field name.

use crate::{UploadError, UploadResult};
use std::{
    fmt::Debug,
    fs, io,
    path::{Path, PathBuf},
    sync::{
        OnceLock,
        atomic::{AtomicBool, Ordering},
    },
};
use tracing::debug;

/// Transfer status reported by the transport for one uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadStatus {
    /// The file was received completely.
    #[default]
    Ok,
    /// The file exceeds the server's size limit.
    ExceedsServerLimit,
    /// The file exceeds the size limit declared by the form.
    ExceedsFormLimit,
    /// Only part of the file was received.
    Partial,
    /// The field was submitted without a file.
    NoFile,
    /// The temporary file could not be written.
    CantWrite,
}

/// Operations the application may perform on an uploaded file.
pub trait UploadedFile: Debug + Send + Sync {
    /// Whether the transfer completed and the file is still at its temporary
    /// location.
    fn is_valid(&self) -> bool;

    /// Moves the file into `directory`, under `name` or the client original
    /// name, and returns the new path.
    fn move_to(&self, directory: &Path, name: Option<&str>) -> UploadResult<PathBuf>;

    /// Current location of the file: the temporary path, or the target of
    /// a successful [`move_to`](Self::move_to).
    fn path(&self) -> &Path;

    /// Name of the file on the client machine.
    fn client_original_name(&self) -> &str;

    /// Size in bytes.
    fn size(&self) -> u64;

    /// MIME type declared by the client, not verified.
    fn mime_type(&self) -> Option<&str>;

    fn status(&self) -> UploadStatus;

    /// Extension of the client original name, without the dot.
    fn client_original_extension(&self) -> Option<&str> {
        Path::new(self.client_original_name())
            .extension()
            .and_then(|ext| ext.to_str())
    }
}

/// Uploaded file spooled by the transport to a temporary path.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
    original_name: String,
    size: u64,
    mime_type: Option<String>,
    status: UploadStatus,
    moved: AtomicBool,
    moved_to: OnceLock<PathBuf>,
}

impl TempUpload {
    /// Creates an upload for a completely received file.
    ///
    /// # Arguments
    ///
    /// * `path` - The temporary path the transport wrote the file to
    /// * `original_name` - The file name sent by the client
    /// * `size` - The size in bytes
    pub fn new<P: Into<PathBuf>, S: Into<String>>(path: P, original_name: S, size: u64) -> Self {
        Self {
            path: path.into(),
            original_name: original_name.into(),
            size,
            mime_type: None,
            status: UploadStatus::Ok,
            moved: AtomicBool::new(false),
            moved_to: OnceLock::new(),
        }
    }

    /// Sets the MIME type declared by the client.
    pub fn set_mime_type<S: Into<String>>(mut self, mime_type: S) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Sets the transfer status reported by the transport.
    pub fn set_status(mut self, status: UploadStatus) -> Self {
        self.status = status;
        self
    }

    fn target_name<'a>(&'a self, name: Option<&'a str>) -> &'a str {
        let name = name.unwrap_or(&self.original_name);
        // Last path component only.
        name.rsplit(['/', '\\']).next().unwrap_or(name)
    }
}

impl UploadedFile for TempUpload {
    fn is_valid(&self) -> bool {
        self.status == UploadStatus::Ok && !self.moved.load(Ordering::Acquire)
    }

    fn move_to(&self, directory: &Path, name: Option<&str>) -> UploadResult<PathBuf> {
        if self.status != UploadStatus::Ok {
            return Err(UploadError::Invalid {
                name: self.original_name.clone(),
            });
        }
        if self
            .moved
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(UploadError::AlreadyMoved {
                name: self.original_name.clone(),
            });
        }

        match move_file(&self.path, directory, self.target_name(name)) {
            Ok(target) => {
                let _ = self.moved_to.set(target.clone());
                Ok(target)
            }
            Err(err) => {
                self.moved.store(false, Ordering::Release);
                Err(err)
            }
        }
    }

    fn path(&self) -> &Path {
        self.moved_to.get().unwrap_or(&self.path)
    }

    fn client_original_name(&self) -> &str {
        &self.original_name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    fn status(&self) -> UploadStatus {
        self.status
    }
}

fn move_file(from: &Path, directory: &Path, name: &str) -> UploadResult<PathBuf> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "Invalid target file name.").into());
    }

    fs::create_dir_all(directory)?;
    let target = directory.join(name);
    if fs::rename(from, &target).is_err() {
        // Rename fails across file systems.
        fs::copy(from, &target)?;
        fs::remove_file(from)?;
    }

    debug!(from = %from.display(), to = %target.display(), "Moved uploaded file.");
    Ok(target)
}
