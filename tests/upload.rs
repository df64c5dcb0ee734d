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

use request_input::{Input, TempUpload, UploadError, UploadStatus, UploadedFile};
use std::fs;

mod common;

#[test]
fn test_move_uploaded_file() {
    common::setup();

    let tmp = tempfile::tempdir().unwrap();
    let spooled = tmp.path().join("php7Yt3aB");
    fs::write(&spooled, b"\x89PNG").unwrap();

    let input = Input::builder()
        .file(
            "photo",
            TempUpload::new(&spooled, "holiday.png", 4).set_mime_type("image/png"),
        )
        .build();

    assert!(input.has_file("photo"));
    let photo = input.file("photo").unwrap();
    assert!(photo.is_valid());
    assert_eq!(photo.client_original_name(), "holiday.png");
    assert_eq!(photo.client_original_extension(), Some("png"));
    assert_eq!(photo.size(), 4);
    assert_eq!(photo.mime_type(), Some("image/png"));
    assert_eq!(photo.status(), UploadStatus::Ok);

    let destination = tmp.path().join("uploads");
    let moved = photo.move_to(&destination, None).unwrap();
    assert_eq!(moved, destination.join("holiday.png"));
    assert_eq!(fs::read(&moved).unwrap(), b"\x89PNG");
    assert!(!spooled.exists());
    assert!(!photo.is_valid());
    assert_eq!(photo.path(), moved);
    assert!(input.has_file("photo"));

    assert!(matches!(
        photo.move_to(&destination, Some("again.png")),
        Err(UploadError::AlreadyMoved { .. })
    ));
}

#[test]
fn test_move_with_name() {
    common::setup();

    let tmp = tempfile::tempdir().unwrap();
    let spooled = tmp.path().join("phpAbc");
    fs::write(&spooled, b"hello").unwrap();

    let upload = TempUpload::new(&spooled, "notes.txt", 5);
    let moved = upload
        .move_to(tmp.path(), Some("../escape/renamed.txt"))
        .unwrap();
    assert_eq!(moved, tmp.path().join("renamed.txt"));
}

#[test]
fn test_failed_move_keeps_file_valid() {
    common::setup();

    let tmp = tempfile::tempdir().unwrap();
    let upload = TempUpload::new(tmp.path().join("missing"), "a.txt", 1);
    assert!(matches!(
        upload.move_to(tmp.path(), Some("b.txt")),
        Err(UploadError::Io(_))
    ));
    assert!(upload.is_valid());
    assert_eq!(upload.path(), tmp.path().join("missing"));
}

#[test]
fn test_partial_upload_is_invalid() {
    common::setup();

    let upload = TempUpload::new("/tmp/phpPartial", "big.iso", 10)
        .set_status(UploadStatus::ExceedsServerLimit);
    assert!(!upload.is_valid());
    assert!(matches!(
        upload.move_to(std::path::Path::new("/tmp"), None),
        Err(UploadError::Invalid { .. })
    ));
}
