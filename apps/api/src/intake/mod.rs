//! Intake — the upload boundary. Takes the multipart payload apart, expands
//! zip archives into their member files, and sniffs a format tag for each
//! staged file before identifier assignment.
//!
//! Archives are containers, not documents: each extracted member becomes its
//! own staged file (and later its own record/identifier); the archive itself
//! never enters the pipeline.

use std::io::{Cursor, Read};

use bytes::Bytes;
use tracing::{info, warn};

use crate::extract::{ExtractionError, FileFormat};

pub mod handlers;
pub mod identifier;

/// One part of the multipart upload, as received from the client.
#[derive(Debug, Clone)]
pub struct Upload {
    pub display_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// One file ready for normalization. `format` carries the sniff result;
/// a pre-staged failure (unsupported format, unreadable archive) rides along
/// so the document still appears in the batch outcome.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub display_name: String,
    pub bytes: Bytes,
    pub format: Result<FileFormat, ExtractionError>,
}

/// Expands a batch of uploads into staged files, one per document.
pub fn stage_uploads(uploads: Vec<Upload>) -> Vec<StagedFile> {
    let mut staged = Vec::with_capacity(uploads.len());
    for upload in uploads {
        if is_zip(&upload) {
            let members = expand_archive(&upload);
            info!(
                "expanded archive '{}' into {} member(s)",
                upload.display_name,
                members.len()
            );
            staged.extend(members);
        } else {
            staged.push(stage_single(
                upload.display_name,
                upload.content_type.as_deref(),
                upload.bytes,
            ));
        }
    }
    staged
}

fn is_zip(upload: &Upload) -> bool {
    matches!(
        upload.content_type.as_deref(),
        Some("application/zip") | Some("application/x-zip-compressed")
    ) || upload
        .display_name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("zip"))
}

fn stage_single(display_name: String, content_type: Option<&str>, bytes: Bytes) -> StagedFile {
    let format = FileFormat::sniff(&display_name, content_type).ok_or_else(|| {
        ExtractionError::UnsupportedFormat(
            content_type
                .map(str::to_string)
                .unwrap_or_else(|| display_name.clone()),
        )
    });
    StagedFile {
        display_name,
        bytes,
        format,
    }
}

/// Expands one zip upload. An unreadable archive stays visible as a single
/// corrupt record; a bad member stays local to that member.
fn expand_archive(upload: &Upload) -> Vec<StagedFile> {
    let mut archive = match zip::ZipArchive::new(Cursor::new(upload.bytes.as_ref())) {
        Ok(archive) => archive,
        Err(e) => {
            warn!("archive '{}' could not be opened: {e}", upload.display_name);
            return vec![StagedFile {
                display_name: upload.display_name.clone(),
                bytes: upload.bytes.clone(),
                format: Err(ExtractionError::CorruptFile(format!(
                    "unreadable archive: {e}"
                ))),
            }];
        }
    };

    let mut members = Vec::new();
    for index in 0..archive.len() {
        let mut member = match archive.by_index(index) {
            Ok(member) => member,
            Err(e) => {
                warn!(
                    "member {index} of '{}' could not be read: {e}",
                    upload.display_name
                );
                members.push(StagedFile {
                    display_name: format!("{}#{index}", upload.display_name),
                    bytes: Bytes::new(),
                    format: Err(ExtractionError::CorruptFile(e.to_string())),
                });
                continue;
            }
        };
        if member.is_dir() {
            continue;
        }

        let member_name = member.name().to_string();
        let mut contents = Vec::with_capacity(member.size() as usize);
        if let Err(e) = member.read_to_end(&mut contents) {
            warn!("member '{member_name}' could not be decompressed: {e}");
            members.push(StagedFile {
                display_name: member_name,
                bytes: Bytes::new(),
                format: Err(ExtractionError::CorruptFile(e.to_string())),
            });
            continue;
        }

        members.push(stage_single(member_name, None, Bytes::from(contents)));
    }
    members
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;

    fn zip_with(members: &[(&str, &[u8])]) -> Bytes {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents) in members {
            writer.start_file(*name, FileOptions::default()).unwrap();
            writer.write_all(contents).unwrap();
        }
        Bytes::from(writer.finish().unwrap().into_inner())
    }

    #[test]
    fn test_single_file_is_staged_with_sniffed_format() {
        let staged = stage_uploads(vec![Upload {
            display_name: "resume.txt".to_string(),
            content_type: Some("text/plain".to_string()),
            bytes: Bytes::from_static(b"text"),
        }]);

        assert_eq!(staged.len(), 1);
        assert_eq!(staged[0].display_name, "resume.txt");
        assert_eq!(staged[0].format, Ok(FileFormat::PlainText));
    }

    #[test]
    fn test_unsupported_upload_is_staged_not_dropped() {
        let staged = stage_uploads(vec![Upload {
            display_name: "headshot.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: Bytes::from_static(b"\x89PNG"),
        }]);

        assert_eq!(staged.len(), 1);
        assert!(matches!(
            staged[0].format,
            Err(ExtractionError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_archive_members_become_individual_files() {
        let archive = zip_with(&[
            ("alice.txt", b"alice resume".as_slice()),
            ("nested/bob.txt", b"bob resume".as_slice()),
        ]);
        let staged = stage_uploads(vec![Upload {
            display_name: "batch.zip".to_string(),
            content_type: Some("application/zip".to_string()),
            bytes: archive,
        }]);

        assert_eq!(staged.len(), 2);
        assert_eq!(staged[0].display_name, "alice.txt");
        assert_eq!(staged[1].display_name, "nested/bob.txt");
        assert_eq!(staged[1].bytes.as_ref(), b"bob resume");
        assert!(staged.iter().all(|s| s.format == Ok(FileFormat::PlainText)));
    }

    #[test]
    fn test_zip_detected_by_extension_without_content_type() {
        let archive = zip_with(&[("cv.txt", b"text".as_slice())]);
        let staged = stage_uploads(vec![Upload {
            display_name: "upload.ZIP".to_string(),
            content_type: None,
            bytes: archive,
        }]);

        assert_eq!(staged.len(), 1);
        assert_eq!(staged[0].display_name, "cv.txt");
    }

    #[test]
    fn test_unreadable_archive_stays_visible_as_corrupt_record() {
        let staged = stage_uploads(vec![Upload {
            display_name: "mangled.zip".to_string(),
            content_type: Some("application/zip".to_string()),
            bytes: Bytes::from_static(b"this is no archive"),
        }]);

        assert_eq!(staged.len(), 1);
        assert_eq!(staged[0].display_name, "mangled.zip");
        assert!(matches!(
            staged[0].format,
            Err(ExtractionError::CorruptFile(_))
        ));
    }

    #[test]
    fn test_mixed_batch_preserves_arrival_order() {
        let archive = zip_with(&[("middle.txt", b"m".as_slice())]);
        let staged = stage_uploads(vec![
            Upload {
                display_name: "first.pdf".to_string(),
                content_type: Some("application/pdf".to_string()),
                bytes: Bytes::from_static(b"%PDF"),
            },
            Upload {
                display_name: "pack.zip".to_string(),
                content_type: Some("application/zip".to_string()),
                bytes: archive,
            },
            Upload {
                display_name: "last.txt".to_string(),
                content_type: None,
                bytes: Bytes::from_static(b"t"),
            },
        ]);

        let names: Vec<&str> = staged.iter().map(|s| s.display_name.as_str()).collect();
        assert_eq!(names, vec!["first.pdf", "middle.txt", "last.txt"]);
    }
}
