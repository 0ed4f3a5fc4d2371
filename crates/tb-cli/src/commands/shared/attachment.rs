use std::path::Path;

use anyhow::Context;
use tb_board::AttachmentInput;

/// Content type inferred from the file extension.
///
/// Unknown extensions map to `application/octet-stream`. The form decides
/// which types it accepts.
#[must_use]
pub fn content_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Read name, type, and size of a file picked for upload.
pub async fn describe(path: &Path) -> anyhow::Result<AttachmentInput> {
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("failed to read attachment {}", path.display()))?;
    if !metadata.is_file() {
        anyhow::bail!("attachment {} is not a file", path.display());
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("attachment {} has no file name", path.display()))?;

    Ok(AttachmentInput {
        name,
        content_type: content_type_for(path),
        size_bytes: metadata.len(),
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::{content_type_for, describe};

    #[test]
    fn infers_known_types_case_insensitively() {
        assert_eq!(content_type_for(Path::new("scan.JPG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("scan.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("shot.png")), "image/png");
        assert_eq!(content_type_for(Path::new("invoice.pdf")), "application/pdf");
    }

    #[test]
    fn other_types_are_reported_as_they_are() {
        assert_eq!(content_type_for(Path::new("notes.txt")), "text/plain");
        assert_eq!(content_type_for(Path::new("photo.webp")), "image/webp");
    }

    #[test]
    fn unknown_extension_is_octet_stream() {
        assert_eq!(content_type_for(Path::new("README")), "application/octet-stream");
        assert_eq!(
            content_type_for(Path::new("dump.zz-unknown")),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn describe_reads_size_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.pdf");
        std::fs::write(&path, vec![0u8; 1234]).unwrap();

        let attachment = describe(&path).await.unwrap();
        assert_eq!(attachment.name, "invoice.pdf");
        assert_eq!(attachment.content_type, "application/pdf");
        assert_eq!(attachment.size_bytes, 1234);
    }

    #[tokio::test]
    async fn describe_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = describe(&dir.path().join("gone.png")).await.unwrap_err();
        assert!(err.to_string().contains("failed to read attachment"));
    }
}
