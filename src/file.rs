use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use crate::error::RelayError;

const SNIFF_LEN: u64 = 8192;

/// The local file being shared, checked and described once before any
/// network traffic happens.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDescriptor {
    pub path: PathBuf,
    pub name: String,
    pub mime: String,
    pub size: u64,
}

impl FileDescriptor {
    pub fn inspect(path: impl AsRef<Path>) -> Result<FileDescriptor, RelayError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(RelayError::FileMissing(path));
        }
        let metadata = path.metadata()?;
        if !metadata.is_file() {
            return Err(RelayError::NotAFile(path));
        }
        if File::open(&path).is_err() {
            return Err(RelayError::Unreadable(path));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime = detect_mime(&path)?;

        Ok(FileDescriptor {
            path,
            name,
            mime,
            size: metadata.len(),
        })
    }

    pub fn open(&self) -> Result<File, RelayError> {
        Ok(File::open(&self.path)?)
    }
}

pub fn detect_mime(path: &Path) -> Result<String, RelayError> {
    let mut head = Vec::new();
    File::open(path)?.take(SNIFF_LEN).read_to_end(&mut head)?;

    if let Some(kind) = infer::get(&head) {
        return Ok(kind.mime_type().to_string());
    }

    let mime = if head.is_empty() {
        "inode/x-empty"
    } else if looks_like_text(&head) {
        "text/plain"
    } else {
        "application/octet-stream"
    };
    Ok(mime.to_string())
}

fn looks_like_text(head: &[u8]) -> bool {
    if head.contains(&0) {
        return false;
    }
    match std::str::from_utf8(head) {
        Ok(_) => true,
        // a multi-byte char cut off by the sniff window is still text
        Err(e) => e.error_len().is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn describes_a_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello relay\n").unwrap();

        let file = FileDescriptor::inspect(&path).unwrap();

        assert_eq!(file.name, "notes.txt");
        assert_eq!(file.mime, "text/plain");
        assert_eq!(file.size, 12);
    }

    #[test]
    fn sniffs_pdf_by_content() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n").unwrap();

        let file = FileDescriptor::inspect(tmp.path()).unwrap();
        assert_eq!(file.mime, "application/pdf");
    }

    #[test]
    fn empty_and_binary_files() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty");
        let blob = dir.path().join("blob");
        std::fs::write(&empty, b"").unwrap();
        std::fs::write(&blob, [0u8, 159, 146, 150, 0, 1]).unwrap();

        assert_eq!(detect_mime(&empty).unwrap(), "inode/x-empty");
        assert_eq!(detect_mime(&blob).unwrap(), "application/octet-stream");
    }

    #[test]
    fn missing_path_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileDescriptor::inspect(dir.path().join("nope.bin")).unwrap_err();
        assert!(matches!(err, RelayError::FileMissing(_)));
    }

    #[test]
    fn directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileDescriptor::inspect(dir.path()).unwrap_err();
        assert!(matches!(err, RelayError::NotAFile(_)));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_is_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.txt");
        std::fs::write(&path, "top secret").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o000)).unwrap();

        // root ignores permission bits
        if File::open(&path).is_ok() {
            return;
        }

        let err = FileDescriptor::inspect(&path).unwrap_err();
        assert!(matches!(err, RelayError::Unreadable(_)));
    }
}
