//! File reading and writing for uploaded media and extracted text.

use crate::error::IoError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Result type for file operations.
pub type IoResult<T> = std::result::Result<T, IoError>;

/// Default upload size limit (16 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// An opened file with its size checked up front.
///
/// # Examples
///
/// ```no_run
/// use docqa_rs::io::FileReader;
///
/// let reader = FileReader::open("scan.png").unwrap();
/// let bytes = reader.read_to_bytes().unwrap();
/// ```
#[derive(Debug)]
pub struct FileReader {
    /// File handle.
    file: File,
    /// File size in bytes.
    size: u64,
    /// File path for error messages.
    path: String,
}

impl FileReader {
    /// Opens a file for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist or can't be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path_ref = path.as_ref();
        let path_str = path_ref.to_string_lossy().to_string();

        if !path_ref.is_file() {
            return Err(IoError::FileNotFound { path: path_str });
        }

        let file = File::open(path_ref).map_err(|e| IoError::ReadFailed {
            path: path_str.clone(),
            reason: e.to_string(),
        })?;

        let size = file
            .metadata()
            .map_err(|e| IoError::ReadFailed {
                path: path_str.clone(),
                reason: e.to_string(),
            })?
            .len();

        Ok(Self {
            file,
            size,
            path: path_str,
        })
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Reads the whole file.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    #[allow(clippy::cast_possible_truncation)]
    pub fn read_to_bytes(&self) -> IoResult<Vec<u8>> {
        let mut file = &self.file;
        let mut buffer = Vec::with_capacity(self.size as usize);
        file.read_to_end(&mut buffer)
            .map_err(|e| IoError::ReadFailed {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        Ok(buffer)
    }
}

/// Reads a file's bytes.
///
/// # Errors
///
/// Returns an error if the file is missing or unreadable.
pub fn read_bytes<P: AsRef<Path>>(path: P) -> IoResult<Vec<u8>> {
    FileReader::open(path)?.read_to_bytes()
}

/// Writes content to a file, creating parent directories if needed.
///
/// # Errors
///
/// Returns an error if directory creation or file writing fails.
pub fn write_file<P: AsRef<Path>>(path: P, content: &str) -> IoResult<()> {
    let path_ref = path.as_ref();
    let path_str = path_ref.to_string_lossy().to_string();

    if let Some(parent) = path_ref.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| IoError::DirectoryFailed {
            path: parent.to_string_lossy().to_string(),
            reason: e.to_string(),
        })?;
    }

    std::fs::write(path_ref, content).map_err(|e| IoError::WriteFailed {
        path: path_str,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("clip.wav");
        std::fs::write(&file_path, [0u8, 159, 146, 150]).unwrap();

        let bytes = read_bytes(&file_path).unwrap();
        assert_eq!(bytes, vec![0u8, 159, 146, 150]);
    }

    #[test]
    fn test_read_nonexistent_file() {
        let result = read_bytes("/nonexistent/path/scan.png");
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = FileReader::open(temp_dir.path());
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }

    #[test]
    fn test_file_reader_size_before_read() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("scan.png");
        std::fs::write(&file_path, [0xffu8, 0xd8, 0xff, 0xe0, 0x00]).unwrap();

        let reader = FileReader::open(&file_path).unwrap();
        assert_eq!(reader.size(), 5);
        assert_eq!(reader.read_to_bytes().unwrap(), vec![0xffu8, 0xd8, 0xff, 0xe0, 0x00]);
    }

    #[test]
    fn test_write_file_to_nested_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("a/b/scan_ocr.txt");

        write_file(&file_path, "recognized text").unwrap();
        assert_eq!(
            std::fs::read_to_string(&file_path).unwrap(),
            "recognized text"
        );
    }

    #[test]
    fn test_write_file_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("out.txt");

        write_file(&file_path, "first").unwrap();
        write_file(&file_path, "second").unwrap();
        assert_eq!(std::fs::read_to_string(&file_path).unwrap(), "second");
    }
}
