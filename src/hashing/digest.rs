use std::hash::Hasher;
use std::path::{Path, PathBuf};

use compio::fs;
use derive_more::Display;
use metrohash::MetroHash128;
use snafu::{ResultExt, Snafu};
use tracing::trace;

use crate::ext::AsyncTryFrom;

/// 128-bit MetroHash of a file's complete byte content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("{_0:032x}")]
pub struct Digest(u128);

impl Digest {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = MetroHash128::new();
        hasher.write(bytes);
        let (high, low) = hasher.finish128();
        Digest((u128::from(high) << 64) | u128::from(low))
    }
}

impl AsyncTryFrom<&Path> for Digest {
    type Error = HashError;

    async fn async_try_from(path: &Path) -> Result<Self, Self::Error> {
        let metadata = path.metadata().context(MetadataSnafu { path })?;

        if metadata.is_dir() {
            return DirectorySnafu { path }.fail();
        }

        let bytes = fs::read(path).await.context(ReadSnafu { path })?;

        let expected = metadata.len();
        let actual = bytes.len() as u64;
        if actual != expected {
            return ShortReadSnafu {
                path,
                expected,
                actual,
            }
            .fail();
        }

        let digest = Digest::of_bytes(&bytes);
        trace!("Digest of {}: {}", path.display(), digest);
        Ok(digest)
    }
}

#[derive(Debug, Snafu)]
pub enum HashError {
    #[snafu(display("{} can't be opened", path.display()))]
    MetadataError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("{} is a directory and has no content to hash", path.display()))]
    DirectoryError {
        path: PathBuf,
    },
    #[snafu(display("{} can't be read", path.display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display(
        "{} can't be read: got {actual} of {expected} bytes",
        path.display()
    ))]
    ShortReadError {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn temp_file_with(content: &[u8]) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        temp_file
            .write_all(content)
            .expect("Failed to write to temp file");
        temp_file.flush().expect("Failed to flush temp file");
        temp_file
    }

    #[compio::test]
    async fn test_digest_matches_in_memory_digest() {
        let temp_file = temp_file_with(b"test content");

        let digest = Digest::async_try_from(temp_file.path())
            .await
            .expect("Failed to hash file");

        assert_eq!(digest, Digest::of_bytes(b"test content"));
    }

    #[compio::test]
    async fn test_digest_is_stable_across_reads() {
        let temp_file = temp_file_with(b"read me twice");

        let first = Digest::async_try_from(temp_file.path())
            .await
            .expect("Failed to create first digest");
        let second = Digest::async_try_from(temp_file.path())
            .await
            .expect("Failed to create second digest");

        assert_eq!(first, second);
    }

    #[compio::test]
    async fn test_same_content_same_digest_regardless_of_path() {
        let first = temp_file_with(b"identical content");
        let second = temp_file_with(b"identical content");

        let first = Digest::async_try_from(first.path()).await.unwrap();
        let second = Digest::async_try_from(second.path()).await.unwrap();

        assert_eq!(first, second);
    }

    #[rstest]
    #[case(b"X", b"Y")]
    #[case(b"", b"\0")]
    #[case(b"line\n", b"line\r\n")]
    #[case(b"abcdefgh", b"abcdefgi")]
    fn test_one_byte_difference_changes_digest(#[case] left: &[u8], #[case] right: &[u8]) {
        assert_ne!(Digest::of_bytes(left), Digest::of_bytes(right));
    }

    #[compio::test]
    async fn test_digest_of_large_file() {
        let content = vec![b'x'; 1024 * 1024];
        let temp_file = temp_file_with(&content);

        let digest = Digest::async_try_from(temp_file.path()).await.unwrap();

        assert_eq!(digest, Digest::of_bytes(&content));
    }

    #[compio::test]
    async fn test_digest_of_directory_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let result = Digest::async_try_from(temp_dir.path()).await;

        match result {
            Err(HashError::DirectoryError { path }) => assert_eq!(path, temp_dir.path()),
            other => panic!("Expected DirectoryError, got {other:?}"),
        }
    }

    #[compio::test]
    async fn test_digest_of_nonexistent_file_fails() {
        let nonexistent_path = Path::new("/this/path/does/not/exist.txt");

        let result = Digest::async_try_from(nonexistent_path).await;

        match result {
            Err(HashError::MetadataError { path, .. }) => assert_eq!(path, nonexistent_path),
            other => panic!("Expected MetadataError, got {other:?}"),
        }
    }

    #[cfg(target_os = "linux")]
    #[compio::test]
    async fn test_size_mismatch_between_metadata_and_read_fails() {
        // procfs reports a length of zero but yields content when read
        let status = Path::new("/proc/self/status");

        let result = Digest::async_try_from(status).await;

        match result {
            Err(HashError::ShortReadError {
                path,
                expected,
                actual,
            }) => {
                assert_eq!(path, status);
                assert_eq!(expected, 0);
                assert!(actual > 0);
            }
            other => panic!("Expected ShortReadError, got {other:?}"),
        }
    }

    #[test]
    fn test_digest_display_is_fixed_width_hex() {
        let rendered = Digest::of_bytes(b"").to_string();

        assert_eq!(rendered.len(), 32);
        assert!(rendered.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(Digest(1).to_string(), format!("{}1", "0".repeat(31)));
    }

    #[test]
    fn test_hash_error_display() {
        let short_read = HashError::ShortReadError {
            path: PathBuf::from("/tmp/a.txt"),
            expected: 10,
            actual: 4,
        };

        let message = short_read.to_string();
        assert!(message.contains("/tmp/a.txt"));
        assert!(message.contains("4 of 10"));
    }
}
