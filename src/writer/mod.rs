//! Persists fetched payloads to local files.
//!
//! The file name is the locator's trailing path segment. Locators differing
//! only in directory prefix collide on the same name; the last writer wins.
//! The `disambiguate` mode prefixes a digest of the full locator instead.

use std::fs;
use std::path::PathBuf;

use sha2::{Digest, Sha256};
use url::Url;

use crate::app::{Result, SluiceError};

#[derive(Debug, Clone)]
pub struct Writer {
    output_dir: PathBuf,
    disambiguate: bool,
}

impl Writer {
    pub fn new(output_dir: PathBuf, disambiguate: bool) -> Self {
        Self {
            output_dir,
            disambiguate,
        }
    }

    /// Derive the local file name from a locator's last path segment.
    pub fn file_name(&self, locator: &str) -> Result<String> {
        let url = Url::parse(locator)?;
        let name = url
            .path_segments()
            .and_then(|segments| segments.last())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| SluiceError::NoFileName(locator.to_string()))?;

        if self.disambiguate {
            let mut hasher = Sha256::new();
            hasher.update(locator.as_bytes());
            let digest = hex::encode(hasher.finalize());
            Ok(format!("{}-{}", &digest[..12], name))
        } else {
            Ok(name.to_string())
        }
    }

    /// Write the whole payload in one pass, overwriting silently.
    /// Returns the file name and the number of bytes written.
    pub fn write(&self, locator: &str, payload: &[u8]) -> Result<(String, u64)> {
        let name = self.file_name(locator)?;

        fs::create_dir_all(&self.output_dir)?;
        fs::write(self.output_dir.join(&name), payload)?;

        Ok((name, payload.len() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn writer(dir: &TempDir) -> Writer {
        Writer::new(dir.path().to_path_buf(), false)
    }

    #[test]
    fn test_file_name_is_last_segment() {
        let dir = TempDir::new().unwrap();
        let writer = writer(&dir);

        assert_eq!(
            writer.file_name("http://x/images/a.png").unwrap(),
            "a.png"
        );
    }

    #[test]
    fn test_query_string_not_part_of_name() {
        let dir = TempDir::new().unwrap();
        let writer = writer(&dir);

        assert_eq!(
            writer.file_name("http://x/img.png?v=2").unwrap(),
            "img.png"
        );
    }

    #[test]
    fn test_no_trailing_segment_is_an_error() {
        let dir = TempDir::new().unwrap();
        let writer = writer(&dir);

        assert!(writer.file_name("http://x/").is_err());
        assert!(writer.file_name("not a url").is_err());
    }

    #[test]
    fn test_write_round_trip() {
        let dir = TempDir::new().unwrap();
        let writer = writer(&dir);

        let (name, bytes) = writer.write("http://x/a.png", b"content").unwrap();

        assert_eq!(name, "a.png");
        assert_eq!(bytes, 7);
        assert_eq!(fs::read(dir.path().join("a.png")).unwrap(), b"content");
    }

    #[test]
    fn test_colliding_names_last_writer_wins() {
        let dir = TempDir::new().unwrap();
        let writer = writer(&dir);

        writer.write("http://x/img.png", b"first").unwrap();
        writer.write("http://y/img.png", b"second").unwrap();

        assert_eq!(fs::read(dir.path().join("img.png")).unwrap(), b"second");
    }

    #[test]
    fn test_disambiguate_distinguishes_hosts() {
        let dir = TempDir::new().unwrap();
        let writer = Writer::new(dir.path().to_path_buf(), true);

        let (name_x, _) = writer.write("http://x/img.png", b"first").unwrap();
        let (name_y, _) = writer.write("http://y/img.png", b"second").unwrap();

        assert_ne!(name_x, name_y);
        assert!(name_x.ends_with("-img.png"));
        assert_eq!(fs::read(dir.path().join(&name_x)).unwrap(), b"first");
        assert_eq!(fs::read(dir.path().join(&name_y)).unwrap(), b"second");
    }

    #[test]
    fn test_disambiguated_name_is_stable() {
        let dir = TempDir::new().unwrap();
        let writer = Writer::new(dir.path().to_path_buf(), true);

        assert_eq!(
            writer.file_name("http://x/img.png").unwrap(),
            writer.file_name("http://x/img.png").unwrap()
        );
    }
}
