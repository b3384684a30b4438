use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }

    /// Names of the regular files directly under `dir`, sorted.
    /// A missing directory yields an empty list.
    pub fn list_files(&self, dir: &str) -> Result<Vec<String>> {
        let full_path = self.full_path(dir);
        if !full_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(full_path)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = fs::read(self.full_path(path))?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }

    async fn exists(&self, path: &str) -> bool {
        self.full_path(path).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().to_string_lossy().into_owned());

        storage.write_file("a/b/page.html", b"<p>ok</p>").await.unwrap();

        assert!(storage.exists("a/b/page.html").await);
        assert_eq!(storage.read_file("a/b/page.html").await.unwrap(), b"<p>ok</p>".to_vec());
    }

    #[tokio::test]
    async fn test_list_files_skips_directories() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().to_string_lossy().into_owned());
        storage.write_file("images/b.svg", b"b").await.unwrap();
        storage.write_file("images/a.svg", b"a").await.unwrap();
        storage.write_file("images/nested/c.svg", b"c").await.unwrap();

        assert_eq!(storage.list_files("images").unwrap(), vec!["a.svg", "b.svg"]);
        assert!(storage.list_files("missing").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().to_string_lossy().into_owned());

        let err = storage.read_file("nope.html").await.unwrap_err();
        assert!(matches!(err, crate::utils::error::BulletinError::IoError(_)));
    }
}
