use async_trait::async_trait;
use log::{debug, info};
use rocket::serde::json::serde_json;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::book_store::BookStore;
use crate::book::{Book, Collection};
use crate::error::StoreError;
use crate::id::generate_id;

/// Store backed by a single JSON file holding an object keyed by book id.
///
/// Every operation reloads the whole file. Mutations rewrite it through a
/// sibling temporary file that is renamed over the original, and run one at
/// a time under `write_lock`.
pub struct FileStore {
    path: PathBuf,
    tmp_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Opens the store at `path`, creating the parent directory if needed.
    /// The file itself may be absent; if it exists it must parse.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let store = Self {
            tmp_path: tmp_path_for(&path),
            path,
            write_lock: Mutex::new(()),
        };
        let books = match fs::read(&store.path) {
            Ok(bytes) => store.decode(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Collection::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: store.path.clone(),
                    source,
                })
            }
        };
        info!(
            "Opened data file {} with {} books",
            store.path.display(),
            books.len()
        );
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decode(&self, bytes: &[u8]) -> Result<Collection, StoreError> {
        serde_json::from_slice(bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    async fn load(&self) -> Result<Collection, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => self.decode(&bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Collection::new()),
            Err(e) => Err(self.io_error(&self.path, e)),
        }
    }

    async fn save(&self, books: &Collection) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(books)?;
        let mut file = tokio::fs::File::create(&self.tmp_path)
            .await
            .map_err(|e| self.io_error(&self.tmp_path, e))?;
        file.write_all(&data)
            .await
            .map_err(|e| self.io_error(&self.tmp_path, e))?;
        file.sync_all()
            .await
            .map_err(|e| self.io_error(&self.tmp_path, e))?;
        drop(file);
        if let Err(e) = tokio::fs::rename(&self.tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&self.tmp_path).await;
            return Err(self.io_error(&self.path, e));
        }
        debug!("Wrote {} books to {}", books.len(), self.path.display());
        Ok(())
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

#[async_trait]
impl BookStore for FileStore {
    async fn list(&self) -> Result<Collection, StoreError> {
        self.load().await
    }

    async fn get(&self, id: &str) -> Result<Book, StoreError> {
        self.load()
            .await?
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create(&self, title: String) -> Result<Book, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut books = self.load().await?;
        let book = Book::new(generate_id(), title);
        books.insert(book.id.clone(), book.clone());
        self.save(&books).await?;
        debug!("created book {}", book.id);
        Ok(book)
    }

    async fn update(&self, id: &str, title: String) -> Result<Book, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut books = self.load().await?;
        let book = books
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        book.title = title;
        let updated = book.clone();
        self.save(&books).await?;
        debug!("updated book {}", id);
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut books = self.load().await?;
        books.remove(id);
        self.save(&books).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn setup_store() -> (TempDir, FileStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path().join("data.json")).unwrap();
        (temp_dir, store)
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let (_dir, store) = setup_store();
        assert!(!store.path().exists());
        assert!(store.list().await.unwrap().is_empty());
        assert!(matches!(
            store.get("missing").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_reopen_round_trip() {
        let (dir, store) = setup_store();
        let dune = store.create("Dune".to_string()).await.unwrap();
        let emma = store.create("Emma".to_string()).await.unwrap();
        store
            .update(&dune.id, "Dune Messiah".to_string())
            .await
            .unwrap();
        let before = store.list().await.unwrap();
        drop(store);

        let reopened = FileStore::open(dir.path().join("data.json")).unwrap();
        let after = reopened.list().await.unwrap();
        assert_eq!(before, after);
        assert_eq!(after[&dune.id].title, "Dune Messiah");
        assert_eq!(after[&emma.id], emma);
    }

    #[tokio::test]
    async fn test_file_is_pretty_printed() {
        let (_dir, store) = setup_store();
        let book = store.create("Dune".to_string()).await.unwrap();
        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("{\n  \""));
        assert!(text.contains(&format!("\n    \"id\": \"{}\"", book.id)));
        assert!(text.contains("\n    \"title\": \"Dune\""));
        assert!(!tmp_path_for(store.path()).exists());
    }

    #[tokio::test]
    async fn test_delete_rewrites_file() {
        let (_dir, store) = setup_store();
        let book = store.create("Dune".to_string()).await.unwrap();
        store.delete(&book.id).await.unwrap();
        store.delete(&book.id).await.unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_reads_external_edits() {
        let (_dir, store) = setup_store();
        fs::write(
            store.path(),
            r#"{"idabc": {"id": "idabc", "title": "Hand written"}}"#,
        )
        .unwrap();
        assert_eq!(store.get("idabc").await.unwrap().title, "Hand written");
    }

    #[test]
    fn test_open_rejects_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            FileStore::open(&path),
            Err(StoreError::Corrupt { .. })
        ));
        fs::write(&path, "").unwrap();
        assert!(matches!(
            FileStore::open(&path),
            Err(StoreError::Corrupt { .. })
        ));
        fs::write(&path, "null").unwrap();
        assert!(matches!(
            FileStore::open(&path),
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[tokio::test]
    async fn test_corruption_after_open_is_reported() {
        let (_dir, store) = setup_store();
        store.create("Dune".to_string()).await.unwrap();
        fs::write(store.path(), "{ broken").unwrap();
        let err = store.list().await.unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(
            store.create("Emma".to_string()).await,
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[tokio::test]
    async fn test_failed_rename_removes_tmp_file() {
        let (_dir, store) = setup_store();
        fs::create_dir(store.path()).unwrap();
        fs::write(store.path().join("occupied"), "x").unwrap();
        assert!(matches!(
            store.save(&Collection::new()).await,
            Err(StoreError::Io { .. })
        ));
        assert!(!tmp_path_for(store.path()).exists());
    }

    #[test]
    fn test_open_creates_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("data.json");
        FileStore::open(&path).unwrap();
        assert!(temp_dir.path().join("nested").is_dir());
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_all_kept() {
        let (_dir, store) = setup_store();
        let store = Arc::new(store);
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.create(format!("book {}", i)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(store.list().await.unwrap().len(), 16);
    }
}
