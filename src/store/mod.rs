//! Link store module
//!
//! Persists the short-id ↔ URL mapping as a single JSON document. Two key
//! prefixes namespace the flat object:
//!
//! - `url-target:<short_id>` → destination URL
//! - `reverse-url:<url>` → short id (dedup lookup on insert)
//!
//! The mapping is cached in memory behind a `RwLock` and the whole file is
//! rewritten on every successful insert, so writers cannot interleave.

pub mod shortid;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

const TARGET_PREFIX: &str = "url-target:";
const REVERSE_PREFIX: &str = "reverse-url:";

/// Flat-file store for short links
pub struct LinkStore {
    data_path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl LinkStore {
    /// Open the store, loading the data file if it exists
    ///
    /// A missing file is an empty store; an unreadable or unparseable file
    /// is an error.
    pub fn open(data_path: &Path) -> Result<Self, String> {
        let entries = if data_path.exists() {
            let content = fs::read_to_string(data_path)
                .map_err(|e| format!("Failed to read data file {}: {e}", data_path.display()))?;
            serde_json::from_str(&content)
                .map_err(|e| format!("Failed to parse data file {}: {e}", data_path.display()))?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            data_path: data_path.to_path_buf(),
            entries: RwLock::new(entries),
        })
    }

    /// Number of stored short links
    pub async fn link_count(&self) -> usize {
        // Each link occupies a target entry and a reverse entry
        self.entries.read().await.len() / 2
    }

    /// Look up the destination URL for a short id
    pub async fn resolve(&self, short_id: &str) -> Option<String> {
        self.entries
            .read()
            .await
            .get(&format!("{TARGET_PREFIX}{short_id}"))
            .cloned()
    }

    /// Insert a URL and return its short id
    ///
    /// A URL already in the store returns its existing id without touching
    /// the file. The id is derived from the current timestamp; see
    /// [`insert_url_at`](Self::insert_url_at) for the allocation rule.
    pub async fn insert_url(&self, url: &str) -> Result<String, String> {
        self.insert_url_at(url, shortid::current_stamp()).await
    }

    /// Insert a URL using the given timestamp stamp as the id source
    ///
    /// When the base-36 encoding of `stamp` is already taken (two inserts
    /// within the same second), the stamp is probed forward until a free id
    /// is found. The in-memory map only changes if the file write succeeds.
    pub async fn insert_url_at(&self, url: &str, stamp: u64) -> Result<String, String> {
        let mut entries = self.entries.write().await;

        let reverse_key = format!("{REVERSE_PREFIX}{url}");
        if let Some(existing) = entries.get(&reverse_key) {
            return Ok(existing.clone());
        }

        let mut bump = 0u64;
        let short_id = loop {
            let candidate = shortid::base36_encode(stamp + bump);
            if !entries.contains_key(&format!("{TARGET_PREFIX}{candidate}")) {
                break candidate;
            }
            bump += 1;
        };

        let target_key = format!("{TARGET_PREFIX}{short_id}");
        entries.insert(target_key.clone(), url.to_string());
        entries.insert(reverse_key.clone(), short_id.clone());

        if let Err(e) = self.write_file(&entries) {
            // Keep memory consistent with the file
            entries.remove(&target_key);
            entries.remove(&reverse_key);
            return Err(e);
        }

        Ok(short_id)
    }

    /// Rewrite the whole data file from the given map
    fn write_file(&self, entries: &BTreeMap<String, String>) -> Result<(), String> {
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| format!("Failed to serialize link data: {e}"))?;
        fs::write(&self.data_path, content).map_err(|e| {
            format!(
                "Failed to write data file {}: {e}",
                self.data_path.display()
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TempDataFile(PathBuf);

    impl TempDataFile {
        fn new(name: &str) -> Self {
            let path = std::env::temp_dir().join(format!(
                "shortly-test-{}-{name}.json",
                std::process::id()
            ));
            let _ = fs::remove_file(&path);
            Self(path)
        }
    }

    impl Drop for TempDataFile {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    #[tokio::test]
    async fn test_insert_and_resolve() {
        let file = TempDataFile::new("insert-resolve");
        let store = LinkStore::open(&file.0).unwrap();

        let id = store
            .insert_url_at("https://example.com/", 20_260_807_093_015)
            .await
            .unwrap();
        assert_eq!(id, "76jopfac7");
        assert_eq!(
            store.resolve(&id).await.as_deref(),
            Some("https://example.com/")
        );
        assert_eq!(store.resolve("missing").await, None);
        assert_eq!(store.link_count().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_url_returns_same_id() {
        let file = TempDataFile::new("dedup");
        let store = LinkStore::open(&file.0).unwrap();

        let first = store
            .insert_url_at("https://example.com/page", 20_260_807_093_015)
            .await
            .unwrap();
        let second = store
            .insert_url_at("https://example.com/page", 20_260_807_093_016)
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(store.link_count().await, 1);
    }

    #[tokio::test]
    async fn test_same_stamp_yields_distinct_ids() {
        let file = TempDataFile::new("collision");
        let store = LinkStore::open(&file.0).unwrap();

        let stamp = 20_260_807_093_015;
        let a = store.insert_url_at("https://a.example/", stamp).await.unwrap();
        let b = store.insert_url_at("https://b.example/", stamp).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.resolve(&a).await.as_deref(), Some("https://a.example/"));
        assert_eq!(store.resolve(&b).await.as_deref(), Some("https://b.example/"));
    }

    #[tokio::test]
    async fn test_reload_from_file() {
        let file = TempDataFile::new("reload");
        let id = {
            let store = LinkStore::open(&file.0).unwrap();
            store
                .insert_url_at("https://example.com/", 20_260_807_093_015)
                .await
                .unwrap()
        };

        let reloaded = LinkStore::open(&file.0).unwrap();
        assert_eq!(
            reloaded.resolve(&id).await.as_deref(),
            Some("https://example.com/")
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let file = TempDataFile::new("missing");
        let store = LinkStore::open(&file.0).unwrap();
        assert_eq!(store.link_count().await, 0);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let file = TempDataFile::new("corrupt");
        fs::write(&file.0, "not json").unwrap();
        assert!(LinkStore::open(&file.0).is_err());
    }
}
