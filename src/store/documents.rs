//! Document-store capability: `store(document, metadata) -> id`.
//!
//! The pipeline writes the approved final choice here when a store is
//! configured. Failures are the caller's to swallow.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;

/// A stored document with its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub id: String,
    pub document: String,
    pub metadata: BTreeMap<String, String>,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store a document and return its id.
    async fn store(
        &self,
        document: &str,
        metadata: BTreeMap<String, String>,
    ) -> Result<String, StoreError>;
}

/// 16 hex characters from 8 random bytes.
pub fn random_document_id() -> String {
    rand::random::<[u8; 8]>()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Process-local store, mainly for tests and demos.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<Vec<StoredDocument>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn documents(&self) -> Vec<StoredDocument> {
        self.documents.read().await.clone()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn store(
        &self,
        document: &str,
        metadata: BTreeMap<String, String>,
    ) -> Result<String, StoreError> {
        let id = random_document_id();
        self.documents.write().await.push(StoredDocument {
            id: id.clone(),
            document: document.to_string(),
            metadata,
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sixteen_hex_chars() {
        let id = random_document_id();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, random_document_id());
    }

    #[tokio::test]
    async fn in_memory_store_keeps_documents() {
        let store = InMemoryDocumentStore::new();
        let mut metadata = BTreeMap::new();
        metadata.insert("brand".to_string(), "Acme".to_string());

        let id = store.store("Best copy", metadata.clone()).await.unwrap();
        let docs = store.documents().await;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, id);
        assert_eq!(docs[0].document, "Best copy");
        assert_eq!(docs[0].metadata, metadata);
    }
}
