use std::collections::BTreeMap;

use crate::{DocId, DocumentStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentData {
    pub rating: i32,
    pub status: DocumentStatus,
}

/// Per-document metadata and ids in insertion order.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: BTreeMap<DocId, DocumentData>,
    document_ids: Vec<DocId>,
}

impl DocumentStore {
    pub fn insert(&mut self, id: DocId, data: DocumentData) {
        if self.documents.insert(id, data).is_none() {
            self.document_ids.push(id);
        }
    }

    pub fn remove(&mut self, id: DocId) -> Option<DocumentData> {
        let data = self.documents.remove(&id)?;
        if let Some(pos) = self.document_ids.iter().position(|&d| d == id) {
            self.document_ids.remove(pos);
        }
        Some(data)
    }

    pub fn get(&self, id: DocId) -> Option<&DocumentData> {
        self.documents.get(&id)
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.documents.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.document_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document_ids.is_empty()
    }

    pub fn ids(&self) -> &[DocId] {
        &self.document_ids
    }
}
