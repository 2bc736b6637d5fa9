use crate::documents::{Document, DocumentDraft, DocumentFilter, DocumentPatch};
use crate::storage::{Storage, DOCUMENT_NAMESPACE};
use crate::utils::{now_millis, ChangeCallback, IdSource};
use log::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Persisted portion of the document state. The filter is view state and is
/// deliberately not part of the snapshot: a fresh session starts from the
/// default filter.
///
#[derive(Serialize, Deserialize, Default)]
struct Snapshot {
    #[serde(default)]
    documents: Vec<Document>,
}

/// Owns the document collection and the current filter specification.
///
/// The store never reads the auth store directly: operations that depend on
/// the active company receive its id from the caller. Every mutation
/// persists a full snapshot fire-and-forget; write failures are logged,
/// never surfaced.
///
pub struct DocumentStore {
    storage: Arc<dyn Storage>,
    documents: Vec<Document>,
    filter: DocumentFilter,
    ids: IdSource,
    change_callback: Option<ChangeCallback>,
}

impl DocumentStore {
    /// Load the persisted snapshot from the given storage, starting fresh
    /// when the namespace is absent or unreadable.
    ///
    pub fn load(storage: Arc<dyn Storage>) -> DocumentStore {
        let snapshot = match storage.read(DOCUMENT_NAMESPACE) {
            Ok(Some(blob)) => match serde_json::from_slice::<Snapshot>(&blob) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!("Discarding unreadable document snapshot: {}", e);
                    Snapshot::default()
                }
            },
            Ok(None) => Snapshot::default(),
            Err(e) => {
                warn!("Failed to read document snapshot, starting fresh: {}", e);
                Snapshot::default()
            }
        };
        DocumentStore {
            storage,
            documents: snapshot.documents,
            filter: DocumentFilter::default(),
            ids: IdSource::new(),
            change_callback: None,
        }
    }

    /// Install a callback invoked after every mutation.
    ///
    pub fn set_change_callback(&mut self, callback: ChangeCallback) -> &mut Self {
        self.change_callback = Some(callback);
        self
    }

    /// Returns the full document collection across all companies.
    ///
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Returns the current filter specification.
    ///
    pub fn filter(&self) -> &DocumentFilter {
        &self.filter
    }

    /// Add a document from the given draft, binding it to the active
    /// company. Without an active company the call is a silent no-op. The
    /// store mints the id and stamps both timestamps.
    ///
    pub fn add_document(
        &mut self,
        draft: DocumentDraft,
        active_company_id: Option<&str>,
    ) -> &mut Self {
        let company_id = match active_company_id {
            Some(id) => id.to_string(),
            None => {
                debug!("Ignoring document add: no active company");
                return self;
            }
        };

        if let Some(sub_category) = draft.sub_category {
            if !sub_category.belongs_to(draft.main_category) {
                warn!(
                    "Document '{}' filed with sub-category {:?} outside {:?}",
                    draft.title, sub_category, draft.main_category
                );
            }
        }

        let now = now_millis();
        let document = Document {
            id: self.ids.next_id(),
            title: draft.title,
            main_category: draft.main_category,
            sub_category: draft.sub_category,
            file_type: draft.file_type,
            image_uri: draft.image_uri,
            created_at: now,
            updated_at: now,
            tags: draft.tags,
            notes: draft.notes,
            amount: draft.amount,
            currency: draft.currency,
            favorite: draft.favorite,
            processed: draft.processed,
            company_id,
        };
        info!("Added document {} ({})", document.title, document.id);
        self.documents.push(document);
        self.persist();
        self.notify();
        self
    }

    /// Merge the given fields into the matching document and refresh its
    /// update timestamp; no-op when the id is unknown.
    ///
    pub fn update_document(&mut self, id: &str, patch: DocumentPatch) -> &mut Self {
        let now = now_millis();
        if let Some(document) = self.documents.iter_mut().find(|d| d.id == id) {
            if let Some(title) = patch.title {
                document.title = title;
            }
            if let Some(main_category) = patch.main_category {
                document.main_category = main_category;
            }
            if let Some(sub_category) = patch.sub_category {
                document.sub_category = sub_category;
            }
            if let Some(file_type) = patch.file_type {
                document.file_type = file_type;
            }
            if let Some(image_uri) = patch.image_uri {
                document.image_uri = image_uri;
            }
            if let Some(tags) = patch.tags {
                document.tags = tags;
            }
            if let Some(notes) = patch.notes {
                document.notes = notes;
            }
            if let Some(amount) = patch.amount {
                document.amount = amount;
            }
            if let Some(currency) = patch.currency {
                document.currency = currency;
            }
            if let Some(favorite) = patch.favorite {
                document.favorite = favorite;
            }
            if let Some(processed) = patch.processed {
                document.processed = processed;
            }
            // Guard against a clock stepping backwards between mutations.
            document.updated_at = now.max(document.updated_at);
            self.persist();
            self.notify();
        } else {
            debug!("Ignoring update for unknown document {}", id);
        }
        self
    }

    /// Remove the matching document; no-op when the id is unknown.
    ///
    pub fn delete_document(&mut self, id: &str) -> &mut Self {
        let before = self.documents.len();
        self.documents.retain(|document| document.id != id);
        if self.documents.len() != before {
            info!("Deleted document {}", id);
            self.persist();
            self.notify();
        } else {
            debug!("Ignoring delete for unknown document {}", id);
        }
        self
    }

    /// Flip the favorite flag on the matching document and refresh its
    /// update timestamp; no-op when the id is unknown.
    ///
    pub fn toggle_favorite(&mut self, id: &str) -> &mut Self {
        let now = now_millis();
        if let Some(document) = self.documents.iter_mut().find(|d| d.id == id) {
            document.favorite = !document.favorite;
            document.updated_at = now.max(document.updated_at);
            self.persist();
            self.notify();
        } else {
            debug!("Ignoring favorite toggle for unknown document {}", id);
        }
        self
    }

    /// Replace the entire filter specification. Callers pass the full
    /// desired specification; this is never a merge.
    ///
    pub fn set_filter(&mut self, filter: DocumentFilter) -> &mut Self {
        self.filter = filter;
        self.notify();
        self
    }

    /// Returns the documents belonging to the active company, or an empty
    /// collection when no company is active. Derived view, not stored.
    ///
    pub fn company_documents(&self, active_company_id: Option<&str>) -> Vec<&Document> {
        match active_company_id {
            Some(company_id) => self
                .documents
                .iter()
                .filter(|document| document.company_id == company_id)
                .collect(),
            None => vec![],
        }
    }

    /// Remove every document belonging to the given company. Invoked when a
    /// company is removed so no orphaned documents remain.
    ///
    pub fn remove_company_documents(&mut self, company_id: &str) -> &mut Self {
        let before = self.documents.len();
        self.documents
            .retain(|document| document.company_id != company_id);
        let removed = before - self.documents.len();
        if removed > 0 {
            info!("Removed {} documents of company {}", removed, company_id);
            self.persist();
            self.notify();
        }
        self
    }

    /// Write the current snapshot to durable storage. In-memory state is
    /// already correct when this runs, so failures are logged and dropped.
    ///
    fn persist(&self) {
        let snapshot = Snapshot {
            documents: self.documents.clone(),
        };
        let blob = match serde_json::to_vec(&snapshot) {
            Ok(blob) => blob,
            Err(e) => {
                error!("Failed to serialize document snapshot: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.write(DOCUMENT_NAMESPACE, &blob) {
            error!("Failed to persist document state: {}", e);
        }
    }

    fn notify(&self) {
        if let Some(callback) = &self.change_callback {
            callback();
        }
    }
}
