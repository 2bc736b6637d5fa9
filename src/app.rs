//! Application composition root.
//!
//! Wires the configuration, the durable storage backend, and the two stores
//! together. Cross-store rules live here: the document store never reads the
//! auth store itself, so the facade injects the active company id into every
//! operation that needs it.

use crate::auth::{AuthError, AuthStore, CompanyDraft, UserPatch};
use crate::config::Config;
use crate::documents::{filter_documents, Document, DocumentDraft, DocumentFilter, DocumentStore};
use crate::error::AppResult;
use crate::storage::{FileStorage, Storage};
use log::*;
use std::sync::Arc;
use std::time::Duration;

/// Owns the stores and coordinates the operations UI collaborators invoke.
///
pub struct App {
    auth: AuthStore,
    documents: DocumentStore,
}

impl App {
    /// Start a new application according to the given configuration, backed
    /// by file storage under the configured data directory.
    ///
    pub fn start(config: &Config) -> AppResult<App> {
        info!("Starting application...");
        let storage_dir = config.storage_dir()?;
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(&storage_dir)?);
        Ok(App::with_storage(config, storage))
    }

    /// Assemble the stores on top of an explicit storage backend. Tests and
    /// previews pass in-memory storage here.
    ///
    pub fn with_storage(config: &Config, storage: Arc<dyn Storage>) -> App {
        let mut auth = AuthStore::load(storage.clone());
        auth.set_login_delay(Duration::from_millis(config.login_delay_ms));
        let documents = DocumentStore::load(storage);
        App { auth, documents }
    }

    /// Read access to the auth/company store.
    ///
    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    /// Mutable access to the auth/company store for operations that need no
    /// cross-store coordination.
    ///
    pub fn auth_mut(&mut self) -> &mut AuthStore {
        &mut self.auth
    }

    /// Read access to the document store.
    ///
    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// Attempt to log in with the given credentials.
    ///
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        self.auth.login(email, password).await
    }

    /// Log out the current session.
    ///
    pub fn logout(&mut self) {
        self.auth.logout();
    }

    /// Merge the given fields into the current user record.
    ///
    pub fn update_user(&mut self, patch: UserPatch) {
        self.auth.update_user(patch);
    }

    /// Activate the company matching the given id.
    ///
    pub fn switch_company(&mut self, company_id: &str) {
        self.auth.switch_company(company_id);
    }

    /// Add a company from the given draft.
    ///
    pub fn add_company(&mut self, draft: CompanyDraft) {
        self.auth.add_company(draft);
    }

    /// Remove the company matching the given id and cascade-delete its
    /// documents so none are left orphaned.
    ///
    pub fn remove_company(&mut self, company_id: &str) -> Result<(), AuthError> {
        self.auth.remove_company(company_id)?;
        self.documents.remove_company_documents(company_id);
        Ok(())
    }

    /// Add a document under the currently active company. Without an active
    /// company the call is a silent no-op.
    ///
    pub fn add_document(&mut self, draft: DocumentDraft) {
        let active_company_id = self.auth.active_company().map(|company| company.id.clone());
        self.documents
            .add_document(draft, active_company_id.as_deref());
    }

    /// Replace the document list filter specification.
    ///
    pub fn set_filter(&mut self, filter: DocumentFilter) {
        self.documents.set_filter(filter);
    }

    /// Delete the matching document.
    ///
    pub fn delete_document(&mut self, id: &str) {
        self.documents.delete_document(id);
    }

    /// Flip the favorite flag on the matching document.
    ///
    pub fn toggle_favorite(&mut self, id: &str) {
        self.documents.toggle_favorite(id);
    }

    /// Returns the documents belonging to the active company.
    ///
    pub fn company_documents(&self) -> Vec<&Document> {
        let active_company_id = self.auth.active_company().map(|company| company.id.as_str());
        self.documents.company_documents(active_company_id)
    }

    /// Returns the active company's documents run through the current filter
    /// specification, ready for the listing UI.
    ///
    pub fn visible_documents(&self) -> Vec<Document> {
        let scoped: Vec<Document> = self
            .company_documents()
            .into_iter()
            .cloned()
            .collect();
        filter_documents(&scoped, self.documents.filter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{FileType, MainCategory, SortKey, SortOrder};
    use crate::storage::MemoryStorage;

    fn app() -> App {
        let mut config = Config::new();
        config.login_delay_ms = 0;
        App::with_storage(&config, Arc::new(MemoryStorage::new()))
    }

    fn draft(title: &str) -> DocumentDraft {
        DocumentDraft {
            title: title.to_string(),
            main_category: MainCategory::Comptabilite,
            sub_category: None,
            file_type: FileType::Image,
            image_uri: format!("file:///{}.jpg", title),
            tags: vec![],
            notes: None,
            amount: None,
            currency: None,
            favorite: false,
            processed: false,
        }
    }

    #[test]
    fn add_document_uses_active_company() {
        let mut app = app();
        app.add_company(CompanyDraft {
            name: "Acme".to_string(),
            ..CompanyDraft::default()
        });
        app.add_document(draft("Receipt"));
        let active_id = app.auth().active_company().unwrap().id.clone();
        assert_eq!(app.documents().documents()[0].company_id, active_id);
    }

    #[test]
    fn add_document_without_company_is_noop() {
        let mut app = app();
        app.add_document(draft("Receipt"));
        assert!(app.documents().documents().is_empty());
    }

    #[test]
    fn company_documents_follow_active_company() {
        let mut app = app();
        app.add_company(CompanyDraft {
            name: "Acme".to_string(),
            ..CompanyDraft::default()
        });
        app.add_document(draft("acme-doc"));

        app.add_company(CompanyDraft {
            name: "Globex".to_string(),
            ..CompanyDraft::default()
        });
        let globex_id = app.auth().companies()[1].id.clone();
        app.switch_company(&globex_id);
        app.add_document(draft("globex-doc"));

        let visible = app.company_documents();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "globex-doc");
    }

    #[test]
    fn remove_company_cascades_to_documents() {
        let mut app = app();
        app.add_company(CompanyDraft {
            name: "Acme".to_string(),
            ..CompanyDraft::default()
        });
        app.add_document(draft("acme-doc"));
        let acme_id = app.auth().companies()[0].id.clone();

        app.add_company(CompanyDraft {
            name: "Globex".to_string(),
            ..CompanyDraft::default()
        });
        app.remove_company(&acme_id).unwrap();

        assert!(app.documents().documents().is_empty());
        assert_eq!(app.auth().active_company().unwrap().name, "Globex");
    }

    #[test]
    fn remove_company_refuses_last_one() {
        let mut app = app();
        app.add_company(CompanyDraft {
            name: "Acme".to_string(),
            ..CompanyDraft::default()
        });
        app.add_document(draft("kept"));
        let id = app.auth().companies()[0].id.clone();

        assert!(app.remove_company(&id).is_err());
        assert_eq!(app.documents().documents().len(), 1);
    }

    #[test]
    fn visible_documents_apply_the_current_filter() {
        let mut app = app();
        app.add_company(CompanyDraft {
            name: "Acme".to_string(),
            ..CompanyDraft::default()
        });
        app.add_document(DocumentDraft {
            amount: Some(100.0),
            ..draft("Invoice A")
        });
        app.add_document(DocumentDraft {
            amount: Some(50.0),
            ..draft("Invoice B")
        });

        app.set_filter(DocumentFilter {
            main_category: Some(MainCategory::Comptabilite),
            sort_by: Some(SortKey::Amount),
            sort_order: Some(SortOrder::Asc),
            ..DocumentFilter::default()
        });

        let visible = app.visible_documents();
        let titles: Vec<&str> = visible.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["Invoice B", "Invoice A"]);
    }

    #[tokio::test(start_paused = true)]
    async fn login_then_scan_flow() {
        let mut app = app();
        assert!(app.login("user@example.com", "hunter2").await);
        app.add_document(draft("Receipt"));
        assert_eq!(app.visible_documents().len(), 1);

        app.logout();
        // Companies survive logout, so the document stays visible.
        assert_eq!(app.visible_documents().len(), 1);
    }

    #[test]
    fn state_survives_restart() {
        let storage = Arc::new(MemoryStorage::new());
        let mut config = Config::new();
        config.login_delay_ms = 0;
        {
            let mut app = App::with_storage(&config, storage.clone());
            app.add_company(CompanyDraft {
                name: "Acme".to_string(),
                ..CompanyDraft::default()
            });
            app.add_document(draft("Receipt"));
        }

        let app = App::with_storage(&config, storage);
        assert_eq!(app.auth().companies().len(), 1);
        assert_eq!(app.company_documents().len(), 1);
    }
}
