use crate::auth::{AuthError, Company, CompanyDraft, User, UserPatch};
use crate::storage::{Storage, AUTH_NAMESPACE};
use crate::utils::{ChangeCallback, IdSource};
use log::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

// Demo identity installed by the simulated credential check. A real identity
// provider replaces this wholesale.
fn demo_user() -> User {
    User {
        id: "1".to_string(),
        email: "user@example.com".to_string(),
        name: "John Doe".to_string(),
        avatar: Some("https://static.paperdesk.app/avatars/demo.jpg".to_string()),
    }
}

fn demo_companies() -> Vec<Company> {
    vec![
        Company {
            id: "1".to_string(),
            name: "Acme Inc.".to_string(),
            logo: Some("https://static.paperdesk.app/logos/acme.jpg".to_string()),
            industry: Some("Technology".to_string()),
            is_default: true,
        },
        Company {
            id: "2".to_string(),
            name: "Globex Corporation".to_string(),
            logo: Some("https://static.paperdesk.app/logos/globex.jpg".to_string()),
            industry: Some("Manufacturing".to_string()),
            is_default: false,
        },
        Company {
            id: "3".to_string(),
            name: "Soylent Corp".to_string(),
            logo: Some("https://static.paperdesk.app/logos/soylent.jpg".to_string()),
            industry: Some("Food & Beverage".to_string()),
            is_default: false,
        },
    ]
}

/// Persisted portion of the auth/company state. `is_loading` is transient
/// and deliberately excluded.
///
#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    user: Option<User>,
    #[serde(default)]
    companies: Vec<Company>,
    active_company_id: Option<String>,
    #[serde(default)]
    is_authenticated: bool,
    #[serde(default)]
    has_completed_onboarding: bool,
}

/// Owns the authenticated user, the company collection, and the currently
/// active company. Every mutation persists a full snapshot to durable
/// storage fire-and-forget; write failures are logged, never surfaced.
///
pub struct AuthStore {
    storage: Arc<dyn Storage>,
    user: Option<User>,
    companies: Vec<Company>,
    active_company_id: Option<String>,
    is_authenticated: bool,
    is_loading: bool,
    has_completed_onboarding: bool,
    login_delay: Duration,
    ids: IdSource,
    change_callback: Option<ChangeCallback>,
}

impl AuthStore {
    /// Load the persisted snapshot from the given storage, starting fresh
    /// when the namespace is absent or unreadable.
    ///
    pub fn load(storage: Arc<dyn Storage>) -> AuthStore {
        let snapshot = match storage.read(AUTH_NAMESPACE) {
            Ok(Some(blob)) => match serde_json::from_slice::<Snapshot>(&blob) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!("Discarding unreadable auth snapshot: {}", e);
                    Snapshot::default()
                }
            },
            Ok(None) => Snapshot::default(),
            Err(e) => {
                warn!("Failed to read auth snapshot, starting fresh: {}", e);
                Snapshot::default()
            }
        };
        AuthStore {
            storage,
            user: snapshot.user,
            companies: snapshot.companies,
            active_company_id: snapshot.active_company_id,
            is_authenticated: snapshot.is_authenticated,
            is_loading: false,
            has_completed_onboarding: snapshot.has_completed_onboarding,
            login_delay: Duration::from_millis(1000),
            ids: IdSource::new(),
            change_callback: None,
        }
    }

    /// Override the simulated credential check delay.
    ///
    pub fn set_login_delay(&mut self, delay: Duration) -> &mut Self {
        self.login_delay = delay;
        self
    }

    /// Install a callback invoked after every mutation.
    ///
    pub fn set_change_callback(&mut self, callback: ChangeCallback) -> &mut Self {
        self.change_callback = Some(callback);
        self
    }

    /// Returns details for current user.
    ///
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Returns the company collection.
    ///
    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    /// Returns a reference to the active company or None.
    ///
    pub fn active_company(&self) -> Option<&Company> {
        match &self.active_company_id {
            Some(active_company_id) => self
                .companies
                .iter()
                .find(|company| active_company_id == &company.id),
            None => None,
        }
    }

    /// Whether a user session is currently authenticated.
    ///
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    /// Whether a login is currently in flight.
    ///
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether the first-run onboarding flow has been completed.
    ///
    pub fn has_completed_onboarding(&self) -> bool {
        self.has_completed_onboarding
    }

    /// Attempt to log in with the given credentials. Suspends once for the
    /// simulated credential check, then accepts any non-empty email and
    /// password, installing the demo identity and companies and activating
    /// the default company. Returns false on empty input without touching
    /// authenticated state.
    ///
    /// Single-flight: a call made while another login is in flight is
    /// rejected immediately.
    ///
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        if self.is_loading {
            warn!("Rejecting login attempt while another is in flight");
            return false;
        }
        self.is_loading = true;
        self.notify();

        // Simulated credential check stands in for a real identity provider.
        tokio::time::sleep(self.login_delay).await;

        if email.is_empty() || password.is_empty() {
            debug!("Login rejected: empty credentials");
            self.is_loading = false;
            self.notify();
            return false;
        }

        let companies = demo_companies();
        self.active_company_id = companies
            .iter()
            .find(|company| company.is_default)
            .or_else(|| companies.first())
            .map(|company| company.id.clone());
        self.user = Some(demo_user());
        self.companies = companies;
        self.is_authenticated = true;
        self.is_loading = false;
        info!("Logged in as {}", email);
        self.persist();
        self.notify();
        true
    }

    /// Log out the current session. Clears the user and authenticated flag
    /// but keeps the company collection and active company so the scope
    /// survives re-login.
    ///
    pub fn logout(&mut self) -> &mut Self {
        self.user = None;
        self.is_authenticated = false;
        info!("Logged out");
        self.persist();
        self.notify();
        self
    }

    /// Activate the company matching the given id; unknown ids are ignored.
    ///
    pub fn switch_company(&mut self, company_id: &str) -> &mut Self {
        if self.companies.iter().any(|company| company.id == company_id) {
            self.active_company_id = Some(company_id.to_string());
            debug!("Switched active company to {}", company_id);
            self.persist();
            self.notify();
        } else {
            debug!("Ignoring switch to unknown company {}", company_id);
        }
        self
    }

    /// Add a company from the given draft, minting its id. A draft marked
    /// default demotes any previous default so at most one remains. When the
    /// collection was empty, the new company becomes active.
    ///
    pub fn add_company(&mut self, draft: CompanyDraft) -> &mut Self {
        let company = Company {
            id: self.ids.next_id(),
            name: draft.name,
            logo: draft.logo,
            industry: draft.industry,
            is_default: draft.is_default,
        };
        if company.is_default {
            for existing in &mut self.companies {
                existing.is_default = false;
            }
        }
        let was_empty = self.companies.is_empty();
        info!("Added company {} ({})", company.name, company.id);
        if was_empty {
            self.active_company_id = Some(company.id.clone());
        }
        self.companies.push(company);
        self.persist();
        self.notify();
        self
    }

    /// Remove the company matching the given id. Unknown ids are ignored.
    /// Removing the last remaining company is refused so the collection
    /// never becomes empty underneath existing documents. If the removed
    /// company was active, the first remaining company becomes active.
    ///
    pub fn remove_company(&mut self, company_id: &str) -> Result<(), AuthError> {
        if !self.companies.iter().any(|company| company.id == company_id) {
            debug!("Ignoring removal of unknown company {}", company_id);
            return Ok(());
        }
        if self.companies.len() == 1 {
            return Err(AuthError::LastCompany);
        }

        self.companies.retain(|company| company.id != company_id);
        if self.active_company_id.as_deref() == Some(company_id) {
            self.active_company_id = self.companies.first().map(|company| company.id.clone());
        }
        info!("Removed company {}", company_id);
        self.persist();
        self.notify();
        Ok(())
    }

    /// Merge the given fields into the current user record; no-op when no
    /// user is set.
    ///
    pub fn update_user(&mut self, patch: UserPatch) -> &mut Self {
        if let Some(user) = &mut self.user {
            if let Some(email) = patch.email {
                user.email = email;
            }
            if let Some(name) = patch.name {
                user.name = name;
            }
            if let Some(avatar) = patch.avatar {
                user.avatar = Some(avatar);
            }
            self.persist();
            self.notify();
        } else {
            debug!("Ignoring user update: no user set");
        }
        self
    }

    /// Set the flag gating the first-run onboarding flow.
    ///
    pub fn set_onboarding_complete(&mut self, completed: bool) -> &mut Self {
        self.has_completed_onboarding = completed;
        self.persist();
        self.notify();
        self
    }

    /// Write the current snapshot to durable storage. In-memory state is
    /// already correct when this runs, so failures are logged and dropped.
    ///
    fn persist(&self) {
        let snapshot = Snapshot {
            user: self.user.clone(),
            companies: self.companies.clone(),
            active_company_id: self.active_company_id.clone(),
            is_authenticated: self.is_authenticated,
            has_completed_onboarding: self.has_completed_onboarding,
        };
        let blob = match serde_json::to_vec(&snapshot) {
            Ok(blob) => blob,
            Err(e) => {
                error!("Failed to serialize auth snapshot: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.write(AUTH_NAMESPACE, &blob) {
            error!("Failed to persist auth state: {}", e);
        }
    }

    fn notify(&self) {
        if let Some(callback) = &self.change_callback {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use fake::{Fake, Faker};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn store() -> AuthStore {
        let mut store = AuthStore::load(Arc::new(MemoryStorage::new()));
        store.set_login_delay(Duration::from_millis(0));
        store
    }

    #[tokio::test(start_paused = true)]
    async fn login_accepts_non_empty_credentials() {
        let mut store = store();
        assert!(store.login("user@example.com", "hunter2").await);
        assert!(store.is_authenticated());
        assert!(store.user().is_some());
        assert_eq!(store.companies().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn login_activates_default_company() {
        let mut store = store();
        store.login("user@example.com", "hunter2").await;
        let active = store.active_company().unwrap();
        assert!(active.is_default);
        assert_eq!(active.name, "Acme Inc.");
    }

    #[tokio::test(start_paused = true)]
    async fn login_rejects_empty_credentials() {
        let mut store = store();
        assert!(!store.login("", "hunter2").await);
        assert!(!store.login("user@example.com", "").await);
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn login_is_single_flight() {
        let mut store = store();
        store.is_loading = true;
        assert!(!store.login("user@example.com", "hunter2").await);
        assert!(!store.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn logout_retains_companies_and_active_company() {
        let mut store = store();
        store.login("user@example.com", "hunter2").await;
        store.logout();
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
        assert_eq!(store.companies().len(), 3);
        assert!(store.active_company().is_some());
    }

    #[test]
    fn switch_company_ignores_unknown_id() {
        let mut store = store();
        store.add_company(CompanyDraft {
            name: "Acme".to_string(),
            ..CompanyDraft::default()
        });
        let active_before = store.active_company().unwrap().id.clone();
        store.switch_company("does-not-exist");
        assert_eq!(store.active_company().unwrap().id, active_before);
    }

    #[test]
    fn switch_company_activates_matching_company() {
        let mut store = store();
        store
            .add_company(CompanyDraft {
                name: "Acme".to_string(),
                ..CompanyDraft::default()
            })
            .add_company(CompanyDraft {
                name: "Globex".to_string(),
                ..CompanyDraft::default()
            });
        let second = store.companies()[1].id.clone();
        store.switch_company(&second);
        assert_eq!(store.active_company().unwrap().id, second);
    }

    #[test]
    fn add_company_on_empty_collection_becomes_active() {
        let mut store = store();
        store.add_company(CompanyDraft {
            name: "Acme".to_string(),
            ..CompanyDraft::default()
        });
        assert_eq!(store.active_company().unwrap().name, "Acme");
    }

    #[test]
    fn add_company_keeps_existing_active() {
        let mut store = store();
        store
            .add_company(CompanyDraft {
                name: "Acme".to_string(),
                ..CompanyDraft::default()
            })
            .add_company(CompanyDraft {
                name: "Globex".to_string(),
                ..CompanyDraft::default()
            });
        assert_eq!(store.active_company().unwrap().name, "Acme");
    }

    #[test]
    fn add_company_demotes_previous_default() {
        let mut store = store();
        store
            .add_company(CompanyDraft {
                name: "Acme".to_string(),
                is_default: true,
                ..CompanyDraft::default()
            })
            .add_company(CompanyDraft {
                name: "Globex".to_string(),
                is_default: true,
                ..CompanyDraft::default()
            });
        let defaults: Vec<&Company> = store
            .companies()
            .iter()
            .filter(|company| company.is_default)
            .collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].name, "Globex");
    }

    #[test]
    fn add_company_mints_unique_ids() {
        let mut store = store();
        for _ in 0..10 {
            store.add_company(CompanyDraft {
                name: "Acme".to_string(),
                ..CompanyDraft::default()
            });
        }
        let mut ids: Vec<String> = store
            .companies()
            .iter()
            .map(|company| company.id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn remove_company_reassigns_active_to_first_remaining() {
        let mut store = store();
        store
            .add_company(CompanyDraft {
                name: "Acme".to_string(),
                ..CompanyDraft::default()
            })
            .add_company(CompanyDraft {
                name: "Globex".to_string(),
                ..CompanyDraft::default()
            });
        let first = store.companies()[0].id.clone();
        store.remove_company(&first).unwrap();
        assert_eq!(store.active_company().unwrap().name, "Globex");
    }

    #[test]
    fn remove_company_keeps_active_when_other_removed() {
        let mut store = store();
        store
            .add_company(CompanyDraft {
                name: "Acme".to_string(),
                ..CompanyDraft::default()
            })
            .add_company(CompanyDraft {
                name: "Globex".to_string(),
                ..CompanyDraft::default()
            });
        let second = store.companies()[1].id.clone();
        store.remove_company(&second).unwrap();
        assert_eq!(store.active_company().unwrap().name, "Acme");
    }

    #[test]
    fn remove_company_refuses_last_company() {
        let mut store = store();
        store.add_company(CompanyDraft {
            name: "Acme".to_string(),
            ..CompanyDraft::default()
        });
        let id = store.companies()[0].id.clone();
        assert!(matches!(
            store.remove_company(&id),
            Err(AuthError::LastCompany)
        ));
        assert_eq!(store.companies().len(), 1);
    }

    #[test]
    fn remove_company_ignores_unknown_id() {
        let mut store = store();
        store.add_company(CompanyDraft {
            name: "Acme".to_string(),
            ..CompanyDraft::default()
        });
        assert!(store.remove_company("does-not-exist").is_ok());
        assert_eq!(store.companies().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn update_user_merges_fields() {
        let mut store = store();
        store.login("user@example.com", "hunter2").await;
        store.update_user(UserPatch {
            name: Some("Jane Doe".to_string()),
            ..UserPatch::default()
        });
        let user = store.user().unwrap();
        assert_eq!(user.name, "Jane Doe");
        assert_eq!(user.email, "user@example.com");
    }

    #[test]
    fn update_user_without_user_is_noop() {
        let mut store = store();
        store.update_user(UserPatch {
            name: Some("Jane Doe".to_string()),
            ..UserPatch::default()
        });
        assert!(store.user().is_none());
    }

    #[test]
    fn set_onboarding_complete() {
        let mut store = store();
        assert!(!store.has_completed_onboarding());
        store.set_onboarding_complete(true);
        assert!(store.has_completed_onboarding());
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_round_trips_through_storage() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let mut store = AuthStore::load(storage.clone());
            store.set_login_delay(Duration::from_millis(0));
            store.login("user@example.com", "hunter2").await;
            store.set_onboarding_complete(true);
            let second = store.companies()[1].id.clone();
            store.switch_company(&second);
        }

        let reloaded = AuthStore::load(storage);
        assert!(reloaded.is_authenticated());
        assert!(reloaded.has_completed_onboarding());
        assert_eq!(reloaded.companies().len(), 3);
        assert_eq!(reloaded.active_company().unwrap().id, "2");
        assert_eq!(reloaded.user().unwrap().email, "user@example.com");
    }

    #[test]
    fn load_tolerates_corrupt_snapshot() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(AUTH_NAMESPACE, b"not json").unwrap();
        let store = AuthStore::load(storage);
        assert!(store.companies().is_empty());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn change_callback_fires_on_mutation() {
        let counter = Arc::new(AtomicUsize::new(0));
        let observed = counter.clone();
        let mut store = store();
        store.set_change_callback(Box::new(move || {
            observed.fetch_add(1, Ordering::SeqCst);
        }));
        store.add_company(CompanyDraft {
            name: "Acme".to_string(),
            ..CompanyDraft::default()
        });
        store.set_onboarding_complete(true);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn active_company_requires_membership() {
        let company: Company = Faker.fake();
        let mut store = store();
        store.active_company_id = Some(company.id);
        assert!(store.active_company().is_none());
    }
}
