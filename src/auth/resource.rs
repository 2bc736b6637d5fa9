use fake::Dummy;
use serde::{Deserialize, Serialize};

/// Defines user data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
}

/// Defines company data structure. Companies are the organizational scope
/// documents are filed under; `is_default` marks the one activated after a
/// fresh login.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub logo: Option<String>,
    pub industry: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

/// Company fields supplied at add time; the store mints the id.
///
#[derive(Clone, Debug, Default, Dummy, PartialEq, Eq)]
pub struct CompanyDraft {
    pub name: String,
    pub logo: Option<String>,
    pub industry: Option<String>,
    pub is_default: bool,
}

/// Partial user update. Unset fields are left untouched.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
}
