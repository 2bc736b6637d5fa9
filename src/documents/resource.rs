use fake::Dummy;
use serde::{Deserialize, Serialize};

/// Top-level business classification of a document.
///
#[derive(Clone, Copy, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MainCategory {
    Comptabilite,
    Juridique,
    Social,
}

/// Second-level classification. Valid members depend on the main category;
/// see [`MainCategory::sub_categories`].
///
#[derive(Clone, Copy, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubCategory {
    Achat,
    Ventes,
    Banque,
    Fiscal,
    Divers,
    Contrats,
    Statuts,
    Assemblees,
    Paie,
    Conges,
    Formation,
}

impl MainCategory {
    /// Sub-categories valid under this main category.
    ///
    pub fn sub_categories(&self) -> &'static [SubCategory] {
        match self {
            MainCategory::Comptabilite => &[
                SubCategory::Achat,
                SubCategory::Ventes,
                SubCategory::Banque,
                SubCategory::Fiscal,
                SubCategory::Divers,
            ],
            MainCategory::Juridique => &[
                SubCategory::Contrats,
                SubCategory::Statuts,
                SubCategory::Assemblees,
                SubCategory::Divers,
            ],
            MainCategory::Social => &[
                SubCategory::Paie,
                SubCategory::Conges,
                SubCategory::Formation,
                SubCategory::Divers,
            ],
        }
    }
}

impl SubCategory {
    /// Whether this sub-category is valid under the given main category.
    ///
    pub fn belongs_to(&self, main: MainCategory) -> bool {
        main.sub_categories().contains(self)
    }
}

/// Kind of the underlying scanned content.
///
#[derive(Clone, Copy, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Image,
    Xls,
    Doc,
    Other,
}

/// Sort key for the document list.
///
#[derive(Clone, Copy, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Date,
    Title,
    Amount,
}

/// Sort direction for the document list.
///
#[derive(Clone, Copy, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Defines document data structure: a scanned record filed under a company.
/// `image_uri` is an opaque reference to externally stored content; the core
/// never inspects it. Timestamps are milliseconds since the epoch.
///
#[derive(Clone, Debug, Dummy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    pub main_category: MainCategory,
    pub sub_category: Option<SubCategory>,
    pub file_type: FileType,
    pub image_uri: String,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    #[serde(default)]
    pub favorite: bool,
    // Reserved for the OCR pipeline; carried but unused by current logic.
    #[serde(default)]
    pub processed: bool,
    pub company_id: String,
}

/// Document fields supplied at add time. The store mints the id, stamps both
/// timestamps, and binds the company.
///
#[derive(Clone, Debug, Dummy, PartialEq)]
pub struct DocumentDraft {
    pub title: String,
    pub main_category: MainCategory,
    pub sub_category: Option<SubCategory>,
    pub file_type: FileType,
    pub image_uri: String,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub favorite: bool,
    pub processed: bool,
}

/// Partial document update. Outer `None` leaves a field untouched; for
/// optional fields the inner option distinguishes set from cleared.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub main_category: Option<MainCategory>,
    pub sub_category: Option<Option<SubCategory>>,
    pub file_type: Option<FileType>,
    pub image_uri: Option<String>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<Option<String>>,
    pub amount: Option<Option<f64>>,
    pub currency: Option<Option<String>>,
    pub favorite: Option<bool>,
    pub processed: Option<bool>,
}

/// View-state specification for the document list. Absent fields deactivate
/// their criterion; an empty tag list is inactive.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFilter {
    pub main_category: Option<MainCategory>,
    pub sub_category: Option<SubCategory>,
    pub file_type: Option<FileType>,
    pub search_query: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub favorite: Option<bool>,
    pub sort_by: Option<SortKey>,
    pub sort_order: Option<SortOrder>,
}

/// The initial view shows newest documents first.
///
impl Default for DocumentFilter {
    fn default() -> DocumentFilter {
        DocumentFilter {
            main_category: None,
            sub_category: None,
            file_type: None,
            search_query: None,
            tags: vec![],
            favorite: None,
            sort_by: Some(SortKey::Date),
            sort_order: Some(SortOrder::Desc),
        }
    }
}
