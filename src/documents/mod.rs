//! Document records, filtering, and the document store.
//!
//! This module owns everything document-shaped, including:
//! - Entity definitions (`Document`, categories, file types) and their
//!   draft/patch forms
//! - The `DocumentFilter` view-state specification
//! - The pure filter/sort engine
//! - The `DocumentStore` with add/update/delete/favorite operations

mod filter;
mod resource;
mod store;

pub use filter::filter_documents;
pub use resource::{
    Document, DocumentDraft, DocumentFilter, DocumentPatch, FileType, MainCategory, SortKey,
    SortOrder, SubCategory,
};
pub use store::DocumentStore;
