//! Pure filter/sort engine for the document list.
//!
//! The listing UI runs the company-scoped document set through this function
//! whenever the documents or the filter specification change. Criteria are
//! progressive narrowings (AND across criteria); the tag criterion matches on
//! any overlap (OR within). The function is side-effect free and idempotent.

use crate::documents::{Document, DocumentFilter, SortKey, SortOrder};
use std::cmp::Ordering;

/// Apply the given filter specification to the documents, returning the
/// ordered subset to display. Ties keep their incoming relative order in
/// both sort directions: descending negates the comparator, it does not
/// reverse the result list.
///
pub fn filter_documents(documents: &[Document], filter: &DocumentFilter) -> Vec<Document> {
    let mut filtered: Vec<Document> = documents
        .iter()
        .filter(|document| matches_filter(document, filter))
        .cloned()
        .collect();

    if let Some(sort_by) = filter.sort_by {
        filtered.sort_by(|a, b| {
            let comparison = match sort_by {
                SortKey::Date => a.updated_at.cmp(&b.updated_at),
                SortKey::Title => a.title.cmp(&b.title),
                SortKey::Amount => a
                    .amount
                    .unwrap_or(0.0)
                    .partial_cmp(&b.amount.unwrap_or(0.0))
                    .unwrap_or(Ordering::Equal),
            };
            match filter.sort_order {
                Some(SortOrder::Desc) => comparison.reverse(),
                _ => comparison,
            }
        });
    }

    filtered
}

fn matches_filter(document: &Document, filter: &DocumentFilter) -> bool {
    if let Some(main_category) = filter.main_category {
        if document.main_category != main_category {
            return false;
        }
    }

    if let Some(sub_category) = filter.sub_category {
        if document.sub_category != Some(sub_category) {
            return false;
        }
    }

    if let Some(file_type) = filter.file_type {
        if document.file_type != file_type {
            return false;
        }
    }

    if let Some(query) = &filter.search_query {
        if !query.is_empty() {
            let query = query.to_lowercase();
            let in_title = document.title.to_lowercase().contains(&query);
            let in_notes = document
                .notes
                .as_ref()
                .map(|notes| notes.to_lowercase().contains(&query))
                .unwrap_or(false);
            let in_tags = document
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&query));
            if !in_title && !in_notes && !in_tags {
                return false;
            }
        }
    }

    if !filter.tags.is_empty() && !filter.tags.iter().any(|tag| document.tags.contains(tag)) {
        return false;
    }

    if let Some(favorite) = filter.favorite {
        if document.favorite != favorite {
            return false;
        }
    }

    true
}
