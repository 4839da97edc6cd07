//! Document filters scoping the integration to matching buffers.

use lsp_types::DocumentFilter;

/// Ordered set of document filters the client registers interest in.
///
/// The selector is fixed at construction time; the hosting editor and
/// the client library consult it to decide which open buffers activate
/// protocol features.
#[derive(Debug, Clone)]
pub struct DocumentSelector {
    filters: Vec<DocumentFilter>,
}

impl DocumentSelector {
    /// Builds a selector from an explicit filter list.
    #[must_use]
    pub fn new(filters: Vec<DocumentFilter>) -> Self {
        Self { filters }
    }

    /// Selector for Python buffers stored on the local filesystem.
    ///
    /// Remote and virtual schemes (`untitled`, remote filesystems) are
    /// deliberately not matched.
    #[must_use]
    pub fn python_files() -> Self {
        Self::new(vec![DocumentFilter {
            language: Some("python".to_string()),
            scheme: Some("file".to_string()),
            pattern: None,
        }])
    }

    /// The raw filter list, in registration order.
    #[must_use]
    pub fn filters(&self) -> &[DocumentFilter] {
        &self.filters
    }

    /// Whether a document with the given language identifier and
    /// storage scheme matches any filter entry.
    ///
    /// An entry with an absent language or scheme matches any value for
    /// that field, mirroring the protocol's filter semantics.
    #[must_use]
    pub fn matches(&self, language_id: &str, scheme: &str) -> bool {
        self.filters.iter().any(|filter| {
            filter
                .language
                .as_deref()
                .is_none_or(|language| language == language_id)
                && filter
                    .scheme
                    .as_deref()
                    .is_none_or(|entry| entry == scheme)
        })
    }
}
