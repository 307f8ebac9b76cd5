use serde::Deserialize;

/// An Error that can happen when reading a [`MappingDocument`].
#[derive(Debug, thiserror::Error)]
#[error("invalid source map document")]
pub struct DocumentError(#[from] serde_json::Error);

/// A (version 3) source map document as it is loaded from the resource bundle.
///
/// Only `sources` and `mappings` are used for position lookups, the remaining
/// fields are kept so that the document can be inspected by callers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingDocument {
    pub version: u32,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub names: Vec<String>,
    pub mappings: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub source_root: Option<String>,
    #[serde(default)]
    pub sources_content: Option<Vec<Option<String>>>,
}

impl MappingDocument {
    /// Parses a document from its JSON text.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Returns the source identifier at `index`, if it is in bounds.
    pub fn source(&self, index: i64) -> Option<&str> {
        let index = usize::try_from(index).ok()?;
        self.sources.get(index).map(String::as_str)
    }
}
