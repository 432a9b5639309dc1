use serde_json::{Map, Value};

/// The Docker config file as an untyped JSON object. Unknown keys pass through untouched.
pub type Document = Map<String, Value>;

/// What the loader found at the config path.
#[derive(Debug)]
pub enum LoadOutcome {
    /// No file yet (first run).
    Missing,
    /// Zero bytes, only whitespace, or a bare `null`; treated like a missing file.
    Empty,
    Parsed(Document),
    /// Present but not a JSON object (bad syntax, truncated, or another JSON type).
    Malformed(serde_json::Error),
}

impl LoadOutcome {
    /// Collapse the benign outcomes into a fresh document.
    pub fn into_document(self) -> Result<Document, serde_json::Error> {
        match self {
            LoadOutcome::Missing | LoadOutcome::Empty => Ok(Document::new()),
            LoadOutcome::Parsed(doc) => Ok(doc),
            LoadOutcome::Malformed(e) => Err(e),
        }
    }
}
