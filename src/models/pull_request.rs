use crate::parser::{Document, DocumentError};
use serde::{Deserialize, Serialize};

/// Pull-request metadata as fetched from the hosting platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestData {
    pub title: String,
    /// Raw markdown description; GitHub sends `null` for an empty one
    pub body: Option<String>,
    pub author: String,
    /// Changed file paths, in the order the platform lists them
    pub files: Vec<String>,
}

/// Read model handed to the rules for one validation run
#[derive(Debug, Clone)]
pub struct PullRequestView {
    pub title: String,
    pub author: String,
    pub document: Document,
    pub files: Vec<String>,
}

impl PullRequestView {
    /// Section the body and build the view.
    ///
    /// Fails when the body repeats a heading title.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        body: Option<&str>,
        files: Vec<String>,
    ) -> Result<Self, DocumentError> {
        let document = Document::parse(body.unwrap_or_default())?;
        Ok(Self {
            title: title.into(),
            author: author.into(),
            document,
            files,
        })
    }
}

impl TryFrom<PullRequestData> for PullRequestView {
    type Error = DocumentError;

    fn try_from(data: PullRequestData) -> Result<Self, Self::Error> {
        Self::new(data.title, data.author, data.body.as_deref(), data.files)
    }
}
