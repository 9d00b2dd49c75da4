//! Google Docs API: fetch one document and flatten it to plain text.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Google Docs API returned {status} for document '{doc_id}': {body}")]
    Status {
        doc_id: String,
        status: u16,
        body: String,
    },

    #[error("request to Google Docs API failed: {0}")]
    Transport(String),

    #[error("could not decode Google Docs response: {0}")]
    Decode(String),
}

// --- Response model (only what flattening needs) ---

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Option<Body>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

/// One top-level block. Only paragraphs contribute text; tables, section
/// breaks and tables of contents are skipped when deserializing.
#[derive(Debug, Default, Deserialize)]
pub struct StructuralElement {
    #[serde(default)]
    pub paragraph: Option<Paragraph>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default)]
    pub elements: Vec<ParagraphElement>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphElement {
    #[serde(default)]
    pub text_run: Option<TextRun>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    #[serde(default)]
    pub content: Option<String>,
}

/// Concatenate every paragraph text run in document order.
///
/// Non-paragraph blocks are skipped entirely; whitespace is left exactly as
/// the API returned it.
pub fn flatten_text(doc: &Document) -> String {
    let Some(body) = &doc.body else {
        return String::new();
    };
    body.content
        .iter()
        .filter_map(|element| element.paragraph.as_ref())
        .flat_map(|paragraph| paragraph.elements.iter())
        .filter_map(|pe| pe.text_run.as_ref()?.content.as_deref())
        .collect()
}

/// Minimal blocking client for `documents.get`.
pub struct DocsClient {
    base_url: String,
}

impl DocsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn document_url(&self, doc_id: &str) -> String {
        format!("{}/v1/documents/{}", self.base_url, urlencoding::encode(doc_id))
    }

    /// GET the full document resource.
    pub fn get_document(&self, doc_id: &str, access_token: &str) -> Result<Document, FetchError> {
        let url = self.document_url(doc_id);
        tracing::debug!("GET {}", url);

        let response = match ureq::get(&url)
            .set("Authorization", &format!("Bearer {}", access_token))
            .set("Accept", "application/json")
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                return Err(FetchError::Status {
                    doc_id: doc_id.to_string(),
                    status,
                    body: response.into_string().unwrap_or_default(),
                });
            }
            Err(e) => return Err(FetchError::Transport(e.to_string())),
        };

        let document: Document = response
            .into_json()
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        tracing::info!(
            "fetched '{}' ({} top-level elements)",
            document.title,
            document.body.as_ref().map_or(0, |b| b.content.len())
        );
        Ok(document)
    }

    /// Fetch and flatten in one step.
    pub fn fetch_text(&self, doc_id: &str, access_token: &str) -> Result<String, FetchError> {
        let document = self.get_document(doc_id, access_token)?;
        Ok(flatten_text(&document))
    }
}
