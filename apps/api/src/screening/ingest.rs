//! Turns uploaded resume files into text for the extractor.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported resume format: {0}")]
    UnsupportedFormat(String),

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("file looks binary, not text")]
    NotText,

    #[error("file contains no text")]
    Empty,
}

/// Dispatches on the file extension: `.pdf` goes through PDF text extraction,
/// `.txt` / `.md` are decoded as UTF-8, replacing invalid sequences.
pub async fn load_bytes_to_text(bytes: Vec<u8>, filename: &str) -> Result<String, IngestError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let text = match extension.as_str() {
        "pdf" => {
            run_extraction(move || {
                pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
            })
            .await?
        }
        "txt" | "md" => {
            if bytes.contains(&0) {
                return Err(IngestError::NotText);
            }
            String::from_utf8_lossy(&bytes).into_owned()
        }
        other => {
            let shown = if other.is_empty() { filename } else { other };
            return Err(IngestError::UnsupportedFormat(shown.to_string()));
        }
    };

    if text.trim().is_empty() {
        return Err(IngestError::Empty);
    }
    Ok(text)
}

/// PDF parsing is CPU-bound and can panic on malformed files, so it runs on the
/// blocking pool and a panic comes back as `IngestError::Pdf`.
async fn run_extraction<F>(extract: F) -> Result<String, IngestError>
where
    F: FnOnce() -> Result<String, String> + Send + 'static,
{
    tokio::task::spawn_blocking(extract)
        .await
        .map_err(|e| IngestError::Pdf(format!("extraction aborted: {e}")))?
        .map_err(IngestError::Pdf)
}
