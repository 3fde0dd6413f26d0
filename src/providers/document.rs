use async_trait::async_trait;

use super::{DocumentReader, ProviderError, Upload};

/// Plain-text extraction from PDF documents, run on the blocking pool
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextReader;

#[async_trait]
impl DocumentReader for PdfTextReader {
    async fn extract_text(&self, document: Upload) -> Result<String, ProviderError> {
        let file_name = document.file_name;
        let bytes = document.bytes;

        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| ProviderError::Document(format!("extraction task failed: {}", e)))?
            .map_err(|e| ProviderError::Document(format!("{}: {}", file_name, e)))?;

        Ok(text.trim().to_string())
    }
}
