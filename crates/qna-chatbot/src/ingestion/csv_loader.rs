//! CSV knowledge base loader
//!
//! Every data row becomes one [`Document`] whose text lists each column as
//! `header: value`, one per line, in header order.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Document;

/// Load the knowledge base file at `path`
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let source = path.display().to_string();

    let data = std::fs::read(path).map_err(|e| Error::knowledge_base(&source, e.to_string()))?;
    let documents = parse_csv(&data, &source)?;

    tracing::info!("Loaded {} documents from {}", documents.len(), source);
    Ok(documents)
}

/// Parse CSV bytes into documents, tagging each with `source`
pub fn parse_csv(data: &[u8], source: &str) -> Result<Vec<Document>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| Error::knowledge_base(source, e.to_string()))?
        .clone();

    let mut documents = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|e| Error::knowledge_base(source, e.to_string()))?;

        let content = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| format!("{}: {}", header, value))
            .collect::<Vec<_>>()
            .join("\n");

        documents.push(Document::new(row, source, content));
    }

    Ok(documents)
}
