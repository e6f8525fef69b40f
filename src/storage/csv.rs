//! CSV collaborators for article lists and comment output
//!
//! The link collector writes its result set in one shot; the comment
//! collector appends batches per article, writing the header only when the
//! file is created, so an interrupted run can be resumed against the same
//! output file.

use std::fs::OpenOptions;
use std::path::Path;

use crate::models::{ArticleCandidate, CommentRecord};
use crate::utils::error::CrawlerError;

/// Read article addresses from a CSV with a `url` or `link` column.
///
/// Empty cells are skipped.
pub fn read_article_links(path: &Path) -> Result<Vec<String>, CrawlerError> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    let idx = headers
        .iter()
        .position(|h| h == "url" || h == "link")
        .ok_or(CrawlerError::MissingUrlColumn)?;

    let mut links = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(value) = record.get(idx) {
            if !value.is_empty() {
                links.push(value.to_string());
            }
        }
    }

    Ok(links)
}

/// Write the collected article candidates, replacing any existing file
pub fn write_candidates(path: &Path, rows: &[ArticleCandidate]) -> Result<(), CrawlerError> {
    let mut writer = csv::WriterBuilder::new().from_path(path)?;

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Append a batch of comment records, writing the header only when the file
/// does not exist yet
pub fn append_comments(path: &Path, rows: &[CommentRecord]) -> Result<(), CrawlerError> {
    let write_header = !path.exists();

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(write_header)
        .from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
