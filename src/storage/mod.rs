//! Input/output collaborators for the crawler
//!
//! The crawler core treats persistence as an external concern: a row set is
//! read in, a row set is written out. CSV is the only format here.

pub mod csv;

pub use self::csv::{append_comments, read_article_links, write_candidates};
