//! Scrapers that recover structured records from loosely formatted documents.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Weekly digest index | [`weekly`] | Markdown → HTML → element walk | Year/month context from headings and paragraphs |
//!
//! A scraper exports a pure `parse_*` entry point that takes the downloaded
//! text; fetching lives in [`crate::fetch`] so parsing can be tested on fixtures.

pub mod weekly;
