//! Integration testing module
//!
//! End-to-end tests across the whole pipeline:
//! - Parsing complete documents from disk and from memory
//! - Documents with header, STYLE and REGION blocks
//! - Rolling auto-generated captions through deduplication
//! - Custom character reference tables

pub mod fixtures;
