//! # Code Extractor Crate
//!
//! Drives one conversion per source file: loads the front-end parse tree
//! from a [`SourceProvider`], converts it with its own
//! [`Converter`](code_model::Converter) and optionally caches the result as
//! JSON. Files are processed in parallel; the produced trees share nothing.
//!
//! ## Architecture
//!
//! ```text
//! paths → Extractor (rayon) → per path:
//!     JsonCache hit? → Ast
//!     SourceProvider::load → RawNode → Converter → Ast → JsonCache::write
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use code_extractor::{Extractor, ExtractorConfig, InMemorySources};
//! use code_model::RawNode;
//!
//! let mut sources = InMemorySources::default();
//! sources.insert("main.c", RawNode::unit("unit", vec![
//!     RawNode::unit("return", RawNode::tokens("return 0 ;")),
//! ]));
//!
//! let extractor = Extractor::new(sources, ExtractorConfig::default()).unwrap();
//! let extraction = extractor.extract("main.c").unwrap();
//! assert_eq!(extraction.ast.len(), 3);
//! assert!(!extraction.from_cache);
//! ```

pub mod cache;
pub mod error;
pub mod extractor;
pub mod settings;
pub mod source;

// Re-exports for convenience
pub use cache::JsonCache;
pub use error::{ExtractionError, SourceError};
pub use extractor::{Extraction, Extractor};
pub use settings::ExtractorConfig;
pub use source::{InMemorySources, JsonFileSources, SourceProvider};
