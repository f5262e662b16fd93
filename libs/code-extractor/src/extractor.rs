//! Per-file extraction, sequential or parallel.

use crate::cache::JsonCache;
use crate::error::ExtractionError;
use crate::settings::ExtractorConfig;
use crate::source::SourceProvider;
use code_model::{Ast, Converter, ConverterConfig, Diagnostic, RenderConfig};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, error, trace, warn};

/// Result of extracting one file.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub path: PathBuf,
    pub ast: Ast,
    /// Empty for trees served from the cache.
    pub diagnostics: Vec<Diagnostic>,
    pub from_cache: bool,
}

/// Converts source files, one fresh converter per file.
pub struct Extractor<P> {
    sources: P,
    converter_config: ConverterConfig,
    render_config: RenderConfig,
    cache: Option<JsonCache>,
    pool: Option<ThreadPool>,
}

impl<P: SourceProvider> Extractor<P> {
    /// Validates `config`, prepares the cache directory and the worker pool.
    pub fn new(sources: P, config: ExtractorConfig) -> Result<Self, ExtractionError> {
        let converter_config = config.converter_config();
        let render_config = config.render_config()?;
        let cache = match &config.cache_dir {
            Some(dir) => {
                let cache = JsonCache::new(dir);
                cache.prepare()?;
                Some(cache)
            }
            None => None,
        };
        let pool = match config.threads {
            Some(threads) => Some(ThreadPoolBuilder::new().num_threads(threads).build()?),
            None => None,
        };
        Ok(Self {
            sources,
            converter_config,
            render_config,
            cache,
            pool,
        })
    }

    /// Extracts one file, consulting the cache first.
    ///
    /// An unreadable cache entry is treated as a miss and overwritten.
    pub fn extract(&self, path: impl AsRef<Path>) -> Result<Extraction, ExtractionError> {
        let path = path.as_ref();
        if let Some(cache) = &self.cache {
            match cache.read(path) {
                Ok(Some(ast)) => {
                    debug!(path = %path.display(), "cache hit");
                    return Ok(Extraction {
                        path: path.to_path_buf(),
                        ast,
                        diagnostics: Vec::new(),
                        from_cache: true,
                    });
                }
                Ok(None) => {}
                Err(err) => warn!(path = %path.display(), %err, "discarding unreadable cache entry"),
            }
        }

        let raw = self.sources.load(path)?;
        let conversion = Converter::new(path, self.converter_config)
            .convert_file(&raw)
            .map_err(|source| {
                error!(path = %path.display(), %source, "conversion failed");
                ExtractionError::Conversion {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        debug!(
            path = %path.display(),
            nodes = conversion.ast.len(),
            diagnostics = conversion.diagnostics.len(),
            "converted"
        );
        if let Some(root) = conversion.ast.root() {
            trace!(
                path = %path.display(),
                "\n{}",
                conversion.ast.render_with(root, 0, self.render_config)
            );
        }

        if let Some(cache) = &self.cache {
            cache.write(path, &conversion.ast)?;
        }
        Ok(Extraction {
            path: path.to_path_buf(),
            ast: conversion.ast,
            diagnostics: conversion.diagnostics,
            from_cache: false,
        })
    }

    /// Extracts all `paths` in parallel. Results keep the input order; a
    /// failing file does not affect the others.
    pub fn extract_all<Q>(&self, paths: &[Q]) -> Vec<Result<Extraction, ExtractionError>>
    where
        Q: AsRef<Path> + Sync,
    {
        let run = || paths.par_iter().map(|path| self.extract(path)).collect::<Vec<_>>();
        let results = match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        };
        let failed = results.iter().filter(|result| result.is_err()).count();
        debug!(files = paths.len(), failed, "extraction finished");
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemorySources;
    use code_model::RawNode;

    fn sources() -> InMemorySources {
        let mut sources = InMemorySources::default();
        sources.insert(
            "ok.c",
            RawNode::unit("unit", vec![RawNode::unit("return", RawNode::tokens("return ;"))]),
        );
        sources.insert("bad.c", RawNode::unit("return", RawNode::tokens("return ;")));
        sources
    }

    #[test]
    fn test_missing_source_is_a_source_error() {
        let extractor = Extractor::new(sources(), ExtractorConfig::default()).unwrap();
        assert!(matches!(extractor.extract("nope.c"), Err(ExtractionError::Source(_))));
    }

    #[test]
    fn test_conversion_failure_names_the_file() {
        let extractor = Extractor::new(sources(), ExtractorConfig::default()).unwrap();
        match extractor.extract("bad.c") {
            Err(ExtractionError::Conversion { path, .. }) => assert_eq!(path, PathBuf::from("bad.c")),
            other => panic!("expected conversion error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ExtractorConfig {
            condition_display_limit: 0,
            ..ExtractorConfig::default()
        };
        assert!(matches!(Extractor::new(sources(), config), Err(ExtractionError::Config(_))));
    }
}
