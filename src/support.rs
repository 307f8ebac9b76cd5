use indexmap::IndexMap;

use crate::document::{DocumentError, MappingDocument};
use crate::frame::{self, CallSite, ErrorInfo};
use crate::loader::ResourceLoader;
use crate::lookup::find_closest_mapping;
use crate::mappings::{parse_mappings, MappingsError, PositionMapping};
use crate::options::Options;
use crate::path::{normalize_source_path, resource_relative_path};

/// A generated position resolved to the original source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPosition {
    /// The cleaned up path of the original source.
    pub source: String,
    /// Line in the original source, 1-based.
    pub line: u32,
    /// Column in the original source, 1-based.
    pub column: u32,
}

/// An Error that can happen while resolving a generated position.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The loader has no source map for the generated file.
    #[error("source map `{path}` not found in resource `{resource}`")]
    NotFound { resource: String, path: String },
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Mappings(#[from] MappingsError),
}

/// Resolves positions in generated files using the source maps that ship
/// next to them in the resource bundle.
///
/// Loaded documents and their parsed mappings are cached per generated file
/// until [`clear_caches`](Self::clear_caches) is called.
pub struct SourceMapSupport<L> {
    loader: L,
    options: Options,
    documents: IndexMap<String, MappingDocument>,
    mappings: IndexMap<String, Vec<PositionMapping>>,
}

impl<L> SourceMapSupport<L> {
    pub fn new(loader: L, options: Options) -> Self {
        Self {
            loader,
            options,
            documents: IndexMap::new(),
            mappings: IndexMap::new(),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.options.debug = debug;
        if debug {
            tracing::debug!("debug mode enabled");
        }
    }

    /// The cached source map document of `generated_file`, if it was loaded already.
    pub fn cached_document(&self, generated_file: &str) -> Option<&MappingDocument> {
        self.documents.get(generated_file)
    }

    /// Drops all the cached documents and mappings.
    pub fn clear_caches(&mut self) {
        self.documents.clear();
        self.mappings.clear();

        if self.options.debug {
            tracing::debug!("cache cleared");
        }
    }
}

impl<L: ResourceLoader> SourceMapSupport<L> {
    /// Resolves the 1-based `line`/`column` in `generated_file` to its original position.
    ///
    /// Any failure to load or parse the source map is logged and results in `None`.
    pub fn resolve(
        &mut self,
        generated_file: &str,
        line: u32,
        column: u32,
    ) -> Option<ResolvedPosition> {
        match self.try_resolve(generated_file, line, column) {
            Ok(resolved) => resolved,
            Err(err @ ResolveError::NotFound { .. }) => {
                if self.options.debug {
                    tracing::warn!(generated_file, "{err}");
                }
                None
            }
            Err(err) => {
                tracing::debug!(
                    generated_file,
                    error = &err as &dyn std::error::Error,
                    "failed to load source map"
                );
                None
            }
        }
    }

    /// Like [`resolve`](Self::resolve), but reports why the source map could not be used.
    ///
    /// `Ok(None)` means the source map was loaded, but no original position
    /// corresponds to the queried position.
    pub fn try_resolve(
        &mut self,
        generated_file: &str,
        line: u32,
        column: u32,
    ) -> Result<Option<ResolvedPosition>, ResolveError> {
        if !self.mappings.contains_key(generated_file) {
            self.load(generated_file)?;
        }
        let Some(mappings) = self.mappings.get(generated_file) else {
            return Ok(None);
        };

        let Some(original) =
            find_closest_mapping(mappings, line, column).and_then(|m| m.original.as_ref())
        else {
            return Ok(None);
        };

        let source = normalize_source_path(
            generated_file,
            &original.source,
            &self.options.generated_extension,
            &self.options.original_extension,
        );

        Ok(Some(ResolvedPosition {
            source,
            line: original.line,
            column: original.column,
        }))
    }

    /// Loads and parses the source map of `generated_file` into the caches.
    ///
    /// Nothing is cached unless both steps succeed.
    fn load(&mut self, generated_file: &str) -> Result<(), ResolveError> {
        let map_file = format!("{generated_file}.map");
        let path = resource_relative_path(&map_file);
        let resource = self.loader.current_resource();

        if self.options.debug {
            tracing::debug!(%resource, "loading source map: {map_file} -> {path}");
        }

        let text = self
            .loader
            .load_text(&resource, &path)
            .ok_or_else(|| ResolveError::NotFound {
                resource: resource.clone(),
                path: path.clone(),
            })?;
        let document = MappingDocument::from_json(&text)?;
        let mappings = parse_mappings(&document)?;

        if self.options.debug {
            tracing::debug!(
                mappings = mappings.len(),
                "source map loaded successfully for {generated_file}"
            );
        }

        self.documents.insert(generated_file.to_owned(), document);
        self.mappings.insert(generated_file.to_owned(), mappings);
        Ok(())
    }

    /// Renders a single stack frame, mapped to its original position if possible.
    pub fn map_call_site(&mut self, site: &dyn CallSite) -> String {
        let (Some(file), Some(line)) = (
            frame::known_file(site),
            frame::known_position(site.line_number()),
        ) else {
            return frame::format_raw(site);
        };
        if !file.ends_with(self.options.generated_extension.as_str()) {
            return frame::format_raw(site);
        }

        match self.resolve(file, line, site.column_number().unwrap_or(0)) {
            Some(ResolvedPosition {
                source,
                line,
                column,
            }) => format!("{} ({source}:{line}:{column})", site.display_name()),
            None => frame::format_raw(site),
        }
    }

    /// Renders the full stack trace of `error`.
    pub fn format_stack_trace(&mut self, error: &ErrorInfo, sites: &[&dyn CallSite]) -> String {
        let frames: Vec<_> = sites.iter().map(|site| self.map_call_site(*site)).collect();
        frame::format_trace(error, frames)
    }
}
