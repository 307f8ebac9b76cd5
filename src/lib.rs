//! Maps stack frames of generated JavaScript back to the original sources.
//!
//! This crate is meant for script hosts that bundle code into resources and
//! only allow reading files through their own API. Source maps are loaded
//! through a [`ResourceLoader`] from the file next to the generated one
//! (`<file>.js.map`), parsed once and cached for further lookups.
//!
//! # Examples
//!
//! ```
//! use resource_sourcemaps::{InMemoryLoader, Options, SourceMapSupport};
//!
//! let map = r#"{"version":3,"sources":["../src/main.ts"],"names":[],"mappings":"AAAA;AACA"}"#;
//! let loader = InMemoryLoader::new("my-resource").with_file("dist/main.js.map", map);
//! let mut support = SourceMapSupport::new(loader, Options::default());
//!
//! let resolved = support.resolve("dist/main.js", 2, 5).unwrap();
//! assert_eq!(resolved.source, "src/main.ts");
//! assert_eq!((resolved.line, resolved.column), (2, 1));
//! ```

mod document;
mod frame;
mod loader;
mod lookup;
mod mappings;
mod options;
mod session;
mod support;

pub mod path;
pub mod vlq;

pub use document::{DocumentError, MappingDocument};
pub use frame::{CallSite, ErrorInfo, Frame};
pub use loader::{InMemoryLoader, ResourceLoader};
pub use lookup::find_closest_mapping;
pub use mappings::{parse_mappings, MappingsError, OriginalPosition, PositionMapping};
pub use options::Options;
pub use session::{is_active, FormatterSlot, Session, SessionError, StackFormatter, StackTraceHook};
pub use support::{ResolveError, ResolvedPosition, SourceMapSupport};
