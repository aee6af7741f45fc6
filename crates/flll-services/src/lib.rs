//! Label file synchronization: format resolution, scaffolding and merging.
//! Exposes the stable entrypoints used by the CLI.

pub mod cache;
pub mod format;
pub mod fsio;
pub mod languages;
pub mod legacy;
pub mod paths;
pub mod reference;
pub mod report;
pub mod writer;
pub mod xliff;

pub use cache::DocumentCache;
pub use flll_core::{FlllError, FormatKind, LabelIdentifier, LanguageCode, Result};
pub use format::{
    format_for, resolve_format, LabelFormat, LanguageStatus, MergeOutcome, PendingWrite,
    ResolvedFile,
};
pub use languages::{language_keys, LanguageRegistry, StaticLanguages};
pub use paths::{ensure_extension, for_language, product_name};
pub use reference::{is_within_site, resolve_reference};
pub use writer::{EnsureOutcome, LabelWriter, Resolution, WriteOutcome};
