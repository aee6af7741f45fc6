//! Conversions from writer outcomes into the serializable reports of
//! `flll-domain`.

use crate::writer::{EnsureOutcome, Resolution, WriteOutcome};
use flll_core::FormatKind;
use flll_domain::{
    EnsureReport, LanguageFileStatus, LanguagePath, ResolveReport, WriteReport, SCHEMA_VERSION,
};
use std::path::Path;

fn display(path: &Path) -> String {
    path.display().to_string()
}

pub fn write_report(reference: &str, identifier: &str, outcome: &WriteOutcome) -> WriteReport {
    let (format, path) = match outcome.file() {
        Some(file) => (file.kind, Some(display(&file.path))),
        None => (FormatKind::Unknown, None),
    };
    WriteReport {
        schema_version: SCHEMA_VERSION,
        reference: reference.to_string(),
        identifier: identifier.to_string(),
        format: format.to_string(),
        path,
        status: outcome.status().to_string(),
        written: outcome.written().iter().map(|p| display(p)).collect(),
    }
}

pub fn ensure_report(reference: &str, outcome: &EnsureOutcome) -> EnsureReport {
    match outcome {
        EnsureOutcome::Unsupported { .. } => EnsureReport {
            schema_version: SCHEMA_VERSION,
            reference: reference.to_string(),
            format: FormatKind::Unknown.to_string(),
            path: None,
            files: Vec::new(),
        },
        EnsureOutcome::Ensured { file, files } => EnsureReport {
            schema_version: SCHEMA_VERSION,
            reference: reference.to_string(),
            format: file.kind.to_string(),
            path: Some(display(&file.path)),
            files: files
                .iter()
                .map(|s| LanguageFileStatus {
                    language: s.language.clone(),
                    path: display(&s.path),
                    ok: s.ok,
                })
                .collect(),
        },
    }
}

pub fn resolve_report(reference: &str, resolution: &Resolution) -> ResolveReport {
    ResolveReport {
        schema_version: SCHEMA_VERSION,
        reference: reference.to_string(),
        requested_path: display(&resolution.requested),
        format: resolution
            .file
            .as_ref()
            .map_or(FormatKind::Unknown, |f| f.kind)
            .to_string(),
        path: resolution.file.as_ref().map(|f| display(&f.path)),
        migrated: resolution.file.as_ref().is_some_and(|f| f.migrated),
        languages: resolution
            .languages
            .iter()
            .map(|(language, path)| LanguagePath {
                language: language.clone(),
                path: display(path),
            })
            .collect(),
    }
}
