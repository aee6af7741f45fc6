use crate::Result;
use flll_core::{LanguageCode, DEFAULT_LANGUAGE};

/// Source of the configured language codes.
pub trait LanguageRegistry {
    /// Codes of the configured languages, not including `default`.
    fn language_codes(&self) -> Result<Vec<LanguageCode>>;
}

/// Fixed list of language codes, e.g. from configuration or CLI flags.
#[derive(Debug, Clone, Default)]
pub struct StaticLanguages {
    codes: Vec<LanguageCode>,
}

impl StaticLanguages {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }
}

impl LanguageRegistry for StaticLanguages {
    fn language_codes(&self) -> Result<Vec<LanguageCode>> {
        Ok(self.codes.clone())
    }
}

/// `default` followed by the registry's codes, without blanks or duplicates.
pub fn language_keys(registry: &dyn LanguageRegistry) -> Result<Vec<LanguageCode>> {
    let mut keys = vec![DEFAULT_LANGUAGE.to_string()];
    for code in registry.language_codes()? {
        let code = code.trim();
        if code.is_empty() || keys.iter().any(|k| k == code) {
            continue;
        }
        keys.push(code.to_string());
    }
    Ok(keys)
}
