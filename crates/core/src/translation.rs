//! Label translation.

use std::collections::HashMap;

pub trait Translator: Send + Sync {
    fn translate(&self, key: &str) -> String;
}

/// Key/value message catalog. Unknown keys translate to themselves.
#[derive(Debug, Clone, Default)]
pub struct CatalogTranslator {
    messages: HashMap<String, String>,
}

impl CatalogTranslator {
    pub fn new(messages: HashMap<String, String>) -> Self {
        Self { messages }
    }
}

impl Translator for CatalogTranslator {
    fn translate(&self, key: &str) -> String {
        self.messages
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
