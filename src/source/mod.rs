pub mod http;
pub mod remote;
pub mod sample;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::Set;
use crate::normalize::FieldMap;

/// Source-native card record, kept as untyped JSON until normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawCard(Value);

impl RawCard {
    pub fn new(value: Value) -> Self {
        RawCard(value)
    }

    /// Look up a dotted path (`set.code`). Missing keys, non-object parents
    /// and JSON nulls are all treated as absent.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.0;
        for key in path.split('.') {
            current = current.as_object()?.get(key)?;
        }
        if current.is_null() {
            None
        } else {
            Some(current)
        }
    }

    /// First present value among `paths`.
    pub fn first_of(&self, paths: &[&str]) -> Option<&Value> {
        paths.iter().find_map(|p| self.get(p))
    }

    pub fn text_at(&self, paths: &[&str]) -> Option<String> {
        match self.first_of(paths)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Where raw cards come from. Both implementations feed the same pipeline.
#[allow(async_fn_in_trait)]
pub trait CardSource {
    /// Short label recorded in catalog metadata and logs.
    fn label(&self) -> &'static str;

    /// Mapping table used to normalize this source's cards.
    fn field_map(&self) -> &'static FieldMap;

    async fn fetch_cards(&mut self) -> Result<Vec<RawCard>>;

    /// Authoritative set list for a catalog built from `cards`.
    fn sets(&self, cards: &[RawCard]) -> Vec<Set>;

    /// Whether a catalog with zero cards should still be written.
    fn allows_empty(&self) -> bool {
        false
    }

    fn stamps_metadata(&self) -> bool {
        false
    }
}
