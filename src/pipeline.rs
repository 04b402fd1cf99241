use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use tracing::{error, info, warn};

use crate::catalog::write_catalog;
use crate::model::{Catalog, CatalogMetadata};
use crate::source::{CardSource, RawCard};

#[derive(Debug, PartialEq, Eq)]
pub enum Generation {
    Written {
        path: PathBuf,
        sets: usize,
        cards: usize,
    },
    /// Nothing was fetched; no file was written.
    Empty,
}

/// Normalize `raw` into a catalog using the source's set list and field map.
pub fn assemble<S: CardSource>(source: &S, raw: &[RawCard]) -> Catalog {
    let sets = source.sets(raw);
    let cards = source.field_map().normalize_all(raw, &sets);
    let metadata = source.stamps_metadata().then(|| CatalogMetadata {
        generated_at: Utc::now(),
        total_cards: cards.len(),
        source: source.label().to_string(),
    });
    Catalog {
        metadata,
        sets,
        cards,
    }
}

/// Fetch, normalize and write one catalog.
///
/// A fetch error is logged and treated like an empty result. Empty results
/// abort without touching `output` unless the source allows empty catalogs.
pub async fn generate<S: CardSource>(source: &mut S, output: &Path) -> Result<Generation> {
    info!("Building catalog from {} source", source.label());

    let raw = match source.fetch_cards().await {
        Ok(raw) => raw,
        Err(e) => {
            error!("Fetching cards from {} source failed: {:#}", source.label(), e);
            Vec::new()
        }
    };

    if raw.is_empty() && !source.allows_empty() {
        warn!("No cards obtained; not writing {:?}", output);
        return Ok(Generation::Empty);
    }

    let catalog = assemble(source, &raw);
    write_catalog(output, &catalog)?;

    Ok(Generation::Written {
        path: output.to_path_buf(),
        sets: catalog.sets.len(),
        cards: catalog.cards.len(),
    })
}
