use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::info;

use crate::model::Catalog;

/// Write `catalog` as pretty JSON. Goes through a temp file in the target
/// directory and is renamed into place, so readers never see a partial file.
pub fn write_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;

    let tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {:?}", dir))?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, catalog)?;
        writer.flush()?;
    }
    tmp.persist(path)
        .with_context(|| format!("Failed to write {:?}", path))?;

    info!(
        "Saved {:?} ({} sets, {} cards)",
        path,
        catalog.sets.len(),
        catalog.cards.len()
    );
    Ok(())
}

pub fn read_catalog(path: &Path) -> Result<Catalog> {
    let body = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&body).with_context(|| format!("{:?} is not a valid catalog", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CardType, CatalogMetadata, NormalizedCard, Set};
    use chrono::{TimeZone, Utc};

    fn catalog() -> Catalog {
        Catalog {
            metadata: Some(CatalogMetadata {
                generated_at: Utc.with_ymd_and_hms(2024, 5, 25, 12, 0, 0).unwrap(),
                total_cards: 1,
                source: "remote".to_string(),
            }),
            sets: vec![Set::released("OP08", "Two Legends", "2024-05-25")],
            cards: vec![NormalizedCard {
                id: "OP08-001".to_string(),
                name: "トニートニー・チョッパー".to_string(),
                card_type: CardType::Leader,
                color: vec!["Red".to_string(), "Green".to_string()],
                cost: None,
                power: Some(5000),
                counter: None,
                attribute: vec!["Strike".to_string()],
                effect: "[Activate: Main] Réveillez-vous".to_string(),
                rarity: "L".to_string(),
                set_name: "Two Legends".to_string(),
                set_code: "OP08".to_string(),
                card_number: "001".to_string(),
                image: String::new(),
            }],
        }
    }

    #[test]
    fn write_then_read_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/cards_database.json");
        let original = catalog();

        write_catalog(&path, &original).unwrap();
        assert_eq!(read_catalog(&path).unwrap(), original);
    }

    #[test]
    fn output_is_indented_and_keeps_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards_database.json");
        write_catalog(&path, &catalog()).unwrap();

        let body = fs::read_to_string(&path).unwrap();
        assert!(body.contains("トニートニー・チョッパー"));
        assert!(body.contains("Réveillez-vous"));
        assert!(!body.contains("\\u"));
        assert!(body.contains("\n  \"sets\": ["));
    }

    #[test]
    fn overwrite_replaces_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards_database.json");
        fs::write(&path, "x".repeat(100_000)).unwrap();

        let small = Catalog {
            metadata: None,
            sets: vec![],
            cards: vec![],
        };
        write_catalog(&path, &small).unwrap();
        assert_eq!(read_catalog(&path).unwrap(), small);
        // Only the catalog remains in the directory; no stray temp files.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
