use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A release batch of cards sharing a code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Set {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

impl Set {
    pub fn new(code: &str, name: &str) -> Self {
        Set {
            code: code.to_string(),
            name: name.to_string(),
            release_date: None,
        }
    }

    pub fn released(code: &str, name: &str, date: &str) -> Self {
        Set {
            release_date: Some(date.to_string()),
            ..Set::new(code, name)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CardType {
    Leader,
    #[default]
    Character,
    Event,
    Stage,
}

impl CardType {
    pub const ALL: [CardType; 4] = [
        CardType::Leader,
        CardType::Character,
        CardType::Event,
        CardType::Stage,
    ];

    /// Case-insensitive label lookup; anything unknown is a Character.
    pub fn from_label(label: &str) -> CardType {
        match label.trim().to_lowercase().as_str() {
            "leader" => CardType::Leader,
            "character" => CardType::Character,
            "event" => CardType::Event,
            "stage" => CardType::Stage,
            _ => CardType::Character,
        }
    }
}

/// Canonical card record written to the catalog. Every key is always present.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NormalizedCard {
    pub id: String,
    pub name: String,
    pub card_type: CardType,
    pub color: Vec<String>,
    pub cost: Option<u32>,
    pub power: Option<u32>,
    pub counter: Option<u32>,
    pub attribute: Vec<String>,
    pub effect: String,
    pub rarity: String,
    pub set_name: String,
    pub set_code: String,
    pub card_number: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogMetadata {
    pub generated_at: DateTime<Utc>,
    pub total_cards: usize,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CatalogMetadata>,
    pub sets: Vec<Set>,
    pub cards: Vec<NormalizedCard>,
}

impl Catalog {
    pub fn cards_in_set<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a NormalizedCard> {
        self.cards.iter().filter(move |c| c.set_code == code)
    }
}
