use anyhow::Result;
use serde_json::json;
use tracing::info;

use super::{CardSource, RawCard};
use crate::model::Set;
use crate::normalize::{FieldMap, SAMPLE_FIELDS};

/// Known sets, current as of OP08 / ST10.
pub fn builtin_sets() -> Vec<Set> {
    vec![
        Set::released("OP01", "Romance Dawn", "2022-07-08"),
        Set::released("OP02", "Paramount War", "2022-09-30"),
        Set::released("OP03", "Pillars of Strength", "2022-12-02"),
        Set::released("OP04", "Kingdoms of Intrigue", "2023-02-25"),
        Set::released("OP05", "Awakening of the New Era", "2023-05-27"),
        Set::released("OP06", "Wings of the Captain", "2023-09-22"),
        Set::released("OP07", "500 Years in the Future", "2024-02-24"),
        Set::released("OP08", "Two Legends", "2024-05-25"),
        Set::released("ST01", "Straw Hat Crew", "2022-07-08"),
        Set::released("ST02", "Worst Generation", "2022-07-08"),
        Set::released("ST03", "The Seven Warlords of the Sea", "2022-09-30"),
        Set::released("ST04", "Animal Kingdom Pirates", "2022-12-02"),
        Set::released("ST05", "One Piece Film Edition", "2022-11-04"),
        Set::released("ST06", "Navy", "2023-02-25"),
        Set::released("ST07", "Big Mom Pirates", "2023-05-27"),
        Set::released("ST08", "Monkey D. Luffy", "2023-07-28"),
        Set::released("ST09", "Yamato", "2023-09-22"),
        Set::released("ST10", "Uta", "2023-09-22"),
    ]
}

/// (id, name, type, color, cost, power, counter, attribute, effect, rarity)
type SampleRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    u32,
    u32,
    u32,
    &'static str,
    &'static str,
    &'static str,
);

const SAMPLE_ROWS: &[SampleRow] = &[
    // OP01 red
    ("OP01-001", "Monkey D. Luffy", "leader", "r", 0, 5000, 0, "Straw Hat Crew", "[DON!! x1] [When Attacking] Give up to 1 of your Leader or Character cards +1000 power during this battle.", "L"),
    ("OP01-002", "Roronoa Zoro", "character", "r", 3, 4000, 1000, "Straw Hat Crew,Supernovas", "[DON!! x1] [When Attacking] Give this Character +1000 power during this battle.", "SR"),
    ("OP01-003", "Nami", "character", "r", 1, 2000, 1000, "Straw Hat Crew", "[On Play] Look at 3 cards from the top of your deck; reveal up to 1 {Straw Hat Crew} type card and add it to your hand.", "R"),
    ("OP01-004", "Usopp", "character", "r", 2, 3000, 1000, "Straw Hat Crew", "[Blocker]", "UC"),
    ("OP01-005", "Sanji", "character", "r", 4, 5000, 0, "Straw Hat Crew", "[On Play] K.O. up to 1 of your opponent's Characters with 3000 power or less.", "SR"),
    ("OP01-006", "Tony Tony Chopper", "character", "r", 1, 1000, 2000, "Straw Hat Crew,Animal", "[Counter] Up to 1 of your Leader or Character cards gains +2000 power during this battle.", "C"),
    ("OP01-007", "Nico Robin", "character", "r", 3, 4000, 1000, "Straw Hat Crew", "[On Play] Draw 1 card if you have 3 or less cards in your hand.", "R"),
    ("OP01-008", "Franky", "character", "r", 3, 3000, 2000, "Straw Hat Crew", "[Blocker] [On Block] Give up to 1 of your Leader or Character cards +2000 power during this battle.", "UC"),
    ("OP01-009", "Brook", "character", "r", 2, 2000, 1000, "Straw Hat Crew", "[On Play] Draw 1 card and trash 1 card from your hand.", "C"),
    ("OP01-010", "Portgas D. Ace", "character", "r", 5, 6000, 0, "Whitebeard Pirates", "[DON!! x1] This Character gains +1000 power.", "SR"),
    ("OP01-011", "Shanks", "character", "r", 9, 10000, 0, "The Four Emperors,Red-Haired Pirates", "[On Play] K.O. up to 1 of your opponent's Characters with 8000 power or less.", "SEC"),
    ("OP01-012", "Gum-Gum Pistol", "event", "r", 1, 0, 0, "Straw Hat Crew", "[Main] K.O. up to 1 of your opponent's Characters with 3000 power or less.", "C"),
    ("OP01-013", "Thousand Sunny", "stage", "r", 1, 0, 0, "Straw Hat Crew", "[Activate: Main] You may rest this Stage: Draw 1 card and trash 1 card from your hand.", "R"),
    // OP01 blue
    ("OP01-014", "Trafalgar Law", "leader", "b", 0, 5000, 0, "Heart Pirates,Supernovas", "[DON!! x1] [When Attacking] Draw 1 card and trash 1 card from your hand.", "L"),
    ("OP01-015", "Bepo", "character", "b", 2, 3000, 1000, "Heart Pirates,Animal", "[On Play] Draw 1 card and trash 1 card from your hand.", "C"),
    ("OP01-016", "Boa Hancock", "character", "b", 4, 5000, 0, "The Seven Warlords of the Sea,Kuja Pirates", "[On Play] Return up to 1 Character with a cost of 3 or less to the owner's hand.", "SR"),
    ("OP01-017", "Donquixote Doflamingo", "character", "b", 5, 6000, 0, "The Seven Warlords of the Sea,Donquixote Pirates", "[On Play] Return up to 1 Character with a cost of 4 or less to the owner's hand.", "R"),
    ("OP01-018", "Crocodile", "character", "b", 7, 8000, 0, "The Seven Warlords of the Sea,Baroque Works", "[On Play] Return up to 1 Character with a cost of 5 or less to the owner's hand.", "R"),
    ("OP01-019", "Jinbe", "character", "b", 3, 4000, 1000, "Fish-Man,Straw Hat Crew", "[Blocker]", "UC"),
    ("OP01-020", "Dracule Mihawk", "character", "b", 9, 10000, 0, "The Seven Warlords of the Sea", "[On Play] Return all Characters with a cost of 7 or less to the owner's hand.", "SEC"),
    // OP02
    ("OP02-001", "Edward Newgate", "leader", "r", 0, 5000, 0, "The Four Emperors,Whitebeard Pirates", "[Activate: Main] [Once Per Turn] Give up to 1 of your {Whitebeard Pirates} type Characters +2000 power during this turn.", "L"),
    ("OP02-002", "Portgas D. Ace", "character", "r", 2, 3000, 1000, "Whitebeard Pirates", "[On Play] Look at 3 cards from the top of your deck and place them at the top or bottom of the deck in any order.", "SR"),
    ("OP02-003", "Marco", "character", "r", 4, 5000, 1000, "Whitebeard Pirates", "[On Play] Return up to 1 Character with a cost of 3 or less to the owner's hand.", "SR"),
    ("OP02-004", "Eustass Kid", "leader", "p", 0, 5000, 0, "Supernovas,Kid Pirates", "[Your Turn] Give all of your Characters +1000 power.", "L"),
    // OP03
    ("OP03-001", "Charlotte Katakuri", "leader", "p", 0, 5000, 0, "Big Mom Pirates", "[DON!! x1] [Opponent's Turn] All of your Characters gain +1000 power.", "L"),
    ("OP03-002", "Charlotte Linlin", "character", "p", 10, 12000, 0, "The Four Emperors,Big Mom Pirates", "[On Play] K.O. up to 1 of your opponent's Characters with a cost of 10 or less.", "SEC"),
    ("OP03-003", "Sanji", "character", "y", 5, 6000, 0, "Straw Hat Crew", "[On Play] Set up to 1 of your opponent's Characters with a cost of 5 or less as active.", "SR"),
];

/// Raw sample cards in the hand-curated shape: the set code is the id prefix
/// and `number` is the suffix.
pub fn builtin_cards() -> Vec<RawCard> {
    SAMPLE_ROWS
        .iter()
        .map(
            |&(id, name, kind, color, cost, power, counter, attribute, effect, rarity)| {
                let (set, number) = id.split_once('-').unwrap_or((id, ""));
                RawCard::new(json!({
                    "id": id,
                    "name": name,
                    "type": kind,
                    "color": color,
                    "cost": cost,
                    "power": power,
                    "counter": counter,
                    "attribute": attribute,
                    "effect": effect,
                    "rarity": rarity,
                    "number": number,
                    "set": set,
                }))
            },
        )
        .collect()
}

/// Hardcoded set list plus hand-curated cards. No I/O.
pub struct SampleSource {
    sets: Vec<Set>,
    cards: Vec<RawCard>,
}

impl SampleSource {
    pub fn new(sets: Vec<Set>, cards: Vec<RawCard>) -> Self {
        SampleSource { sets, cards }
    }

    pub fn builtin() -> Self {
        SampleSource::new(builtin_sets(), builtin_cards())
    }
}

impl CardSource for SampleSource {
    fn label(&self) -> &'static str {
        "sample"
    }

    fn field_map(&self) -> &'static FieldMap {
        &SAMPLE_FIELDS
    }

    async fn fetch_cards(&mut self) -> Result<Vec<RawCard>> {
        info!("Using {} sample cards", self.cards.len());
        Ok(self.cards.clone())
    }

    fn sets(&self, _cards: &[RawCard]) -> Vec<Set> {
        self.sets.clone()
    }

    fn allows_empty(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CardType;
    use std::collections::HashSet;

    #[test]
    fn builtin_set_codes_unique() {
        let sets = builtin_sets();
        assert_eq!(sets.len(), 18);
        let codes: HashSet<_> = sets.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes.len(), sets.len());
        assert!(sets.iter().all(|s| s.release_date.is_some()));
    }

    #[test]
    fn builtin_cards_reference_known_sets() {
        let codes: HashSet<_> = builtin_sets().into_iter().map(|s| s.code).collect();
        let cards = builtin_cards();
        assert_eq!(cards.len(), 27);
        for card in &cards {
            let code = SAMPLE_FIELDS.set_code_of(card).unwrap();
            assert!(codes.contains(&code), "unknown set {}", code);
        }
    }

    #[test]
    fn luffy_leader_normalizes() {
        let sets = builtin_sets();
        let cards = SAMPLE_FIELDS.normalize_all(&builtin_cards(), &sets);
        let luffy = &cards[0];
        assert_eq!(luffy.id, "OP01-001");
        assert_eq!(luffy.card_type, CardType::Leader);
        assert_eq!(luffy.color, vec!["Red"]);
        assert_eq!(luffy.power, Some(5000));
        assert_eq!(luffy.rarity, "L");
        assert_eq!(luffy.card_number, "001");
        assert_eq!(luffy.set_code, "OP01");
        assert_eq!(luffy.set_name, "Romance Dawn");

        let sanji = cards.last().unwrap();
        assert_eq!(sanji.color, vec!["Yellow"]);
        assert_eq!(sanji.set_name, "Pillars of Strength");
    }
}
