use serde_json::Value;

use crate::model::{CardType, NormalizedCard, Set};
use crate::source::RawCard;

/// Single-letter color codes used by the sample list.
const COLOR_CODES: &[(&str, &str)] = &[
    ("r", "Red"),
    ("b", "Blue"),
    ("g", "Green"),
    ("p", "Purple"),
    ("y", "Yellow"),
    ("k", "Black"),
];

const DELIMITER: char = ',';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    AsIs,
    Upper,
}

#[derive(Debug)]
pub struct TextRule {
    pub paths: &'static [&'static str],
    pub default: &'static str,
    pub case: Case,
}

#[derive(Debug)]
pub enum ListRule {
    /// One delimited string, optionally run through the color-code lookup.
    Delimited {
        paths: &'static [&'static str],
        default: &'static str,
        colors: bool,
    },
    /// Already a sequence at the source.
    Sequence { paths: &'static [&'static str] },
}

#[derive(Debug)]
pub enum NumberRule {
    /// Coerce anything numeric-looking, zero otherwise.
    Coerce { paths: &'static [&'static str] },
    /// Keep the source's optional number; no coercion.
    Native { paths: &'static [&'static str] },
}

#[derive(Debug)]
pub struct TypeRule {
    pub paths: &'static [&'static str],
}

/// Declarative mapping from one source's raw shape to [`NormalizedCard`].
/// One field per output column.
#[derive(Debug)]
pub struct FieldMap {
    pub id: TextRule,
    pub name: TextRule,
    pub card_type: TypeRule,
    pub color: ListRule,
    pub cost: NumberRule,
    pub power: NumberRule,
    pub counter: NumberRule,
    pub attribute: ListRule,
    pub effect: TextRule,
    pub rarity: TextRule,
    pub card_number: TextRule,
    pub image: TextRule,
    pub set_code: &'static [&'static str],
}

const fn text(paths: &'static [&'static str], default: &'static str) -> TextRule {
    TextRule {
        paths,
        default,
        case: Case::AsIs,
    }
}

const fn upper(paths: &'static [&'static str], default: &'static str) -> TextRule {
    TextRule {
        paths,
        default,
        case: Case::Upper,
    }
}

pub const SAMPLE_FIELDS: FieldMap = FieldMap {
    id: text(&["id"], ""),
    name: text(&["name"], "Unknown"),
    card_type: TypeRule { paths: &["type"] },
    color: ListRule::Delimited {
        paths: &["color"],
        default: "r",
        colors: true,
    },
    cost: NumberRule::Coerce { paths: &["cost"] },
    power: NumberRule::Coerce { paths: &["power"] },
    counter: NumberRule::Coerce { paths: &["counter"] },
    attribute: ListRule::Delimited {
        paths: &["attribute"],
        default: "",
        colors: false,
    },
    effect: text(&["effect"], ""),
    rarity: upper(&["rarity"], "C"),
    card_number: text(&["number"], ""),
    image: text(&["image_url"], ""),
    set_code: &["set"],
};

pub const REMOTE_FIELDS: FieldMap = FieldMap {
    id: text(&["id", "code"], ""),
    name: text(&["name"], "Unknown"),
    card_type: TypeRule {
        paths: &["type", "category"],
    },
    color: ListRule::Sequence {
        paths: &["color", "colors"],
    },
    cost: NumberRule::Native { paths: &["cost"] },
    power: NumberRule::Native { paths: &["power"] },
    counter: NumberRule::Native { paths: &["counter"] },
    attribute: ListRule::Sequence {
        paths: &["attribute", "attributes", "family"],
    },
    effect: text(&["effect", "ability", "text"], ""),
    rarity: upper(&["rarity"], ""),
    card_number: text(&["number", "card_number"], ""),
    image: text(
        &["image", "image_url", "images.large", "images.small"],
        "",
    ),
    set_code: &["set.code", "set.id"],
};

impl FieldMap {
    /// Map one raw card. Never fails: malformed fields fall back to defaults.
    pub fn normalize(&self, raw: &RawCard, set: Option<&Set>) -> NormalizedCard {
        NormalizedCard {
            id: self.id.apply(raw),
            name: self.name.apply(raw),
            card_type: self.card_type.apply(raw),
            color: self.color.apply(raw),
            cost: self.cost.apply(raw),
            power: self.power.apply(raw),
            counter: self.counter.apply(raw),
            attribute: self.attribute.apply(raw),
            effect: self.effect.apply(raw),
            rarity: self.rarity.apply(raw),
            set_name: set.map(|s| s.name.clone()).unwrap_or_default(),
            set_code: set.map(|s| s.code.clone()).unwrap_or_default(),
            card_number: self.card_number.apply(raw),
            image: self.image.apply(raw),
        }
    }

    pub fn set_code_of(&self, raw: &RawCard) -> Option<String> {
        raw.text_at(self.set_code).filter(|c| !c.is_empty())
    }

    /// Normalize against `sets`, resolving each card's parent by code.
    pub fn normalize_all(&self, raw: &[RawCard], sets: &[Set]) -> Vec<NormalizedCard> {
        raw.iter()
            .map(|card| {
                let set = self
                    .set_code_of(card)
                    .and_then(|code| sets.iter().find(|s| s.code == code));
                self.normalize(card, set)
            })
            .collect()
    }
}

impl TextRule {
    fn apply(&self, raw: &RawCard) -> String {
        let value = raw
            .text_at(self.paths)
            .unwrap_or_else(|| self.default.to_string());
        match self.case {
            Case::AsIs => value,
            Case::Upper => value.to_uppercase(),
        }
    }
}

impl TypeRule {
    fn apply(&self, raw: &RawCard) -> CardType {
        raw.text_at(self.paths)
            .map(|label| CardType::from_label(&label))
            .unwrap_or_default()
    }
}

impl ListRule {
    fn apply(&self, raw: &RawCard) -> Vec<String> {
        match self {
            ListRule::Delimited {
                paths,
                default,
                colors,
            } => {
                let fragments = match raw.first_of(paths) {
                    Some(Value::String(s)) => split_delimited(s),
                    Some(Value::Array(items)) => items
                        .iter()
                        .filter_map(Value::as_str)
                        .flat_map(split_delimited)
                        .collect(),
                    _ => split_delimited(default),
                };
                if *colors {
                    fragments.iter().map(|f| color_name(f)).collect()
                } else {
                    fragments
                }
            }
            ListRule::Sequence { paths } => match raw.first_of(paths) {
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
                Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
                _ => Vec::new(),
            },
        }
    }
}

impl NumberRule {
    fn apply(&self, raw: &RawCard) -> Option<u32> {
        match self {
            NumberRule::Coerce { paths } => Some(raw.first_of(paths).map(coerce).unwrap_or(0)),
            NumberRule::Native { paths } => raw.first_of(paths).and_then(native),
        }
    }
}

fn split_delimited(s: &str) -> Vec<String> {
    s.split(DELIMITER)
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

/// Color-code lookup, else first letter upper and the rest lower.
pub fn color_name(fragment: &str) -> String {
    let lower = fragment.to_lowercase();
    if let Some((_, name)) = COLOR_CODES.iter().find(|(code, _)| *code == lower) {
        return name.to_string();
    }
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn clamp(n: u64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn coerce(value: &Value) -> u32 {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                clamp(u)
            } else if let Some(f) = n.as_f64().filter(|f| f.is_finite() && *f >= 0.0) {
                clamp(f.trunc() as u64)
            } else {
                0
            }
        }
        Value::String(s) => s.trim().parse::<u64>().map(clamp).unwrap_or(0),
        _ => 0,
    }
}

fn native(value: &Value) -> Option<u32> {
    let Value::Number(n) = value else {
        return None;
    };
    if let Some(u) = n.as_u64() {
        return Some(clamp(u));
    }
    n.as_f64()
        .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
        .map(|f| clamp(f as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawCard {
        RawCard::new(value)
    }

    #[test]
    fn sample_defaults_for_empty_card() {
        let card = SAMPLE_FIELDS.normalize(&raw(json!({})), None);
        assert_eq!(card.id, "");
        assert_eq!(card.name, "Unknown");
        assert_eq!(card.card_type, CardType::Character);
        assert_eq!(card.color, vec!["Red"]);
        assert_eq!(card.cost, Some(0));
        assert_eq!(card.power, Some(0));
        assert_eq!(card.counter, Some(0));
        assert!(card.attribute.is_empty());
        assert_eq!(card.effect, "");
        assert_eq!(card.rarity, "C");
        assert_eq!(card.set_name, "");
        assert_eq!(card.set_code, "");
        assert_eq!(card.card_number, "");
        assert_eq!(card.image, "");
    }

    #[test]
    fn remote_defaults_for_empty_card() {
        let card = REMOTE_FIELDS.normalize(&raw(json!({})), None);
        assert_eq!(card.id, "");
        assert_eq!(card.name, "Unknown");
        assert_eq!(card.card_type, CardType::Character);
        assert!(card.color.is_empty());
        assert_eq!(card.cost, None);
        assert_eq!(card.power, None);
        assert_eq!(card.counter, None);
        assert!(card.attribute.is_empty());
        assert_eq!(card.effect, "");
        assert_eq!(card.rarity, "");
        assert_eq!(card.card_number, "");
        assert_eq!(card.image, "");
    }

    #[test]
    fn sample_color_codes() {
        let card = SAMPLE_FIELDS.normalize(&raw(json!({ "color": "r,b" })), None);
        assert_eq!(card.color, vec!["Red", "Blue"]);

        let card = SAMPLE_FIELDS.normalize(&raw(json!({ "color": "g, PURPLE,k" })), None);
        assert_eq!(card.color, vec!["Green", "Purple", "Black"]);
    }

    #[test]
    fn unknown_color_is_capitalized() {
        assert_eq!(color_name("orange"), "Orange");
        assert_eq!(color_name("Y"), "Yellow");
        assert_eq!(color_name("éclair"), "Éclair");
        assert_eq!(color_name(""), "");
    }

    #[test]
    fn sample_attribute_split() {
        let card = SAMPLE_FIELDS.normalize(
            &raw(json!({ "attribute": "Straw Hat Crew,Supernovas" })),
            None,
        );
        assert_eq!(card.attribute, vec!["Straw Hat Crew", "Supernovas"]);

        let card = SAMPLE_FIELDS.normalize(&raw(json!({ "attribute": "" })), None);
        assert!(card.attribute.is_empty());
    }

    #[test]
    fn sample_numbers_coerce() {
        let card = SAMPLE_FIELDS.normalize(
            &raw(json!({ "cost": "7", "power": 5000.9, "counter": -1000 })),
            None,
        );
        assert_eq!(card.cost, Some(7));
        assert_eq!(card.power, Some(5000));
        assert_eq!(card.counter, Some(0));

        let card = SAMPLE_FIELDS.normalize(&raw(json!({ "cost": "x", "power": [1] })), None);
        assert_eq!(card.cost, Some(0));
        assert_eq!(card.power, Some(0));
    }

    #[test]
    fn remote_numbers_stay_native() {
        let card = REMOTE_FIELDS.normalize(
            &raw(json!({ "cost": 4, "power": null, "counter": "1000" })),
            None,
        );
        assert_eq!(card.cost, Some(4));
        assert_eq!(card.power, None);
        assert_eq!(card.counter, None);
    }

    #[test]
    fn remote_sequences_pass_through() {
        let card = REMOTE_FIELDS.normalize(
            &raw(json!({
                "color": ["Red", "Green"],
                "attribute": ["Strike", 3, "Slash"],
            })),
            None,
        );
        assert_eq!(card.color, vec!["Red", "Green"]);
        assert_eq!(card.attribute, vec!["Strike", "Slash"]);

        let card = REMOTE_FIELDS.normalize(&raw(json!({ "color": "Blue" })), None);
        assert_eq!(card.color, vec!["Blue"]);
    }

    #[test]
    fn remote_fallback_paths() {
        let card = REMOTE_FIELDS.normalize(
            &raw(json!({
                "code": "OP02-013",
                "category": "LEADER",
                "ability": "[Rush]",
                "rarity": "sr",
                "images": { "small": "s.png", "large": "l.png" },
            })),
            None,
        );
        assert_eq!(card.id, "OP02-013");
        assert_eq!(card.card_type, CardType::Leader);
        assert_eq!(card.effect, "[Rush]");
        assert_eq!(card.rarity, "SR");
        assert_eq!(card.image, "l.png");
    }

    #[test]
    fn cards_resolve_their_set() {
        let sets = vec![Set::new("OP01", "Romance Dawn"), Set::new("OP02", "Paramount War")];
        let cards = vec![
            raw(json!({ "id": "OP02-001", "set": "OP02" })),
            raw(json!({ "id": "XX-1", "set": "ZZ99" })),
        ];
        let out = SAMPLE_FIELDS.normalize_all(&cards, &sets);
        assert_eq!(out[0].set_code, "OP02");
        assert_eq!(out[0].set_name, "Paramount War");
        assert_eq!(out[1].set_code, "");
        assert_eq!(out[1].set_name, "");
    }

    #[test]
    fn non_ascii_text_untouched() {
        let card = SAMPLE_FIELDS.normalize(
            &raw(json!({ "name": "モンキー・D・ルフィ", "rarity": "sec" })),
            None,
        );
        assert_eq!(card.name, "モンキー・D・ルフィ");
        assert_eq!(card.rarity, "SEC");
    }
}
