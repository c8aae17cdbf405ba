//! Purpose: Define the catalog entity model shared by the client, pipeline, and views.
//! Exports: `Pokemon`, `Ability`, `StatValue`, `PokemonDetail`, `SpeciesRecord`, `FlavorEntry`.
//! Role: Stable data model; wire parsing stays in `api::remote`.
//! Invariants: `id` is 1-based, dense, and immutable once assigned.
//! Invariants: Enrichment fields only ever gain values; a full refetch rebuilds the collection.

use serde::Serialize;

/// The catalog is fixed to the first generation.
pub const COLLECTION_SIZE: u32 = 151;

const SPRITE_BASE: &str = "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    pub sprite: Option<String>,
    pub types: Vec<String>,
    pub height: Option<u32>,
    pub weight: Option<u32>,
    pub abilities: Vec<Ability>,
    pub stats: Vec<StatValue>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Ability {
    pub name: String,
    pub hidden: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct StatValue {
    pub name: String,
    pub base: u32,
}

/// One entity's detail record as returned by the per-identifier endpoint.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PokemonDetail {
    pub id: u32,
    pub name: String,
    pub height: u32,
    pub weight: u32,
    pub sprite: Option<String>,
    pub artwork: Option<String>,
    pub types: Vec<String>,
    pub abilities: Vec<Ability>,
    pub stats: Vec<StatValue>,
}

/// Extended descriptive record; entries arrive in many languages.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SpeciesRecord {
    pub flavor_texts: Vec<FlavorEntry>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FlavorEntry {
    pub text: String,
    pub language: String,
}

impl Pokemon {
    /// Skeletal form: identifier and name only, pending enrichment.
    pub fn skeletal(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            sprite: None,
            types: Vec::new(),
            height: None,
            weight: None,
            abilities: Vec::new(),
            stats: Vec::new(),
            description: None,
        }
    }

    pub fn is_skeletal(&self) -> bool {
        self.height.is_none() && self.types.is_empty()
    }

    /// Immutable merge: returns the entry with detail fields populated.
    /// Identifier and name are kept from the base entry.
    pub fn with_detail(mut self, detail: &PokemonDetail) -> Self {
        self.sprite = detail.sprite.clone();
        self.types = detail.types.clone();
        self.height = Some(detail.height);
        self.weight = Some(detail.weight);
        self.abilities = detail.abilities.clone();
        self.stats = detail.stats.clone();
        self
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }
}

impl SpeciesRecord {
    /// The one surfaced language. Upstream text carries form feeds and
    /// hard wraps; collapse all whitespace runs to single spaces.
    pub fn english_text(&self) -> Option<String> {
        self.flavor_texts
            .iter()
            .find(|entry| entry.language == "en")
            .map(|entry| collapse_whitespace(&entry.text))
    }
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Upstream names are lowercase; presentation capitalizes the first letter.
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Identifiers render zero-padded to three digits.
pub fn padded_id(id: u32) -> String {
    format!("{id:03}")
}

pub fn sprite_url(id: u32) -> String {
    format!("{SPRITE_BASE}/{id}.png")
}

pub fn shiny_url(id: u32) -> String {
    format!("{SPRITE_BASE}/shiny/{id}.png")
}

pub fn artwork_url(id: u32) -> String {
    format!("{SPRITE_BASE}/other/official-artwork/{id}.png")
}

/// Upstream height is in decimetres.
pub fn format_height(decimetres: u32) -> String {
    format!("{:.1} m", f64::from(decimetres) / 10.0)
}

/// Upstream weight is in hectograms.
pub fn format_weight(hectograms: u32) -> String {
    format!("{:.1} kg", f64::from(hectograms) / 10.0)
}

#[cfg(test)]
mod tests {
    use super::{
        Ability, FlavorEntry, Pokemon, PokemonDetail, SpeciesRecord, StatValue, display_name,
        format_height, format_weight, padded_id, sprite_url,
    };

    fn sample_detail() -> PokemonDetail {
        PokemonDetail {
            id: 4,
            name: "charmander".to_string(),
            height: 6,
            weight: 85,
            sprite: Some(sprite_url(4)),
            artwork: None,
            types: vec!["fire".to_string()],
            abilities: vec![Ability {
                name: "blaze".to_string(),
                hidden: false,
            }],
            stats: vec![StatValue {
                name: "speed".to_string(),
                base: 65,
            }],
        }
    }

    #[test]
    fn skeletal_form_has_only_id_and_name() {
        let entry = Pokemon::skeletal(4, "charmander");
        assert!(entry.is_skeletal());
        assert_eq!(entry.id, 4);
        assert_eq!(entry.name, "charmander");
        assert!(entry.sprite.is_none());
        assert!(entry.types.is_empty());
    }

    #[test]
    fn with_detail_populates_enrichment_and_keeps_identity() {
        let merged = Pokemon::skeletal(4, "charmander").with_detail(&sample_detail());
        assert!(!merged.is_skeletal());
        assert_eq!(merged.id, 4);
        assert_eq!(merged.name, "charmander");
        assert_eq!(merged.height, Some(6));
        assert_eq!(merged.types, vec!["fire".to_string()]);
        assert_eq!(merged.stats[0].base, 65);
    }

    #[test]
    fn english_text_collapses_form_feeds_and_wraps() {
        let species = SpeciesRecord {
            flavor_texts: vec![
                FlavorEntry {
                    text: "Ein seltsamer\nSamen.".to_string(),
                    language: "de".to_string(),
                },
                FlavorEntry {
                    text: "A strange seed was\x0cplanted on its\nback at birth.".to_string(),
                    language: "en".to_string(),
                },
            ],
        };
        assert_eq!(
            species.english_text().as_deref(),
            Some("A strange seed was planted on its back at birth.")
        );
    }

    #[test]
    fn english_text_absent_when_no_english_entry() {
        let species = SpeciesRecord {
            flavor_texts: vec![FlavorEntry {
                text: "..".to_string(),
                language: "ja".to_string(),
            }],
        };
        assert!(species.english_text().is_none());
    }

    #[test]
    fn display_helpers_format_like_the_catalog() {
        assert_eq!(display_name("bulbasaur"), "Bulbasaur");
        assert_eq!(display_name(""), "");
        assert_eq!(padded_id(7), "007");
        assert_eq!(padded_id(151), "151");
        assert_eq!(format_height(7), "0.7 m");
        assert_eq!(format_weight(69), "6.9 kg");
    }
}
