use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BaseStats {
    #[serde(rename = "HP")]
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalizedName {
    #[serde(default)]
    pub english: String,
    #[serde(default)]
    pub french: String,
    #[serde(default)]
    pub japanese: String,
    #[serde(default)]
    pub chinese: String,
}

impl LocalizedName {
    /// French first, the catalogue's display language.
    pub fn display(&self) -> &str {
        if !self.french.trim().is_empty() {
            &self.french
        } else {
            &self.english
        }
    }
}

/// A catalogue record as served by the `pokemons` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pokemon {
    #[serde(default, alias = "_id")]
    pub id: Option<serde_json::Value>,
    pub name: LocalizedName,
    #[serde(default, rename = "type")]
    pub types: Vec<String>,
    pub base: BaseStats,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extras: HashMap<String, serde_json::Value>,
}

impl Pokemon {
    /// Identity used to de-duplicate team members; falls back to the English name.
    pub fn key(&self) -> String {
        match &self.id {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => self.name.english.to_ascii_lowercase(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    #[serde(default, alias = "_id")]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub members: Vec<Pokemon>,
}

/// The two REST collections, as dumped to disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalogue {
    #[serde(default)]
    pub pokemons: Vec<Pokemon>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(flatten)]
    pub extras: HashMap<String, serde_json::Value>,
}

/// Read-only battle input: a display label and the six base stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub base: BaseStats,
    #[serde(default)]
    pub image: Option<String>,
}

impl Combatant {
    pub fn new(name: impl Into<String>, base: BaseStats) -> Self {
        Combatant {
            name: name.into(),
            base,
            image: None,
        }
    }
}

impl From<&Pokemon> for Combatant {
    fn from(pokemon: &Pokemon) -> Self {
        Combatant {
            name: pokemon.name.display().to_string(),
            base: pokemon.base,
            image: pokemon.image.clone(),
        }
    }
}
