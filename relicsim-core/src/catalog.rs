//! Relic list document: weapons, trait descriptors and item level settings.
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::SIMPLE_TRAIT_CATEGORY;

/// Errors raised while reading or querying a relic list.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("relic list is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no weapon defined for specialization {0}")]
    UnknownWeapon(String),
    #[error("no traits defined for specialization {0}")]
    UnknownTraits(String),
    #[error("ItemLevelSteps must be at least 1")]
    ZeroItemLevelStep,
}

/// Item level settings of the relic list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemLevelConfig {
    pub base_item_level: u32,
    pub item_level_steps: u32,
    pub maximum_level_increase: u32,
}

/// A trait the simulation can override, with its applicability filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitDescriptor {
    pub name: String,
    pub spell_id: u64,
    #[serde(default)]
    pub exclude: bool,
    #[serde(default)]
    pub fightstyle_whitelist: Option<Vec<String>>,
    #[serde(default)]
    pub fightstyle_blacklist: Option<Vec<String>>,
    #[serde(default)]
    pub profile_match: Option<Vec<String>>,
    #[serde(default)]
    pub profile_no_match: Option<Vec<String>>,
}

impl TraitDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, spell_id: u64) -> Self {
        Self {
            name: name.into(),
            spell_id,
            exclude: false,
            fightstyle_whitelist: None,
            fightstyle_blacklist: None,
            profile_match: None,
            profile_no_match: None,
        }
    }

    /// Whether the trait should be simulated for this fight style and
    /// profile template.
    #[must_use]
    pub fn applies_to(&self, fightstyle: &str, template: &str) -> bool {
        if self.exclude {
            return false;
        }
        if let Some(whitelist) = &self.fightstyle_whitelist
            && !whitelist.iter().any(|f| f == fightstyle)
        {
            return false;
        }
        if let Some(blacklist) = &self.fightstyle_blacklist
            && blacklist.iter().any(|f| f == fightstyle)
        {
            return false;
        }
        if let Some(patterns) = &self.profile_match
            && !patterns.iter().any(|p| template.contains(p.as_str()))
        {
            return false;
        }
        if let Some(patterns) = &self.profile_no_match
            && patterns.iter().any(|p| template.contains(p.as_str()))
        {
            return false;
        }
        true
    }

    /// Engine token for this trait.
    #[must_use]
    pub fn token(&self) -> String {
        tokenize_name(&self.name)
    }
}

/// The relic list document as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RelicList {
    pub config: ItemLevelConfig,
    pub weapons: BTreeMap<String, String>,
    pub traits: BTreeMap<String, Vec<TraitDescriptor>>,
}

impl RelicList {
    /// Parse a relic list from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` when the document does not match the
    /// expected shape.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Weapon definition line for `spec`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownWeapon` when the spec has no weapon.
    pub fn weapon(&self, spec: &str) -> Result<&str, CatalogError> {
        self.weapons
            .get(spec)
            .map(String::as_str)
            .ok_or_else(|| CatalogError::UnknownWeapon(spec.to_string()))
    }

    /// Primary and simple traits relevant to `spec`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownTraits` when the spec has no trait list.
    pub fn catalog_for(&self, spec: &str) -> Result<TraitCatalog, CatalogError> {
        let primary = self
            .traits
            .get(spec)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownTraits(spec.to_string()))?;
        let simple = self
            .traits
            .get(SIMPLE_TRAIT_CATEGORY)
            .cloned()
            .unwrap_or_default();
        Ok(TraitCatalog { primary, simple })
    }
}

/// How a curve is encoded in the weight string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraitKind<'a> {
    /// Rank-keyed weights, one per rank.
    Primary(&'a TraitDescriptor),
    /// A single weight taken from rank 1.
    Simple(&'a TraitDescriptor),
}

/// Trait descriptors of one specialization, split by encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraitCatalog {
    pub primary: Vec<TraitDescriptor>,
    pub simple: Vec<TraitDescriptor>,
}

impl TraitCatalog {
    /// Look a curve up by name; primary traits shadow simple ones.
    #[must_use]
    pub fn lookup(&self, curve: &str) -> Option<TraitKind<'_>> {
        if let Some(descriptor) = self.primary.iter().find(|t| t.name == curve) {
            return Some(TraitKind::Primary(descriptor));
        }
        self.simple
            .iter()
            .find(|t| t.name == curve)
            .map(TraitKind::Simple)
    }
}

/// Convert a display name into an engine token,
/// e.g. `"Fortune's Strike"` -> `"fortunes_strike"`.
#[must_use]
pub fn tokenize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '.' | '%' | ' '))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

fn item_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r",id=(\d+),").expect("item id pattern is valid"))
}

/// Item id embedded in a weapon definition (`...,id=128403,...`).
#[must_use]
pub fn weapon_item_id(weapon: &str) -> Option<u64> {
    item_id_pattern()
        .captures(weapon)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
