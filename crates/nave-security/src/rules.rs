//! Field-context masking rules
//!
//! Two tables decide what happens to a value:
//! - key rules map the object key a string sits under to a [`RuleKind`]
//! - companion rules map a changelog item's `field` discriminant to the
//!   sibling members rewritten before recursion

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::generator::SyntheticGenerator;

/// Member holding the changelog discriminant
pub const DISCRIMINANT_KEY: &str = "field";

/// Placeholder written into `description` changelog companions
pub const DESCRIPTION_SENTINEL: &str = "text";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    OpaqueName,
    OpaqueText,
    PatternScrub,
    Passthrough,
}

/// What a present companion member is replaced with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanionFill {
    Name,
    Text,
    Fixed(String),
}

impl CompanionFill {
    pub fn generate(&self, generator: &mut SyntheticGenerator, original: Option<&str>) -> String {
        match (self, original) {
            (CompanionFill::Name, Some(original)) => generator.display_name_unlike(original),
            (CompanionFill::Name, None) => generator.display_name(),
            (CompanionFill::Text, Some(original)) => generator.phrase_unlike(original),
            (CompanionFill::Text, None) => generator.phrase(),
            (CompanionFill::Fixed(value), _) => value.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionRule {
    pub keys: Vec<String>,
    pub fill: CompanionFill,
}

impl CompanionRule {
    pub fn new(keys: &[&str], fill: CompanionFill) -> Self {
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            fill,
        }
    }
}

/// How `description` changelog companions are filled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionPlaceholder {
    /// Same sentinel for every present companion
    Fixed(String),
    /// Fresh phrase per companion, like `summary` items
    Generated,
}

impl Default for DescriptionPlaceholder {
    fn default() -> Self {
        DescriptionPlaceholder::Fixed(DESCRIPTION_SENTINEL.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct RuleTable {
    key_rules: HashMap<String, RuleKind>,
    companion_rules: HashMap<String, CompanionRule>,
}

impl RuleTable {
    pub fn new(description: DescriptionPlaceholder) -> Self {
        let mut key_rules = HashMap::new();
        key_rules.insert("displayName".to_string(), RuleKind::OpaqueName);
        for key in ["goal", "body", "summary", "description"] {
            key_rules.insert(key.to_string(), RuleKind::OpaqueText);
        }

        let description_fill = match description {
            DescriptionPlaceholder::Fixed(value) => CompanionFill::Fixed(value),
            DescriptionPlaceholder::Generated => CompanionFill::Text,
        };

        let mut companion_rules = HashMap::new();
        companion_rules.insert(
            "description".to_string(),
            CompanionRule::new(&["fromString", "to", "toString"], description_fill),
        );
        for field in ["assignee", "Contributors"] {
            companion_rules.insert(
                field.to_string(),
                CompanionRule::new(&["fromString", "toString"], CompanionFill::Name),
            );
        }
        for field in ["summary", "Attachment"] {
            companion_rules.insert(
                field.to_string(),
                CompanionRule::new(&["fromString", "toString"], CompanionFill::Text),
            );
        }

        Self {
            key_rules,
            companion_rules,
        }
    }

    pub fn with_key_rule(mut self, key: impl Into<String>, kind: RuleKind) -> Self {
        self.key_rules.insert(key.into(), kind);
        self
    }

    pub fn with_companion_rule(mut self, discriminant: impl Into<String>, rule: CompanionRule) -> Self {
        self.companion_rules.insert(discriminant.into(), rule);
        self
    }

    /// Rule for a value found under `key_hint`
    pub fn classify(&self, key_hint: Option<&str>, value: &Value) -> RuleKind {
        match value {
            Value::String(_) => self.classify_text(key_hint),
            _ => RuleKind::Passthrough,
        }
    }

    /// Rule for a string leaf found under `key_hint`
    pub fn classify_text(&self, key_hint: Option<&str>) -> RuleKind {
        key_hint
            .and_then(|key| self.key_rules.get(key))
            .copied()
            .unwrap_or(RuleKind::PatternScrub)
    }

    pub fn companion_rule(&self, discriminant: &str) -> Option<&CompanionRule> {
        self.companion_rules.get(discriminant)
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new(DescriptionPlaceholder::default())
    }
}
