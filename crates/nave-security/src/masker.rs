//! Recursive document masking

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::generator::{SyntheticGenerator, Vocabulary};
use crate::patterns::{PatternSet, ScrubCounts};
use crate::rules::{DISCRIMINANT_KEY, DescriptionPlaceholder, RuleKind, RuleTable};

/// Everything a [`Masker`] needs, built once and handed over
#[derive(Debug, Clone, Default)]
pub struct MaskingConfig {
    pub rules: RuleTable,
    pub patterns: PatternSet,
    pub vocabulary: Vocabulary,
}

impl MaskingConfig {
    pub fn with_description_placeholder(placeholder: DescriptionPlaceholder) -> Self {
        Self {
            rules: RuleTable::new(placeholder),
            ..Self::default()
        }
    }
}

/// Replacement counts for one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskReport {
    pub opaque_names: usize,
    pub opaque_texts: usize,
    pub emails: usize,
    pub urls: usize,
    pub companion_rewrites: usize,
}

impl MaskReport {
    pub fn total(&self) -> usize {
        self.opaque_names + self.opaque_texts + self.emails + self.urls + self.companion_rewrites
    }

    fn record_scrub(&mut self, counts: ScrubCounts) {
        self.emails += counts.emails;
        self.urls += counts.urls;
    }
}

#[derive(Debug, Clone)]
pub struct MaskOutcome {
    pub document: Value,
    pub report: MaskReport,
}

/// Walks a JSON document and replaces sensitive leaves.
///
/// Object keys, their order, array lengths and non-string scalars are left
/// alone; the only structural change is the companion rewrite, which may add
/// explicit `null` members to changelog items.
pub struct Masker {
    rules: RuleTable,
    patterns: PatternSet,
    generator: SyntheticGenerator,
    report: MaskReport,
}

impl Masker {
    pub fn new(config: MaskingConfig) -> Self {
        let generator = SyntheticGenerator::from_entropy(config.vocabulary);
        Self::with_generator(config.rules, config.patterns, generator)
    }

    pub fn seeded(config: MaskingConfig, seed: u64) -> Self {
        let generator = SyntheticGenerator::seeded(config.vocabulary, seed);
        Self::with_generator(config.rules, config.patterns, generator)
    }

    fn with_generator(rules: RuleTable, patterns: PatternSet, generator: SyntheticGenerator) -> Self {
        Self {
            rules,
            patterns,
            generator,
            report: MaskReport::default(),
        }
    }

    pub fn mask_document(&mut self, document: Value) -> MaskOutcome {
        self.report = MaskReport::default();
        let document = self.mask_value(document, None);

        MaskOutcome {
            document,
            report: std::mem::take(&mut self.report),
        }
    }

    fn mask_value(&mut self, value: Value, key_hint: Option<&str>) -> Value {
        match value {
            Value::Object(map) => Value::Object(self.mask_object(map)),
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.mask_value(item, None))
                    .collect(),
            ),
            Value::String(text) => Value::String(self.mask_text(text, key_hint)),
            scalar @ (Value::Null | Value::Bool(_) | Value::Number(_)) => scalar,
        }
    }

    fn mask_object(&mut self, mut map: Map<String, Value>) -> Map<String, Value> {
        self.rewrite_companions(&mut map);

        for (key, value) in map.iter_mut() {
            let member = value.take();
            *value = self.mask_value(member, Some(key.as_str()));
        }
        map
    }

    fn mask_text(&mut self, text: String, key_hint: Option<&str>) -> String {
        match self.rules.classify_text(key_hint) {
            RuleKind::OpaqueName => {
                self.report.opaque_names += 1;
                self.generator.display_name_unlike(&text)
            }
            RuleKind::OpaqueText => {
                self.report.opaque_texts += 1;
                self.generator.phrase_unlike(&text)
            }
            RuleKind::PatternScrub => {
                let (scrubbed, counts) = self.patterns.scrub(text, &mut self.generator);
                self.report.record_scrub(counts);
                scrubbed
            }
            RuleKind::Passthrough => text,
        }
    }

    /// Rewrite the siblings of a changelog discriminant, once per object
    fn rewrite_companions(&mut self, map: &mut Map<String, Value>) {
        let Self {
            rules,
            generator,
            report,
            ..
        } = self;

        let Some(rule) = map
            .get(DISCRIMINANT_KEY)
            .and_then(Value::as_str)
            .and_then(|field| rules.companion_rule(field))
        else {
            return;
        };

        for key in &rule.keys {
            let replacement = match map.get(key) {
                Some(value) if !value.is_null() => {
                    Value::String(rule.fill.generate(generator, value.as_str()))
                }
                _ => Value::Null,
            };
            map.insert(key.clone(), replacement);
        }
        report.companion_rewrites += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn masker() -> Masker {
        Masker::seeded(MaskingConfig::default(), 11)
    }

    fn mask(value: Value) -> Value {
        masker().mask_document(value).document
    }

    #[test]
    fn test_display_name_replaced() {
        let masked = mask(json!({"displayName": "John Doe"}));

        let name = masked["displayName"].as_str().unwrap();
        assert_ne!(name, "John Doe");
        assert!(crate::generator::DEFAULT_NAMES.contains(&name));
    }

    #[test]
    fn test_opaque_text_keys() {
        let masked = mask(json!({
            "goal": "Ship it",
            "body": "Comment with bob@corp.com",
            "summary": "Secret project",
            "description": "See https://internal.corp/wiki"
        }));

        for key in ["goal", "body", "summary", "description"] {
            let text = masked[key].as_str().unwrap();
            assert_eq!(text.split(' ').count(), 3, "{} not a phrase", key);
        }
    }

    #[test]
    fn test_scalars_unchanged() {
        let document = json!({"id": 10042, "ratio": 0.5, "done": false, "resolution": null});

        assert_eq!(mask(document.clone()), document);
    }

    #[test]
    fn test_root_scalars() {
        assert_eq!(mask(json!(null)), json!(null));
        assert_eq!(mask(json!(7)), json!(7));
        assert_eq!(mask(json!("plain")), json!("plain"));

        let masked = mask(json!("mail a@b.com"));
        assert_ne!(masked, json!("mail a@b.com"));
    }

    #[test]
    fn test_array_elements_have_no_key_hint() {
        let masked = mask(json!({"summary": ["kept", "also kept"], "labels": [["x@y.com"]]}));

        assert_eq!(masked["summary"], json!(["kept", "also kept"]));
        let nested = masked["labels"][0][0].as_str().unwrap();
        assert_ne!(nested, "x@y.com");
    }

    #[test]
    fn test_non_string_under_opaque_key() {
        let document = json!({"displayName": null, "summary": 5, "description": {"type": "doc"}});

        assert_eq!(mask(document.clone()), document);
    }

    #[test]
    fn test_description_companions() {
        let masked = mask(json!({
            "field": "description",
            "fromString": "Old text",
            "toString": "New text",
            "to": null
        }));

        assert_eq!(masked["field"], "description");
        assert_eq!(masked["fromString"], "text");
        assert_eq!(masked["toString"], "text");
        assert_eq!(masked["to"], Value::Null);
    }

    #[test]
    fn test_description_companions_all_absent() {
        let masked = mask(json!({"field": "description", "fieldtype": "jira"}));
        let object = masked.as_object().unwrap();

        for key in ["fromString", "to", "toString"] {
            assert_eq!(object.get(key), Some(&Value::Null), "{} should be null", key);
        }
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["field", "fieldtype", "fromString", "to", "toString"]);
    }

    #[test]
    fn test_description_generated_placeholder() {
        let config = MaskingConfig::with_description_placeholder(DescriptionPlaceholder::Generated);
        let mut masker = Masker::seeded(config, 5);

        let masked = masker
            .mask_document(json!({"field": "description", "fromString": "Old", "to": "10001"}))
            .document;

        assert_eq!(masked["fromString"].as_str().unwrap().split(' ').count(), 3);
        assert_eq!(masked["to"].as_str().unwrap().split(' ').count(), 3);
        assert_eq!(masked["toString"], Value::Null);
    }

    #[test]
    fn test_assignee_companions() {
        let masked = mask(json!({
            "field": "assignee",
            "from": "abc123",
            "fromString": "Jane Smith",
            "to": "def456",
            "toString": null
        }));

        let from = masked["fromString"].as_str().unwrap();
        assert!(crate::generator::DEFAULT_NAMES.contains(&from));
        assert_eq!(masked["toString"], Value::Null);
        assert_eq!(masked["from"], "abc123");
        assert_eq!(masked["to"], "def456");
    }

    #[test]
    fn test_contributors_companions_added_when_absent() {
        let masked = mask(json!({"field": "Contributors", "toString": "Jane Smith, Bob"}));
        let object = masked.as_object().unwrap();

        assert_eq!(object.get("fromString"), Some(&Value::Null));
        let to = object["toString"].as_str().unwrap();
        assert!(crate::generator::DEFAULT_NAMES.contains(&to));
    }

    #[test]
    fn test_summary_and_attachment_companions() {
        for field in ["summary", "Attachment"] {
            let masked = mask(json!({"field": field, "fromString": "a.png", "toString": "b.png"}));

            for key in ["fromString", "toString"] {
                let phrase = masked[key].as_str().unwrap();
                assert_eq!(phrase.split(' ').count(), 3);
            }
        }
    }

    #[test]
    fn test_empty_companion_is_replaced() {
        let masked = mask(json!({"field": "summary", "fromString": "", "toString": "New"}));

        let from = masked["fromString"].as_str().unwrap();
        assert!(!from.is_empty());
        assert!(masked["toString"].is_string());
    }

    #[test]
    fn test_non_null_companions_stay_non_null() {
        let masked = mask(json!({
            "field": "description",
            "from": null,
            "fromString": 0,
            "to": false,
            "toString": ""
        }));

        assert_eq!(masked["from"], Value::Null);
        assert_eq!(masked["fromString"], "text");
        assert_eq!(masked["to"], "text");
        assert_eq!(masked["toString"], "text");
    }

    #[test]
    fn test_other_discriminant_uses_key_rules() {
        let masked = mask(json!({
            "field": "status",
            "fromString": "In Progress",
            "toString": "Done by ops@corp.com"
        }));

        assert_eq!(masked["fromString"], "In Progress");
        let to = masked["toString"].as_str().unwrap();
        assert!(to.starts_with("Done by "));
        assert!(!to.contains("ops@corp.com"));
    }

    #[test]
    fn test_non_string_discriminant_ignored() {
        let document = json!({"field": 3, "fromString": "Old text"});

        assert_eq!(mask(document.clone()), document);
    }

    #[test]
    fn test_report_counts() {
        let outcome = masker().mask_document(json!({
            "displayName": "John",
            "summary": "Issue",
            "emailAddress": "john@corp.com",
            "self": "https://jira.corp/rest/api/2/issue/1",
            "items": [{"field": "assignee", "fromString": "Jane", "toString": null}]
        }));

        assert_eq!(
            outcome.report,
            MaskReport {
                opaque_names: 1,
                opaque_texts: 1,
                emails: 1,
                urls: 1,
                companion_rewrites: 1,
            }
        );
        assert_eq!(outcome.report.total(), 5);
    }

    #[test]
    fn test_report_resets_between_documents() {
        let mut masker = masker();

        masker.mask_document(json!({"displayName": "John"}));
        let second = masker.mask_document(json!({"id": 1}));

        assert_eq!(second.report, MaskReport::default());
    }
}
