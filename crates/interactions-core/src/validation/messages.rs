//! MessageCatalog - エラーメッセージのテンプレート
//!
//! # 検索順
//! 1. `field.rule`（例: `meters.numeric`）
//! 2. `rule.kind`（例: `min.string`）
//! 3. `rule`（例: `numeric`）
//! 4. 組み込みのデフォルト
//!
//! プレースホルダ: `:attribute`, `:min`, `:max`, `:values`, `:rule`, `:type`

use std::collections::HashMap;

const DEFAULTS: &[(&str, &str)] = &[
    ("required", "is required"),
    ("numeric", "must be numeric"),
    ("integer", "must be an integer"),
    ("string", "must be a string"),
    ("boolean", "must be true or false"),
    ("array", "must be a list"),
    ("email", "must be a valid email address"),
    ("min.numeric", "must be at least :min"),
    ("min.string", "must be at least :min characters"),
    ("min.array", "must have at least :min items"),
    ("max.numeric", "must be at most :max"),
    ("max.string", "must be at most :max characters"),
    ("max.array", "must have at most :max items"),
    ("between.numeric", "must be between :min and :max"),
    ("between.string", "must be between :min and :max characters"),
    ("between.array", "must have between :min and :max items"),
    ("in", "must be one of: :values"),
    ("object", "the :attribute object type is invalid."),
    ("custom", "the :attribute is invalid."),
    ("unknown", "the :attribute uses unknown rule :rule."),
    ("malformed", "the :attribute has a malformed rule :rule."),
];

/// Template overrides layered on top of the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageCatalog {
    overrides: HashMap<String, String>,
}

impl MessageCatalog {
    /// Catalog without overrides (built-in defaults only).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.set(key, template);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.overrides.insert(key.into(), template.into());
    }

    /// Returns a catalog where `other` wins on conflicts.
    pub fn layered(&self, other: &MessageCatalog) -> MessageCatalog {
        let mut merged = self.clone();
        for (k, v) in &other.overrides {
            merged.overrides.insert(k.clone(), v.clone());
        }
        merged
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Looks up the template for `rule` on `field`; `kind` is the size
    /// flavour (`numeric`, `string`, `array`) for size rules.
    pub fn template(&self, field: &str, rule: &str, kind: Option<&str>) -> &str {
        let field_key = format!("{field}.{rule}");
        if let Some(t) = self.overrides.get(&field_key) {
            return t;
        }
        let kind_key = kind.map(|k| format!("{rule}.{k}"));
        if let Some(t) = kind_key.as_deref().and_then(|k| self.overrides.get(k)) {
            return t;
        }
        if let Some(t) = self.overrides.get(rule) {
            return t;
        }
        kind_key
            .as_deref()
            .and_then(default_template)
            .or_else(|| default_template(rule))
            .unwrap_or_else(|| {
                default_template("custom").unwrap_or("the :attribute is invalid.")
            })
    }

    /// Renders a message, substituting `:attribute` and the given pairs.
    pub fn render(
        &self,
        field: &str,
        rule: &str,
        kind: Option<&str>,
        replacements: &[(&str, String)],
    ) -> String {
        let mut message = self.template(field, rule, kind).replace(":attribute", field);
        for (placeholder, value) in replacements {
            message = message.replace(&format!(":{placeholder}"), value);
        }
        message
    }
}

impl From<HashMap<String, String>> for MessageCatalog {
    fn from(overrides: HashMap<String, String>) -> Self {
        Self { overrides }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MessageCatalog {
    fn from_iter<It: IntoIterator<Item = (K, V)>>(iter: It) -> Self {
        Self {
            overrides: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

fn default_template(key: &str) -> Option<&'static str> {
    DEFAULTS.iter().find(|(k, _)| *k == key).map(|(_, t)| *t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("numeric", None, "must be numeric")]
    #[case::sized("min", Some("string"), "must be at least :min characters")]
    #[case::object("object", None, "the :attribute object type is invalid.")]
    #[case::unregistered("frobnicate", None, "the :attribute is invalid.")]
    fn default_templates(#[case] rule: &str, #[case] kind: Option<&str>, #[case] expected: &str) {
        assert_eq!(MessageCatalog::new().template("f", rule, kind), expected);
    }

    #[test]
    fn substitutes_attribute_and_arguments() {
        let catalog = MessageCatalog::new();
        let msg = catalog.render("inception", "object", None, &[]);
        assert_eq!(msg, "the inception object type is invalid.");

        let msg = catalog.render("meters", "min", Some("numeric"), &[("min", "0".into())]);
        assert_eq!(msg, "must be at least 0");
    }

    #[test]
    fn field_override_beats_rule_override() {
        let catalog = MessageCatalog::new()
            .with("numeric", "needs a number")
            .with("meters.numeric", "meters need a number");
        assert_eq!(catalog.template("meters", "numeric", None), "meters need a number");
        assert_eq!(catalog.template("feet", "numeric", None), "needs a number");
    }

    #[test]
    fn layered_prefers_the_upper_catalog() {
        let base = MessageCatalog::new().with("required", "base");
        let upper = MessageCatalog::new().with("required", "upper");
        assert_eq!(base.layered(&upper).template("x", "required", None), "upper");
        assert_eq!(base.template("x", "required", None), "base");
    }
}
