//! Validator: evaluates [`Rules`] against [`Parameters`].

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::messages::MessageCatalog;
use super::predicate::PredicateRegistry;
use super::rule::{Rule, Rules};
use crate::domain::errors::ErrorBag;
use crate::domain::params::{Parameters, Value};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex is valid")
});

/// Parameters bound to their rules.
///
/// Construction never validates; call [`Validator::validate`] (or
/// [`Validator::fails`]) to evaluate. Evaluation is pure and can be repeated.
#[derive(Debug, Clone)]
pub struct Validator {
    params: Parameters,
    rules: Rules,
    predicates: Arc<PredicateRegistry>,
    messages: Arc<MessageCatalog>,
}

/// Size flavour of a value for `min`/`max`/`between`.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Size {
    Numeric(f64),
    String(f64),
    Array(f64),
}

impl Size {
    fn kind(self) -> &'static str {
        match self {
            Size::Numeric(_) => "numeric",
            Size::String(_) => "string",
            Size::Array(_) => "array",
        }
    }

    fn value(self) -> f64 {
        match self {
            Size::Numeric(n) | Size::String(n) | Size::Array(n) => n,
        }
    }
}

impl Validator {
    pub fn new(
        params: Parameters,
        rules: Rules,
        predicates: Arc<PredicateRegistry>,
        messages: Arc<MessageCatalog>,
    ) -> Self {
        Self {
            params,
            rules,
            predicates,
            messages,
        }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn into_parameters(self) -> Parameters {
        self.params
    }

    pub fn fails(&self) -> bool {
        !self.validate().is_empty()
    }

    pub fn passes(&self) -> bool {
        !self.fails()
    }

    /// Evaluates every declared rule and collects the failures.
    pub fn validate(&self) -> ErrorBag {
        let mut errors = ErrorBag::new();
        for (field, rules) in self.rules.iter() {
            self.validate_field(field, rules, &mut errors);
        }
        errors
    }

    fn validate_field(&self, field: &str, rules: &[Rule], errors: &mut ErrorBag) {
        let value = self.params.get(field).unwrap_or(&Value::NULL);

        // 値が無いフィールドは required だけを評価する
        if is_absent(value) {
            if rules.contains(&Rule::Required) {
                errors.add(field, self.messages.render(field, "required", None, &[]));
            }
            return;
        }

        let bail = rules.contains(&Rule::Bail);
        let numeric = rules
            .iter()
            .any(|r| matches!(r, Rule::Numeric | Rule::Integer));

        for rule in rules {
            if let Some(message) = self.check(field, value, rule, numeric) {
                errors.add(field, message);
                if bail {
                    return;
                }
            }
        }
    }

    /// Returns the failure message, if any.
    fn check(&self, field: &str, value: &Value, rule: &Rule, numeric: bool) -> Option<String> {
        let render = |name: &str, kind: Option<&str>, replacements: &[(&str, String)]| {
            Some(self.messages.render(field, name, kind, replacements))
        };

        match rule {
            Rule::Required | Rule::Nullable | Rule::Bail => None,
            Rule::Numeric if number_of(value).is_none() => render("numeric", None, &[]),
            Rule::Integer if integer_of(value).is_none() => render("integer", None, &[]),
            Rule::String if value.as_str().is_none() => render("string", None, &[]),
            Rule::Boolean if boolean_of(value).is_none() => render("boolean", None, &[]),
            Rule::Array if value.as_array().is_none() => render("array", None, &[]),
            Rule::Email if !value.as_str().is_some_and(|s| EMAIL_REGEX.is_match(s)) => {
                render("email", None, &[])
            }
            Rule::Min(min) => {
                let size = size_of(value, numeric)?;
                (size.value() < *min)
                    .then(|| self.messages.render(field, "min", Some(size.kind()), &[("min", fmt_num(*min))]))
            }
            Rule::Max(max) => {
                let size = size_of(value, numeric)?;
                (size.value() > *max)
                    .then(|| self.messages.render(field, "max", Some(size.kind()), &[("max", fmt_num(*max))]))
            }
            Rule::Between(min, max) => {
                let size = size_of(value, numeric)?;
                (size.value() < *min || size.value() > *max).then(|| {
                    self.messages.render(
                        field,
                        "between",
                        Some(size.kind()),
                        &[("min", fmt_num(*min)), ("max", fmt_num(*max))],
                    )
                })
            }
            Rule::In(allowed) => {
                let text = scalar_text(value);
                if text.is_some_and(|t| allowed.iter().any(|a| *a == t)) {
                    None
                } else {
                    render("in", None, &[("values", allowed.join(", "))])
                }
            }
            Rule::Custom { name, args } => self.check_custom(field, value, name, args),
            Rule::Malformed { token, error } => {
                tracing::warn!(field, rule = %token, %error, "malformed validation rule");
                render("malformed", None, &[("rule", token.clone())])
            }
            _ => None,
        }
    }

    fn check_custom(&self, field: &str, value: &Value, name: &str, args: &[String]) -> Option<String> {
        let Some(predicate) = self.predicates.get(name) else {
            tracing::warn!(field, rule = name, "unknown validation rule");
            return Some(self.messages.render(field, "unknown", None, &[("rule", name.to_string())]));
        };

        if predicate.check(field, value, args, &self.params) {
            return None;
        }
        let first = args.first().cloned().unwrap_or_default();
        Some(self.messages.render(field, name, None, &[("type", first)]))
    }
}

fn is_absent(value: &Value) -> bool {
    match value {
        Value::Json(serde_json::Value::Null) => true,
        Value::Json(serde_json::Value::String(s)) => s.trim().is_empty(),
        Value::Json(serde_json::Value::Array(a)) => a.is_empty(),
        _ => false,
    }
}

fn number_of(value: &Value) -> Option<f64> {
    match value.as_json()? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn integer_of(value: &Value) -> Option<i64> {
    match value.as_json()? {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn boolean_of(value: &Value) -> Option<bool> {
    match value.as_json()? {
        serde_json::Value::Bool(b) => Some(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        serde_json::Value::String(s) => match s.as_str() {
            "0" | "false" => Some(false),
            "1" | "true" => Some(true),
            _ => None,
        },
        _ => None,
    }
}

/// `None` means the size rule is skipped (a type rule already reports it).
fn size_of(value: &Value, numeric: bool) -> Option<Size> {
    if numeric {
        return number_of(value).map(Size::Numeric);
    }
    match value.as_json()? {
        serde_json::Value::Number(n) => n.as_f64().map(Size::Numeric),
        serde_json::Value::String(s) => Some(Size::String(s.chars().count() as f64)),
        serde_json::Value::Array(a) => Some(Size::Array(a.len() as f64)),
        _ => None,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value.as_json()? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn fmt_num(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
