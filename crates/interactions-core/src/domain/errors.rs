//! ErrorBag - フィールド単位のバリデーションエラー
//!
//! 1 つのフィールドに複数のメッセージが積まれることがある
//! （宣言的ルールの失敗 + execute 中に追加されたもの）。

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// Field-keyed, ordered collection of human-readable messages.
///
/// Serializes as a plain JSON object: `{"meters": ["must be numeric"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorBag {
    messages: IndexMap<String, Vec<String>>,
}

impl ErrorBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-message bag.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut bag = Self::new();
        bag.add(field, message);
        bag
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.messages
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Builder-style [`ErrorBag::add`].
    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    pub fn merge(&mut self, other: ErrorBag) {
        for (field, mut messages) in other.messages {
            self.messages.entry(field).or_default().append(&mut messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of fields with at least one message.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Total number of messages across all fields.
    pub fn count(&self) -> usize {
        self.messages.values().map(Vec::len).sum()
    }

    pub fn has(&self, field: &str) -> bool {
        self.messages.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.messages.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).first().map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.messages
            .iter()
            .map(|(field, msgs)| (field.as_str(), msgs.as_slice()))
    }

    pub fn to_map(&self) -> IndexMap<String, Vec<String>> {
        self.messages.clone()
    }

    pub fn into_map(self) -> IndexMap<String, Vec<String>> {
        self.messages
    }
}

impl fmt::Display for ErrorBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.messages {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ErrorBag {
    fn from_iter<It: IntoIterator<Item = (K, V)>>(iter: It) -> Self {
        let mut bag = ErrorBag::new();
        for (field, message) in iter {
            bag.add(field, message);
        }
        bag
    }
}
