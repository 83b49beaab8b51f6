//! Parameters - interaction に渡される入力値
//!
//! # 学習ポイント
//! - `IndexMap` による挿入順の保持
//! - `Arc<dyn Any>` による型消去と downcast
//! - 存在しないキーはエラーではなく `None`

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Capability carried by every value wrapped with [`ObjectValue::interaction`].
pub const INTERACTION_CAPABILITY: &str = "Interaction";

/// ParamObject は `object:<Type>` で検査できる Rust の値
///
/// # 使用例
/// ```ignore
/// struct Account { id: u64 }
///
/// impl ParamObject for Account {
///     const TYPE_NAME: &'static str = "Account";
///     fn capabilities() -> &'static [&'static str] {
///         &["Owner"]
///     }
/// }
/// ```
pub trait ParamObject: Any + Send + Sync {
    /// `object:<Type>` の `<Type>` と比較される型名
    const TYPE_NAME: &'static str;

    /// 型名以外に満たす capability（trait 名など）
    fn capabilities() -> &'static [&'static str] {
        &[]
    }
}

/// An arbitrary Rust value tagged with the names it satisfies.
#[derive(Clone)]
pub struct ObjectValue {
    type_name: &'static str,
    capabilities: Vec<&'static str>,
    inner: Arc<dyn Any + Send + Sync>,
}

impl ObjectValue {
    pub fn new<T: ParamObject>(value: T) -> Self {
        Self {
            type_name: T::TYPE_NAME,
            capabilities: T::capabilities().to_vec(),
            inner: Arc::new(value),
        }
    }

    /// Wraps an interaction so that it satisfies both its own name and the
    /// generic `Interaction` capability.
    pub fn interaction<I>(interaction: I) -> Self
    where
        I: crate::typed::Interaction + Send + Sync + 'static,
    {
        Self {
            type_name: I::NAME,
            capabilities: vec![INTERACTION_CAPABILITY],
            inner: Arc::new(interaction),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn capabilities(&self) -> &[&'static str] {
        &self.capabilities
    }

    /// True when `tag` is the type name or one of the capabilities.
    pub fn satisfies(&self, tag: &str) -> bool {
        self.type_name == tag || self.capabilities.iter().any(|c| *c == tag)
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectValue")
            .field("type_name", &self.type_name)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

/// A single parameter value.
#[derive(Debug, Clone)]
pub enum Value {
    Json(serde_json::Value),
    Object(ObjectValue),
}

impl Value {
    pub const NULL: Value = Value::Json(serde_json::Value::Null);

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Json(serde_json::Value::Null))
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Value::Json(v) => Some(v),
            Value::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Value::Object(o) => Some(o),
            Value::Json(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_json().and_then(serde_json::Value::as_f64)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_json().and_then(serde_json::Value::as_i64)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_json().and_then(serde_json::Value::as_str)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_json().and_then(serde_json::Value::as_bool)
    }

    pub fn as_array(&self) -> Option<&Vec<serde_json::Value>> {
        self.as_json().and_then(serde_json::Value::as_array)
    }

    /// Name used in logs and the serialized form of objects.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Json(serde_json::Value::Null) => "null",
            Value::Json(serde_json::Value::Bool(_)) => "boolean",
            Value::Json(serde_json::Value::Number(_)) => "number",
            Value::Json(serde_json::Value::String(_)) => "string",
            Value::Json(serde_json::Value::Array(_)) => "array",
            Value::Json(serde_json::Value::Object(_)) => "map",
            Value::Object(_) => "object",
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Json(v) => v.serialize(serializer),
            Value::Object(o) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$object", o.type_name())?;
                map.end()
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl From<ObjectValue> for Value {
    fn from(o: ObjectValue) -> Self {
        Value::Object(o)
    }
}

macro_rules! json_value_from {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Json(serde_json::Value::from(v))
                }
            }
        )*
    };
}

json_value_from!(bool, i32, i64, u32, u64, f64, String, &str);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::NULL, Into::into)
    }
}

/// Ordered parameter bag handed to an interaction.
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    values: IndexMap<String, Value>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Undeclared keys yield `None`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// `isset` semantics: present and not null.
    pub fn has(&self, name: &str) -> bool {
        self.values.get(name).is_some_and(|v| !v.is_null())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Parameters {
    fn from_iter<It: IntoIterator<Item = (K, V)>>(iter: It) -> Self {
        let mut params = Parameters::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Parameters {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().collect()
    }
}

impl Serialize for Parameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (k, v) in &self.values {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Builds [`Parameters`] from `name => value` pairs.
///
/// ```ignore
/// let params = params! { "meters" => 10000, "unit" => "mi" };
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::Parameters::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut params = $crate::Parameters::new();
        $(params.insert($name, $value);)+
        params
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    struct Meter(u32);

    impl ParamObject for Meter {
        const TYPE_NAME: &'static str = "Meter";
        fn capabilities() -> &'static [&'static str] {
            &["Length"]
        }
    }

    #[test]
    fn missing_key_reads_as_none() {
        let params = Parameters::new().with("meters", 10);
        assert!(params.get("feet").is_none());
        assert!(!params.has("feet"));
        assert_eq!(params.get("meters").and_then(Value::as_i64), Some(10));
    }

    #[test]
    fn null_is_present_but_not_set() {
        let params = Parameters::new().with("note", serde_json::Value::Null);
        assert!(params.contains_key("note"));
        assert!(!params.has("note"));
    }

    #[test]
    fn keeps_insertion_order() {
        let params = params! { "b" => 1, "a" => 2, "c" => 3 };
        let names: Vec<&str> = params.names().collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn object_value_matches_name_and_capability() {
        let value = ObjectValue::new(Meter(3));
        assert!(value.satisfies("Meter"));
        assert!(value.satisfies("Length"));
        assert!(!value.satisfies("Interaction"));
        assert_eq!(value.downcast_ref::<Meter>(), Some(&Meter(3)));
        assert!(value.downcast_ref::<String>().is_none());
    }

    #[test]
    fn serializes_objects_by_type_name() {
        let params = params! { "meters" => 5, "unit" => ObjectValue::new(Meter(1)) };
        let v = serde_json::to_value(&params).unwrap();
        assert_eq!(v, json!({ "meters": 5, "unit": { "$object": "Meter" } }));
    }

    #[test]
    fn from_json_map() {
        let map = json!({ "email": "a@b.io", "age": 3 });
        let params = Parameters::from(map.as_object().cloned().unwrap());
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("email").and_then(Value::as_str), Some("a@b.io"));
    }
}
