//! PredicateRegistry - 名前付きカスタムルールの登録と管理
//!
//! # 学習ポイント
//! - HashMap での型消去された trait object の管理
//! - クロージャへの blanket impl
//! - Arc による共有所有権
//!
//! 登録は冪等: 同じ名前で 2 回登録してもエラーにならず、後勝ちで置き換える。

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::domain::params::{Parameters, Value};

/// Name of the built-in object-type predicate.
pub const OBJECT_PREDICATE: &str = "object";

/// Predicate は `name:arg1,arg2` 形式のカスタムルールを評価する
///
/// # 使用例
/// ```ignore
/// registry.register("even", |_field: &str, value: &Value, _args: &[String], _params: &Parameters| {
///     value.as_i64().is_some_and(|n| n % 2 == 0)
/// });
/// ```
pub trait Predicate: Send + Sync {
    fn check(&self, field: &str, value: &Value, args: &[String], params: &Parameters) -> bool;
}

impl<F> Predicate for F
where
    F: Fn(&str, &Value, &[String], &Parameters) -> bool + Send + Sync,
{
    fn check(&self, field: &str, value: &Value, args: &[String], params: &Parameters) -> bool {
        self(field, value, args, params)
    }
}

/// `object:<Type>`: the value must be an object satisfying `<Type>`.
///
/// Fails closed for plain JSON values and for a missing argument.
pub struct ObjectPredicate;

impl Predicate for ObjectPredicate {
    fn check(&self, _field: &str, value: &Value, args: &[String], _params: &Parameters) -> bool {
        match (value.as_object(), args.first()) {
            (Some(object), Some(tag)) => object.satisfies(tag),
            _ => false,
        }
    }
}

#[derive(Clone, Default)]
pub struct PredicateRegistry {
    predicates: HashMap<String, Arc<dyn Predicate>>,
}

impl PredicateRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `object` predicate.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(OBJECT_PREDICATE, ObjectPredicate);
        registry
    }

    /// Registers `predicate` under `name`, replacing any previous one.
    pub fn register<P: Predicate + 'static>(&mut self, name: impl Into<String>, predicate: P) {
        let name = name.into();
        if self
            .predicates
            .insert(name.clone(), Arc::new(predicate))
            .is_some()
        {
            tracing::debug!(predicate = %name, "replaced validation predicate");
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Predicate>> {
        self.predicates.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    /// Sorted predicate names.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.predicates.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for PredicateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateRegistry")
            .field("predicates", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::params::{ObjectValue, ParamObject};

    struct Account;

    impl ParamObject for Account {
        const TYPE_NAME: &'static str = "Account";
    }

    fn even(_field: &str, value: &Value, _args: &[String], _params: &Parameters) -> bool {
        value.as_i64().is_some_and(|n| n % 2 == 0)
    }

    #[test]
    fn defaults_contain_object() {
        let registry = PredicateRegistry::with_defaults();
        assert!(registry.contains(OBJECT_PREDICATE));
        assert_eq!(registry.names(), vec!["object".to_string()]);
    }

    #[test]
    fn register_and_get() {
        let mut registry = PredicateRegistry::new();
        registry.register("even", even);

        let predicate = registry.get("even").unwrap();
        let params = Parameters::new();
        assert!(predicate.check("n", &Value::from(4), &[], &params));
        assert!(!predicate.check("n", &Value::from(3), &[], &params));
    }

    #[test]
    fn double_registration_is_idempotent() {
        let mut registry = PredicateRegistry::with_defaults();
        registry.register(OBJECT_PREDICATE, ObjectPredicate);
        registry.register(OBJECT_PREDICATE, ObjectPredicate);
        assert_eq!(registry.names().len(), 1);

        let value = Value::from(ObjectValue::new(Account));
        let args = vec!["Account".to_string()];
        let predicate = registry.get(OBJECT_PREDICATE).unwrap();
        assert!(predicate.check("owner", &value, &args, &Parameters::new()));
    }

    #[test]
    fn object_predicate_fails_closed() {
        let params = Parameters::new();
        let account = Value::from(ObjectValue::new(Account));
        let args = vec!["Interaction".to_string()];

        assert!(!ObjectPredicate.check("owner", &account, &args, &params));
        assert!(!ObjectPredicate.check("owner", &Value::from("Account"), &args, &params));
        assert!(!ObjectPredicate.check("owner", &account, &[], &params));
    }
}
