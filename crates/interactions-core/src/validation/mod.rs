//! Validation - ルールベースのパラメータ検証
//!
//! # 構成
//! - **rule**: ルール式のパース（`"required|numeric|min:0"`）
//! - **predicate**: 名前付きカスタムルールの登録（`object:<Type>` など）
//! - **messages**: エラーメッセージのテンプレート
//! - **validator**: Parameters に対してルールを評価し ErrorBag を返す

pub mod messages;
pub mod predicate;
pub mod rule;
pub mod validator;

pub use self::messages::MessageCatalog;
pub use self::predicate::{ObjectPredicate, Predicate, PredicateRegistry, OBJECT_PREDICATE};
pub use self::rule::{Rule, RuleParseError, Rules};
pub use self::validator::Validator;
