//! interactions-core
//!
//! Validated command objects ("interactions") with a uniform outcome.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（params, errors, outcome, ids）
//! - **validation**: ルールベースの検証（rule, predicate, messages, validator）
//! - **typed**: 型付き Interaction API（Interaction trait, Input, Rejection, Prepared）
//! - **engine**: 実行の入口（Engine, EngineBuilder, グローバルインスタンス）
//! - **config**: TOML 設定（strict, メッセージ上書き）
//! - **error**: 公開エラー型（ValidationError, ExecutionFailure, RunError）
//!
//! # 実行の流れ
//! 1. `Engine::prepare` がパラメータとルールから Validator を組み立てる
//! 2. `Outcome::from_prepared` が検証 → 通れば `execute` を 1 回だけ呼ぶ
//! 3. `execute` が `Rejection::Invalid` を返したら結果は捨てて invalid にする
//! 4. dangerous モードでは invalid な Outcome を `ValidationError` に変換する

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod typed;
pub mod validation;

#[cfg(test)]
mod scenarios;

pub use crate::config::{ConfigError, InteractionConfig};
pub use crate::domain::{ErrorBag, ObjectValue, Outcome, ParamObject, Parameters, RunId, Value};
pub use crate::engine::{BuildError, Engine, EngineBuilder};
pub use crate::error::{ExecutionFailure, RunError, ValidationError};
pub use crate::typed::{Input, Interaction, Prepared, Rejection};
pub use crate::validation::{MessageCatalog, Predicate, PredicateRegistry, Rule, Rules, Validator};
