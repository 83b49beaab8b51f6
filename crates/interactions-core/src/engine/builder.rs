//! EngineBuilder - Engine の構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - 開発体験の改善（明確なエラーメッセージ）

use std::sync::Arc;

use super::Engine;
use crate::config::InteractionConfig;
use crate::typed::Interaction;
use crate::validation::{MessageCatalog, Predicate, PredicateRegistry, Rules};

/// EngineBuilder は PredicateRegistry と MessageCatalog を組み立てる
///
/// # 使用例
/// ```ignore
/// let engine = Engine::builder()
///     .predicate("even", EvenPredicate)
///     .expect(&ConvertMetersToMiles)
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - expect() で使う予定の interaction のルールを登録
/// - build() 時に「参照されているカスタムルール ⊆ 登録済み predicate」をチェック
/// - 引数が壊れたルール（`min:abc` など）も検出
/// - strict でなければ warn ログだけ出して続行
pub struct EngineBuilder {
    predicates: PredicateRegistry,
    messages: MessageCatalog,
    expected: Vec<(&'static str, Rules)>,
    strict: bool,
}

/// BuildError は Engine 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Unknown rules: {0:?}. These rules are used but no predicate is registered.")]
    UnknownRules(Vec<String>),

    #[error("Malformed rules: {0:?}.")]
    MalformedRules(Vec<String>),
}

impl EngineBuilder {
    /// 組み込みの `object` predicate だけを持つ builder
    pub fn new() -> Self {
        Self {
            predicates: PredicateRegistry::with_defaults(),
            messages: MessageCatalog::new(),
            expected: Vec::new(),
            strict: true,
        }
    }

    /// カスタム predicate を登録（同名は置き換え）
    pub fn predicate<P: Predicate + 'static>(mut self, name: impl Into<String>, predicate: P) -> Self {
        self.predicates.register(name, predicate);
        self
    }

    /// メッセージの上書きを追加（後から追加したものが勝つ）
    pub fn messages(mut self, messages: MessageCatalog) -> Self {
        self.messages = self.messages.layered(&messages);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// 設定ファイルの内容を反映
    pub fn config(self, config: &InteractionConfig) -> Self {
        self.strict(config.strict).messages(config.message_catalog())
    }

    /// build() 時にルールを検査する interaction を追加
    pub fn expect<I: Interaction>(mut self, interaction: &I) -> Self {
        self.expected.push((I::NAME, interaction.validations()));
        self
    }

    /// Engine を構築
    ///
    /// # 検証
    /// - expect() された interaction のカスタムルールが全て登録済みか
    /// - 壊れたルールが無いか
    pub fn build(self) -> Result<Engine, BuildError> {
        let mut unknown = Vec::new();
        let mut malformed = Vec::new();
        for (name, rules) in &self.expected {
            unknown.extend(
                rules
                    .custom_names()
                    .filter(|(_, rule)| !self.predicates.contains(rule))
                    .map(|(field, rule)| format!("{name}.{field}: {rule}")),
            );
            malformed.extend(
                rules
                    .malformed()
                    .map(|(field, token, error)| format!("{name}.{field}: {token} ({error})")),
            );
        }

        if self.strict {
            if !unknown.is_empty() {
                return Err(BuildError::UnknownRules(unknown));
            }
            if !malformed.is_empty() {
                return Err(BuildError::MalformedRules(malformed));
            }
        } else {
            for rule in unknown.iter().chain(&malformed) {
                tracing::warn!(%rule, "rule will always fail validation");
            }
        }

        Ok(Engine {
            predicates: Arc::new(self.predicates),
            messages: Arc::new(self.messages),
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
