//! Engine - interaction を実行する入口
//!
//! PredicateRegistry と MessageCatalog を明示的に保持し、Validator に渡す
//! （グローバルな可変状態は持たない）。
//!
//! `Engine::global()` は利便性のためのプロセス共通インスタンスで、
//! 起動時に一度だけ `Engine::install()` で差し替えられる。以後は読み取り専用。

pub mod builder;

use std::sync::Arc;

use once_cell::sync::OnceCell;

pub use self::builder::{BuildError, EngineBuilder};
use crate::domain::{Outcome, Parameters};
use crate::error::{ExecutionFailure, RunError};
use crate::typed::{Interaction, Prepared};
use crate::validation::{MessageCatalog, PredicateRegistry};

static GLOBAL: OnceCell<Engine> = OnceCell::new();

#[derive(Debug, Clone)]
pub struct Engine {
    predicates: Arc<PredicateRegistry>,
    messages: Arc<MessageCatalog>,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Process-wide engine; defaults unless [`Engine::install`] ran first.
    pub fn global() -> &'static Engine {
        GLOBAL.get_or_init(Engine::default)
    }

    /// Sets the global engine. Only the first call wins; later calls get the
    /// engine back.
    pub fn install(engine: Engine) -> Result<(), Engine> {
        GLOBAL.set(engine).inspect_err(|_| {
            tracing::warn!("global engine already initialised, ignoring install");
        })
    }

    pub fn predicates(&self) -> &PredicateRegistry {
        &self.predicates
    }

    pub fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    /// Binds parameters and rules; never validates.
    pub fn prepare<I: Interaction>(&self, interaction: I, params: impl Into<Parameters>) -> Prepared<I> {
        Prepared::new(
            interaction,
            params.into(),
            Arc::clone(&self.predicates),
            Arc::clone(&self.messages),
        )
    }

    pub fn run<I: Interaction>(
        &self,
        interaction: I,
        params: impl Into<Parameters>,
    ) -> Result<Outcome<I::Output>, ExecutionFailure> {
        Outcome::from_prepared(self.prepare(interaction, params))
    }

    pub fn run_dangerous<I: Interaction>(
        &self,
        interaction: I,
        params: impl Into<Parameters>,
    ) -> Result<I::Output, RunError> {
        let outcome = self.run(interaction, params)?;
        Ok(outcome.into_value()?)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            predicates: Arc::new(PredicateRegistry::with_defaults()),
            messages: Arc::new(MessageCatalog::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorBag;
    use crate::params;
    use crate::typed::{Input, Rejection};
    use crate::validation::Rules;

    #[derive(Default)]
    struct Greet;

    impl Interaction for Greet {
        const NAME: &'static str = "Greet";
        type Output = String;

        fn validations(&self) -> Rules {
            Rules::new().field("name", "required|string|max:10")
        }

        fn messages(&self) -> MessageCatalog {
            MessageCatalog::new().with("name.required", "tell us your name")
        }

        fn execute(&self, input: &Input<'_>) -> Result<String, Rejection> {
            match input.str("name") {
                Some("root") => Err(ErrorBag::single("name", "is reserved").into()),
                Some(name) => Ok(format!("hello, {name}")),
                None => Ok(String::new()),
            }
        }
    }

    #[test]
    fn run_returns_outcome_for_failures() {
        let outcome = Engine::default().run(Greet, params! {}).unwrap();
        assert!(!outcome.is_valid());
        assert_eq!(outcome.errors().get("name"), ["tell us your name"]);
    }

    #[test]
    fn engine_messages_sit_below_interaction_messages() {
        let engine = Engine::builder()
            .messages(MessageCatalog::new().with("required", "engine says required").with("string", "engine says string"))
            .build()
            .unwrap();

        let outcome = engine.run(Greet, params! {}).unwrap();
        assert_eq!(outcome.errors().get("name"), ["tell us your name"]);

        let outcome = engine.run(Greet, params! { "name" => 7 }).unwrap();
        assert_eq!(outcome.errors().get("name"), ["engine says string"]);
    }

    #[test]
    fn dangerous_run_unwraps_or_fails() {
        let engine = Engine::default();
        assert_eq!(
            engine.run_dangerous(Greet, params! { "name" => "ada" }).unwrap(),
            "hello, ada"
        );

        let err = engine
            .run_dangerous(Greet, params! { "name" => "root" })
            .unwrap_err();
        assert_eq!(
            err.validation_errors().map(|e| e.get("name").to_vec()),
            Some(vec!["is reserved".to_string()])
        );
    }

    #[test]
    fn global_engine_is_installed_once() {
        let first = Engine::global() as *const Engine;
        assert!(Engine::install(Engine::default()).is_err());
        assert_eq!(first, Engine::global() as *const Engine);
    }
}
