//! Interaction trait - 検証ルールと実行本体を宣言する
//!
//! # 学習ポイント
//! - Associated Constants (`const NAME`)
//! - Associated Types (`type Output`)
//! - `Self: Default` を要求するデフォルトメソッド（`run`）
//! - blanket `From` impl で `?` をそのまま使えるエラー型（`Rejection`）

use std::any::Any;
use std::error::Error as StdError;

use crate::domain::errors::ErrorBag;
use crate::domain::outcome::Outcome;
use crate::domain::params::{Parameters, Value};
use crate::engine::Engine;
use crate::error::{ExecutionFailure, RunError};
use crate::validation::{MessageCatalog, Rules};

/// Interaction は「入力検証 + 1 回の実行」をまとめたコマンドオブジェクト
///
/// # 使用例
/// ```ignore
/// #[derive(Default)]
/// struct ConvertMetersToMiles;
///
/// impl Interaction for ConvertMetersToMiles {
///     const NAME: &'static str = "ConvertMetersToMiles";
///     type Output = f64;
///
///     fn validations(&self) -> Rules {
///         Rules::new().field("meters", "required|numeric|min:0")
///     }
///
///     fn execute(&self, input: &Input<'_>) -> Result<f64, Rejection> {
///         Ok(input.f64("meters").unwrap_or_default() * 0.000621371)
///     }
/// }
///
/// let outcome = ConvertMetersToMiles::run(params! { "meters" => 10000 })?;
/// ```
pub trait Interaction {
    /// 型タグ。`object:<NAME>` で参照できる
    const NAME: &'static str;

    type Output;

    /// パラメータの検証ルール
    fn validations(&self) -> Rules;

    /// この interaction だけに適用するメッセージの上書き
    fn messages(&self) -> MessageCatalog {
        MessageCatalog::new()
    }

    /// 検証を通過したときに 1 回だけ呼ばれる
    fn execute(&self, input: &Input<'_>) -> Result<Self::Output, Rejection>;

    /// Runs against the global [`Engine`]. Validation failures are reported
    /// through the returned [`Outcome`], never as `Err`.
    fn run(params: impl Into<Parameters>) -> Result<Outcome<Self::Output>, ExecutionFailure>
    where
        Self: Sized + Default,
    {
        Engine::global().run(Self::default(), params)
    }

    /// Returns the raw output, or a [`RunError::Validation`] carrying every
    /// field error.
    fn run_dangerous(params: impl Into<Parameters>) -> Result<Self::Output, RunError>
    where
        Self: Sized + Default,
    {
        Engine::global().run_dangerous(Self::default(), params)
    }
}

/// Read-only view of the validated parameters inside `execute`.
///
/// Undeclared or unset keys read as `None`.
#[derive(Debug, Clone, Copy)]
pub struct Input<'a> {
    params: &'a Parameters,
}

impl<'a> Input<'a> {
    pub fn new(params: &'a Parameters) -> Self {
        Self { params }
    }

    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.params.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.params.has(name)
    }

    /// Numbers and numeric strings.
    pub fn f64(&self, name: &str) -> Option<f64> {
        let value = self.get(name)?;
        value
            .as_f64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
    }

    /// Integers and integer strings.
    pub fn i64(&self, name: &str) -> Option<i64> {
        let value = self.get(name)?;
        value
            .as_i64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
    }

    pub fn str(&self, name: &str) -> Option<&'a str> {
        self.get(name)?.as_str()
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name)?.as_bool()
    }

    pub fn object<T: Any>(&self, name: &str) -> Option<&'a T> {
        self.get(name)?.as_object()?.downcast_ref::<T>()
    }

    pub fn parameters(&self) -> &'a Parameters {
        self.params
    }
}

/// Why `execute` did not produce an output.
///
/// - `Invalid`: a business rule failed after the declarative rules passed;
///   the messages are merged into the outcome's errors.
/// - `Fault`: an unexpected failure; it is returned to the caller of `run`
///   as [`ExecutionFailure`] and never folded into the outcome.
///
/// Any `std::error::Error` converts into `Fault`, so `?` works inside
/// `execute`.
#[derive(Debug)]
pub enum Rejection {
    Invalid(ErrorBag),
    Fault(Box<dyn StdError + Send + Sync>),
}

impl Rejection {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Rejection::Invalid(ErrorBag::single(field, message))
    }

    pub fn fault(error: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Rejection::Fault(error.into())
    }
}

impl From<ErrorBag> for Rejection {
    fn from(errors: ErrorBag) -> Self {
        Rejection::Invalid(errors)
    }
}

impl<E: StdError + Send + Sync + 'static> From<E> for Rejection {
    fn from(error: E) -> Self {
        Rejection::Fault(Box::new(error))
    }
}
