//! Typed - 型付き Interaction API
//!
//! # 二層構造
//! - **宣言**: `Interaction` trait（ルール + 実行本体）
//! - **束縛**: `Prepared<I>`（パラメータ + Validator を束ねた 1 回分のインスタンス）

pub mod interaction;
pub mod prepared;

pub use self::interaction::{Input, Interaction, Rejection};
pub use self::prepared::Prepared;
