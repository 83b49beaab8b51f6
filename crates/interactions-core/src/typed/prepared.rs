//! Prepared - パラメータとルールを束ねた interaction インスタンス
//!
//! 1 回の run ごとに作られ、Outcome を作ったら捨てられる。
//! 作成時に検証は行わない（Validator を組み立てるだけ）。

use std::sync::Arc;

use super::interaction::Interaction;
use crate::domain::ids::RunId;
use crate::domain::params::Parameters;
use crate::validation::{MessageCatalog, PredicateRegistry, Validator};

/// An interaction bound to its parameters and validator.
#[derive(Debug)]
pub struct Prepared<I> {
    run_id: RunId,
    interaction: I,
    validator: Validator,
}

impl<I: Interaction> Prepared<I> {
    pub fn new(
        interaction: I,
        params: Parameters,
        predicates: Arc<PredicateRegistry>,
        messages: Arc<MessageCatalog>,
    ) -> Self {
        let rules = interaction.validations();
        let overrides = interaction.messages();
        let messages = if overrides.is_empty() {
            messages
        } else {
            Arc::new(messages.layered(&overrides))
        };
        let validator = Validator::new(params, rules, predicates, messages);
        Self {
            run_id: RunId::generate(),
            interaction,
            validator,
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn interaction(&self) -> &I {
        &self.interaction
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn parameters(&self) -> &Parameters {
        self.validator.parameters()
    }

    pub(crate) fn into_parts(self) -> (RunId, I, Validator) {
        (self.run_id, self.interaction, self.validator)
    }
}
