//! End-to-end runs through the public API.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use rstest::rstest;
use serde_json::json;

use crate::params;
use crate::validation::OBJECT_PREDICATE;
use crate::{
    Engine, Input, Interaction, MessageCatalog, ObjectValue, ParamObject, Rejection, RunError, Rules,
};

const MILES_PER_METER: f64 = 0.000621371;

#[derive(Debug, Default)]
struct ConvertMetersToMiles;

impl Interaction for ConvertMetersToMiles {
    const NAME: &'static str = "ConvertMetersToMiles";
    type Output = f64;

    fn validations(&self) -> Rules {
        Rules::new()
            .field("meters", "required,numeric,min:0")
            .field("inception", "object:Interaction")
    }

    fn execute(&self, input: &Input<'_>) -> Result<f64, Rejection> {
        if input.i64("meters") == Some(1) {
            return Err(Rejection::invalid("meters", "too small"));
        }
        Ok(input.f64("meters").unwrap_or_default() * MILES_PER_METER)
    }
}

#[derive(Default)]
struct CheckEmail;

impl Interaction for CheckEmail {
    const NAME: &'static str = "CheckEmail";
    type Output = String;

    fn validations(&self) -> Rules {
        Rules::new().field("email", "required|email")
    }

    fn execute(&self, input: &Input<'_>) -> Result<String, Rejection> {
        Ok(input.str("email").unwrap_or_default().to_string())
    }
}

/// Counts `execute` calls; optionally returns nothing.
#[derive(Default)]
struct Counting {
    calls: Arc<AtomicU32>,
}

impl Interaction for Counting {
    const NAME: &'static str = "Counting";
    type Output = Option<String>;

    fn validations(&self) -> Rules {
        Rules::new().field("n", "required|integer|min:1")
    }

    fn execute(&self, input: &Input<'_>) -> Result<Option<String>, Rejection> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(input.str("unit").map(str::to_string))
    }
}

struct Plain;

impl ParamObject for Plain {
    const TYPE_NAME: &'static str = "Plain";
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[test]
fn valid_input() {
    let outcome = ConvertMetersToMiles::run(params! { "meters" => 10000 }).unwrap();

    assert!(outcome.is_valid());
    assert!(outcome.errors().is_empty());
    assert_eq!(outcome.result().copied().map(round2), Some(6.21));
    assert_eq!(outcome.parameters().len(), 1);
}

#[test]
fn invalid_input() {
    let outcome = ConvertMetersToMiles::run(params! { "meters" => "ten thousand" }).unwrap();

    assert!(!outcome.is_valid());
    assert!(outcome.result().is_none());
    assert_eq!(outcome.errors().get("meters"), ["must be numeric"]);
}

#[test]
fn custom_error_from_execute() {
    let outcome = ConvertMetersToMiles::run(params! { "meters" => 1 }).unwrap();

    assert!(!outcome.is_valid());
    assert!(outcome.result().is_none());
    assert_eq!(outcome.errors().get("meters"), ["too small"]);
}

#[test]
fn valid_object_validation() {
    let outcome = ConvertMetersToMiles::run(params! {
        "meters" => 10000,
        "inception" => ObjectValue::interaction(ConvertMetersToMiles),
    })
    .unwrap();

    assert!(outcome.is_valid());
    assert!(outcome.errors().is_empty());
    assert_eq!(outcome.result().copied().map(round2), Some(6.21));
}

#[rstest]
#[case::foreign_object(ObjectValue::new(Plain).into())]
#[case::json_map(json!({ "meters": 1 }).into())]
#[case::string("ConvertMetersToMiles".into())]
fn invalid_object_validation(#[case] inception: crate::Value) {
    let outcome = ConvertMetersToMiles::run(params! {
        "meters" => 10000,
        "inception" => inception,
    })
    .unwrap();

    assert!(!outcome.is_valid());
    assert!(outcome.result().is_none());
    assert_eq!(
        outcome.errors().get("inception"),
        ["the inception object type is invalid."]
    );
}

#[test]
fn email_domain_example() {
    let outcome = CheckEmail::run(params! { "email" => "invalid email" }).unwrap();

    assert!(!outcome.is_valid());
    assert!(outcome.result().is_none());
    assert_eq!(outcome.errors().get("email"), ["must be a valid email address"]);

    let outcome = CheckEmail::run(params! { "email" => "zach@example.com" }).unwrap();
    assert_eq!(outcome.result().map(String::as_str), Some("zach@example.com"));
}

#[rstest]
#[case(0.0)]
#[case(1609.344)]
#[case(42_000.0)]
fn result_matches_execute_for_passing_input(#[case] meters: f64) {
    let outcome = ConvertMetersToMiles::run(params! { "meters" => meters }).unwrap();
    assert!(outcome.is_valid());
    assert_eq!(outcome.into_result(), Some(meters * MILES_PER_METER));
}

#[rstest]
#[case::missing(params! {})]
#[case::not_integer(params! { "n" => "many" })]
#[case::too_small(params! { "n" => 0 })]
fn execute_is_skipped_when_rules_fail(#[case] params: crate::Parameters) {
    let calls = Arc::new(AtomicU32::new(0));
    let interaction = Counting {
        calls: Arc::clone(&calls),
    };

    let outcome = Engine::default().run(interaction, params).unwrap();

    assert!(!outcome.is_valid());
    assert!(outcome.result().is_none());
    assert_eq!(calls.load(Ordering::Relaxed), 0);
}

#[test]
fn absent_output_is_still_success() {
    let calls = Arc::new(AtomicU32::new(0));
    let interaction = Counting {
        calls: Arc::clone(&calls),
    };

    let outcome = Engine::default().run(interaction, params! { "n" => 3 }).unwrap();

    assert!(outcome.is_valid());
    assert_eq!(outcome.result(), Some(&None));
    assert_eq!(calls.load(Ordering::Relaxed), 1);
}

#[test]
fn dangerous_returns_raw_result() {
    let miles = ConvertMetersToMiles::run_dangerous(params! { "meters" => 10000 }).unwrap();
    assert_eq!(round2(miles), 6.21);
}

#[rstest]
#[case::declarative(params! { "meters" => "ten thousand" }, "must be numeric")]
#[case::post_hoc(params! { "meters" => 1 }, "too small")]
fn dangerous_throws_validation_error(#[case] params: crate::Parameters, #[case] message: &str) {
    let err = match ConvertMetersToMiles::run_dangerous(params).unwrap_err() {
        RunError::Validation(err) => err,
        other => panic!("expected a validation error, got {other}"),
    };
    assert_eq!(err.interaction(), "ConvertMetersToMiles");
    assert_eq!(err.errors().get("meters"), [message]);
}

#[test]
fn dangerous_error_carries_every_field() {
    let err = ConvertMetersToMiles::run_dangerous(params! {
        "meters" => "far",
        "inception" => "me",
    })
    .unwrap_err();
    let errors = err.validation_errors().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors.has("meters"));
    assert!(errors.has("inception"));
}

#[test]
fn registering_object_predicate_twice_changes_nothing() {
    let engine = Engine::builder()
        .predicate(OBJECT_PREDICATE, crate::validation::ObjectPredicate)
        .predicate(OBJECT_PREDICATE, crate::validation::ObjectPredicate)
        .expect(&ConvertMetersToMiles)
        .build()
        .unwrap();
    assert_eq!(engine.predicates().names(), vec![OBJECT_PREDICATE.to_string()]);

    let params = params! { "meters" => 5, "inception" => ObjectValue::new(Plain) };
    let twice = engine.run(ConvertMetersToMiles, params.clone()).unwrap();
    let once = Engine::default().run(ConvertMetersToMiles, params).unwrap();
    assert_eq!(twice.errors(), once.errors());
}

#[test]
fn engine_messages_can_be_overridden() {
    let engine = Engine::builder()
        .messages(MessageCatalog::new().with("meters.numeric", "meters must be a number"))
        .build()
        .unwrap();
    let outcome = engine
        .run(ConvertMetersToMiles, params! { "meters" => "ten thousand" })
        .unwrap();
    assert_eq!(outcome.errors().get("meters"), ["meters must be a number"]);
}
