//! `interactions demo <meters>` - meters → miles through the engine

use std::path::Path;

use interactions_core::{
    Engine, Input, Interaction, InteractionConfig, Rejection, Rules, Value, params,
};

const MILES_PER_METER: f64 = 0.000621371;

#[derive(Debug, Default)]
pub struct ConvertMetersToMiles;

impl Interaction for ConvertMetersToMiles {
    const NAME: &'static str = "ConvertMetersToMiles";
    type Output = f64;

    fn validations(&self) -> Rules {
        Rules::new().field("meters", "required|numeric|min:0")
    }

    fn execute(&self, input: &Input<'_>) -> Result<f64, Rejection> {
        let meters = input.f64("meters").unwrap_or_default();
        if meters > 0.0 && meters < 1.0 {
            return Err(Rejection::invalid("meters", "is too small to convert"));
        }
        Ok(meters * MILES_PER_METER)
    }
}

pub fn run(
    meters: &str,
    dangerous: bool,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = engine(config)?;
    let params = params! { "meters" => parse_arg(meters) };

    if dangerous {
        let miles = engine.run_dangerous(ConvertMetersToMiles, params)?;
        println!("{miles}");
    } else {
        let outcome = engine.run(ConvertMetersToMiles, params)?;
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }
    Ok(())
}

fn engine(config: Option<&Path>) -> Result<Engine, Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => InteractionConfig::load(path)?,
        None => InteractionConfig::default(),
    };
    Ok(Engine::builder()
        .config(&config)
        .expect(&ConvertMetersToMiles)
        .build()?)
}

/// JSON literals stay typed (`10`, `null`, `[1]`); anything else is a string.
fn parse_arg(raw: &str) -> Value {
    serde_json::from_str::<serde_json::Value>(raw)
        .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
        .into()
}
