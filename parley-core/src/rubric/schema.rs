//! JSON Schema descriptor for the evaluation payload.
//!
//! The schema handed to the model is generated from the rubric types and
//! compiled once; [`validate`](super::validate) checks payloads against that
//! compiled form, so the model is held to exactly the schema it was given.

use std::sync::LazyLock;

use jsonschema::{Draft, Validator};
use parley_models::providers::SchemaDescriptor;
use schemars::generate::SchemaSettings;
use serde_json::Value;

use super::evaluation::SpeakingEvaluation;

/// Name the schema is published under.
pub const SCHEMA_NAME: &str = "SpeakingEvaluation";

static SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    // Structured-output backends resolve `$ref` poorly, so inline everything.
    SchemaSettings::draft2020_12()
        .with(|s| s.inline_subschemas = true)
        .into_generator()
        .into_root_schema_for::<SpeakingEvaluation>()
        .to_value()
});

static VALIDATOR: LazyLock<Result<Validator, String>> = LazyLock::new(|| {
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(evaluation_schema())
        .map_err(|e| e.to_string())
});

/// The evaluation schema compiled for validation.
pub(crate) fn compiled_validator() -> Result<&'static Validator, &'static str> {
    VALIDATOR.as_ref().map_err(String::as_str)
}

/// The raw JSON Schema of [`SpeakingEvaluation`].
#[must_use]
pub fn evaluation_schema() -> &'static Value {
    &SCHEMA
}

/// Descriptor sent alongside every evaluation request.
#[must_use]
pub fn schema_descriptor() -> SchemaDescriptor {
    SchemaDescriptor::new(SCHEMA_NAME, SCHEMA.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_requires_core_criteria() {
        let schema = evaluation_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();

        for key in [
            "vocab",
            "grammar",
            "fluency",
            "coherence",
            "interaction",
            "pronunciation",
            "overall_level",
            "overall_summary",
        ] {
            assert!(required.contains(&key), "{key} should be required");
        }
        assert!(!required.contains(&"task"));
        assert!(!required.contains(&"target_level"));
        assert_eq!(schema["additionalProperties"], Value::Bool(false));
    }

    #[test]
    fn subschemas_are_inlined() {
        let schema = evaluation_schema();
        let accuracy = &schema["properties"]["grammar"]["properties"]["accuracy"];
        assert_eq!(accuracy["properties"]["score"]["maximum"], 5);
        assert_eq!(accuracy["properties"]["score"]["minimum"], 0);
        assert!(!schema.to_string().contains("$ref"));
    }

    #[test]
    fn levels_are_enumerated() {
        let schema = evaluation_schema();
        let levels = &schema["properties"]["overall_level"]["enum"];
        assert_eq!(
            levels,
            &serde_json::json!(["A1", "A2", "B1", "B2", "C1", "C2"])
        );
    }

    #[test]
    fn schema_compiles() {
        assert!(compiled_validator().is_ok());
    }

    #[test]
    fn optional_fields_are_nullable() {
        let schema = evaluation_schema();
        let task = &schema["properties"]["task"];
        assert_eq!(task["type"], serde_json::json!(["object", "null"]));
        assert!(
            schema["properties"]["target_level"]["enum"]
                .as_array()
                .unwrap()
                .contains(&Value::Null)
        );
    }

    #[test]
    fn evidence_is_an_optional_array() {
        let schema = evaluation_schema();
        let fluency = &schema["properties"]["fluency"]["properties"]["fluency"];
        assert_eq!(fluency["properties"]["evidence"]["type"], "array");
        let required = fluency["required"].as_array().unwrap();
        assert!(!required.contains(&Value::from("evidence")));
    }

    #[test]
    fn descriptor_carries_name() {
        let descriptor = schema_descriptor();
        assert_eq!(descriptor.name, SCHEMA_NAME);
        assert_eq!(&descriptor.schema, evaluation_schema());
    }
}
