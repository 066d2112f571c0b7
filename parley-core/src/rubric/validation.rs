//! Payload validation against the rubric.
//!
//! The published JSON Schema is compiled once and every violation it reports
//! becomes a [`FieldIssue`] tagged with the dotted path of the offending
//! field. Two rules JSON Schema cannot state are checked over the same
//! schema afterwards: required strings must not be blank, and integers must
//! not be written as floats. Nothing is coerced.

use std::collections::BTreeMap;
use std::fmt;

use jsonschema::error::ValidationErrorKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::evaluation::SpeakingEvaluation;
use super::schema::{compiled_validator, evaluation_schema};

/// Highest rubric band a subscore may carry.
pub const MAX_SCORE: u8 = 5;

/// Location of a field inside a payload, e.g. `grammar.accuracy.evidence[0].excerpt`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    /// The payload root.
    #[must_use]
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Path of a named child field.
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        if self.0.is_empty() {
            Self(key.to_string())
        } else {
            Self(format!("{}.{}", self.0, key))
        }
    }

    /// Path of an array element.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{}]", self.0, index))
    }

    /// Whether this is the payload root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The dotted path; empty at the root.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// What is wrong with a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Problem {
    /// A required field is absent.
    Missing,
    /// The field has the wrong JSON type.
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    /// A score outside `0..=5`.
    ScoreOutOfRange { value: String },
    /// A string that is not one of the six CEFR labels.
    UnknownLevel { value: String },
    /// A required string is empty or whitespace.
    Empty,
    /// A field the rubric does not define.
    UnknownField,
    /// Any other schema constraint.
    Constraint { message: String },
    /// The payload text is not JSON at all.
    Malformed { message: String },
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::Missing => f.write_str("required field is missing"),
            Problem::WrongType { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Problem::ScoreOutOfRange { value } => {
                write!(f, "score {value} is outside 0..={MAX_SCORE}")
            }
            Problem::UnknownLevel { value } => {
                write!(f, "{value:?} is not a CEFR level (A1, A2, B1, B2, C1, C2)")
            }
            Problem::Empty => f.write_str("must not be empty"),
            Problem::UnknownField => f.write_str("field is not part of the rubric"),
            Problem::Constraint { message } => f.write_str(message),
            Problem::Malformed { message } => write!(f, "malformed JSON: {message}"),
        }
    }
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub path: FieldPath,
    pub problem: Problem,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.problem)
    }
}

/// A payload did not conform to the rubric schema.
///
/// Carries every issue found, one per field, ordered by path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("payload failed rubric validation ({} issue(s)): {}", .issues.len(), render(.issues))]
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

fn render(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    fn at_root(problem: Problem) -> Self {
        Self {
            issues: vec![FieldIssue {
                path: FieldPath::root(),
                problem,
            }],
        }
    }

    /// A payload that could not be parsed as JSON.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::at_root(Problem::Malformed {
            message: message.into(),
        })
    }

    /// All issues, ordered by path.
    #[must_use]
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Whether any issue names exactly `path`.
    #[must_use]
    pub fn mentions(&self, path: &str) -> bool {
        self.problem_at(path).is_some()
    }

    /// The problem reported for exactly `path`.
    #[must_use]
    pub fn problem_at(&self, path: &str) -> Option<&Problem> {
        self.issues
            .iter()
            .find(|i| i.path.as_str() == path)
            .map(|i| &i.problem)
    }

    /// Whether the payload was not JSON at all.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        self.issues
            .iter()
            .any(|i| matches!(i.problem, Problem::Malformed { .. }))
    }
}

/// Validate a structured payload and build the typed evaluation.
///
/// # Errors
///
/// Returns a [`ValidationError`] listing every missing, mistyped,
/// out-of-range, empty or unknown field.
pub fn validate(value: &Value) -> Result<SpeakingEvaluation, ValidationError> {
    let validator =
        compiled_validator().map_err(|message| ValidationError::at_root(Problem::Constraint {
            message: format!("rubric schema is unusable: {message}"),
        }))?;

    let mut issues = Issues::default();
    for error in validator.iter_errors(value) {
        let (path, instance) = locate(value, &error.instance_path().to_string());
        for (path, problem) in classify(error.kind(), path, instance) {
            issues.push(path, problem);
        }
    }
    check_strictness(evaluation_schema(), value, &FieldPath::root(), &mut issues);

    if !issues.is_empty() {
        return Err(issues.into_error());
    }

    SpeakingEvaluation::deserialize(value).map_err(|e| {
        ValidationError::at_root(Problem::Constraint {
            message: e.to_string(),
        })
    })
}

/// Parse `text` as JSON, then [`validate`] it.
///
/// # Errors
///
/// A syntax error (including truncated output) yields a single
/// [`Problem::Malformed`] issue at the root.
pub fn validate_json(text: &str) -> Result<SpeakingEvaluation, ValidationError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ValidationError::malformed(e.to_string()))?;
    validate(&value)
}

/// Issues keyed by path; the first problem reported for a path wins.
#[derive(Default)]
struct Issues(BTreeMap<FieldPath, Problem>);

impl Issues {
    fn push(&mut self, path: FieldPath, problem: Problem) {
        self.0.entry(path).or_insert(problem);
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_error(self) -> ValidationError {
        ValidationError {
            issues: self
                .0
                .into_iter()
                .map(|(path, problem)| FieldIssue { path, problem })
                .collect(),
        }
    }
}

/// Follow a JSON pointer through `root`, building the dotted path as it goes.
fn locate<'v>(root: &'v Value, pointer: &str) -> (FieldPath, Option<&'v Value>) {
    let mut path = FieldPath::root();
    let mut current = Some(root);
    for token in pointer.split('/').skip(1) {
        let token = token.replace("~1", "/").replace("~0", "~");
        match current {
            Some(Value::Array(items)) => {
                let index = token.parse::<usize>().ok();
                current = index.and_then(|i| items.get(i));
                path = match index {
                    Some(i) => path.index(i),
                    None => path.key(&token),
                };
            }
            Some(Value::Object(map)) => {
                current = map.get(&token);
                path = path.key(&token);
            }
            _ => {
                current = None;
                path = path.key(&token);
            }
        }
    }
    (path, current)
}

/// The schema node describing the field at `path`, if the schema has one.
fn schema_at<'s>(schema: &'s Value, path: &str) -> Option<&'s Value> {
    let mut node = schema;
    for segment in path.split(['.', '[']).filter(|s| !s.is_empty()) {
        node = if segment.ends_with(']') {
            node.get("items")?
        } else {
            node.get("properties")?.get(segment)?
        };
    }
    Some(node)
}

/// Turn one schema violation into issues on specific fields.
fn classify(
    kind: &ValidationErrorKind,
    path: FieldPath,
    instance: Option<&Value>,
) -> Vec<(FieldPath, Problem)> {
    let found = instance.map_or("nothing", json_type);
    match kind {
        ValidationErrorKind::Required { property } => {
            let key = property.as_str().map_or_else(|| property.to_string(), str::to_string);
            vec![(path.key(&key), Problem::Missing)]
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => unexpected
            .iter()
            .map(|key| (path.key(key), Problem::UnknownField))
            .collect(),
        ValidationErrorKind::Enum { .. } => match instance {
            Some(Value::String(label)) => {
                let problem = Problem::UnknownLevel {
                    value: label.clone(),
                };
                vec![(path, problem)]
            }
            _ => {
                let expected = expected_type(&path);
                vec![(path, Problem::WrongType { expected, found })]
            }
        },
        ValidationErrorKind::Type { .. } => {
            let expected = expected_type(&path);
            vec![(path, Problem::WrongType { expected, found })]
        }
        ValidationErrorKind::Minimum { .. } | ValidationErrorKind::Maximum { .. } => {
            let value = instance.map_or_else(String::new, Value::to_string);
            vec![(path, Problem::ScoreOutOfRange { value })]
        }
        ValidationErrorKind::MinLength { .. } => vec![(path, Problem::Empty)],
        other => {
            let message = format!("{other:?}");
            vec![(path, Problem::Constraint { message })]
        }
    }
}

/// Rules the schema implies but JSON Schema does not enforce.
///
/// A `minLength` string must contain more than whitespace, and an `integer`
/// slot must hold an integer literal rather than `3.0`.
fn check_strictness(schema: &Value, value: &Value, path: &FieldPath, issues: &mut Issues) {
    match value {
        Value::String(text) if schema.get("minLength").is_some() && text.trim().is_empty() => {
            issues.push(path.clone(), Problem::Empty);
        }
        Value::Number(number) if number.is_f64() && allows_type(schema, "integer") => {
            issues.push(
                path.clone(),
                Problem::WrongType {
                    expected: "integer",
                    found: "number",
                },
            );
        }
        Value::Object(map) => {
            let Some(properties) = schema.get("properties") else {
                return;
            };
            for (key, child) in map {
                if let Some(child_schema) = properties.get(key) {
                    check_strictness(child_schema, child, &path.key(key), issues);
                }
            }
        }
        Value::Array(items) => {
            let Some(item_schema) = schema.get("items") else {
                return;
            };
            for (i, item) in items.iter().enumerate() {
                check_strictness(item_schema, item, &path.index(i), issues);
            }
        }
        _ => {}
    }
}

fn allows_type(schema: &Value, name: &str) -> bool {
    match schema.get("type") {
        Some(Value::String(t)) => t == name,
        Some(Value::Array(types)) => types.iter().any(|t| t == name),
        _ => false,
    }
}

fn expected_type(path: &FieldPath) -> &'static str {
    let declared = schema_at(evaluation_schema(), path.as_str()).and_then(|s| s.get("type"));
    let name = match declared {
        Some(Value::String(t)) => Some(t.as_str()),
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).find(|t| *t != "null"),
        _ => None,
    };
    match name {
        Some("object") => "object",
        Some("array") => "array",
        Some("string") => "string",
        Some("integer") => "integer",
        Some("number") => "number",
        Some("boolean") => "boolean",
        _ => "value",
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
