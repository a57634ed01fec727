// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Declarative field schemas for JSON request bodies.
//!
//! ```rust,ignore
//! let schema = Schema::new([
//!     Field::string("email").email(),
//!     Field::string("password").min_length(8),
//! ]);
//!
//! let normalized = schema.validate(&body)?;
//! ```
//!
//! The field list is compiled once into a JSON Schema (draft 2020-12)
//! document and a [`jsonschema::Validator`]. Fields are required unless
//! marked `.optional()`. Every violation is reported, ordered by field
//! declaration.

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, ValidationError, Validator};
use serde_json::{json, Map, Number, Value};

use super::{SchemaError, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
    /// RFC 3339 string, e.g. `2026-03-01T12:00:00Z`.
    Timestamp,
}

impl FieldKind {
    fn json_type(&self) -> &'static str {
        match self {
            FieldKind::String | FieldKind::Timestamp => "string",
            FieldKind::Integer => "integer",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
        }
    }

    fn expectation(&self) -> &'static str {
        match self {
            FieldKind::String => "a string",
            FieldKind::Integer => "an integer",
            FieldKind::Number => "a number",
            FieldKind::Boolean => "a boolean",
            FieldKind::Timestamp => "an RFC 3339 timestamp",
        }
    }
}

/// One declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: &'static str,
    kind: FieldKind,
    required: bool,
    nullable: bool,
    coerce: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    email: bool,
    one_of: Option<&'static [&'static str]>,
    min: Option<f64>,
    max: Option<f64>,
}

impl Field {
    fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            nullable: false,
            coerce: false,
            min_length: None,
            max_length: None,
            email: false,
            one_of: None,
            min: None,
            max: None,
        }
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn number(name: &'static str) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn timestamp(name: &'static str) -> Self {
        Self::new(name, FieldKind::Timestamp)
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Accept an explicit `null`.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Allow numeric strings for integer/number fields and `"true"`/`"false"`
    /// for boolean fields. Has no effect on other kinds.
    pub fn coerce(mut self) -> Self {
        self.coerce = true;
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn email(mut self) -> Self {
        self.email = true;
        self
    }

    pub fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.one_of = Some(allowed);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// The JSON Schema fragment for this field's `properties` entry.
    fn to_json_schema(&self) -> Value {
        let mut schema = Map::new();
        let json_type = self.kind.json_type();
        schema.insert(
            "type".into(),
            if self.nullable {
                json!([json_type, "null"])
            } else {
                json!(json_type)
            },
        );

        if self.kind == FieldKind::Timestamp {
            schema.insert("format".into(), json!("date-time"));
        } else if self.email {
            schema.insert("format".into(), json!("email"));
        }
        if let Some(min) = self.min_length {
            schema.insert("minLength".into(), json!(min));
        }
        if let Some(max) = self.max_length {
            schema.insert("maxLength".into(), json!(max));
        }
        if let Some(allowed) = self.one_of {
            // `enum` applies to every type, so a nullable field lists null.
            let mut options: Vec<Value> = allowed.iter().map(|s| json!(s)).collect();
            if self.nullable {
                options.push(Value::Null);
            }
            schema.insert("enum".into(), Value::Array(options));
        }
        if let Some(min) = self.min {
            schema.insert("minimum".into(), json!(min));
        }
        if let Some(max) = self.max {
            schema.insert("maximum".into(), json!(max));
        }

        Value::Object(schema)
    }

    /// Apply the declared coercion to a raw value. Values that do not
    /// coerce are returned unchanged for the type check to report.
    fn coerced(&self, value: &Value) -> Option<Value> {
        let Value::String(s) = value else {
            return None;
        };
        match self.kind {
            FieldKind::Integer => s.trim().parse::<i64>().ok().map(Value::from),
            FieldKind::Number => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number),
            FieldKind::Boolean => match s.as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            FieldKind::String | FieldKind::Timestamp => None,
        }
    }

    /// Render one validator error for this field.
    fn message(&self, kind: &ValidationErrorKind, fallback: &ValidationError<'_>) -> String {
        let name = self.name;
        match kind {
            ValidationErrorKind::Required { .. } => format!("{name} is required"),
            ValidationErrorKind::Type { .. } => {
                format!("{name} must be {}", self.kind.expectation())
            }
            ValidationErrorKind::Format { .. } if self.kind == FieldKind::Timestamp => {
                format!("{name} must be {}", self.kind.expectation())
            }
            ValidationErrorKind::Format { .. } => {
                format!("{name} must be a valid email address")
            }
            ValidationErrorKind::MinLength { .. } => format!(
                "{name} must be at least {} characters long",
                self.min_length.unwrap_or_default()
            ),
            ValidationErrorKind::MaxLength { .. } => format!(
                "{name} must be at most {} characters long",
                self.max_length.unwrap_or_default()
            ),
            ValidationErrorKind::Enum { .. } => format!(
                "{name} must be one of: {}",
                self.one_of.unwrap_or_default().join(", ")
            ),
            ValidationErrorKind::Minimum { .. } => format!(
                "{name} must be greater than or equal to {}",
                self.min.unwrap_or_default()
            ),
            ValidationErrorKind::Maximum { .. } => format!(
                "{name} must be less than or equal to {}",
                self.max.unwrap_or_default()
            ),
            _ => format!("{name}: {fallback}"),
        }
    }
}

/// A compiled body schema.
pub struct Schema {
    fields: Vec<Field>,
    document: Value,
    validator: Result<Validator, String>,
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("document", &self.document)
            .field("compiled", &self.validator.is_ok())
            .finish()
    }
}

impl Schema {
    /// Compile the field list. A declaration the validator cannot compile
    /// surfaces as [`SchemaError::Compile`] on every call to `validate`.
    pub fn new(fields: impl IntoIterator<Item = Field>) -> Self {
        let fields: Vec<Field> = fields.into_iter().collect();

        let properties: Map<String, Value> = fields
            .iter()
            .map(|field| (field.name.to_string(), field.to_json_schema()))
            .collect();
        let required: Vec<&str> = fields
            .iter()
            .filter(|field| field.required)
            .map(|field| field.name)
            .collect();
        let document = json!({
            "type": "object",
            "properties": properties,
            "required": required,
        });

        let validator = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .should_validate_formats(true)
            .build(&document)
            .map_err(|e| e.to_string());

        Self {
            fields,
            document,
            validator,
        }
    }

    /// The generated JSON Schema document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Validate `input` against every declared field.
    ///
    /// On success returns the input object with declared coercions applied.
    /// Fields the schema does not declare are passed through untouched.
    pub fn validate(&self, input: &Value) -> Result<Value, SchemaError> {
        let validator = self
            .validator
            .as_ref()
            .map_err(|e| SchemaError::Compile(e.clone()))?;

        let Value::Object(object) = input else {
            return Err(ValidationErrors::from(vec![
                "request body must be a JSON object".to_string(),
            ])
            .into());
        };

        let mut normalized = object.clone();
        for field in self.fields.iter().filter(|field| field.coerce) {
            if let Some(value) = object.get(field.name).and_then(|v| field.coerced(v)) {
                normalized.insert(field.name.to_string(), value);
            }
        }
        let normalized = Value::Object(normalized);

        let mut violations: Vec<(usize, bool, String)> = validator
            .iter_errors(&normalized)
            .filter_map(|error| self.violation(&error))
            .collect();

        // A wrong-typed value cannot meet the field's other rules.
        let mistyped: Vec<usize> = violations
            .iter()
            .filter(|(_, is_type, _)| *is_type)
            .map(|(index, _, _)| *index)
            .collect();
        violations.retain(|(index, is_type, _)| *is_type || !mistyped.contains(index));
        violations.sort_by_key(|(index, _, _)| *index);

        if violations.is_empty() {
            Ok(normalized)
        } else {
            Err(ValidationErrors::from(
                violations
                    .into_iter()
                    .map(|(_, _, message)| message)
                    .collect::<Vec<_>>(),
            )
            .into())
        }
    }

    /// Locate the declared field an error belongs to and render it.
    fn violation(&self, error: &ValidationError<'_>) -> Option<(usize, bool, String)> {
        let name = match &error.kind {
            ValidationErrorKind::Required { property } => property.as_str()?.to_string(),
            _ => error
                .instance_path
                .to_string()
                .trim_start_matches('/')
                .to_string(),
        };
        let index = self.fields.iter().position(|field| field.name == name)?;
        let is_type = matches!(error.kind, ValidationErrorKind::Type { .. });
        Some((index, is_type, self.fields[index].message(&error.kind, error)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Schema {
        Schema::new([
            Field::string("email").email(),
            Field::string("password").min_length(8),
        ])
    }

    fn violations(schema: &Schema, input: Value) -> Vec<String> {
        match schema.validate(&input) {
            Err(SchemaError::Invalid(errors)) => errors.messages().to_vec(),
            other => panic!("expected violations, got {other:?}"),
        }
    }

    #[test]
    fn compiles_to_json_schema_document() {
        let schema = Schema::new([
            Field::string("email").email(),
            Field::timestamp("due_date").optional().nullable(),
        ]);
        assert_eq!(
            schema.document(),
            &json!({
                "type": "object",
                "properties": {
                    "email": {"type": "string", "format": "email"},
                    "due_date": {"type": ["string", "null"], "format": "date-time"},
                },
                "required": ["email"],
            })
        );
    }

    #[test]
    fn accepts_valid_input_and_keeps_unknown_fields() {
        let input = json!({"email": "a@b.com", "password": "long enough", "extra": [1, 2]});
        let output = credentials().validate(&input).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn reports_every_violation_in_declaration_order() {
        assert_eq!(
            violations(&credentials(), json!({"password": "short", "email": "nope"})),
            [
                "email must be a valid email address",
                "password must be at least 8 characters long",
            ]
        );
    }

    #[test]
    fn multiple_rules_on_one_field_are_all_reported() {
        let schema = Schema::new([Field::string("handle").min_length(5).max_length(1)]);
        assert_eq!(violations(&schema, json!({"handle": "abc"})).len(), 2);
    }

    #[test]
    fn missing_required_fields() {
        assert_eq!(
            violations(&credentials(), json!({})),
            ["email is required", "password is required"]
        );
    }

    #[test]
    fn optional_field_may_be_absent() {
        let schema = Schema::new([Field::string("description").optional()]);
        assert!(schema.validate(&json!({})).is_ok());
    }

    #[test]
    fn type_mismatch_skips_rules() {
        assert_eq!(
            violations(&credentials(), json!({"email": 42, "password": "long enough"})),
            ["email must be a string"]
        );

        let status = Schema::new([Field::string("status").one_of(&["todo", "done"])]);
        assert_eq!(
            violations(&status, json!({"status": 7})),
            ["status must be a string"]
        );
    }

    #[test]
    fn null_only_accepted_when_nullable() {
        let strict = Schema::new([Field::timestamp("due_date").optional()]);
        assert_eq!(
            violations(&strict, json!({"due_date": null})),
            ["due_date must be an RFC 3339 timestamp"]
        );

        let lenient = Schema::new([Field::timestamp("due_date").optional().nullable()]);
        assert!(lenient.validate(&json!({"due_date": null})).is_ok());
    }

    #[test]
    fn empty_string_is_not_turned_into_null_or_absent() {
        let schema = Schema::new([Field::string("title").min_length(5)]);
        assert_eq!(
            violations(&schema, json!({"title": ""})),
            ["title must be at least 5 characters long"]
        );
    }

    #[test]
    fn no_implicit_coercion() {
        let schema = Schema::new([Field::integer("limit")]);
        assert_eq!(
            violations(&schema, json!({"limit": "10"})),
            ["limit must be an integer"]
        );
    }

    #[test]
    fn declared_coercion_converts_strings() {
        let schema = Schema::new([
            Field::integer("limit").coerce().min(1.0).max(100.0),
            Field::number("ratio").coerce().optional(),
            Field::boolean("archived").coerce().optional(),
        ]);
        let output = schema
            .validate(&json!({"limit": " 25 ", "ratio": "0.5", "archived": "true"}))
            .unwrap();
        assert_eq!(output, json!({"limit": 25, "ratio": 0.5, "archived": true}));

        assert_eq!(
            violations(&schema, json!({"limit": "500"})),
            ["limit must be less than or equal to 100"]
        );
        assert_eq!(
            violations(&schema, json!({"limit": "ten"})),
            ["limit must be an integer"]
        );
    }

    #[test]
    fn one_of_lists_allowed_values() {
        let schema = Schema::new([Field::string("status").one_of(&["todo", "done"])]);
        assert_eq!(
            violations(&schema, json!({"status": "later"})),
            ["status must be one of: todo, done"]
        );
    }

    #[test]
    fn timestamp_requires_rfc3339() {
        let schema = Schema::new([Field::timestamp("due_date")]);
        assert!(schema
            .validate(&json!({"due_date": "2026-03-01T12:00:00Z"}))
            .is_ok());
        assert_eq!(
            violations(&schema, json!({"due_date": "tomorrow"})),
            ["due_date must be an RFC 3339 timestamp"]
        );
    }

    #[test]
    fn non_object_body_is_one_error() {
        assert_eq!(
            violations(&credentials(), json!(["a@b.com"])),
            ["request body must be a JSON object"]
        );
    }

    #[test]
    fn email_format_is_checked_by_the_validator() {
        let schema = Schema::new([Field::string("email").email()]);
        for ok in ["a@b.com", "first.last@sub.example.org"] {
            assert!(schema.validate(&json!({ "email": ok })).is_ok(), "{ok}");
        }
        for bad in ["", "plainaddress", "a b"] {
            assert_eq!(
                violations(&schema, json!({ "email": bad })),
                ["email must be a valid email address"],
                "{bad}"
            );
        }
    }
}
