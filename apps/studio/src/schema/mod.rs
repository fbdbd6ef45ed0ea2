// Response schema for generated resumes.
// One definition serves two purposes: it is sent to the generation service to
// constrain its output, and it validates whatever comes back before the
// document is deserialized.

use std::sync::OnceLock;

use serde_json::{json, Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    /// Properties keep declaration order so the wire form is stable.
    Object {
        properties: Vec<(&'static str, Schema)>,
        required: Vec<&'static str>,
    },
    Array(Box<Schema>),
    String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub kind: SchemaKind,
    pub description: Option<&'static str>,
}

impl Schema {
    pub fn string() -> Self {
        Self {
            kind: SchemaKind::String,
            description: None,
        }
    }

    pub fn array(items: Schema) -> Self {
        Self {
            kind: SchemaKind::Array(Box::new(items)),
            description: None,
        }
    }

    pub fn object(
        properties: Vec<(&'static str, Schema)>,
        required: Vec<&'static str>,
    ) -> Self {
        Self {
            kind: SchemaKind::Object {
                properties,
                required,
            },
            description: None,
        }
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            SchemaKind::Object { .. } => "OBJECT",
            SchemaKind::Array(_) => "ARRAY",
            SchemaKind::String => "STRING",
        }
    }

    /// Wire form understood by the generation service's `responseSchema`.
    pub fn to_response_schema(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".into(), json!(self.type_name()));
        if let Some(description) = self.description {
            out.insert("description".into(), json!(description));
        }
        match &self.kind {
            SchemaKind::Object {
                properties,
                required,
            } => {
                let props: Map<String, Value> = properties
                    .iter()
                    .map(|(name, schema)| (name.to_string(), schema.to_response_schema()))
                    .collect();
                out.insert("properties".into(), Value::Object(props));
                out.insert("required".into(), json!(required));
            }
            SchemaKind::Array(items) => {
                out.insert("items".into(), items.to_response_schema());
            }
            SchemaKind::String => {}
        }
        Value::Object(out)
    }

    /// Checks `value` against this schema. Unknown properties are tolerated;
    /// missing required ones and type mismatches are not.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        self.validate_at(value, &mut String::new())
    }

    fn validate_at(&self, value: &Value, path: &mut String) -> Result<(), SchemaViolation> {
        match (&self.kind, value) {
            (SchemaKind::String, Value::String(_)) => Ok(()),
            (SchemaKind::Array(items), Value::Array(values)) => {
                for (i, item) in values.iter().enumerate() {
                    let len = path.len();
                    path.push_str(&format!("/{i}"));
                    items.validate_at(item, path)?;
                    path.truncate(len);
                }
                Ok(())
            }
            (
                SchemaKind::Object {
                    properties,
                    required,
                },
                Value::Object(fields),
            ) => {
                for name in required {
                    if !fields.contains_key(*name) {
                        return Err(SchemaViolation::Missing {
                            path: format!("{path}/{name}"),
                        });
                    }
                }
                for (name, schema) in properties {
                    if let Some(field) = fields.get(*name) {
                        let len = path.len();
                        path.push('/');
                        path.push_str(name);
                        schema.validate_at(field, path)?;
                        path.truncate(len);
                    }
                }
                Ok(())
            }
            (_, other) => Err(SchemaViolation::TypeMismatch {
                path: display_path(path),
                expected: self.type_name(),
                found: json_type_name(other),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("missing required field {path}")]
    Missing { path: String },

    #[error("expected {expected} at {path}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl SchemaViolation {
    pub fn path(&self) -> &str {
        match self {
            SchemaViolation::Missing { path } | SchemaViolation::TypeMismatch { path, .. } => path,
        }
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The resume document contract, built once.
pub fn resume_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(build_resume_schema)
}

pub fn validate(value: &Value) -> Result<(), SchemaViolation> {
    resume_schema().validate(value)
}

fn build_resume_schema() -> Schema {
    let personal_info = Schema::object(
        vec![
            ("name", Schema::string()),
            (
                "title",
                Schema::string().describe("Candidate's target or current job title"),
            ),
            ("phone", Schema::string()),
            ("email", Schema::string()),
            ("linkedin", Schema::string()),
        ],
        vec!["name", "title", "phone", "email", "linkedin"],
    );

    let experience = Schema::array(Schema::object(
        vec![
            ("title", Schema::string()),
            ("company", Schema::string()),
            ("dates", Schema::string().describe("e.g., Jan 2020 - Present")),
            (
                "achievements",
                Schema::array(
                    Schema::string().describe("Quantified, action-verb-led bullet point."),
                ),
            ),
        ],
        vec!["title", "company", "dates", "achievements"],
    ));

    // `details` is optional: the document renders fine without it.
    let education = Schema::array(Schema::object(
        vec![
            ("institution", Schema::string()),
            (
                "degree",
                Schema::string().describe("e.g., M.S. in Computer Science"),
            ),
            ("dates", Schema::string().describe("e.g., 2016 - 2020")),
            (
                "details",
                Schema::string().describe("e.g., GPA or relevant coursework"),
            ),
        ],
        vec!["institution", "degree", "dates"],
    ));

    let skills = Schema::object(
        vec![
            ("Technical", Schema::array(Schema::string())),
            ("Soft", Schema::array(Schema::string())),
            ("Certifications", Schema::array(Schema::string())),
        ],
        vec!["Technical", "Soft", "Certifications"],
    );

    Schema::object(
        vec![
            ("personalInfo", personal_info),
            (
                "summary",
                Schema::string().describe(
                    "A compelling 3-4 sentence professional summary, quantifying at least one major achievement.",
                ),
            ),
            ("experience", experience),
            ("education", education),
            ("skills", skills),
        ],
        vec!["personalInfo", "summary", "experience", "education", "skills"],
    )
}
