use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

/// Closed set of mathematical domains. Anything outside this set must fail
/// deserialization, so a bad category can never leak past the boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    Algebra,
    Geometry,
    Calculus,
    Statistics,
    #[serde(rename = "Number Theory")]
    NumberTheory,
    Trigonometry,
    #[serde(rename = "Linear Algebra")]
    LinearAlgebra,
    #[serde(rename = "Differential Equations")]
    DifferentialEquations,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Algebra => "Algebra",
            Category::Geometry => "Geometry",
            Category::Calculus => "Calculus",
            Category::Statistics => "Statistics",
            Category::NumberTheory => "Number Theory",
            Category::Trigonometry => "Trigonometry",
            Category::LinearAlgebra => "Linear Algebra",
            Category::DifferentialEquations => "Differential Equations",
        }
    }

    pub const ALL: [Category; 8] = [
        Category::Algebra,
        Category::Geometry,
        Category::Calculus,
        Category::Statistics,
        Category::NumberTheory,
        Category::Trigonometry,
        Category::LinearAlgebra,
        Category::DifferentialEquations,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Algebra" => Ok(Category::Algebra),
            "Geometry" => Ok(Category::Geometry),
            "Calculus" => Ok(Category::Calculus),
            "Statistics" => Ok(Category::Statistics),
            "Number Theory" => Ok(Category::NumberTheory),
            "Trigonometry" => Ok(Category::Trigonometry),
            "Linear Algebra" => Ok(Category::LinearAlgebra),
            "Differential Equations" => Ok(Category::DifferentialEquations),
            _ => Err(format!("Invalid category: {}", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseStatus {
    Open,
    Pending,
    Finished,
}

/// A math exercise as served by the backend. Wire names are camelCase.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,

    #[validate(length(
        min = 1,
        max = 200,
        message = "Title must be between 1 and 200 characters"
    ))]
    pub title: String,

    #[validate(length(min = 1, message = "Statement must not be empty"))]
    pub statement: String,

    #[validate(length(min = 1, message = "Solution must not be empty"))]
    pub solution: String,

    pub category: Category,
    pub level: Level,
    pub status: ExerciseStatus,

    /// ISO-8601 text on the wire, parsed into a timestamp at the boundary.
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub image_paths: Vec<String>,

    /// AI transcription confidence, bounded to [0, 1].
    #[validate(range(min = 0.0, max = 1.0, message = "Confidence score must be within [0, 1]"))]
    pub confidence_score: f64,
}

/// Payload for creating a new exercise. Validated locally before any network
/// call is made.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ExerciseCreate {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title must be between 1 and 200 characters"
    ))]
    pub title: String,

    #[validate(length(min = 1, message = "Statement must not be empty"))]
    pub statement: String,

    #[validate(length(min = 1, message = "Solution must not be empty"))]
    pub solution: String,

    pub category: Category,
}

/// Partial update payload. Mirrors the backend's partial-update semantics:
/// absent fields are left untouched and no local pre-validation is applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExerciseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// Pagination envelope for exercise listings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[validate(schema(function = validate_page_window))]
pub struct ExerciseList {
    #[validate(nested)]
    pub exercises: Vec<Exercise>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
}

fn validate_page_window(list: &ExerciseList) -> Result<(), ValidationError> {
    if list.exercises.len() as u64 > u64::from(list.size) {
        let mut error = ValidationError::new("page_window");
        error.message = Some("Page contains more exercises than its declared size".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExerciseStats {
    pub total_exercises: u64,
    pub category_distribution: HashMap<String, u64>,
}

fn default_conversion_message() -> String {
    "AI conversion completed successfully".to_string()
}

/// Result of a handwriting-to-exercise conversion. Ephemeral: consumed to
/// pre-populate a submission form, never persisted by this layer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiConversionResponse {
    pub title: String,
    pub statement: String,
    pub solution: String,
    pub category: Category,

    #[validate(range(min = 0.0, max = 1.0, message = "Confidence score must be within [0, 1]"))]
    pub confidence_score: f64,

    #[serde(default = "default_conversion_message")]
    pub message: String,
}

/// A submitted answer to an exercise. Value object only: this layer never
/// mutates solutions and referential integrity is the backend's concern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub id: String,
    pub exercise_id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

/// Canonical backend error envelope on any non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiErrorBody {
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// Optional filters for listing exercises. Absent filters are omitted from
/// the query string entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseQuery {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// An uploaded file as handed to the conversion operations: name, declared
/// media type and raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
