//! Resources exposed under `/gateway/*`.
//!
//! A [`Resource`] ties a public route prefix to a logical service, the
//! upstream path prefix, the create payload shape and the patch schema.
//! Handlers are generic over it so students and courses share one
//! implementation.

pub mod patch;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::registry::ServiceName;
pub use patch::{FieldKind, Patch, PatchSchema};

pub trait Resource: Send + Sync + 'static {
    /// Public route prefix, e.g. `/gateway/students`.
    const ROUTE: &'static str;
    const SERVICE: ServiceName;
    /// Upstream path prefix, e.g. `/api/students`.
    const UPSTREAM_PREFIX: &'static str;
    const PATCH: PatchSchema;

    type Create: DeserializeOwned + Serialize + Send + 'static;

    fn collection_path() -> String {
        Self::UPSTREAM_PREFIX.to_string()
    }

    fn item_path(id: i64) -> String {
        format!("{}/{}", Self::UPSTREAM_PREFIX, id)
    }
}

/// Create payload for a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub age: i64,
    pub email: String,
    pub course: String,
}

/// Create payload for a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCourse {
    pub name: String,
    pub description: String,
    pub credits: i64,
}

pub struct Students;

impl Resource for Students {
    const ROUTE: &'static str = "/gateway/students";
    const SERVICE: ServiceName = ServiceName::STUDENT;
    const UPSTREAM_PREFIX: &'static str = "/api/students";
    const PATCH: PatchSchema = PatchSchema::new(&[
        ("name", FieldKind::Text),
        ("age", FieldKind::Integer),
        ("email", FieldKind::Text),
        ("course", FieldKind::Text),
    ]);

    type Create = NewStudent;
}

pub struct Courses;

impl Resource for Courses {
    const ROUTE: &'static str = "/gateway/courses";
    const SERVICE: ServiceName = ServiceName::COURSE;
    const UPSTREAM_PREFIX: &'static str = "/api/courses";
    const PATCH: PatchSchema = PatchSchema::new(&[
        ("name", FieldKind::Text),
        ("description", FieldKind::Text),
        ("credits", FieldKind::Integer),
    ]);

    type Create = NewCourse;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paths() {
        assert_eq!(Students::collection_path(), "/api/students");
        assert_eq!(Students::item_path(5), "/api/students/5");
        assert_eq!(Courses::item_path(12), "/api/courses/12");
        assert_eq!(Courses::SERVICE, ServiceName::COURSE);
    }

    #[test]
    fn test_create_payload_requires_all_fields() {
        let ok: Result<NewStudent, _> =
            serde_json::from_value(json!({"name": "Ana", "age": 20, "email": "a@x.com", "course": "CS"}));
        assert!(ok.is_ok());

        let missing: Result<NewStudent, _> = serde_json::from_value(json!({"name": "Ana"}));
        assert!(missing.is_err());

        let course: NewCourse =
            serde_json::from_value(json!({"name": "Algebra", "description": "Linear", "credits": 4})).unwrap();
        assert_eq!(course.credits, 4);
    }

    #[test]
    fn test_course_patch_schema() {
        let patch = Courses::PATCH.parse(json!({"credits": 5, "age": 3})).unwrap();
        assert_eq!(patch.into_value(), json!({"credits": 5}));
    }
}
