//! Inputs and views exchanged with the record service.
//!
//! Patch types never carry an identifier: the id is a routing key passed
//! alongside the patch, and an `id` key in an inbound JSON body is dropped
//! during deserialization.

use models::{discipline, grade, semester, user, year};
use serde::{Deserialize, Deserializer, Serialize};

pub use models::user::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewYear {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearPatch {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDiscipline {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisciplinePatch {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClass {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassPatch {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub class_id: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    /// `Some(None)` takes the user out of their class.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub class_id: Option<Option<i32>>,
}

/// Tell an explicit `null` (`Some(None)`) apart from a missing key (`None`).
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFilter {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub class_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSemester {
    pub name: String,
    pub year_id: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub year_id: Option<i32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterFilter {
    #[serde(default)]
    pub year_id: Option<i32>,
}

/// Semester with its year attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterDetails {
    #[serde(flatten)]
    pub semester: semester::Model,
    pub year: year::Model,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGrade {
    pub value: f64,
    pub student_id: i32,
    pub semester_id: i32,
    pub discipline_id: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradePatch {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub student_id: Option<i32>,
    #[serde(default)]
    pub semester_id: Option<i32>,
    #[serde(default)]
    pub discipline_id: Option<i32>,
}

/// Filters are ANDed; `None` means "any".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeFilter {
    #[serde(default)]
    pub student_id: Option<i32>,
    #[serde(default)]
    pub semester_id: Option<i32>,
    #[serde(default)]
    pub discipline_id: Option<i32>,
}

/// Grade with its discipline and semester (and the semester's year) attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeDetails {
    #[serde(flatten)]
    pub grade: grade::Model,
    pub discipline: discipline::Model,
    pub semester: SemesterDetails,
}

pub type User = user::Model;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_ignores_identifier_in_body() {
        let patch: ClassPatch = serde_json::from_str(r#"{"id": 7, "name": "9A"}"#).unwrap();
        assert_eq!(patch, ClassPatch { name: Some("9A".into()) });
    }

    #[test]
    fn null_class_differs_from_missing_class() {
        let clear: UserPatch = serde_json::from_str(r#"{"class_id": null}"#).unwrap();
        assert_eq!(clear.class_id, Some(None));
        let keep: UserPatch = serde_json::from_str(r#"{"name": "Ana"}"#).unwrap();
        assert_eq!(keep.class_id, None);
        let move_to: UserPatch = serde_json::from_str(r#"{"class_id": 4}"#).unwrap();
        assert_eq!(move_to.class_id, Some(Some(4)));
    }

    #[test]
    fn empty_body_is_empty_patch() {
        let patch: GradePatch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch, GradePatch::default());
    }

    #[test]
    fn grade_details_flatten_row_fields() {
        let details = GradeDetails {
            grade: grade::Model { id: 1, value: 10.0, student_id: 2, semester_id: 3, discipline_id: 4 },
            discipline: discipline::Model { id: 4, name: "Math".into() },
            semester: SemesterDetails {
                semester: semester::Model { id: 3, name: "Autumn".into(), year_id: 5 },
                year: year::Model { id: 5, name: "2024".into() },
            },
        };
        let v = serde_json::to_value(&details).unwrap();
        assert_eq!(v["value"], 10.0);
        assert_eq!(v["discipline"]["name"], "Math");
        assert_eq!(v["semester"]["year"]["name"], "2024");
        assert_eq!(v["semester"]["year_id"], 5);
    }
}
