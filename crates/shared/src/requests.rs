//! Request payloads, serialized the way the backend expects them

use serde::{Deserialize, Serialize};

use crate::role::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Self-registration against a pre-created Student/Teacher/Parent/Admin record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterWithCodeRequest {
    pub username: String,
    pub password: String,
    pub registration_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassroomInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homeroom_teacher_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInput {
    pub first_name: String,
    pub last_name: String,
    pub registration_code: String,
    pub classroom_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherInput {
    pub first_name: String,
    pub last_name: String,
    pub registration_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentInput {
    pub first_name: String,
    pub last_name: String,
    pub registration_code: String,
    pub student_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseInput {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassCourseInput {
    pub classroom_id: i64,
    pub course_id: i64,
    pub teacher_id: i64,
}

/// New grade; `date` is already in backend `DD-MM-YYYY` form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeInput {
    pub student_id: i64,
    pub class_course_id: i64,
    pub value: i32,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeUpdate {
    pub value: i32,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsenceInput {
    pub student_id: i64,
    pub class_course_id: i64,
    pub date: String,
    pub excused: bool,
}

/// One student's line in a bulk evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkEntry {
    pub student_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<i32>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub absent: bool,
}

impl BulkEntry {
    pub fn is_blank(&self) -> bool {
        self.grade.is_none() && !self.absent
    }
}

/// Grades and absences for a whole class course on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkEvaluation {
    pub class_course_id: i64,
    pub date: String,
    pub entries: Vec<BulkEntry>,
}

impl BulkEvaluation {
    /// Build a payload, dropping students left fully blank
    pub fn new(class_course_id: i64, date: String, entries: impl IntoIterator<Item = BulkEntry>) -> Self {
        Self {
            class_course_id,
            date,
            entries: entries.into_iter().filter(|e| !e.is_blank()).collect(),
        }
    }
}
