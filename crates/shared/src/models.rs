//! Entities as the backend returns them.
//!
//! Relations arrive either as a nested object (`classroom: {...}`) or as a
//! bare id (`classroomId`), depending on the endpoint. Both are optional here
//! and the `*_id()` accessors resolve whichever is present.

use serde::{Deserialize, Serialize};

/// Anything the client caches in a list keyed by backend id
pub trait Entity {
    fn id(&self) -> i64;
}

/// User account linked to a Student/Teacher/Parent record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
}

/// Short person reference embedded in other records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRef {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl PersonRef {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassroomRef {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classroom {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub level: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homeroom_teacher_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homeroom_teacher: Option<PersonRef>,
}

impl From<ClassroomRef> for Classroom {
    fn from(classroom: ClassroomRef) -> Self {
        Self {
            id: classroom.id,
            name: classroom.name,
            level: None,
            homeroom_teacher_id: None,
            homeroom_teacher: None,
        }
    }
}

impl Classroom {
    pub fn summary(&self) -> ClassroomRef {
        ClassroomRef {
            id: self.id,
            name: self.name.clone(),
        }
    }

    pub fn homeroom_teacher_id(&self) -> Option<i64> {
        self.homeroom_teacher_id
            .or_else(|| self.homeroom_teacher.as_ref().map(|t| t.id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub registration_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classroom_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classroom: Option<ClassroomRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserAccount>,
}

impl Student {
    pub fn classroom_id(&self) -> Option<i64> {
        self.classroom_id
            .or_else(|| self.classroom.as_ref().map(|c| c.id))
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub registration_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserAccount>,
}

impl Teacher {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parent {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub registration_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student: Option<PersonRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserAccount>,
}

impl Parent {
    pub fn student_id(&self) -> Option<i64> {
        self.student_id.or_else(|| self.student.as_ref().map(|s| s.id))
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub name: String,
}

/// A course taught to one classroom by one teacher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassCourse {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classroom_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classroom: Option<ClassroomRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<Course>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<PersonRef>,
}

impl ClassCourse {
    pub fn classroom_id(&self) -> Option<i64> {
        self.classroom_id
            .or_else(|| self.classroom.as_ref().map(|c| c.id))
    }

    pub fn course_id(&self) -> Option<i64> {
        self.course_id.or_else(|| self.course.as_ref().map(|c| c.id))
    }

    pub fn teacher_id(&self) -> Option<i64> {
        self.teacher_id.or_else(|| self.teacher.as_ref().map(|t| t.id))
    }

    /// "Course - Classroom" label used in pickers
    pub fn label(&self) -> String {
        let course = self.course.as_ref().map(|c| c.name.as_str()).unwrap_or("Course");
        let classroom = self
            .classroom
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("Class");
        format!("{} - {}", course, classroom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_course_id: Option<i64>,
    pub value: i32,
    #[serde(default, alias = "dateGiven")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Absence {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_course_id: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub excused: bool,
}

macro_rules! impl_entity {
    ($($ty:ty),* $(,)?) => {
        $(impl Entity for $ty {
            fn id(&self) -> i64 {
                self.id
            }
        })*
    };
}

impl_entity!(Classroom, Student, Teacher, Parent, Course, ClassCourse);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_with_nested_classroom() {
        let json = r#"{"id":7,"firstName":"Andrei","lastName":"Pop","registrationCode":"STU-1","classroom":{"id":3,"name":"12A"},"user":{"id":5,"username":"andrei"}}"#;
        let student: Student = serde_json::from_str(json).unwrap();
        assert_eq!(student.classroom_id(), Some(3));
        assert_eq!(student.user.as_ref().map(|u| u.username.as_str()), Some("andrei"));
        assert_eq!(student.full_name(), "Andrei Pop");
    }

    #[test]
    fn test_student_with_flat_classroom_id() {
        let json = r#"{"id":7,"firstName":"Andrei","lastName":"Pop","classroomId":4}"#;
        let student: Student = serde_json::from_str(json).unwrap();
        assert_eq!(student.classroom_id(), Some(4));
        assert_eq!(student.registration_code, None);

        let out = serde_json::to_string(&student).unwrap();
        assert!(out.contains("\"classroomId\":4"));
        assert!(!out.contains("\"classroom\""));
    }

    #[test]
    fn test_class_course_accessors_prefer_flat_ids() {
        let json = r#"{"id":11,"classroomId":2,"classroom":{"id":9,"name":"9B"},"course":{"id":4,"name":"Fizică"},"teacher":{"id":6,"firstName":"Ion","lastName":"Popescu"}}"#;
        let cc: ClassCourse = serde_json::from_str(json).unwrap();
        assert_eq!(cc.classroom_id(), Some(2));
        assert_eq!(cc.course_id(), Some(4));
        assert_eq!(cc.teacher_id(), Some(6));
        assert_eq!(cc.label(), "Fizică - 9B");
    }

    #[test]
    fn test_grade_accepts_date_given_alias() {
        let grade: Grade =
            serde_json::from_str(r#"{"id":1,"value":9,"dateGiven":"12-10-2024"}"#).unwrap();
        assert_eq!(grade.date.as_deref(), Some("12-10-2024"));
    }

    #[test]
    fn test_classroom_homeroom_from_nested_teacher() {
        let json = r#"{"id":1,"name":"12A","level":12,"homeroomTeacher":{"id":3,"firstName":"Ana","lastName":"Ionescu"}}"#;
        let classroom: Classroom = serde_json::from_str(json).unwrap();
        assert_eq!(classroom.homeroom_teacher_id(), Some(3));
        assert_eq!(classroom.level, Some(12));
    }
}
