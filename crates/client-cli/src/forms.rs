//! Form state as typed by the user, checked before anything is submitted.
//! The backend enforces the same rules; these checks only spare a round trip
//! and give a clearer message.

use shared::{
    dates, AbsenceInput, BulkEntry, BulkEvaluation, ClassCourse, ClassCourseInput, Classroom,
    DateError, GradeInput, GradeUpdate, RegisterWithCodeRequest, StudentInput,
};

pub const GRADE_MIN: i32 = 1;
pub const GRADE_MAX: i32 = 10;
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("Grade must be between {GRADE_MIN} and {GRADE_MAX}, got {0}")]
    GradeOutOfRange(i32),
    #[error(transparent)]
    Date(#[from] DateError),
    #[error("Classroom {0} does not exist")]
    UnknownClassroom(i64),
    #[error("This course is already assigned to this classroom")]
    DuplicateClassCourse,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least {MIN_PASSWORD_LEN} characters long")]
    PasswordTooShort,
}

pub fn parse_grade(value: &str) -> Result<i32, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FormError::Missing("Grade"));
    }
    let grade: i32 = value
        .parse()
        .map_err(|_| FormError::NotANumber(value.to_string()))?;
    if !(GRADE_MIN..=GRADE_MAX).contains(&grade) {
        return Err(FormError::GradeOutOfRange(grade));
    }
    Ok(grade)
}

fn backend_date(date: &str) -> Result<String, FormError> {
    if date.trim().is_empty() {
        return Err(FormError::Missing("Date"));
    }
    Ok(dates::ui_to_backend(date)?)
}

/// Add-grade modal; `date` comes from a `YYYY-MM-DD` picker
#[derive(Debug, Clone, Default)]
pub struct GradeForm {
    pub student_id: Option<i64>,
    pub class_course_id: Option<i64>,
    pub value: String,
    pub date: String,
}

impl GradeForm {
    pub fn validate(&self) -> Result<GradeInput, FormError> {
        Ok(GradeInput {
            student_id: self.student_id.ok_or(FormError::Missing("Student"))?,
            class_course_id: self.class_course_id.ok_or(FormError::Missing("Class course"))?,
            value: parse_grade(&self.value)?,
            date: backend_date(&self.date)?,
        })
    }

    pub fn validate_update(&self) -> Result<GradeUpdate, FormError> {
        Ok(GradeUpdate {
            value: parse_grade(&self.value)?,
            date: backend_date(&self.date)?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct AbsenceForm {
    pub student_id: Option<i64>,
    pub class_course_id: Option<i64>,
    pub date: String,
    pub excused: bool,
}

impl AbsenceForm {
    pub fn validate(&self) -> Result<AbsenceInput, FormError> {
        Ok(AbsenceInput {
            student_id: self.student_id.ok_or(FormError::Missing("Student"))?,
            class_course_id: self.class_course_id.ok_or(FormError::Missing("Class course"))?,
            date: backend_date(&self.date)?,
            excused: self.excused,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct StudentForm {
    pub first_name: String,
    pub last_name: String,
    pub registration_code: String,
    pub classroom_id: Option<i64>,
}

impl StudentForm {
    /// The chosen classroom must be one the user can see
    pub fn validate(&self, classrooms: &[Classroom]) -> Result<StudentInput, FormError> {
        let first_name = required("First name", &self.first_name)?;
        let last_name = required("Last name", &self.last_name)?;
        let classroom_id = self.classroom_id.ok_or(FormError::Missing("Classroom"))?;
        if !classrooms.iter().any(|c| c.id == classroom_id) {
            return Err(FormError::UnknownClassroom(classroom_id));
        }
        Ok(StudentInput {
            first_name,
            last_name,
            registration_code: self.registration_code.trim().to_string(),
            classroom_id,
        })
    }
}

/// Assigning a course to a classroom; one assignment per pair
pub fn validate_class_course(
    input: &ClassCourseInput,
    existing: &[ClassCourse],
) -> Result<(), FormError> {
    let duplicate = existing.iter().any(|cc| {
        cc.classroom_id() == Some(input.classroom_id) && cc.course_id() == Some(input.course_id)
    });
    if duplicate {
        return Err(FormError::DuplicateClassCourse);
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub registration_code: String,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<RegisterWithCodeRequest, FormError> {
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FormError::PasswordTooShort);
        }
        Ok(RegisterWithCodeRequest {
            username: required("Username", &self.username)?,
            password: self.password.clone(),
            registration_code: required("Registration code", &self.registration_code)?,
        })
    }
}

/// One row of the bulk evaluation grid, as typed
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRow {
    pub student_id: i64,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub absent: bool,
}

/// Validate every filled-in row and build the payload; blank rows are dropped
pub fn build_evaluation(
    class_course_id: i64,
    date: &str,
    rows: &[EvaluationRow],
) -> Result<BulkEvaluation, FormError> {
    let date = backend_date(date)?;
    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let grade = match row.grade.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(parse_grade(value)?),
        };
        entries.push(BulkEntry {
            student_id: row.student_id,
            grade,
            absent: row.absent,
        });
    }
    Ok(BulkEvaluation::new(class_course_id, date, entries))
}

fn required(field: &'static str, value: &str) -> Result<String, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FormError::Missing(field));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grade_form(value: &str) -> GradeForm {
        GradeForm {
            student_id: Some(7),
            class_course_id: Some(11),
            value: value.to_string(),
            date: "2024-10-12".to_string(),
        }
    }

    #[test]
    fn test_grade_form_converts_date() {
        let input = grade_form("9").validate().unwrap();
        assert_eq!(input.value, 9);
        assert_eq!(input.date, "12-10-2024");
    }

    #[test]
    fn test_grade_out_of_range_rejected_before_submit() {
        assert_eq!(grade_form("11").validate(), Err(FormError::GradeOutOfRange(11)));
        assert_eq!(grade_form("0").validate(), Err(FormError::GradeOutOfRange(0)));
        assert_eq!(
            grade_form("nine").validate(),
            Err(FormError::NotANumber("nine".to_string()))
        );
        assert_eq!(
            FormError::GradeOutOfRange(11).to_string(),
            "Grade must be between 1 and 10, got 11"
        );
    }

    #[test]
    fn test_grade_form_requires_fields() {
        let mut form = grade_form("8");
        form.student_id = None;
        assert_eq!(form.validate(), Err(FormError::Missing("Student")));

        let mut form = grade_form("8");
        form.date.clear();
        assert_eq!(form.validate(), Err(FormError::Missing("Date")));
    }

    #[test]
    fn test_student_form_checks_classroom_exists() {
        let classrooms = vec![Classroom {
            id: 3,
            name: "12A".to_string(),
            level: Some(12),
            homeroom_teacher_id: None,
            homeroom_teacher: None,
        }];
        let mut form = StudentForm {
            first_name: "Andrei".to_string(),
            last_name: "Pop".to_string(),
            registration_code: "STU-1".to_string(),
            classroom_id: Some(4),
        };
        assert_eq!(form.validate(&classrooms), Err(FormError::UnknownClassroom(4)));

        form.classroom_id = Some(3);
        assert_eq!(form.validate(&classrooms).unwrap().classroom_id, 3);
    }

    #[test]
    fn test_sign_up_rules() {
        let mut form = SignUpForm {
            username: "andrei".to_string(),
            password: "abc".to_string(),
            confirm_password: "abd".to_string(),
            registration_code: "STU-1".to_string(),
        };
        assert_eq!(form.validate().unwrap_err(), FormError::PasswordMismatch);

        form.confirm_password = "abc".to_string();
        assert_eq!(form.validate().unwrap_err(), FormError::PasswordTooShort);

        form.password = "abcdef".to_string();
        form.confirm_password = "abcdef".to_string();
        assert_eq!(form.validate().unwrap().registration_code, "STU-1");
    }

    #[test]
    fn test_duplicate_class_course() {
        let existing: Vec<ClassCourse> =
            serde_json::from_str(r#"[{"id":1,"classroom":{"id":3,"name":"12A"},"course":{"id":4,"name":"Fizică"}}]"#)
                .unwrap();
        let input = ClassCourseInput { classroom_id: 3, course_id: 4, teacher_id: 9 };
        assert_eq!(validate_class_course(&input, &existing), Err(FormError::DuplicateClassCourse));

        let other = ClassCourseInput { classroom_id: 3, course_id: 5, teacher_id: 9 };
        assert!(validate_class_course(&other, &existing).is_ok());
    }

    #[test]
    fn test_build_evaluation_mixed_rows() {
        let rows = vec![
            EvaluationRow { student_id: 1, grade: Some("8".to_string()), absent: false },
            EvaluationRow { student_id: 2, grade: None, absent: true },
            EvaluationRow { student_id: 3, grade: Some("  ".to_string()), absent: false },
            EvaluationRow { student_id: 4, grade: None, absent: false },
        ];
        let payload = build_evaluation(11, "2024-09-16", &rows).unwrap();
        assert_eq!(payload.date, "16-09-2024");
        assert_eq!(
            payload.entries.iter().map(|e| e.student_id).collect::<Vec<_>>(),
            vec![1, 2]
        );

        let bad = vec![EvaluationRow { student_id: 1, grade: Some("11".to_string()), absent: false }];
        assert_eq!(
            build_evaluation(11, "2024-09-16", &bad),
            Err(FormError::GradeOutOfRange(11))
        );
    }
}
