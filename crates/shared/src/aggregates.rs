//! Read models computed by the backend (grades and absences pre-joined by
//! student, course or classroom).

use serde::{Deserialize, Serialize};

use crate::models::{ClassCourse, ClassroomRef, Course};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeEntry {
    pub id: i64,
    pub value: i32,
    #[serde(default, alias = "dateGiven")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsenceEntry {
    pub id: i64,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub excused: bool,
}

/// Grades and absences of one student in one class course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    pub class_course_id: i64,
    #[serde(default)]
    pub course_id: Option<i64>,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub teacher_name: Option<String>,
    #[serde(default)]
    pub grades: Vec<GradeEntry>,
    #[serde(default)]
    pub absences: Vec<AbsenceEntry>,
}

impl CourseRecord {
    pub fn average(&self) -> Option<f64> {
        average(self.grades.iter().map(|g| g.value))
    }

    pub fn unexcused(&self) -> usize {
        self.absences.iter().filter(|a| !a.excused).count()
    }
}

/// Everything recorded for one student, grouped by course
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    #[serde(default)]
    pub student_id: i64,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub courses: Vec<CourseRecord>,
}

impl StudentRecord {
    /// Distinct class courses referenced by this record, in first-seen order
    pub fn class_courses(&self, classroom: Option<&ClassroomRef>) -> Vec<ClassCourse> {
        let mut out: Vec<ClassCourse> = Vec::new();
        for record in &self.courses {
            if out.iter().any(|cc| cc.id == record.class_course_id) {
                continue;
            }
            out.push(ClassCourse {
                id: record.class_course_id,
                classroom_id: classroom.map(|c| c.id),
                course_id: record.course_id,
                teacher_id: None,
                classroom: classroom.cloned(),
                course: record.course_id.map(|id| Course {
                    id,
                    name: record.course_name.clone(),
                }),
                teacher: None,
            });
        }
        out
    }

    /// Distinct subject definitions referenced by this record
    pub fn courses(&self) -> Vec<Course> {
        let mut out: Vec<Course> = Vec::new();
        for record in &self.courses {
            let Some(id) = record.course_id else { continue };
            if out.iter().any(|c| c.id == id) {
                continue;
            }
            out.push(Course {
                id,
                name: record.course_name.clone(),
            });
        }
        out
    }

    pub fn average(&self) -> Option<f64> {
        average(self.courses.iter().flat_map(|c| c.grades.iter().map(|g| g.value)))
    }

    pub fn unexcused(&self) -> usize {
        self.courses.iter().map(CourseRecord::unexcused).sum()
    }

    pub fn grade_count(&self) -> usize {
        self.courses.iter().map(|c| c.grades.len()).sum()
    }
}

/// Column header of a classroom catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCourse {
    pub class_course_id: i64,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub teacher_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassroomCatalog {
    #[serde(default)]
    pub classroom_id: i64,
    #[serde(default)]
    pub classroom_name: String,
    #[serde(default)]
    pub courses: Vec<CatalogCourse>,
    #[serde(default)]
    pub students: Vec<StudentRecord>,
}

/// One roster line of a single-course catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub student_id: i64,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub grades: Vec<GradeEntry>,
    #[serde(default)]
    pub absences: Vec<AbsenceEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseCatalog {
    #[serde(default)]
    pub classroom_id: i64,
    #[serde(default)]
    pub class_course_id: i64,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub teacher_name: Option<String>,
    #[serde(default)]
    pub students: Vec<RosterEntry>,
}

fn average(values: impl Iterator<Item = i32>) -> Option<f64> {
    let (sum, count) = values.fold((0i64, 0usize), |(s, n), v| (s + v as i64, n + 1));
    (count > 0).then(|| sum as f64 / count as f64)
}
