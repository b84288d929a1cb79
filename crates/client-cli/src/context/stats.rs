//! Dashboard figures, computed from whatever the role-scoped load produced.

use serde::Serialize;
use shared::{dates, Role};

use super::state::SchoolState;

const RECENT_GRADES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentGrade {
    pub course_name: String,
    pub value: i32,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashboardStats {
    Admin {
        students: usize,
        classrooms: usize,
        teachers: usize,
        courses: usize,
    },
    Teacher {
        classrooms: usize,
        courses: usize,
        students: usize,
        parents: usize,
        homeroom: Option<String>,
    },
    /// Student and parent both look at one pupil's record
    Pupil {
        student_name: Option<String>,
        courses: usize,
        average: Option<f64>,
        recent_grades: Vec<RecentGrade>,
        unexcused_absences: u64,
    },
}

impl SchoolState {
    pub fn dashboard(&self, role: Role) -> DashboardStats {
        match role {
            Role::Admin => DashboardStats::Admin {
                students: self.students.len(),
                classrooms: self.classrooms.len(),
                teachers: self.teachers.len(),
                courses: self.courses.len(),
            },
            Role::Teacher => DashboardStats::Teacher {
                classrooms: self.classrooms.len(),
                courses: self.class_courses.len(),
                students: self.students.len(),
                parents: self.parents.len(),
                homeroom: self.homeroom().map(|c| c.name.clone()),
            },
            Role::Student | Role::Parent => {
                let record = self.record.as_ref();
                DashboardStats::Pupil {
                    student_name: self
                        .profile
                        .as_ref()
                        .and_then(|p| p.pupil())
                        .map(|s| s.full_name()),
                    courses: record.map(|r| r.courses.len()).unwrap_or_default(),
                    average: record.and_then(|r| r.average()),
                    recent_grades: self.recent_grades(RECENT_GRADES),
                    // The dedicated endpoint wins over counting the aggregate
                    unexcused_absences: self
                        .unexcused_absences
                        .or_else(|| record.map(|r| r.unexcused() as u64))
                        .unwrap_or_default(),
                }
            }
        }
    }

    fn homeroom(&self) -> Option<&shared::Classroom> {
        match self.profile.as_ref()? {
            super::Profile::Teacher { homeroom, .. } => homeroom.as_ref(),
            _ => None,
        }
    }

    /// Newest grades of the followed student; undated grades sort last
    pub fn recent_grades(&self, limit: usize) -> Vec<RecentGrade> {
        let Some(record) = &self.record else {
            return Vec::new();
        };
        let mut grades: Vec<RecentGrade> = record
            .courses
            .iter()
            .flat_map(|course| {
                course.grades.iter().map(|g| RecentGrade {
                    course_name: course.course_name.clone(),
                    value: g.value,
                    date: g.date.clone(),
                })
            })
            .collect();
        grades.sort_by_key(|g| {
            std::cmp::Reverse(g.date.as_deref().and_then(dates::parse_any))
        });
        grades.truncate(limit);
        grades
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::StudentRecord;

    fn record() -> StudentRecord {
        serde_json::from_value(serde_json::json!({
            "studentId": 7,
            "studentName": "Andrei Pop",
            "courses": [
                {
                    "classCourseId": 11, "courseId": 4, "courseName": "Fizică",
                    "grades": [
                        {"id": 1, "value": 6, "date": "02-10-2024"},
                        {"id": 2, "value": 10, "date": "14-10-2024"}
                    ],
                    "absences": [{"id": 5, "date": "03-10-2024", "excused": false}]
                },
                {
                    "classCourseId": 12, "courseId": 5, "courseName": "Chimie",
                    "grades": [{"id": 3, "value": 8}],
                    "absences": [{"id": 6, "date": "04-10-2024", "excused": true}]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_pupil_dashboard() {
        let state = SchoolState {
            record: Some(record()),
            ..Default::default()
        };
        let DashboardStats::Pupil { courses, average, recent_grades, unexcused_absences, .. } =
            state.dashboard(Role::Student)
        else {
            panic!("expected pupil stats");
        };
        assert_eq!(courses, 2);
        assert_eq!(average, Some(8.0));
        assert_eq!(unexcused_absences, 1);
        assert_eq!(
            recent_grades.iter().map(|g| g.value).collect::<Vec<_>>(),
            vec![10, 6, 8]
        );
    }

    #[test]
    fn test_unexcused_endpoint_overrides_aggregate() {
        let state = SchoolState {
            record: Some(record()),
            unexcused_absences: Some(4),
            ..Default::default()
        };
        let DashboardStats::Pupil { unexcused_absences, .. } = state.dashboard(Role::Parent) else {
            panic!("expected pupil stats");
        };
        assert_eq!(unexcused_absences, 4);
    }

    #[test]
    fn test_admin_dashboard_counts_lists() {
        let state = SchoolState {
            courses: vec![shared::Course { id: 1, name: "Fizică".to_string() }],
            ..Default::default()
        };
        assert_eq!(
            state.dashboard(Role::Admin),
            DashboardStats::Admin { students: 0, classrooms: 0, teachers: 0, courses: 1 }
        );
    }
}
