use shared::{RosterEntry, StudentRecord};

use crate::http::{ApiClient, ApiResult};

/// Grades and absences pre-joined by the backend
#[derive(Clone, Copy)]
pub struct AbsenceGradesApi<'a>(pub(crate) &'a ApiClient);

impl AbsenceGradesApi<'_> {
    pub async fn by_student(self, student_id: i64) -> ApiResult<StudentRecord> {
        self.0.get(&format!("/api/absence-grades/student/{}", student_id)).await
    }

    pub async fn by_class_course(self, class_course_id: i64) -> ApiResult<Vec<RosterEntry>> {
        self.0.get(&format!("/api/absence-grades/course/{}", class_course_id)).await
    }

    pub async fn by_classroom(self, classroom_id: i64) -> ApiResult<Vec<StudentRecord>> {
        self.0.get(&format!("/api/absence-grades/classroom/{}", classroom_id)).await
    }
}
