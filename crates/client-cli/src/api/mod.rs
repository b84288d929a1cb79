//! One thin function per backend route. No logic beyond path building.

mod absence_grades;
mod absences;
mod auth;
mod catalog;
mod class_courses;
mod classrooms;
mod courses;
mod export;
mod grades;
mod parents;
mod students;
mod teachers;

pub use absence_grades::AbsenceGradesApi;
pub use absences::AbsencesApi;
pub use auth::AuthApi;
pub use catalog::CatalogApi;
pub use class_courses::ClassCoursesApi;
pub use classrooms::ClassroomsApi;
pub use courses::CoursesApi;
pub use export::ExportApi;
pub use grades::GradesApi;
pub use parents::ParentsApi;
pub use students::StudentsApi;
pub use teachers::TeachersApi;

use crate::http::ApiClient;

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi(self)
    }

    pub fn students(&self) -> StudentsApi<'_> {
        StudentsApi(self)
    }

    pub fn teachers(&self) -> TeachersApi<'_> {
        TeachersApi(self)
    }

    pub fn parents(&self) -> ParentsApi<'_> {
        ParentsApi(self)
    }

    pub fn classrooms(&self) -> ClassroomsApi<'_> {
        ClassroomsApi(self)
    }

    pub fn courses(&self) -> CoursesApi<'_> {
        CoursesApi(self)
    }

    pub fn class_courses(&self) -> ClassCoursesApi<'_> {
        ClassCoursesApi(self)
    }

    pub fn grades(&self) -> GradesApi<'_> {
        GradesApi(self)
    }

    pub fn absences(&self) -> AbsencesApi<'_> {
        AbsencesApi(self)
    }

    pub fn absence_grades(&self) -> AbsenceGradesApi<'_> {
        AbsenceGradesApi(self)
    }

    pub fn catalog(&self) -> CatalogApi<'_> {
        CatalogApi(self)
    }

    pub fn export(&self) -> ExportApi<'_> {
        ExportApi(self)
    }
}

/// A lookup that answers 404 when nothing matches
pub(crate) fn optional<T>(result: crate::http::ApiResult<T>) -> crate::http::ApiResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
