//! How each resource's local cache follows a successful write.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Resource {
    Classrooms,
    Students,
    Teachers,
    Parents,
    Courses,
    ClassCourses,
    Grades,
    Absences,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncPolicy {
    /// Append, replace or remove the one record by id
    PatchInPlace,
    /// Re-run the role-scoped load; the views depend on server aggregates
    ReloadScoped,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Resource::Classrooms,
        Resource::Students,
        Resource::Teachers,
        Resource::Parents,
        Resource::Courses,
        Resource::ClassCourses,
        Resource::Grades,
        Resource::Absences,
    ];

    pub const fn sync_policy(self) -> SyncPolicy {
        match self {
            Resource::Classrooms
            | Resource::Students
            | Resource::Teachers
            | Resource::Parents
            | Resource::Courses
            | Resource::ClassCourses => SyncPolicy::PatchInPlace,
            Resource::Grades | Resource::Absences => SyncPolicy::ReloadScoped,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Resource::Classrooms => "classrooms",
            Resource::Students => "students",
            Resource::Teachers => "teachers",
            Resource::Parents => "parents",
            Resource::Courses => "courses",
            Resource::ClassCourses => "class-courses",
            Resource::Grades => "grades",
            Resource::Absences => "absences",
        }
    }
}
