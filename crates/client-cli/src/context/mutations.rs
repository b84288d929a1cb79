use serde::Serialize;
use shared::{
    Absence, AbsenceInput, BulkEvaluation, ClassCourse, ClassCourseInput, Classroom,
    ClassroomCatalog, ClassroomInput, Course, CourseCatalog, CourseInput, Grade, GradeInput,
    GradeUpdate, Parent, ParentInput, Role, Student, StudentInput, Teacher, TeacherInput,
};

use super::policy::{Resource, SyncPolicy};
use super::state::{remove, upsert, Profile, SchoolState};
use super::{SchoolContext, Ticket};
use crate::http::ApiResult;

/// Result of a write, shaped so callers can show `error` inline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Outcome<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn done() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

impl SchoolContext {
    /// Bring the cache in line after a successful write to `resource`.
    /// Nothing is applied once the issuing session has ended.
    async fn after_write(&self, ticket: Ticket, resource: Resource, patch: impl FnOnce(&mut SchoolState)) {
        match resource.sync_policy() {
            SyncPolicy::PatchInPlace => {
                let mut state = self.state.write().await;
                if self.is_live(&ticket) {
                    patch(&mut state);
                } else {
                    tracing::debug!("Session ended before the {} write settled", resource.label());
                    if self.api.session().current().is_none() {
                        *state = SchoolState::default();
                    }
                }
            }
            SyncPolicy::ReloadScoped => {
                if self.is_live(&ticket) {
                    self.refresh().await;
                } else if self.api.session().current().is_none() {
                    *self.state.write().await = SchoolState::default();
                }
            }
        }
    }

    async fn settle<T: Clone>(
        &self,
        ticket: Ticket,
        resource: Resource,
        result: ApiResult<T>,
        patch: impl FnOnce(&mut SchoolState, T),
    ) -> Outcome<T> {
        match result {
            Ok(value) => {
                let copy = value.clone();
                self.after_write(ticket, resource, move |state| patch(state, copy)).await;
                Outcome::ok(value)
            }
            Err(e) => {
                tracing::debug!("Write to {} failed: {}", resource.label(), e);
                Outcome::failed(e.to_string())
            }
        }
    }

    async fn settle_unit(
        &self,
        ticket: Ticket,
        resource: Resource,
        result: ApiResult<()>,
        patch: impl FnOnce(&mut SchoolState),
    ) -> Outcome<()> {
        match result {
            Ok(()) => {
                self.after_write(ticket, resource, patch).await;
                Outcome::done()
            }
            Err(e) => {
                tracing::debug!("Write to {} failed: {}", resource.label(), e);
                Outcome::failed(e.to_string())
            }
        }
    }

    // Classrooms

    pub async fn add_classroom(&self, input: &ClassroomInput) -> Outcome<Classroom> {
        let ticket = self.ticket();
        let result = self.api.classrooms().create(input).await;
        self.settle(ticket, Resource::Classrooms, result, |s, c| upsert(&mut s.classrooms, c))
            .await
    }

    pub async fn update_classroom(&self, id: i64, input: &ClassroomInput) -> Outcome<Classroom> {
        let ticket = self.ticket();
        let result = self.api.classrooms().update(id, input).await;
        self.settle(ticket, Resource::Classrooms, result, |s, c| upsert(&mut s.classrooms, c))
            .await
    }

    pub async fn delete_classroom(&self, id: i64) -> Outcome<()> {
        let ticket = self.ticket();
        let result = self.api.classrooms().delete(id).await;
        self.settle_unit(ticket, Resource::Classrooms, result, |s| remove(&mut s.classrooms, id))
            .await
    }

    /// A classroom with its full roster; None when either lookup fails
    pub async fn class_details(&self, id: i64) -> Option<(Classroom, Vec<Student>)> {
        let (classroom, students) = futures::join!(
            self.api.classrooms().get(id),
            self.api.students().by_classroom(id),
        );
        match (classroom, students) {
            (Ok(classroom), Ok(students)) => Some((classroom, students)),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("Error loading class details for {}: {}", id, e);
                None
            }
        }
    }

    // Students

    pub async fn add_student(&self, input: &StudentInput) -> Outcome<Student> {
        let ticket = self.ticket();
        let result = self.api.students().create(input).await;
        self.settle(ticket, Resource::Students, result, |s, v| upsert(&mut s.students, v))
            .await
    }

    pub async fn update_student(&self, id: i64, input: &StudentInput) -> Outcome<Student> {
        let ticket = self.ticket();
        let result = self.api.students().update(id, input).await;
        self.settle(ticket, Resource::Students, result, |s, v| upsert(&mut s.students, v))
            .await
    }

    pub async fn delete_student(&self, id: i64) -> Outcome<()> {
        let ticket = self.ticket();
        let result = self.api.students().delete(id).await;
        self.settle_unit(ticket, Resource::Students, result, |s| remove(&mut s.students, id))
            .await
    }

    // Teachers

    pub async fn add_teacher(&self, input: &TeacherInput) -> Outcome<Teacher> {
        let ticket = self.ticket();
        let result = self.api.teachers().create(input).await;
        self.settle(ticket, Resource::Teachers, result, |s, v| upsert(&mut s.teachers, v))
            .await
    }

    pub async fn update_teacher(&self, id: i64, input: &TeacherInput) -> Outcome<Teacher> {
        let ticket = self.ticket();
        let result = self.api.teachers().update(id, input).await;
        self.settle(ticket, Resource::Teachers, result, |s, v| upsert(&mut s.teachers, v))
            .await
    }

    pub async fn delete_teacher(&self, id: i64) -> Outcome<()> {
        let ticket = self.ticket();
        let result = self.api.teachers().delete(id).await;
        self.settle_unit(ticket, Resource::Teachers, result, |s| remove(&mut s.teachers, id))
            .await
    }

    // Parents

    pub async fn add_parent(&self, input: &ParentInput) -> Outcome<Parent> {
        let ticket = self.ticket();
        let result = self.api.parents().create(input).await;
        self.settle(ticket, Resource::Parents, result, |s, v| upsert(&mut s.parents, v))
            .await
    }

    pub async fn update_parent(&self, id: i64, input: &ParentInput) -> Outcome<Parent> {
        let ticket = self.ticket();
        let result = self.api.parents().update(id, input).await;
        self.settle(ticket, Resource::Parents, result, |s, v| upsert(&mut s.parents, v))
            .await
    }

    pub async fn delete_parent(&self, id: i64) -> Outcome<()> {
        let ticket = self.ticket();
        let result = self.api.parents().delete(id).await;
        self.settle_unit(ticket, Resource::Parents, result, |s| remove(&mut s.parents, id))
            .await
    }

    // Courses

    pub async fn add_course(&self, input: &CourseInput) -> Outcome<Course> {
        let ticket = self.ticket();
        let result = self.api.courses().create(input).await;
        self.settle(ticket, Resource::Courses, result, |s, v| upsert(&mut s.courses, v))
            .await
    }

    pub async fn update_course(&self, id: i64, input: &CourseInput) -> Outcome<Course> {
        let ticket = self.ticket();
        let result = self.api.courses().update(id, input).await;
        self.settle(ticket, Resource::Courses, result, |s, v| upsert(&mut s.courses, v))
            .await
    }

    pub async fn delete_course(&self, id: i64) -> Outcome<()> {
        let ticket = self.ticket();
        let result = self.api.courses().delete(id).await;
        self.settle_unit(ticket, Resource::Courses, result, |s| remove(&mut s.courses, id))
            .await
    }

    // Class courses

    pub async fn add_class_course(&self, input: &ClassCourseInput) -> Outcome<ClassCourse> {
        let ticket = self.ticket();
        let result = self.api.class_courses().create(input).await;
        self.settle(ticket, Resource::ClassCourses, result, |s, v| upsert(&mut s.class_courses, v))
            .await
    }

    pub async fn update_class_course(&self, id: i64, input: &ClassCourseInput) -> Outcome<ClassCourse> {
        let ticket = self.ticket();
        let result = self.api.class_courses().update(id, input).await;
        self.settle(ticket, Resource::ClassCourses, result, |s, v| upsert(&mut s.class_courses, v))
            .await
    }

    pub async fn delete_class_course(&self, id: i64) -> Outcome<()> {
        let ticket = self.ticket();
        let result = self.api.class_courses().delete(id).await;
        self.settle_unit(ticket, Resource::ClassCourses, result, |s| remove(&mut s.class_courses, id))
            .await
    }

    /// Whether the current user may record grades or absences in
    /// `class_course_id`. Teachers are held to the courses they teach and
    /// to their homeroom class; the latter needs a lookup of the course row.
    pub async fn may_record(&self, class_course_id: i64) -> bool {
        let Some(session) = self.api.session().current() else {
            return false;
        };
        match session.role {
            Role::Admin => true,
            Role::Student | Role::Parent => false,
            Role::Teacher => {
                let has_homeroom = {
                    let state = self.state.read().await;
                    if state.teaches(class_course_id) {
                        return true;
                    }
                    matches!(state.profile, Some(Profile::Teacher { homeroom: Some(_), .. }))
                };
                if !has_homeroom {
                    return false;
                }
                match self.api.class_courses().get(class_course_id).await {
                    Ok(cc) => match cc.classroom_id() {
                        Some(id) => self.state.read().await.is_homeroom(id),
                        None => false,
                    },
                    Err(e) => {
                        tracing::warn!("Could not check class course {}: {}", class_course_id, e);
                        false
                    }
                }
            }
        }
    }

    async fn refuse_outside_scope<T>(&self, class_course_id: i64) -> Option<Outcome<T>> {
        if self.may_record(class_course_id).await {
            None
        } else {
            Some(Outcome::failed(format!(
                "You can only record grades and absences for classes you teach (class course {})",
                class_course_id
            )))
        }
    }

    // Grades (no local list; the views read server aggregates)

    pub async fn add_grade(&self, input: &GradeInput) -> Outcome<Grade> {
        if let Some(refused) = self.refuse_outside_scope(input.class_course_id).await {
            return refused;
        }
        let ticket = self.ticket();
        let result = self.api.grades().create(input).await;
        self.settle(ticket, Resource::Grades, result, |_, _| {}).await
    }

    pub async fn update_grade(&self, id: i64, input: &GradeUpdate) -> Outcome<Grade> {
        let ticket = self.ticket();
        let result = self.api.grades().update(id, input).await;
        self.settle(ticket, Resource::Grades, result, |_, _| {}).await
    }

    pub async fn delete_grade(&self, id: i64) -> Outcome<()> {
        let ticket = self.ticket();
        let result = self.api.grades().delete(id).await;
        self.settle_unit(ticket, Resource::Grades, result, |_| {}).await
    }

    pub async fn bulk_evaluate(&self, payload: &BulkEvaluation) -> Outcome<()> {
        if payload.entries.is_empty() {
            return Outcome::failed("Nothing to submit: every student was left blank");
        }
        if let Some(refused) = self.refuse_outside_scope(payload.class_course_id).await {
            return refused;
        }
        let ticket = self.ticket();
        let result = self.api.grades().bulk_create(payload).await;
        self.settle_unit(ticket, Resource::Grades, result, |_| {}).await
    }

    // Absences

    pub async fn add_absence(&self, input: &AbsenceInput) -> Outcome<Absence> {
        if let Some(refused) = self.refuse_outside_scope(input.class_course_id).await {
            return refused;
        }
        let ticket = self.ticket();
        let result = self.api.absences().create(input).await;
        self.settle(ticket, Resource::Absences, result, |_, _| {}).await
    }

    /// `date` in backend `DD-MM-YYYY` form
    pub async fn update_absence(&self, id: i64, date: &str, excused: bool) -> Outcome<Option<Absence>> {
        let ticket = self.ticket();
        let result = self.api.absences().update(id, date, excused).await;
        self.settle(ticket, Resource::Absences, result, |_, _| {}).await
    }

    pub async fn toggle_absence_excused(&self, id: i64) -> Outcome<Option<Absence>> {
        let ticket = self.ticket();
        let result = self.api.absences().toggle_excused(id).await;
        self.settle(ticket, Resource::Absences, result, |_, _| {}).await
    }

    pub async fn delete_absence(&self, id: i64) -> Outcome<()> {
        let ticket = self.ticket();
        let result = self.api.absences().delete(id).await;
        self.settle_unit(ticket, Resource::Absences, result, |_| {}).await
    }

    // Catalog reads, narrow fetches outside the cache

    pub async fn classroom_catalog(&self, classroom_id: i64) -> Option<ClassroomCatalog> {
        self.api
            .catalog()
            .classroom(classroom_id)
            .await
            .map_err(|e| tracing::warn!("Error loading classroom catalog: {}", e))
            .ok()
    }

    pub async fn course_catalog(&self, classroom_id: i64, class_course_id: i64) -> Option<CourseCatalog> {
        self.api
            .catalog()
            .course(classroom_id, class_course_id)
            .await
            .map_err(|e| tracing::warn!("Error loading course catalog: {}", e))
            .ok()
    }
}
