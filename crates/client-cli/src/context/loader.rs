//! Role-scoped initial load.
//!
//! Every endpoint failure is downgraded to an empty result and recorded in
//! [`SchoolState::degraded`], so one missing permission leaves a partial
//! dashboard rather than none.

use futures::future::join_all;
use shared::{Classroom, ClassroomRef, Role, Student};

use super::state::{dedup_by_id, Degraded, Profile, SchoolState};
use crate::http::{ApiClient, ApiResult};
use crate::session::Session;

/// Collects the endpoints that fell back to empty
#[derive(Default)]
struct Fallback {
    degraded: Vec<Degraded>,
}

impl Fallback {
    fn or_empty<T: Default>(&mut self, endpoint: &str, result: ApiResult<T>) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                self.note(endpoint, e.to_string());
                T::default()
            }
        }
    }

    fn note(&mut self, endpoint: &str, error: String) {
        tracing::warn!(endpoint, error = %error, "Load failed, continuing with empty data");
        self.degraded.push(Degraded {
            endpoint: endpoint.to_string(),
            error,
        });
    }
}

pub(crate) async fn load(api: &ApiClient, session: &Session) -> SchoolState {
    let mut fallback = Fallback::default();
    let mut state = match session.role {
        Role::Admin => load_admin(api, &mut fallback).await,
        Role::Teacher => load_teacher(api, session, &mut fallback).await,
        Role::Student => load_student(api, session, &mut fallback).await,
        Role::Parent => load_parent(api, session, &mut fallback).await,
    };
    state.degraded = fallback.degraded;

    tracing::info!(
        role = %session.role,
        classrooms = state.classrooms.len(),
        students = state.students.len(),
        degraded = state.degraded.len(),
        "Loaded school data"
    );
    state
}

async fn load_admin(api: &ApiClient, fallback: &mut Fallback) -> SchoolState {
    let (classrooms, students, teachers, parents, courses, class_courses) = futures::join!(
        api.classrooms().list(),
        api.students().list(),
        api.teachers().list(),
        api.parents().list(),
        api.courses().list(),
        api.class_courses().list(),
    );

    SchoolState {
        profile: Some(Profile::Admin),
        classrooms: fallback.or_empty("/classrooms", classrooms),
        students: fallback.or_empty("/students", students),
        teachers: fallback.or_empty("/teachers", teachers),
        parents: fallback.or_empty("/parents", parents),
        courses: fallback.or_empty("/courses", courses),
        class_courses: fallback.or_empty("/class-courses", class_courses),
        ..Default::default()
    }
}

async fn load_teacher(api: &ApiClient, session: &Session, fallback: &mut Fallback) -> SchoolState {
    let Some(user_id) = session.user_id else {
        fallback.note("/teachers/user", "token carries no userId".to_string());
        return SchoolState::default();
    };
    let endpoint = format!("/teachers/user/{}", user_id);
    let teacher = match api.teachers().by_user(user_id).await {
        Ok(Some(teacher)) => teacher,
        Ok(None) => {
            fallback.note(&endpoint, "no teacher record for this user".to_string());
            return SchoolState::default();
        }
        Err(e) => {
            fallback.note(&endpoint, e.to_string());
            return SchoolState::default();
        }
    };

    let class_courses = fallback.or_empty(
        &format!("/class-courses/teacher/{}", teacher.id),
        api.class_courses().by_teacher(teacher.id).await,
    );
    let homeroom = fallback.or_empty(
        &format!("/classrooms/teacher/{}", teacher.id),
        api.classrooms().by_homeroom_teacher(teacher.id).await,
    );

    // Classrooms of the taught courses in first-seen order; rows that only
    // carry an id are completed with a lookup
    let mut slots: Vec<(i64, Option<Classroom>)> = Vec::new();
    for cc in &class_courses {
        let Some(id) = cc.classroom_id() else { continue };
        let embedded = cc.classroom.clone().map(Classroom::from);
        match slots.iter_mut().find(|(seen, _)| *seen == id) {
            Some((_, slot)) => {
                if slot.is_none() {
                    *slot = embedded;
                }
            }
            None => slots.push((id, embedded)),
        }
    }
    let bare: Vec<i64> = slots
        .iter()
        .filter(|(_, slot)| slot.is_none())
        .map(|(id, _)| *id)
        .filter(|id| homeroom.as_ref().map_or(true, |h| h.id != *id))
        .collect();
    let lookups = join_all(bare.iter().map(|id| api.classrooms().get(*id))).await;
    for (id, result) in bare.iter().zip(lookups) {
        match result {
            Ok(classroom) => {
                if let Some((_, slot)) = slots.iter_mut().find(|(seen, _)| seen == id) {
                    *slot = Some(classroom);
                }
            }
            Err(e) => fallback.note(&format!("/classrooms/{}", id), e.to_string()),
        }
    }

    let mut classrooms: Vec<Classroom> = Vec::new();
    for (id, slot) in slots {
        match (slot, &homeroom) {
            (_, Some(homeroom)) if homeroom.id == id => classrooms.push(homeroom.clone()),
            (Some(classroom), _) => classrooms.push(classroom),
            (None, _) => {}
        }
    }
    if let Some(homeroom) = &homeroom {
        if !classrooms.iter().any(|c| c.id == homeroom.id) {
            classrooms.push(homeroom.clone());
        }
    }
    dedup_by_id(&mut classrooms);

    let (students, parents, courses) = futures::join!(
        join_all(classrooms.iter().map(|c| api.students().by_classroom(c.id))),
        join_all(classrooms.iter().map(|c| api.parents().by_classroom(c.id))),
        api.courses().list(),
    );

    let mut all_students = Vec::new();
    for (classroom, result) in classrooms.iter().zip(students) {
        all_students.extend(fallback.or_empty(&format!("/students/classroom/{}", classroom.id), result));
    }
    dedup_by_id(&mut all_students);

    let mut all_parents = Vec::new();
    for (classroom, result) in classrooms.iter().zip(parents) {
        all_parents.extend(fallback.or_empty(&format!("/parents/classroom/{}", classroom.id), result));
    }
    dedup_by_id(&mut all_parents);

    SchoolState {
        profile: Some(Profile::Teacher { teacher, homeroom }),
        classrooms,
        students: all_students,
        parents: all_parents,
        courses: fallback.or_empty("/courses", courses),
        class_courses,
        ..Default::default()
    }
}

async fn load_student(api: &ApiClient, session: &Session, fallback: &mut Fallback) -> SchoolState {
    let Some(user_id) = session.user_id else {
        fallback.note("/students/user", "token carries no userId".to_string());
        return SchoolState::default();
    };
    let endpoint = format!("/students/user/{}", user_id);
    let student = match api.students().by_user(user_id).await {
        Ok(Some(student)) => student,
        Ok(None) => {
            fallback.note(&endpoint, "no student record for this user".to_string());
            return SchoolState::default();
        }
        Err(e) => {
            fallback.note(&endpoint, e.to_string());
            return SchoolState::default();
        }
    };

    let mut state = load_pupil(api, &student, fallback).await;
    state.students = vec![student.clone()];
    state.profile = Some(Profile::Student { student });
    state
}

async fn load_parent(api: &ApiClient, session: &Session, fallback: &mut Fallback) -> SchoolState {
    let Some(user_id) = session.user_id else {
        fallback.note("/parents/user", "token carries no userId".to_string());
        return SchoolState::default();
    };
    let endpoint = format!("/parents/user/{}", user_id);
    let parent = match api.parents().by_user(user_id).await {
        Ok(Some(parent)) => parent,
        Ok(None) => {
            fallback.note(&endpoint, "no parent record for this user".to_string());
            return SchoolState::default();
        }
        Err(e) => {
            fallback.note(&endpoint, e.to_string());
            return SchoolState::default();
        }
    };

    let child = match api.students().by_parent(parent.id).await {
        Ok(child) => child,
        Err(e) => {
            fallback.note(&format!("/students/parent/{}", parent.id), e.to_string());
            None
        }
    };

    let mut state = match &child {
        Some(child) => {
            let mut state = load_pupil(api, child, fallback).await;
            state.students = vec![child.clone()];
            state
        }
        None => SchoolState::default(),
    };
    state.parents = vec![parent.clone()];
    state.profile = Some(Profile::Parent { parent, child });
    state
}

/// Classroom, grade/absence aggregate and unexcused count of one student.
/// Class courses and courses come out of the aggregate rather than extra
/// list calls.
async fn load_pupil(api: &ApiClient, student: &Student, fallback: &mut Fallback) -> SchoolState {
    let classroom_lookup = async {
        match student.classroom_id() {
            Some(id) => api.classrooms().get(id).await.map(Some),
            None => Ok(None),
        }
    };
    let (classroom, record, unexcused) = futures::join!(
        classroom_lookup,
        api.absence_grades().by_student(student.id),
        api.absences().unexcused_for_student(student.id),
    );

    let classroom = match classroom {
        Ok(classroom) => classroom,
        Err(e) => {
            let id = student.classroom_id().unwrap_or_default();
            fallback.note(&format!("/classrooms/{}", id), e.to_string());
            // Fall back to whatever the student row embeds
            student.classroom.clone().map(Classroom::from)
        }
    };
    let record = fallback.or_empty(&format!("/api/absence-grades/student/{}", student.id), record);
    let unexcused = match unexcused {
        Ok(count) => Some(count),
        Err(e) => {
            fallback.note(&format!("/api/absences/student/{}/unexcused", student.id), e.to_string());
            None
        }
    };

    let summary: Option<ClassroomRef> = classroom.as_ref().map(Classroom::summary);
    SchoolState {
        class_courses: record.class_courses(summary.as_ref()),
        courses: record.courses(),
        classrooms: classroom.into_iter().collect(),
        record: Some(record),
        unexcused_absences: unexcused,
        ..Default::default()
    }
}
