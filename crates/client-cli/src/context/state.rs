use serde::Serialize;
use shared::{
    ClassCourse, Classroom, Course, Entity, Parent, Student, StudentRecord, Teacher,
};

/// Who the logged-in user is, resolved against backend records
#[derive(Debug, Clone, PartialEq)]
pub enum Profile {
    Admin,
    Teacher {
        teacher: Teacher,
        homeroom: Option<Classroom>,
    },
    Student {
        student: Student,
    },
    Parent {
        parent: Parent,
        child: Option<Student>,
    },
}

impl Profile {
    pub fn teacher(&self) -> Option<&Teacher> {
        match self {
            Profile::Teacher { teacher, .. } => Some(teacher),
            _ => None,
        }
    }

    /// The student whose grades this user follows
    pub fn pupil(&self) -> Option<&Student> {
        match self {
            Profile::Student { student } => Some(student),
            Profile::Parent { child, .. } => child.as_ref(),
            _ => None,
        }
    }
}

/// An endpoint whose failure was papered over with an empty result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Degraded {
    pub endpoint: String,
    pub error: String,
}

/// Role-scoped cache of backend data. Slices a role may not see stay empty.
#[derive(Debug, Clone, Default)]
pub struct SchoolState {
    pub profile: Option<Profile>,
    pub classrooms: Vec<Classroom>,
    pub students: Vec<Student>,
    pub teachers: Vec<Teacher>,
    pub parents: Vec<Parent>,
    pub courses: Vec<Course>,
    pub class_courses: Vec<ClassCourse>,
    /// Grades and absences of the followed student (student and parent roles)
    pub record: Option<StudentRecord>,
    pub unexcused_absences: Option<u64>,
    pub degraded: Vec<Degraded>,
}

impl SchoolState {
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }

    pub fn classroom(&self, id: i64) -> Option<&Classroom> {
        self.classrooms.iter().find(|c| c.id == id)
    }

    pub fn students_in(&self, classroom_id: i64) -> usize {
        self.students
            .iter()
            .filter(|s| s.classroom_id() == Some(classroom_id))
            .count()
    }

    pub fn classrooms_with_counts(&self) -> Vec<(&Classroom, usize)> {
        self.classrooms
            .iter()
            .map(|c| (c, self.students_in(c.id)))
            .collect()
    }

    /// Whether the logged-in teacher is assigned to this class course
    pub fn teaches(&self, class_course_id: i64) -> bool {
        matches!(self.profile, Some(Profile::Teacher { .. }))
            && self.class_courses.iter().any(|cc| cc.id == class_course_id)
    }

    /// Whether `classroom_id` is the logged-in teacher's homeroom class
    pub fn is_homeroom(&self, classroom_id: i64) -> bool {
        match &self.profile {
            Some(Profile::Teacher { homeroom: Some(homeroom), .. }) => homeroom.id == classroom_id,
            _ => false,
        }
    }

    /// Classroom name for a student row, "Unassigned" when unknown
    pub fn classroom_label(&self, student: &Student) -> String {
        if let Some(classroom) = &student.classroom {
            if !classroom.name.is_empty() {
                return classroom.name.clone();
            }
        }
        student
            .classroom_id()
            .and_then(|id| self.classroom(id))
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "Unassigned".to_string())
    }
}

pub(crate) fn upsert<T: Entity>(list: &mut Vec<T>, item: T) {
    match list.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(existing) => *existing = item,
        None => list.push(item),
    }
}

pub(crate) fn remove<T: Entity>(list: &mut Vec<T>, id: i64) {
    list.retain(|item| item.id() != id);
}

/// Keep the first occurrence of every id
pub(crate) fn dedup_by_id<T: Entity>(list: &mut Vec<T>) {
    let mut seen = std::collections::HashSet::new();
    list.retain(|item| seen.insert(item.id()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Course;

    fn course(id: i64, name: &str) -> Course {
        Course { id, name: name.to_string() }
    }

    #[test]
    fn test_upsert_replaces_or_appends() {
        let mut list = vec![course(1, "Matematică")];
        upsert(&mut list, course(2, "Fizică"));
        upsert(&mut list, course(1, "Algebră"));
        assert_eq!(list, vec![course(1, "Algebră"), course(2, "Fizică")]);

        remove(&mut list, 1);
        assert_eq!(list, vec![course(2, "Fizică")]);
    }

    #[test]
    fn test_dedup_keeps_first() {
        let mut list = vec![course(1, "a"), course(2, "b"), course(1, "c")];
        dedup_by_id(&mut list);
        assert_eq!(list, vec![course(1, "a"), course(2, "b")]);
    }

    fn teacher_state() -> SchoolState {
        let teacher: Teacher =
            serde_json::from_str(r#"{"id":42,"firstName":"Ion","lastName":"Popescu"}"#).unwrap();
        let homeroom: Classroom = serde_json::from_str(r#"{"id":7,"name":"9B"}"#).unwrap();
        SchoolState {
            profile: Some(Profile::Teacher { teacher, homeroom: Some(homeroom) }),
            class_courses: vec![serde_json::from_str(r#"{"id":11,"classroomId":3}"#).unwrap()],
            ..Default::default()
        }
    }

    #[test]
    fn test_teacher_scope() {
        let state = teacher_state();
        assert!(state.teaches(11));
        assert!(!state.teaches(12));
        assert!(state.is_homeroom(7));
        assert!(!state.is_homeroom(3));

        let admin = SchoolState {
            profile: Some(Profile::Admin),
            class_courses: state.class_courses.clone(),
            ..Default::default()
        };
        assert!(!admin.teaches(11));
        assert!(!admin.is_homeroom(7));
    }

    #[test]
    fn test_classroom_label() {
        let state = SchoolState {
            classrooms: vec![Classroom {
                id: 3,
                name: "12A".to_string(),
                level: Some(12),
                homeroom_teacher_id: None,
                homeroom_teacher: None,
            }],
            ..Default::default()
        };
        let mut student: Student =
            serde_json::from_str(r#"{"id":1,"firstName":"A","lastName":"B","classroomId":3}"#).unwrap();
        assert_eq!(state.classroom_label(&student), "12A");
        assert_eq!(state.classrooms_with_counts()[0].1, 0);

        student.classroom_id = Some(99);
        assert_eq!(state.classroom_label(&student), "Unassigned");
    }
}
