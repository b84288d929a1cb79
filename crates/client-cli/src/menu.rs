//! What each role is shown and what it may change.

use serde::Serialize;
use shared::Role;

use crate::context::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum View {
    Dashboard,
    Classrooms,
    Students,
    Teachers,
    Parents,
    Courses,
    Grades,
    MyClassroom,
}

impl View {
    pub fn title(self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Classrooms => "Classrooms",
            View::Students => "Students",
            View::Teachers => "Teachers",
            View::Parents => "Parents",
            View::Courses => "Courses",
            View::Grades => "Grades",
            View::MyClassroom => "My Classroom",
        }
    }
}

/// Sidebar entries, in display order
pub fn menu(role: Role) -> &'static [View] {
    match role {
        Role::Admin => &[
            View::Dashboard,
            View::Classrooms,
            View::Students,
            View::Teachers,
            View::Parents,
            View::Courses,
            View::Grades,
        ],
        Role::Teacher => &[View::Dashboard, View::Classrooms, View::Parents, View::MyClassroom],
        Role::Student => &[View::Dashboard, View::Classrooms, View::Courses, View::Grades],
        Role::Parent => &[View::Dashboard, View::Students, View::Parents],
    }
}

pub fn can_view(role: Role, view: View) -> bool {
    menu(role).contains(&view)
}

/// Whether create/edit/delete affordances are offered for `resource`
pub fn can_manage(role: Role, resource: Resource) -> bool {
    match role {
        Role::Admin => true,
        Role::Teacher => matches!(resource, Resource::Grades | Resource::Absences),
        Role::Student | Role::Parent => false,
    }
}
