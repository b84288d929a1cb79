use anyhow::Result;
use clap::Subcommand;
use schoolbook::context::{Resource, SchoolContext};
use schoolbook::forms::validate_class_course;
use schoolbook::menu::View;
use schoolbook::session::Session;
use shared::{ClassCourseInput, CourseInput};

use super::{or_dash, print_table, report, require_manage, require_view};

#[derive(Subcommand)]
pub enum CourseAction {
    List,
    Add { name: String },
    Edit { id: i64, name: String },
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum ClassCourseAction {
    List {
        /// Only the assignments of this classroom
        #[arg(long)]
        classroom: Option<i64>,
    },
    Assign {
        #[arg(long)]
        classroom: i64,
        #[arg(long)]
        course: i64,
        #[arg(long)]
        teacher: i64,
    },
    Edit {
        id: i64,
        #[arg(long)]
        classroom: i64,
        #[arg(long)]
        course: i64,
        #[arg(long)]
        teacher: i64,
    },
    Delete { id: i64 },
}

pub async fn courses(ctx: &SchoolContext, session: &Session, action: Option<CourseAction>) -> Result<()> {
    match action.unwrap_or(CourseAction::List) {
        CourseAction::List => {
            require_view(session, View::Courses)?;
            let state = ctx.state().await;
            let rows: Vec<Vec<String>> = state
                .courses
                .iter()
                .map(|c| vec![c.id.to_string(), c.name.clone()])
                .collect();
            print_table(&["ID", "Course"], &rows);
        }
        CourseAction::Add { name } => {
            require_manage(session, Resource::Courses)?;
            report(ctx.add_course(&CourseInput { name }).await, "Course created")?;
        }
        CourseAction::Edit { id, name } => {
            require_manage(session, Resource::Courses)?;
            report(ctx.update_course(id, &CourseInput { name }).await, "Course updated")?;
        }
        CourseAction::Delete { id } => {
            require_manage(session, Resource::Courses)?;
            report(ctx.delete_course(id).await, "Course deleted")?;
        }
    }
    Ok(())
}

pub async fn class_courses(
    ctx: &SchoolContext,
    session: &Session,
    action: Option<ClassCourseAction>,
) -> Result<()> {
    match action.unwrap_or(ClassCourseAction::List { classroom: None }) {
        ClassCourseAction::List { classroom } => {
            // Every role that sees classrooms sees what is taught in them
            require_view(session, View::Classrooms)?;
            let state = ctx.state().await;
            let rows: Vec<Vec<String>> = state
                .class_courses
                .iter()
                .filter(|cc| classroom.is_none() || cc.classroom_id() == classroom)
                .map(|cc| {
                    vec![
                        cc.id.to_string(),
                        cc.label(),
                        or_dash(cc.teacher.as_ref().map(|t| t.full_name())),
                    ]
                })
                .collect();
            print_table(&["ID", "Course - Class", "Teacher"], &rows);
        }
        ClassCourseAction::Assign { classroom, course, teacher } => {
            require_manage(session, Resource::ClassCourses)?;
            let input = ClassCourseInput { classroom_id: classroom, course_id: course, teacher_id: teacher };
            validate_class_course(&input, &ctx.state().await.class_courses)?;
            report(ctx.add_class_course(&input).await, "Course assigned")?;
        }
        ClassCourseAction::Edit { id, classroom, course, teacher } => {
            require_manage(session, Resource::ClassCourses)?;
            let input = ClassCourseInput { classroom_id: classroom, course_id: course, teacher_id: teacher };
            let others: Vec<_> = {
                let state = ctx.state().await;
                state.class_courses.iter().filter(|cc| cc.id != id).cloned().collect()
            };
            validate_class_course(&input, &others)?;
            report(ctx.update_class_course(id, &input).await, "Assignment updated")?;
        }
        ClassCourseAction::Delete { id } => {
            require_manage(session, Resource::ClassCourses)?;
            report(ctx.delete_class_course(id).await, "Assignment deleted")?;
        }
    }
    Ok(())
}
