//! Students, teachers and parents: same shape of list and modal for each.

use anyhow::Result;
use clap::{Args, Subcommand};
use schoolbook::context::{Resource, SchoolContext};
use schoolbook::forms::StudentForm;
use schoolbook::menu::View;
use schoolbook::session::Session;
use shared::{ParentInput, TeacherInput};

use super::{or_dash, print_table, report, require_manage, require_view};

#[derive(Args)]
pub struct PersonArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long, default_value = "")]
    registration_code: String,
}

#[derive(Subcommand)]
pub enum StudentAction {
    List,
    Add {
        #[command(flatten)]
        person: PersonArgs,
        #[arg(long)]
        classroom: i64,
    },
    Edit {
        id: i64,
        #[command(flatten)]
        person: PersonArgs,
        #[arg(long)]
        classroom: i64,
    },
    Delete { id: i64 },
    /// Ask the backend for a fresh registration code
    Code,
}

#[derive(Subcommand)]
pub enum TeacherAction {
    List,
    Add {
        #[command(flatten)]
        person: PersonArgs,
    },
    Edit {
        id: i64,
        #[command(flatten)]
        person: PersonArgs,
    },
    Delete { id: i64 },
    Code,
}

#[derive(Subcommand)]
pub enum ParentAction {
    List,
    Add {
        #[command(flatten)]
        person: PersonArgs,
        #[arg(long)]
        student: Option<i64>,
    },
    Edit {
        id: i64,
        #[command(flatten)]
        person: PersonArgs,
        #[arg(long)]
        student: Option<i64>,
    },
    Delete { id: i64 },
    Code,
}

async fn student_form(ctx: &SchoolContext, person: PersonArgs, classroom: i64) -> Result<shared::StudentInput> {
    let form = StudentForm {
        first_name: person.first_name,
        last_name: person.last_name,
        registration_code: person.registration_code,
        classroom_id: Some(classroom),
    };
    let state = ctx.state().await;
    Ok(form.validate(&state.classrooms)?)
}

pub async fn students(ctx: &SchoolContext, session: &Session, action: Option<StudentAction>) -> Result<()> {
    match action.unwrap_or(StudentAction::List) {
        StudentAction::List => {
            require_view(session, View::Students)?;
            let state = ctx.state().await;
            let rows: Vec<Vec<String>> = state
                .students
                .iter()
                .map(|s| {
                    vec![
                        s.id.to_string(),
                        s.full_name(),
                        state.classroom_label(s),
                        or_dash(s.registration_code.clone()),
                    ]
                })
                .collect();
            print_table(&["ID", "Name", "Classroom", "Registration code"], &rows);
        }
        StudentAction::Add { person, classroom } => {
            require_manage(session, Resource::Students)?;
            let input = student_form(ctx, person, classroom).await?;
            report(ctx.add_student(&input).await, "Student created")?;
        }
        StudentAction::Edit { id, person, classroom } => {
            require_manage(session, Resource::Students)?;
            let input = student_form(ctx, person, classroom).await?;
            report(ctx.update_student(id, &input).await, "Student updated")?;
        }
        StudentAction::Delete { id } => {
            require_manage(session, Resource::Students)?;
            report(ctx.delete_student(id).await, "Student deleted")?;
        }
        StudentAction::Code => {
            require_manage(session, Resource::Students)?;
            println!("{}", ctx.api().students().generate_registration_code().await?);
        }
    }
    Ok(())
}

fn teacher_input(person: PersonArgs) -> TeacherInput {
    TeacherInput {
        first_name: person.first_name,
        last_name: person.last_name,
        registration_code: person.registration_code,
    }
}

pub async fn teachers(ctx: &SchoolContext, session: &Session, action: Option<TeacherAction>) -> Result<()> {
    match action.unwrap_or(TeacherAction::List) {
        TeacherAction::List => {
            require_view(session, View::Teachers)?;
            let state = ctx.state().await;
            let rows: Vec<Vec<String>> = state
                .teachers
                .iter()
                .map(|t| {
                    vec![
                        t.id.to_string(),
                        t.full_name(),
                        or_dash(t.registration_code.clone()),
                        or_dash(t.user.as_ref().map(|u| u.username.clone())),
                    ]
                })
                .collect();
            print_table(&["ID", "Name", "Registration code", "Account"], &rows);
        }
        TeacherAction::Add { person } => {
            require_manage(session, Resource::Teachers)?;
            report(ctx.add_teacher(&teacher_input(person)).await, "Teacher created")?;
        }
        TeacherAction::Edit { id, person } => {
            require_manage(session, Resource::Teachers)?;
            report(ctx.update_teacher(id, &teacher_input(person)).await, "Teacher updated")?;
        }
        TeacherAction::Delete { id } => {
            require_manage(session, Resource::Teachers)?;
            report(ctx.delete_teacher(id).await, "Teacher deleted")?;
        }
        TeacherAction::Code => {
            require_manage(session, Resource::Teachers)?;
            println!("{}", ctx.api().teachers().generate_registration_code().await?);
        }
    }
    Ok(())
}

fn parent_input(person: PersonArgs, student: Option<i64>) -> ParentInput {
    ParentInput {
        first_name: person.first_name,
        last_name: person.last_name,
        registration_code: person.registration_code,
        student_id: student,
    }
}

pub async fn parents(ctx: &SchoolContext, session: &Session, action: Option<ParentAction>) -> Result<()> {
    match action.unwrap_or(ParentAction::List) {
        ParentAction::List => {
            require_view(session, View::Parents)?;
            let state = ctx.state().await;
            let rows: Vec<Vec<String>> = state
                .parents
                .iter()
                .map(|p| {
                    let child = p
                        .student
                        .as_ref()
                        .map(|s| s.full_name())
                        .or_else(|| {
                            let id = p.student_id()?;
                            state.students.iter().find(|s| s.id == id).map(|s| s.full_name())
                        });
                    vec![p.id.to_string(), p.full_name(), or_dash(child), or_dash(p.registration_code.clone())]
                })
                .collect();
            print_table(&["ID", "Name", "Child", "Registration code"], &rows);
        }
        ParentAction::Add { person, student } => {
            require_manage(session, Resource::Parents)?;
            report(ctx.add_parent(&parent_input(person, student)).await, "Parent created")?;
        }
        ParentAction::Edit { id, person, student } => {
            require_manage(session, Resource::Parents)?;
            report(ctx.update_parent(id, &parent_input(person, student)).await, "Parent updated")?;
        }
        ParentAction::Delete { id } => {
            require_manage(session, Resource::Parents)?;
            report(ctx.delete_parent(id).await, "Parent deleted")?;
        }
        ParentAction::Code => {
            require_manage(session, Resource::Parents)?;
            println!("{}", ctx.api().parents().generate_registration_code().await?);
        }
    }
    Ok(())
}
