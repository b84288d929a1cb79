use anyhow::{bail, Result};
use clap::Subcommand;
use schoolbook::context::{Profile, Resource, SchoolContext};
use schoolbook::menu::View;
use schoolbook::session::Session;
use shared::ClassroomInput;

use super::{or_dash, print_table, report, require_manage, require_view};

#[derive(Subcommand)]
pub enum ClassroomAction {
    List,
    /// Classroom with its roster
    Show { id: i64 },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        level: Option<i32>,
        #[arg(long)]
        homeroom_teacher: Option<i64>,
    },
    Edit {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        level: Option<i32>,
        #[arg(long)]
        homeroom_teacher: Option<i64>,
    },
    Delete { id: i64 },
}

pub async fn run(ctx: &SchoolContext, session: &Session, action: Option<ClassroomAction>) -> Result<()> {
    match action.unwrap_or(ClassroomAction::List) {
        ClassroomAction::List => {
            require_view(session, View::Classrooms)?;
            let state = ctx.state().await;
            let rows: Vec<Vec<String>> = state
                .classrooms_with_counts()
                .into_iter()
                .map(|(c, count)| {
                    vec![
                        c.id.to_string(),
                        c.name.clone(),
                        or_dash(c.level),
                        or_dash(c.homeroom_teacher.as_ref().map(|t| t.full_name())),
                        count.to_string(),
                    ]
                })
                .collect();
            print_table(&["ID", "Name", "Level", "Homeroom teacher", "Students"], &rows);
        }
        ClassroomAction::Show { id } => {
            require_view(session, View::Classrooms)?;
            let Some((classroom, students)) = ctx.class_details(id).await else {
                bail!("Could not load classroom {}", id);
            };
            println!("\x1b[1m{}\x1b[0m (level {})", classroom.name, or_dash(classroom.level));
            if let Some(teacher) = &classroom.homeroom_teacher {
                println!("Homeroom teacher: {}", teacher.full_name());
            }
            let rows: Vec<Vec<String>> = students
                .iter()
                .map(|s| vec![s.id.to_string(), s.full_name(), or_dash(s.registration_code.clone())])
                .collect();
            print_table(&["ID", "Student", "Registration code"], &rows);
        }
        ClassroomAction::Add { name, level, homeroom_teacher } => {
            require_manage(session, Resource::Classrooms)?;
            let input = ClassroomInput { name, level, homeroom_teacher_id: homeroom_teacher };
            if let Some(c) = report(ctx.add_classroom(&input).await, "Classroom created")? {
                println!("id {}", c.id);
            }
        }
        ClassroomAction::Edit { id, name, level, homeroom_teacher } => {
            require_manage(session, Resource::Classrooms)?;
            let input = ClassroomInput { name, level, homeroom_teacher_id: homeroom_teacher };
            report(ctx.update_classroom(id, &input).await, "Classroom updated")?;
        }
        ClassroomAction::Delete { id } => {
            require_manage(session, Resource::Classrooms)?;
            report(ctx.delete_classroom(id).await, "Classroom deleted")?;
        }
    }
    Ok(())
}

pub async fn my_classroom(ctx: &SchoolContext, session: &Session) -> Result<()> {
    require_view(session, View::MyClassroom)?;
    let state = ctx.state().await;
    let Some(Profile::Teacher { homeroom, .. }) = &state.profile else {
        bail!("No teacher record loaded for {}", session.display_name);
    };
    let Some(homeroom) = homeroom else {
        println!("You are not a homeroom teacher.");
        return Ok(());
    };

    println!("\x1b[1m{}\x1b[0m (level {})", homeroom.name, or_dash(homeroom.level));
    let rows: Vec<Vec<String>> = state
        .students
        .iter()
        .filter(|s| s.classroom_id() == Some(homeroom.id))
        .map(|s| {
            let parents = state
                .parents
                .iter()
                .filter(|p| p.student_id() == Some(s.id))
                .map(|p| p.full_name())
                .collect::<Vec<_>>()
                .join(", ");
            vec![s.id.to_string(), s.full_name(), or_dash((!parents.is_empty()).then_some(parents))]
        })
        .collect();
    print_table(&["ID", "Student", "Parents"], &rows);
    Ok(())
}
