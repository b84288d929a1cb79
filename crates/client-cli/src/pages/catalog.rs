use anyhow::{bail, Context, Result};
use clap::Subcommand;
use schoolbook::context::SchoolContext;
use schoolbook::menu::View;
use schoolbook::session::Session;
use shared::Role;
use std::path::PathBuf;

use super::{or_dash, print_table, require_view};

#[derive(Subcommand)]
pub enum CatalogAction {
    /// Every student against every course of a classroom
    Classroom { id: i64 },
    /// One course of a classroom
    Course { classroom: i64, class_course: i64 },
}

#[derive(Subcommand)]
pub enum ExportAction {
    /// Parents of the homeroom class of a teacher
    Parents {
        #[arg(long)]
        teacher: Option<i64>,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Students of the homeroom class of a teacher
    Students {
        #[arg(long)]
        teacher: Option<i64>,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// All teachers
    Teachers {
        #[arg(short, long)]
        out: PathBuf,
    },
}

fn marks(grades: &[shared::GradeEntry], absences: &[shared::AbsenceEntry]) -> String {
    let grades = grades.iter().map(|g| g.value.to_string()).collect::<Vec<_>>().join(" ");
    let unexcused = absences.iter().filter(|a| !a.excused).count();
    match (grades.is_empty(), absences.is_empty()) {
        (true, true) => "-".to_string(),
        (_, true) => grades,
        _ => format!("{} ({}a/{}u)", grades, absences.len(), unexcused).trim().to_string(),
    }
}

pub async fn catalog(ctx: &SchoolContext, session: &Session, action: CatalogAction) -> Result<()> {
    require_view(session, View::Classrooms)?;

    match action {
        CatalogAction::Classroom { id } => {
            let Some(catalog) = ctx.classroom_catalog(id).await else {
                bail!("Could not load the catalog of classroom {}", id);
            };
            println!("\x1b[1m{}\x1b[0m", catalog.classroom_name);

            let mut headers = vec!["Student"];
            headers.extend(catalog.courses.iter().map(|c| c.course_name.as_str()));
            let rows: Vec<Vec<String>> = catalog
                .students
                .iter()
                .map(|student| {
                    let mut row = vec![student.student_name.clone()];
                    for course in &catalog.courses {
                        let cell = student
                            .courses
                            .iter()
                            .find(|c| c.class_course_id == course.class_course_id)
                            .map(|c| marks(&c.grades, &c.absences));
                        row.push(or_dash(cell));
                    }
                    row
                })
                .collect();
            print_table(&headers, &rows);
        }
        CatalogAction::Course { classroom, class_course } => {
            let Some(catalog) = ctx.course_catalog(classroom, class_course).await else {
                bail!("Could not load the catalog of class course {}", class_course);
            };
            println!(
                "\x1b[1m{}\x1b[0m {}",
                catalog.course_name,
                or_dash(catalog.teacher_name.clone())
            );
            let rows: Vec<Vec<String>> = catalog
                .students
                .iter()
                .map(|s| vec![s.student_id.to_string(), s.student_name.clone(), marks(&s.grades, &s.absences)])
                .collect();
            print_table(&["ID", "Student", "Grades (absences/unexcused)"], &rows);
        }
    }
    Ok(())
}

/// The homeroom exports default to the logged-in teacher
async fn homeroom_teacher(ctx: &SchoolContext, session: &Session, teacher: Option<i64>) -> Result<i64> {
    if let Some(id) = teacher {
        return Ok(id);
    }
    let state = ctx.state().await;
    match state.profile.as_ref().and_then(|p| p.teacher()) {
        Some(teacher) => Ok(teacher.id),
        None => bail!("{} has no homeroom; pass --teacher", session.display_name),
    }
}

pub async fn export(ctx: &SchoolContext, session: &Session, action: ExportAction) -> Result<()> {
    if !matches!(session.role, Role::Admin | Role::Teacher) {
        bail!("Exports are not available to {}", session.display_name);
    }

    let (bytes, out) = match action {
        ExportAction::Parents { teacher, out } => {
            let id = homeroom_teacher(ctx, session, teacher).await?;
            (ctx.api().export().parents_of_homeroom(id).await?, out)
        }
        ExportAction::Students { teacher, out } => {
            let id = homeroom_teacher(ctx, session, teacher).await?;
            (ctx.api().export().students_of_homeroom(id).await?, out)
        }
        ExportAction::Teachers { out } => {
            if session.role != Role::Admin {
                bail!("Only the director can export teachers");
            }
            (ctx.api().export().teachers().await?, out)
        }
    };

    std::fs::write(&out, &bytes).with_context(|| format!("Failed to write {}", out.display()))?;
    println!("\x1b[32m✓ Saved {} bytes to {}\x1b[0m", bytes.len(), out.display());
    Ok(())
}
