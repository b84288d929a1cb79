//! Terminal views. Each page reads the loaded state, offers the actions the
//! role is allowed, and prints a failed write's message inline.

mod catalog;
mod classrooms;
mod courses;
mod dashboard;
mod grades;
mod people;

use anyhow::{bail, Result};
use clap::Subcommand;
use schoolbook::context::{Outcome, Resource, SchoolContext};
use schoolbook::menu::{can_manage, can_view, View};
use schoolbook::session::Session;

use catalog::{CatalogAction, ExportAction};
use classrooms::ClassroomAction;
use courses::{ClassCourseAction, CourseAction};
use grades::{AbsenceAction, EvaluateArgs, GradeAction};
use people::{ParentAction, StudentAction, TeacherAction};

#[derive(Subcommand)]
pub enum Page {
    /// Summary figures for the logged-in user
    Dashboard,
    /// The sidebar entries available to the logged-in user
    Menu,
    /// Classrooms and their rosters
    Classrooms {
        #[command(subcommand)]
        action: Option<ClassroomAction>,
    },
    /// Homeroom class of the logged-in teacher
    MyClassroom,
    Students {
        #[command(subcommand)]
        action: Option<StudentAction>,
    },
    Teachers {
        #[command(subcommand)]
        action: Option<TeacherAction>,
    },
    Parents {
        #[command(subcommand)]
        action: Option<ParentAction>,
    },
    Courses {
        #[command(subcommand)]
        action: Option<CourseAction>,
    },
    /// Course assignments per classroom
    ClassCourses {
        #[command(subcommand)]
        action: Option<ClassCourseAction>,
    },
    Grades {
        #[command(subcommand)]
        action: Option<GradeAction>,
    },
    Absences {
        #[command(subcommand)]
        action: AbsenceAction,
    },
    /// Grade every student of a class course for one date
    Evaluate(EvaluateArgs),
    /// Grades and absences tables
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Download spreadsheets
    Export {
        #[command(subcommand)]
        action: ExportAction,
    },
}

pub async fn run(ctx: &SchoolContext, session: &Session, page: Page) -> Result<()> {
    warn_degraded(ctx).await;

    match page {
        Page::Dashboard => dashboard::show(ctx, session).await,
        Page::Menu => {
            for view in schoolbook::menu::menu(session.role) {
                println!("  {}", view.title());
            }
            Ok(())
        }
        Page::Classrooms { action } => classrooms::run(ctx, session, action).await,
        Page::MyClassroom => classrooms::my_classroom(ctx, session).await,
        Page::Students { action } => people::students(ctx, session, action).await,
        Page::Teachers { action } => people::teachers(ctx, session, action).await,
        Page::Parents { action } => people::parents(ctx, session, action).await,
        Page::Courses { action } => courses::courses(ctx, session, action).await,
        Page::ClassCourses { action } => courses::class_courses(ctx, session, action).await,
        Page::Grades { action } => grades::grades(ctx, session, action).await,
        Page::Absences { action } => grades::absences(ctx, session, action).await,
        Page::Evaluate(args) => grades::evaluate(ctx, session, args).await,
        Page::Catalog { action } => catalog::catalog(ctx, session, action).await,
        Page::Export { action } => catalog::export(ctx, session, action).await,
    }
}

async fn warn_degraded(ctx: &SchoolContext) {
    let state = ctx.state().await;
    for degraded in &state.degraded {
        eprintln!(
            "\x1b[33m⚠ {} unavailable: {}\x1b[0m",
            degraded.endpoint, degraded.error
        );
    }
}

pub(crate) fn require_view(session: &Session, view: View) -> Result<()> {
    if !can_view(session.role, view) {
        bail!("{} is not available to {}", view.title(), session.display_name);
    }
    Ok(())
}

pub(crate) fn require_manage(session: &Session, resource: Resource) -> Result<()> {
    if !can_manage(session.role, resource) {
        bail!("{} cannot change {}", session.display_name, resource.label());
    }
    Ok(())
}

/// Print the result of a write; a failure becomes the command's error
pub(crate) fn report<T>(outcome: Outcome<T>, done: &str) -> Result<Option<T>> {
    if let Some(error) = outcome.error {
        bail!("✗ {}", error);
    }
    println!("\x1b[32m✓ {}\x1b[0m", done);
    Ok(outcome.data)
}

/// Left-aligned columns sized to their widest cell
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        println!("\x1b[90m(none)\x1b[0m");
        return;
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
    };
    println!("\x1b[1m{}\x1b[0m", line(headers.to_vec()));
    for row in rows {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
}

pub(crate) fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
