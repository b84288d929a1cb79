use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use schoolbook::context::{Resource, SchoolContext};
use schoolbook::forms::{build_evaluation, AbsenceForm, EvaluationRow, GradeForm};
use schoolbook::menu::{can_manage, can_view, View};
use schoolbook::session::Session;
use shared::{dates, StudentRecord};
use std::path::PathBuf;

use super::{or_dash, print_table, report, require_manage};

#[derive(Subcommand)]
pub enum GradeAction {
    /// Grades and absences of the followed student
    Show,
    /// Grades recorded in one class course
    List {
        #[arg(long)]
        class_course: i64,
    },
    Add {
        #[arg(long)]
        student: i64,
        #[arg(long)]
        class_course: i64,
        #[arg(long)]
        value: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
    },
    Edit {
        id: i64,
        #[arg(long)]
        value: String,
        #[arg(long)]
        date: String,
    },
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum AbsenceAction {
    List {
        #[arg(long)]
        class_course: i64,
    },
    Add {
        #[arg(long)]
        student: i64,
        #[arg(long)]
        class_course: i64,
        #[arg(long)]
        date: String,
        #[arg(long)]
        excused: bool,
    },
    /// Set the date and excused flag of an absence
    Excuse {
        id: i64,
        #[arg(long)]
        date: String,
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        excused: bool,
    },
    Toggle { id: i64 },
    Delete { id: i64 },
}

#[derive(Args)]
pub struct EvaluateArgs {
    #[arg(long)]
    class_course: i64,
    /// YYYY-MM-DD
    #[arg(long)]
    date: String,
    /// STUDENT_ID=GRADE, repeatable
    #[arg(long = "grade", value_parser = parse_grade_pair)]
    grades: Vec<(i64, String)>,
    /// STUDENT_ID of an absent student, repeatable
    #[arg(long = "absent")]
    absent: Vec<i64>,
    /// JSON array of {studentId, grade?, absent?} rows
    #[arg(long)]
    rows: Option<PathBuf>,
}

fn parse_grade_pair(value: &str) -> Result<(i64, String), String> {
    let (student, grade) = value
        .split_once('=')
        .ok_or_else(|| format!("expected STUDENT_ID=GRADE, got '{}'", value))?;
    let student = student
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a student id", student))?;
    Ok((student, grade.trim().to_string()))
}

fn ui_date(date: Option<&str>) -> String {
    or_dash(date.map(|d| dates::backend_to_ui(d).unwrap_or_else(|_| d.to_string())))
}

fn print_record(record: &StudentRecord) {
    if !record.student_name.is_empty() {
        println!("\x1b[1m{}\x1b[0m", record.student_name);
    }
    let rows: Vec<Vec<String>> = record
        .courses
        .iter()
        .map(|c| {
            let grades = c.grades.iter().map(|g| g.value.to_string()).collect::<Vec<_>>().join(" ");
            vec![
                c.course_name.clone(),
                or_dash(c.teacher_name.clone()),
                grades,
                or_dash(c.average().map(|a| format!("{:.2}", a))),
                format!("{}/{}", c.unexcused(), c.absences.len()),
            ]
        })
        .collect();
    print_table(&["Course", "Teacher", "Grades", "Average", "Unexcused/Absences"], &rows);
    println!(
        "Overall average: {}",
        or_dash(record.average().map(|a| format!("{:.2}", a)))
    );
}

fn require_gradebook(session: &Session) -> Result<()> {
    if !can_view(session.role, View::Grades) && !can_manage(session.role, Resource::Grades) {
        bail!("Grades are not available to {}", session.display_name);
    }
    Ok(())
}

pub async fn grades(ctx: &SchoolContext, session: &Session, action: Option<GradeAction>) -> Result<()> {
    match action.unwrap_or(GradeAction::Show) {
        GradeAction::Show => {
            let state = ctx.state().await;
            match &state.record {
                Some(record) => print_record(record),
                None => bail!("No student record loaded for {}", session.display_name),
            }
        }
        GradeAction::List { class_course } => {
            require_gradebook(session)?;
            let grades = ctx.api().grades().by_class_course(class_course).await?;
            let state = ctx.state().await;
            let rows: Vec<Vec<String>> = grades
                .iter()
                .map(|g| {
                    let student = g
                        .student_id
                        .and_then(|id| state.students.iter().find(|s| s.id == id))
                        .map(|s| s.full_name());
                    vec![g.id.to_string(), or_dash(student), g.value.to_string(), ui_date(g.date.as_deref())]
                })
                .collect();
            print_table(&["ID", "Student", "Grade", "Date"], &rows);
        }
        GradeAction::Add { student, class_course, value, date } => {
            require_manage(session, Resource::Grades)?;
            let form = GradeForm {
                student_id: Some(student),
                class_course_id: Some(class_course),
                value,
                date,
            };
            report(ctx.add_grade(&form.validate()?).await, "Grade added")?;
        }
        GradeAction::Edit { id, value, date } => {
            require_manage(session, Resource::Grades)?;
            let form = GradeForm { value, date, ..Default::default() };
            report(ctx.update_grade(id, &form.validate_update()?).await, "Grade updated")?;
        }
        GradeAction::Delete { id } => {
            require_manage(session, Resource::Grades)?;
            report(ctx.delete_grade(id).await, "Grade deleted")?;
        }
    }
    Ok(())
}

pub async fn absences(ctx: &SchoolContext, session: &Session, action: AbsenceAction) -> Result<()> {
    match action {
        AbsenceAction::List { class_course } => {
            require_gradebook(session)?;
            let absences = ctx.api().absences().by_class_course(class_course).await?;
            let rows: Vec<Vec<String>> = absences
                .iter()
                .map(|a| {
                    vec![
                        a.id.to_string(),
                        or_dash(a.student_id),
                        ui_date(a.date.as_deref()),
                        if a.excused { "yes" } else { "no" }.to_string(),
                    ]
                })
                .collect();
            print_table(&["ID", "Student", "Date", "Excused"], &rows);
        }
        AbsenceAction::Add { student, class_course, date, excused } => {
            require_manage(session, Resource::Absences)?;
            let form = AbsenceForm {
                student_id: Some(student),
                class_course_id: Some(class_course),
                date,
                excused,
            };
            report(ctx.add_absence(&form.validate()?).await, "Absence recorded")?;
        }
        AbsenceAction::Excuse { id, date, excused } => {
            require_manage(session, Resource::Absences)?;
            let date = dates::ui_to_backend(&date)?;
            report(ctx.update_absence(id, &date, excused).await, "Absence updated")?;
        }
        AbsenceAction::Toggle { id } => {
            require_manage(session, Resource::Absences)?;
            report(ctx.toggle_absence_excused(id).await, "Absence toggled")?;
        }
        AbsenceAction::Delete { id } => {
            require_manage(session, Resource::Absences)?;
            report(ctx.delete_absence(id).await, "Absence deleted")?;
        }
    }
    Ok(())
}

pub async fn evaluate(ctx: &SchoolContext, session: &Session, args: EvaluateArgs) -> Result<()> {
    require_manage(session, Resource::Grades)?;

    let mut rows: Vec<EvaluationRow> = match &args.rows {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("{} is not a list of evaluation rows", path.display()))?
        }
        None => Vec::new(),
    };
    for (student_id, grade) in args.grades {
        rows.push(EvaluationRow { student_id, grade: Some(grade), absent: false });
    }
    for student_id in args.absent {
        match rows.iter_mut().find(|r| r.student_id == student_id) {
            Some(row) => row.absent = true,
            None => rows.push(EvaluationRow { student_id, grade: None, absent: true }),
        }
    }

    let payload = build_evaluation(args.class_course, &args.date, &rows)?;
    let submitted = payload.entries.len();
    report(
        ctx.bulk_evaluate(&payload).await,
        &format!("Evaluation saved for {} students", submitted),
    )?;
    Ok(())
}
