use anyhow::Result;
use schoolbook::context::{DashboardStats, SchoolContext};
use schoolbook::session::Session;
use shared::dates;

use super::{or_dash, print_table};

pub async fn show(ctx: &SchoolContext, session: &Session) -> Result<()> {
    let state = ctx.state().await;

    println!("{} {}", session.avatar, session.display_name);
    println!();

    match state.dashboard(session.role) {
        DashboardStats::Admin { students, classrooms, teachers, courses } => {
            println!("Students:   {}", students);
            println!("Classes:    {}", classrooms);
            println!("Teachers:   {}", teachers);
            println!("Courses:    {}", courses);
        }
        DashboardStats::Teacher { classrooms, courses, students, parents, homeroom } => {
            println!("My classes: {}", classrooms);
            println!("My courses: {}", courses);
            println!("Students:   {}", students);
            println!("Parents:    {}", parents);
            if let Some(homeroom) = homeroom {
                println!("Homeroom:   {}", homeroom);
            }
        }
        DashboardStats::Pupil { student_name, courses, average, recent_grades, unexcused_absences } => {
            if let Some(name) = student_name {
                println!("Student:    {}", name);
            }
            println!("Courses:    {}", courses);
            println!("Average:    {}", or_dash(average.map(|a| format!("{:.2}", a))));
            println!("Unexcused:  {}", unexcused_absences);
            println!();
            println!("\x1b[1mRecent grades\x1b[0m");
            let rows: Vec<Vec<String>> = recent_grades
                .into_iter()
                .map(|g| {
                    let date = g.date.as_deref().map(|d| {
                        dates::backend_to_ui(d).unwrap_or_else(|_| d.to_string())
                    });
                    vec![g.course_name, g.value.to_string(), or_dash(date)]
                })
                .collect();
            print_table(&["Course", "Grade", "Date"], &rows);
        }
    }
    Ok(())
}
