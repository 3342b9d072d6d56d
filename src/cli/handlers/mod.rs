use std::io::Write;

use chrono::NaiveDate;

use crate::cli::commands::Commands;
use crate::cli::output::*;
use crate::io::workspace::Workspace;
use crate::model::config::Config;
use crate::ops::agenda::{agenda_groups, completed_groups, project_groups};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(
    command: &Commands,
    config: &Config,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::open(&config.root)?.with_today(config.date);
    match command {
        Commands::Agenda => cmd_agenda(&ws, config.today(), json, out),
        Commands::Projects => cmd_projects(&ws, json, out),
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_agenda(
    ws: &Workspace,
    date: NaiveDate,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let open = agenda_groups(ws, date);
    let completed = completed_groups(ws, date);

    if json {
        let payload = AgendaJson {
            date,
            open: &open,
            completed: &completed,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&payload)?)?;
        return Ok(());
    }

    writeln!(out, "{} ({date})", date.format("%A"))?;
    writeln!(out)?;
    match format_groups(&open, format_task) {
        Some(text) => write!(out, "{text}")?,
        None => writeln!(out, "Nothing on the agenda")?,
    }
    if let Some(text) = format_groups(&completed, format_task) {
        writeln!(out)?;
        write!(out, "{text}")?;
    }
    Ok(())
}

fn cmd_projects(
    ws: &Workspace,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let (open, closed) = project_groups(ws);

    if json {
        let payload = ProjectsJson {
            open: &open,
            closed: &closed,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&payload)?)?;
        return Ok(());
    }

    let sections: Vec<String> = [&open, &closed]
        .into_iter()
        .filter_map(|groups| format_groups(groups, format_project))
        .collect();
    if sections.is_empty() {
        writeln!(out, "No projects")?;
    } else {
        write!(out, "{}", sections.join("\n"))?;
    }
    Ok(())
}
