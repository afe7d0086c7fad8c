//! Task CLI commands
//!
//! Each command is a one-shot session: fetch, act, report. Validation
//! happens before the first network call; create/edit/delete reload
//! the list on success.

use std::io::{self, Write};

use anyhow::{anyhow, bail, Context, Result};

use super::output::Output;
use crate::domain::{parse_cost, parse_input_date, validate_name, TaskDraft, TaskFields, TaskId};
use crate::engine::TaskSession;
use crate::remote::HttpTaskStore;

pub fn list(output: &Output, store: HttpTaskStore) -> Result<()> {
    let mut session = TaskSession::new(store);
    session.refresh().context("Failed to fetch tasks")?;
    output.task_table(session.tasks());
    Ok(())
}

pub fn add(output: &Output, store: HttpTaskStore, name: &str, cost: &str, due: &str) -> Result<()> {
    let draft = TaskDraft::parse(name, cost, due)?;

    let mut session = TaskSession::new(store);
    let created = session.create_task(&draft)?;

    if output.is_json() {
        output.data(&created);
    } else {
        output.success(&format!(
            "Added '{}' (id {}, position {})",
            created.name, created.id, created.order
        ));
    }
    Ok(())
}

pub fn edit(
    output: &Output,
    store: HttpTaskStore,
    id: u64,
    name: Option<&str>,
    cost: Option<&str>,
    due: Option<&str>,
) -> Result<()> {
    if name.is_none() && cost.is_none() && due.is_none() {
        bail!("Nothing to change; pass --name, --cost, or --due");
    }

    let id = TaskId::new(id);
    let mut session = TaskSession::new(store);
    session.refresh().context("Failed to fetch tasks")?;

    // The edit endpoint takes the full field set, so unchanged fields
    // come from the current task.
    let current = session
        .list()
        .position_of(id)
        .and_then(|pos| session.list().get(pos))
        .cloned()
        .ok_or_else(|| anyhow!("Task {} not found (run `roster list`)", id))?;

    let fields = TaskFields {
        name: match name {
            Some(n) => validate_name(n)?,
            None => current.name,
        },
        cost: match cost {
            Some(c) => parse_cost(c)?,
            None => current.cost,
        },
        due_date: match due {
            Some(d) => parse_input_date(d)?,
            None => current.due_date,
        },
    };

    session.edit_task(id, &fields)?;
    output.success(&format!("Updated task {}", id));
    Ok(())
}

pub fn remove(output: &Output, store: HttpTaskStore, id: u64, yes: bool) -> Result<()> {
    let id = TaskId::new(id);
    let mut session = TaskSession::new(store);
    session.refresh().context("Failed to fetch tasks")?;

    let Some(position) = session.list().position_of(id) else {
        bail!("Task {} not found (run `roster list`)", id);
    };
    let name = session
        .list()
        .get(position)
        .map(|t| t.name.clone())
        .unwrap_or_default();

    if !yes && !confirm(&format!("Delete task {} '{}'?", id, name))? {
        output.success("Aborted.");
        return Ok(());
    }

    session.delete_task(id)?;
    output.success(&format!("Deleted '{}'", name));
    Ok(())
}

pub fn move_position(output: &Output, store: HttpTaskStore, from: usize, to: usize) -> Result<()> {
    if from == 0 || to == 0 {
        bail!("Positions are 1-based");
    }

    let mut session = TaskSession::new(store);
    session.refresh().context("Failed to fetch tasks")?;

    let len = session.list().len();
    let Some(moved) = session.list().get(from - 1).cloned() else {
        bail!("Position {} out of range (the list has {} tasks)", from, len);
    };

    // A target past the end is clamped to the last position.
    match session.move_task(from - 1, to - 1) {
        Some(Ok(())) => {}
        Some(Err(err)) => return Err(err).context("New order was not persisted"),
        None => bail!("Nothing to move"),
    }

    let landed = session
        .list()
        .position_of(moved.id)
        .map(|p| p + 1)
        .unwrap_or(to);
    output.verbose(&format!("Order submitted for {} tasks", len));
    output.success(&format!("Moved '{}' to position {}", moved.name, landed));
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
