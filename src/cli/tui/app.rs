//! Board application state and logic

use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;

use super::event::{Event, EventHandler};
use super::view;
use super::Terminal;
use crate::domain::{Task, TaskDraft, TaskId, TaskList, ValidationError};
use crate::engine::ReorderEngine;
use crate::remote::worker::{MutationKind, RemoteHandle, RemoteOutcome};
use crate::remote::RemoteError;

/// How many ticks a status message stays on screen
const STATUS_TICKS: u8 = 20;

/// Which form field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Name,
    Cost,
    Due,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Cost,
            FormField::Cost => FormField::Due,
            FormField::Due => FormField::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Name => FormField::Due,
            FormField::Cost => FormField::Name,
            FormField::Due => FormField::Cost,
        }
    }
}

/// Add/edit form state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskForm {
    /// Task being edited, or None for a new task
    pub target: Option<TaskId>,
    pub name: String,
    pub cost: String,
    pub due: String,
    pub focus: FormField,
}

impl TaskForm {
    fn for_new() -> Self {
        Self::default()
    }

    fn for_edit(task: &Task) -> Self {
        Self {
            target: Some(task.id),
            name: task.name.clone(),
            cost: format!("{}", task.cost),
            // Forms take the input representation; the table shows the
            // display form.
            due: task.due_date.format("%Y-%m-%d").to_string(),
            focus: FormField::Name,
        }
    }

    pub fn title(&self) -> &'static str {
        if self.target.is_some() {
            "Edit task"
        } else {
            "New task"
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Name => &mut self.name,
            FormField::Cost => &mut self.cost,
            FormField::Due => &mut self.due,
        }
    }

    fn to_draft(&self) -> Result<TaskDraft, ValidationError> {
        TaskDraft::parse(&self.name, &self.cost, &self.due)
    }
}

/// Input mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// A task is grabbed; the selection marks the drop target
    Grab,
    Form(TaskForm),
    ConfirmDelete(TaskId),
}

/// Application state
pub struct App {
    /// The session's task list, single source of truth for the order
    list: TaskList,

    /// Drag state
    engine: ReorderEngine,

    /// Handle to the remote worker
    remote: RemoteHandle,

    /// Selected row
    selected: usize,

    /// Input mode
    input_mode: InputMode,

    /// First fetch completed
    loaded: bool,

    /// An order update is in flight
    syncing: bool,

    /// Status message and its remaining ticks
    status: Option<(String, u8)>,

    /// Whether to quit
    should_quit: bool,
}

impl App {
    /// Create the application and request the initial fetch
    pub fn new(remote: RemoteHandle) -> Self {
        remote.fetch();
        Self {
            list: TaskList::new(),
            engine: ReorderEngine::new(),
            remote,
            selected: 0,
            input_mode: InputMode::Normal,
            loaded: false,
            syncing: false,
            status: None,
            should_quit: false,
        }
    }

    /// Run the main application loop
    pub fn run(&mut self, terminal: &mut Terminal, events: EventHandler) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;

            match events.next()? {
                Event::Key(key) => self.handle_key(key),
                Event::Resize(_, _) => {}
                Event::Tick => self.handle_tick(),
                Event::Remote(outcome) => self.handle_remote(outcome),
            }
        }

        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        view::draw(frame, self);
    }

    pub fn tasks(&self) -> &[Task] {
        self.list.tasks()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn input_mode(&self) -> &InputMode {
        &self.input_mode
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status.as_ref().map(|(msg, _)| msg.as_str())
    }

    /// The grabbed row, if a grab is in progress
    pub fn grabbed(&self) -> Option<usize> {
        self.engine.dragging()
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), STATUS_TICKS));
    }

    fn handle_tick(&mut self) {
        if let Some((_, ticks)) = &mut self.status {
            *ticks = ticks.saturating_sub(1);
            if *ticks == 0 {
                self.status = None;
            }
        }
    }

    fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
        // Ctrl+C quits from any mode
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match &self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Grab => self.handle_grab_key(key),
            InputMode::Form(_) => self.handle_form_key(key),
            InputMode::ConfirmDelete(_) => self.handle_confirm_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: crossterm::event::KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }

            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
            }

            // Grab the selected task; the drop target follows the
            // selection until the drop.
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(task) = self.list.get(self.selected) {
                    let name = task.name.clone();
                    self.engine.drag_start(self.selected);
                    self.input_mode = InputMode::Grab;
                    self.set_status(format!("Moving '{}'", name));
                }
            }

            KeyCode::Char('n') => {
                self.input_mode = InputMode::Form(TaskForm::for_new());
            }
            KeyCode::Char('e') => {
                if let Some(task) = self.list.get(self.selected) {
                    self.input_mode = InputMode::Form(TaskForm::for_edit(task));
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.list.get(self.selected) {
                    self.input_mode = InputMode::ConfirmDelete(task.id);
                }
            }

            KeyCode::Char('r') => {
                self.remote.fetch();
                self.set_status("Refreshing...");
            }

            KeyCode::Char('?') => {
                self.set_status(
                    "j/k:move selection space:grab/drop n:new e:edit d:delete r:refresh q:quit",
                );
            }

            _ => {}
        }
    }

    fn handle_grab_key(&mut self, key: crossterm::event::KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
            }

            // Drop onto the current selection: commit locally, then
            // hand the mapping to the worker.
            KeyCode::Char(' ') | KeyCode::Enter => {
                let target = self.selected;
                if let Some(updates) = self.engine.drop_onto(&mut self.list, target) {
                    self.syncing = true;
                    self.remote.persist_order(updates);
                    self.set_status("Order saved locally, syncing...");
                }
                self.input_mode = InputMode::Normal;
            }

            KeyCode::Esc => {
                self.engine.drag_cancel();
                self.input_mode = InputMode::Normal;
                self.status = None;
            }

            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: crossterm::event::KeyEvent) {
        let InputMode::Form(form) = &mut self.input_mode else {
            return;
        };

        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => {
                form.focus = form.focus.next();
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.focus = form.focus.prev();
            }
            KeyCode::Backspace => {
                form.field_mut().pop();
            }
            KeyCode::Enter => match form.to_draft() {
                Ok(draft) => {
                    match form.target {
                        Some(id) => self.remote.edit(id, draft),
                        None => self.remote.create(draft),
                    }
                    self.input_mode = InputMode::Normal;
                    self.set_status("Saving...");
                }
                Err(err) => {
                    // Validation failures never leave the client.
                    self.set_status(err.to_string());
                }
            },
            KeyCode::Char(c) => {
                form.field_mut().push(c);
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: crossterm::event::KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                if let InputMode::ConfirmDelete(id) = self.input_mode {
                    self.remote.delete(id);
                    self.set_status("Deleting...");
                }
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
    }

    fn handle_remote(&mut self, outcome: RemoteOutcome) {
        match outcome {
            RemoteOutcome::Fetched(tasks) => {
                self.list.load(tasks);
                self.loaded = true;
                self.selected = self.selected.min(self.list.len().saturating_sub(1));
                // A reload supersedes any gesture in progress.
                if self.input_mode == InputMode::Grab {
                    self.engine.drag_cancel();
                    self.input_mode = InputMode::Normal;
                }
            }
            RemoteOutcome::FetchFailed(err) => {
                self.set_status(format!("Fetch failed: {} (previous list kept)", err));
            }
            RemoteOutcome::OrderPersisted => {
                self.syncing = false;
                self.set_status("Order saved");
            }
            RemoteOutcome::OrderFailed(err) => {
                // No rollback: the local order stands until a refresh.
                self.syncing = false;
                self.set_status(format!("Order not saved: {} - press r to reload", err));
            }
            RemoteOutcome::Mutated(kind) => {
                self.set_status(format!("Task {}", kind.verb()));
                self.remote.fetch();
            }
            RemoteOutcome::MutationFailed(kind, err) => {
                let message = match &err {
                    RemoteError::Duplicate(_) => err.to_string(),
                    _ => format!("Task not {}: {}", kind.verb(), err),
                };
                self.set_status(message);
            }
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.list.is_empty() {
            return;
        }
        let last = self.list.len() - 1;
        self.selected = match delta {
            d if d < 0 => self.selected.saturating_sub(d.unsigned_abs()),
            d => (self.selected + d as usize).min(last),
        };
    }
}
