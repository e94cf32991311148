//! Subcommand handlers. Each prints a plain-text result to stdout.

use crate::cli::{ChatCommands, NotesCommands, PomodoroCommands, ProjectCommands, TodoCommands};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use deskkit_core::model::chat::Role;
use deskkit_core::model::todo::Todo;
use deskkit_core::repo::project_repo::TaskPatch;
use deskkit_core::repo::todo_repo::{NewTodo, TodoPatch};
use deskkit_core::service::chat_service::{CannedResponder, ReplyDelay};
use deskkit_core::service::pomodoro_timer::{IntervalTicker, TickSource, TimerMode};
use deskkit_core::{transfer, ModuleKind, ModuleView, Saved, Workspace};
use std::io::Write;
use std::path::PathBuf;

/// Unwraps a mutation outcome, warning when the write did not land.
fn report<T>(saved: Saved<T>) -> T {
    if let Some(err) = &saved.persist_error {
        eprintln!("warning: change applied but not saved: {err}");
    }
    saved.value
}

fn found<T>(value: Option<T>, what: &str, id: &str) -> Result<T> {
    value.with_context(|| format!("{what} not found: {id}"))
}

fn deleted(ok: bool, what: &str, id: &str) -> Result<()> {
    if !ok {
        bail!("{what} not found: {id}");
    }
    println!("deleted {what} {id}");
    Ok(())
}

pub fn notes(ws: &Workspace, cmd: NotesCommands) -> Result<()> {
    let repo = ws.notes();
    match cmd {
        NotesCommands::Folders => {
            for folder in repo.list_folders() {
                println!("{}  {} ({} notes)", folder.id, folder.name, folder.notes.len());
            }
        }
        NotesCommands::AddFolder { name } => {
            let folder = report(repo.add_folder(&name)?);
            println!("{}", folder.id);
        }
        NotesCommands::RenameFolder { folder_id, name } => {
            let folder = report(repo.rename_folder(&folder_id, &name)?);
            let folder = found(folder, "folder", &folder_id)?;
            println!("renamed {} to {}", folder.id, folder.name);
        }
        NotesCommands::DeleteFolder { folder_id } => {
            deleted(report(repo.delete_folder(&folder_id)), "folder", &folder_id)?;
        }
        NotesCommands::List { folder_id } => {
            found(repo.get_folder(&folder_id), "folder", &folder_id)?;
            for note in repo.list_notes(&folder_id) {
                println!(
                    "{}  {}  [{}]  {}",
                    note.id,
                    note.title,
                    note.created_at.format("%Y-%m-%d"),
                    note.preview()
                );
            }
        }
        NotesCommands::Show { folder_id, note_id } => {
            let note = found(repo.get_note(&folder_id, &note_id), "note", &note_id)?;
            println!("# {}\n", note.title);
            println!("{}", note.content);
        }
        NotesCommands::Add {
            folder_id,
            title,
            content,
        } => {
            let note = report(repo.add_note(&folder_id, &title, &content)?);
            let note = found(note, "folder", &folder_id)?;
            println!("{}", note.id);
        }
        NotesCommands::Edit {
            folder_id,
            note_id,
            title,
            content,
        } => {
            let note = report(repo.update_note(&folder_id, &note_id, &title, &content)?);
            found(note, "note", &note_id)?;
            println!("updated note {note_id}");
        }
        NotesCommands::Delete { folder_id, note_id } => {
            deleted(report(repo.delete_note(&folder_id, &note_id)), "note", &note_id)?;
        }
    }
    Ok(())
}

fn print_todo(todo: &Todo, ws: &Workspace) {
    let today = ws.store().today();
    let mark = if todo.completed { "x" } else { " " };
    let flag = if todo.is_due_soon(today) { "!" } else { "" };
    let due = todo
        .due_status(today)
        .map(|status| format!("  ({status}){flag}"))
        .unwrap_or_default();
    println!(
        "[{mark}] {}  {:<6}  {}{due}",
        todo.id,
        todo.priority.as_str(),
        todo.title
    );
}

pub fn todo(ws: &Workspace, cmd: TodoCommands) -> Result<()> {
    let repo = ws.todos();
    match cmd {
        TodoCommands::List { filter } => {
            for todo in repo.list(filter) {
                print_todo(&todo, ws);
            }
        }
        TodoCommands::Add {
            title,
            priority,
            due,
        } => {
            let todo = report(repo.add(NewTodo {
                title,
                priority,
                due_date: due,
            })?);
            println!("{}", todo.id);
        }
        TodoCommands::Edit {
            id,
            title,
            priority,
            due,
            clear_due,
        } => {
            let due_date = if clear_due { Some(None) } else { due.map(Some) };
            let patch = TodoPatch {
                title,
                priority,
                due_date,
                completed: None,
            };
            let todo = found(report(repo.update(&id, patch)?), "todo", &id)?;
            print_todo(&todo, ws);
        }
        TodoCommands::Toggle { id } => {
            let todo = found(report(repo.toggle(&id)), "todo", &id)?;
            print_todo(&todo, ws);
        }
        TodoCommands::Delete { id } => deleted(report(repo.delete(&id)), "todo", &id)?,
        TodoCommands::Stats => {
            let stats = repo.stats();
            println!(
                "total={} pending={} completed={}",
                stats.total, stats.pending, stats.completed
            );
        }
    }
    Ok(())
}

pub fn project(ws: &Workspace, cmd: ProjectCommands) -> Result<()> {
    let repo = ws.projects();
    match cmd {
        ProjectCommands::List => {
            for project in repo.list_projects() {
                let progress = project.progress();
                println!(
                    "{}  {}  {}/{} ({:.0}%)",
                    project.id,
                    project.name,
                    progress.completed,
                    progress.total,
                    progress.percent()
                );
            }
        }
        ProjectCommands::Show { project_id } => {
            let project = found(repo.get_project(&project_id), "project", &project_id)?;
            println!("{} ({:.0}%)", project.name, project.progress().percent());
            for task in &project.tasks {
                let mark = if task.completed { "x" } else { " " };
                println!("  [{mark}] {}  {}", task.id, task.title);
            }
        }
        ProjectCommands::Add { name } => {
            let project = report(repo.add_project(&name)?);
            println!("{}", project.id);
        }
        ProjectCommands::Rename { project_id, name } => {
            let project = report(repo.rename_project(&project_id, &name)?);
            found(project, "project", &project_id)?;
            println!("renamed project {project_id}");
        }
        ProjectCommands::Delete { project_id } => {
            deleted(report(repo.delete_project(&project_id)), "project", &project_id)?;
        }
        ProjectCommands::AddTask { project_id, title } => {
            let task = report(repo.add_task(&project_id, &title)?);
            println!("{}", found(task, "project", &project_id)?.id);
        }
        ProjectCommands::EditTask {
            project_id,
            task_id,
            title,
        } => {
            let patch = TaskPatch {
                title: Some(title),
                completed: None,
            };
            let task = report(repo.update_task(&project_id, &task_id, patch)?);
            found(task, "task", &task_id)?;
            println!("updated task {task_id}");
        }
        ProjectCommands::ToggleTask {
            project_id,
            task_id,
        } => {
            let task = found(report(repo.toggle_task(&project_id, &task_id)), "task", &task_id)?;
            let state = if task.completed { "completed" } else { "pending" };
            println!("task {} is {state}", task.id);
        }
        ProjectCommands::DeleteTask {
            project_id,
            task_id,
        } => deleted(report(repo.delete_task(&project_id, &task_id)), "task", &task_id)?,
        ProjectCommands::Stats => {
            let stats = repo.stats();
            println!(
                "projects={} tasks={} completed={} rate={:.0}%",
                stats.total_projects, stats.total_tasks, stats.completed_tasks, stats.completion_rate
            );
        }
    }
    Ok(())
}

pub fn chat(ws: &Workspace, cmd: ChatCommands, delay: ReplyDelay) -> Result<()> {
    let repo = ws.chats();
    match cmd {
        ChatCommands::List => {
            for session in repo.list_sessions() {
                println!(
                    "{}  {}  {} messages",
                    session.id,
                    session.created_at.format("%Y-%m-%d %H:%M"),
                    session.messages.len()
                );
            }
        }
        ChatCommands::New => {
            let session = report(repo.create_session());
            println!("{}", session.id);
        }
        ChatCommands::Show { session_id } => {
            let session = found(repo.get_session(&session_id), "session", &session_id)?;
            for message in &session.messages {
                let who = match message.role {
                    Role::User => "you",
                    Role::Assistant => "assistant",
                };
                println!("[{}] {who}: {}", message.timestamp.format("%H:%M"), message.content);
            }
        }
        ChatCommands::Send { text, session } => {
            let mut service = ws.chat_service(CannedResponder::from_entropy(), delay);
            let session_id = match session {
                Some(id) => id,
                None => report(service.open_or_create()).id,
            };
            report(service.send(&session_id, &text)?);
            eprint!("assistant is typing...");
            while let Some(due_at) = service.next_due_at() {
                if let Ok(wait) = (due_at - Utc::now()).to_std() {
                    std::thread::sleep(wait);
                }
                for reply in service.poll_replies() {
                    eprintln!();
                    println!("assistant: {}", report(reply).content);
                }
            }
        }
        ChatCommands::Delete { session_id } => {
            deleted(report(repo.delete_session(&session_id)), "session", &session_id)?;
        }
    }
    Ok(())
}

/// Wall-clock ticker that redraws the countdown on stderr before each tick.
struct CountdownTicker {
    inner: IntervalTicker,
    label: TimerMode,
    remaining_secs: u64,
}

impl TickSource for CountdownTicker {
    fn next_tick(&mut self) -> bool {
        eprint!(
            "\r{} {:02}:{:02}",
            self.label,
            self.remaining_secs / 60,
            self.remaining_secs % 60
        );
        std::io::stderr().flush().ok();
        if !self.inner.next_tick() {
            return false;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        true
    }
}

pub fn pomodoro(ws: &Workspace, cmd: PomodoroCommands) -> Result<()> {
    match cmd {
        PomodoroCommands::Status => {
            let settings = report(ws.pomodoro_settings().get());
            println!(
                "work={}m break={}m today={} ({})",
                settings.work_time, settings.break_time, settings.today_count, settings.last_date
            );
        }
        PomodoroCommands::Set {
            work,
            break_minutes,
        } => {
            let current = report(ws.pomodoro_settings().get());
            let settings = report(ws.pomodoro_settings().update_durations(
                work.unwrap_or(current.work_time),
                break_minutes.unwrap_or(current.break_time),
            )?);
            println!("work={}m break={}m", settings.work_time, settings.break_time);
        }
        PomodoroCommands::Run { segments } => {
            let mut timer = ws.timer();
            for _ in 0..segments {
                timer.start();
                let mut ticker = CountdownTicker {
                    inner: IntervalTicker::default(),
                    label: timer.mode(),
                    remaining_secs: timer.remaining_secs(),
                };
                match timer.run(&mut ticker) {
                    Some(event) => {
                        eprintln!("\r{} 00:00", ticker.label);
                        println!("{}", event.message());
                    }
                    None => return Ok(()),
                }
            }
        }
    }
    Ok(())
}

pub fn show(ws: &Workspace, kind: ModuleKind) -> Result<()> {
    match ws.load_module(kind) {
        ModuleView::Notes { notes } => {
            println!(
                "notes: {} folders, {} notes",
                notes.folders.len(),
                notes.note_count()
            );
        }
        ModuleView::Todos { stats, .. } => {
            println!(
                "todos: {} total, {} pending, {} completed",
                stats.total, stats.pending, stats.completed
            );
        }
        ModuleView::AiChat {
            latest,
            session_count,
        } => {
            let last = latest
                .and_then(|session| session.messages.last().map(|message| message.content.clone()))
                .unwrap_or_else(|| "-".to_string());
            println!("ai-chat: {session_count} sessions, last message: {last}");
        }
        ModuleView::Pomodoro { settings } => {
            println!(
                "pomodoro: {}m work / {}m break, {} today",
                settings.work_time, settings.break_time, settings.today_count
            );
        }
        ModuleView::Projects { stats, .. } => {
            println!(
                "projects: {} projects, {}/{} tasks done",
                stats.total_projects, stats.completed_tasks, stats.total_tasks
            );
        }
    }
    Ok(())
}

pub fn export(ws: &Workspace, dir: Option<PathBuf>, stdout: bool) -> Result<()> {
    if stdout {
        println!("{}", transfer::export_json(ws.store())?);
        return Ok(());
    }
    let dir = match dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("resolving current directory")?,
    };
    let path = transfer::export_to_dir(ws.store(), dir)?;
    println!("{}", path.display());
    Ok(())
}

pub fn import(ws: &Workspace, file: PathBuf) -> Result<()> {
    let document = transfer::import_file(ws.store(), &file)
        .with_context(|| format!("importing {}", file.display()))?;
    println!(
        "imported {} folders, {} todos, {} chats, {} projects",
        document.notes.folders.len(),
        document.todos.len(),
        document.ai_chats.len(),
        document.projects.len()
    );
    Ok(())
}
