//! Typed module registry over one document store.
//!
//! # Responsibility
//! - Map each `ModuleKind` to its repository or service.
//! - Produce the freshly read view a UI renders when a module is opened.

use crate::clock::Clock;
use crate::db::DbResult;
use crate::model::chat::ChatSession;
use crate::model::note::NotesStore;
use crate::model::pomodoro::PomodoroSettings;
use crate::model::project::Project;
use crate::model::todo::{Todo, TodoFilter};
use crate::repo::chat_repo::ChatRepository;
use crate::repo::notes_repo::NotesRepository;
use crate::repo::pomodoro_repo::PomodoroRepository;
use crate::repo::project_repo::{ProjectRepository, ProjectStats};
use crate::repo::todo_repo::{TodoRepository, TodoStats};
use crate::service::chat_service::{ChatService, ReplyDelay, Responder};
use crate::service::pomodoro_timer::PomodoroTimer;
use crate::store::{DocumentStore, MemoryBackend, SqliteBackend};
use log::debug;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

/// The five feature modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    Notes,
    Todos,
    AiChat,
    Pomodoro,
    Projects,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 5] = [
        Self::Notes,
        Self::Todos,
        Self::AiChat,
        Self::Pomodoro,
        Self::Projects,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Notes => "notes",
            Self::Todos => "todos",
            Self::AiChat => "ai-chat",
            Self::Pomodoro => "pomodoro",
            Self::Projects => "projects",
        }
    }
}

impl Display for ModuleKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| {
                format!("unknown module `{normalized}`; expected notes|todos|ai-chat|pomodoro|projects")
            })
    }
}

/// Data a renderer needs when a module is opened.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleView {
    Notes {
        notes: NotesStore,
    },
    Todos {
        items: Vec<Todo>,
        stats: TodoStats,
    },
    AiChat {
        latest: Option<ChatSession>,
        session_count: usize,
    },
    Pomodoro {
        settings: PomodoroSettings,
    },
    Projects {
        projects: Vec<Project>,
        stats: ProjectStats,
    },
}

impl ModuleView {
    pub fn kind(&self) -> ModuleKind {
        match self {
            Self::Notes { .. } => ModuleKind::Notes,
            Self::Todos { .. } => ModuleKind::Todos,
            Self::AiChat { .. } => ModuleKind::AiChat,
            Self::Pomodoro { .. } => ModuleKind::Pomodoro,
            Self::Projects { .. } => ModuleKind::Projects,
        }
    }
}

/// Owner of the store plus accessors for every module.
pub struct Workspace {
    store: DocumentStore,
}

impl Workspace {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Volatile workspace backed by a `MemoryBackend`.
    pub fn in_memory(clock: Box<dyn Clock>, key: &str) -> Self {
        Self::new(DocumentStore::open(
            Box::new(MemoryBackend::new()),
            clock,
            key,
        ))
    }

    /// Workspace persisted in the SQLite file at `path`.
    pub fn open_sqlite(path: impl AsRef<Path>, clock: Box<dyn Clock>, key: &str) -> DbResult<Self> {
        let backend = SqliteBackend::open(path)?;
        Ok(Self::new(DocumentStore::open(Box::new(backend), clock, key)))
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn notes(&self) -> NotesRepository<'_> {
        NotesRepository::new(&self.store)
    }

    pub fn todos(&self) -> TodoRepository<'_> {
        TodoRepository::new(&self.store)
    }

    pub fn projects(&self) -> ProjectRepository<'_> {
        ProjectRepository::new(&self.store)
    }

    pub fn chats(&self) -> ChatRepository<'_> {
        ChatRepository::new(&self.store)
    }

    pub fn pomodoro_settings(&self) -> PomodoroRepository<'_> {
        PomodoroRepository::new(&self.store)
    }

    pub fn timer(&self) -> PomodoroTimer<'_> {
        PomodoroTimer::new(&self.store)
    }

    pub fn chat_service<R: Responder>(&self, responder: R, delay: ReplyDelay) -> ChatService<'_, R> {
        ChatService::new(&self.store, responder, delay)
    }

    /// Reads the current data for `kind`.
    pub fn load_module(&self, kind: ModuleKind) -> ModuleView {
        debug!("event=module_load module=workspace status=start kind={kind}");
        match kind {
            ModuleKind::Notes => ModuleView::Notes {
                notes: NotesStore {
                    folders: self.notes().list_folders(),
                },
            },
            ModuleKind::Todos => {
                let todos = self.todos();
                ModuleView::Todos {
                    items: todos.list(TodoFilter::All),
                    stats: todos.stats(),
                }
            }
            ModuleKind::AiChat => {
                let sessions = self.chats().list_sessions();
                ModuleView::AiChat {
                    session_count: sessions.len(),
                    latest: sessions.into_iter().last(),
                }
            }
            ModuleKind::Pomodoro => ModuleView::Pomodoro {
                settings: self.pomodoro_settings().get().into_value(),
            },
            ModuleKind::Projects => {
                let projects = self.projects();
                ModuleView::Projects {
                    projects: projects.list_projects(),
                    stats: projects.stats(),
                }
            }
        }
    }
}
