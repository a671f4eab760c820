use crate::data::{ContentSource, load_content};
use crate::error::LoadError;
use crate::model::{AppState, Content, QuizResult, SubmittedAnswers};
use crate::persistence::SnapshotStore;
use crate::state::LearnerState;

// Submódulos
pub mod actions;
pub mod queries;
pub mod resets;
pub mod view_models;

// Re-export de view models
pub use crate::view_models::{ArtifactRow, CardRow, QuestRow, SidebarView};

/// Controlador dueño del estado: contenido, progreso del alumno y almacenamiento.
/// El renderer solo lee de aquí y manda `Action`s a `dispatch`.
pub struct ChronicleApp {
    pub content: Content,
    pub learner: LearnerState,
    pub state: AppState,
    pub message: String,
    pub last_result: Option<QuizResult>,
    /// Respuestas que el alumno va escribiendo en el encuentro actual
    pub draft_answers: SubmittedAnswers,
    pub has_saved_progress: bool,
    pub confirm_reset: bool,
    store: Box<dyn SnapshotStore>,
    source: Option<Box<dyn ContentSource>>,
}

impl ChronicleApp {
    /// Arranque con contenido ya cargado: estado por defecto + snapshot guardado.
    /// Un snapshot ilegible o un fallo al leerlo nunca impide arrancar.
    pub fn new(content: Content, store: Box<dyn SnapshotStore>) -> Self {
        let raw = match store.load() {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("could not read saved progress: {err}");
                None
            }
        };
        let learner = LearnerState::restore(raw.as_deref());
        let has_saved_progress = raw.is_some();

        Self {
            content,
            learner,
            state: AppState::Map,
            message: String::new(),
            last_result: None,
            draft_answers: SubmittedAnswers::new(),
            has_saved_progress,
            confirm_reset: false,
            store,
            source: None,
        }
    }

    /// Carga el contenido desde `source`. Si falla, la app arranca en la
    /// pantalla de error con opción de reintentar.
    pub fn start(source: Box<dyn ContentSource>, store: Box<dyn SnapshotStore>) -> Self {
        let loaded = load_content(source.as_ref());
        let mut app = Self::new(Content::default(), store);
        app.source = Some(source);
        app.apply_load(loaded);
        app
    }

    fn apply_load(&mut self, loaded: Result<Content, LoadError>) {
        match loaded {
            Ok(content) => {
                self.content = content;
                self.state = AppState::Map;
                self.message.clear();
            }
            Err(err) => {
                log::error!("content load failed: {err}");
                self.content = Content::default();
                self.state = AppState::LoadFailed;
                self.message = format!("The chronicle could not be loaded: {err}");
            }
        }
    }

    pub fn retry_load(&mut self) {
        let Some(source) = self.source.as_deref() else {
            return;
        };
        let loaded = load_content(source);
        self.apply_load(loaded);
    }

    /// Usa la copia del snapshot guardada por eframe cuando el almacén
    /// principal no tenía nada.
    pub fn adopt_mirror(&mut self, raw: &str) {
        if self.has_saved_progress {
            return;
        }
        self.learner = LearnerState::restore(Some(raw));
        self.has_saved_progress = true;
        log::info!("restored progress from window storage");
        self.persist();
    }

    /// Escribe el snapshot. Si falla, el progreso sigue en memoria y se avisa.
    pub fn persist(&mut self) -> bool {
        let saved = self
            .learner
            .snapshot()
            .to_json()
            .map_err(Into::into)
            .and_then(|json| self.store.save(&json));

        match saved {
            Ok(()) => {
                self.has_saved_progress = true;
                true
            }
            Err(err) => {
                log::warn!("progress not saved: {err}");
                self.message = format!("⚠ Progress could not be saved right now: {err}");
                false
            }
        }
    }
}
