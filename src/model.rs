use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Eras del currículo. La maestría global se promedia siempre sobre estas tres,
/// aunque el contenido cargado todavía no tenga preguntas para alguna.
pub const TRACKED_ERAS: [&str; 3] = ["Norman Conquest", "Wars of Independence", "Tudor"];

/// Máximo de preguntas por encuentro
pub const ENCOUNTER_SIZE: usize = 5;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QuestRewards {
    pub artifact_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Quest {
    pub title: String,
    pub era: String,
    #[serde(default)]
    pub objectives: Vec<String>,
    pub rewards: QuestRewards,
}

/// Jefes: se cargan pero ninguna regla los usa todavía.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Boss {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub era: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub id: String,
    pub title: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MonarchCard {
    pub id: String,
    pub name: String,
    pub era: String,
    pub house: String,
    pub reign: String,
    pub claim: String,
    #[serde(default)]
    pub events: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub era: String,
    pub stem: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// Tipo de pregunta, etiquetado por el campo `type` del JSON.
/// Cada variante lleva su propia forma de respuesta.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    Mcq {
        options: Vec<String>,
        answer: String,
    },
    Ordering {
        #[serde(default)]
        options: Vec<String>,
        answer: Vec<String>,
    },
    Short {
        answer: String,
    },
}

impl Question {
    pub fn options(&self) -> &[String] {
        match &self.kind {
            QuestionKind::Mcq { options, .. } | QuestionKind::Ordering { options, .. } => options,
            QuestionKind::Short { .. } => &[],
        }
    }
}

/// Definiciones de contenido: inmutables durante la sesión y nunca persistidas.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Content {
    pub quests: Vec<Quest>,
    pub bosses: Vec<Boss>,
    pub artifacts: Vec<Artifact>,
    pub monarch_cards: Vec<MonarchCard>,
    pub questions: Vec<Question>,
}

/// Respuestas en bruto indexadas por posición de la pregunta en el encuentro
pub type SubmittedAnswers = BTreeMap<usize, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    LoadFailed,
    #[default]
    Map,
    Encounter,
    Results,
}

/// Comandos que emite el renderer; es la única vía para cambiar el estado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    EnterEra(String),
    StudyCard(String),
    SubmitQuiz(SubmittedAnswers),
    BackToMap,
    ResetProgress,
    RetryLoad,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    pub era: String,
    pub score: u8,
    pub correct: usize,
    pub total: usize,
    pub xp_gain: u64,
    pub crowns_gain: u64,
    pub unlocked_artifact: Option<String>,
}
