// src/grading.rs

use crate::model::{Question, QuestionKind};

/// Puntuación a partir de la cual el encuentro desbloquea el artefacto de la quest
pub const ARTIFACT_THRESHOLD: u8 = 70;

/// XP mínima por intento, aunque no se acierte nada
pub const XP_FLOOR: u64 = 10;

pub fn grade(question: &Question, raw: &str) -> bool {
    match &question.kind {
        QuestionKind::Mcq { answer, .. } => raw == answer,
        QuestionKind::Ordering { answer, .. } => normalize_ordering(raw) == *answer,
        QuestionKind::Short { answer } => {
            let given = normalize_short(raw);
            let expected = normalize_short(answer);
            !given.is_empty() && !expected.is_empty() && given == expected
        }
    }
}

/// "a, b,,c " -> ["a", "b", "c"]
pub fn normalize_ordering(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn normalize_short(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Porcentaje redondeado. Un quiz vacío puntúa 0.
pub fn score(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (100.0 * correct.min(total) as f64 / total as f64).round();
    pct as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rewards {
    pub xp: u64,
    pub crowns: u64,
}

impl Rewards {
    pub fn for_score(score: u8) -> Self {
        Self {
            xp: XP_FLOOR.max(u64::from(score)),
            crowns: u64::from(score / 10),
        }
    }
}
