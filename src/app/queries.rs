use super::*;
use crate::model::{MonarchCard, Quest, Question};

impl ChronicleApp {
    pub fn overall_mastery(&self) -> f64 {
        self.learner.overall_mastery()
    }

    /// Primera quest (en orden de definición) de la era. Si hay varias
    /// quests en la misma era, solo cuenta esta para el artefacto.
    pub fn quest_for_era(&self, era: &str) -> Option<&Quest> {
        self.content.quests.iter().find(|q| q.era == era)
    }

    pub fn questions_for_era(&self, era: &str) -> Vec<&Question> {
        self.content.questions.iter().filter(|q| q.era == era).collect()
    }

    pub fn cards_for_era(&self, era: &str) -> Vec<&MonarchCard> {
        self.content
            .monarch_cards
            .iter()
            .filter(|c| c.era == era)
            .collect()
    }

    pub fn card(&self, id: &str) -> Option<&MonarchCard> {
        self.content.monarch_cards.iter().find(|c| c.id == id)
    }

    pub fn is_artifact_unlocked(&self, id: &str) -> bool {
        self.learner.unlocked_artifacts.contains(id)
    }

    pub fn is_card_seen(&self, id: &str) -> bool {
        self.learner.seen_cards.contains(id)
    }

    pub fn active_quiz(&self) -> &[Question] {
        self.learner.active_quiz.as_deref().unwrap_or(&[])
    }
}
