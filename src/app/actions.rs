use super::*;
use crate::grading::{ARTIFACT_THRESHOLD, Rewards, grade, score};
use crate::model::{Action, ENCOUNTER_SIZE, Question};
use rand::Rng;
use rand::seq::SliceRandom;

impl ChronicleApp {
    /// Aplica una acción del renderer
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::EnterEra(era) => {
                self.begin_encounter(&era);
            }
            Action::StudyCard(id) => self.study_card(&id),
            Action::SubmitQuiz(answers) => {
                self.submit_quiz(&answers);
            }
            Action::BackToMap => {
                self.state = AppState::Map;
                self.message.clear();
            }
            Action::ResetProgress => self.reset_progress(),
            Action::RetryLoad => self.retry_load(),
        }
    }

    pub fn begin_encounter(&mut self, era: &str) -> Vec<Question> {
        self.begin_encounter_with_rng(era, &mut rand::thread_rng())
    }

    /// Elige hasta 5 preguntas de la era al azar y sin repetición.
    /// No persiste: entrar en un encuentro no es progreso.
    pub fn begin_encounter_with_rng<R: Rng + ?Sized>(
        &mut self,
        era: &str,
        rng: &mut R,
    ) -> Vec<Question> {
        let pool = self.questions_for_era(era);
        let selected: Vec<Question> = pool
            .choose_multiple(rng, ENCOUNTER_SIZE)
            .map(|q| (*q).clone())
            .collect();

        if selected.is_empty() {
            log::warn!("no questions available for era {era:?}");
        } else {
            log::info!("encounter in {era}: {} questions", selected.len());
        }

        self.learner.active_era = Some(era.to_string());
        self.learner.active_quiz = Some(selected.clone());
        self.draft_answers.clear();
        self.last_result = None;
        self.message.clear();
        self.state = AppState::Encounter;
        selected
    }

    /// Estudiar una carta siempre da recompensa, aunque ya estuviera vista.
    pub fn study_card(&mut self, card_id: &str) {
        let first_time = self.learner.seen_cards.insert(card_id);
        self.learner.experience += 5;
        self.learner.streak += 1;
        log::info!(
            "studied card {card_id} (first time: {first_time}, streak {})",
            self.learner.streak
        );
        self.persist();
    }

    /// Corrige el encuentro activo, reparte recompensas y guarda.
    /// Sin preguntas activas la nota es 0 pero se da la XP mínima igualmente.
    pub fn submit_quiz(&mut self, answers: &SubmittedAnswers) -> QuizResult {
        let quiz = self.learner.active_quiz.take().unwrap_or_default();
        let active_era = self.learner.active_era.clone();

        let total = quiz.len();
        let correct = quiz
            .iter()
            .enumerate()
            .filter(|(i, q)| grade(q, answers.get(i).map(String::as_str).unwrap_or("")))
            .count();
        let score = score(correct, total);
        let rewards = Rewards::for_score(score);

        self.learner.experience += rewards.xp;
        self.learner.currency += rewards.crowns;

        // Sin era activa no hay maestría ni quest que comprobar
        let mut unlocked_artifact = None;
        if let Some(era) = &active_era {
            self.learner.record_mastery(era, score);
            unlocked_artifact = match self.quest_for_era(era) {
                Some(quest) if score >= ARTIFACT_THRESHOLD => {
                    Some(quest.rewards.artifact_id.clone())
                }
                _ => None,
            };
        }
        if let Some(id) = &unlocked_artifact {
            if self.learner.unlocked_artifacts.insert(id.clone()) {
                log::info!("artifact unlocked: {id}");
            }
        }

        let result = QuizResult {
            era: active_era.unwrap_or_default(),
            score,
            correct,
            total,
            xp_gain: rewards.xp,
            crowns_gain: rewards.crowns,
            unlocked_artifact,
        };
        log::info!(
            "quiz in {}: {}/{} correct, score {}",
            result.era,
            correct,
            total,
            score
        );

        self.draft_answers.clear();
        self.last_result = Some(result.clone());
        self.state = AppState::Results;
        self.message.clear();
        self.persist();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersistError;
    use crate::model::{Artifact, Content, MonarchCard, Quest, QuestRewards, QuestionKind};
    use crate::persistence::MemoryStore;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Store que comparte su contenido con el test
    #[derive(Clone, Default)]
    struct SharedStore {
        value: Rc<RefCell<Option<String>>>,
        fail: bool,
    }

    impl SnapshotStore for SharedStore {
        fn load(&self) -> Result<Option<String>, PersistError> {
            Ok(self.value.borrow().clone())
        }

        fn save(&mut self, json: &str) -> Result<(), PersistError> {
            if self.fail {
                return Err(std::io::Error::other("quota exceeded").into());
            }
            *self.value.borrow_mut() = Some(json.to_string());
            Ok(())
        }

        fn clear(&mut self) -> Result<(), PersistError> {
            *self.value.borrow_mut() = None;
            Ok(())
        }
    }

    fn mcq(era: &str, answer: &str) -> Question {
        Question {
            era: era.into(),
            stem: format!("Pick {answer}"),
            kind: QuestionKind::Mcq {
                options: vec!["A".into(), "B".into(), answer.into()],
                answer: answer.into(),
            },
        }
    }

    fn quest(era: &str, artifact: &str) -> Quest {
        Quest {
            title: format!("Quest for {artifact}"),
            era: era.into(),
            objectives: vec![],
            rewards: QuestRewards {
                artifact_id: artifact.into(),
            },
        }
    }

    fn content() -> Content {
        let mut questions: Vec<Question> = (0..5).map(|i| mcq("Tudor", &format!("T{i}"))).collect();
        questions.extend((0..8).map(|i| mcq("Norman Conquest", &format!("N{i}"))));
        questions.push(mcq("Wars of Independence", "W0"));

        Content {
            quests: vec![
                quest("Tudor", "crown_jewels"),
                quest("Tudor", "armada_portrait"),
                quest("Norman Conquest", "bayeux_fragment"),
            ],
            bosses: vec![],
            artifacts: vec![Artifact {
                id: "crown_jewels".into(),
                title: "The Crown Jewels".into(),
            }],
            monarch_cards: vec![MonarchCard {
                id: "henry_viii".into(),
                name: "Henry VIII".into(),
                era: "Tudor".into(),
                house: "Tudor".into(),
                reign: "1509-1547".into(),
                claim: "Son of Henry VII".into(),
                events: vec![],
            }],
            questions,
        }
    }

    fn app_with(store: SharedStore) -> ChronicleApp {
        ChronicleApp::new(content(), Box::new(store))
    }

    /// Respuestas correctas para las `correct` primeras preguntas del quiz activo
    fn answers(app: &ChronicleApp, correct: usize) -> SubmittedAnswers {
        app.active_quiz()
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let given = match &q.kind {
                    QuestionKind::Mcq { answer, .. } if i < correct => answer.clone(),
                    _ => "wrong".to_string(),
                };
                (i, given)
            })
            .collect()
    }

    #[test]
    fn encounter_samples_up_to_five_from_the_era() {
        let mut app = app_with(SharedStore::default());
        let mut rng = SmallRng::seed_from_u64(7);

        let picked = app.begin_encounter_with_rng("Norman Conquest", &mut rng);

        assert_eq!(picked.len(), 5);
        assert!(picked.iter().all(|q| q.era == "Norman Conquest"));
        let mut stems: Vec<_> = picked.iter().map(|q| q.stem.clone()).collect();
        stems.sort();
        stems.dedup();
        assert_eq!(stems.len(), 5);
        assert_eq!(app.learner.active_era.as_deref(), Some("Norman Conquest"));
        assert_eq!(app.state, AppState::Encounter);
    }

    #[test]
    fn small_pools_use_every_question_and_entering_does_not_save() {
        let store = SharedStore::default();
        let mut app = app_with(store.clone());

        assert_eq!(app.begin_encounter("Wars of Independence").len(), 1);
        assert_eq!(app.begin_encounter("Stuart").len(), 0);
        assert!(store.value.borrow().is_none());
    }

    #[test]
    fn four_of_five_scores_eighty_and_unlocks_first_quest_artifact() {
        let store = SharedStore::default();
        let mut app = app_with(store.clone());
        app.begin_encounter("Tudor");
        let submitted = answers(&app, 4);

        let result = app.submit_quiz(&submitted);

        assert_eq!((result.correct, result.total, result.score), (4, 5, 80));
        assert_eq!((result.xp_gain, result.crowns_gain), (80, 8));
        assert_eq!(result.unlocked_artifact.as_deref(), Some("crown_jewels"));
        assert_eq!(app.learner.experience, 80);
        assert_eq!(app.learner.currency, 8);
        assert_eq!(app.learner.mastery("Tudor"), 80);
        assert!(app.is_artifact_unlocked("crown_jewels"));
        // solo la primera quest de la era cuenta
        assert!(!app.is_artifact_unlocked("armada_portrait"));
        assert_eq!(app.state, AppState::Results);
        assert!(app.learner.active_quiz.is_none());

        let saved = LearnerState::restore(store.value.borrow().as_deref());
        assert_eq!(saved.experience, 80);
        assert!(saved.unlocked_artifacts.contains("crown_jewels"));
    }

    #[test]
    fn zero_correct_still_grants_floor_xp() {
        let mut app = app_with(SharedStore::default());
        app.begin_encounter("Tudor");
        let result = app.submit_quiz(&SubmittedAnswers::new());

        assert_eq!(result.score, 0);
        assert_eq!((result.xp_gain, result.crowns_gain), (10, 0));
        assert_eq!(result.unlocked_artifact, None);
        assert!(app.learner.unlocked_artifacts.is_empty());
        assert_eq!(app.learner.mastery_by_era.get("Tudor"), Some(&0));
    }

    #[test]
    fn empty_encounter_scores_zero_instead_of_dividing_by_zero() {
        let mut app = app_with(SharedStore::default());
        app.begin_encounter("Stuart");
        let result = app.submit_quiz(&SubmittedAnswers::new());

        assert_eq!((result.score, result.correct, result.total), (0, 0, 0));
        assert_eq!(app.learner.experience, 10);
    }

    #[test]
    fn submitting_outside_any_era_records_no_mastery() {
        let store = SharedStore::default();
        let mut app = app_with(store.clone());

        app.dispatch(Action::SubmitQuiz(SubmittedAnswers::new()));

        assert!(app.learner.mastery_by_era.is_empty());
        assert!(app.learner.unlocked_artifacts.is_empty());
        assert_eq!(app.learner.experience, 10);
        let saved = store.value.borrow().clone().unwrap_or_default();
        assert!(saved.contains(r#""masteryByEra":{}"#));
    }

    #[test]
    fn mastery_tracks_best_score_and_sets_only_grow() {
        let mut app = app_with(SharedStore::default());
        let mut best = 0;
        for correct in [5, 1, 3, 0] {
            app.begin_encounter("Tudor");
            let submitted = answers(&app, correct);
            let artifacts_before = app.learner.unlocked_artifacts.clone();
            let result = app.submit_quiz(&submitted);
            best = best.max(result.score);

            assert_eq!(app.learner.mastery("Tudor"), best);
            assert!(app.learner.unlocked_artifacts.is_superset(&artifacts_before));
        }
        assert_eq!(best, 100);
        assert!(app.is_artifact_unlocked("crown_jewels"));
    }

    #[test]
    fn studying_is_repeatable_and_rewarded_each_time() {
        let store = SharedStore::default();
        let mut app = app_with(store.clone());

        app.study_card("henry_viii");
        app.study_card("henry_viii");

        assert_eq!(app.learner.experience, 10);
        assert_eq!(app.learner.streak, 2);
        assert_eq!(app.learner.seen_cards.len(), 1);
        assert!(store.value.borrow().is_some());
    }

    #[test]
    fn save_failure_keeps_progress_in_memory_and_warns() {
        let store = SharedStore {
            fail: true,
            ..Default::default()
        };
        let mut app = app_with(store);

        app.dispatch(Action::StudyCard("henry_viii".into()));

        assert_eq!(app.learner.experience, 5);
        assert!(app.message.contains("could not be saved"));
    }

    #[test]
    fn dispatch_drives_a_full_round() {
        let mut app = ChronicleApp::new(content(), Box::new(MemoryStore::new()));

        app.dispatch(Action::EnterEra("Norman Conquest".into()));
        assert_eq!(app.state, AppState::Encounter);

        let submitted = answers(&app, 5);
        app.dispatch(Action::SubmitQuiz(submitted));
        assert_eq!(app.last_result.as_ref().map(|r| r.score), Some(100));
        assert!(app.is_artifact_unlocked("bayeux_fragment"));

        app.dispatch(Action::BackToMap);
        assert_eq!(app.state, AppState::Map);
    }

    #[test]
    fn saved_progress_is_restored_on_startup() {
        let store = SharedStore::default();
        {
            let mut app = app_with(store.clone());
            app.study_card("henry_viii");
            app.begin_encounter("Tudor");
            let submitted = answers(&app, 5);
            app.submit_quiz(&submitted);
        }

        let app = app_with(store);
        assert!(app.has_saved_progress);
        assert_eq!(app.learner.experience, 105);
        assert_eq!(app.learner.mastery("Tudor"), 100);
        assert!(app.is_card_seen("henry_viii"));
        assert_eq!(app.learner.active_era.as_deref(), Some("Tudor"));
    }

    #[test]
    fn corrupt_saved_progress_starts_fresh() {
        let store = SharedStore::default();
        *store.value.borrow_mut() = Some("{{{".into());

        let app = app_with(store);
        assert_eq!(app.learner, LearnerState::default());
    }
}
