use super::*;

impl ChronicleApp {
    pub fn sidebar_view(&self) -> SidebarView {
        let quests = self
            .content
            .quests
            .iter()
            .map(|q| QuestRow {
                title: q.title.clone(),
                era: q.era.clone(),
                objectives: q.objectives.join(", "),
            })
            .collect();

        let artifacts = self
            .content
            .artifacts
            .iter()
            .map(|a| ArtifactRow {
                id: a.id.clone(),
                title: a.title.clone(),
                unlocked: self.is_artifact_unlocked(&a.id),
            })
            .collect();

        SidebarView {
            experience: self.learner.experience,
            currency: self.learner.currency,
            streak: self.learner.streak,
            overall_mastery: self.overall_mastery(),
            quests,
            artifacts,
        }
    }

    pub fn card_rows(&self) -> Vec<CardRow> {
        self.content
            .monarch_cards
            .iter()
            .map(|c| CardRow {
                id: c.id.clone(),
                name: c.name.clone(),
                subtitle: format!("{} • House {} • Reign {}", c.era, c.house, c.reign),
                claim: c.claim.clone(),
                events: c.events.join("; "),
                seen: self.is_card_seen(&c.id),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::EmbeddedSource;
    use crate::persistence::MemoryStore;

    #[test]
    fn sidebar_reflects_learner_state() {
        let store = MemoryStore::with_value(
            r#"{"experience": 40, "currency": 4, "streak": 2,
                "masteryByEra": {"Tudor": 90, "Norman Conquest": 60},
                "unlockedArtifacts": ["crown_jewels"]}"#,
        );
        let app = ChronicleApp::start(Box::new(EmbeddedSource), Box::new(store));
        let view = app.sidebar_view();

        assert_eq!((view.experience, view.currency, view.streak), (40, 4, 2));
        assert_eq!(view.mastery_label(), "Overall Chronicle restored: 50%");
        assert_eq!(view.quests.len(), app.content.quests.len());
        let jewels = view.artifacts.iter().find(|a| a.id == "crown_jewels").unwrap();
        assert!(jewels.unlocked);
        assert!(view.artifacts.iter().filter(|a| a.id != "crown_jewels").all(|a| !a.unlocked));
    }

    #[test]
    fn card_rows_mark_seen_cards() {
        let mut app = ChronicleApp::start(Box::new(EmbeddedSource), Box::new(MemoryStore::new()));
        app.study_card("william_i");

        let rows = app.card_rows();
        let william = rows.iter().find(|r| r.id == "william_i").unwrap();
        assert!(william.seen);
        assert_eq!(william.subtitle, "Norman Conquest • House Normandy • Reign 1066-1087");
        assert!(rows.iter().filter(|r| r.id != "william_i").all(|r| !r.seen));
    }
}
