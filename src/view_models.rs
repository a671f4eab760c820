// src/view_models.rs

#[derive(Clone, Debug, PartialEq)]
pub struct QuestRow {
    pub title: String,
    pub era: String,
    pub objectives: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactRow {
    pub id: String,
    pub title: String,
    pub unlocked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardRow {
    pub id: String,
    pub name: String,
    pub subtitle: String, // "Era • House X • Reign Y"
    pub claim: String,
    pub events: String,
    pub seen: bool,
}

/// Todo lo que pinta la barra lateral
#[derive(Clone, Debug, PartialEq)]
pub struct SidebarView {
    pub experience: u64,
    pub currency: u64,
    pub streak: u64,
    pub overall_mastery: f64,
    pub quests: Vec<QuestRow>,
    pub artifacts: Vec<ArtifactRow>,
}

impl ArtifactRow {
    pub fn label(&self) -> String {
        if self.unlocked {
            format!("🗝 {}", self.title)
        } else {
            format!("🔒 {}", self.title)
        }
    }
}

impl SidebarView {
    pub fn mastery_label(&self) -> String {
        format!("Overall Chronicle restored: {:.0}%", self.overall_mastery)
    }
}

impl CardRow {
    pub fn study_label(&self) -> &'static str {
        if self.seen { "Study again ✅" } else { "Study" }
    }
}
