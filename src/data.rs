// src/data.rs

use crate::error::LoadError;
use crate::model::Content;
use serde::de::DeserializeOwned;
use std::path::PathBuf;

pub const QUESTS_PATH: &str = "data/quests.json";
pub const BOSSES_PATH: &str = "data/bosses.json";
pub const ARTIFACTS_PATH: &str = "data/artifacts.json";
pub const CARDS_PATH: &str = "data/monarch_cards.json";
pub const QUESTION_BANK_PATH: &str = "data/question_bank.json";

/// Los cinco ficheros de contenido, en el orden en que se montan en `Content`
pub const CONTENT_FILES: [&str; 5] = [
    QUESTS_PATH,
    BOSSES_PATH,
    ARTIFACTS_PATH,
    CARDS_PATH,
    QUESTION_BANK_PATH,
];

/// Origen de los ficheros de contenido. `Sync` porque se consulta desde
/// varios hilos a la vez durante la carga.
pub trait ContentSource: Sync + Send {
    fn fetch(&self, path: &str) -> Result<String, LoadError>;

    fn describe(&self) -> String;
}

/// Contenido compilado dentro del binario
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedSource;

impl ContentSource for EmbeddedSource {
    fn fetch(&self, path: &str) -> Result<String, LoadError> {
        let text = match path {
            QUESTS_PATH => include_str!("data/quests.json"),
            BOSSES_PATH => include_str!("data/bosses.json"),
            ARTIFACTS_PATH => include_str!("data/artifacts.json"),
            CARDS_PATH => include_str!("data/monarch_cards.json"),
            QUESTION_BANK_PATH => include_str!("data/question_bank.json"),
            other => {
                return Err(LoadError::Missing {
                    path: other.to_string(),
                });
            }
        };
        Ok(text.to_string())
    }

    fn describe(&self) -> String {
        "embedded content".into()
    }
}

/// Contenido leído de un directorio local (la raíz que contiene `data/`)
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ContentSource for DirSource {
    fn fetch(&self, path: &str) -> Result<String, LoadError> {
        std::fs::read_to_string(self.root.join(path)).map_err(|source| LoadError::Io {
            path: path.to_string(),
            source,
        })
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}

/// Contenido servido por HTTP relativo a una URL base
#[cfg(not(target_arch = "wasm32"))]
pub struct HttpSource {
    base: url::Url,
    client: reqwest::blocking::Client,
}

#[cfg(not(target_arch = "wasm32"))]
impl HttpSource {
    pub fn new(base: url::Url) -> Self {
        Self {
            base,
            client: reqwest::blocking::Client::new(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ContentSource for HttpSource {
    fn fetch(&self, path: &str) -> Result<String, LoadError> {
        let url = self.base.join(path).map_err(|err| LoadError::Http {
            path: path.to_string(),
            message: err.to_string(),
        })?;

        let response = self.client.get(url).send().map_err(|err| LoadError::Http {
            path: path.to_string(),
            message: err.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(LoadError::Status {
                path: path.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.text().map_err(|err| LoadError::Http {
            path: path.to_string(),
            message: err.to_string(),
        })
    }

    fn describe(&self) -> String {
        format!("server {}", self.base)
    }
}

/// Lanza las cinco lecturas a la vez y espera a todas. Si una sola falla,
/// falla la carga entera: no existe contenido parcial.
pub fn load_content(source: &dyn ContentSource) -> Result<Content, LoadError> {
    log::info!("loading content from {}", source.describe());

    let fetched: Vec<Result<String, LoadError>> = std::thread::scope(|scope| {
        let handles: Vec<_> = CONTENT_FILES
            .iter()
            .map(|&path| (path, scope.spawn(move || source.fetch(path))))
            .collect();

        handles
            .into_iter()
            .map(|(path, handle)| {
                handle.join().unwrap_or_else(|_| {
                    Err(LoadError::Worker {
                        path: path.to_string(),
                    })
                })
            })
            .collect()
    });

    let mut texts = Vec::with_capacity(CONTENT_FILES.len());
    for result in fetched {
        texts.push(result?);
    }

    let content = Content {
        quests: parse(QUESTS_PATH, &texts[0])?,
        bosses: parse(BOSSES_PATH, &texts[1])?,
        artifacts: parse(ARTIFACTS_PATH, &texts[2])?,
        monarch_cards: parse(CARDS_PATH, &texts[3])?,
        questions: parse(QUESTION_BANK_PATH, &texts[4])?,
    };

    log::info!(
        "content ready: {} quests, {} cards, {} questions",
        content.quests.len(),
        content.monarch_cards.len(),
        content.questions.len()
    );
    Ok(content)
}

fn parse<T: DeserializeOwned>(path: &str, text: &str) -> Result<T, LoadError> {
    serde_json::from_str(text).map_err(|source| LoadError::Parse {
        path: path.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TRACKED_ERAS;
    use std::collections::HashMap;

    struct MapSource(HashMap<&'static str, &'static str>);

    impl ContentSource for MapSource {
        fn fetch(&self, path: &str) -> Result<String, LoadError> {
            self.0
                .get(path)
                .map(|s| s.to_string())
                .ok_or_else(|| LoadError::Missing {
                    path: path.to_string(),
                })
        }

        fn describe(&self) -> String {
            "test map".into()
        }
    }

    fn minimal_files() -> HashMap<&'static str, &'static str> {
        CONTENT_FILES.iter().map(|&p| (p, "[]")).collect()
    }

    #[test]
    fn embedded_content_loads() {
        let content = load_content(&EmbeddedSource).unwrap();

        assert!(!content.quests.is_empty());
        assert!(!content.monarch_cards.is_empty());
        assert!(!content.bosses.is_empty());
        for era in TRACKED_ERAS {
            assert!(content.questions.iter().any(|q| q.era == era), "no questions for {era}");
            assert!(content.quests.iter().any(|q| q.era == era), "no quest for {era}");
        }
        for quest in &content.quests {
            assert!(
                content.artifacts.iter().any(|a| a.id == quest.rewards.artifact_id),
                "quest {} rewards an unknown artifact",
                quest.title
            );
        }
    }

    #[test]
    fn one_missing_file_fails_the_whole_load() {
        let mut files = minimal_files();
        files.remove(CARDS_PATH);

        let err = load_content(&MapSource(files)).unwrap_err();
        assert!(matches!(err, LoadError::Missing { ref path } if path == CARDS_PATH));
    }

    #[test]
    fn malformed_file_names_its_path() {
        let mut files = minimal_files();
        files.insert(QUESTION_BANK_PATH, "{ nope");

        let err = load_content(&MapSource(files)).unwrap_err();
        assert!(matches!(err, LoadError::Parse { ref path, .. } if path == QUESTION_BANK_PATH));
    }

    #[test]
    fn dir_source_reads_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        for path in CONTENT_FILES {
            std::fs::write(dir.path().join(path), "[]").unwrap();
        }

        let content = load_content(&DirSource::new(dir.path())).unwrap();
        assert_eq!(content, Content::default());

        std::fs::remove_file(dir.path().join(BOSSES_PATH)).unwrap();
        assert!(matches!(
            load_content(&DirSource::new(dir.path())),
            Err(LoadError::Io { .. })
        ));
    }
}
