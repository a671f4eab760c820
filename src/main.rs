use royal_chronicle::ChronicleApp;
use royal_chronicle::config::AppConfig;
use royal_chronicle::data::{ContentSource, EmbeddedSource};
use royal_chronicle::persistence::{FileStore, read_mirror};

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load().unwrap_or_else(|err| {
        log::error!("{err}; falling back to default settings");
        AppConfig::default()
    });

    let source: Box<dyn ContentSource> = config.content_source().unwrap_or_else(|err| {
        log::error!("{err}; using embedded content");
        Box::new(EmbeddedSource)
    });
    let store = FileStore::in_dir(&config.data_dir);
    log::info!("progress file: {}", store.path().display());

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Royal Chronicle",
        options,
        Box::new(move |cc| {
            let mut app = ChronicleApp::start(source, Box::new(store));
            // Progreso que solo quedó guardado en el storage de la ventana
            if let Some(raw) = cc.storage.and_then(read_mirror) {
                app.adopt_mirror(&raw);
            }
            Ok(Box::new(app))
        }),
    )
}
