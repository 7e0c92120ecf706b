use promptdeck::app::{MenuSession, StdConsole};
use promptdeck::catalog::{PipelineCatalog, TemplateCatalog};
use promptdeck::config::{default_config_path, default_state_root, ConfigStore};

fn output_header() -> &'static str {
    "PromptDeck\nPromptDeck is a file-backed template and pipeline configuration engine for multi-chat prompt automation."
}

fn run() -> Result<(), String> {
    println!("{}\n", output_header());
    let config_path = default_config_path().map_err(|err| err.to_string())?;
    let state_root = default_state_root().map_err(|err| err.to_string())?;
    let store = ConfigStore::open(&config_path).map_err(|err| err.to_string())?;
    let mut console = StdConsole;
    let mut session = MenuSession::new(
        &mut console,
        store,
        TemplateCatalog::builtin(),
        PipelineCatalog::builtin(),
        state_root,
    );
    session.run().map_err(|err| err.to_string())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
