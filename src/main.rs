use lumen::app::App;
use lumen::renderer::settings::RendererSettings;

const SETTINGS_FILE: &str = "resources/settings.json";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = RendererSettings::load_or_default(SETTINGS_FILE);
    log::info!("Starting {} ({}x{})", settings.title, settings.width, settings.height);

    if let Err(e) = App::new(settings).run() {
        log::error!("Fatal Renderer Error: {e}");
        std::process::exit(-1);
    }
}
