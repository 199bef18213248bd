use learngl_engine::device::GlInit;
use learngl_engine::logging::{init_logging, LoggingConfig};
use learngl_engine::window::{Runtime, RuntimeConfig};

mod app;
mod controls;
mod scene;
mod textures;

use app::{AssetPaths, QuadApp};
use scene::RenderState;

fn main() {
    init_logging(LoggingConfig::default());

    let app = QuadApp::new(AssetPaths::default(), RenderState::default());

    if let Err(e) = Runtime::run(RuntimeConfig::default(), GlInit::default(), app) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
