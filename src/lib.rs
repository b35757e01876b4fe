pub mod audio;
pub mod config;
pub mod error;
pub mod fields;
pub mod geometry;
pub mod grid;
pub mod host;
pub mod logging;
pub mod notes;
pub mod placement;
pub mod session;
pub mod state;
pub mod ui;
pub mod value;

pub use error::{OverlayError, OverlayResult};
pub use fields::{FieldEditor, GridPicker, NotePicker, OverlayHandle, ToolboxButton};
pub use session::SessionContext;

/// Entrypoint for host integrations: loads `config.json` and installs logging with its
/// filter. Logging is installed from the environment even when the config is unusable.
pub fn init() -> OverlayResult<config::OverlayConfig> {
    match config::load_overlay_config(&config::ConfigDirs::from_env()) {
        Ok(overlay_config) => {
            logging::init_with_filter(overlay_config.log_filter.as_deref());
            tracing::info!(version = env!("CARGO_PKG_VERSION"), "field overlay initialised");
            Ok(overlay_config)
        }
        Err(err) => {
            logging::init();
            tracing::warn!(%err, "field overlay config unusable");
            Err(err.into())
        }
    }
}
