// Application state module
// Bundles the configuration with the link store shared by all connections

use std::path::Path;

use super::types::Config;
use crate::store::LinkStore;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub store: LinkStore,
}

impl AppState {
    /// Create the state, opening the link store at the configured path
    pub fn new(config: Config) -> Result<Self, String> {
        let store = LinkStore::open(Path::new(&config.storage.data_file))?;
        Ok(Self { config, store })
    }
}
