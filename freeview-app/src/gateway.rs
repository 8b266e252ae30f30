use std::path::PathBuf;

use freeview_core::SessionResult;
use freeview_experiment::{PersistError, PersistenceGateway};

/// Writes the frozen session result as pretty-printed JSON.
pub struct JsonFileGateway {
    path: PathBuf,
}

impl JsonFileGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl PersistenceGateway for JsonFileGateway {
    fn store(&mut self, result: &SessionResult) -> Result<(), PersistError> {
        let payload = serde_json::to_string_pretty(result)?;
        std::fs::write(&self.path, payload)?;
        Ok(())
    }
}
