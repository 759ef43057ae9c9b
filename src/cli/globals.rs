use crate::upload::retry::MAX_UPLOAD_RETRIES;
use std::path::PathBuf;

// Define the global arguments
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub retries: u32,
    pub quiet: bool,
    pub config_file: PathBuf,
}

impl Default for GlobalArgs {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobalArgs {
    #[must_use]
    pub fn new() -> Self {
        Self {
            retries: MAX_UPLOAD_RETRIES,
            quiet: false,
            config_file: PathBuf::new(),
        }
    }

    pub fn set_retries(&mut self, retries: usize) {
        self.retries = u32::try_from(retries).unwrap_or(MAX_UPLOAD_RETRIES);
    }
}
