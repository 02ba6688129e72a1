use serde::Deserialize;

use crate::{ScannerOptions, DEFAULT_READ_SIZE};

/// Behaviour of a [`ResponseIterator`](crate::ResponseIterator) or
/// [`ResponseStream`](crate::ResponseStream).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub scanner: ScannerOptions,
    /// Report a source that ends inside the array as
    /// [`StreamError::Truncated`](crate::StreamError::Truncated). When off,
    /// such a stream just ends.
    pub fail_on_truncation: bool,
    /// Log and drop objects the decoder rejects instead of returning the error.
    pub skip_invalid: bool,
    pub batch_size: usize,
    /// Bytes requested per read by reader-backed sources.
    pub read_size: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            scanner: ScannerOptions::default(),
            fail_on_truncation: true,
            skip_invalid: false,
            batch_size: 10,
            read_size: DEFAULT_READ_SIZE,
        }
    }
}

#[cfg(feature = "configs")]
pub mod configuration {
    use super::StreamConfig;
    use config::Config;

    /// Load a [`StreamConfig`] from a file; the format follows the extension.
    pub fn load_config(path: &str) -> Result<StreamConfig, config::ConfigError> {
        let settings = Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        settings.try_deserialize()
    }
}
