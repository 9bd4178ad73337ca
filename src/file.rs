//! JSON file utilities for configuration and player data.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{from_reader, to_writer_pretty};

/// Reads a JSON-encoded type from a given file `path`.
pub fn read_json<D: DeserializeOwned>(path: impl AsRef<Path>) -> Result<D, anyhow::Error> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    from_reader(BufReader::new(file)).with_context(|| format!("malformed JSON in {}", path.display()))
}

/// JSON-encodes the `value` in pretty-printed form and writes it to a given `path`.
pub fn write_json(path: impl AsRef<Path>, value: &impl Serialize) -> Result<(), anyhow::Error> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    Ok(to_writer_pretty(file, value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelConfig;
    use std::env;

    #[test]
    fn write_then_read() {
        let path = env::temp_dir().join(format!("swingfit-model-{}.json", std::process::id()));
        write_json(&path, &ModelConfig::default()).unwrap();
        let config: ModelConfig = read_json(&path).unwrap();
        assert_eq!(ModelConfig::default(), config);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file() {
        let err = read_json::<ModelConfig>("/nonexistent/swingfit.json").unwrap_err();
        assert!(err.to_string().contains("cannot open"), "{err}");
    }
}
