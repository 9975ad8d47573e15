/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context;
use densemat_linalg::Strategy;
use serde::{Deserialize, Serialize};

/// The default bound on `max |A * A^-1 - I|` accepted by `--verify`.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Settings for an inversion job, read from a JSON file.
///
/// ```json
/// { "strategy": "cholesky", "verify": true, "tolerance": 1e-10 }
/// ```
///
/// Every field is optional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    pub strategy: Strategy,
    pub verify: bool,
    pub tolerance: f64,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            verify: false,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl JobConfig {
    /// Read a job configuration from the JSON file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing job file {}", path.display()))?;
        anyhow::ensure!(
            config.tolerance.is_finite() && config.tolerance > 0.0,
            "tolerance must be a positive number, got {}",
            config.tolerance
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let file = write("{}");
        assert_eq!(JobConfig::load(file.path()).unwrap(), JobConfig::default());
    }

    #[test]
    fn full() {
        let file = write(r#"{ "strategy": "cayley-hamilton", "verify": true, "tolerance": 0.5 }"#);
        let config = JobConfig::load(file.path()).unwrap();
        assert_eq!(config.strategy, Strategy::CayleyHamilton);
        assert!(config.verify);
        assert_eq!(config.tolerance, 0.5);
    }

    #[test]
    fn rejected() {
        let file = write(r#"{ "strategy": "lu" }"#);
        assert!(JobConfig::load(file.path()).is_err());

        let file = write(r#"{ "tolerance": -1 }"#);
        let err = JobConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("tolerance"));

        let file = write(r#"{ "verbose": true }"#);
        assert!(JobConfig::load(file.path()).is_err());
    }
}
