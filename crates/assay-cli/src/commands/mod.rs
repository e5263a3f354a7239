//! Command implementations.

pub mod allocate;
pub mod epoch;
pub mod evaluate;
pub mod ledger;
pub mod score;
pub mod verify;

pub use self::allocate::execute_allocate;
pub use self::epoch::execute_epoch;
pub use self::evaluate::execute_evaluate;
pub use self::ledger::execute_ledger;
pub use self::score::execute_score;
pub use self::verify::execute_verify;

use crate::config::Config;
use crate::error::{CliError, Result};
use assay_gatekeeper::Gatekeeper;
use assay_scorer::ScoringPipeline;
use assay_store::SqliteLedger;
use std::io::Read;
use std::path::Path;

/// Open the ledger database named by the configuration, creating its directory.
pub(crate) fn open_ledger(config: &Config) -> Result<SqliteLedger> {
    let path = config.database_path()?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(SqliteLedger::new(&path)?)
}

/// Build the scoring pipeline from the configuration.
pub(crate) fn build_pipeline(config: &Config) -> Result<ScoringPipeline> {
    let gatekeeper = Gatekeeper::try_new(config.validation.clone())
        .map_err(|e| CliError::Config(e.to_string()))?;
    Ok(ScoringPipeline::try_new(config.scoring.clone(), gatekeeper)?)
}

/// Read a file, or stdin when the path is absent or "-".
pub(crate) fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_input_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "hello").unwrap();
        assert_eq!(read_input(Some(file.path())).unwrap(), "hello");
    }

    #[test]
    fn test_open_ledger_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database: Some(dir.path().join("nested").join("assay.db")),
            ..Config::default()
        };
        assert!(open_ledger(&config).is_ok());
        assert!(dir.path().join("nested").exists());
    }

    #[test]
    fn test_build_pipeline_rejects_invalid_config() {
        let mut config = Config::default();
        config.scoring.sweet_spot_low = 50.0;
        assert!(build_pipeline(&config).is_err());
    }
}
