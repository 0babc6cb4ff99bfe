//! Persistence of final run results.

use std::fs;

use karasu_core::{Result, RunConfig};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Final metrics of a run, accuracies formatted to 4 decimals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    pub val_acc: String,
    pub test_acc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_epoch: Option<usize>,
}

/// Write the result record, keyed by its run configuration, to
/// `cf.results_path` as JSON.
pub fn save_results(cf: &RunConfig, record: &ResultRecord) -> Result<()> {
    if let Some(dir) = cf.results_path.parent() {
        fs::create_dir_all(dir)?;
    }
    let doc = serde_json::json!({
        "config": cf,
        "results": record,
    });
    fs::write(&cf.results_path, serde_json::to_string_pretty(&doc)?)?;
    info!(path = %cf.results_path.display(), "results saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_is_written_and_parseable() {
        let nonce = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let cf = RunConfig {
            results_path: std::env::temp_dir()
                .join(format!("karasu_res_{}_{nonce}.json", std::process::id())),
            ..Default::default()
        };
        let record = ResultRecord {
            val_acc: "0.8123".into(),
            test_acc: "0.7990".into(),
            best_epoch: Some(42),
        };
        save_results(&cf, &record).unwrap();

        let content = fs::read_to_string(&cf.results_path).unwrap();
        fs::remove_file(&cf.results_path).ok();

        let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(doc["results"]["val_acc"], "0.8123");
        assert_eq!(doc["results"]["best_epoch"], 42);
        assert_eq!(doc["config"]["device"], "cpu");
    }

    #[test]
    fn absent_best_epoch_is_omitted() {
        let record = ResultRecord {
            val_acc: "0.5000".into(),
            test_acc: "0.5000".into(),
            best_epoch: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("best_epoch"));
    }
}
