use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub fn now_utc_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }

    let data = serde_json::to_vec_pretty(value)
        .with_context(|| format!("failed to serialize json: {}", path.display()))?;

    let mut file = File::create(path)
        .with_context(|| format!("failed to create json file: {}", path.display()))?;
    file.write_all(&data)
        .with_context(|| format!("failed to write json file: {}", path.display()))?;
    file.write_all(b"\n")
        .with_context(|| format!("failed to finalize json file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConfidenceLevel, TrialInput};

    #[test]
    fn json_round_trip_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("input.json");
        let input = TrialInput {
            confidence_level: ConfidenceLevel::NinetyNine,
            ..TrialInput::default()
        };

        write_json_pretty(&path, &input).expect("write");
        let raw = fs::read_to_string(&path).expect("read back");
        assert!(raw.contains("\"confidence_level\": 0.99"));
        assert!(raw.ends_with('\n'));

        let loaded: TrialInput = read_json(&path).expect("parse");
        assert_eq!(loaded, input);
    }

    #[test]
    fn read_json_rejects_unsupported_confidence_level() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("input.json");
        fs::write(
            &path,
            r#"{"visitors_a":10,"conversions_a":1,"visitors_b":10,"conversions_b":2,"confidence_level":0.8}"#,
        )
        .expect("write");

        let err = read_json::<TrialInput>(&path).unwrap_err();
        assert!(format!("{err:#}").contains("unsupported confidence level"));
    }

    #[test]
    fn read_json_rejects_negative_counts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("input.json");
        fs::write(
            &path,
            r#"{"visitors_a":10,"conversions_a":-1,"visitors_b":10,"conversions_b":2,"confidence_level":0.95}"#,
        )
        .expect("write");

        assert!(read_json::<TrialInput>(&path).is_err());
    }
}
