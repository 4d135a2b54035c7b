//! Read/write config snapshots.
//!
//! A snapshot is the outbound mirror of the inbound raw config: the same flat
//! key names plus a schema version and an export timestamp. Importing a
//! snapshot goes through the validator like any other raw document, so
//! `import(export(state))` leaves a valid state unchanged.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::{BiasMode, ParameterSet, Toggle, ToggleSet};
use crate::error::AppError;

/// Current snapshot schema version.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    pub schema_version: u32,
    pub exported_at: DateTime<Utc>,

    #[serde(rename = "x0_1")]
    pub x0_1: f64,
    pub constant1: f64,
    pub b1: f64,
    pub b1_base: f64,
    pub auto_rollover_b1: bool,
    #[serde(rename = "b1_add_option")]
    pub b1_add_option: f64,

    #[serde(rename = "x0_2")]
    pub x0_2: f64,
    pub constant2: f64,
    pub b2: f64,
    pub b2_base: f64,
    pub auto_rollover_b2: bool,
    #[serde(rename = "b2_add_option")]
    pub b2_add_option: f64,

    pub anchor: f64,
    pub ref_const: f64,

    pub call_contracts: u32,
    pub premium_call: f64,
    pub put_contracts: u32,
    pub premium_put: f64,

    pub long_entry_price: f64,
    pub long_shares: u64,
    pub short_entry_price: f64,
    pub short_shares: u64,

    pub delta1: f64,
    pub delta2: f64,
    pub include_premium: bool,
    pub bias_mode: BiasMode,
    pub x1_range: [f64; 2],

    #[serde(rename = "showY1")]
    pub show_y1: bool,
    #[serde(rename = "showY2")]
    pub show_y2: bool,
    #[serde(rename = "showY3")]
    pub show_y3: bool,
    #[serde(rename = "showY4")]
    pub show_y4: bool,
    #[serde(rename = "showY5")]
    pub show_y5: bool,
    #[serde(rename = "showY6")]
    pub show_y6: bool,
    #[serde(rename = "showY7")]
    pub show_y7: bool,
    #[serde(rename = "showY8")]
    pub show_y8: bool,
    #[serde(rename = "showY9")]
    pub show_y9: bool,
    #[serde(rename = "showY10")]
    pub show_y10: bool,
    #[serde(rename = "showY11")]
    pub show_y11: bool,
}

impl ConfigSnapshot {
    /// Capture the current state, stamped with the current time.
    pub fn capture(params: &ParameterSet, toggles: &ToggleSet) -> Self {
        Self::capture_at(params, toggles, Utc::now())
    }

    pub fn capture_at(params: &ParameterSet, toggles: &ToggleSet, at: DateTime<Utc>) -> Self {
        let p = params;
        let on = |t: Toggle| toggles.is_on(t);
        Self {
            schema_version: SCHEMA_VERSION,
            exported_at: at,
            x0_1: p.curve1.threshold,
            constant1: p.curve1.constant,
            b1: p.curve1.bias,
            b1_base: p.curve1.bias_base,
            auto_rollover_b1: p.curve1.auto_rollover,
            b1_add_option: p.curve1.bias_add_option,
            x0_2: p.curve2.threshold,
            constant2: p.curve2.constant,
            b2: p.curve2.bias,
            b2_base: p.curve2.bias_base,
            auto_rollover_b2: p.curve2.auto_rollover,
            b2_add_option: p.curve2.bias_add_option,
            anchor: p.benchmark.anchor,
            ref_const: p.benchmark.ref_const,
            call_contracts: p.call.contracts,
            premium_call: p.call.premium,
            put_contracts: p.put.contracts,
            premium_put: p.put.premium,
            long_entry_price: p.long.entry_price,
            long_shares: p.long.shares,
            short_entry_price: p.short.entry_price,
            short_shares: p.short.shares,
            delta1: p.delta1,
            delta2: p.delta2,
            include_premium: p.include_premium,
            bias_mode: p.bias_mode,
            x1_range: p.x_range.as_pair(),
            show_y1: on(Toggle::Curve1),
            show_y2: on(Toggle::Curve2),
            show_y3: on(Toggle::Benchmark),
            show_y4: on(Toggle::PiecewiseFromCurve2),
            show_y5: on(Toggle::PiecewiseFromCurve1),
            show_y6: on(Toggle::Call),
            show_y7: on(Toggle::Put),
            show_y8: on(Toggle::Long),
            show_y9: on(Toggle::Short),
            show_y10: on(Toggle::Net),
            show_y11: on(Toggle::Overlay),
        }
    }
}

/// Read a raw config document.
///
/// Only JSON syntax is checked here; field-level validation happens in
/// [`crate::io::validate`].
pub fn read_config_file(path: &Path) -> Result<Value, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open config '{}': {e}", path.display())))?;
    let raw: Value = serde_json::from_reader(file)
        .map_err(|e| AppError::import(format!("'{}' is not valid JSON: {e}", path.display())))?;

    if let Some(v) = raw.get("schemaVersion").and_then(Value::as_u64) {
        if v > u64::from(SCHEMA_VERSION) {
            warn!(found = v, supported = SCHEMA_VERSION, "config written by a newer schema");
        }
    }
    info!(path = %path.display(), "config read");
    Ok(raw)
}

/// Write a snapshot as pretty-printed JSON.
pub fn write_config_file(path: &Path, snapshot: &ConfigSnapshot) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create config '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, snapshot)
        .map_err(|e| AppError::io(format!("Failed to write config snapshot: {e}")))?;
    info!(path = %path.display(), "config snapshot written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::TimeZone;
    use tempfile::{NamedTempFile, TempDir};

    use super::*;

    #[test]
    fn snapshot_uses_inbound_key_names() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let snap = ConfigSnapshot::capture_at(&ParameterSet::default(), &ToggleSet::default(), at);
        let v = serde_json::to_value(&snap).unwrap();
        let obj = v.as_object().unwrap();

        for key in [
            "schemaVersion", "exportedAt", "x0_1", "constant1", "b1", "b1Base", "autoRolloverB1",
            "b1_add_option", "x0_2", "b2Base", "refConst", "callContracts", "premiumPut",
            "longEntryPrice", "shortShares", "includePremium", "biasMode", "x1Range", "showY1",
            "showY11",
        ] {
            assert!(obj.contains_key(key), "missing key {key}");
        }
        assert_eq!(obj["biasMode"], "real");
        assert_eq!(obj["x1Range"], serde_json::json!([1.0, 20.0]));
        assert_eq!(obj["showY3"], false);
        assert_eq!(obj["exportedAt"], "2026-03-01T12:00:00Z");
    }

    #[test]
    fn snapshot_file_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let snap = ConfigSnapshot::capture(&ParameterSet::default(), &ToggleSet::all_on());
        write_config_file(&path, &snap).unwrap();
        let raw = read_config_file(&path).unwrap();
        let back: ConfigSnapshot = serde_json::from_value(raw).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn invalid_json_is_an_import_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = read_config_file(file.path()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INVALID_INPUT);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let err = read_config_file(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_IO);
    }
}
