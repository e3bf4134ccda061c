// ==========================================
// AIT CMMS - priority list import
// ==========================================
// The planning group maintains three curated CSV lists of A220
// equipment; list 1 is scheduled first, then 2, then 3. Everything
// else defaults to tier 99. The files are hand-exported from
// spreadsheets, so headers may carry a BOM and equipment numbers
// sometimes arrive as floats ("10452.0").
// ==========================================

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, warn};

/// Tier CSV filenames, in priority order.
const DEFAULT_TIER_FILES: &[(&str, i32)] = &[
    ("PM_LIST_A220_1.csv", 1),
    ("PM_LIST_A220_2.csv", 2),
    ("PM_LIST_A220_3.csv", 3),
];

/// Result of a load: the tier map plus any warnings worth surfacing
/// to the operator (the load itself never fails).
#[derive(Debug, Default)]
pub struct PriorityListOutcome {
    pub priority_map: HashMap<String, i32>,
    pub warnings: Vec<String>,
}

pub struct PriorityListLoader;

impl PriorityListLoader {
    /// Load the three default tier files from `dir`. A missing file
    /// is normal (not every site curates all three lists); a present
    /// but unreadable or malformed file produces a warning.
    pub fn load_default(dir: &Path) -> PriorityListOutcome {
        let mut outcome = PriorityListOutcome::default();
        for (filename, tier) in DEFAULT_TIER_FILES {
            let path = dir.join(filename);
            if !path.exists() {
                info!(file = %path.display(), "priority list not present, skipping");
                continue;
            }
            Self::load_file(&path, *tier, &mut outcome);
        }
        info!(
            entries = outcome.priority_map.len(),
            warnings = outcome.warnings.len(),
            "priority lists loaded"
        );
        outcome
    }

    /// Merge one tier file into the outcome. An asset listed in more
    /// than one file takes the tier of the last file loaded.
    pub fn load_file(path: &Path, tier: i32, outcome: &mut PriorityListOutcome) {
        let mut reader = match csv::Reader::from_path(path) {
            Ok(reader) => reader,
            Err(e) => {
                let msg = format!("failed to open {}: {}", path.display(), e);
                warn!("{}", msg);
                outcome.warnings.push(msg);
                return;
            }
        };

        let headers = match reader.headers() {
            Ok(headers) => headers.clone(),
            Err(e) => {
                let msg = format!("failed to read headers of {}: {}", path.display(), e);
                warn!("{}", msg);
                outcome.warnings.push(msg);
                return;
            }
        };

        let Some(bfm_idx) = headers.iter().position(is_bfm_header) else {
            let msg = format!("no BFM column in {}", path.display());
            warn!("{}", msg);
            outcome.warnings.push(msg);
            return;
        };

        let mut loaded = 0usize;
        for record in reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping malformed row");
                    continue;
                }
            };
            let Some(raw) = record.get(bfm_idx) else {
                continue;
            };
            let bfm_no = normalize_equipment_no(raw);
            if bfm_no.is_empty() {
                continue;
            }
            outcome.priority_map.insert(bfm_no, tier);
            loaded += 1;
        }

        debug!(file = %path.display(), tier, rows = loaded, "tier file loaded");
    }
}

/// Spreadsheet exports may prefix the first header with a UTF-8 BOM.
fn is_bfm_header(header: &str) -> bool {
    header
        .trim_start_matches('\u{feff}')
        .trim()
        .to_ascii_uppercase()
        .contains("BFM")
}

/// Equipment numbers exported through a spreadsheet sometimes come
/// back as floats; "10452.0" and "10452" are the same asset.
fn normalize_equipment_no(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            return (value as i64).to_string();
        }
    }
    trimmed.to_string()
}
