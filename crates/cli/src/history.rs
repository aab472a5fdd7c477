use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::args::{Localization, tr};

/// One compared pair, stored as a JSON line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HistoryRecord {
    pub(crate) timestamp: u64,
    pub(crate) base_file: String,
    pub(crate) compare_file: String,
    pub(crate) mode: String,
    pub(crate) overall_similarity: Option<f64>,
}

pub(crate) fn now_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub(crate) fn append_records(path: &Path, records: &[HistoryRecord]) -> io::Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    let mut buf = String::new();
    for record in records {
        let line = serde_json::to_string(record)
            .map_err(|e| io::Error::other(format!("json encode: {e}")))?;
        buf.push_str(&line);
        buf.push('\n');
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(buf.as_bytes())
}

/// Records in file order. A missing file has no records; malformed lines are
/// skipped with a warning.
pub(crate) fn load_records(path: &Path) -> io::Result<Vec<HistoryRecord>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err),
    };

    let mut out = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<HistoryRecord>(line) {
            Ok(record) => out.push(record),
            Err(err) => {
                tracing::warn!(line = idx + 1, error = %err, "skipping malformed history line");
            }
        }
    }
    Ok(out)
}

pub(crate) fn format_records(records: &[HistoryRecord], localization: Localization) -> String {
    let mut out = String::new();
    if records.is_empty() {
        out.push_str(tr(localization, "no history\n", "暂无历史记录\n"));
        return out;
    }
    for record in records {
        let similarity = match record.overall_similarity {
            Some(value) => format!("{:.2}%", value * 100.0),
            None => tr(localization, "n/a", "无").to_string(),
        };
        out.push_str(&format!(
            "{} - {}: {} - {}: {} ({similarity})\n",
            record.timestamp,
            tr(localization, "Base", "基准"),
            record.base_file,
            tr(localization, "Compare", "比较"),
            record.compare_file,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    fn temp_dir(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be monotonic")
            .as_nanos();
        std::env::temp_dir().join(format!("code-pair-check-history-{suffix}-{nanos}"))
    }

    fn record(compare_file: &str, overall: Option<f64>) -> HistoryRecord {
        HistoryRecord {
            timestamp: 1_700_000_000,
            base_file: "base.py".to_string(),
            compare_file: compare_file.to_string(),
            mode: "syntax".to_string(),
            overall_similarity: overall,
        }
    }

    #[test]
    fn appended_records_load_back_in_order() -> io::Result<()> {
        let root = temp_dir("roundtrip");
        fs::create_dir_all(&root)?;
        let path = root.join("history.jsonl");

        append_records(&path, &[record("a.py", Some(0.5))])?;
        append_records(&path, &[record("b.py", None)])?;
        let loaded = load_records(&path)?;
        assert_eq!(loaded, vec![record("a.py", Some(0.5)), record("b.py", None)]);

        let raw = fs::read_to_string(&path)?;
        assert!(raw.contains("\"compareFile\":\"a.py\""));
        assert!(raw.contains("\"overallSimilarity\":null"));

        fs::remove_dir_all(&root)?;
        Ok(())
    }

    #[test]
    fn missing_file_has_no_records() -> io::Result<()> {
        let path = temp_dir("missing").join("history.jsonl");
        assert!(load_records(&path)?.is_empty());
        Ok(())
    }

    #[test]
    fn malformed_lines_are_skipped() -> io::Result<()> {
        let root = temp_dir("malformed");
        fs::create_dir_all(&root)?;
        let path = root.join("history.jsonl");
        fs::write(&path, "not json\n\n")?;
        append_records(&path, &[record("a.py", Some(1.0))])?;

        assert_eq!(load_records(&path)?.len(), 1);

        fs::remove_dir_all(&root)?;
        Ok(())
    }

    #[test]
    fn records_format_as_one_line_each() {
        let text = format_records(
            &[record("a.py", Some(0.875)), record("b.py", None)],
            Localization::En,
        );
        assert_eq!(
            text,
            "1700000000 - Base: base.py - Compare: a.py (87.50%)\n\
             1700000000 - Base: base.py - Compare: b.py (n/a)\n"
        );
        assert_eq!(format_records(&[], Localization::Zh), "暂无历史记录\n");
    }
}
