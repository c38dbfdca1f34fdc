// JSON Lines and JSON artifact I/O.
//
// The raw logs are append-only and may contain lines written by a crashed or
// older collector; readers skip anything that does not parse and keep going.

use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Read every well-formed record from a JSONL file. A missing file is empty.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for (line_no, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                // Invalid UTF-8 and the like
                warn!(path = %path.display(), line = line_no + 1, error = %e, "Skipping unreadable JSONL line");
                skipped += 1;
                continue;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(trimmed) {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!(path = %path.display(), line = line_no + 1, error = %e, "Skipping malformed JSONL line");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(path = %path.display(), skipped, "Some JSONL lines were skipped");
    }

    Ok(rows)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Append records to a JSONL file, one compact object per line.
pub fn append_jsonl<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    ensure_parent(path)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {} for append", path.display()))?;
    let mut writer = BufWriter::new(file);
    for row in rows {
        serde_json::to_writer(&mut writer, row)?;
        writer.write_all(b"\n")?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Write a pretty-printed JSON document with a trailing newline.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    let mut body = serde_json::to_string_pretty(value)?;
    body.push('\n');
    fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Read a JSON document. A missing file is `None`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let body =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str(&body)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(value))
}

/// Summary printed by the `count` subcommand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileSummary {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_objects: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_ids: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_engine: Option<BTreeMap<String, usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_query: Option<BTreeMap<String, usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clusters: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_cluster: Option<BTreeMap<String, usize>>,
}

fn non_empty_str<'a>(value: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(|v| v.as_str()).filter(|s| !s.is_empty())
}

/// Summarize a JSONL log or a JSON artifact.
pub fn count_file(path: &Path) -> Result<FileSummary> {
    let mut summary = FileSummary {
        file: path.display().to_string(),
        ..Default::default()
    };

    if !path.exists() {
        summary.error = Some("file_not_found".to_string());
        return Ok(summary);
    }

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("jsonl") => {
            let rows: Vec<serde_json::Value> = read_jsonl(path)?;
            let mut ids = HashSet::new();
            let mut per_engine = BTreeMap::new();
            let mut per_query = BTreeMap::new();
            for row in &rows {
                if let Some(id) = non_empty_str(row, "id") {
                    ids.insert(id.to_string());
                }
                if let Some(engine) = non_empty_str(row, "engine") {
                    *per_engine.entry(engine.to_string()).or_insert(0) += 1;
                }
                if let Some(query) = non_empty_str(row, "query") {
                    *per_query.entry(query.to_string()).or_insert(0) += 1;
                }
            }
            summary.valid_objects = Some(rows.len());
            summary.unique_ids = Some(ids.len());
            summary.per_engine = Some(per_engine);
            summary.per_query = Some(per_query);
        }
        Some("json") => {
            let payload: Option<serde_json::Value> = read_json(path)?;
            match payload {
                Some(serde_json::Value::Array(items)) => {
                    let ids: HashSet<&str> =
                        items.iter().filter_map(|item| non_empty_str(item, "id")).collect();
                    summary.items = Some(items.len());
                    summary.unique_ids = Some(ids.len());
                }
                Some(serde_json::Value::Object(map)) if map.contains_key("clusters") => {
                    let clusters = map
                        .get("clusters")
                        .and_then(|c| c.as_array())
                        .cloned()
                        .unwrap_or_default();
                    let per_cluster = clusters
                        .iter()
                        .filter_map(|cluster| {
                            let id = cluster.get("cluster_id")?.as_str()?.to_string();
                            let count = cluster
                                .get("items")
                                .and_then(|items| items.as_array())
                                .map_or(0, Vec::len);
                            Some((id, count))
                        })
                        .collect();
                    summary.clusters = Some(clusters.len());
                    summary.per_cluster = Some(per_cluster);
                }
                Some(_) => summary.items = Some(1),
                None => summary.items = Some(0),
            }
        }
        _ => summary.error = Some("Unsupported file type".to_string()),
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawResult;

    #[test]
    fn test_read_jsonl_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let rows: Vec<RawResult> = read_jsonl(&dir.path().join("nope.jsonl")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_read_jsonl_skips_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.jsonl");
        fs::write(
            &path,
            "{\"id\":\"a\",\"title\":\"T\"}\n\nnot json\n{\"id\":\"b\"}\n",
        )
        .unwrap();
        let rows: Vec<RawResult> = read_jsonl(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "T");
        assert_eq!(rows[1].snippet, "");
    }

    #[test]
    fn test_append_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/raw.jsonl");
        let first = RawResult { id: "a".into(), ..Default::default() };
        let second = RawResult { id: "b".into(), ..Default::default() };
        append_jsonl(&path, &[first]).unwrap();
        append_jsonl(&path, &[second]).unwrap();
        let rows: Vec<RawResult> = read_jsonl(&path).unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_write_json_pretty_with_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/value.json");
        write_json(&path, &serde_json::json!({"a": 1})).unwrap();
        let body = fs::read_to_string(&path).unwrap();
        assert!(body.ends_with("}\n"));
        let back: Option<serde_json::Value> = read_json(&path).unwrap();
        assert_eq!(back, Some(serde_json::json!({"a": 1})));
    }

    #[test]
    fn test_count_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.jsonl");
        fs::write(
            &path,
            "{\"id\":\"a\",\"engine\":\"searxng\",\"query\":\"q\"}\n{\"id\":\"a\",\"engine\":\"searxng\"}\nbad\n",
        )
        .unwrap();
        let summary = count_file(&path).unwrap();
        assert_eq!(summary.valid_objects, Some(2));
        assert_eq!(summary.unique_ids, Some(1));
        assert_eq!(summary.per_engine.unwrap().get("searxng"), Some(&2));
    }

    #[test]
    fn test_count_clusters_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clusters.json");
        write_json(
            &path,
            &serde_json::json!({"clusters": [{"cluster_id": "c1", "items": ["a", "b"]}]}),
        )
        .unwrap();
        let summary = count_file(&path).unwrap();
        assert_eq!(summary.clusters, Some(1));
        assert_eq!(summary.per_cluster.unwrap().get("c1"), Some(&2));
    }

    #[test]
    fn test_count_missing_and_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = count_file(&dir.path().join("x.jsonl")).unwrap();
        assert_eq!(missing.error.as_deref(), Some("file_not_found"));

        let path = dir.path().join("notes.txt");
        fs::write(&path, "hi").unwrap();
        let unsupported = count_file(&path).unwrap();
        assert_eq!(unsupported.error.as_deref(), Some("Unsupported file type"));
    }
}
