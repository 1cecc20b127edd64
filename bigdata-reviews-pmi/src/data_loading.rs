use {
    std::{fs::read_dir, path::{Path, PathBuf}, collections::HashSet},
    anyhow::{Context, Result},
    chrono::{DateTime, NaiveDate, NaiveDateTime},
    indicatif::ProgressBar,
    serde::Deserialize,
    tracing::{info, warn},
    bigdata_reviews_core::{config::InputConfig, models::Document},
};

#[derive(Deserialize, Debug)]
pub struct RawDataEntry {
    #[serde(alias = "comment_id")]
    id: Option<String>,
    #[serde(alias = "comment", alias = "review", alias = "content")]
    text: Option<String>,
    #[serde(alias = "date", alias = "timestamp_date")]
    timestamp: Option<String>,
    #[serde(alias = "platform")]
    source: Option<String>,
}

/// Loads every configured export; directories contribute all of their csv files.
pub fn load_data_files(config: &InputConfig) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    let mut seen_texts = HashSet::new();
    let mut duplicates = 0;

    for path in data_file_paths(&config.paths())? {
        let loaded = load_data_file(&path).with_context(|| format!("failed to load {}", path.display()))?;

        for document in loaded {
            if seen_texts.insert(document.text().to_owned()) {
                documents.push(document);
            } else {
                duplicates += 1;
            }
        }
    }

    info!("loaded {} documents ({} duplicates dropped)", documents.len(), duplicates);
    Ok(documents)
}

fn data_file_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut entries = Vec::new();
            for entry in read_dir(path).with_context(|| format!("failed to list {}", path.display()))? {
                let entry_path = entry?.path();
                if entry_path.extension().map(|extension| extension == "csv").unwrap_or(false) {
                    entries.push(entry_path);
                }
            }
            entries.sort();
            files.extend(entries);
        } else {
            files.push(path.clone());
        }
    }

    Ok(files)
}

fn load_data_file(path: &Path) -> Result<Vec<Document>> {
    info!("loading file: {}", path.display());

    let file_stem = path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "reviews".to_owned());

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let records: Vec<_> = reader.records().collect();

    let pb = ProgressBar::new(records.len() as u64);

    let mut documents = Vec::new();
    let mut skipped = 0;

    for (row, record) in records.into_iter().enumerate() {
        pb.inc(1);

        let entry: RawDataEntry = match record.and_then(|record| record.deserialize(Some(&headers))) {
            Ok(v) => v,
            Err(err) => {
                warn!("skipping malformed row {} in {}: {}", row + 1, path.display(), err);
                skipped += 1;
                continue;
            },
        };

        let text = match entry.text.filter(|text| !text.trim().is_empty()) {
            Some(v) => v,
            None => {
                skipped += 1;
                continue;
            },
        };

        documents.push(
            Document::builder()
                .id(entry.id.unwrap_or_else(|| format!("{}-{}", file_stem, row + 1)))
                .text(text)
                .timestamp(entry.timestamp.as_deref().and_then(parse_timestamp))
                .source(entry.source.unwrap_or_else(|| file_stem.clone()))
                .build()
        );
    }

    pb.finish_and_clear();

    if skipped > 0 {
        warn!("{}: skipped {} rows without usable text", path.display(), skipped);
    }

    Ok(documents)
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    // timestamps with an offset are converted to utc
    if let Some(timestamp) = DateTime::parse_from_rfc3339(raw).ok()
        .or_else(|| ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"].iter()
            .find_map(|format| DateTime::parse_from_str(raw, format).ok())) {
        return Some(timestamp.naive_utc());
    }

    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"].iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| ["%Y-%m-%d", "%d %B %Y"].iter()
            .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
            .and_then(|date| date.and_hms_opt(0, 0, 0)))
}
