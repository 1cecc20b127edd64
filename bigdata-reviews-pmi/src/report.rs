use {
    std::{fs, path::Path, cmp::Ordering},
    anyhow::{Context, Result},
    serde::Serialize,
    tracing::info,
    bigdata_reviews_core::{
        aggregation::GroupSentiment,
        ranking::AnchorMentions,
    },
    crate::sentiment::SentimentAnalysis,
};

#[derive(Serialize)]
struct WordScoreRow<'a> {
    word: &'a str,
    context_count: u64,
    pos_count: u64,
    neg_count: u64,
    pmi_positive: f64,
    pmi_negative: f64,
    sentiment_score: f64,
}

#[derive(Serialize)]
struct DocumentRow<'a> {
    id: &'a str,
    source: Option<&'a str>,
    known_tokens: usize,
    sentiment: Option<f64>,
}

#[derive(Serialize)]
struct AspectRow<'a> {
    aspect: &'a str,
    documents: usize,
    sentiment: Option<f64>,
}

#[derive(Serialize)]
struct SourceRow<'a> {
    source: &'a str,
    documents: usize,
    sentiment: Option<f64>,
}

#[derive(Serialize)]
struct Summary<'a> {
    documents: usize,
    total_tokens: u64,
    vocabulary_size: usize,
    scored_words: usize,
    undefined_documents: usize,
    anchor_mentions: &'a AnchorMentions,
}

pub fn write_reports(output_dir: &Path, analysis: &SentimentAnalysis, warnings: &[String]) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    let mut word_scores: Vec<WordScoreRow> = analysis.scores.iter()
        .map(|(word, score)| WordScoreRow {
            word,
            context_count: score.context_count,
            pos_count: score.positive_count,
            neg_count: score.negative_count,
            pmi_positive: score.pmi_positive,
            pmi_negative: score.pmi_negative,
            sentiment_score: score.sentiment(),
        })
        .collect();
    word_scores.sort_by(|a, b| b.sentiment_score.partial_cmp(&a.sentiment_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.word.cmp(b.word)));
    write_csv(&output_dir.join("word_scores.csv"), word_scores)?;

    write_csv(&output_dir.join("pmi_positive.csv"), &analysis.top_positive)?;
    write_csv(&output_dir.join("pmi_negative.csv"), &analysis.top_negative)?;
    write_csv(&output_dir.join("word_freq.csv"), &analysis.word_frequencies)?;

    write_csv(
        &output_dir.join("document_sentiment.csv"),
        analysis.document_sentiments.iter().map(|document| DocumentRow {
            id: &document.document_id,
            source: document.source.as_deref(),
            known_tokens: document.known_tokens,
            sentiment: document.sentiment.value(),
        }),
    )?;

    write_csv(
        &output_dir.join("aspect_sentiment.csv"),
        analysis.aspect_sentiments.iter().map(|group| AspectRow {
            aspect: &group.label,
            documents: group.documents,
            sentiment: group.sentiment.value(),
        }),
    )?;

    write_csv(
        &output_dir.join("source_sentiment.csv"),
        analysis.source_sentiments.iter().map(|group: &GroupSentiment| SourceRow {
            source: &group.label,
            documents: group.documents,
            sentiment: group.sentiment.value(),
        }),
    )?;

    let summary = Summary {
        documents: analysis.documents,
        total_tokens: analysis.total_tokens,
        vocabulary_size: analysis.vocabulary_size,
        scored_words: analysis.scores.len(),
        undefined_documents: analysis.document_sentiments.iter().filter(|document| !document.sentiment.is_defined()).count(),
        anchor_mentions: &analysis.anchor_mentions,
    };
    fs::write(output_dir.join("summary.json"), serde_json::to_vec_pretty(&summary)?)
        .context("failed to write summary")?;

    let warnings_path = output_dir.join("warnings.jsonl");
    if !warnings.is_empty() {
        let mut lines = warnings.join("\n");
        lines.push('\n');
        fs::write(&warnings_path, lines).context("failed to write warnings log")?;
    } else if warnings_path.exists() {
        // left by an earlier run
        fs::remove_file(&warnings_path).context("failed to remove previous warnings log")?;
    }

    info!("reports written to {}", output_dir.display());
    Ok(())
}

fn write_csv<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<()> {
    let mut csv_writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        bigdata_reviews_core::{
            config::Config,
            models::TokenSequence,
        },
        crate::sentiment::SentimentStep,
    };

    fn analysis() -> SentimentAnalysis {
        let config = Config::from_toml(r#"
[scoring]
positive_anchors = ["great", "amazing"]
negative_anchors = ["bad", "bug", "crash"]

[report]
min_context_count = 1
top_words = 2

[aspects]
story = ["story"]
netcode = ["lobby"]
"#).unwrap();
        let sequences = vec![
            TokenSequence::from_words("1", &["great", "story", "bad", "bug"]).with_source("steam"),
            TokenSequence::from_words("2", &["story", "amazing", "bug", "crash"]).with_source("reddit"),
        ];

        SentimentStep::new(&config).unwrap().run(&sequences).unwrap()
    }

    #[test]
    fn writes_every_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("results").join("pmi");

        write_reports(&output_dir, &analysis(), &["{\"message\":\"skipped 1 rows\"}".to_owned()]).unwrap();

        for file in [
            "word_scores.csv",
            "pmi_positive.csv",
            "pmi_negative.csv",
            "word_freq.csv",
            "document_sentiment.csv",
            "aspect_sentiment.csv",
            "source_sentiment.csv",
            "summary.json",
            "warnings.jsonl",
        ] {
            assert!(output_dir.join(file).exists(), "{} is missing", file);
        }

        let positive = fs::read_to_string(output_dir.join("pmi_positive.csv")).unwrap();
        assert!(positive.starts_with("word,context_count,sentiment_score\namazing,1,"));
        assert_eq!(positive.lines().count(), 3);

        let summary: serde_json::Value = serde_json::from_slice(&fs::read(output_dir.join("summary.json")).unwrap()).unwrap();
        assert_eq!(summary["documents"], 2);
        assert_eq!(summary["anchor_mentions"]["total"], 6);
    }

    #[test]
    fn word_scores_carry_anchor_joint_counts() {
        let dir = tempfile::tempdir().unwrap();

        write_reports(dir.path(), &analysis(), &[]).unwrap();

        let word_scores = fs::read_to_string(dir.path().join("word_scores.csv")).unwrap();
        let mut lines = word_scores.lines();
        assert_eq!(lines.next(), Some("word,context_count,pos_count,neg_count,pmi_positive,pmi_negative,sentiment_score"));
        // bug co-occurs with great and amazing once each, and with its own set four times
        assert!(lines.any(|line| line.starts_with("bug,2,2,4,")), "{}", word_scores);
    }

    #[test]
    fn warnings_of_a_previous_run_are_removed() {
        let dir = tempfile::tempdir().unwrap();

        write_reports(dir.path(), &analysis(), &["{\"message\":\"skipped 1 rows\"}".to_owned()]).unwrap();
        assert!(dir.path().join("warnings.jsonl").exists());

        write_reports(dir.path(), &analysis(), &[]).unwrap();
        assert!(!dir.path().join("warnings.jsonl").exists());
    }

    #[test]
    fn undefined_sentiment_is_an_empty_cell() {
        let dir = tempfile::tempdir().unwrap();

        write_reports(dir.path(), &analysis(), &[]).unwrap();

        let aspects = fs::read_to_string(dir.path().join("aspect_sentiment.csv")).unwrap();
        assert!(aspects.contains("netcode,0,\n"));
        assert!(!dir.path().join("warnings.jsonl").exists());
    }
}
