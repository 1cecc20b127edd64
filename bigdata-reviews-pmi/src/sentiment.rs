use {
    std::collections::BTreeMap,
    tracing::info,
    bigdata_reviews_core::{
        aggregation::{Aggregator, DocumentSentiment, GroupSentiment, source_sentiments},
        config::Config,
        cooccurrence::CooccurrenceCounter,
        error::Result,
        models::TokenSequence,
        pmi::{AnchorSet, PmiScorer, Polarity, ScoreTable},
        ranking::{
            AnchorMentions,
            RankedWord,
            RankingOptions,
            WordFrequency,
            anchor_mentions,
            top_words,
            word_frequencies,
        },
    },
};

const WORD_FREQUENCY_LIMIT: usize = 100;

/// Validated settings of the scoring step; built before any data is read.
pub struct SentimentStep {
    counter: CooccurrenceCounter,
    anchors: AnchorSet,
    smoothing: f64,
    shard_size: usize,
    ranking: RankingOptions,
    aspects: BTreeMap<String, Vec<String>>,
}

pub struct SentimentAnalysis {
    pub documents: usize,
    pub total_tokens: u64,
    pub vocabulary_size: usize,
    pub scores: ScoreTable,
    pub top_positive: Vec<RankedWord>,
    pub top_negative: Vec<RankedWord>,
    pub word_frequencies: Vec<WordFrequency>,
    pub anchor_mentions: AnchorMentions,
    pub document_sentiments: Vec<DocumentSentiment>,
    pub aspect_sentiments: Vec<GroupSentiment>,
    pub source_sentiments: Vec<GroupSentiment>,
}

impl SentimentStep {
    pub fn new(config: &Config) -> Result<Self> {
        let scoring = config.scoring();
        let report = config.report();

        Ok(Self {
            counter: scoring.counter()?,
            anchors: scoring.anchor_set()?,
            smoothing: scoring.validated_smoothing()?,
            shard_size: scoring.shard_size(),
            ranking: RankingOptions::new(report.top_words(), report.min_context_count(), report.excluded_words()),
            aspects: config.aspects().clone(),
        })
    }

    pub fn run(&self, sequences: &[TokenSequence]) -> Result<SentimentAnalysis> {
        info!("counting co-occurrences with window {}", self.counter.window().get());
        let table = self.counter.count_parallel(sequences, self.shard_size)?;

        let scores = PmiScorer::new(&table, &self.anchors, self.smoothing)?.score_vocabulary();

        let aggregator = Aggregator::new(&scores);
        let document_sentiments = aggregator.document_sentiments(sequences);
        let undefined = document_sentiments.iter().filter(|document| !document.sentiment.is_defined()).count();
        info!("scored {} documents, {} without any known token", document_sentiments.len(), undefined);

        let aspect_sentiments = aggregator.aspect_sentiments(sequences, &self.aspects);
        let source_sentiments = source_sentiments(&document_sentiments);

        Ok(SentimentAnalysis {
            documents: table.documents(),
            total_tokens: table.total_tokens(),
            vocabulary_size: table.vocabulary().len(),
            top_positive: top_words(&scores, &self.ranking, Polarity::Positive),
            top_negative: top_words(&scores, &self.ranking, Polarity::Negative),
            word_frequencies: word_frequencies(&table, WORD_FREQUENCY_LIMIT),
            anchor_mentions: anchor_mentions(&table, &self.anchors),
            scores,
            document_sentiments,
            aspect_sentiments,
            source_sentiments,
        })
    }
}
