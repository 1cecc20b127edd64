use {
    std::{cmp::Ordering, collections::HashSet},
    serde::Serialize,
    crate::{
        cooccurrence::CooccurrenceTable,
        pmi::{AnchorSet, Polarity, ScoreTable},
    },
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedWord {
    pub word: String,
    pub context_count: u64,
    pub sentiment_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordFrequency {
    pub word: String,
    pub count: u64,
}

/// Anchor occurrences across the corpus, as shown on the sentiment dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnchorMentions {
    pub positive: u64,
    pub negative: u64,
    pub total: u64,
    pub positive_ratio: Option<f64>,
}

pub struct RankingOptions {
    pub top: usize,
    pub min_context_count: u64,
    pub excluded_words: HashSet<String>,
}

impl RankingOptions {
    pub fn new(top: usize, min_context_count: u64, excluded_words: impl IntoIterator<Item = String>) -> Self {
        Self {
            top,
            min_context_count,
            excluded_words: excluded_words.into_iter().collect(),
        }
    }
}

/// Most positive (or most negative) words among frequent, non-excluded words.
pub fn top_words(scores: &ScoreTable, options: &RankingOptions, polarity: Polarity) -> Vec<RankedWord> {
    let mut ranked: Vec<RankedWord> = scores.iter()
        .filter(|(word, score)| score.context_count >= options.min_context_count && !options.excluded_words.contains(*word))
        .map(|(word, score)| RankedWord {
            word: word.to_owned(),
            context_count: score.context_count,
            sentiment_score: score.sentiment(),
        })
        .collect();

    ranked.sort_by(|a, b| {
        let by_score = match polarity {
            Polarity::Positive => b.sentiment_score.partial_cmp(&a.sentiment_score),
            Polarity::Negative => a.sentiment_score.partial_cmp(&b.sentiment_score),
        };
        by_score.unwrap_or(Ordering::Equal).then_with(|| a.word.cmp(&b.word))
    });
    ranked.truncate(options.top);
    ranked
}

pub fn word_frequencies(table: &CooccurrenceTable, top: usize) -> Vec<WordFrequency> {
    let mut frequencies: Vec<WordFrequency> = table.vocabulary()
        .words()
        .map(|word| WordFrequency {
            word: word.to_owned(),
            count: table.marginal(word),
        })
        .collect();

    frequencies.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    frequencies.truncate(top);
    frequencies
}

pub fn anchor_mentions(table: &CooccurrenceTable, anchors: &AnchorSet) -> AnchorMentions {
    let positive: u64 = anchors.positive().iter().map(|word| table.marginal(word)).sum();
    let negative: u64 = anchors.negative().iter().map(|word| table.marginal(word)).sum();
    let total = positive + negative;

    AnchorMentions {
        positive,
        negative,
        total,
        positive_ratio: if total > 0 {
            Some((positive as f64 / total as f64 * 1000.0).round() / 10.0)
        } else {
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{cooccurrence::CooccurrenceCounter, models::TokenSequence, pmi::PolarityScore},
    };

    fn score(context_count: u64, sentiment: f64) -> PolarityScore {
        PolarityScore {
            context_count,
            positive_count: 0,
            negative_count: 0,
            pmi_positive: sentiment,
            pmi_negative: 0.0,
        }
    }

    #[test]
    fn top_words_respect_threshold_exclusions_and_order() {
        let scores: ScoreTable = vec![
            ("masterpiece".to_owned(), score(7, 3.0)),
            ("gorgeous".to_owned(), score(9, 2.0)),
            ("rare".to_owned(), score(2, 9.0)),
            ("ubisoft".to_owned(), score(40, 5.0)),
            ("stutter".to_owned(), score(6, -4.0)),
            ("clunky".to_owned(), score(5, -2.0)),
        ].into_iter().collect();
        let options = RankingOptions::new(2, 5, vec!["ubisoft".to_owned()]);

        let positive = top_words(&scores, &options, Polarity::Positive);
        let negative = top_words(&scores, &options, Polarity::Negative);

        assert_eq!(positive.iter().map(|w| w.word.as_str()).collect::<Vec<_>>(), vec!["masterpiece", "gorgeous"]);
        assert_eq!(negative.iter().map(|w| w.word.as_str()).collect::<Vec<_>>(), vec!["stutter", "clunky"]);
        assert_eq!(negative[0].context_count, 6);
    }

    #[test]
    fn frequencies_and_mentions_come_from_marginals() {
        let sequences = vec![
            TokenSequence::from_words("1", &["great", "story", "great"]),
            TokenSequence::from_words("2", &["bug", "story"]),
        ];
        let table = CooccurrenceCounter::new(2).unwrap().count(&sequences).unwrap();
        let anchors = AnchorSet::new(vec!["great", "amazing"], vec!["bug", "crash"]).unwrap();

        let frequencies = word_frequencies(&table, 2);
        let mentions = anchor_mentions(&table, &anchors);

        assert_eq!(frequencies, vec![
            WordFrequency { word: "great".to_owned(), count: 2 },
            WordFrequency { word: "story".to_owned(), count: 2 },
        ]);
        assert_eq!(mentions.positive, 2);
        assert_eq!(mentions.negative, 1);
        assert_eq!(mentions.total, 3);
        assert_eq!(mentions.positive_ratio, Some(66.7));
    }
}
