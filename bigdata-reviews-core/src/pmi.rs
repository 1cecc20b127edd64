use {
    std::collections::{BTreeSet, HashMap},
    tracing::{debug, info, warn},
    rayon::prelude::*,
    crate::{
        error::{Result, SentimentError},
        cooccurrence::CooccurrenceTable,
    },
};

/// PMI, in bits, of a word that never co-occurs with an anchor set.
pub const PMI_FLOOR: f64 = -20.0;

/// Additive smoothing applied to observed joint counts.
pub const DEFAULT_SMOOTHING: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

/// Disjoint positive and negative seed words.
#[derive(Debug, Clone)]
pub struct AnchorSet {
    positive: BTreeSet<String>,
    negative: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarityScore {
    pub context_count: u64,
    /// Observed joint count with the positive anchors.
    pub positive_count: u64,
    pub negative_count: u64,
    pub pmi_positive: f64,
    pub pmi_negative: f64,
}

/// Polarity scores of every scored word.
#[derive(Debug, Clone, Default)]
pub struct ScoreTable {
    scores: HashMap<String, PolarityScore>,
}

pub struct PmiScorer<'a> {
    table: &'a CooccurrenceTable,
    positive: Vec<u32>,
    negative: Vec<u32>,
    smoothing: f64,
}

impl AnchorSet {
    pub fn new<I, S>(positive: I, negative: I) -> Result<Self> where I: IntoIterator<Item = S>, S: Into<String> {
        let positive: BTreeSet<String> = positive.into_iter().map(Into::into).collect();
        let negative: BTreeSet<String> = negative.into_iter().map(Into::into).collect();

        if positive.is_empty() || negative.is_empty() {
            return Err(SentimentError::invalid_configuration("both anchor sets need at least one word"));
        }

        let overlap: Vec<&String> = positive.intersection(&negative).collect();
        if !overlap.is_empty() {
            return Err(SentimentError::invalid_configuration(
                format!("words present in both anchor sets: {:?}", overlap)
            ));
        }

        Ok(Self {
            positive,
            negative,
        })
    }

    pub fn positive(&self) -> &BTreeSet<String> {
        &self.positive
    }

    pub fn negative(&self) -> &BTreeSet<String> {
        &self.negative
    }
}

impl PolarityScore {
    pub fn sentiment(&self) -> f64 {
        self.pmi_positive - self.pmi_negative
    }
}

impl ScoreTable {
    pub fn get(&self, word: &str) -> Option<&PolarityScore> {
        self.scores.get(word)
    }

    pub fn sentiment(&self, word: &str) -> Option<f64> {
        self.get(word).map(PolarityScore::sentiment)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PolarityScore)> {
        self.scores.iter().map(|(word, score)| (word.as_str(), score))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn insert(&mut self, word: impl Into<String>, score: PolarityScore) {
        self.scores.insert(word.into(), score);
    }
}

impl FromIterator<(String, PolarityScore)> for ScoreTable {
    fn from_iter<T: IntoIterator<Item = (String, PolarityScore)>>(iter: T) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

pub fn validate_smoothing(smoothing: f64) -> Result<f64> {
    if !smoothing.is_finite() || smoothing < 0.0 {
        return Err(SentimentError::invalid_configuration(
            format!("smoothing must be a finite non-negative number, got {}", smoothing)
        ));
    }

    Ok(smoothing)
}

impl<'a> PmiScorer<'a> {
    pub fn new(table: &'a CooccurrenceTable, anchors: &AnchorSet, smoothing: f64) -> Result<Self> {
        let smoothing = validate_smoothing(smoothing)?;
        let resolve = |words: &BTreeSet<String>| -> Vec<u32> {
            words.iter().filter_map(|word| table.vocabulary().id(word)).collect()
        };

        let positive = resolve(anchors.positive());
        let negative = resolve(anchors.negative());
        let scorer = Self {
            table,
            positive,
            negative,
            smoothing,
        };

        if let Some(polarity) = scorer.missing_polarity() {
            warn!(
                "no {} anchor occurs in the corpus ({} positive, {} negative observed), that side of every score is the floor",
                match polarity {
                    Polarity::Positive => "positive",
                    Polarity::Negative => "negative",
                },
                scorer.positive.len(),
                scorer.negative.len(),
            );
        }

        Ok(scorer)
    }

    /// Polarity none of whose anchors occur in the table.
    pub fn missing_polarity(&self) -> Option<Polarity> {
        if self.positive.is_empty() {
            Some(Polarity::Positive)
        } else if self.negative.is_empty() {
            Some(Polarity::Negative)
        } else {
            None
        }
    }

    pub fn pmi(&self, word: &str, polarity: Polarity) -> Result<f64> {
        let id = self.known_id(word)?;
        Ok(self.pmi_by_id(id, self.anchor_ids(polarity)))
    }

    pub fn score(&self, word: &str) -> Result<PolarityScore> {
        let id = self.known_id(word)?;
        Ok(self.score_by_id(id))
    }

    /// Scores the given words, skipping the ones the table has never seen.
    pub fn score_words<'w>(&self, words: impl IntoIterator<Item = &'w str>) -> ScoreTable {
        let mut scores = ScoreTable::default();
        let mut skipped = 0;

        for word in words {
            match self.score(word) {
                Ok(score) => scores.insert(word, score),
                Err(err) => {
                    debug!("skipping word: {}", err);
                    skipped += 1;
                },
            }
        }

        if skipped > 0 {
            info!("scored {} words, skipped {} unknown words", scores.len(), skipped);
        }

        scores
    }

    pub fn score_vocabulary(&self) -> ScoreTable {
        let vocabulary = self.table.vocabulary();

        let scores: ScoreTable = (0..vocabulary.len() as u32)
            .into_par_iter()
            .filter_map(|id| vocabulary.word(id).map(|word| (word.to_owned(), self.score_by_id(id))))
            .collect::<Vec<_>>()
            .into_iter()
            .collect();

        info!("scored {} words against anchors", scores.len());

        scores
    }

    fn known_id(&self, word: &str) -> Result<u32> {
        self.table.vocabulary()
            .id(word)
            .filter(|id| self.table.marginal_by_id(*id) > 0)
            .ok_or_else(|| SentimentError::UnknownWord(word.to_owned()))
    }

    fn anchor_ids(&self, polarity: Polarity) -> &[u32] {
        match polarity {
            Polarity::Positive => &self.positive,
            Polarity::Negative => &self.negative,
        }
    }

    fn score_by_id(&self, id: u32) -> PolarityScore {
        let marginal = self.table.marginal_by_id(id);
        let (positive_count, positive_reference) = self.anchor_counts(id, &self.positive);
        let (negative_count, negative_reference) = self.anchor_counts(id, &self.negative);

        PolarityScore {
            context_count: marginal,
            positive_count,
            negative_count,
            pmi_positive: self.pmi_from_counts(marginal, positive_count, positive_reference),
            pmi_negative: self.pmi_from_counts(marginal, negative_count, negative_reference),
        }
    }

    fn pmi_by_id(&self, id: u32, anchors: &[u32]) -> f64 {
        let (joint, reference) = self.anchor_counts(id, anchors);
        self.pmi_from_counts(self.table.marginal_by_id(id), joint, reference)
    }

    // observed joint count and reference mass of a word against one anchor set;
    // an anchor co-occurs with its own set at every occurrence and is left out of the set's reference mass
    fn anchor_counts(&self, id: u32, anchors: &[u32]) -> (u64, u64) {
        let marginal = self.table.marginal_by_id(id);
        let mut joint = 0;
        let mut reference = 0;
        let mut is_anchor = false;

        for anchor in anchors {
            if *anchor == id {
                is_anchor = true;
                continue;
            }
            joint += self.table.pair_count_by_ids(id, *anchor);
            reference += self.table.marginal_by_id(*anchor);
        }

        if is_anchor {
            joint += marginal;
            if reference == 0 {
                reference = marginal;
            }
        }

        (joint, reference)
    }

    fn pmi_from_counts(&self, marginal: u64, joint: u64, reference: u64) -> f64 {
        if joint == 0 || reference == 0 || marginal == 0 {
            return PMI_FLOOR;
        }

        let total = self.table.total_tokens() as f64;
        let p_joint = (joint as f64 + self.smoothing) / total;
        let p_word = marginal as f64 / total;
        let p_anchors = reference as f64 / total;

        (p_joint / (p_word * p_anchors)).log2().max(PMI_FLOOR)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{cooccurrence::CooccurrenceCounter, models::TokenSequence},
    };

    fn table(documents: &[&str], window: i64) -> CooccurrenceTable {
        let sequences: Vec<TokenSequence> = documents.iter()
            .enumerate()
            .map(|(i, text)| TokenSequence::new(i.to_string(), text.split_whitespace().map(str::to_owned).collect()))
            .collect();

        CooccurrenceCounter::new(window).unwrap().count(&sequences).unwrap()
    }

    fn review_anchors() -> AnchorSet {
        AnchorSet::new(vec!["great", "amazing"], vec!["bad", "bug", "crash"]).unwrap()
    }

    #[test]
    fn overlapping_anchor_sets_are_rejected() {
        let result = AnchorSet::new(vec!["great", "bug"], vec!["bad", "bug"]);

        assert!(matches!(result, Err(SentimentError::InvalidConfiguration(_))));
    }

    #[test]
    fn empty_anchor_set_is_rejected() {
        let result = AnchorSet::new(Vec::<String>::new(), vec!["bad".to_owned()]);

        assert!(matches!(result, Err(SentimentError::InvalidConfiguration(_))));
    }

    #[test]
    fn negative_smoothing_is_rejected() {
        let table = table(&["great story"], 2);

        assert!(PmiScorer::new(&table, &review_anchors(), -0.5).is_err());
        assert!(PmiScorer::new(&table, &review_anchors(), f64::NAN).is_err());
    }

    #[test]
    fn story_leans_positive_and_bug_leans_negative() {
        let table = table(&["great story bad bug", "story amazing bug crash"], 5);
        let scorer = PmiScorer::new(&table, &review_anchors(), DEFAULT_SMOOTHING).unwrap();

        let story = scorer.score("story").unwrap().sentiment();
        let bug = scorer.score("bug").unwrap().sentiment();

        assert!(story > 0.0, "story scored {}", story);
        assert!(bug < 0.0, "bug scored {}", bug);
        assert!(story > bug);
        assert!((story - (6.0f64.log2() - 5.0f64.log2())).abs() < 1e-9);
    }

    #[test]
    fn word_without_anchor_neighbours_gets_the_floor() {
        let table = table(&["great story", "lonely words here", "bad bug"], 2);
        let scorer = PmiScorer::new(&table, &review_anchors(), DEFAULT_SMOOTHING).unwrap();

        assert_eq!(scorer.pmi("lonely", Polarity::Positive).unwrap(), PMI_FLOOR);
        assert_eq!(scorer.pmi("lonely", Polarity::Negative).unwrap(), PMI_FLOOR);
        assert_eq!(scorer.score("lonely").unwrap().sentiment(), 0.0);
    }

    #[test]
    fn floor_applies_without_smoothing_too() {
        let table = table(&["great story", "crash report"], 1);
        let scorer = PmiScorer::new(&table, &review_anchors(), 0.0).unwrap();

        assert_eq!(scorer.pmi("story", Polarity::Negative).unwrap(), PMI_FLOOR);
        assert!(scorer.pmi("story", Polarity::Positive).unwrap() > PMI_FLOOR);
    }

    #[test]
    fn unknown_word_is_reported_and_skipped() {
        let table = table(&["great story bad bug"], 5);
        let scorer = PmiScorer::new(&table, &review_anchors(), DEFAULT_SMOOTHING).unwrap();

        assert_eq!(scorer.score("multiplayer"), Err(SentimentError::UnknownWord("multiplayer".to_owned())));

        let scores = scorer.score_words(vec!["story", "multiplayer", "bad"]);
        assert_eq!(scores.len(), 2);
        assert!(scores.get("multiplayer").is_none());
    }

    #[test]
    fn joint_counts_are_kept_with_the_score() {
        let table = table(&["great story bad bug", "story amazing bug crash"], 5);
        let scorer = PmiScorer::new(&table, &review_anchors(), DEFAULT_SMOOTHING).unwrap();

        let story = scorer.score("story").unwrap();
        assert_eq!(story.positive_count, 2);
        assert_eq!(story.negative_count, 4);

        // bug: itself twice, bad once, crash once
        let bug = scorer.score("bug").unwrap();
        assert_eq!(bug.positive_count, 2);
        assert_eq!(bug.negative_count, 4);
    }

    #[test]
    fn corpus_without_one_polarity_is_detected() {
        let one_sided = table(&["great story", "amazing combat"], 2);
        let scorer = PmiScorer::new(&one_sided, &review_anchors(), DEFAULT_SMOOTHING).unwrap();

        assert_eq!(scorer.missing_polarity(), Some(Polarity::Negative));
        assert_eq!(scorer.score("story").unwrap().pmi_negative, PMI_FLOOR);

        let both = table(&["great story bad bug"], 5);
        assert_eq!(PmiScorer::new(&both, &review_anchors(), DEFAULT_SMOOTHING).unwrap().missing_polarity(), None);
    }

    #[test]
    fn scoring_is_deterministic() {
        let table = table(&["great story bad bug", "story amazing bug crash", "great combat"], 3);
        let scorer = PmiScorer::new(&table, &review_anchors(), DEFAULT_SMOOTHING).unwrap();

        let first = scorer.score_vocabulary();
        let second = scorer.score_vocabulary();

        assert_eq!(first.len(), table.vocabulary().len());
        for (word, score) in first.iter() {
            assert_eq!(second.get(word), Some(score));
            assert_eq!(scorer.score(word).unwrap(), *score);
        }
    }
}
