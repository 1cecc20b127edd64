use {
    std::collections::{HashMap, HashSet},
    tracing::{info, debug},
    rayon::prelude::*,
    crate::{
        error::{Result, SentimentError},
        models::TokenSequence,
    },
};

pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Interns words into dense ids while counting.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    ids: HashMap<String, u32>,
    words: Vec<String>,
}

/// Number of positions on either side of a token treated as co-occurring with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize(usize);

pub struct CooccurrenceCounter {
    window: WindowSize,
}

/// Read-only statistics of one corpus: unordered pair counts, marginal counts and token total.
#[derive(Debug, Clone)]
pub struct CooccurrenceTable {
    vocabulary: Vocabulary,
    pairs: HashMap<u64, u64>,
    marginals: Vec<u64>,
    total_tokens: u64,
    documents: usize,
}

// counts of one shard of documents, keyed by ids of a shared vocabulary
#[derive(Default)]
struct ShardCounts {
    pairs: HashMap<u64, u64>,
    marginals: Vec<u64>,
    total_tokens: u64,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, word: &str) -> u32 {
        if let Some(id) = self.ids.get(word) {
            return *id;
        }

        let id = self.words.len() as u32;
        self.ids.insert(word.to_owned(), id);
        self.words.push(word.to_owned());
        id
    }

    pub fn id(&self, word: &str) -> Option<u32> {
        self.ids.get(word).copied()
    }

    pub fn word(&self, id: u32) -> Option<&str> {
        self.words.get(id as usize).map(|word| word.as_str())
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|word| word.as_str())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WindowSize {
    pub fn new(value: i64) -> Result<Self> {
        if value <= 0 {
            return Err(SentimentError::invalid_configuration(
                format!("window size must be a positive integer, got {}", value)
            ));
        }

        Ok(Self(value as usize))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self(DEFAULT_WINDOW_SIZE)
    }
}

impl CooccurrenceCounter {
    pub fn new(window: i64) -> Result<Self> {
        Ok(Self::with_window(WindowSize::new(window)?))
    }

    pub fn with_window(window: WindowSize) -> Self {
        Self {
            window,
        }
    }

    pub fn window(&self) -> WindowSize {
        self.window
    }

    pub fn count(&self, sequences: &[TokenSequence]) -> Result<CooccurrenceTable> {
        let (vocabulary, documents) = intern_documents(sequences)?;

        let mut counts = ShardCounts::with_vocabulary_size(vocabulary.len());
        for ids in &documents {
            counts.count_document(ids, self.window.get());
        }

        CooccurrenceTable::from_counts(vocabulary, counts, sequences.len())
    }

    /// Counts shards of `shard_size` documents in parallel and merges the partial counts by addition.
    pub fn count_parallel(&self, sequences: &[TokenSequence], shard_size: usize) -> Result<CooccurrenceTable> {
        let (vocabulary, documents) = intern_documents(sequences)?;
        let vocabulary_size = vocabulary.len();
        let window = self.window.get();

        let counts = documents
            .par_chunks(shard_size.max(1))
            .map(|shard| {
                let mut counts = ShardCounts::with_vocabulary_size(vocabulary_size);
                for ids in shard {
                    counts.count_document(ids, window);
                }
                counts
            })
            .reduce(|| ShardCounts::with_vocabulary_size(vocabulary_size), ShardCounts::add);

        debug!("merged shard counts of up to {} documents each", shard_size);

        CooccurrenceTable::from_counts(vocabulary, counts, sequences.len())
    }
}

impl CooccurrenceTable {
    fn from_counts(vocabulary: Vocabulary, counts: ShardCounts, documents: usize) -> Result<Self> {
        if counts.total_tokens == 0 {
            return Err(SentimentError::EmptyCorpus(format!("{} documents contain no tokens", documents)));
        }

        info!(
            "counted {} tokens in {} documents: {} distinct words, {} distinct pairs",
            counts.total_tokens,
            documents,
            vocabulary.len(),
            counts.pairs.len(),
        );

        Ok(Self {
            vocabulary,
            pairs: counts.pairs,
            marginals: counts.marginals,
            total_tokens: counts.total_tokens,
            documents,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    pub fn documents(&self) -> usize {
        self.documents
    }

    pub fn marginal(&self, word: &str) -> u64 {
        self.vocabulary.id(word).map(|id| self.marginal_by_id(id)).unwrap_or(0)
    }

    pub fn marginal_by_id(&self, id: u32) -> u64 {
        self.marginals.get(id as usize).copied().unwrap_or(0)
    }

    pub fn pair_count(&self, a: &str, b: &str) -> u64 {
        match (self.vocabulary.id(a), self.vocabulary.id(b)) {
            (Some(a), Some(b)) => self.pair_count_by_ids(a, b),
            _ => 0,
        }
    }

    pub fn pair_count_by_ids(&self, a: u32, b: u32) -> u64 {
        self.pairs.get(&pair_key(a, b)).copied().unwrap_or(0)
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str, u64)> {
        self.pairs.iter().filter_map(|(key, count)| {
            let (a, b) = split_pair_key(*key);
            Some((self.vocabulary.word(a)?, self.vocabulary.word(b)?, *count))
        })
    }

    /// Adds the counts of a table built from a disjoint set of documents.
    pub fn merge(mut self, other: CooccurrenceTable) -> Self {
        let remapped: Vec<u32> = other.vocabulary.words()
            .map(|word| self.vocabulary.intern(word))
            .collect();

        self.marginals.resize(self.vocabulary.len(), 0);
        for (other_id, count) in other.marginals.iter().enumerate() {
            self.marginals[remapped[other_id] as usize] += count;
        }

        for (key, count) in other.pairs {
            let (a, b) = split_pair_key(key);
            let key = pair_key(remapped[a as usize], remapped[b as usize]);
            *self.pairs.entry(key).or_insert(0) += count;
        }

        self.total_tokens += other.total_tokens;
        self.documents += other.documents;
        self
    }
}

impl ShardCounts {
    fn with_vocabulary_size(size: usize) -> Self {
        Self {
            pairs: HashMap::new(),
            marginals: vec![0; size],
            total_tokens: 0,
        }
    }

    fn count_document(&mut self, ids: &[u32], window: usize) {
        for id in ids {
            self.marginals[*id as usize] += 1;
        }
        self.total_tokens += ids.len() as u64;

        // (word, partner) -> number of positions of word having partner inside its window
        let mut linked: HashMap<(u32, u32), u64> = HashMap::new();
        let mut partners = HashSet::new();

        for (position, id) in ids.iter().enumerate() {
            partners.clear();

            let from = position.saturating_sub(window);
            let to = (position + window).min(ids.len() - 1);
            for other in from..=to {
                if other != position {
                    partners.insert(ids[other]);
                }
            }

            for partner in &partners {
                *linked.entry((*id, *partner)).or_insert(0) += 1;
            }
        }

        // the relation is symmetric, so every (a, b) has a matching (b, a)
        for (&(a, b), &count) in &linked {
            if a > b {
                continue;
            }

            let reverse = linked.get(&(b, a)).copied().unwrap_or(0);
            *self.pairs.entry(pair_key(a, b)).or_insert(0) += count.min(reverse);
        }
    }

    fn add(mut self, other: ShardCounts) -> Self {
        for (total, count) in self.marginals.iter_mut().zip(other.marginals) {
            *total += count;
        }
        for (key, count) in other.pairs {
            *self.pairs.entry(key).or_insert(0) += count;
        }
        self.total_tokens += other.total_tokens;
        self
    }
}

fn intern_documents(sequences: &[TokenSequence]) -> Result<(Vocabulary, Vec<Vec<u32>>)> {
    if sequences.is_empty() {
        return Err(SentimentError::EmptyCorpus("no documents".to_owned()));
    }

    let mut vocabulary = Vocabulary::new();
    let documents: Vec<Vec<u32>> = sequences.iter()
        .map(|sequence| sequence.tokens().iter().map(|token| vocabulary.intern(token)).collect())
        .collect();

    Ok((vocabulary, documents))
}

fn pair_key(a: u32, b: u32) -> u64 {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    ((low as u64) << 32) | high as u64
}

fn split_pair_key(key: u64) -> (u32, u32) {
    ((key >> 32) as u32, key as u32)
}
