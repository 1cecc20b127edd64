use {
    std::collections::BTreeMap,
    rayon::prelude::*,
    crate::{
        models::TokenSequence,
        pmi::ScoreTable,
    },
};

/// Mean polarity of a document, or `Undefined` when none of its tokens were scored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sentiment {
    Score(f64),
    Undefined,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSentiment {
    pub document_id: String,
    pub source: Option<String>,
    pub known_tokens: usize,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSentiment {
    pub label: String,
    pub documents: usize,
    pub sentiment: Sentiment,
}

pub struct Aggregator<'a> {
    scores: &'a ScoreTable,
}

impl Sentiment {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Score(value) => Some(*value),
            Self::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Self::Score(_))
    }

    fn mean(values: impl IntoIterator<Item = f64>) -> (usize, Self) {
        let mut total = 0.0;
        let mut count = 0;
        for value in values {
            total += value;
            count += 1;
        }

        if count == 0 {
            (0, Self::Undefined)
        } else {
            (count, Self::Score(total / count as f64))
        }
    }
}

impl<'a> Aggregator<'a> {
    pub fn new(scores: &'a ScoreTable) -> Self {
        Self {
            scores,
        }
    }

    /// Tokens missing from the score table are left out of the mean.
    pub fn sentiment(&self, tokens: &[String]) -> Sentiment {
        self.known_sentiment(tokens).1
    }

    pub fn document_sentiment(&self, sequence: &TokenSequence) -> DocumentSentiment {
        let (known_tokens, sentiment) = self.known_sentiment(sequence.tokens());

        DocumentSentiment {
            document_id: sequence.document_id().to_owned(),
            source: sequence.source().map(str::to_owned),
            known_tokens,
            sentiment,
        }
    }

    pub fn document_sentiments(&self, sequences: &[TokenSequence]) -> Vec<DocumentSentiment> {
        sequences.par_iter()
            .map(|sequence| self.document_sentiment(sequence))
            .collect()
    }

    /// Mean document sentiment over documents mentioning at least one trigger word of each aspect.
    pub fn aspect_sentiments(&self, sequences: &[TokenSequence], aspects: &BTreeMap<String, Vec<String>>) -> Vec<GroupSentiment> {
        aspects.iter()
            .map(|(aspect, triggers)| {
                let (documents, sentiment) = Sentiment::mean(
                    sequences.iter()
                        .filter(|sequence| sequence.contains_any(triggers))
                        .filter_map(|sequence| self.sentiment(sequence.tokens()).value())
                );

                GroupSentiment {
                    label: aspect.clone(),
                    documents,
                    sentiment,
                }
            })
            .collect()
    }

    fn known_sentiment(&self, tokens: &[String]) -> (usize, Sentiment) {
        Sentiment::mean(tokens.iter().filter_map(|token| self.scores.sentiment(token)))
    }
}

/// Mean of defined document sentiments per source label.
pub fn source_sentiments(documents: &[DocumentSentiment]) -> Vec<GroupSentiment> {
    let mut by_source: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for document in documents {
        let source = document.source.as_deref().unwrap_or("unknown");
        let values = by_source.entry(source).or_default();
        if let Some(value) = document.sentiment.value() {
            values.push(value);
        }
    }

    by_source.into_iter()
        .map(|(source, values)| {
            let (documents, sentiment) = Sentiment::mean(values);
            GroupSentiment {
                label: source.to_owned(),
                documents,
                sentiment,
            }
        })
        .collect()
}
