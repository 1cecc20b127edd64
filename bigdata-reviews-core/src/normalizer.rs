use {
    std::collections::HashSet,
    once_cell::sync::Lazy,
    crate::{
        config::{NormalizerConfig, InputConfig},
        models::{Document, TokenSequence},
    },
};

// default english stopword list of the spark ml StopWordsRemover
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| [
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "i'll", "you'll", "he'll", "she'll", "we'll", "they'll",
    "i'd", "you'd", "he'd", "she'd", "we'd", "they'd", "i'm", "you're", "he's", "she's",
    "it's", "we're", "they're", "i've", "we've", "you've", "they've", "isn't", "aren't",
    "wasn't", "weren't", "haven't", "hasn't", "hadn't", "don't", "doesn't", "didn't",
    "won't", "wouldn't", "shan't", "shouldn't", "mustn't", "can't", "couldn't", "cannot",
    "could", "here's", "how's", "let's", "ought", "that's", "there's", "what's", "when's",
    "where's", "who's", "why's", "would",
].into_iter().collect());

/// Turns raw review text into the token sequences the counter consumes.
pub struct Normalizer {
    min_document_chars: usize,
    min_token_length: usize,
    noise_words: HashSet<String>,
}

impl Normalizer {
    pub fn new(input: &InputConfig, config: &NormalizerConfig) -> Self {
        Self {
            min_document_chars: input.min_document_chars(),
            min_token_length: config.min_token_length(),
            noise_words: config.noise_words().into_iter().collect(),
        }
    }

    /// Raw text, surrounding whitespace included, must be longer than the configured minimum.
    pub fn accepts(&self, document: &Document) -> bool {
        document.text().chars().count() > self.min_document_chars
    }

    pub fn normalize(&self, document: &Document) -> Option<TokenSequence> {
        if !self.accepts(document) {
            return None;
        }

        Some(document.tokenized(self.tokenize(document.text())))
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let cleaned: String = text.chars()
            .map(|c| if c.is_ascii_alphabetic() || c.is_whitespace() { c.to_ascii_lowercase() } else { ' ' })
            .collect();

        cleaned.split_whitespace()
            .filter(|token| !STOPWORDS.contains(token))
            .filter(|token| !self.noise_words.contains(*token))
            .filter(|token| token.len() >= self.min_token_length)
            .filter(|token| !is_link_fragment(token))
            .map(|token| token.to_owned())
            .collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&InputConfig::default(), &NormalizerConfig::default())
    }
}

fn is_link_fragment(token: &str) -> bool {
    token.contains("http") || token.contains("www")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_drops_stopwords_noise_and_short_tokens() {
        let normalizer = Normalizer::default();

        let tokens = normalizer.tokenize("The STORY is amazing, but I think the combat is a bit of a mess!!");

        assert_eq!(tokens, vec!["story", "amazing", "combat", "bit", "mess"]);
        assert!(tokens.contains(&"story".to_owned()));
        assert!(tokens.contains(&"combat".to_owned()));
        assert!(!tokens.contains(&"the".to_owned()));
        assert!(!tokens.contains(&"think".to_owned()));
    }

    #[test]
    fn tokenize_strips_links_and_punctuation() {
        let normalizer = Normalizer::default();

        let tokens = normalizer.tokenize("check https://www.example.com for patch-notes 1.05");

        assert_eq!(tokens, vec!["check", "example", "com", "patch", "notes"]);
    }

    #[test]
    fn short_documents_are_rejected() {
        let normalizer = Normalizer::default();
        let short = Document::builder().id("1").text("great game").build();
        let long = Document::builder().id("2").text("great story and amazing combat overall").build();

        assert!(normalizer.normalize(&short).is_none());
        assert!(!normalizer.accepts(&Document::builder().id("3").text("great game overall!!").build()));
        assert!(normalizer.accepts(&Document::builder().id("4").text("  great game overall ").build()));
        assert_eq!(normalizer.normalize(&long).unwrap().tokens(), &["great", "story", "amazing", "combat", "overall"]);
    }
}
