use {
    typed_builder::TypedBuilder,
    chrono::NaiveDateTime,
};

/// One review or comment, as loaded from an export.
#[derive(TypedBuilder, Debug, Clone, PartialEq)]
pub struct Document {
    #[builder(setter(into))]
    id: String,
    #[builder(setter(into))]
    text: String,
    #[builder(default)]
    timestamp: Option<NaiveDateTime>,
    #[builder(default, setter(strip_option, into))]
    source: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenSequence {
    document_id: String,
    source: Option<String>,
    tokens: Vec<String>,
}

impl Document {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> Option<&NaiveDateTime> {
        self.timestamp.as_ref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn tokenized(&self, tokens: Vec<String>) -> TokenSequence {
        TokenSequence {
            document_id: self.id.clone(),
            source: self.source.clone(),
            tokens,
        }
    }
}

impl TokenSequence {
    pub fn new(document_id: impl Into<String>, tokens: Vec<String>) -> Self {
        Self {
            document_id: document_id.into(),
            source: None,
            tokens,
        }
    }

    pub fn from_words(document_id: impl Into<String>, words: &[&str]) -> Self {
        Self::new(document_id, words.iter().map(|word| word.to_string()).collect())
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains_any<'a>(&self, words: impl IntoIterator<Item = &'a String>) -> bool {
        let words: Vec<&String> = words.into_iter().collect();
        self.tokens.iter().any(|token| words.contains(&token))
    }
}
