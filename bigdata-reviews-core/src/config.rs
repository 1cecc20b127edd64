use {
    std::{fs::read_to_string, collections::BTreeMap, env, path::PathBuf},
    tracing::warn,
    serde::Deserialize,
    crate::{
        error::Result,
        cooccurrence::{CooccurrenceCounter, DEFAULT_WINDOW_SIZE},
        pmi::{AnchorSet, DEFAULT_SMOOTHING, validate_smoothing},
    },
};

pub const CONFIG_PATH_ENV: &str = "REVIEWS_CONFIG";

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub input: Option<InputConfig>,
    pub normalizer: Option<NormalizerConfig>,
    pub scoring: Option<ScoringConfig>,
    pub report: Option<ReportConfig>,
    #[serde(default = "default_aspects")]
    pub aspects: BTreeMap<String, Vec<String>>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct InputConfig {
    paths: Option<Vec<PathBuf>>,
    min_document_chars: Option<usize>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct NormalizerConfig {
    min_token_length: Option<usize>,
    noise_words: Option<Vec<String>>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ScoringConfig {
    window_size: Option<i64>,
    smoothing: Option<f64>,
    shard_size: Option<usize>,
    positive_anchors: Option<Vec<String>>,
    negative_anchors: Option<Vec<String>>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ReportConfig {
    output_dir: Option<PathBuf>,
    top_words: Option<usize>,
    min_context_count: Option<u64>,
    excluded_words: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            normalizer: None,
            scoring: None,
            report: None,
            aspects: default_aspects(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            paths: None,
            min_document_chars: None,
        }
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            min_token_length: None,
            noise_words: None,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            window_size: None,
            smoothing: None,
            shard_size: None,
            positive_anchors: None,
            negative_anchors: None,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            top_words: None,
            min_context_count: None,
            excluded_words: None,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let explicit_path = env::var(CONFIG_PATH_ENV).ok();

        explicit_path
            .map(read_to_string)
            .unwrap_or_else(|| read_to_string("./config.toml").or_else(|_| read_to_string("/config/config.toml")))
            .map_err(|err| err.to_string())
            .and_then(|v| Self::from_toml(&v).map_err(|err| err.to_string()))
            .unwrap_or_else(|err| {
                warn!("failed to read config: {}", err);
                Config::default()
            })
    }

    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn input(&self) -> InputConfig {
        self.input.as_ref().cloned().unwrap_or_default()
    }

    pub fn normalizer(&self) -> NormalizerConfig {
        self.normalizer.as_ref().cloned().unwrap_or_default()
    }

    pub fn scoring(&self) -> ScoringConfig {
        self.scoring.as_ref().cloned().unwrap_or_default()
    }

    pub fn report(&self) -> ReportConfig {
        self.report.as_ref().cloned().unwrap_or_default()
    }

    pub fn aspects(&self) -> &BTreeMap<String, Vec<String>> {
        &self.aspects
    }
}

impl InputConfig {
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            paths: Some(paths),
            min_document_chars: None,
        }
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.as_ref().cloned().unwrap_or_else(|| vec![PathBuf::from("data/reddit_posts.csv")])
    }

    /// Raw text must be strictly longer than this to be analyzed.
    pub fn min_document_chars(&self) -> usize {
        self.min_document_chars.unwrap_or(20)
    }
}

impl NormalizerConfig {
    pub fn min_token_length(&self) -> usize {
        self.min_token_length.unwrap_or(3)
    }

    pub fn noise_words(&self) -> Vec<String> {
        self.noise_words.as_ref().cloned().unwrap_or_else(|| to_owned_words(DEFAULT_NOISE_WORDS))
    }
}

impl ScoringConfig {
    pub fn window_size(&self) -> i64 {
        self.window_size.unwrap_or(DEFAULT_WINDOW_SIZE as i64)
    }

    pub fn smoothing(&self) -> f64 {
        self.smoothing.unwrap_or(DEFAULT_SMOOTHING)
    }

    pub fn shard_size(&self) -> usize {
        self.shard_size.unwrap_or(1024).max(1)
    }

    pub fn positive_anchors(&self) -> Vec<String> {
        self.positive_anchors.as_ref().cloned().unwrap_or_else(|| to_owned_words(DEFAULT_POSITIVE_ANCHORS))
    }

    pub fn negative_anchors(&self) -> Vec<String> {
        self.negative_anchors.as_ref().cloned().unwrap_or_else(|| to_owned_words(DEFAULT_NEGATIVE_ANCHORS))
    }

    pub fn counter(&self) -> Result<CooccurrenceCounter> {
        CooccurrenceCounter::new(self.window_size())
    }

    pub fn anchor_set(&self) -> Result<AnchorSet> {
        AnchorSet::new(self.positive_anchors(), self.negative_anchors())
    }

    pub fn validated_smoothing(&self) -> Result<f64> {
        validate_smoothing(self.smoothing())
    }
}

impl ReportConfig {
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.as_ref().cloned().unwrap_or_else(|| PathBuf::from("results/pmi"))
    }

    pub fn top_words(&self) -> usize {
        self.top_words.unwrap_or(10)
    }

    pub fn min_context_count(&self) -> u64 {
        self.min_context_count.unwrap_or(5)
    }

    pub fn excluded_words(&self) -> Vec<String> {
        self.excluded_words.as_ref().cloned().unwrap_or_else(|| to_owned_words(DEFAULT_EXCLUDED_WORDS))
    }
}

fn default_aspects() -> BTreeMap<String, Vec<String>> {
    [
        ("story", &["story", "plot", "narrative", "characters", "character", "writing", "quest", "quests"][..]),
        ("combat", &["combat", "fight", "fighting", "parry", "boss", "bosses", "weapons"][..]),
        ("stealth", &["stealth", "assassination", "sneak", "sneaking", "hidden"][..]),
        ("graphics", &["graphics", "visuals", "lighting", "textures", "scenery"][..]),
        ("performance", &["performance", "fps", "framerate", "crash", "crashes", "stutter", "lag", "optimization"][..]),
    ]
    .into_iter()
    .map(|(aspect, triggers)| (aspect.to_owned(), to_owned_words(triggers)))
    .collect()
}

fn to_owned_words(words: &[&str]) -> Vec<String> {
    words.iter().map(|word| word.to_string()).collect()
}

const DEFAULT_POSITIVE_ANCHORS: &[&str] = &[
    "good", "great", "love", "amazing", "fun", "best",
    "better", "awesome", "excellent", "beautiful", "perfect",
    "incredible", "fantastic", "wonderful", "enjoy", "enjoyed",
];

const DEFAULT_NEGATIVE_ANCHORS: &[&str] = &[
    "bad", "terrible", "awful", "worst", "boring",
    "hate", "issue", "problem", "disappointing", "broken",
    "bug", "bugs", "glitch", "crash", "frustrating", "repetitive",
];

const DEFAULT_NOISE_WORDS: &[&str] = &[
    "im", "ive", "dont", "didnt", "thats", "theres", "cant", "doesnt",
    "also", "really", "much", "many", "one", "even", "still", "lot",
    "way", "got", "get", "going", "go", "say", "see", "know", "think",
    "would", "could", "just", "like", "game", "games", "play",
    "played", "playing", "its", "youre", "theyre", "weve",
];

// words that score strongly on any corpus about a single title without carrying sentiment
const DEFAULT_EXCLUDED_WORDS: &[&str] = &[
    "never", "since", "think", "going", "way", "say", "something", "put",
    "actually", "still", "see", "understand", "buy", "thing", "video", "channel",
    "missions", "much", "want", "know", "people", "time", "first", "new", "world",
    "feel", "series", "make", "well", "main", "hours", "feels", "back",
];
