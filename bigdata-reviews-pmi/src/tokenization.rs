use {
    tracing::info,
    bigdata_reviews_core::{
        models::{Document, TokenSequence},
        normalizer::Normalizer,
    },
    crate::progress::Progress,
};

pub fn run_tokenization_step(documents: &[Document], normalizer: &Normalizer) -> Vec<TokenSequence> {
    let mut progress = Progress::new("tokenizing reviews");
    let mut sequences = Vec::with_capacity(documents.len());

    for document in documents {
        if let Some(sequence) = normalizer.normalize(document) {
            sequences.push(sequence);
        }
        progress.update();
    }

    progress.finish();
    info!(
        "{} of {} documents kept after cleaning ({} tokens)",
        sequences.len(),
        documents.len(),
        sequences.iter().map(TokenSequence::len).sum::<usize>(),
    );

    sequences
}
