use {
    std::sync::{Arc, Mutex},
    tracing::Level,
    tracing_subscriber::{
        prelude::*,
        Layer,
        fmt::format::JsonVisitor,
        field::VisitOutput,
    },
};

/// Warning and error events serialized as json, written next to the reports at the end of a run.
#[derive(Clone, Default)]
pub struct CollectedWarnings {
    entries: Arc<Mutex<Vec<String>>>,
}

pub fn init_logging() -> CollectedWarnings {
    let warnings = CollectedWarnings::default();
    subscriber(warnings.clone()).init();
    warnings
}

fn subscriber(warnings: CollectedWarnings) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish()
        .with(CollectWarningsLayer::new(warnings))
}

impl CollectedWarnings {
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    fn push(&self, entry: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }
}

struct CollectWarningsLayer {
    warnings: CollectedWarnings,
}

impl CollectWarningsLayer {
    pub fn new(warnings: CollectedWarnings) -> Self {
        Self {
            warnings,
        }
    }
}

impl<S> Layer<S> for CollectWarningsLayer where S: tracing::Subscriber {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        if event.metadata().level() <= &Level::WARN {
            let mut data = String::new();
            let visitor = JsonVisitor::new(&mut data);
            if visitor.visit(event).is_ok() {
                self.warnings.push(data);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_warnings_and_errors_are_collected() {
        let warnings = CollectedWarnings::default();
        let subscriber = tracing_subscriber::registry().with(CollectWarningsLayer::new(warnings.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("loaded 10 documents");
            tracing::warn!(path = "data/steam.csv", "skipping row without text");
            tracing::error!("failed to write report");
        });

        let entries = warnings.entries();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].contains("skipping row without text"));
        assert!(entries[0].contains("data/steam.csv"));
    }

    #[test]
    fn warnings_from_every_crate_reach_the_collected_log() {
        let warnings = CollectedWarnings::default();

        tracing::subscriber::with_default(subscriber(warnings.clone()), || {
            tracing::debug!(target: "bigdata_reviews_core::pmi", "skipping word: unknown word: lobby");
            tracing::warn!(target: "bigdata_reviews_core::pmi", "no negative anchor occurs in the corpus");
            tracing::warn!(target: "bigdata_reviews_pmi::data_loading", "skipped 2 rows without usable text");
        });

        let entries = warnings.entries();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].contains("no negative anchor"));
    }
}
