use crate::config::Settings;
use crate::error::AppError;
use lode_rules::loader::{load_corpus_from_file, load_model_from_file, save_model_to_file};
use lode_rules::{sample_corpus, train, TrainingOptions, TransitionTable};
use log::{info, warn};

/// Produces the transition table for this run: a persisted model when one is
/// configured, otherwise one trained on the configured corpus or the built-in
/// samples. Saves the table when `--save-model` was given.
pub fn prepare_table(settings: &Settings) -> Result<TransitionTable, AppError> {
    let table = match (&settings.model, &settings.corpus) {
        (Some(model_path), _) => {
            info!("Loading model from {:?}", model_path);
            load_model_from_file(model_path)?
        }
        (None, corpus_path) => {
            let corpus = match corpus_path {
                Some(path) => {
                    info!("Loading corpus from {:?}", path);
                    load_corpus_from_file(path)?
                }
                None => {
                    info!("No corpus given; training on the built-in sample levels");
                    sample_corpus()
                }
            };
            if corpus.is_empty() {
                warn!("Training corpus is empty; every context will use the fallback prior");
            }
            train(
                &corpus,
                &TrainingOptions {
                    mirror: settings.mirror,
                },
            )
        }
    };
    info!("Transition table ready: {} contexts", table.len());

    if let Some(path) = &settings.save_model {
        save_model_to_file(&table, path)?;
        info!("Saved model to {:?}", path);
    }
    Ok(table)
}
