use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

use crate::errors::SimplifyError;
use crate::models::{GenerationBounds, Paraphraser, SimplifyRequest, SimplifyResponse};
use crate::utils::{generate_paraphrase_prompt, is_too_short, SHORT_TEXT_NOTE};

/// Runs `/simplify` requests against an injected model.
///
/// Generation happens on the blocking pool. At most `max_pending` generations
/// are admitted at once; the rest are turned away with `Overloaded`.
#[derive(Clone)]
pub struct ParaphraseService {
    paraphraser: Arc<dyn Paraphraser>,
    admission: Arc<Semaphore>,
    max_pending: usize,
}

impl ParaphraseService {
    pub fn new(paraphraser: Arc<dyn Paraphraser>, max_pending: usize) -> Self {
        Self {
            paraphraser,
            admission: Arc::new(Semaphore::new(max_pending)),
            max_pending,
        }
    }

    pub async fn simplify(&self, req: SimplifyRequest) -> Result<SimplifyResponse, SimplifyError> {
        if is_too_short(&req.text) {
            tracing::debug!("Input below paraphrase threshold, echoing it back");
            return Ok(SimplifyResponse::echoed(req.text, SHORT_TEXT_NOTE));
        }

        let prompt = generate_paraphrase_prompt(&req.text);
        let bounds = GenerationBounds::new(req.max_length, req.min_length).checked()?;

        let permit = self
            .admission
            .clone()
            .try_acquire_owned()
            .map_err(|_| SimplifyError::Overloaded {
                limit: self.max_pending,
            })?;

        let paraphraser = self.paraphraser.clone();
        let started = Instant::now();
        let candidates = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            paraphraser.generate(&prompt, bounds)
        })
        .await
        .map_err(SimplifyError::model)??;

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            candidates = candidates.len(),
            "Paraphrase generated"
        );

        let simplified = candidates
            .into_iter()
            .next()
            .ok_or_else(|| SimplifyError::model("model returned no candidates"))?;

        Ok(SimplifyResponse::paraphrased(req.text, simplified))
    }
}
