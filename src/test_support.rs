use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::models::MockParaphraser;
use crate::services::ParaphraseService;
use crate::AppState;

pub fn app_state(mock: MockParaphraser, strict_error_status: bool) -> AppState {
    app_state_with(mock, |config| {
        config.server.strict_error_status = strict_error_status;
    })
}

pub fn app_state_with(mock: MockParaphraser, tweak: impl FnOnce(&mut Config)) -> AppState {
    let mut config = Config::default();
    config.model.model_name = "test/paraphraser".to_string();
    tweak(&mut config);

    AppState {
        paraphrase_service: ParaphraseService::new(
            Arc::new(mock),
            config.model.max_pending_generations,
        ),
        config,
        start_time: Instant::now(),
    }
}
