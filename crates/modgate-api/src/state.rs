//! Shared application state.

use std::sync::Arc;

use modgate_core::{Config, ThresholdStore};
use modgate_db::ViolationRepository;
use modgate_services::{ModalityPipeline, TextToxicityScorer, ViolationGate};

pub struct AppState {
    pub config: Config,
    pub pipeline: ModalityPipeline,
    pub text_scorer: Arc<TextToxicityScorer>,
    pub gate: ViolationGate,
    pub violations: Arc<dyn ViolationRepository>,
    pub threshold: Arc<ThresholdStore>,
}
