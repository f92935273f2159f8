use std::sync::Arc;

use nd_core::InsightStore;
use nd_pipeline::DailyPipeline;

pub struct AppState {
    pub pipeline: Arc<DailyPipeline>,
    pub insights: Arc<dyn InsightStore>,
}
