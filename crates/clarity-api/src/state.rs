use std::sync::Arc;

use clarity_db::Database;
use clarity_gateway::dispatcher::Dispatcher;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub dispatcher: Dispatcher,
    /// Window used when an ask omits `maxAgeHours`.
    pub default_max_age_hours: f64,
}
