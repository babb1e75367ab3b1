use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/status", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route("/languages", get(handlers::list_languages))
        .route("/languages/:id", get(handlers::get_language))
        .route("/execute", post(handlers::execute_code))
        .route("/run-tests", post(handlers::run_tests))
        .route("/submissions/:id", get(handlers::get_submission))
        .route("/users/:id/submissions", get(handlers::list_user_submissions))
}
