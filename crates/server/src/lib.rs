use axum::Router;
use db::DBService;

pub mod error;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    db: DBService,
}

impl AppState {
    pub fn new(db: DBService) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }
}

pub fn app_router(state: AppState) -> Router {
    routes::router(state)
}
