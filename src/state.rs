use crate::errors::AppError;
use crate::runtime::Dashboard;
use std::{sync::Arc, time::Duration};
use tokio::{sync::Mutex, time::Instant};

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Mutex<Dashboard>>,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard: Arc::new(Mutex::new(dashboard)),
        }
    }

    /// Runs `f` on the blocking pool while holding the dashboard lock. Used
    /// for every call that may write to storage.
    pub async fn run_blocking<F, R>(&self, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut Dashboard) -> R + Send + 'static,
        R: Send + 'static,
    {
        let mut dashboard = Arc::clone(&self.dashboard).lock_owned().await;
        tokio::task::spawn_blocking(move || f(&mut dashboard))
            .await
            .map_err(AppError::internal)
    }

    pub async fn drive(self, tick: Duration) {
        let mut interval = tokio::time::interval(tick);
        let mut last = Instant::now();
        loop {
            interval.tick().await;
            let now = Instant::now();
            let elapsed = now - last;
            last = now;
            self.dashboard.lock().await.advance(elapsed);
        }
    }
}
