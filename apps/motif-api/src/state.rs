use std::sync::Arc;

use motif_config::Config;
use motif_service::{MotifService, Providers};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<MotifService>,
}
impl AppState {
	pub fn new(config: Config) -> Self {
		Self { service: Arc::new(MotifService::new(config)) }
	}

	pub fn with_providers(config: Config, providers: Providers) -> Self {
		Self { service: Arc::new(MotifService::with_providers(config, providers)) }
	}

	/// Loads the pattern library on a background task. Requests that arrive first observe an
	/// unready index.
	pub fn spawn_initial_load(&self) -> tokio::task::JoinHandle<()> {
		let service = self.service.clone();

		tokio::spawn(async move {
			if let Err(err) = service.reload_index().await {
				tracing::error!(
					error = %err,
					path = %service.cfg.library.path.display(),
					"Initial pattern library load failed."
				);
			}
		})
	}
}
