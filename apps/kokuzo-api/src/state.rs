use std::sync::Arc;

use kokuzo_service::KokuzoService;
use kokuzo_storage::{db::Db, store::PgStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<KokuzoService>,
}
impl AppState {
	pub async fn new(config: kokuzo_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;
		let full_text = config.storage.postgres.full_text;

		db.ensure_schema(full_text).await?;

		let store = PgStore::detect(db, full_text).await?;
		let service = KokuzoService::new(config, Arc::new(store));

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: KokuzoService) -> Self {
		Self { service: Arc::new(service) }
	}
}
