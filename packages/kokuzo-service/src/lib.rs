pub mod aliases;
pub mod archive;
pub mod search;
pub mod tags;

mod error;

pub use aliases::{ConfigDocAliases, DocAliasResolver};
pub use archive::{
	ChunkItem, ChunkSearchRequest, ChunkSearchResponse, SeedItem, SeedsRequest, SeedsResponse,
};
pub use error::{Error, Result};
pub use kokuzo_storage::store::BoxFuture;
pub use search::{Candidate, SearchOutcome, SearchRequest, SearchResponse};
pub use tags::{Tag, TagExtractor, VocabularyTagExtractor};

use std::sync::Arc;

use kokuzo_config::Config;
use kokuzo_domain::query::QueryNormalizer;
use kokuzo_storage::store::{ArchiveStore, PageStore};

#[derive(Clone)]
pub struct Collaborators {
	pub pages: Arc<dyn PageStore>,
	pub archive: Arc<dyn ArchiveStore>,
	pub aliases: Arc<dyn DocAliasResolver>,
	pub tags: Arc<dyn TagExtractor>,
}

pub struct KokuzoService {
	pub cfg: Config,
	pub pages: Arc<dyn PageStore>,
	pub archive: Arc<dyn ArchiveStore>,
	pub aliases: Arc<dyn DocAliasResolver>,
	pub tags: Arc<dyn TagExtractor>,
	normalizer: QueryNormalizer,
}
impl KokuzoService {
	/// Uses `store` for pages and the archive, with config-backed aliases and tags.
	pub fn new<S>(cfg: Config, store: Arc<S>) -> Self
	where
		S: PageStore + ArchiveStore + 'static,
	{
		let collaborators = Collaborators {
			pages: store.clone(),
			archive: store,
			aliases: Arc::new(ConfigDocAliases::new(&cfg.corpus)),
			tags: Arc::new(VocabularyTagExtractor::new(&cfg.tags)),
		};

		Self::with_collaborators(cfg, collaborators)
	}

	pub fn with_collaborators(cfg: Config, collaborators: Collaborators) -> Self {
		let normalizer = QueryNormalizer::new(&cfg.corpus, cfg.search.min_query_chars as usize);
		let Collaborators { pages, archive, aliases, tags } = collaborators;

		Self { cfg, pages, archive, aliases, tags, normalizer }
	}

	pub(crate) fn normalizer(&self) -> &QueryNormalizer {
		&self.normalizer
	}
}
