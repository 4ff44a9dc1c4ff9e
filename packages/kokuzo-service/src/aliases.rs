use std::collections::BTreeMap;

use kokuzo_config::Corpus;

/// Expands a logical document name to the physical identifiers stored for it.
pub trait DocAliasResolver
where
	Self: Send + Sync,
{
	/// Never empty; unknown names resolve to themselves.
	fn aliases(&self, doc: &str) -> Vec<String>;
}

#[derive(Clone, Debug, Default)]
pub struct ConfigDocAliases {
	aliases: BTreeMap<String, Vec<String>>,
}
impl ConfigDocAliases {
	pub fn new(corpus: &Corpus) -> Self {
		Self { aliases: corpus.aliases.clone() }
	}
}
impl DocAliasResolver for ConfigDocAliases {
	fn aliases(&self, doc: &str) -> Vec<String> {
		let doc = doc.trim();

		match self.aliases.get(doc) {
			Some(physical) if !physical.is_empty() => physical.clone(),
			_ => vec![doc.to_string()],
		}
	}
}
