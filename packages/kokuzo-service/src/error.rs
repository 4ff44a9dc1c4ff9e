pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Store unavailable: {message}")]
	StoreUnavailable { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Failed to fetch {doc} page {pdf_page}: {message}")]
	PageFetch { doc: String, pdf_page: i32, message: String },
}
impl From<kokuzo_storage::Error> for Error {
	fn from(err: kokuzo_storage::Error) -> Self {
		match err {
			kokuzo_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			kokuzo_storage::Error::Unavailable(message) => Self::StoreUnavailable { message },
			kokuzo_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			kokuzo_storage::Error::NotFound(message) => Self::NotFound { message },
		}
	}
}
