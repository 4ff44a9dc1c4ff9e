const UNAVAILABLE_SQLSTATES: [&str; 3] = ["42P01", "42883", "3F000"];
const UNAVAILABLE_SIGNATURES: [&str; 3] = ["does not exist", "no such table", "no such module"];

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(sqlx::Error),
	#[error("Store unavailable: {0}")]
	Unavailable(String),
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Not found: {0}")]
	NotFound(String),
}
impl Error {
	pub fn is_unavailable(&self) -> bool {
		matches!(self, Self::Unavailable(_))
	}
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		match unavailable_reason(&err) {
			Some(reason) => Self::Unavailable(reason),
			None => Self::Sqlx(err),
		}
	}
}

fn unavailable_reason(err: &sqlx::Error) -> Option<String> {
	match err {
		sqlx::Error::Database(db_err) => {
			let by_code = db_err
				.code()
				.is_some_and(|code| UNAVAILABLE_SQLSTATES.iter().any(|state| *state == code));

			(by_code || is_unavailable_message(db_err.message()))
				.then(|| db_err.message().to_string())
		},
		sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) =>
			Some(err.to_string()),
		_ => None,
	}
}

/// Message signatures of a missing table, function or index module.
pub fn is_unavailable_message(message: &str) -> bool {
	let lowered = message.to_lowercase();

	UNAVAILABLE_SIGNATURES.iter().any(|signature| lowered.contains(signature))
}

#[cfg(test)]
mod tests {
	use super::{Error, is_unavailable_message};

	#[test]
	fn missing_relation_messages_are_unavailable() {
		assert!(is_unavailable_message("relation \"kokuzo_pages_fts\" does not exist"));
		assert!(is_unavailable_message("no such table: kokuzo_pages_fts"));
		assert!(is_unavailable_message("No such module: fts5"));
		assert!(!is_unavailable_message("duplicate key value violates unique constraint"));
	}

	#[test]
	fn pool_exhaustion_is_unavailable() {
		assert!(Error::from(sqlx::Error::PoolTimedOut).is_unavailable());
		assert!(Error::from(sqlx::Error::PoolClosed).is_unavailable());
	}

	#[test]
	fn decode_errors_stay_sqlx() {
		let err = Error::from(sqlx::Error::RowNotFound);

		assert!(matches!(err, Error::Sqlx(_)));
	}
}
