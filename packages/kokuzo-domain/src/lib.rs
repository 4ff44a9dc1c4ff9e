pub mod pin;
pub mod query;
pub mod script;
pub mod text;
