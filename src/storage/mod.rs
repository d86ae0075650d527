mod preferences;
mod schema;
mod settings;
mod types;

pub use schema::Database;
pub use settings::{COMPLETED_KEY, DARK_MODE_KEY};
pub use types::DatabaseError;
