pub mod violations;

pub use violations::{PostgresViolationRepository, ViolationRepository};
