pub mod aggregates;
pub mod dates;
pub mod models;
pub mod requests;
pub mod role;

pub use aggregates::*;
pub use dates::{backend_to_ui, ui_to_backend, DateError};
pub use models::*;
pub use requests::*;
pub use role::{Role, UnknownRole};
