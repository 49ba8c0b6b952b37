pub mod email;
pub mod error;
pub mod range;

pub use email::{is_valid_email, normalize_email, split_candidates, EmailSet};
pub use error::CoreError;
pub use range::{column_letters, CellRef, SourceRange};
