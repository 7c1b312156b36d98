//! Data model for molecules and their steps.
//!
//! - [`issue`]: issue records, statuses and typed dependency edges.
//! - [`step_id`]: step id conventions (`<molecule>.<n>`).

pub mod issue;
pub mod step_id;
