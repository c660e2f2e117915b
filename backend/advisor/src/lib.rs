//! `mittiscan-advisor`: the agronomic decision stages.
//!
//! reading → interpretation + deficiencies → recommendations + total cost.
//! Every stage is a pure function of its input and the reference tables.

pub mod deficiency;
pub mod interpret;
pub mod pipeline;
pub mod recommend;

pub use deficiency::calculate_deficiency;
pub use interpret::{classify, classify_ph, interpret};
pub use pipeline::Advisor;
pub use recommend::{bag_count, mapping_key, recommend};
