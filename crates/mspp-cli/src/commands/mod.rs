pub mod agents;
pub mod batch;
pub mod common;
pub mod inspect;
pub mod solve;
pub mod variants;
