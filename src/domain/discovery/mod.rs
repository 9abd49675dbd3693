pub mod entity;

pub use entity::{CandidateItem, CandidatePage, MergedResult};
