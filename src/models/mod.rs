pub mod api;
pub mod paraphraser;
pub mod t5_paraphraser;

pub use api::*;
pub use paraphraser::*;
pub use t5_paraphraser::T5Paraphraser;
