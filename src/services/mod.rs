pub mod paraphrase_service;

pub use paraphrase_service::*;
