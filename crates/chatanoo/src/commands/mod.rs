pub mod domain;
pub mod env;
pub mod identity;
pub mod storage;
pub mod transcoder;
pub mod workflow;
