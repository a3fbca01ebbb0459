pub mod application;
pub mod job;
pub mod message;
pub mod pipeline;
pub mod profile;
pub mod recommendation;
pub mod user;
