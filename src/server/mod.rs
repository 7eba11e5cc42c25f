mod auth;
mod completed;
pub mod dto;
mod ongoing;
pub mod response;
mod router;
mod upcoming;
pub mod validation;

pub use router::{AppState, create_router};
