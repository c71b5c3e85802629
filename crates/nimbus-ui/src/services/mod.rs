pub mod backdrop_service;

pub use backdrop_service::{
    request_resolve as request_backdrop_resolve, BackdropServiceError, BackdropServiceMessage,
    ResolveRequest,
};
