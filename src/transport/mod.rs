//! Server transports exposing the submission entry point

pub mod http;
