// Adapters layer: concrete implementations for external systems (http, mail, sessions, logs).

pub mod http;
pub mod log_sink;
pub mod mail;
pub mod session;
