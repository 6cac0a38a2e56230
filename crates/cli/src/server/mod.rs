pub mod signal;
pub mod web;

pub use signal::cancel_on_signal;
pub use web::start_web_server;
