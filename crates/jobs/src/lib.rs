pub mod poll;
pub mod runner;

pub use poll::PollJob;
pub use runner::JobRunner;
