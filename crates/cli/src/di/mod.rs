mod pollers;

pub use pollers::Exporter;
