mod presenter_factory;
mod vulnerability_source_factory;

pub use presenter_factory::{PresenterFactory, PresenterType};
pub use vulnerability_source_factory::{SourceEndpoints, VulnerabilitySourceFactory};
