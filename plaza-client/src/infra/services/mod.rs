// Service abstractions the profile domains depend on, plus their HTTP adapters.

pub mod profile;

pub use profile::{AvailabilityClient, ProfileApiAdapter, ProfileService};
