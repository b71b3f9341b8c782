use rand::distributions::{Alphanumeric, DistString};

pub mod chunk;

pub mod item;

pub mod job;

pub mod step;

pub mod transaction;

/// Generates a random name consisting of alphanumeric characters.
///
/// Used for jobs and steps built without an explicit name.
fn build_name() -> String {
    Alphanumeric.sample_string(&mut rand::thread_rng(), 8)
}
