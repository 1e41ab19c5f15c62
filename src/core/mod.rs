//! Core building blocks: clamp-on-write helpers, output naming, job parameters and
//! the render argument resolver. Consumed by the `composer`, the `api` module and
//! the CLI.
pub mod clamp;
pub mod naming;
pub mod params;
pub mod resolve;
