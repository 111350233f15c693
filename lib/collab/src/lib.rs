//! # storyrec Collaborators
//!
//! HTTP clients for the three external collaborators of the recommendation
//! pipeline: the sentence encoder, the story generator, and the narrator.
//! Each is a fixed call contract around a service this crate does not
//! implement; failures surface as retryable
//! [`Collaborator`](storyrec_core::Error::Collaborator) errors and are never
//! papered over with fabricated data.

pub mod encoder;
pub mod generator;
pub mod narrator;
mod retry;

pub use encoder::EncoderClient;
pub use generator::GeneratorClient;
pub use narrator::NarratorClient;
