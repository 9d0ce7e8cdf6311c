//! Quantum noise modeling with Kraus operators
//!
//! Noise channels are completely positive trace-preserving maps described
//! by Kraus operator sets. The channel taxonomy is closed; user-supplied
//! operator sets go through [`NoiseChannel::Kraus`] and are validated for
//! completeness at construction.

mod channels;
mod types;

pub use channels::NoiseChannel;
pub use types::KrausOperator;
