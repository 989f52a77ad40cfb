//! Wire protocol of the fluffelwatch timer

mod client;
mod message;

pub use client::*;
pub use message::*;
