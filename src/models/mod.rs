pub mod ack;
pub mod toy;

pub use ack::*;
pub use toy::*;
