mod merkle;
mod peering;

pub use self::{merkle::*, peering::*};
