pub use self::{board::*, rotation::*};

pub(crate) mod board;
pub(crate) mod rotation;
