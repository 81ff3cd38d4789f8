mod common;
mod declaration;
mod pipeline;
mod step;

pub use common::*;
pub use declaration::*;
pub use pipeline::*;
pub use step::*;
