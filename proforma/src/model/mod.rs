mod descriptor;
mod membership;
mod tag;
mod tag_group;
mod term;

pub use descriptor::*;
pub use membership::*;
pub use tag::*;
pub use tag_group::*;
pub use term::*;
