mod get;
mod place;
mod post;

pub use get::*;
pub use place::*;
pub use post::*;
