mod item;
mod orders;
mod user;

pub use item::*;
pub use orders::*;
pub use user::*;
