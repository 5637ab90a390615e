mod authentication;
mod health_check;
mod item;
mod order;
mod response;
mod vendor;

pub use authentication::*;
pub use health_check::*;
pub use item::*;
pub use order::*;
pub use response::*;
pub use vendor::*;
