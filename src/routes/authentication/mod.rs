mod login;
mod logout;
mod signup;

pub use login::*;
pub use logout::*;
pub use signup::*;
