pub mod order_lines;
pub mod user_level;
pub mod username;
