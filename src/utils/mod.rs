mod normalize;
mod time;

pub use normalize::normalize_code;
pub use time::current_time_millis;
