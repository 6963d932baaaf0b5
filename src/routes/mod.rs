//! Route handlers. Each takes the session explicitly plus the raw query or
//! body and returns an HTML fragment (or JSON for state export).

pub mod day;
pub mod play;
pub mod progress;
pub mod util;
pub mod week;
