extern crate chrono;
extern crate flume;
extern crate hex;
extern crate openssl;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate tracing;

pub mod media_grid;
pub mod presence;
pub mod utils;
