extern crate serde;
#[macro_use]
extern crate serde_derive;

pub mod posts;
pub mod tokens;
