pub mod classification;
pub mod request;

pub use classification::*;
pub use request::*;
