pub mod crop;
pub mod factor;
pub mod irrigation;
pub mod pest;
pub mod request;
pub mod soil;
pub mod weather;
pub mod yield_estimate;

pub use crop::*;
pub use factor::*;
pub use irrigation::*;
pub use pest::*;
pub use request::*;
pub use soil::*;
pub use weather::*;
pub use yield_estimate::*;
