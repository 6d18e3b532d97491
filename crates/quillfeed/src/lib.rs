pub mod collector;
pub mod error;
pub mod feeds;
pub mod mapper;
pub mod parsing;
pub mod site;
pub mod types;
pub mod xml;

pub use collector::*;
pub use error::*;
pub use feeds::*;
pub use mapper::*;
pub use parsing::*;
pub use site::*;
pub use types::*;
