pub mod coin;
pub mod exchange;

pub use coin::*;
pub use exchange::*;
