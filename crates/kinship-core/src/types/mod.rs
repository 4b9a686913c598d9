mod identity;
mod interaction;
mod proximity;
mod support;

pub use identity::*;
pub use interaction::*;
pub use proximity::*;
pub use support::*;
