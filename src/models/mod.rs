pub mod ad;
pub mod card;
pub mod interaction;
pub mod offer;
pub mod user;

pub use ad::*;
pub use card::*;
pub use interaction::*;
pub use offer::*;
pub use user::*;
