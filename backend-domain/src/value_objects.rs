// Domain value objects
pub mod distance;
pub mod event_kind;
pub mod steam_id;
pub mod wipe_epoch;

pub use distance::*;
pub use event_kind::*;
pub use steam_id::*;
pub use wipe_epoch::*;
