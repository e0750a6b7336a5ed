// Domain entities
pub mod activity;
pub mod admin;
pub mod config;
pub mod kill_event;
pub mod leaderboard;
pub mod player_identity;
pub mod server_status;
pub mod suicide_counter;
pub mod webhook;

pub use activity::*;
pub use admin::*;
pub use config::*;
pub use kill_event::*;
pub use leaderboard::*;
pub use player_identity::*;
pub use server_status::*;
pub use suicide_counter::*;
pub use webhook::*;
