pub mod integrity_queries;
pub mod kill_feed_queries;
pub mod leaderboard_queries;
pub mod player_queries;
pub mod server_status_queries;
