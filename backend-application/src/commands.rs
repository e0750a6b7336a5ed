pub mod admin_commands;
pub mod dedup_gate;
pub mod identity_commands;
pub mod ingest_commands;
