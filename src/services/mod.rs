pub mod connection;
pub mod env_sync;
pub mod provisioning;

pub use connection::parse_connection_string;
pub use env_sync::{
    claim_url_key, find_claim_urls, save_database, DefaultStyle, SaveOptions, SavedDatabase,
};
pub use provisioning::{generate_uuid, DatabaseProvisioner, InstagresClient};
