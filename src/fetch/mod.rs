// src/fetch/mod.rs

use anyhow::Result;
use reqwest::Client;

pub mod companies;
pub mod excel;
pub mod reports;

/// The portal rejects default client UAs.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/140.0.0.0 Safari/537.36";

/// One client per run, shared by reference across every fetch.
pub fn client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .cookie_store(true)
        .build()
        .map_err(Into::into)
}
