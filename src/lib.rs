pub mod auth;
pub mod cli;
pub mod download;
pub mod oauth;
pub mod output;
pub mod youtube_api;
