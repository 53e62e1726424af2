pub mod api;
pub mod binder;
pub mod config;
pub mod http_client;
pub mod provider;
pub mod selection;
pub mod state;
pub mod view;
