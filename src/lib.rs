// Library for tests to access modules

pub mod config;
pub mod containers;
pub mod docker_client;
pub mod error;
pub mod extract;
pub mod images;
pub mod networks;
pub mod routes;
pub mod version;
pub mod volumes;
