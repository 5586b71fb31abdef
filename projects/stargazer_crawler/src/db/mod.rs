pub mod bootstrap;
pub mod repository;
pub mod schema;
pub mod star;
pub mod user;

pub use bootstrap::{establish_connection, init_schema, EstablishConnectionError, InitSchemaError};
