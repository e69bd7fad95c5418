//! Edges of the service: the HTTP API, the seed file loader and the CSV
//! order report.

pub mod csv;
pub mod http;
pub mod seed;
