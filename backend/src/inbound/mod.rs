//! Inbound adapters translate external requests into port calls while
//! keeping framework details at the edge.

pub mod http;
