pub mod body;
pub mod client;
pub mod multistatus;

pub use client::{DavClient, DavTransport};
pub use multistatus::DavResource;
