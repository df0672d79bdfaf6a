//! Channel adapters: transport-specific front ends that translate inbound
//! payloads into canonical readings and hand them to the ingestion
//! pipeline. The HTTP adapter lives in `routes::ingest`; this module holds
//! the long-lived streaming side.

mod stream;

pub use stream::StreamAdapter;
