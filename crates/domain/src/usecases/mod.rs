//! Application use cases / business logic

pub mod describe;
pub mod ingest;
pub mod resolve;

pub use describe::{DescribeConfig, DescribeUseCase};
pub use ingest::{IngestConfig, IngestUseCase};
pub use resolve::{SiteRequest, SiteResolver, host_map_from_sites};
