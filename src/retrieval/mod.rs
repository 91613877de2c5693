//! Materials data retrieval: live providers and the offline demo dataset.

mod api;
mod client;
mod demo;
mod traits;

pub use api::MaterialsProjectProvider;
pub use client::RetrievalClient;
pub use demo::DemoDataset;
pub use traits::MaterialsProvider;
