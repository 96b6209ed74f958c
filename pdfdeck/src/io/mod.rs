//! Reading inputs from disk and delivering artifacts back to it.

pub mod reader;
pub mod writer;

pub use reader::{ReadResult, ReadSource, ReadStatistics, SourceReader};
pub use writer::{ArtifactWriter, WriteStatistics};
