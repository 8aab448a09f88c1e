mod container;
mod extractor;

pub use container::Container;
pub use extractor::{HasContainer, Inject};
