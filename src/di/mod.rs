mod builder;
mod container;
mod extractor;
mod injectable;
mod lazy;

pub use builder::ContainerBuilder;
pub use container::Container;
pub use extractor::{HasContainer, Inject};
pub use injectable::Injectable;
pub use lazy::Lazy;
