pub mod publish;
pub mod relative;
pub mod staging;

pub use publish::{publish_copy, publish_move};
pub use relative::relative_to;
pub use staging::StagingFile;
