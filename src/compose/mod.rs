pub mod lifecycle;

pub use lifecycle::{ComposeBackend, ComposeCommand, ComposeContext, ComposeService, DockerCompose};
