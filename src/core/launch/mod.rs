pub mod arguments;
pub mod classpath;
pub mod command;
pub mod libraries;
pub mod task;

pub use arguments::{expand_arguments, expand_legacy, LaunchVariables};
pub use classpath::{classpath_entries, extract_natives, join_classpath};
pub use command::{synthesize, LaunchConfiguration, LaunchContext};
pub use libraries::{LibraryResolver, NativeArtifact, RemoteArtifact, ResolvedLibrary};
pub use task::spawn;
