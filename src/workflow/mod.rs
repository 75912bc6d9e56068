//! Workflow introspection: picture-input classification, graph analysis and caching

mod cache;
mod input;
mod introspect;
mod rules;

pub use cache::WorkflowCacheOptions;
pub use input::ImageSource;
pub use introspect::{find_picture_input_nodes, PictureInputNode};
pub use rules::{picture_input_rule, PictureInputKind, PictureInputRule, PICTURE_INPUT_RULES};
