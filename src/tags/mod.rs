pub mod associations;
pub mod location;
pub mod nodes;
pub mod normalize;
pub mod repository;
pub mod rest;
pub mod types;

pub use associations::AssociationRepository;
pub use location::parse_id_from_location;
pub use nodes::{node_system_tags, set_node_system_tags};
pub use repository::{format_tag, TagRepository};
pub use rest::RestApi;
pub use types::{AssociationSet, CreateTag, Node, ObjectRef, Tag};
