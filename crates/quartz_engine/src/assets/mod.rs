//! Asset management system

pub mod obj_loader;

pub use obj_loader::{MeshGroup, ObjError, ObjLoader};
