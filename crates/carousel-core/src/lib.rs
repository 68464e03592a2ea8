//! Carousel Studio Core Library
//!
//! Platform-agnostic data model, editing state and persistence for the carousel slide editor.

pub mod interaction;
pub mod model;
pub mod save;
pub mod session;
pub mod storage;
pub mod store;

pub use interaction::{DragKind, GeometryUpdate, HitTarget, InteractionController};
pub use model::{LayerEdit, LayerRole, Project, Slide, SlideEdit, Template, TextAlign, TextLayer};
pub use save::{SAVE_DELAY, SaveController, SaveStatus};
pub use session::{GUEST_EMAIL, ProjectLibrary, Session, User};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, StorageResult};
pub use store::{Editor, ViewMode};
