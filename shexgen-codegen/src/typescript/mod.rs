//! TypeScript code generation modules.

pub mod context;
pub mod emitter;
pub mod enums;
pub mod shapes;
pub mod values;
pub mod walker;

pub use context::{Fragment, InlineEnums, WalkContext};
pub use emitter::{Emitter, ShapeModule, TypeDeclarations};
pub use enums::{EnumCatalog, EnumMember, assign_members, enum_name};
pub use shapes::{ShapeArtifact, ShapeAssembler};
pub use walker::ExpressionWalker;
