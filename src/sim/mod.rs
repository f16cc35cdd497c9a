//! Frame simulation module
//!
//! Everything that decides where entities are and how they look lives here:
//! - Affine math and transform composition
//! - Entities, behaviours, scenes
//! - Camera derivation and the per-frame tick
//!
//! No rendering or platform dependencies; a tick returns a `Frame` of draw
//! instructions for a renderer to replay.

pub mod affine;
pub mod behavior;
pub mod camera;
pub mod clock;
pub mod entity;
pub mod frame;
pub mod input;
pub mod scene;
pub mod state;
pub mod tick;

pub use affine::Matrix2D;
pub use behavior::{Behavior, BehaviorConfig, EntityUpdate, PointerSeeking, SelfRotating, SelfState, WorldContext};
pub use camera::{Bounds, Camera, Viewport};
pub use clock::FrameClock;
pub use entity::{Entity, EntityConfig, Polygon, phase};
pub use frame::{Background, BorderDraw, Frame, Glow, Hsl, PolygonDraw};
pub use input::{InputSource, Key, KeyStates, TickInput};
pub use scene::{ConfigError, SceneConfig, ScenePreset};
pub use state::{Effects, SimState, TRACKED};
pub use tick::tick;
