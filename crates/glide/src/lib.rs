//! Glide interaction engine for nested ring ("bagel") menus.

mod macros;

pub mod config;
pub mod controller;
pub mod geometry;
pub mod input;
pub mod item;
pub mod resolve;
pub mod state;

pub use config::{BagelConfig, GestureConfig};
pub use controller::GlideController;
pub use geometry::{
    HitTest, MAX_DEPTH, Point, cartesian_to_polar, get_depth, get_index_from_angle, hit_test,
};
pub use input::{Haptics, HoldTimer, Key, NoHaptics, PointerButton, TimerId};
pub use item::{ItemColor, ItemId, RadialItem};
pub use resolve::{Resolution, resolve_path};
pub use state::{MenuState, MenuStatus, StateStore, Subscription};
