//! Reusable UI primitives.
//!
//! # Components
//!
//! - [`Button`]: Primary action button
//! - [`Card`], [`CardContent`]: Card container
//! - [`Input`]: Text input field
//! - [`icons`]: SVG icon components

mod button;
mod card;
mod icons;
mod input;

pub use button::Button;
pub use card::{Card, CardContent};
pub use icons::*;
pub use input::Input;
