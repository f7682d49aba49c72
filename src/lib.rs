//! A crate for loading in maps created by the
//! [Tiled](https://www.mapeditor.org) editor, in the XML-based TMX format.
//!
//! The whole map is parsed in one call and returned as a plain value — no
//! handles into the source file survive the load:
//!
//! ```no_run
//! use tmx::Map;
//!
//! let map = Map::parse_file("assets/level1.tmx").unwrap();
//! println!("{:?}", map.layers[0].tiles);
//! ```
//!
//! Layer tile data may be stored as CSV or base64, the latter optionally
//! zlib- or gzip-compressed; all of them decode to the same flat `Vec<u32>`
//! of global tile ids. Non-fatal problems (an unknown data encoding, a
//! corrupt compressed stream) degrade the affected layer to an empty tile
//! sequence and are reported on [`Map::diagnostics`] as well as through the
//! [`log`] facade.

mod data;
mod error;
mod image;
mod layers;
mod map;
mod objects;
mod properties;
mod tileset;
mod util;

pub use crate::error::{Diagnostic, ParseTileError, TmxError};
pub use crate::image::Image;
pub use crate::layers::Layer;
pub use crate::map::{Map, Orientation};
pub use crate::objects::{Object, ObjectGroup, ObjectShape};
pub use crate::properties::{Color, Properties, Property};
pub use crate::tileset::Tileset;
