use std::io::Read;

use xml::attribute::OwnedAttribute;
use xml::EventReader;

use crate::data::parse_data;
use crate::error::{Diagnostic, TmxError};
use crate::properties::{parse_properties, Properties};
use crate::util::{get_attrs, parse_tag};

/// A rectangular grid of global tile ids, one per cell, row-major.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Layer {
    pub name: String,
    /// Width of the layer, in tiles.
    pub width: u32,
    /// Height of the layer, in tiles.
    pub height: u32,
    pub visible: bool,
    pub properties: Properties,
    /// The encoding named by the layer's data element, verbatim.
    pub encoding: String,
    /// The compression named by the layer's data element, if any.
    pub compression: Option<String>,
    /// The decoded global tile ids. `width * height` entries when the data
    /// was well-formed; empty when the encoding was unknown or compressed
    /// data could not be inflated.
    pub tiles: Vec<u32>,
}

impl Layer {
    pub(crate) fn new<R: Read>(
        parser: &mut EventReader<R>,
        attrs: Vec<OwnedAttribute>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Layer, TmxError> {
        let (visible, (name, width, height)) = get_attrs!(
            attrs,
            optionals: [
                ("visible", visible, |v: String| v.parse().ok().map(|x: i32| x == 1)),
            ],
            required: [
                ("name", name, |v| Some(v)),
                ("width", width, |v: String| v.parse().ok()),
                ("height", height, |v: String| v.parse().ok()),
            ],
            TmxError::MalformedAttributes(
                "layer must have a name, width and height with correct types".to_string()
            )
        );

        let mut properties = Vec::new();
        let mut data = None;
        parse_tag!(parser, "layer", {
            "data" => |attrs| {
                data = Some(parse_data(parser, attrs, &name, diagnostics)?);
                Ok(())
            },
            "properties" => |_| {
                properties = parse_properties(parser)?;
                Ok(())
            },
        });
        let data = data
            .ok_or_else(|| TmxError::Other(format!("layer \"{}\" has no data element", name)))?;

        Ok(Layer {
            name,
            width,
            height,
            visible: visible.unwrap_or(true),
            properties,
            encoding: data.encoding,
            compression: data.compression,
            tiles: data.tiles,
        })
    }

    /// The global tile id at (x, y), row-major from the top-left cell.
    ///
    /// `None` outside the grid, and for every cell of a layer whose data
    /// failed to decode.
    pub fn tile_at(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get((y * self.width + x) as usize).copied()
    }
}
