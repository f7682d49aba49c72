use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use log::error;
use xml::attribute::OwnedAttribute;
use xml::reader::XmlEvent;
use xml::EventReader;

use crate::error::{Diagnostic, ParseTileError, TmxError};
use crate::layers::Layer;
use crate::objects::ObjectGroup;
use crate::properties::{parse_properties, Color, Properties};
use crate::tileset::Tileset;
use crate::util::{get_attrs, parse_tag};

/// All TMX map files will be parsed into this. Holds the map metadata and
/// every tileset, tile layer and object group, in document order.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Map {
    /// The TMX format version this map was saved with.
    pub version: String,
    pub orientation: Orientation,
    /// Width of the map, in tiles.
    pub width: u32,
    /// Height of the map, in tiles.
    pub height: u32,
    /// Width of a tile cell, in pixels.
    pub tile_width: u32,
    /// Height of a tile cell, in pixels.
    pub tile_height: u32,
    /// The background color of this map, if any.
    pub background_color: Option<Color>,
    pub properties: Properties,
    pub tilesets: Vec<Tileset>,
    pub layers: Vec<Layer>,
    pub object_groups: Vec<ObjectGroup>,
    /// Non-fatal problems hit while loading, in the order they were found.
    pub diagnostics: Vec<Diagnostic>,
}

impl Map {
    /// Parse a file hopefully containing a TMX map.
    ///
    /// A file that cannot be opened reports as
    /// [`TmxError::CouldNotOpenFile`], before any parsing happens; every
    /// other failure is a parse failure.
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Map, TmxError> {
        let file = File::open(path.as_ref()).map_err(|err| TmxError::CouldNotOpenFile {
            path: path.as_ref().to_path_buf(),
            err,
        })?;
        Map::parse_reader(file)
    }

    /// Parse a map out of any reader. Useful when the map doesn't come from
    /// the filesystem: some engines hand over a plain byte stream.
    pub fn parse_reader<R: Read>(reader: R) -> Result<Map, TmxError> {
        let mut parser = EventReader::new(reader);
        loop {
            match parser.next().map_err(TmxError::XmlDecodingError)? {
                XmlEvent::StartElement {
                    name, attributes, ..
                } => {
                    if name.local_name == "map" {
                        return Map::parse_xml(&mut parser, attributes);
                    }
                }
                XmlEvent::EndDocument => {
                    return Err(TmxError::PrematureEnd(
                        "Document ended before map was parsed".to_string(),
                    ))
                }
                _ => {}
            }
        }
    }

    fn parse_xml<R: Read>(
        parser: &mut EventReader<R>,
        attrs: Vec<OwnedAttribute>,
    ) -> Result<Map, TmxError> {
        let (background_color, (version, orientation, width, height, tile_width, tile_height)) = get_attrs!(
            attrs,
            optionals: [
                ("backgroundcolor", background_color, |v: String| v.parse().ok()),
            ],
            required: [
                ("version", version, |v| Some(v)),
                ("orientation", orientation, |v: String| v.parse().ok()),
                ("width", width, |v: String| v.parse().ok()),
                ("height", height, |v: String| v.parse().ok()),
                ("tilewidth", tile_width, |v: String| v.parse().ok()),
                ("tileheight", tile_height, |v: String| v.parse().ok()),
            ],
            TmxError::MalformedAttributes(
                "map must have a version, orientation, width, height, tilewidth and tileheight with correct types"
                    .to_string()
            )
        );

        let mut properties = Vec::new();
        let mut tilesets = Vec::new();
        let mut layers = Vec::new();
        let mut object_groups = Vec::new();
        let mut diagnostics = Vec::new();
        parse_tag!(parser, "map", {
            "properties" => |_| {
                properties = parse_properties(parser)?;
                Ok(())
            },
            "tileset" => |attrs| {
                tilesets.push(Tileset::new(parser, attrs)?);
                Ok(())
            },
            "layer" => |attrs| {
                layers.push(Layer::new(parser, attrs, &mut diagnostics)?);
                Ok(())
            },
            "objectgroup" => |attrs| {
                object_groups.push(ObjectGroup::new(parser, attrs)?);
                Ok(())
            },
        });

        Ok(Map {
            version,
            orientation,
            width,
            height,
            tile_width,
            tile_height,
            background_color,
            properties,
            tilesets,
            layers,
            object_groups,
            diagnostics,
        })
    }

    /// Returns the tileset a global tile id belongs to.
    ///
    /// Tilesets are scanned in reverse listing order and the first whose
    /// `first_gid` does not exceed `gid` wins. The format stores tilesets in
    /// ascending `first_gid` order; this lookup relies on that and does not
    /// verify it. A gid below every `first_gid` belongs to no tileset and
    /// yields `None`, never some default.
    pub fn tileset_for_tile(&self, gid: u32) -> Option<&Tileset> {
        let tileset = self.tilesets.iter().rev().find(|ts| ts.first_gid <= gid);
        if tileset.is_none() {
            error!("unable to find tileset for tile #{}", gid);
        }
        tileset
    }
}

/// Represents the way tiles are laid out in a map.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Orientation {
    Orthogonal,
    Isometric,
    Staggered,
    Hexagonal,
}

impl FromStr for Orientation {
    type Err = ParseTileError;

    fn from_str(s: &str) -> Result<Orientation, ParseTileError> {
        match s {
            "orthogonal" => Ok(Orientation::Orthogonal),
            "isometric" => Ok(Orientation::Isometric),
            "staggered" => Ok(Orientation::Staggered),
            "hexagonal" => Ok(Orientation::Hexagonal),
            _ => Err(ParseTileError::OrientationError),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Orthogonal => write!(f, "orthogonal"),
            Orientation::Isometric => write!(f, "isometric"),
            Orientation::Staggered => write!(f, "staggered"),
            Orientation::Hexagonal => write!(f, "hexagonal"),
        }
    }
}
