use std::io::Read;

use xml::attribute::OwnedAttribute;
use xml::EventReader;

use crate::error::TmxError;
use crate::image::Image;
use crate::util::{get_attrs, parse_tag};

/// A tileset: a tilesheet image claiming a contiguous range of global tile
/// ids starting at `first_gid`.
///
/// Maps list their tilesets in ascending `first_gid` order, which is what
/// [`Map::tileset_for_tile`](crate::Map::tileset_for_tile) relies on.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Tileset {
    /// The global id of the first tile in this tileset.
    pub first_gid: u32,
    pub name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub spacing: u32,
    pub margin: u32,
    pub image: Image,
}

impl Tileset {
    pub(crate) fn new<R: Read>(
        parser: &mut EventReader<R>,
        attrs: Vec<OwnedAttribute>,
    ) -> Result<Tileset, TmxError> {
        let ((spacing, margin), (first_gid, name, tile_width, tile_height)) = get_attrs!(
            attrs,
            optionals: [
                ("spacing", spacing, |v: String| v.parse().ok()),
                ("margin", margin, |v: String| v.parse().ok()),
            ],
            required: [
                ("firstgid", first_gid, |v: String| v.parse().ok()),
                ("name", name, |v| Some(v)),
                ("tilewidth", tile_width, |v: String| v.parse().ok()),
                ("tileheight", tile_height, |v: String| v.parse().ok()),
            ],
            TmxError::MalformedAttributes(
                "tileset must have a firstgid, name, tile width and height with correct types"
                    .to_string()
            )
        );

        let mut image = None;
        parse_tag!(parser, "tileset", {
            "image" => |attrs| {
                image = Some(Image::new(attrs)?);
                Ok(())
            },
        });
        let image = image
            .ok_or_else(|| TmxError::Other(format!("tileset \"{}\" has no image element", name)))?;

        Ok(Tileset {
            first_gid,
            name,
            tile_width,
            tile_height,
            spacing: spacing.unwrap_or(0),
            margin: margin.unwrap_or(0),
            image,
        })
    }
}
