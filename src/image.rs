use xml::attribute::OwnedAttribute;

use crate::error::TmxError;
use crate::util::get_attrs;

/// The tilesheet image a tileset slices into tiles.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Image {
    /// The filepath of the image, as written in the map file.
    pub source: String,
    pub width: i32,
    pub height: i32,
}

impl Image {
    pub(crate) fn new(attrs: Vec<OwnedAttribute>) -> Result<Image, TmxError> {
        let ((), (source, width, height)) = get_attrs!(
            attrs,
            optionals: [],
            required: [
                ("source", source, |v| Some(v)),
                ("width", width, |v: String| v.parse().ok()),
                ("height", height, |v: String| v.parse().ok()),
            ],
            TmxError::MalformedAttributes(
                "image must have a source, width and height with correct types".to_string()
            )
        );
        Ok(Image {
            source,
            width,
            height,
        })
    }
}
