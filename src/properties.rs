use std::io::Read;
use std::str::FromStr;

use xml::attribute::OwnedAttribute;
use xml::EventReader;

use crate::error::{ParseTileError, TmxError};
use crate::util::{get_attrs, parse_tag};

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl FromStr for Color {
    type Err = ParseTileError;

    fn from_str(s: &str) -> Result<Color, ParseTileError> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 {
            return Err(ParseTileError::ColorError);
        }
        match (
            u8::from_str_radix(&s[0..2], 16),
            u8::from_str_radix(&s[2..4], 16),
            u8::from_str_radix(&s[4..6], 16),
        ) {
            (Ok(red), Ok(green), Ok(blue)) => Ok(Color { red, green, blue }),
            _ => Err(ParseTileError::ColorError),
        }
    }
}

/// A name/value pair attached to the map, a tileset, a layer, an object
/// group or an object. Values are kept verbatim; numeric or boolean
/// interpretation is the caller's business.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Property {
    pub name: String,
    pub value: String,
}

/// Properties in document order, duplicates included.
pub type Properties = Vec<Property>;

pub(crate) fn parse_properties<R: Read>(
    parser: &mut EventReader<R>,
) -> Result<Properties, TmxError> {
    let mut properties = Vec::new();
    parse_tag!(parser, "properties", {
        "property" => |attrs: Vec<OwnedAttribute>| {
            let ((), (name, value)) = get_attrs!(
                attrs,
                optionals: [],
                required: [
                    ("name", name, |v| Some(v)),
                    ("value", value, |v| Some(v)),
                ],
                TmxError::MalformedAttributes("property must have a name and a value".to_string())
            );
            properties.push(Property { name, value });
            Ok(())
        },
    });
    Ok(properties)
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn parses_hash_prefixed_color() {
        assert_eq!(
            "#40a0ff".parse::<Color>().unwrap(),
            Color {
                red: 0x40,
                green: 0xa0,
                blue: 0xff
            }
        );
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!("#fff".parse::<Color>().is_err());
        assert!("#zzzzzz".parse::<Color>().is_err());
    }
}
