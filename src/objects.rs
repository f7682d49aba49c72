use std::io::Read;

use xml::attribute::OwnedAttribute;
use xml::EventReader;

use crate::error::TmxError;
use crate::properties::{parse_properties, Properties};
use crate::util::{get_attrs, parse_tag, scan_numbers};

/// The geometry of an [`Object`]. Objects with no shape child are
/// rectangles, sized by the object's own width and height.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ObjectShape {
    Rect,
    Ellipse,
    Polygon { points: Vec<(i32, i32)> },
    Polyline { points: Vec<(i32, i32)> },
}

/// A named collection of freeform vector objects overlaid on the map.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ObjectGroup {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub properties: Properties,
    pub objects: Vec<Object>,
}

impl ObjectGroup {
    pub(crate) fn new<R: Read>(
        parser: &mut EventReader<R>,
        attrs: Vec<OwnedAttribute>,
    ) -> Result<ObjectGroup, TmxError> {
        let ((), (name, width, height)) = get_attrs!(
            attrs,
            optionals: [],
            required: [
                ("name", name, |v| Some(v)),
                ("width", width, |v: String| v.parse().ok()),
                ("height", height, |v: String| v.parse().ok()),
            ],
            TmxError::MalformedAttributes(
                "object group must have a name, width and height with correct types".to_string()
            )
        );

        let mut properties = Vec::new();
        let mut objects = Vec::new();
        parse_tag!(parser, "objectgroup", {
            "object" => |attrs| {
                objects.push(Object::new(parser, attrs)?);
                Ok(())
            },
            "properties" => |_| {
                properties = parse_properties(parser)?;
                Ok(())
            },
        });

        Ok(ObjectGroup {
            name,
            width,
            height,
            properties,
            objects,
        })
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Object {
    pub name: String,
    pub obj_type: String,
    /// The global tile id this object displays; 0 means no tile.
    pub gid: u32,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub visible: bool,
    pub properties: Properties,
    pub shape: ObjectShape,
}

impl Object {
    pub(crate) fn new<R: Read>(
        parser: &mut EventReader<R>,
        attrs: Vec<OwnedAttribute>,
    ) -> Result<Object, TmxError> {
        let ((name, obj_type, gid, width, height, visible), (x, y)) = get_attrs!(
            attrs,
            optionals: [
                ("name", name, |v| Some(v)),
                ("type", obj_type, |v| Some(v)),
                ("gid", gid, |v: String| v.parse().ok()),
                ("width", width, |v: String| v.parse().ok()),
                ("height", height, |v: String| v.parse().ok()),
                ("visible", visible, |v: String| v.parse().ok().map(|x: i32| x == 1)),
            ],
            required: [
                ("x", x, |v: String| v.parse().ok()),
                ("y", y, |v: String| v.parse().ok()),
            ],
            TmxError::MalformedAttributes("object must have an x and a y number".to_string())
        );

        let mut properties = Vec::new();
        let mut ellipse = false;
        let mut polygon_attrs = None;
        let mut polyline_attrs = None;
        parse_tag!(parser, "object", {
            "ellipse" => |_| {
                ellipse = true;
                Ok(())
            },
            "polygon" => |attrs: Vec<OwnedAttribute>| {
                polygon_attrs = Some(attrs);
                Ok(())
            },
            "polyline" => |attrs: Vec<OwnedAttribute>| {
                polyline_attrs = Some(attrs);
                Ok(())
            },
            "properties" => |_| {
                properties = parse_properties(parser)?;
                Ok(())
            },
        });

        // An ellipse beats a polygon beats a polyline, whatever order the
        // children came in. Only the winning shape has its points read.
        let shape = if ellipse {
            ObjectShape::Ellipse
        } else if let Some(attrs) = polygon_attrs {
            ObjectShape::Polygon {
                points: parse_points(points_attr(attrs, "polygon")?)?,
            }
        } else if let Some(attrs) = polyline_attrs {
            ObjectShape::Polyline {
                points: parse_points(points_attr(attrs, "polyline")?)?,
            }
        } else {
            ObjectShape::Rect
        };

        Ok(Object {
            name: name.unwrap_or_default(),
            obj_type: obj_type.unwrap_or_default(),
            gid: gid.unwrap_or(0),
            x,
            y,
            width: width.unwrap_or(0),
            height: height.unwrap_or(0),
            visible: visible.unwrap_or(true),
            properties,
            shape,
        })
    }
}

fn points_attr(attrs: Vec<OwnedAttribute>, shape: &str) -> Result<String, TmxError> {
    let ((), points) = get_attrs!(
        attrs,
        optionals: [],
        required: [
            ("points", points, |v| Some(v)),
        ],
        TmxError::MalformedAttributes(format!("a {} must have a points attribute", shape))
    );
    Ok(points)
}

/// Scans "x1,y1 x2,y2 ..." pairwise, left to right, into coordinates
/// relative to the object's position.
fn parse_points(text: String) -> Result<Vec<(i32, i32)>, TmxError> {
    let numbers: Vec<i32> = scan_numbers(&text)?;
    if numbers.len() % 2 != 0 {
        return Err(TmxError::MalformedAttributes(
            "a points list must hold x,y pairs".to_string(),
        ));
    }
    Ok(numbers.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect())
}
