/// Loops through the attributes once and pulls out the ones we ask it to. It
/// will check that the required ones are there. This could have been done with
/// attrs.find but that would be inefficient.
///
/// This is probably a really terrible way to do this. It does cut down on lines
/// though which is nice.
macro_rules! get_attrs {
    ($attrs:expr, optionals: [$(($oName:pat, $oVar:ident, $oMethod:expr)),* $(,)*],
     required: [$(($name:pat, $var:ident, $method:expr)),* $(,)*], $err:expr) => {
        {
            $(let mut $oVar = None;)*
            $(let mut $var = None;)*
            for attr in $attrs.iter() {
                match attr.name.local_name.as_ref() {
                    $($oName => $oVar = $oMethod(attr.value.clone()),)*
                    $($name => $var = $method(attr.value.clone()),)*
                    _ => {}
                }
            }
            if !(true $(&& $var.is_some())*) {
                return Err($err);
            }
            (($($oVar),*), ($($var.unwrap()),*))
        }
    }
}

/// Goes through the children of the tag and will call the correct function for
/// that child. Closes the tag.
macro_rules! parse_tag {
    ($parser:expr, $close_tag:expr, {$($open_tag:expr => $open_method:expr),* $(,)*}) => {
        loop {
            match $parser.next().map_err(crate::error::TmxError::XmlDecodingError)? {
                xml::reader::XmlEvent::StartElement {name, attributes, ..} => {
                    if false {}
                    $(else if name.local_name == $open_tag {
                        match $open_method(attributes) {
                            Ok(()) => {},
                            Err(e) => return Err(e)
                        };
                    })*
                }
                xml::reader::XmlEvent::EndElement {name, ..} => {
                    if name.local_name == $close_tag {
                        break;
                    }
                }
                xml::reader::XmlEvent::EndDocument => return Err(crate::error::TmxError::PrematureEnd("Document ended before we expected.".to_string())),
                _ => {}
            }
        }
    }
}

pub(crate) use get_attrs;
pub(crate) use parse_tag;

use std::str::FromStr;

use crate::error::TmxError;

/// Scans a comma/whitespace separated list of numbers, left to right.
///
/// Runs of separators between numbers are skipped; scanning stops at the end
/// of the text. This is what both CSV tile data and polygon/polyline point
/// lists are made of.
pub(crate) fn scan_numbers<T: FromStr>(text: &str) -> Result<Vec<T>, TmxError> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<T>().map_err(|_| {
                TmxError::MalformedAttributes(format!("\"{}\" is not a valid number", token))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::scan_numbers;

    #[test]
    fn scans_comma_separated_numbers() {
        let numbers: Vec<u32> = scan_numbers("1,2,3,40").unwrap();
        assert_eq!(numbers, vec![1, 2, 3, 40]);
    }

    #[test]
    fn skips_separator_runs_and_surrounding_whitespace() {
        let numbers: Vec<u32> = scan_numbers("\n  1, 2,\t3,\r\n4  ").unwrap();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn scans_negative_numbers_when_asked_for_signed() {
        let numbers: Vec<i32> = scan_numbers("0,-5 10,-15").unwrap();
        assert_eq!(numbers, vec![0, -5, 10, -15]);
    }

    #[test]
    fn empty_text_scans_to_nothing() {
        let numbers: Vec<u32> = scan_numbers("").unwrap();
        assert!(numbers.is_empty());
        let numbers: Vec<u32> = scan_numbers(" \n\t ").unwrap();
        assert!(numbers.is_empty());
    }

    #[test]
    fn malformed_number_is_an_error() {
        assert!(scan_numbers::<u32>("1,2,abc,4").is_err());
        assert!(scan_numbers::<u32>("1,-2").is_err());
    }
}
