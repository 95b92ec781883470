//! `\xHH` escapes in catalog default values.
//!
//! The catalog stores a default such as `'foo' || char(10) || 'bar'` as
//! `foo\x0Abar`; decoding yields the original text.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1, take_while_m_n},
    combinator::{map, map_res},
    multi::many0,
    sequence::preceded,
    IResult,
};

enum Piece<'a> {
    Byte(u8),
    Text(&'a str),
}

/// Decode every `\xHH` escape; anything else is copied through.
pub fn decode_hex_escapes(input: &str) -> String {
    let pieces = match many0(parse_piece)(input) {
        Ok((_, pieces)) => pieces,
        Err(_) => return input.to_string(),
    };

    let mut bytes = Vec::with_capacity(input.len());
    for piece in pieces {
        match piece {
            Piece::Byte(b) => bytes.push(b),
            Piece::Text(s) => bytes.extend_from_slice(s.as_bytes()),
        }
    }
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

fn parse_piece(input: &str) -> IResult<&str, Piece<'_>> {
    alt((
        map(parse_escaped_byte, Piece::Byte),
        map(take_till1(|c: char| c == '\\'), Piece::Text),
        // A backslash that does not start a valid escape
        map(tag("\\"), Piece::Text),
    ))(input)
}

fn parse_escaped_byte(input: &str) -> IResult<&str, u8> {
    preceded(
        tag("\\x"),
        map_res(take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()), |hex: &str| {
            u8::from_str_radix(hex, 16)
        }),
    )(input)
}
