//! Native column type names as the catalog reports them.

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, digit1, multispace0},
    combinator::{map_res, opt},
    sequence::{delimited, preceded, tuple},
    IResult,
};

use crate::error::{AdapterError, SqlaResult};

/// `name(width, scale)` split into parts. The name is lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlTypeSpec {
    pub name: String,
    pub width: Option<u32>,
    pub scale: Option<u32>,
}

/// Parse a type name such as `varchar(255)`, `numeric(10,2)` or `long binary`.
pub fn parse_sql_type(input: &str) -> SqlaResult<SqlTypeSpec> {
    let trimmed = input.trim();
    match parse_spec(trimmed) {
        Ok(("", spec)) => Ok(spec),
        Ok((remaining, _)) => Err(AdapterError::parse(
            trimmed.len() - remaining.len(),
            format!("Unexpected trailing content in type '{}': '{}'", trimmed, remaining),
        )),
        Err(_) => Err(AdapterError::parse(0, format!("Invalid type name: '{}'", trimmed))),
    }
}

fn parse_spec(input: &str) -> IResult<&str, SqlTypeSpec> {
    let (input, name) = take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == ' ')(input)?;
    let (input, args) = opt(parse_args)(input)?;
    let (input, _) = multispace0(input)?;

    let (width, scale) = match args {
        Some((w, s)) => (Some(w), s),
        None => (None, None),
    };

    Ok((
        input,
        SqlTypeSpec {
            name: name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase(),
            width,
            scale,
        },
    ))
}

/// Parse `(width)` or `(width, scale)`.
fn parse_args(input: &str) -> IResult<&str, (u32, Option<u32>)> {
    delimited(
        char('('),
        tuple((
            preceded(multispace0, parse_u32),
            opt(preceded(tuple((multispace0, char(','), multispace0)), parse_u32)),
        )),
        preceded(multispace0, char(')')),
    )(input)
}

fn parse_u32(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |s: &str| s.parse::<u32>())(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name() {
        let spec = parse_sql_type("integer").unwrap();
        assert_eq!(spec.name, "integer");
        assert_eq!(spec.width, None);
    }

    #[test]
    fn test_width() {
        let spec = parse_sql_type("varchar(255)").unwrap();
        assert_eq!(spec.name, "varchar");
        assert_eq!(spec.width, Some(255));
        assert_eq!(spec.scale, None);
    }

    #[test]
    fn test_width_and_scale_with_spaces() {
        let spec = parse_sql_type("NUMERIC ( 10 , 2 )").unwrap();
        assert_eq!(spec.name, "numeric");
        assert_eq!(spec.width, Some(10));
        assert_eq!(spec.scale, Some(2));
    }

    #[test]
    fn test_multi_word_name() {
        let spec = parse_sql_type("long  varchar").unwrap();
        assert_eq!(spec.name, "long varchar");
    }

    #[test]
    fn test_trailing_garbage() {
        assert!(parse_sql_type("varchar(10) x!").is_err());
        assert!(parse_sql_type("(10)").is_err());
    }
}
