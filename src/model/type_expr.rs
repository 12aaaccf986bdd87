//! Parser for the type expressions accepted in model files.
//!
//! Grammar: `type := ident ('<' type (',' type)* '>')? ('[' ']')*`.
//! Package qualifiers are dropped so display names match what an editor
//! shows (`java.util.List<java.lang.String>` → `List<String>`).
use nom::bytes::complete::take_while1;
use nom::character::complete::{char, multispace0};
use nom::combinator::{all_consuming, opt};
use nom::multi::{many0, separated_list1};
use nom::sequence::{delimited, preceded, terminated};
use nom::{IResult, Parser};

use crate::error::{ConvertError, Result};
use super::TypeDescriptor;

pub const PRIMITIVES: [&str; 8] = ["boolean", "byte", "short", "char", "int", "long", "float", "double"];

pub fn parse(src: &str) -> Result<TypeDescriptor> {
    all_consuming(terminated(type_expr, multispace0))
        .parse(src)
        .map(|(_, ty)| ty)
        .map_err(|_| ConvertError::TypeSyntax(src.to_string()))
}

/// Identifier segment (`$` allowed for nested class names)
fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '$')(input)
}

/// `java.util.List` → `List`
fn simple_name(input: &str) -> IResult<&str, &str> {
    let (input, segments) = separated_list1(char('.'), identifier).parse(input)?;
    let last = segments.last().copied().unwrap_or_default();
    Ok((input, last))
}

fn generic_args(input: &str) -> IResult<&str, Vec<TypeDescriptor>> {
    delimited(
        preceded(multispace0, char('<')),
        separated_list1(preceded(multispace0, char(',')), type_expr),
        preceded(multispace0, char('>')),
    )
    .parse(input)
}

fn array_suffix(input: &str) -> IResult<&str, char> {
    preceded((multispace0, char('['), multispace0), char(']')).parse(input)
}

fn type_expr(input: &str) -> IResult<&str, TypeDescriptor> {
    let (input, name) = preceded(multispace0, simple_name).parse(input)?;
    let (input, args) = opt(generic_args).parse(input)?;
    let (input, dims) = many0(array_suffix).parse(input)?;

    let args = args.unwrap_or_default();
    let mut ty = if args.is_empty() && PRIMITIVES.contains(&name) {
        TypeDescriptor::primitive(name)
    } else {
        TypeDescriptor::generic(name, args)
    };
    for _ in dims {
        ty = TypeDescriptor::array_of(ty);
    }
    Ok((input, ty))
}
