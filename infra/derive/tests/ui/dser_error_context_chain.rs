use dser_derive::dser_error;
use std::borrow::Cow;

#[dser_error]
pub enum ParseError {
    #[error("Integer error{}: {source}", format_context(.context))]
    Integer { source: std::num::ParseIntError, context: Option<Cow<'static, str>> },

    #[error("Out of range{}: {message}", format_context(.context))]
    OutOfRange { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<u8, ParseError> {
    let value = raw.parse::<i64>().context("parsing the raw value")?;
    u8::try_from(value).map_err(|_| ParseError::OutOfRange {
        message: format!("{value} does not fit into u8").into(),
        context: None,
    })
}

fn main() {
    let err = parse("x").unwrap_err();
    assert_eq!(err.variant(), "Integer");
    assert!(err.to_string().contains("(parsing the raw value)"));

    let result: Result<u8, ParseError> = parse("300").context("loading limits");
    assert!(matches!(result, Err(ParseError::OutOfRange { context: Some(_), .. })));
}
