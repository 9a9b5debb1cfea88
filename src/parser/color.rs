// Hex color parser (#rrggbb and #rgb)

use crate::palette::Rgb;
use nom::{
    branch::alt,
    bytes::complete::take_while_m_n,
    character::complete::char,
    combinator::{all_consuming, map, map_res},
    sequence::{preceded, tuple},
    IResult,
};

fn hex_pair(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()), |s| {
        u8::from_str_radix(s, 16)
    })(input)
}

fn hex_single(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(1, 1, |c: char| c.is_ascii_hexdigit()), |s| {
        u8::from_str_radix(s, 16).map(|v| v * 17)
    })(input)
}

fn hex_color(input: &str) -> IResult<&str, Rgb> {
    preceded(
        char('#'),
        alt((
            all_consuming(map(tuple((hex_pair, hex_pair, hex_pair)), |(r, g, b)| {
                Rgb::new(r, g, b)
            })),
            all_consuming(map(
                tuple((hex_single, hex_single, hex_single)),
                |(r, g, b)| Rgb::new(r, g, b),
            )),
        )),
    )(input)
}

/// Parse `#rrggbb` or `#rgb`; anything else is `None`
pub fn parse_hex_color(input: &str) -> Option<Rgb> {
    hex_color(input.trim()).ok().map(|(_, rgb)| rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_form() {
        assert_eq!(parse_hex_color("#1f77b4"), Some(Rgb::new(0x1f, 0x77, 0xb4)));
        assert_eq!(parse_hex_color("  #FFFFFF "), Some(Rgb::new(255, 255, 255)));
    }

    #[test]
    fn test_parse_short_form() {
        assert_eq!(parse_hex_color("#fa0"), Some(Rgb::new(255, 170, 0)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_hex_color("1f77b4"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
        assert_eq!(parse_hex_color("red"), None);
    }
}
