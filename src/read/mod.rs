use nom::branch::alt;
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::{char, digit1, line_ending, multispace0, not_line_ending, space0};
use nom::combinator::{all_consuming, map, map_res, opt, recognize};
use nom::multi::{many1, separated_nonempty_list};
use nom::number::complete::recognize_float;
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::IResult;

use crate::document::{Angle, AnimDocument, KeyframeBlock};
use crate::error::{Error, Result};

impl AnimDocument {
    /// Reads animation text back, in either the plain or the annotated layout.
    pub fn parse(text: &str) -> Result<Self> {
        match all_consuming(document)(text) {
            Ok((_, doc)) => Ok(doc),
            Err(nom::Err::Error((rest, kind))) | Err(nom::Err::Failure((rest, kind))) => {
                Err(Error::Parse(format!("{:?} on line {}", kind, line_of(text, rest))))
            }
            Err(nom::Err::Incomplete(_)) => Err(Error::Parse("unexpected end of text".into())),
        }
    }
}

fn line_of(text: &str, rest: &str) -> usize {
    let consumed = text.len() - rest.len();
    text[..consumed].matches('\n').count() + 1
}

fn float(i: &str) -> IResult<&str, f64> {
    map_res(recognize_float, |s: &str| s.parse::<f64>())(i)
}

fn integer(i: &str) -> IResult<&str, i32> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i32>()
    })(i)
}

fn boolean(i: &str) -> IResult<&str, bool> {
    alt((map(tag("true"), |_| true), map(tag("false"), |_| false)))(i)
}

fn comment(i: &str) -> IResult<&str, &str> {
    preceded(space0, preceded(tag("--"), not_line_ending))(i)
}

fn angle(i: &str) -> IResult<&str, Angle> {
    let (i, (x, _, y, _, z)) = delimited(
        tag("Angle("),
        tuple((float, char(','), float, char(','), float)),
        char(')'),
    )(i)?;
    Ok((i, Angle::new(x, y, z)))
}

fn angle_line(i: &str) -> IResult<&str, Angle> {
    terminated(angle, tuple((char(','), opt(comment), line_ending)))(i)
}

fn block(i: &str) -> IResult<&str, KeyframeBlock> {
    let (i, _) = pair(char('{'), line_ending)(i)?;
    let (i, angles) = many1(angle_line)(i)?;
    let (i, hold) = terminated(integer, pair(char(','), line_ending))(i)?;
    let (i, sword_out) = terminated(boolean, line_ending)(i)?;
    let (i, _) = char('}')(i)?;
    Ok((
        i,
        KeyframeBlock {
            angles,
            hold,
            sword_out,
        },
    ))
}

fn identifier(i: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(i)
}

fn document(i: &str) -> IResult<&str, AnimDocument> {
    let (i, module_path) = delimited(tag("--@name "), not_line_ending, line_ending)(i)?;
    let (i, table_name) = terminated(identifier, pair(tag("={"), line_ending))(i)?;
    let (i, blocks) = separated_nonempty_list(pair(char(','), line_ending), block)(i)?;
    let (i, _) = tuple((multispace0, char('}'), multispace0))(i)?;
    Ok((
        i,
        AnimDocument {
            module_path: module_path.trim_end().to_owned(),
            table_name: table_name.to_owned(),
            blocks,
        },
    ))
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::document::RenderOptions;
    use crate::BONE_ORDER;

    fn sample() -> AnimDocument {
        let block = |hold, x| KeyframeBlock {
            angles: (0..9i32).map(|i| Angle::new(x, -f64::from(i), 0.5)).collect(),
            hold,
            sword_out: true,
        };
        AnimDocument::new("Slash Combo 1", vec![block(10, 12.25), block(1, -90.)])
    }

    #[test]
    fn reads_rendered_text() {
        let doc = sample();
        assert_eq!(AnimDocument::parse(&doc.to_string()).unwrap(), doc);
    }

    #[test]
    fn reads_annotated_text() {
        let doc = sample();
        let text = doc.render(&RenderOptions::annotated(&BONE_ORDER)).unwrap();
        assert_eq!(AnimDocument::parse(&text).unwrap(), doc);
    }

    #[test]
    fn reads_integer_zero_angles_and_crlf() {
        let text = "--@name slashblade_project/anim/idle\r\nIDLE={\r\n{\r\n\
                    Angle(0,0,0),\r\nAngle(1.5,-2,3),\r\n4,\r\nfalse\r\n}\r\n}\r\n";
        let doc = AnimDocument::parse(text).unwrap();
        assert_eq!(doc.module_path, "slashblade_project/anim/idle");
        assert_eq!(doc.table_name, "IDLE");
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(doc.blocks[0].angles, [Angle::ZERO, Angle::new(1.5, -2., 3.)]);
        assert_eq!(doc.blocks[0].hold, 4);
        assert!(!doc.blocks[0].sword_out);
    }

    #[test]
    fn reports_the_failing_line() {
        let text = "--@name slashblade_project/anim/idle\nIDLE={\n{\nAngle(0,0),\n1,\ntrue\n}\n}\n";
        match AnimDocument::parse(text) {
            Err(Error::Parse(msg)) => assert!(msg.ends_with("line 4"), "{}", msg),
            other => panic!("unexpected {:?}", other),
        }
    }
}
