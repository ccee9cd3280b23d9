use winnow::ascii::till_line_ending;
use winnow::combinator::{alt, cut_err, opt, repeat, separated};
use winnow::error::{ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use crate::Value;

use super::parser::{ParsedPolicy, Statement};

// -- Whitespace & comments --------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    let _: () = repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_ascii_whitespace()).void(),
            ('#', till_line_ending).void(),
        )),
    )
    .parse_next(input)?;
    Ok(())
}

fn space(input: &mut &str) -> ModalResult<()> {
    take_while(1.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

// -- Identifiers ------------------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || c == '_' || c == '.'
        }),
    )
        .take()
        .parse_next(input)
}

// -- Values -----------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        match any.parse_next(input)? {
            '"' => return Ok(s),
            '\\' => match any.parse_next(input)? {
                '"' => s.push('"'),
                '\\' => s.push('\\'),
                'n' => s.push('\n'),
                't' => s.push('\t'),
                other => {
                    s.push('\\');
                    s.push(other);
                }
            },
            c => s.push(c),
        }
    }
}

fn number(input: &mut &str) -> ModalResult<Value> {
    let text = (
        opt('-'),
        take_while(1.., |c: char| c.is_ascii_digit()),
        opt(('.', take_while(1.., |c: char| c.is_ascii_digit()))),
    )
        .take()
        .parse_next(input)?;
    if text.contains('.') {
        let f: f64 = text.parse().map_err(|_| ErrMode::from_input(input).cut())?;
        Ok(Value::Float(f))
    } else {
        let i: i64 = text.parse().map_err(|_| ErrMode::from_input(input).cut())?;
        Ok(Value::Int(i))
    }
}

fn value(input: &mut &str) -> ModalResult<Value> {
    ws.parse_next(input)?;
    alt((
        string_literal.map(Value::String),
        "true".value(Value::Bool(true)),
        "false".value(Value::Bool(false)),
        number,
    ))
    .context(StrContext::Expected(StrContextValue::Description("value")))
    .parse_next(input)
}

// -- Conditions -------------------------------------------------------------

fn field_pair(input: &mut &str) -> ModalResult<(String, Value)> {
    ws.parse_next(input)?;
    let name = alt((string_literal, ident.map(str::to_owned))).parse_next(input)?;
    ws.parse_next(input)?;
    cut_err(':')
        .context(StrContext::Expected(StrContextValue::CharLiteral(':')))
        .parse_next(input)?;
    let val = cut_err(value).parse_next(input)?;
    Ok((name, val))
}

fn conditions(input: &mut &str) -> ModalResult<Vec<(String, Value)>> {
    ws.parse_next(input)?;
    '{'.parse_next(input)?;
    let pairs: Vec<(String, Value)> =
        separated(0.., field_pair, (ws, ',')).parse_next(input)?;
    opt((ws, ',')).parse_next(input)?;
    ws.parse_next(input)?;
    cut_err('}')
        .context(StrContext::Expected(StrContextValue::CharLiteral('}')))
        .parse_next(input)?;
    Ok(pairs)
}

// -- Statements -------------------------------------------------------------

fn statement(input: &mut &str) -> ModalResult<Statement> {
    ws.parse_next(input)?;
    let inverted = alt(("cannot".value(true), "can".value(false))).parse_next(input)?;
    cut_err(space).parse_next(input)?;

    let action = cut_err(ident)
        .context(StrContext::Expected(StrContextValue::Description("action")))
        .parse_next(input)?;
    ws.parse_next(input)?;
    let subject = cut_err(ident)
        .context(StrContext::Expected(StrContextValue::Description("subject")))
        .parse_next(input)?;

    let conditions = opt(conditions).parse_next(input)?;

    Ok(Statement {
        inverted,
        action: action.to_owned(),
        subject: subject.to_owned(),
        conditions,
    })
}

// -- Top-level parser -------------------------------------------------------

pub fn parse_policy(input: &mut &str) -> ModalResult<ParsedPolicy> {
    let statements: Vec<Statement> = repeat(0.., statement).parse_next(input)?;
    ws.parse_next(input)?;
    Ok(ParsedPolicy { statements })
}

#[cfg(test)]
mod tests {
    use crate::parse::parse;

    use super::*;

    #[test]
    fn parse_unconditioned_allow() {
        let result = parse("can read Post").unwrap();
        assert_eq!(
            result.statements,
            vec![Statement {
                inverted: false,
                action: "read".into(),
                subject: "Post".into(),
                conditions: None,
            }]
        );
    }

    #[test]
    fn parse_conditioned_deny() {
        let result = parse("cannot read Post { private: true }").unwrap();
        let stmt = &result.statements[0];
        assert!(stmt.inverted);
        assert_eq!(
            stmt.conditions,
            Some(vec![("private".to_owned(), Value::Bool(true))])
        );
    }

    #[test]
    fn parse_multiple_fields_keep_order() {
        let result = parse(r#"can read Post { status: "draft", createdBy: "me" }"#).unwrap();
        let fields: Vec<&str> = result.statements[0]
            .conditions
            .as_ref()
            .unwrap()
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(fields, ["status", "createdBy"]);
    }

    #[test]
    fn parse_trailing_comma() {
        let result = parse("can read Post { a: 1, b: 2, }").unwrap();
        assert_eq!(result.statements[0].conditions.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn parse_empty_braces() {
        let result = parse("can read Post {}").unwrap();
        assert_eq!(result.statements[0].conditions, Some(vec![]));
    }

    #[test]
    fn parse_all_value_types() {
        let cases = [
            ("42", Value::Int(42)),
            ("-5", Value::Int(-5)),
            ("3.5", Value::Float(3.5)),
            ("-0.25", Value::Float(-0.25)),
            ("true", Value::Bool(true)),
            ("false", Value::Bool(false)),
            (r#""hello""#, Value::String("hello".into())),
        ];
        for (literal, expected) in cases {
            let input = format!("can read Post {{ x: {literal} }}");
            let result = parse(&input).unwrap();
            let conditions = result.statements[0].conditions.as_ref().unwrap();
            assert_eq!(conditions[0].1, expected, "failed for {literal}");
        }
    }

    #[test]
    fn parse_string_with_escapes() {
        let result = parse(r#"can read Post { x: "a\"b\\c" }"#).unwrap();
        let conditions = result.statements[0].conditions.as_ref().unwrap();
        assert_eq!(conditions[0].1, Value::String("a\"b\\c".into()));
    }

    #[test]
    fn parse_quoted_field_name() {
        let result = parse(r#"can read Post { "_id": "mega" }"#).unwrap();
        let conditions = result.statements[0].conditions.as_ref().unwrap();
        assert_eq!(conditions[0].0, "_id");
    }

    #[test]
    fn parse_comments_ignored() {
        let input = "# header\ncan read Post # inline\n# trailing\n";
        let result = parse(input).unwrap();
        assert_eq!(result.statements.len(), 1);
    }

    #[test]
    fn parse_multiline_conditions() {
        let input = "cannot update Post {\n    locked: true,\n    owner: 7\n}\ncan update Post";
        let result = parse(input).unwrap();
        assert_eq!(result.statements.len(), 2);
        assert_eq!(result.statements[0].conditions.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn parse_empty_input() {
        assert!(parse("").unwrap().statements.is_empty());
        assert!(parse("  # nothing\n").unwrap().statements.is_empty());
    }

    #[test]
    fn reject_verb_without_space() {
        assert!(parse("canread Post").is_err());
        assert!(parse("cannotread Post").is_err());
    }

    #[test]
    fn reject_missing_subject() {
        assert!(parse("can read").is_err());
    }

    #[test]
    fn reject_missing_colon() {
        assert!(parse("can read Post { private true }").is_err());
    }

    #[test]
    fn reject_unclosed_braces() {
        assert!(parse("can read Post { private: true").is_err());
    }

    #[test]
    fn reject_unknown_verb() {
        assert!(parse("may read Post").is_err());
    }
}
