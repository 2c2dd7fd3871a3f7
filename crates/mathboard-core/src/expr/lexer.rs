use super::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(String),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Bang,
    Comma,
    LParen,
    RParen,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl Token {
    pub fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number '{}'", n),
            Token::Ident(name) => format!("'{}'", name),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::Caret => "'^'".to_string(),
            Token::Bang => "'!'".to_string(),
            Token::Comma => "','".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Eq => "'='".to_string(),
            Token::Ne => "'!='".to_string(),
            Token::Lt => "'<'".to_string(),
            Token::Gt => "'>'".to_string(),
            Token::Le => "'<='".to_string(),
            Token::Ge => "'>='".to_string(),
        }
    }
}

/// A token with the character offset it started at.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub pos: usize,
}

pub fn tokenize(input: &str) -> Result<Vec<Spanned>, ParseError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let start = i;

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || (c == '.' && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit())) {
            let mut seen_dot = false;
            while i < chars.len() {
                let d = chars[i];
                if d.is_ascii_digit() {
                    i += 1;
                } else if d == '.' && !seen_dot && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit()) {
                    seen_dot = true;
                    i += 1;
                } else {
                    break;
                }
            }
            let text: String = chars[start..i].iter().collect();
            tokens.push(Spanned { token: Token::Number(text), pos: start });
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            tokens.push(Spanned { token: Token::Ident(text), pos: start });
            continue;
        }

        let next = chars.get(i + 1).copied();
        let (token, width) = match (c, next) {
            ('=', Some('=')) => (Token::Eq, 2),
            ('!', Some('=')) => (Token::Ne, 2),
            ('<', Some('=')) => (Token::Le, 2),
            ('>', Some('=')) => (Token::Ge, 2),
            ('=', _) => (Token::Eq, 1),
            ('<', _) => (Token::Lt, 1),
            ('>', _) => (Token::Gt, 1),
            ('≠', _) => (Token::Ne, 1),
            ('≤', _) => (Token::Le, 1),
            ('≥', _) => (Token::Ge, 1),
            ('+', _) => (Token::Plus, 1),
            ('-' | '−', _) => (Token::Minus, 1),
            ('*' | '×' | '·' | '⋅', _) => (Token::Star, 1),
            ('/' | '÷', _) => (Token::Slash, 1),
            ('^', _) => (Token::Caret, 1),
            ('!', _) => (Token::Bang, 1),
            (',', _) => (Token::Comma, 1),
            ('(', _) => (Token::LParen, 1),
            (')', _) => (Token::RParen, 1),
            _ => return Err(ParseError::UnexpectedChar { ch: c, pos: start }),
        };
        tokens.push(Spanned { token, pos: start });
        i += width;
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        tokenize(input).unwrap().into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn test_numbers_and_idents() {
        assert_eq!(
            kinds("3.14x + .5"),
            vec![
                Token::Number("3.14".into()),
                Token::Ident("x".into()),
                Token::Plus,
                Token::Number(".5".into()),
            ]
        );
    }

    #[test]
    fn test_two_char_operators() {
        assert_eq!(kinds("a<=b"), vec![Token::Ident("a".into()), Token::Le, Token::Ident("b".into())]);
        assert_eq!(kinds("a != b"), vec![Token::Ident("a".into()), Token::Ne, Token::Ident("b".into())]);
        assert_eq!(kinds("n!"), vec![Token::Ident("n".into()), Token::Bang]);
    }

    #[test]
    fn test_unicode_operators() {
        assert_eq!(
            kinds("6 × 2 ÷ 3 − 1"),
            vec![
                Token::Number("6".into()),
                Token::Star,
                Token::Number("2".into()),
                Token::Slash,
                Token::Number("3".into()),
                Token::Minus,
                Token::Number("1".into()),
            ]
        );
    }

    #[test]
    fn test_unexpected_char_reports_position() {
        assert_eq!(
            tokenize("2 + {x}"),
            Err(ParseError::UnexpectedChar { ch: '{', pos: 4 })
        );
    }
}
