//! Template scanning: literal text interleaved with `{Token}` placeholders.

use crate::error::{IdentifyError, Result};

/// A recognized naming token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Title,
    CleanTitle,
    Year,
    ReleaseDate,
    Studio,
    CleanStudio,
    Performer,
    QualityTitle,
    QualitySource,
    Id,
}

impl Token {
    fn from_name(name: &str) -> Option<Token> {
        match name {
            "Title" => Some(Token::Title),
            "Clean Title" => Some(Token::CleanTitle),
            "Year" => Some(Token::Year),
            "Release Date" => Some(Token::ReleaseDate),
            "Studio" => Some(Token::Studio),
            "Clean Studio" => Some(Token::CleanStudio),
            "Performer" => Some(Token::Performer),
            "Quality Title" => Some(Token::QualityTitle),
            "Quality Source" => Some(Token::QualitySource),
            "Id" => Some(Token::Id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Token(Token),
}

/// Scan a template into segments.
///
/// Unbalanced braces make the template invalid; an unrecognized token name
/// fails loudly rather than producing a truncated name.
pub fn scan(template: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                let mut name = String::new();
                let mut closed = false;
                for t in chars.by_ref() {
                    if t == '}' {
                        closed = true;
                        break;
                    }
                    if t == '{' {
                        return Err(IdentifyError::InvalidTemplate(format!(
                            "nested '{{' in template: {template}"
                        )));
                    }
                    name.push(t);
                }
                if !closed {
                    return Err(IdentifyError::InvalidTemplate(format!(
                        "unclosed '{{' in template: {template}"
                    )));
                }
                let token = Token::from_name(&name)
                    .ok_or(IdentifyError::UnknownToken { token: name })?;
                segments.push(Segment::Token(token));
            }
            '}' => {
                return Err(IdentifyError::InvalidTemplate(format!(
                    "stray '}}' in template: {template}"
                )));
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}
