//! Parser of plain-text task documents.
//!
//! A document is a sequence of sections. Every section starts with a title (one word) followed by
//! `key: value1, value2, ...` pairs:
//! ```text
//! solver
//! method: numeric
//! ignore_identity_equations: true
//! system
//! row0: 1, 2+1i
//! row1: 3, -i
//! free_terms: 1, 0
//! ```
//! Values are integers, floats, booleans, complex literals without spaces (`1+2i`, `-0.5j`) or
//! plain strings. Lines starting with `//`, `#`, `%` or `;` are comments, and so is the rest of
//! a line after `;` or after ` //`.
//! The result is a `HashMap<String, HashMap<String, Option<Vec<Value>>>>`; with a template every
//! expected key missing from the document is present as `None`. `parse_document_as_strings` keeps
//! the tokens as written, for keys holding names rather than numbers.
use crate::symbolic::complex_core::parse_complex;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, multispace0, space0},
    combinator::{map, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, separated_pair, terminated},
};
use num_complex::Complex64;
use std::collections::HashMap;
use std::fmt::Display;
use std::fs;
use std::path::Path;

pub type DocumentMap = HashMap<String, SectionMap>;
pub type SectionMap = HashMap<String, Option<Vec<Value>>>;
/// same layout as `DocumentMap` with the unclassified tokens
pub type StringDocumentMap = HashMap<String, HashMap<String, Option<Vec<String>>>>;

type ValueParser<V> = fn(&str) -> IResult<&str, V>;

/// single value of a key
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
    Complex(Complex64),
}

impl Value {
    pub fn as_string(&self) -> Option<&String> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    /// every numeric value is a complex number
    pub fn as_complex(&self) -> Option<Complex64> {
        match self {
            Value::Complex(c) => Some(*c),
            Value::Float(f) => Some(Complex64::new(*f, 0.0)),
            Value::Integer(i) => Some(Complex64::new(*i as f64, 0.0)),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
            Value::Complex(val) => write!(f, "{}", val),
        }
    }
}

/// word made of letters, digits and underscores, not starting with a digit
fn parse_word(input: &str) -> IResult<&str, String> {
    let mut parser = map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0(alt((alphanumeric1, tag("_")))),
        )),
        String::from,
    );
    parser.parse(input)
}

/// Parses a section title; whitespace after it is dropped
pub fn parse_title(input: &str) -> IResult<&str, String> {
    let (input, title) = parse_word(input)?;
    Ok((input.trim(), title))
}

pub fn parse_key(input: &str) -> IResult<&str, String> {
    parse_word(input)
}

fn classify_value(token: &str) -> Value {
    let token = token.trim();
    if let Ok(val) = token.parse::<i64>() {
        Value::Integer(val)
    } else if let Ok(val) = token.parse::<f64>() {
        Value::Float(val)
    } else if let Ok(val) = token.parse::<bool>() {
        Value::Boolean(val)
    } else if let Some(val) = parse_complex(token) {
        Value::Complex(val)
    } else {
        Value::String(token.to_string())
    }
}

/// a single token as written; it ends at a comma, whitespace or semicolon
pub fn parse_raw_value(input: &str) -> IResult<&str, String> {
    let token = take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\r' | '\n' | ';'));
    let mut parser = map(token, String::from);
    parser.parse(input)
}

pub fn parse_value(input: &str) -> IResult<&str, Value> {
    let (input, token) = parse_raw_value(input)?;
    Ok((input, classify_value(&token)))
}

fn value_list<V>(input: &str, value: ValueParser<V>) -> IResult<&str, Vec<V>> {
    let (input, _) = multispace0(input)?;
    let comma = delimited(space0, tag(","), space0);
    let mut parser = separated_list0(comma, value);
    parser.parse(input)
}

fn key_value_pair<V>(input: &str, value: ValueParser<V>) -> IResult<&str, (String, Vec<V>)> {
    let colon = delimited(space0, tag(":"), space0);
    let mut parser = separated_pair(parse_key, colon, |i| value_list(i, value));
    let (input, result) = parser.parse(input)?;
    Ok((input.trim(), result))
}

fn section<V>(input: &str, value: ValueParser<V>) -> IResult<&str, (String, HashMap<String, Vec<V>>)> {
    let (input, _) = space0(input)?;
    let (input, title) = parse_title(input)?;
    let (input, _) = multispace0(input)?;
    let mut parser = many1(terminated(|i| key_value_pair(i, value), space0));
    let (input, pairs) = parser.parse(input)?;
    Ok((input, (title, pairs.into_iter().collect())))
}

fn document<V>(
    input: &str,
    value: ValueParser<V>,
) -> IResult<&str, HashMap<String, HashMap<String, Option<Vec<V>>>>> {
    let mut parser = many1(delimited(multispace0, |i| section(i, value), multispace0));
    let (input, sections) = parser.parse(input)?;

    let mut merged: HashMap<String, HashMap<String, Option<Vec<V>>>> = HashMap::new();
    for (title, pairs) in sections {
        let keys = merged.entry(title).or_default();
        for (key, values) in pairs {
            keys.insert(key, Some(values));
        }
    }
    Ok((input, merged))
}

/// comments are removed first and nothing may remain unparsed
fn whole_document<V>(
    input: &str,
    value: ValueParser<V>,
) -> Result<HashMap<String, HashMap<String, Option<Vec<V>>>>, String> {
    let filtered = filter_comments(input);
    let (remaining, document) =
        document(&filtered, value).map_err(|e| format!("Parsing error: {:?}", e))?;
    if !remaining.trim().is_empty() {
        return Err(format!(
            "Failed to parse entire document. Remaining: '{}'",
            remaining
        ));
    }
    Ok(document)
}

pub fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    value_list(input, parse_value)
}

/// `key: value1, value2`; whitespace after the pair is dropped
pub fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    key_value_pair(input, parse_value)
}

/// title followed by at least one key-value pair; a repeated key keeps its last values
pub fn parse_section(input: &str) -> IResult<&str, (String, HashMap<String, Vec<Value>>)> {
    section(input, parse_value)
}

/// Drops comment lines (starting with //, #, %, or ;), trailing comments after `;` or after a
/// whitespace-preceded `//`, and blank lines
pub fn filter_comments(input: &str) -> String {
    input
        .lines()
        .map(strip_inline_comment)
        .map(str::trim)
        .filter(|line| {
            !(line.is_empty()
                || line.starts_with("//")
                || line.starts_with('#')
                || line.starts_with('%'))
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

fn strip_inline_comment(line: &str) -> &str {
    let line = line.split(';').next().unwrap_or(line);
    let slashes = line
        .match_indices("//")
        .map(|(i, _)| i)
        .find(|&i| i == 0 || line[..i].ends_with(char::is_whitespace));
    match slashes {
        Some(i) => &line[..i],
        None => line,
    }
}

/// Parses the sections of a document without comments. A section appearing twice is merged,
/// later keys override earlier ones.
pub fn parse_document(input: &str) -> IResult<&str, DocumentMap> {
    document(input, parse_value)
}

/// adds every section and key of the template missing from the document, keys as `None`
pub fn apply_template(document: &mut DocumentMap, template: &DocumentMap) {
    for (title, keys) in template {
        let section = document.entry(title.clone()).or_default();
        for key in keys.keys() {
            section.entry(key.clone()).or_insert(None);
        }
    }
}

pub fn parse_document_with_template(
    input: &str,
    template: &DocumentMap,
) -> Result<DocumentMap, String> {
    let mut document = parse_document_as(input, None)?;
    apply_template(&mut document, template);
    Ok(document)
}

/// Parses a whole document: comments are removed first and nothing may remain unparsed
pub fn parse_document_as(input: &str, template: Option<DocumentMap>) -> Result<DocumentMap, String> {
    let mut document = whole_document(input, parse_value)?;
    if let Some(template) = template {
        apply_template(&mut document, &template);
    }
    Ok(document)
}

/// Parses a whole document like `parse_document_as` but keeps every value as the token written,
/// so `i` or `1e3` used as names stay names
pub fn parse_document_as_strings(input: &str) -> Result<StringDocumentMap, String> {
    whole_document(input, parse_raw_value)
}

pub fn read_task_file<P: AsRef<Path>>(path: P) -> Result<String, String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| format!("Cannot read task file {}: {}", path.display(), e))
}

/// reads and parses a task file
pub fn parse_task_file<P: AsRef<Path>>(
    path: P,
    template: Option<DocumentMap>,
) -> Result<DocumentMap, String> {
    parse_document_as(&read_task_file(path)?, template)
}

/// template of a section: the given keys, all `None`
pub fn section_template(keys: &[&str]) -> SectionMap {
    keys.iter().map(|key| (key.to_string(), None)).collect()
}
