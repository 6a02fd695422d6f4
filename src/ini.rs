//! Splits config text into `[name]` sections of `key = value` parameters.
//!
//! The tokenizer knows nothing about profiles: a `[profile foo]` header yields a section named
//! `profile foo`, and interpreting it is left to [`crate::profile::load`].

use std::collections::BTreeMap;

use tracing::trace;

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub start_line: usize,
    pub params: BTreeMap<String, String>,
}

impl Section {
    fn new(name: &str, start_line: usize) -> Section {
        Section {
            name: name.to_string(),
            start_line,
            params: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_line(&self) -> usize {
        self.start_line
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(|s| s.as_str())
    }
}

/// Parses the whole config text into sections, in file order.
pub fn parse_sections(text: &str) -> Result<Vec<Section>, ParseError> {
    let sections = split_lines(text)
        .zip(1..)
        .try_fold(Sections::default(), |acc, (line, line_no)| {
            acc.feed(line, line_no)
        })?
        .finish();

    Ok(sections)
}

/// Splits on `\r\n`, `\r` and `\n` alike.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split("\r\n").flat_map(|s| s.split(['\r', '\n']))
}

fn strip_comment(line: &str) -> &str {
    match line.find([';', '#']) {
        Some(i) => &line[..i],
        None => line,
    }
}

fn section_header(line: &str) -> Option<&str> {
    line.strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .filter(|name| !name.is_empty())
}

fn key_value(text: &str, line: usize) -> Result<(&str, &str), ParseError> {
    let invalid = || ParseError::InvalidParameter {
        text: text.to_string(),
        line,
    };

    let (key, value) = text.split_once('=').ok_or_else(invalid)?;
    let (key, value) = (key.trim(), value.trim());
    if value.is_empty() {
        return Err(invalid());
    }

    Ok((key, value))
}

#[derive(Default)]
struct Sections {
    current: Option<Section>,
    closed: Vec<Section>,
}

impl Sections {
    fn feed(mut self, line: &str, line_no: usize) -> Result<Sections, ParseError> {
        let text = strip_comment(line).trim();
        if text.is_empty() {
            return Ok(self);
        }

        if let Some(name) = section_header(text) {
            self.close();
            trace!("section starts. name:{}, line:{}", name.trim(), line_no);
            self.current = Some(Section::new(name.trim(), line_no));
            return Ok(self);
        }

        let section = self
            .current
            .as_mut()
            .ok_or_else(|| ParseError::UnexpectedText {
                text: text.to_string(),
                line: line_no,
            })?;

        let (key, value) = key_value(text, line_no)?;
        if section.params.contains_key(key) {
            return Err(ParseError::DuplicateParameter {
                key: key.to_string(),
                text: text.to_string(),
                line: line_no,
            });
        }
        section.params.insert(key.to_string(), value.to_string());

        Ok(self)
    }

    fn close(&mut self) {
        if let Some(section) = self.current.take() {
            self.closed.push(section);
        }
    }

    fn finish(mut self) -> Vec<Section> {
        self.close();
        self.closed
    }
}
