//! Interpretation of the directory site's markup
//!
//! This module turns rendered pages into structured data:
//! - Listing pages: the exact-match count and the match entries
//! - Detail pages: name, address and every contact number
//!
//! Each page type has a landmark element that proves the site answered with
//! the expected layout. A page without it yields [`ShapeMismatch`].

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use thiserror::Error;

/// The page does not have the layout the interpreter expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("page does not have the expected layout")]
pub struct ShapeMismatch;

/// One entry of a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEntry {
    /// Whether the entry advertises a phone number
    pub has_phone: bool,

    /// Link to the person's detail page, as written in the markup
    pub href: Option<String>,
}

/// A parsed listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPage {
    /// Total exact matches reported for the query (0 when not reported)
    pub exact_matches: u32,

    /// Match entries in page order
    pub entries: Vec<MatchEntry>,
}

/// A contact number on a detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactNumber {
    pub number: String,

    /// Per-number label such as the carrier, if the page shows one
    pub label: Option<String>,
}

/// A parsed detail page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetailPage {
    pub full_name: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub phones: Vec<ContactNumber>,
}

/// Extracts structured data from rendered pages
pub trait PageInterpreter {
    fn read_index(&self, html: &str) -> Result<IndexPage, ShapeMismatch>;

    fn read_detail(&self, html: &str) -> Result<DetailPage, ShapeMismatch>;
}

/// Interpreter for the people-directory markup
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryMarkup;

impl DirectoryMarkup {
    pub fn new() -> Self {
        Self
    }
}

impl PageInterpreter for DirectoryMarkup {
    fn read_index(&self, html: &str) -> Result<IndexPage, ShapeMismatch> {
        let document = Html::parse_document(html);
        let root = document.root_element();

        if first(root, ".logo-wrapper").is_none() {
            return Err(ShapeMismatch);
        }

        let exact_matches = match first(root, ".serp-results") {
            Some(summary) => parse_exact_matches(&text_of(summary))?,
            None => 0,
        };

        let entries = select_all(root, "li[itemscope]")
            .into_iter()
            .map(|item| MatchEntry {
                has_phone: item.value().classes().any(|c| c == "has_phone"),
                href: first(item, "a.clickstream-link")
                    .and_then(|a| a.value().attr("href"))
                    .map(str::to_string),
            })
            .collect();

        Ok(IndexPage {
            exact_matches,
            entries,
        })
    }

    fn read_detail(&self, html: &str) -> Result<DetailPage, ShapeMismatch> {
        let document = Html::parse_document(html);
        let person = first(document.root_element(), ".person.detail").ok_or(ShapeMismatch)?;

        let field = |css: &str| first(person, css).map(text_of).unwrap_or_default();
        let location = field(".address-location");
        let (city, state) = split_location(&location);

        let labels: Vec<String> = select_all(person, ".tel p").into_iter().map(text_of).collect();
        let phones = select_all(person, r#"a[data-gaevent="phone_number"]"#)
            .into_iter()
            .enumerate()
            .map(|(i, a)| ContactNumber {
                number: text_of(a),
                label: labels.get(i).filter(|l| !l.is_empty()).cloned(),
            })
            .collect();

        Ok(DetailPage {
            full_name: field(".name"),
            address1: field(".address-primary"),
            address2: field(".address-secondary"),
            city,
            state,
            phones,
        })
    }
}

/// Reads the count from a summary such as "23 exact matches"
///
/// A summary without a count is 0. A count too large for `u32` is not a
/// summary this interpreter understands.
fn parse_exact_matches(summary: &str) -> Result<u32, ShapeMismatch> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern =
        PATTERN.get_or_init(|| Regex::new(r"(\d+)[\s\u{A0}]+exact").expect("valid exact-match pattern"));

    match pattern.captures(summary).and_then(|caps| caps.get(1)) {
        Some(count) => count.as_str().parse().map_err(|_| ShapeMismatch),
        None => Ok(0),
    }
}

/// Splits "Los Angeles, CA 90001" into city and state
fn split_location(location: &str) -> (String, String) {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(r",[\s\u{A0}]+(\w+)").expect("valid state pattern"));

    let city = location.split(',').next().unwrap_or("").trim().to_string();
    let state = pattern
        .captures(location)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    (city, state)
}

fn first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    let found = scope.select(&selector).next();
    found
}

fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => scope.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .trim_matches(|c: char| c.is_whitespace())
        .to_string()
}
