//! Weekly-digest index scraper.
//!
//! The index is a markdown page grouped by year and month:
//!
//! ```markdown
//! ## 2024
//!
//! **三月**
//!
//! - 第 295 期：[Some title](docs/issue-295.md)
//! - 第 294 期：[Another title](docs/issue-294.md)
//! ```
//!
//! There is no structure beyond that convention, so issues are recovered
//! heuristically in three steps:
//!
//! 1. Render the markdown to HTML ([`markdown_to_html`]).
//! 2. Flatten the top-level children of `<body>` into [`Block`]s
//!    ([`blocks_from_html`]).
//! 3. Fold over the blocks carrying the current year and month, emitting one
//!    [`IssueRecord`] per linked list item ([`scan`]).
//!
//! # Context rules
//!
//! - An `<h2>` whose text is exactly four ASCII digits starts a new year and
//!   forgets the month.
//! - Every paragraph is read as a month name. A paragraph that is not one of
//!   the twelve Chinese month names clears the month, so nothing below it is
//!   attributed to a stale month.
//! - A linked list item seen without both a year and a month becomes a
//!   [`ParseGap`] and is logged, never a record with made-up fields.

use crate::models::{IssueRecord, ParseGap};
use once_cell::sync::Lazy;
use pulldown_cmark::{html, Options, Parser};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}$").unwrap());
static ISSUE_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"第 ([0-9]+) 期").unwrap());

static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());
static ITEM_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("li").unwrap());
static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

/// A top-level element of the rendered index, reduced to what the scan needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(String),
    List(Vec<ListItem>),
    Other,
}

/// One `<li>`: its full text and its first hyperlink, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub text: String,
    pub anchor: Option<Anchor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub text: String,
    pub href: String,
}

/// Result of scanning an index document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IndexScan {
    /// Records in document order.
    pub issues: Vec<IssueRecord>,
    /// Linked items that could not be attributed to a year and month.
    pub gaps: Vec<ParseGap>,
}

/// Accumulator threaded through [`scan`].
#[derive(Debug, Default)]
struct ScanState {
    year: Option<String>,
    month: Option<&'static str>,
    /// Text of the last paragraph when it was not a month name.
    unknown_month: Option<String>,
    issues: Vec<IssueRecord>,
    gaps: Vec<ParseGap>,
}

impl ScanState {
    fn step(mut self, block: Block) -> Self {
        match block {
            Block::Heading { level: 2, text } => {
                let text = text.trim();
                if is_four_digit_year(text) {
                    debug!(year = text, "Year heading");
                    self.year = Some(text.to_string());
                    self.month = None;
                    self.unknown_month = None;
                }
            }
            Block::Paragraph(text) => {
                let text = text.trim();
                match chinese_month_to_number(text) {
                    Some(month) => {
                        self.month = Some(month);
                        self.unknown_month = None;
                    }
                    None => {
                        if self.year.is_some() {
                            debug!(paragraph = text, "Paragraph is not a month name; month cleared");
                        }
                        self.month = None;
                        self.unknown_month = Some(text.to_string());
                    }
                }
            }
            Block::List(items) => {
                for item in items {
                    self.push_item(item);
                }
            }
            Block::Heading { .. } | Block::Other => {}
        }
        self
    }

    fn push_item(&mut self, item: ListItem) {
        let Some(anchor) = item.anchor else {
            return;
        };

        match (&self.year, self.month) {
            (Some(year), Some(month)) => self.issues.push(IssueRecord {
                year: year.clone(),
                month: month.to_string(),
                issue_number: extract_issue_number(&item.text),
                title: anchor.text,
                link: anchor.href,
            }),
            _ => self.gaps.push(ParseGap {
                year: self.year.clone(),
                month_text: self.unknown_month.clone(),
                item: item.text.trim().to_string(),
            }),
        }
    }
}

/// Render CommonMark to HTML. Inline HTML in the source is passed through.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::empty());
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Flatten the direct children of `<body>` into [`Block`]s, in document order.
pub fn blocks_from_html(html: &str) -> Vec<Block> {
    let document = Html::parse_document(html);
    let Some(body) = document.select(&BODY_SELECTOR).next() else {
        return Vec::new();
    };

    body.children()
        .filter_map(ElementRef::wrap)
        .map(to_block)
        .collect()
}

fn to_block(element: ElementRef<'_>) -> Block {
    let name = element.value().name();
    if let Some(level) = heading_level(name) {
        return Block::Heading {
            level,
            text: element.text().collect(),
        };
    }

    match name {
        "p" => Block::Paragraph(element.text().collect()),
        "ul" | "ol" => Block::List(
            element
                .select(&ITEM_SELECTOR)
                .map(|li| ListItem {
                    text: li.text().collect(),
                    anchor: li.select(&ANCHOR_SELECTOR).next().map(|a| Anchor {
                        text: a.text().collect(),
                        href: a.value().attr("href").unwrap_or_default().to_string(),
                    }),
                })
                .collect(),
        ),
        _ => Block::Other,
    }
}

fn heading_level(name: &str) -> Option<u8> {
    name.strip_prefix('h')
        .and_then(|d| d.parse::<u8>().ok())
        .filter(|level| (1..=6).contains(level))
}

/// Fold over the blocks, tracking year and month, and collect issues.
pub fn scan<I>(blocks: I) -> IndexScan
where
    I: IntoIterator<Item = Block>,
{
    let state = blocks
        .into_iter()
        .fold(ScanState::default(), ScanState::step);
    IndexScan {
        issues: state.issues,
        gaps: state.gaps,
    }
}

/// Parse the markdown index into issue records.
#[instrument(level = "info", skip_all, fields(bytes = markdown.len()))]
pub fn parse_issues(markdown: &str) -> IndexScan {
    let html = markdown_to_html(markdown);
    let blocks = blocks_from_html(&html);
    let result = scan(blocks);

    // Links before the first year heading are page chrome, not issues.
    for gap in result.gaps.iter().filter(|g| g.year.is_some()) {
        warn!(
            year = ?gap.year,
            month_text = ?gap.month_text,
            item = %gap.item,
            "List item has no resolvable month; skipped"
        );
    }
    info!(
        issues = result.issues.len(),
        gaps = result.gaps.len(),
        "Parsed weekly index"
    );
    result
}

/// `true` when `s` is exactly four ASCII digits.
pub fn is_four_digit_year(s: &str) -> bool {
    YEAR_RE.is_match(s)
}

/// Digits from the `第 N 期` marker, e.g. `"第 123 期"` → `"123"`.
pub fn extract_issue_number(s: &str) -> Option<String> {
    ISSUE_NUMBER_RE
        .captures(s)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Map a Chinese month name to its two-digit code.
pub fn chinese_month_to_number(name: &str) -> Option<&'static str> {
    let code = match name {
        "一月" => "01",
        "二月" => "02",
        "三月" => "03",
        "四月" => "04",
        "五月" => "05",
        "六月" => "06",
        "七月" => "07",
        "八月" => "08",
        "九月" => "09",
        "十月" => "10",
        "十一月" => "11",
        "十二月" => "12",
        _ => return None,
    };
    Some(code)
}
