// src/services/profile.rs

//! Profile page field extraction.
//!
//! Each field has an ordered list of extraction strategies over the same
//! parsed document. Strategies are tried in order and the first non-empty
//! result wins.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{EnumeratorConfig, UserRecord};

/// Outcome of parsing a profile page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedProfile {
    /// A usable record
    Accepted(UserRecord),
    /// The username or nickname carries the spam marker
    Blocked(UserRecord),
}

/// Inputs shared by every extraction strategy.
struct Page<'a> {
    uid: &'a str,
    document: &'a Html,
    body: &'a str,
}

/// One way of pulling a field out of a page.
type Strategy = fn(&ProfileParser, &Page<'_>) -> Option<String>;

const USERNAME_STRATEGIES: &[Strategy] = &[
    ProfileParser::username_from_title,
    ProfileParser::username_from_heading,
];

const NICKNAME_STRATEGIES: &[Strategy] = &[ProfileParser::nickname_from_profile];

const EMAIL_STRATEGIES: &[Strategy] = &[
    ProfileParser::email_from_copy_attr,
    ProfileParser::email_from_link_attrs,
    ProfileParser::email_from_body_scan,
];

const EMAIL_PATTERN: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b";

/// Compiled CSS selectors used by the strategies.
struct Selectors {
    title: Selector,
    headings: Vec<Selector>,
    profile_containers: Vec<Selector>,
    nicknames: Vec<Selector>,
    copy_attrs: Vec<Selector>,
    clipboard: Selector,
    mailto: Selector,
    data_email: Selector,
}

impl Selectors {
    fn compile() -> Result<Self> {
        Ok(Self {
            title: parse_selector("title")?,
            headings: parse_all(&["h1", "h2"])?,
            profile_containers: parse_all(&["div.user-profile", "div.profile"])?,
            nicknames: parse_all(&["span.nickname", "div.nickname"])?,
            copy_attrs: parse_all(&["a[data-copy]", "button[data-copy]", "span[data-copy]"])?,
            clipboard: parse_selector("button[data-clipboard-text]")?,
            mailto: parse_selector(r#"a[href^="mailto:"]"#)?,
            data_email: parse_selector("span[data-email]")?,
        })
    }
}

/// Extracts [`UserRecord`]s from profile page HTML.
pub struct ProfileParser {
    selectors: Selectors,
    email_pattern: Regex,
    guest_email: String,
    blocked_marker: String,
}

impl ProfileParser {
    /// Create a parser with the placeholder address and spam marker from `config`.
    pub fn new(config: &EnumeratorConfig) -> Result<Self> {
        Ok(Self {
            selectors: Selectors::compile()?,
            email_pattern: Regex::new(EMAIL_PATTERN)
                .map_err(|e| AppError::parse("email pattern", e))?,
            guest_email: config.guest_email.clone(),
            blocked_marker: config.blocked_marker.clone(),
        })
    }

    /// Parse the profile page of `uid`.
    pub fn parse(&self, uid: &str, body: &str) -> ParsedProfile {
        let document = Html::parse_document(body);
        let page = Page {
            uid,
            document: &document,
            body,
        };

        let record = UserRecord {
            uid: uid.to_string(),
            username: self.first_match(USERNAME_STRATEGIES, &page),
            nickname: self.first_match(NICKNAME_STRATEGIES, &page),
            email: self.first_match(EMAIL_STRATEGIES, &page),
        };

        if record.is_blocked(&self.blocked_marker) {
            ParsedProfile::Blocked(record)
        } else {
            ParsedProfile::Accepted(record)
        }
    }

    fn first_match(&self, strategies: &[Strategy], page: &Page<'_>) -> String {
        strategies
            .iter()
            .find_map(|strategy| strategy(self, page).filter(|value| !value.is_empty()))
            .unwrap_or_default()
    }

    /// Accept an address if it has an `@` and is not the guest placeholder.
    fn accept_email(&self, candidate: &str) -> Option<String> {
        let candidate = candidate.trim();
        (candidate.contains('@') && !candidate.contains(self.guest_email.as_str()))
            .then(|| candidate.to_string())
    }

    // --- Username ---

    /// `"<username> - <site>"` page titles.
    fn username_from_title(&self, page: &Page<'_>) -> Option<String> {
        let title = page.document.select(&self.selectors.title).next()?;
        let text = element_text(&title);
        text.split_once(" - ")
            .map(|(username, _)| username.trim().to_string())
    }

    fn username_from_heading(&self, page: &Page<'_>) -> Option<String> {
        first_element(page.document.root_element(), &self.selectors.headings)
            .map(|heading| element_text(&heading))
    }

    // --- Nickname ---

    fn nickname_from_profile(&self, page: &Page<'_>) -> Option<String> {
        let container =
            first_element(page.document.root_element(), &self.selectors.profile_containers)?;
        first_element(container, &self.selectors.nicknames).map(|el| element_text(&el))
    }

    // --- Email ---

    /// Base64-encoded address on the profile's "copy email" control.
    fn email_from_copy_attr(&self, page: &Page<'_>) -> Option<String> {
        let element = first_element(page.document.root_element(), &self.selectors.copy_attrs)?;
        let encoded = element.value().attr("data-copy")?.trim();
        if encoded.is_empty() {
            return None;
        }

        match decode_base64_text(encoded) {
            Ok(decoded) => self.accept_email(&decoded),
            Err(e) => {
                log::warn!("Failed to decode email for UID {}: {}", page.uid, e);
                None
            }
        }
    }

    /// Plain-text addresses on clipboard buttons, mailto links or data attributes.
    fn email_from_link_attrs(&self, page: &Page<'_>) -> Option<String> {
        let document = page.document;

        let candidate = document
            .select(&self.selectors.clipboard)
            .filter_map(|el| el.value().attr("data-clipboard-text"))
            .find(|value| value.contains('@'))
            .map(str::to_string)
            .or_else(|| {
                document
                    .select(&self.selectors.mailto)
                    .filter_map(|el| el.value().attr("href"))
                    .next()
                    .map(|href| href.replace("mailto:", ""))
            })
            .or_else(|| {
                document
                    .select(&self.selectors.data_email)
                    .filter_map(|el| el.value().attr("data-email"))
                    .find(|value| value.contains('@'))
                    .map(str::to_string)
            })?;

        self.accept_email(&candidate)
    }

    /// Last resort: any address-shaped text in the raw page.
    fn email_from_body_scan(&self, page: &Page<'_>) -> Option<String> {
        self.email_pattern
            .find_iter(page.body)
            .map(|m| m.as_str())
            .find(|found| !found.contains(self.guest_email.as_str()))
            .map(str::to_string)
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::parse(format!("selector '{s}'"), format!("{e:?}")))
}

fn parse_all(list: &[&str]) -> Result<Vec<Selector>> {
    list.iter().map(|s| parse_selector(s)).collect()
}

/// First element matching the earliest selector in `selectors` that matches anything.
fn first_element<'a>(scope: ElementRef<'a>, selectors: &[Selector]) -> Option<ElementRef<'a>> {
    selectors
        .iter()
        .find_map(|selector| scope.select(selector).next())
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn decode_base64_text(encoded: &str) -> std::result::Result<String, String> {
    let bytes = STANDARD.decode(encoded).map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}
