//! Research-page parser
//!
//! Extracts the structured infobox fields from one wiki research page:
//! title, internal name, Allows / Required technologies link lists, the
//! expansion-exclusive flag, science cost and trigger-condition text.
//!
//! Pages that cover both the base game and the expansion carry tabbed
//! infoboxes; the expansion tab is preferred when present.

use ego_tree::NodeRef;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{node::Node, ElementRef, Html, Selector};
use url::Url;

use crate::records::{
    RawLink, RawResearchRecord, ResearchKind, ResearchScienceCost, ResearchSciencePack,
    ResearchVariant,
};
use crate::url::{fallback_name_from_title, is_research_href, normalize_research_url};
use crate::{Result, TrawlError, UrlResult};

/// Internal-name candidates that are actually infobox section labels.
/// Seeing one means the extraction landed on the wrong row.
const LABEL_VALUES: &[&str] = &[
    "Allows",
    "Required technologies",
    "Effects",
    "Prototype type",
    "Researched by",
    "Cost",
];

static WIKI_TITLE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*-\s*Factorio Wiki\s*$").expect("valid title regex"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-+]?[0-9]*\.?[0-9]+").expect("valid number regex"));

/// Capability to parse one fetched page into a raw record.
pub trait ParsePage {
    fn parse(&self, html: &str, page_url: &str) -> Result<RawResearchRecord>;
}

/// Scraper-backed research-page parser for the wiki's infobox markup.
#[derive(Debug, Clone)]
pub struct ResearchPageParser {
    base: Url,
}

impl ResearchPageParser {
    pub fn new(base: Url) -> Self {
        Self { base }
    }
}

impl ParsePage for ResearchPageParser {
    fn parse(&self, html: &str, page_url: &str) -> Result<RawResearchRecord> {
        self.parse_page(html, page_url)
            .map_err(|e| TrawlError::Parse {
                url: page_url.to_string(),
                message: e.to_string(),
            })
    }
}

impl ResearchPageParser {
    fn parse_page(&self, html: &str, page_url: &str) -> UrlResult<RawResearchRecord> {
        let url = normalize_research_url(&self.base, page_url)?;

        let document = Html::parse_document(html);
        let (scope, variant) = select_research_scope(&document);

        let title = extract_page_title(&document);
        let internal_name = extract_internal_name(scope)
            .unwrap_or_else(|| fallback_name_from_title(title.as_deref(), &url));

        let allows_links = extract_section_links(scope, "Allows", &self.base)?;
        let required_links = extract_section_links(scope, "Required technologies", &self.base)?;

        let is_space_age = extract_space_age_flag(&document);
        let science_cost = extract_science_cost(scope);
        let condition_text = extract_condition_text(scope);

        let (research_type, research_science, research_condition_text) = match science_cost {
            Some(cost) => (Some(ResearchKind::Science), Some(cost), None),
            None => match condition_text {
                Some(text) => (Some(ResearchKind::Condition), None, Some(text)),
                None => (None, None, None),
            },
        };

        Ok(RawResearchRecord {
            id: internal_name.clone(),
            title,
            internal_name,
            url,
            allows_links_raw: allows_links,
            required_links_raw: required_links,
            is_space_age_exclusive: is_space_age,
            selected_variant: variant,
            research_type,
            research_science,
            research_condition_text,
            error: None,
        })
    }
}

/// Selects the infobox scope to parse and records which variant it is.
fn select_research_scope(document: &Html) -> (ElementRef<'_>, ResearchVariant) {
    let space_age = Selector::parse("table.tab.tab-2").expect("valid tab selector");
    if let Some(tab) = document.select(&space_age).next() {
        return (tab, ResearchVariant::SpaceAge);
    }

    let base_game = Selector::parse("table.tab.tab-1").expect("valid tab selector");
    if let Some(tab) = document.select(&base_game).next() {
        return (tab, ResearchVariant::BaseGame);
    }

    (document.root_element(), ResearchVariant::Single)
}

/// Extracts the page title: the first heading, else the document title
/// minus the wiki suffix.
fn extract_page_title(document: &Html) -> Option<String> {
    let heading = Selector::parse("h1#firstHeading").expect("valid heading selector");
    if let Some(h1) = document.select(&heading).next() {
        let text = collapse_text(h1);
        if !text.is_empty() {
            return Some(text);
        }
    }

    let title = Selector::parse("title").expect("valid title selector");
    document.select(&title).next().map(|el| {
        let text = collapse_text(el);
        WIKI_TITLE_SUFFIX.replace(&text, "").into_owned()
    })
}

/// Extracts the internal technology name from the infobox.
///
/// Returns None when the row is missing, empty, or the extraction landed
/// on a section label instead of a value.
fn extract_internal_name(scope: ElementRef<'_>) -> Option<String> {
    let cell = find_section_cell(scope, "Internal name")?;
    let value = collapse_text(cell);

    if value.is_empty() || LABEL_VALUES.contains(&value.as_str()) {
        return None;
    }

    Some(value)
}

/// Finds the value cell directly below an infobox label row.
fn find_section_cell<'a>(scope: ElementRef<'a>, label: &str) -> Option<ElementRef<'a>> {
    let rows = Selector::parse("tr").expect("valid row selector");
    let cells = Selector::parse("td").expect("valid cell selector");

    let label_row = scope
        .select(&rows)
        .find(|row| collapse_text(*row) == label)?;

    let value_row = label_row
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "tr")?;

    value_row.select(&cells).next()
}

/// Extracts the research links from the cell below `label`, normalized
/// and deduplicated in first-seen order.
fn extract_section_links(
    scope: ElementRef<'_>,
    label: &str,
    base: &Url,
) -> UrlResult<Vec<RawLink>> {
    let Some(cell) = find_section_cell(scope, label) else {
        return Ok(Vec::new());
    };

    let anchors = Selector::parse("a[href]").expect("valid anchor selector");

    let mut out = Vec::new();
    for anchor in cell.select(&anchors) {
        let href = anchor.value().attr("href").unwrap_or_default();
        if !is_research_href(href) {
            continue;
        }

        let title = anchor.value().attr("title").unwrap_or_default().trim();
        let url = normalize_research_url(base, href)?;
        if out.iter().any(|link: &RawLink| link.url == url) {
            continue;
        }
        out.push(RawLink::new(url, title));
    }

    Ok(out)
}

/// Detects the expansion-exclusive marker phrases anywhere in the page.
fn extract_space_age_flag(document: &Html) -> bool {
    let text: String = document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join("\n");
    text.contains("Space Age expansion exclusive feature") || text.contains("Introduced in Space Age")
}

/// Extracts the science cost from the Cost section, when present.
fn extract_science_cost(scope: ElementRef<'_>) -> Option<ResearchScienceCost> {
    let cell = find_section_cell(scope, "Cost")
        .or_else(|| find_section_cell(scope, "Research cost"))?;

    let icon_selector = Selector::parse("div.factorio-icon").expect("valid icon selector");
    let icons: Vec<_> = cell.select(&icon_selector).collect();
    if icons.is_empty() {
        return None;
    }

    let mut time_seconds = None;
    let mut time_text = None;
    let mut start_index = 0;

    let first_title = icon_title(icons[0]);
    let first_text = icon_amount_text(icons[0]);
    if first_title
        .as_deref()
        .is_some_and(|t| t.eq_ignore_ascii_case("time"))
    {
        time_seconds = first_text.as_deref().and_then(parse_number);
        time_text = first_text;
        start_index = 1;
    }

    let mut science_packs = Vec::new();
    for icon in &icons[start_index..] {
        let Some(name) = icon_title(*icon) else {
            continue;
        };
        let amount_text = icon_amount_text(*icon);
        let amount_per_unit = amount_text.as_deref().and_then(parse_number);
        science_packs.push(ResearchSciencePack {
            name,
            amount_per_unit,
            amount_text,
        });
    }

    let big = Selector::parse("big").expect("valid big selector");
    let mut unit_count = None;
    let mut unit_count_text = None;
    for node in cell.select(&big) {
        let candidate = collapse_text(node);
        if !candidate.is_empty() {
            unit_count = parse_int(&candidate);
            unit_count_text = Some(candidate);
            break;
        }
    }

    Some(ResearchScienceCost {
        time_seconds,
        time_text,
        unit_count,
        unit_count_text,
        science_packs,
    })
}

/// Extracts the trigger-condition text from the Researched-by section,
/// with icon elements replaced by their titles.
fn extract_condition_text(scope: ElementRef<'_>) -> Option<String> {
    let cell = find_section_cell(scope, "Researched by")?;

    let mut parts: Vec<String> = Vec::new();
    for child in cell.children() {
        collect_condition_text(child, &mut parts);
    }

    let joined = parts.concat();
    let text = WHITESPACE_RUN.replace_all(&joined, " ");
    let text = text.trim();

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn collect_condition_text(node: NodeRef<'_, Node>, parts: &mut Vec<String>) {
    match node.value() {
        Node::Text(text) => parts.push(text.to_string()),
        Node::Element(element) => {
            if element.classes().any(|class| class == "factorio-icon") {
                if let Some(el) = ElementRef::wrap(node) {
                    if let Some(title) = icon_title(el) {
                        parts.push(format!(" {} ", title));
                    }
                }
                return;
            }
            for child in node.children() {
                collect_condition_text(child, parts);
            }
        }
        _ => {}
    }
}

/// Extracts an icon's display title from its link, else its image alt.
fn icon_title(icon: ElementRef<'_>) -> Option<String> {
    let titled_anchor = Selector::parse("a[title]").expect("valid anchor selector");
    if let Some(anchor) = icon.select(&titled_anchor).next() {
        let title = anchor.value().attr("title").unwrap_or_default().trim();
        if !title.is_empty() {
            return Some(title.to_string());
        }
    }

    let alt_image = Selector::parse("img[alt]").expect("valid image selector");
    if let Some(image) = icon.select(&alt_image).next() {
        let alt = image.value().attr("alt").unwrap_or_default().trim();
        if !alt.is_empty() {
            return Some(alt.to_string());
        }
    }

    None
}

fn icon_amount_text(icon: ElementRef<'_>) -> Option<String> {
    let text_div = Selector::parse("div.factorio-icon-text").expect("valid icon-text selector");
    icon.select(&text_div).next().map(collapse_text)
}

/// Joins an element's text with single spaces, trimmed.
fn collapse_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect::<Vec<_>>().join(" ");
    WHITESPACE_RUN.replace_all(&raw, " ").trim().to_string()
}

/// Parses a numeric string, tolerating thousands separators and
/// multiplication glyphs.
fn parse_number(value: &str) -> Option<f64> {
    let cleaned = value
        .trim()
        .replace(',', "")
        .replace(['\u{d7}', '\u{2716}'], " ");
    let matched = NUMBER.find(&cleaned)?;
    matched.as_str().parse::<f64>().ok()
}

/// Parses an integral numeric string; non-integral values yield None.
fn parse_int(value: &str) -> Option<i64> {
    let parsed = parse_number(value)?;
    if parsed.fract() == 0.0 {
        Some(parsed as i64)
    } else {
        None
    }
}
