use crate::error::ExtractionGap;
use crate::parsers::selectors::{Candidate, SelectorTable};
use crate::parsers::text::element_text;
use crate::results::{ListingRecord, PageResult};
use scraper::{ElementRef, Html};

/// Extracts the business listings from the markup of one result page
///
/// The first container selector with at least one match is used for every
/// container on the page; results of different container selectors are never
/// mixed. Each field takes the first of its candidate selectors that matches
/// inside the container, or stays unknown. Records with neither a name nor an
/// address are dropped.
///
/// Returns [`ExtractionGap`] when no container selector matches.
pub fn extract_listings(html: &str, table: &SelectorTable) -> Result<PageResult, ExtractionGap> {
    let doc = Html::parse_document(html);

    let (winner, containers) = find_containers(&doc, &table.containers).ok_or(ExtractionGap)?;

    ::log::info!(
        "Matched listing selector {} ({} elements)",
        winner.source,
        containers.len()
    );

    let matched = containers.len();
    let records = containers
        .into_iter()
        .map(|container| extract_record(container, table))
        .filter(|record| {
            let keep = record.is_identifiable();
            if !keep {
                ::log::debug!("Dropping listing without name or address: {:?}", record);
            }
            keep
        })
        .collect::<Vec<_>>();

    Ok(PageResult {
        selector: winner.source.clone(),
        containers: matched,
        records,
    })
}

/// First container selector with matches, together with its matched elements
fn find_containers<'a, 'd>(
    doc: &'d Html,
    candidates: &'a [Candidate],
) -> Option<(&'a Candidate, Vec<ElementRef<'d>>)> {
    candidates.iter().find_map(|candidate| {
        let elements = doc.select(&candidate.selector).collect::<Vec<_>>();
        if elements.is_empty() {
            ::log::trace!("No elements for listing selector {}", candidate.source);
            None
        } else {
            Some((candidate, elements))
        }
    })
}

/// Builds a record from one container element
fn extract_record(container: ElementRef<'_>, table: &SelectorTable) -> ListingRecord {
    ListingRecord::new(
        first_match(container, &table.name),
        first_match(container, &table.address),
        first_match(container, &table.phone),
    )
}

/// Text of the first candidate that matches inside `container`
///
/// A matched element with no text still counts as a match.
fn first_match(container: ElementRef<'_>, candidates: &[Candidate]) -> Option<String> {
    candidates.iter().find_map(|candidate| {
        container
            .select(&candidate.selector)
            .next()
            .map(element_text)
    })
}
