//! Route rows from the static stop page.
//!
//! The page lists one table row per route serving the stop. Route rows
//! alternate between the `ttego1` and `ttego2` classes and have four
//! cells: route name, stop name, direction, and a time cell whose `id` is
//! `tte` followed by the route's dynamic key.

use scraper::{ElementRef, Html};
use tracing::debug;

use crate::domain::{NOT_AVAILABLE, RouteMap, RouteRecord};

/// Row classes marking route rows (alternating styling).
const ROUTE_ROW_CLASSES: [&str; 2] = ["ttego1", "ttego2"];

/// Literal prefix of the time cell's `id`.
const TIME_CELL_TAG: &str = "tte";

/// Cells in a well-formed route row.
const ROUTE_ROW_CELLS: usize = 4;

/// Parse the route rows of a stop page.
///
/// Rows with the wrong number of cells, or whose time cell has no `id`,
/// are skipped. Rows sharing a dynamic key overwrite earlier ones.
pub fn parse_route_rows(document: &str) -> RouteMap {
    let html = Html::parse_document(document);

    let mut rows = 0usize;
    let routes: RouteMap = elements(html.root_element(), "tr")
        .filter(is_route_row)
        .inspect(|_| rows += 1)
        .filter_map(parse_row)
        .map(|record| (record.dynamic_key.clone(), record))
        .collect();

    debug!(
        rows,
        routes = routes.len(),
        "Parsed route listing"
    );

    routes
}

fn is_route_row(row: &ElementRef<'_>) -> bool {
    row.value()
        .classes()
        .any(|class| ROUTE_ROW_CLASSES.contains(&class))
}

fn parse_row(row: ElementRef<'_>) -> Option<RouteRecord> {
    let cells: Vec<ElementRef<'_>> = elements(row, "td").collect();
    let [route_cell, stop_cell, direction_cell, time_cell] =
        <[ElementRef<'_>; ROUTE_ROW_CELLS]>::try_from(cells).ok()?;

    let id = time_cell.value().id().filter(|id| !id.is_empty())?;
    let dynamic_key = id.strip_prefix(TIME_CELL_TAG).unwrap_or(id);

    Some(RouteRecord {
        dynamic_key: dynamic_key.to_string(),
        route_name: first_link_text(route_cell),
        stop_label: first_link_text(stop_cell),
        direction: text(direction_cell),
    })
}

/// Trimmed text of the first link in a cell, or `N/A`.
fn first_link_text(cell: ElementRef<'_>) -> String {
    elements(cell, "a")
        .next()
        .map(text)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Descendant elements with the given tag name, in document order.
fn elements<'a>(
    parent: ElementRef<'a>,
    name: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> {
    parent
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(move |e| e.value().name() == name)
}
