// ABOUTME: HTML row extraction for the reported-events table.
// ABOUTME: Turns a document into ordered RawRow values without ever failing.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::models::RawRow;

/// Body of the events table. A single fixed selector; a page without it yields no rows.
pub const TABLE_BODY_SELECTOR: &str = "table.table tbody";

static TABLE_BODY: Lazy<Selector> =
    Lazy::new(|| Selector::parse(TABLE_BODY_SELECTOR).expect("static selector"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("static selector"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("static selector"));
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("static selector"));

/// Extracts every row of the first matching table body, top to bottom.
///
/// Cell text is trimmed at the edges only; line breaks inside a cell are kept
/// for the normalizer. Malformed markup is handled by the HTML5 parser, so
/// this never fails: missing pieces just come back empty.
pub fn extract_rows(html: &str) -> Vec<RawRow> {
    let document = Html::parse_document(html);
    let Some(body) = document.select(&TABLE_BODY).next() else {
        return Vec::new();
    };
    body.select(&ROW).map(row_from_element).collect()
}

fn row_from_element(row: ElementRef<'_>) -> RawRow {
    let cells = row
        .select(&CELL)
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .collect();
    let link = row
        .select(&LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .filter(|href| !href.trim().is_empty())
        .map(str::to_string);
    RawRow { cells, link }
}
