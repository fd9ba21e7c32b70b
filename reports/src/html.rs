//! HTML fragment rendering for the participation page.
//!
//! The output is meant to become the `innerHTML` of a fresh container, so it
//! is a fragment, not a document. Payload strings are inserted verbatim.

use serde_json::Value;

use crate::text::TextLookup;
use crate::types::{Column, ParticipationReport};

/// Element id of the rendered table; the CSV export reads it back by id.
pub const TABLE_ID: &str = "participationTable";

/// File name offered by the CSV download.
pub const CSV_FILE_NAME: &str = "participation.csv";

/// Host-side function that turns a rendered table into a CSV download.
pub const CSV_HANDLER: &str = "cldrCsvFromTable.download";

/// Action handle for the host's table-to-CSV utility.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvDownload {
    /// Id of the table element to export
    pub table_id: String,
    /// Suggested download file name
    pub file_name: String,
}

impl Default for CsvDownload {
    fn default() -> Self {
        Self {
            table_id: TABLE_ID.to_string(),
            file_name: CSV_FILE_NAME.to_string(),
        }
    }
}

impl CsvDownload {
    /// Inline `onclick` script invoking the CSV utility.
    ///
    /// ```rust
    /// use participation_report::CsvDownload;
    ///
    /// assert_eq!(
    ///     CsvDownload::default().onclick(),
    ///     r#"cldrCsvFromTable.download("participationTable", "participation.csv")"#
    /// );
    /// ```
    pub fn onclick(&self) -> String {
        format!(
            "{}(\"{}\", \"{}\")",
            CSV_HANDLER, self.table_id, self.file_name
        )
    }
}

/// Render the participation report as an HTML fragment.
///
/// Always emits the wrapping `<div>`. Adds the organization heading when the
/// payload names one, and the CSV link plus table when both `rows.header` and
/// `rows.data` are present. Column titles come from `text`; cells follow
/// [`Column::ALL`] order regardless of how the server laid out each row.
pub fn make_html_from_json(report: &ParticipationReport, text: &dyn TextLookup) -> String {
    let mut html = String::from("<div>\n");

    if let Some(org) = report.organization() {
        html.push_str(&format!("<h4>Organization: {}</h4>\n", value_text(org)));
    }

    if let (Some(rows), Some((_, data))) = (report.rows.as_ref(), report.table()) {
        let csv = CsvDownload::default();
        html.push_str(&format!(
            "<h4><a onclick='{}'>Download CSV</a></h4>\n",
            csv.onclick()
        ));
        html.push_str(&format!("<table border='1' id='{}'>\n", csv.table_id));

        html.push_str("<tr>\n");
        for column in Column::ALL {
            html.push_str(&format!("<th>{}</th>\n", text.get(column.title_key())));
        }
        html.push_str("</tr>\n");

        for row in data {
            html.push_str("<tr>\n");
            for column in Column::ALL {
                html.push_str(&format!("<td>{}</td>\n", cell_text(rows.cell(row, column))));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</table>\n");
    }

    html.push_str("</div>");
    html
}

/// Text of one table cell.
///
/// Mirrors how the page's script would stringify the value: strings as-is,
/// integral numbers without a fraction, `null`, `true`/`false`, arrays joined
/// by commas, objects as `[object Object]`, and a missing cell as
/// `undefined`.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(value) => value_text(value),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                n.to_string()
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => {
                        format!("{:.0}", f)
                    }
                    Some(f) => f.to_string(),
                    None => n.to_string(),
                }
            }
        }
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => value_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TextCatalog;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(payload: Value) -> String {
        let report = ParticipationReport::from_value(&payload).expect("valid payload");
        make_html_from_json(&report, &TextCatalog::empty())
    }

    fn full_header() -> Value {
        json!({
            "LOC": 0, "FORUM_TOTAL": 1, "FORUM_ORG": 2,
            "FORUM_REQUEST": 3, "FORUM_DISCUSS": 4, "FORUM_ACT": 5
        })
    }

    #[test]
    fn empty_payload_renders_only_container() {
        assert_eq!(render(json!({})), "<div>\n</div>");
    }

    #[test]
    fn org_only_renders_heading_without_table() {
        let html = render(json!({"org": "ACME"}));
        assert_eq!(html, "<div>\n<h4>Organization: ACME</h4>\n</div>");
        assert!(!html.contains("<table"));
    }

    #[test]
    fn numeric_org_is_stringified() {
        assert_eq!(
            render(json!({"org": 42})),
            "<div>\n<h4>Organization: 42</h4>\n</div>"
        );
        assert_eq!(render(json!({"org": false})), "<div>\n</div>");
    }

    #[test]
    fn org_is_not_escaped() {
        let html = render(json!({"org": "<b>A&B</b>"}));
        assert!(html.contains("<h4>Organization: <b>A&B</b></h4>"));
    }

    #[test]
    fn single_row_table_matches_expected_fragment() {
        let html = render(json!({
            "rows": {"header": full_header(), "data": [["US", 10, 2, 3, 4, 1]]}
        }));
        let expected = "<div>\n\
<h4><a onclick='cldrCsvFromTable.download(\"participationTable\", \"participation.csv\")'>Download CSV</a></h4>\n\
<table border='1' id='participationTable'>\n\
<tr>\n\
<th>recentLoc</th>\n\
<th>forum_participation_TOTAL</th>\n\
<th>forum_participation_ORG</th>\n\
<th>forum_participation_REQUEST</th>\n\
<th>forum_participation_DISCUSS</th>\n\
<th>forum_participation_ACT</th>\n\
</tr>\n\
<tr>\n\
<td>US</td>\n\
<td>10</td>\n\
<td>2</td>\n\
<td>3</td>\n\
<td>4</td>\n\
<td>1</td>\n\
</tr>\n\
</table>\n\
</div>";
        assert_eq!(html, expected);
    }

    #[test]
    fn headers_use_localized_titles() {
        let report = ParticipationReport::from_value(&json!({
            "rows": {"header": full_header(), "data": []}
        }))
        .expect("valid payload");
        let html = make_html_from_json(&report, &TextCatalog::default());
        let titles: Vec<&str> = html
            .lines()
            .filter_map(|l| l.strip_prefix("<th>")?.strip_suffix("</th>"))
            .collect();
        assert_eq!(
            titles,
            [
                "Locale",
                "Total Posts",
                "Org Posts",
                "Open Requests",
                "Open Discussions",
                "Needing Action"
            ]
        );
    }

    #[test]
    fn row_count_is_data_rows_plus_header() {
        for n in [0usize, 1, 3, 17] {
            let data: Vec<Value> = (0..n).map(|i| json!([format!("l{i}"), i, 0, 0, 0, 0])).collect();
            let html = render(json!({"rows": {"header": full_header(), "data": data}}));
            assert_eq!(html.matches("<tr>").count(), n + 1, "rows for n={n}");
            assert_eq!(html.matches("<th>").count(), 6);
            assert_eq!(html.matches("<td>").count(), n * 6);
        }
    }

    #[test]
    fn cells_follow_display_order_not_payload_order() {
        let html = render(json!({
            "rows": {
                "header": {
                    "FORUM_ACT": 0, "FORUM_DISCUSS": 1, "FORUM_REQUEST": 2,
                    "FORUM_ORG": 3, "FORUM_TOTAL": 4, "LOC": 5
                },
                "data": [[1, 4, 3, 2, 10, "US"]]
            }
        }));
        let cells: Vec<&str> = html
            .lines()
            .filter_map(|l| l.strip_prefix("<td>")?.strip_suffix("</td>"))
            .collect();
        assert_eq!(cells, ["US", "10", "2", "3", "4", "1"]);
    }

    #[test]
    fn missing_rows_fields_skip_table() {
        assert_eq!(render(json!({"rows": {}})), "<div>\n</div>");
        assert_eq!(
            render(json!({"org": "X", "rows": {"data": [["en"]]}})),
            "<div>\n<h4>Organization: X</h4>\n</div>"
        );
        assert_eq!(render(json!({"rows": {"header": full_header()}})), "<div>\n</div>");
    }

    #[test]
    fn missing_column_renders_undefined() {
        let html = render(json!({
            "rows": {"header": {"LOC": 0}, "data": [["en"]]}
        }));
        assert!(html.contains("<td>en</td>"));
        assert_eq!(html.matches("<td>undefined</td>").count(), 5);
    }

    #[test]
    fn cell_text_stringifies_like_script() {
        assert_eq!(cell_text(None), "undefined");
        assert_eq!(cell_text(Some(&json!(null))), "null");
        assert_eq!(cell_text(Some(&json!(true))), "true");
        assert_eq!(cell_text(Some(&json!(42))), "42");
        assert_eq!(cell_text(Some(&json!(-3))), "-3");
        assert_eq!(cell_text(Some(&json!(10.0))), "10");
        assert_eq!(cell_text(Some(&json!(2.5))), "2.5");
        assert_eq!(cell_text(Some(&json!("fr_CA"))), "fr_CA");
        assert_eq!(cell_text(Some(&json!([1, null, "a"]))), "1,,a");
        assert_eq!(cell_text(Some(&json!({"a": 1}))), "[object Object]");
    }
}
