//! Basic report rendering example.
//!
//! Run with: `cargo run -p participation-report --example basic_report`

use participation_report::{ParticipationReport, TextCatalog, make_html_from_json};

fn main() {
    let payload = r#"{
        "org": "Example Org",
        "rows": {
            "header": {"LOC": 0, "FORUM_TOTAL": 1, "FORUM_ORG": 2,
                       "FORUM_REQUEST": 3, "FORUM_DISCUSS": 4, "FORUM_ACT": 5},
            "data": [
                ["de", 41, 12, 3, 5, 2],
                ["ja", 17, 0, 1, 2, 0]
            ]
        }
    }"#;

    let report = ParticipationReport::from_json_str(payload).expect("example payload is valid");
    let html = make_html_from_json(&report, &TextCatalog::default());

    let output_path = "participation.html";
    std::fs::write(output_path, &html).expect("Failed to write report");

    println!("Report written to: {}", output_path);
    println!("HTML size: {} bytes", html.len());
}
