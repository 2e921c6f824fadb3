// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public pet card: a self-contained HTML summary meant to be shown to a
//! vet without logging in.

use crate::models::{DiaryEntry, Pet};
use crate::time_utils::{format_day, format_day_time};

/// Number of diary entries listed on the card.
pub const TIMELINE_LIMIT: usize = 30;

/// Policy for the card page: inline style/script plus the chart library.
pub const CARD_CSP: &str = "default-src 'none'; \
    script-src 'unsafe-inline' https://cdn.jsdelivr.net; \
    style-src 'unsafe-inline'; img-src 'self' data:; frame-ancestors 'none'";

const CHART_JS: &str = "https://cdn.jsdelivr.net/npm/chart.js";
const EMPTY: &str = "-";

const STYLE: &str = r#"
    body{font-family:Arial,Helvetica,sans-serif;background:#f7fafc;color:#1f2937;margin:0}
    .wrap{max-width:880px;margin:24px auto;padding:0 16px}
    .card{background:#fff;border-radius:16px;box-shadow:0 2px 12px rgba(0,0,0,.06);padding:20px}
    .grid{display:grid;grid-template-columns:repeat(2,minmax(0,1fr));gap:12px}
    .item{background:#fff;border:1px solid #eee;border-radius:12px;padding:12px}
    .title{font-size:24px;font-weight:700;margin:0 0 8px}
    .subtitle{color:#6b7280;margin:0 0 16px}
    .section{font-weight:700;margin:16px 0 8px}
    .muted{color:#6b7280}
    .timeline{list-style:none;padding:0;margin:0}
    .timeline li{padding:10px 12px;border:1px solid #eee;border-radius:12px;margin-bottom:8px}
    .badge{display:inline-block;background:#e5edff;color:#1e3a8a;padding:4px 8px;border-radius:999px;font-size:12px;font-weight:600}
    .btn{display:inline-block;background:#2563eb;color:#fff;padding:12px 16px;border-radius:12px;text-decoration:none;font-weight:700}
    @media (max-width:720px){.grid{grid-template-columns:1fr}}
"#;

const CHART_SCRIPT: &str = r#"
    if (labels.length) {
      const ctx = document.getElementById('chart').getContext('2d');
      new Chart(ctx, {
        type: 'line',
        data: { labels: labels, datasets: [{ label: 'Index (appetite+energy)', data: values, tension: 0.25 }] },
        options: { plugins: { legend: { display: false } }, scales: { y: { suggestedMin: 0, suggestedMax: 3, ticks: { stepSize: 1 } } } }
      });
    }
"#;

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON for embedding inside a `<script>` element.
fn script_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/")
}

fn or_empty(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .map(escape_html)
        .unwrap_or_else(|| EMPTY.to_string())
}

/// Render the card for `pet_id`.
///
/// `entries` must be oldest first. An unknown pet gets a placeholder card
/// that still reports the number of diary entries filed under the id.
pub fn render_pet_card(pet: Option<&Pet>, pet_id: &str, entries: &[DiaryEntry]) -> String {
    let pet_id_html = escape_html(pet_id);

    let (details, labels, values, timeline, period) = match pet {
        None => (
            format!(
                "<div><b>Name:</b> Pet</div>\n\
                 <div><b>Species:</b> {EMPTY} &nbsp; <b>Breed:</b> {EMPTY}</div>\n\
                 <div><b>Age:</b> {EMPTY} &nbsp; <b>Weight:</b> {EMPTY}</div>\n\
                 <div><b>Allergies:</b> {EMPTY}</div>\n\
                 <div class=\"muted\">ID: {pet_id_html}</div>"
            ),
            Vec::new(),
            Vec::new(),
            String::new(),
            EMPTY.to_string(),
        ),
        Some(pet) => {
            let details = format!(
                "<div><b>Name:</b> {}</div>\n\
                 <div><b>Species:</b> {} &nbsp; <b>Breed:</b> {}</div>\n\
                 <div><b>Age:</b> {} &nbsp; <b>Weight:</b> {}</div>\n\
                 <div><b>Allergies:</b> {}</div>\n\
                 <div class=\"muted\">ID: {}</div>",
                escape_html(&pet.name),
                or_empty(Some(pet.species.as_str())),
                or_empty(pet.breed.as_deref()),
                pet.age.map_or_else(|| EMPTY.to_string(), |a| a.to_string()),
                pet.weight.map_or_else(|| EMPTY.to_string(), |w| w.to_string()),
                or_empty(pet.allergies.as_deref()),
                escape_html(&pet.id),
            );

            let labels: Vec<String> = entries.iter().map(|e| format_day_time(e.date)).collect();
            let values: Vec<f64> = entries.iter().map(DiaryEntry::wellbeing_index).collect();

            let start = entries.len().saturating_sub(TIMELINE_LIMIT);
            let timeline: String = entries[start..].iter().map(timeline_item).collect();

            let period = match (entries.first(), entries.last()) {
                (Some(first), Some(last)) => {
                    format!("{} - {}", format_day(first.date), format_day(last.date))
                }
                _ => EMPTY.to_string(),
            };

            (details, labels, values, timeline, period)
        }
    };

    let timeline = if timeline.is_empty() {
        "<li>No entries found.</li>".to_string()
    } else {
        timeline
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>PetID Card</title>
  <script src="{CHART_JS}"></script>
  <style>{STYLE}</style>
</head>
<body>
  <div class="wrap">
    <div class="card">
      <h1 class="title">Digital Pet Card - PetID</h1>
      <p class="subtitle">Public pet summary (no login) for clinical use.</p>
      <div class="grid">
        <div class="item">
          <div class="section">Pet details</div>
          {details}
        </div>
        <div class="item">
          <div class="section">Overview</div>
          <div class="badge">Diary entries: {count}</div>
          <div class="badge">Period: {period}</div>
          <canvas id="chart" height="160"></canvas>
        </div>
      </div>
      <div class="section">Latest diary entries</div>
      <ul class="timeline">{timeline}</ul>
      <div style="margin-top:12px">
        <a class="btn" href="/api/reports/diary/{pet_id_html}" target="_blank" rel="noopener">Download full report (PDF)</a>
      </div>
    </div>
  </div>
  <script>
    const labels = {labels};
    const values = {values};
    {CHART_SCRIPT}
  </script>
</body>
</html>"#,
        count = entries.len(),
        labels = script_json(&labels),
        values = script_json(&values),
    )
}

fn timeline_item(entry: &DiaryEntry) -> String {
    let notes = entry
        .notes
        .as_deref()
        .filter(|n| !n.is_empty())
        .map(|n| format!("<div class=\"muted\">Notes: {}</div>", escape_html(n)))
        .unwrap_or_default();

    format!(
        "<li><b>{}</b> - Appetite: {} &bull; Energy: {} &bull; Medication: {}{}</li>",
        format_day_time(entry.date),
        escape_html(&entry.appetite),
        escape_html(&entry.energy),
        if entry.medication { "Yes" } else { "No" },
        notes
    )
}
