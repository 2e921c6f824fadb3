// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Diary PDF report.
//!
//! Plain A4 text report using the PDF base-14 Helvetica fonts, so no font
//! files are embedded. Text outside ASCII is folded to the nearest ASCII
//! letter since the base fonts use a single-byte encoding.

use crate::models::{DiaryEntry, Pet};
use crate::time_utils::{format_day_time, format_utc_rfc3339};
use chrono::{DateTime, Utc};
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const CM: f32 = 28.3465;
const LINE_STEP: f32 = 0.5 * CM;
const BOTTOM_MARGIN: f32 = 3.0 * CM;
/// Notes are wrapped at this many characters per line.
const NOTES_CHUNK: usize = 90;

const REGULAR: Name<'static> = Name(b"F1");
const BOLD: Name<'static> = Name(b"F2");

/// Render the diary of `pet` (or an unknown pet) as a PDF document.
pub fn render_diary_report(
    pet: Option<&Pet>,
    entries: &[DiaryEntry],
    generated_at: DateTime<Utc>,
) -> Vec<u8> {
    let mut writer = PageWriter::new();

    let title = format!(
        "Recovery Report - {}",
        pet.map(|p| p.name.as_str()).unwrap_or("Pet")
    );
    writer.text(BOLD, 16.0, 2.0 * CM, PAGE_HEIGHT - 2.0 * CM, &title);
    writer.text(
        REGULAR,
        10.0,
        2.0 * CM,
        PAGE_HEIGHT - 2.6 * CM,
        &format!("Generated at: {}", format_utc_rfc3339(generated_at)),
    );
    writer.rule(PAGE_HEIGHT - 2.8 * CM);

    writer.y = PAGE_HEIGHT - 3.5 * CM;
    writer.line(BOLD, 12.0, 2.0 * CM, "Entries:");

    for entry in entries {
        writer.line(REGULAR, 10.0, 2.0 * CM, &entry_line(entry));

        if let Some(notes) = entry.notes.as_deref().filter(|n| !n.is_empty()) {
            for chunk in chunk_chars(notes, NOTES_CHUNK) {
                writer.line(REGULAR, 10.0, 3.0 * CM, &format!("Notes: {chunk}"));
            }
        }
    }

    writer.finish()
}

/// One summary line per entry.
fn entry_line(entry: &DiaryEntry) -> String {
    format!(
        "- {} | Appetite: {} | Energy: {} | Medication: {}",
        format_day_time(entry.date),
        entry.appetite,
        entry.energy,
        if entry.medication { "Yes" } else { "No" }
    )
}

/// Split into pieces of at most `size` characters.
fn chunk_chars(text: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(size)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Map text to bytes the base-14 fonts can show.
fn pdf_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            'á' | 'à' | 'â' | 'ã' | 'ä' => b'a',
            'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => b'A',
            'é' | 'è' | 'ê' | 'ë' => b'e',
            'É' | 'È' | 'Ê' | 'Ë' => b'E',
            'í' | 'ì' | 'î' | 'ï' => b'i',
            'Í' | 'Ì' | 'Î' | 'Ï' => b'I',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => b'o',
            'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => b'O',
            'ú' | 'ù' | 'û' | 'ü' => b'u',
            'Ú' | 'Ù' | 'Û' | 'Ü' => b'U',
            'ç' => b'c',
            'Ç' => b'C',
            'ñ' => b'n',
            'Ñ' => b'N',
            '–' | '—' => b'-',
            _ => b'?',
        })
        .collect()
}

/// Accumulates page content streams, starting a new page when the cursor
/// reaches the bottom margin.
struct PageWriter {
    pages: Vec<Content>,
    current: Content,
    y: f32,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Content::new(),
            y: PAGE_HEIGHT - 2.0 * CM,
        }
    }

    fn text(&mut self, font: Name<'static>, size: f32, x: f32, y: f32, text: &str) {
        let bytes = pdf_bytes(text);
        self.current.begin_text();
        self.current.set_font(font, size);
        self.current.next_line(x, y);
        self.current.show(Str(&bytes));
        self.current.end_text();
    }

    fn rule(&mut self, y: f32) {
        self.current.move_to(2.0 * CM, y);
        self.current.line_to(PAGE_WIDTH - 2.0 * CM, y);
        self.current.stroke();
    }

    /// Write a line at the cursor and advance it.
    fn line(&mut self, font: Name<'static>, size: f32, x: f32, text: &str) {
        if self.y < BOTTOM_MARGIN {
            let full = std::mem::replace(&mut self.current, Content::new());
            self.pages.push(full);
            self.y = PAGE_HEIGHT - 2.0 * CM;
        }
        let y = self.y;
        self.text(font, size, x, y, text);
        self.y -= LINE_STEP;
    }

    fn finish(mut self) -> Vec<u8> {
        self.pages.push(self.current);

        let count = self.pages.len();
        let catalog_id = Ref::new(1);
        let tree_id = Ref::new(2);
        let regular_id = Ref::new(3);
        let bold_id = Ref::new(4);
        let page_ids: Vec<Ref> = (0..count).map(|i| Ref::new(5 + 2 * i as i32)).collect();
        let content_ids: Vec<Ref> = (0..count).map(|i| Ref::new(6 + 2 * i as i32)).collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.pages(tree_id)
            .kids(page_ids.iter().copied())
            .count(count as i32);

        for ((content, page_id), content_id) in self
            .pages
            .into_iter()
            .zip(page_ids.iter().copied())
            .zip(content_ids.iter().copied())
        {
            {
                let mut page = pdf.page(page_id);
                page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
                page.parent(tree_id);
                page.contents(content_id);
                let mut resources = page.resources();
                let mut fonts = resources.fonts();
                fonts.pair(REGULAR, regular_id);
                fonts.pair(BOLD, bold_id);
            }
            pdf.stream(content_id, &content.finish());
        }

        pdf.type1_font(regular_id).base_font(Name(b"Helvetica"));
        pdf.type1_font(bold_id).base_font(Name(b"Helvetica-Bold"));

        pdf.finish()
    }
}
