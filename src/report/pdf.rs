//! Single-page PDF 1.4 writer using the two standard Helvetica fonts.

use chrono::{DateTime, Utc};
use std::fmt::Write as _;

use super::{generated_line, placement_line, sections, Analytics, REPORT_TITLE};

// US Letter, points
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;

#[derive(Clone, Copy)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

#[derive(Default)]
struct Canvas {
    ops: String,
}

impl Canvas {
    fn text(&mut self, font: Font, size: f32, x: f32, y: f32, text: &str) {
        let _ = writeln!(
            self.ops,
            "BT /{} {} Tf {:.2} {:.2} Td ({}) Tj ET",
            font.resource(),
            size,
            x,
            y,
            escape(text)
        );
    }

    /// Helvetica averages a little over half an em per glyph.
    fn centered(&mut self, font: Font, size: f32, y: f32, text: &str) {
        let width = text.chars().count() as f32 * size * 0.52;
        self.text(font, size, ((PAGE_WIDTH - width) / 2.0).max(0.0), y, text);
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Assemble numbered objects into a file with a correct cross-reference table.
fn assemble(objects: &[String]) -> Vec<u8> {
    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());

    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        let _ = write!(out, "{} 0 obj\n{}\nendobj\n", index + 1, body);
    }

    let xref_at = out.len();
    let _ = write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = write!(out, "{:010} 00000 n \n", offset);
    }
    let _ = write!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_at
    );
    out.into_bytes()
}

pub fn render(analytics: &Analytics, generated_at: DateTime<Utc>) -> Vec<u8> {
    let mut canvas = Canvas::default();
    canvas.centered(Font::Bold, 20.0, PAGE_HEIGHT - 50.0, REPORT_TITLE);
    canvas.centered(Font::Regular, 12.0, PAGE_HEIGHT - 70.0, &generated_line(generated_at));

    let mut y = PAGE_HEIGHT - 100.0;
    for section in sections(analytics) {
        canvas.text(Font::Bold, 16.0, 50.0, y, section.heading);
        y -= 30.0;
        for line in &section.lines {
            canvas.text(Font::Regular, 12.0, 70.0, y, line);
            y -= 20.0;
        }
        y -= 10.0;
    }
    canvas.text(Font::Regular, 12.0, 70.0, y, &placement_line(analytics));

    let objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 4 0 R /F2 5 0 R >> >> /Contents 6 0 R >>",
            PAGE_WIDTH, PAGE_HEIGHT
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold >>".to_string(),
        format!("<< /Length {} >>\nstream\n{}endstream", canvas.ops.len(), canvas.ops),
    ];
    assemble(&objects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn report() -> String {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        String::from_utf8(render(&crate::report::sample(), at)).unwrap()
    }

    #[test]
    fn document_framing() {
        let pdf = report();
        assert!(pdf.starts_with("%PDF-1.4\n"));
        assert!(pdf.ends_with("%%EOF\n"));
        assert!(pdf.contains("(Admin Analytics Report) Tj"));
        assert!(pdf.contains("(Overall Placement Percentage: 37.5%) Tj"));
        assert!(pdf.contains("/BaseFont /Helvetica-Bold"));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let pdf = report();
        let startxref: usize = pdf
            .rsplit("startxref\n")
            .next()
            .and_then(|tail| tail.lines().next())
            .unwrap()
            .parse()
            .unwrap();
        assert!(pdf[startxref..].starts_with("xref\n0 7\n"));

        let entries: Vec<&str> = pdf[startxref..].lines().skip(3).take(6).collect();
        for (index, entry) in entries.iter().enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            assert!(pdf[offset..].starts_with(&format!("{} 0 obj", index + 1)));
        }
    }

    #[test]
    fn stream_length_matches_content() {
        let pdf = report();
        let start = pdf.find("stream\n").unwrap() + "stream\n".len();
        let end = pdf.find("endstream").unwrap();
        let declared: usize = pdf
            .split("/Length ")
            .nth(1)
            .and_then(|s| s.split(' ').next())
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(end - start, declared);
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(escape("a(b)c\\"), "a\\(b\\)c\\\\");
        assert_eq!(escape("café"), "caf?");
    }
}
