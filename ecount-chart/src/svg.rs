use crate::scene::{LineShape, PathShape, RectShape, Scene, Shape, TextShape};
use std::fmt::Write;

/// Escape the characters that cannot appear raw in SVG text or attributes.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn write_line(out: &mut String, line: &LineShape) {
    let _ = writeln!(
        out,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
        line.x1,
        line.y1,
        line.x2,
        line.y2,
        escape_text(&line.stroke),
        line.stroke_width
    );
}

fn write_path(out: &mut String, path: &PathShape) {
    let _ = write!(
        out,
        r#"<path data-key="{}" d="{}" fill="{}""#,
        escape_text(&path.key),
        path.d,
        escape_text(path.fill.as_deref().unwrap_or("none"))
    );
    if let Some(stroke) = &path.stroke {
        let _ = write!(
            out,
            r#" stroke="{}" stroke-width="{}""#,
            escape_text(stroke),
            path.stroke_width
        );
    }
    if let Some(dash) = &path.dash {
        let _ = write!(out, r#" stroke-dasharray="{}""#, escape_text(dash));
    }
    if path.opacity < 1.0 {
        let _ = write!(out, r#" opacity="{}""#, path.opacity);
    }
    out.push_str("/>\n");
}

fn write_text(out: &mut String, text: &TextShape) {
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" text-anchor="{}" font-size="{}""#,
        text.x,
        text.y,
        text.anchor.as_str(),
        text.font_size
    );
    if text.bold {
        out.push_str(r#" font-weight="bold""#);
    }
    if let Some(degrees) = text.rotation {
        let _ = write!(out, r#" transform="rotate({})""#, degrees);
    }
    let _ = writeln!(out, ">{}</text>", escape_text(&text.content));
}

fn write_rect(out: &mut String, rect: &RectShape) {
    let _ = writeln!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        escape_text(&rect.fill)
    );
}

impl Scene {
    /// Standalone SVG document with the shapes in draw order.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        for shape in &self.shapes {
            match shape {
                Shape::Line(line) => write_line(&mut out, line),
                Shape::Path(path) => write_path(&mut out, path),
                Shape::Text(text) => write_text(&mut out, text),
                Shape::Rect(rect) => write_rect(&mut out, rect),
            }
        }
        out.push_str("</svg>\n");
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
