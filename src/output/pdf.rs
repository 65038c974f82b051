//! Plain-text resume to PDF

use crate::error::{Result, ResumeRefinerError};
use log::info;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 18.0;
const FONT_SIZE_PT: f32 = 10.5;
const LEADING_PT: f32 = 13.0;
const PT_TO_MM: f32 = 0.352_778;
/// Rough Helvetica capacity of one line at 10.5pt across the text width
const MAX_LINE_CHARS: usize = 92;

fn lines_per_page() -> usize {
    ((PAGE_HEIGHT_MM - 2.0 * MARGIN_MM) / (LEADING_PT * PT_TO_MM)).floor() as usize
}

/// Builtin fonts only cover Latin-1; swap common typography for ASCII and drop the rest
fn to_latin1(line: &str) -> String {
    line.chars()
        .filter_map(|c| match c {
            '•' | '●' | '▪' | '■' => Some('-'),
            '–' | '—' => Some('-'),
            '‘' | '’' => Some('\''),
            '“' | '”' => Some('"'),
            '\t' => Some(' '),
            c if (c as u32) < 256 && !c.is_control() => Some(c),
            _ => Some('?'),
        })
        .collect()
}

/// Break a line on whitespace, keeping its indentation on continuation lines
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if line.chars().count() <= width {
        return vec![line.to_string()];
    }

    let indent: String = line.chars().take_while(|c| c.is_whitespace()).collect();
    let mut wrapped = Vec::new();
    let mut current = indent.clone();

    for word in line.split_whitespace() {
        let needed = if current.trim().is_empty() {
            word.chars().count()
        } else {
            word.chars().count() + 1
        };

        if current.chars().count() + needed > width && !current.trim().is_empty() {
            wrapped.push(std::mem::replace(&mut current, indent.clone()));
        }

        if !current.trim().is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.trim().is_empty() {
        wrapped.push(current);
    }
    wrapped
}

/// Write `text` as a preformatted A4 document and return the written path
pub fn render_resume_pdf(text: &str, path: &Path) -> Result<PathBuf> {
    let (doc, first_page, first_layer) =
        PdfDocument::new("Optimized Resume", Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ResumeRefinerError::PdfRendering(format!("Failed to load font: {}", e)))?;

    let lines: Vec<String> = text
        .lines()
        .flat_map(|line| wrap_line(&to_latin1(line), MAX_LINE_CHARS))
        .collect();

    let per_page = lines_per_page();
    let leading_mm = LEADING_PT * PT_TO_MM;
    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut pages = 1;

    for (i, line) in lines.iter().enumerate() {
        let row = i % per_page;
        if row == 0 && i > 0 {
            let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            pages += 1;
        }
        if line.trim().is_empty() {
            continue;
        }
        let y = PAGE_HEIGHT_MM - MARGIN_MM - FONT_SIZE_PT * PT_TO_MM - row as f32 * leading_mm;
        layer.use_text(line.as_str(), FONT_SIZE_PT, Mm(MARGIN_MM), Mm(y), &font);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| ResumeRefinerError::PdfRendering(format!("Failed to save PDF: {}", e)))?;

    info!("Wrote {} page(s) to {}", pages, path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_wrap_keeps_short_lines() {
        assert_eq!(wrap_line("SKILLS", 10), vec!["SKILLS"]);
        assert_eq!(wrap_line("", 10), vec![""]);
    }

    #[test]
    fn test_wrap_breaks_on_words_with_indent() {
        let wrapped = wrap_line("  - built many reliable services", 16);
        assert_eq!(wrapped, vec!["  - built many", "  reliable", "  services"]);
        assert!(wrapped.iter().all(|l| l.chars().count() <= 16));
    }

    #[test]
    fn test_latin1_mapping() {
        assert_eq!(to_latin1("• Led “core” team – café 🚀"), "- Led \"core\" team - café ?");
    }

    #[test]
    fn test_render_writes_pdf() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("resume.pdf");
        let text = (0..150)
            .map(|i| format!("Line {} of a long resume with enough words to matter", i))
            .collect::<Vec<_>>()
            .join("\n");

        let written = render_resume_pdf(&text, &path).unwrap();
        let bytes = std::fs::read(&written).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
