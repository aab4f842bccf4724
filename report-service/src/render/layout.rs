//! Binds the named parameters and row source into the compiled layout,
//! producing the paginated in-memory document handed to the exporter.

use crate::error::ReportError;
use crate::render::params::{ProgramRow, RenderParameters};
use crate::render::template::{ReportTemplate, SectionSpec, TableSpec};

/// Gap below the title rule, and above every section heading.
const BAND_GAP: f32 = 10.0;
/// Horizontal padding reserved inside a table cell.
const CELL_PADDING: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

/// A positioned piece of text; `x`/`y` locate the baseline in page space
/// (origin bottom-left, units of 1/72 inch).
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub style: FontStyle,
    pub text: String,
}

/// A horizontal rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContent {
    pub runs: Vec<TextRun>,
    pub rules: Vec<Rule>,
}

/// The paginated document produced by a render, transient between fill
/// and export.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub page_width: f32,
    pub page_height: f32,
    pages: Vec<PageContent>,
}

impl RenderedDocument {
    pub fn pages(&self) -> &[PageContent] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All text in layout order, one run per line.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for page in &self.pages {
            for run in &page.runs {
                out.push_str(&run.text);
                out.push('\n');
            }
        }
        out
    }
}

struct LayoutBuilder<'a> {
    template: &'a ReportTemplate,
    finished: Vec<PageContent>,
    current: PageContent,
    y: f32,
}

impl<'a> LayoutBuilder<'a> {
    fn new(template: &'a ReportTemplate) -> Self {
        Self {
            template,
            finished: Vec::new(),
            current: PageContent::default(),
            y: template.page.height - template.page.margin,
        }
    }

    fn break_page(&mut self) {
        self.finished.push(std::mem::take(&mut self.current));
        self.y = self.template.page.height - self.template.page.margin;
    }

    /// Start a new page unless a band of `height` fits above the bottom
    /// margin. Returns whether a break happened.
    fn ensure_room(&mut self, height: f32) -> bool {
        if self.y - height < self.template.page.margin {
            self.break_page();
            true
        } else {
            false
        }
    }

    fn line_height(&self, size: f32) -> f32 {
        size * self.template.line_spacing
    }

    /// Emit one line of text at the left position `x`, advancing the
    /// cursor by the spaced line height.
    fn line(&mut self, x: f32, size: f32, style: FontStyle, text: String) {
        self.ensure_room(self.line_height(size));
        self.current.runs.push(TextRun {
            x,
            y: self.y - size,
            size,
            style,
            text,
        });
        self.y -= self.line_height(size);
    }

    fn title(&mut self) {
        let template = self.template;
        self.line(
            template.page.margin,
            template.title.size,
            FontStyle::Bold,
            template.title.text.clone(),
        );
        self.current.rules.push(Rule {
            x1: template.page.margin,
            x2: template.page.width - template.page.margin,
            y: self.y,
        });
        self.y -= BAND_GAP;
    }

    fn heading(&mut self, text: &str) {
        self.y -= BAND_GAP;
        self.line(
            self.template.page.margin,
            self.template.heading_size,
            FontStyle::Bold,
            text.to_string(),
        );
    }

    fn section(
        &mut self,
        section: &SectionSpec,
        params: &RenderParameters,
    ) -> Result<(), ReportError> {
        if let Some(heading) = &section.heading {
            self.heading(heading);
        }
        for field in &section.fields {
            let value = params.text(&field.param).ok_or_else(|| {
                ReportError::RenderFailure(format!(
                    "template binds unknown parameter '{}'",
                    field.param
                ))
            })?;
            self.line(
                self.template.page.margin,
                self.template.body_size,
                FontStyle::Regular,
                format!("{}: {}", field.label, value),
            );
        }
        Ok(())
    }

    fn table_row(&mut self, table: &TableSpec, style: FontStyle, cells: &[String]) {
        let size = self.template.body_size;
        if self.ensure_room(self.line_height(size)) && style == FontStyle::Regular {
            // Repeat the header band after a page break.
            self.table_header(table);
        }
        let mut x = self.template.page.margin;
        for (column, cell) in table.columns.iter().zip(cells) {
            self.current.runs.push(TextRun {
                x,
                y: self.y - size,
                size,
                style,
                text: fit_text(cell, column.width, size),
            });
            x += column.width;
        }
        self.y -= self.line_height(size);
    }

    fn table_header(&mut self, table: &TableSpec) {
        let headers: Vec<String> = table.columns.iter().map(|c| c.header.clone()).collect();
        self.table_row(table, FontStyle::Bold, &headers);
    }

    fn table(&mut self, table: &TableSpec, rows: &[ProgramRow]) -> Result<(), ReportError> {
        self.heading(&table.heading);
        self.table_header(table);
        for row in rows {
            let mut cells = Vec::with_capacity(table.columns.len());
            for column in &table.columns {
                let value = row.field(&column.field).ok_or_else(|| {
                    ReportError::RenderFailure(format!(
                        "table column binds unknown row field '{}'",
                        column.field
                    ))
                })?;
                cells.push(value.to_string());
            }
            self.table_row(table, FontStyle::Regular, &cells);
        }
        Ok(())
    }

    fn finish(mut self) -> RenderedDocument {
        self.finished.push(self.current);
        RenderedDocument {
            page_width: self.template.page.width,
            page_height: self.template.page.height,
            pages: self.finished,
        }
    }
}

/// Clip `text` to a column, assuming an average Helvetica glyph runs about
/// half the font size.
fn fit_text(text: &str, width: f32, size: f32) -> String {
    let capacity = (((width - CELL_PADDING) / (0.5 * size)).floor() as usize).max(1);
    if text.chars().count() <= capacity {
        return text.to_string();
    }
    let keep = capacity.saturating_sub(3).max(1);
    let mut clipped: String = text.chars().take(keep).collect();
    clipped.push_str("...");
    clipped
}

/// Bind `params` and `rows` into the layout, paginating top-down.
///
/// Deterministic for identical inputs. Any reference to a parameter or row
/// field the binder did not supply fails the render.
pub fn render(
    template: &ReportTemplate,
    params: &RenderParameters,
    rows: &[ProgramRow],
) -> Result<RenderedDocument, ReportError> {
    let mut layout = LayoutBuilder::new(template);

    layout.title();
    for section in &template.sections {
        layout.section(section, params)?;
    }

    let show_table = params.flag(&template.table.visible_when).ok_or_else(|| {
        ReportError::RenderFailure(format!(
            "template binds unknown flag parameter '{}'",
            template.table.visible_when
        ))
    })?;
    if show_table {
        layout.table(&template.table, rows)?;
    }

    Ok(layout.finish())
}
