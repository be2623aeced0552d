//! Rendering options and configuration.

/// Options for rendering a document summary.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Include YAML frontmatter with page count, confidence and heuristic fields
    pub include_frontmatter: bool,

    /// Include the full text
    pub include_text: bool,

    /// Include reconstructed tables
    pub include_tables: bool,

    /// Include extracted form fields
    pub include_form_fields: bool,

    /// How to render tables
    pub table_style: TableStyle,

    /// Escape special Markdown characters
    pub escape_special_chars: bool,

    /// Character to use for unordered list markers
    pub list_marker: char,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Enable or disable the full text section.
    pub fn with_text(mut self, include: bool) -> Self {
        self.include_text = include;
        self
    }

    /// Enable or disable the tables section.
    pub fn with_tables(mut self, include: bool) -> Self {
        self.include_tables = include;
        self
    }

    /// Enable or disable the form fields section.
    pub fn with_form_fields(mut self, include: bool) -> Self {
        self.include_form_fields = include;
        self
    }

    /// Set the table style.
    pub fn with_table_style(mut self, style: TableStyle) -> Self {
        self.table_style = style;
        self
    }

    /// Set the list marker character.
    pub fn with_list_marker(mut self, marker: char) -> Self {
        self.list_marker = marker;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_frontmatter: false,
            include_text: true,
            include_tables: true,
            include_form_fields: true,
            table_style: TableStyle::Markdown,
            escape_special_chars: true,
            list_marker: '-',
        }
    }
}

/// How tables are written into Markdown output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableStyle {
    /// GitHub-flavored pipe tables
    #[default]
    Markdown,
    /// HTML table tags, which survive ragged rows and multi-line cells
    Html,
}
