//! The mounted text widget.
//!
//! The page mounts either a plain text area or a richer line-based code
//! widget. Which one is chosen once, at startup, via [`mount`]; the session
//! layer only ever sees [`EditorAdapter`].

pub trait EditorAdapter {
    fn get_content(&self) -> String;
    fn set_content(&mut self, content: &str);
}

impl<T: EditorAdapter + ?Sized> EditorAdapter for Box<T> {
    fn get_content(&self) -> String {
        (**self).get_content()
    }

    fn set_content(&mut self, content: &str) {
        (**self).set_content(content)
    }
}

impl<T: EditorAdapter + ?Sized> EditorAdapter for &mut T {
    fn get_content(&self) -> String {
        (**self).get_content()
    }

    fn set_content(&mut self, content: &str) {
        (**self).set_content(content)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    PlainText,
    Rich,
}

/// Mounts the widget for `kind` holding `initial` content.
pub fn mount(kind: EditorKind, initial: &str) -> Box<dyn EditorAdapter> {
    match kind {
        EditorKind::PlainText => Box::new(PlainTextAdapter::new(initial)),
        EditorKind::Rich => Box::new(RichEditorAdapter::new(initial)),
    }
}

/// A text area: one flat string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlainTextAdapter {
    value: String,
}

impl PlainTextAdapter {
    pub fn new(initial: &str) -> Self {
        Self {
            value: initial.to_string(),
        }
    }
}

impl EditorAdapter for PlainTextAdapter {
    fn get_content(&self) -> String {
        self.value.clone()
    }

    fn set_content(&mut self, content: &str) {
        self.value = content.to_string();
    }
}

/// A code widget that keeps its document as lines plus a cursor.
///
/// Replacing the document moves the cursor to the end, the way code widgets
/// behave after a programmatic `setValue`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichEditorAdapter {
    lines: Vec<String>,
    cursor: (usize, usize),
}

impl RichEditorAdapter {
    pub fn new(initial: &str) -> Self {
        let mut editor = Self {
            lines: vec![String::new()],
            cursor: (0, 0),
        };
        editor.set_content(initial);
        editor
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Zero-based (line, column) of the cursor; column counts chars.
    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }
}

impl EditorAdapter for RichEditorAdapter {
    fn get_content(&self) -> String {
        self.lines.join("\n")
    }

    fn set_content(&mut self, content: &str) {
        // `split` keeps a trailing empty line, so "a\n" round-trips.
        self.lines = content.split('\n').map(str::to_string).collect();
        let last = self.lines.len() - 1;
        self.cursor = (last, self.lines[last].chars().count());
    }
}
