//! Rendering seam between reports and the terminal.

/// Where a [`Report`] renders to.
///
/// The methods name the pieces a report is made of, not how they look;
/// the implementation owns the formatting. Tests swap in a capturing
/// implementation to assert on report structure.
pub trait Output {
    /// A section heading.
    fn section(&mut self, heading: &str);

    /// One file that was produced.
    fn added_item(&mut self, item: &str);

    /// One entry of a plain list.
    fn list_item(&mut self, item: &str);

    /// A labelled value.
    fn key_value(&mut self, key: &str, value: &str);

    /// A labelled horizontal rule.
    fn divider(&mut self, label: &str);

    /// Text passed through untouched, e.g. previewed file content.
    fn preformatted(&mut self, text: &str);

    /// A blank line.
    fn newline(&mut self);
}

/// Something a command can print through an [`Output`].
pub trait Report {
    fn render(&self, out: &mut dyn Output);
}

/// Renders reports to stdout.
#[derive(Default)]
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Output for TerminalOutput {
    fn section(&mut self, heading: &str) {
        println!("{}:", heading);
    }

    fn added_item(&mut self, item: &str) {
        println!("  + {}", item);
    }

    fn list_item(&mut self, item: &str) {
        println!("  - {}", item);
    }

    fn key_value(&mut self, key: &str, value: &str) {
        println!("{}: {}", key, value);
    }

    fn divider(&mut self, label: &str) {
        println!("── {} ──", label);
    }

    fn preformatted(&mut self, text: &str) {
        println!("{}", text);
    }

    fn newline(&mut self) {
        println!();
    }
}
