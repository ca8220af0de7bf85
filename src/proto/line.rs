//! Received protocol lines.
//!
//! Lines are split on single spaces with no quoting or escaping, so an empty
//! field appears wherever the server sent two consecutive spaces.

/// RPL_ISON numeric.
pub const RPL_ISON: &str = "303";
/// ERR_NICKNAMEINUSE numeric.
pub const ERR_NICKNAMEINUSE: &str = "433";

/// One received line, tokenized into space-separated fields.
#[derive(Debug, Clone)]
pub struct RawLine<'a> {
    text: &'a str,
    fields: Vec<&'a str>,
}

impl<'a> RawLine<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            fields: text.split(' ').collect(),
        }
    }

    /// The unsplit line.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Field `index` (zero-based), if present.
    pub fn field(&self, index: usize) -> Option<&'a str> {
        self.fields.get(index).copied()
    }

    /// Fields from `index` onward; empty when the line is shorter.
    pub fn fields_from(&self, index: usize) -> &[&'a str] {
        self.fields.get(index..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Nickname of the origin prefix (`:nick!user@host` -> `nick`).
    pub fn origin_nick(&self) -> Option<&'a str> {
        let prefix = self.field(0)?.strip_prefix(':')?;
        prefix.split('!').next().filter(|nick| !nick.is_empty())
    }
}
