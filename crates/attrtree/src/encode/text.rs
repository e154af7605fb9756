use crate::encode::primitives;
use crate::value::{Attr, Value};

/// Builds one logfmt line; nested groups become dotted key paths.
pub struct TextWriter {
    out: String,
    prefix: String,
    scratch: String,
}

impl TextWriter {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            prefix: String::new(),
            scratch: String::new(),
        }
    }

    /// Writes one attribute. Empty groups produce nothing.
    pub fn attr(&mut self, attr: &Attr) {
        match &attr.value {
            Value::Group(members) => {
                let saved = self.prefix.len();
                self.prefix.push_str(&attr.key);
                self.prefix.push('.');
                for m in members {
                    self.attr(m);
                }
                self.prefix.truncate(saved);
            }
            Value::Scalar(s) => {
                let text = primitives::scalar_text(s);
                self.field(&attr.key, &text);
            }
            Value::Sentinel(s) => self.field(&attr.key, s.as_str()),
        }
    }

    fn field(&mut self, key: &str, value: &str) {
        if !self.out.is_empty() {
            self.out.push(' ');
        }
        self.scratch.clear();
        self.scratch.push_str(&self.prefix);
        self.scratch.push_str(key);
        primitives::push_text(&mut self.out, &self.scratch);
        self.out.push('=');
        primitives::push_text(&mut self.out, value);
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

impl Default for TextWriter {
    fn default() -> Self {
        Self::new()
    }
}
