//! Rendering of normalized attributes, as a sink would emit them.

pub mod primitives;
pub mod text;

use std::io::Write;

use serde::Serialize;
use serde::ser::SerializeMap;

use crate::Result;
use crate::value::Attr;

/// Renders attributes as a single logfmt line: `a=1 req.method=GET`.
pub fn to_text(attrs: &[Attr]) -> String {
    let mut w = text::TextWriter::new();
    for a in attrs {
        w.attr(a);
    }
    w.into_string()
}

struct Record<'a>(&'a [Attr]);

impl Serialize for Record<'_> {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for a in self.0 {
            map.serialize_entry(&a.key, &a.value)?;
        }
        map.end()
    }
}

/// Renders attributes as one JSON object, groups nested as objects.
pub fn to_json_string(attrs: &[Attr]) -> Result<String> {
    Ok(serde_json::to_string(&Record(attrs))?)
}

pub fn to_json_writer<W: Write>(mut writer: W, attrs: &[Attr]) -> Result<()> {
    serde_json::to_writer(&mut writer, &Record(attrs))?;
    writer.flush()?;
    Ok(())
}
