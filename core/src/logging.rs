//! Field formatting for the audit log
//!
//! The stock fmt layer escapes control characters in every field, which turns
//! an alert prefix such as [`BELL`](crate::BELL) into inert text. Events may
//! carry a `ding` field; [`AuditFields`] writes it verbatim ahead of the
//! message and escapes control characters everywhere else.

use std::fmt::{self, Write};
use tracing::field::{Field, Visit};
use tracing_subscriber::field::RecordFields;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::FormatFields;

/// Name of the field written unescaped before the message
pub const DING_FIELD: &str = "ding";

/// `FormatFields` implementation for the shell's fmt layers
#[derive(Debug, Default, Clone, Copy)]
pub struct AuditFields;

impl<'writer> FormatFields<'writer> for AuditFields {
    fn format_fields<R: RecordFields>(&self, mut writer: Writer<'writer>, fields: R) -> fmt::Result {
        let mut visitor = AuditVisitor::default();
        fields.record(&mut visitor);

        if let Some(ding) = &visitor.ding {
            writer.write_str(ding)?;
        }

        let mut first = true;
        if let Some(message) = &visitor.message {
            write_escaped(&mut writer, message)?;
            first = false;
        }
        for (name, value) in &visitor.fields {
            if !first {
                writer.write_char(' ')?;
            }
            first = false;
            write!(writer, "{}=", name)?;
            write_escaped(&mut writer, value)?;
        }
        Ok(())
    }
}

#[derive(Default)]
struct AuditVisitor {
    ding: Option<String>,
    message: Option<String>,
    fields: Vec<(&'static str, String)>,
}

impl Visit for AuditVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == DING_FIELD {
            self.ding = Some(value.to_string());
        } else {
            self.record_debug(field, &value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = Some(format!("{:?}", value)),
            DING_FIELD => self.ding = Some(format!("{:?}", value)),
            name => self.fields.push((name, format!("{:?}", value))),
        }
    }
}

fn write_escaped(writer: &mut Writer<'_>, s: &str) -> fmt::Result {
    for c in s.chars() {
        if c.is_control() {
            write!(writer, "{}", c.escape_default())?;
        } else {
            writer.write_char(c)?;
        }
    }
    Ok(())
}
