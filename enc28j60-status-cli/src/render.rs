//! Text and JSON presentation of decoded vectors
use std::io::{self, Write};

use enc28j60_status::{Classification, DecodeOutcome, FieldResult};
use serde_json::{Value, json};

/// A decoded input together with where it came from.
#[derive(Debug)]
pub struct Entry {
    /// The argument as given, or the log line it was found on
    pub source: String,
    pub outcome: DecodeOutcome,
}

impl Entry {
    pub fn new(source: impl Into<String>, outcome: DecodeOutcome) -> Entry {
        Entry {
            source: source.into(),
            outcome,
        }
    }

    fn to_json(&self) -> Value {
        match &self.outcome {
            Ok(vector) => json!({ "source": self.source, "vector": vector }),
            Err(err) => json!({ "source": self.source, "error": err.to_string() }),
        }
    }
}

fn verdict(classification: Classification) -> &'static str {
    match classification {
        Classification::Healthy => "ok",
        Classification::Error => "ERROR",
        Classification::Neutral => "",
    }
}

fn bit_range(field: &FieldResult) -> String {
    let bits = field.bits();
    if bits.start() == bits.end() {
        bits.start().to_string()
    } else {
        format!("{}-{}", bits.start(), bits.end())
    }
}

/// Writes one table per entry. With `describe`, every field is followed by its description.
pub fn write_text(out: &mut impl Write, entries: &[Entry], describe: bool) -> io::Result<()> {
    for (index, entry) in entries.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        let vector = match &entry.outcome {
            Ok(vector) => vector,
            Err(err) => {
                writeln!(out, "{}: {}", entry.source, err)?;
                continue;
            }
        };
        writeln!(out, "{}: {} ({})", entry.source, vector.kind(), vector.to_hex())?;
        writeln!(
            out,
            "  {:<6} {:<32} {:>6}  {}",
            "Bits", "Field", "Value", "Verdict"
        )?;
        for field in vector.fields() {
            writeln!(
                out,
                "  {:<6} {:<32} {:>6}  {}",
                bit_range(field),
                field.name(),
                field.formatted_value(),
                verdict(field.classification())
            )?;
            if describe {
                writeln!(out, "         {}", field.description())?;
            }
        }
    }
    Ok(())
}

/// Writes all entries as a single pretty-printed JSON array.
pub fn write_json(out: &mut impl Write, entries: &[Entry]) -> serde_json::Result<()> {
    let document = Value::Array(entries.iter().map(Entry::to_json).collect());
    serde_json::to_writer_pretty(&mut *out, &document)?;
    writeln!(out).map_err(serde_json::Error::io)
}
