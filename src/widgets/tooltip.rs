use serde::Serialize;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TooltipLine {
    pub label: String,
    pub value: String,
}

/// Hover content of a mark as label/value rows.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Tooltip {
    pub lines: Vec<TooltipLine>,
}

impl Tooltip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(mut self, label: impl Into<String>, value: impl fmt::Display) -> Self {
        self.lines.push(TooltipLine {
            label: label.into(),
            value: value.to_string(),
        });
        self
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|l| l.label == label)
            .map(|l| l.value.as_str())
    }
}

impl fmt::Display for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", line.label, line.value)?;
        }
        Ok(())
    }
}
