//! Value inspection for the command-line tool.
//!
//! Turns one command-line argument into a [`Report`] describing how it was
//! stored as a `BFloat16`: the bit pattern, its fields, its class, and what
//! the rounding did.

use crate::bf16::{BFloat16, Sign};
use crate::config::{Config, InputConfig};
use crate::status::Status;
use anyhow::Context;
use serde::Serialize;
use std::fmt;
use std::num::FpCategory;

/// Everything the inspector reports about one input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub input: String,
    pub bits: String,
    pub sign: Sign,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exponent_bits: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub significand_bits: Option<u16>,
    pub class: &'static str,
    pub value: String,
    pub widened: f32,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighbors: Option<Neighbors>,
}

/// The representable values on either side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbors {
    pub down: String,
    pub up: String,
}

/// Parse an argument into a value and the flags raised storing it.
///
/// With `hex_bit_patterns` on, `0x`-prefixed input is a raw bit pattern and
/// is taken as-is.
pub fn parse_input(text: &str, input: &InputConfig) -> anyhow::Result<(BFloat16, Status)> {
    if input.hex_bit_patterns {
        if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            let bits = u16::from_str_radix(hex, 16)
                .with_context(|| format!("{text:?} is not a 16-bit pattern"))?;
            return Ok((BFloat16::from_bits(bits), Status::empty()));
        }
    }
    let value: BFloat16 = text.parse()?;
    let status = text
        .parse::<f64>()
        .map(|wide| BFloat16::from_f64_with_status(wide).1)
        .unwrap_or_default();
    Ok((value, status))
}

fn class_name(value: BFloat16) -> &'static str {
    match value.classify() {
        FpCategory::Nan => "nan",
        FpCategory::Infinite => "infinite",
        FpCategory::Zero => "zero",
        FpCategory::Subnormal => "subnormal",
        FpCategory::Normal => "normal",
    }
}

/// Build the report for one argument.
pub fn inspect(text: &str, config: &Config) -> anyhow::Result<Report> {
    let (value, status) = parse_input(text, &config.input)?;
    let show_fields = config.output.show_fields;
    let neighbors = config.output.show_neighbors.then(|| Neighbors {
        down: value.next_down().to_string(),
        up: value.next_up().to_string(),
    });
    Ok(Report {
        input: text.to_owned(),
        bits: format!("{:#06x}", value.to_bits()),
        sign: value.sign(),
        exponent_bits: show_fields.then(|| value.exponent_bits()),
        significand_bits: show_fields.then(|| value.significand_bits()),
        class: class_name(value),
        value: value.to_string(),
        widened: value.to_f32(),
        status,
        neighbors,
    })
}

fn status_text(status: Status) -> String {
    if status.is_empty() {
        return "exact".to_owned();
    }
    status
        .iter_names()
        .map(|(name, _)| name.to_lowercase())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Human-readable rendering of a report.
pub fn render_text(report: &Report) -> String {
    report.to_string()
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} => {}", self.input, self.value)?;
        writeln!(f, "  bits        {}", self.bits)?;
        let sign = match self.sign {
            Sign::Plus => "+",
            Sign::Minus => "-",
        };
        writeln!(f, "  sign        {sign}")?;
        if let (Some(exponent), Some(significand)) = (self.exponent_bits, self.significand_bits) {
            writeln!(f, "  exponent    {exponent:#04x} ({exponent})")?;
            writeln!(f, "  significand {significand:#04x}")?;
        }
        writeln!(f, "  class       {}", self.class)?;
        writeln!(f, "  f32         {:?}", self.widened)?;
        writeln!(f, "  status      {}", status_text(self.status))?;
        if let Some(neighbors) = &self.neighbors {
            writeln!(f, "  neighbors   {} .. {}", neighbors.down, neighbors.up)?;
        }
        Ok(())
    }
}
