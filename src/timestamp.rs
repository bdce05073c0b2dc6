/*!
 * Declarative timestamp grammar.
 *
 * A format is a mix of literal characters and `%`-markers. Each marker reads a
 * run of decimal digits and contributes `digits * unit` to the total:
 *
 * | marker | unit         | width | strict |
 * |--------|--------------|-------|--------|
 * | `%M`   | milliseconds | 3     | yes    |
 * | `%C`   | centiseconds | 2     | yes    |
 * | `%s`   | seconds      | 2     | yes    |
 * | `%m`   | minutes      | 2     | no     |
 * | `%h`   | hours        | 2     | no     |
 *
 * Strict markers must read exactly their width; the others accept shorter runs,
 * down to zero digits. The whole input must be consumed by the whole format.
 */

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::errors::TimestampError;

/// Format of SRT timestamps, `HH:MM:SS,mmm`
pub const SRT_TIMESTAMP_FORMAT: &str = "%h:%m:%s,%M";

/// Format of ASS timestamps, `H:MM:SS.CC`
pub const ASS_TIMESTAMP_FORMAT: &str = "%h:%m:%s.%C";

/// Format of operator-entered timestamps, `MM:SS.CC`
pub const USER_TIMESTAMP_FORMAT: &str = "%m:%s.%C";

// @const: Compiled SRT grammar
pub static SRT_FORMAT: Lazy<TimestampFormat> =
    Lazy::new(|| TimestampFormat::compile(SRT_TIMESTAMP_FORMAT).unwrap());

// @const: Compiled ASS grammar
pub static ASS_FORMAT: Lazy<TimestampFormat> =
    Lazy::new(|| TimestampFormat::compile(ASS_TIMESTAMP_FORMAT).unwrap());

/// A typed digit marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Milliseconds,
    Centiseconds,
    Seconds,
    Minutes,
    Hours,
}

impl Marker {
    /// Marker for the key following `%`
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'M' => Some(Self::Milliseconds),
            'C' => Some(Self::Centiseconds),
            's' => Some(Self::Seconds),
            'm' => Some(Self::Minutes),
            'h' => Some(Self::Hours),
            _ => None,
        }
    }

    pub fn key(self) -> char {
        match self {
            Self::Milliseconds => 'M',
            Self::Centiseconds => 'C',
            Self::Seconds => 's',
            Self::Minutes => 'm',
            Self::Hours => 'h',
        }
    }

    /// Maximum number of digits read
    pub fn width(self) -> usize {
        match self {
            Self::Milliseconds => 3,
            _ => 2,
        }
    }

    /// Whether the digit run must be exactly `width()` long
    pub fn is_strict(self) -> bool {
        matches!(self, Self::Milliseconds | Self::Centiseconds | Self::Seconds)
    }

    fn unit_ms(self) -> u64 {
        match self {
            Self::Milliseconds => 1,
            Self::Centiseconds => 10,
            Self::Seconds => 1_000,
            Self::Minutes => 60_000,
            Self::Hours => 3_600_000,
        }
    }
}

/// One element of a compiled format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Literal(char),
    Marker(Marker),
}

/// A compiled timestamp format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampFormat {
    source: String,
    tokens: Vec<Token>,
}

impl TimestampFormat {
    /// Compile a format string such as `"%m:%s.%C"`
    pub fn compile(format: &str) -> Result<Self, TimestampError> {
        let mut tokens = Vec::with_capacity(format.len());
        let mut chars = format.chars();

        while let Some(c) = chars.next() {
            if c != '%' {
                tokens.push(Token::Literal(c));
                continue;
            }
            let key = chars.next().ok_or_else(|| TimestampError::DanglingMarker {
                format: format.to_string(),
            })?;
            let marker = Marker::from_key(key).ok_or_else(|| TimestampError::UnknownMarker {
                key,
                format: format.to_string(),
            })?;
            tokens.push(Token::Marker(marker));
        }

        Ok(Self {
            source: format.to_string(),
            tokens,
        })
    }

    /// The format string this was compiled from
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Parse `input` into a duration in seconds
    pub fn parse(&self, input: &str) -> Result<f64, TimestampError> {
        self.parse_millis(input).map(|ms| ms as f64 / 1000.0)
    }

    /// Parse `input` into a duration in whole milliseconds
    pub fn parse_millis(&self, input: &str) -> Result<u64, TimestampError> {
        let chars: Vec<char> = input.chars().collect();
        let mut pos = 0;
        let mut total = 0u64;

        for token in &self.tokens {
            if pos == chars.len() {
                return Err(TimestampError::InputExhausted {
                    input: input.to_string(),
                    format: self.source.clone(),
                });
            }

            match *token {
                Token::Literal(expected) => {
                    let found = chars[pos];
                    if found != expected {
                        return Err(TimestampError::LiteralMismatch {
                            expected,
                            found,
                            input: input.to_string(),
                            format: self.source.clone(),
                        });
                    }
                    pos += 1;
                }
                Token::Marker(marker) => {
                    let run = chars[pos..]
                        .iter()
                        .take(marker.width())
                        .take_while(|c| c.is_ascii_digit())
                        .count();
                    if marker.is_strict() && run != marker.width() {
                        return Err(TimestampError::DigitWidth {
                            marker: marker.key(),
                            expected: marker.width(),
                            found: run,
                            input: input.to_string(),
                            format: self.source.clone(),
                        });
                    }
                    let value = chars[pos..pos + run]
                        .iter()
                        .filter_map(|c| c.to_digit(10))
                        .fold(0u64, |acc, d| acc * 10 + u64::from(d));
                    total += value * marker.unit_ms();
                    pos += run;
                }
            }
        }

        if pos < chars.len() {
            return Err(TimestampError::TrailingInput {
                remaining: chars[pos..].iter().collect(),
                input: input.to_string(),
                format: self.source.clone(),
            });
        }

        Ok(total)
    }
}

impl FromStr for TimestampFormat {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parse `input` against `format`, returning seconds
pub fn parse_timestamp(input: &str, format: &str) -> Result<f64, TimestampError> {
    TimestampFormat::compile(format)?.parse(input)
}

/// Render seconds as `m:ss.ss`, rounded to centiseconds
pub fn format_timestamp(seconds: f64) -> String {
    let centis = (seconds.max(0.0) * 100.0).round() as u64;
    format!("{}:{:02}.{:02}", centis / 6000, (centis / 100) % 60, centis % 100)
}
