use geo_types::Geometry;
use geozero::wkt::WktStr;
use geozero::ToGeo;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::feature::Feature;
use crate::projection::{self, Projection};

/// Projections a WKT text is read from and the feature is produced in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadOptions {
    pub data_projection: Projection,
    pub feature_projection: Projection,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            data_projection: Projection::Epsg4326,
            feature_projection: Projection::Epsg3857,
        }
    }
}

impl ReadOptions {
    /// Build options from projection identifiers; missing ones keep their default.
    pub fn from_codes(data_projection: Option<&str>, feature_projection: Option<&str>) -> Result<Self> {
        let parse = |code: Option<&str>, fallback: Projection| -> Result<Projection> {
            code.map_or(Ok(fallback), str::parse)
        };
        let defaults = Self::default();
        Ok(Self {
            data_projection: parse(data_projection, defaults.data_projection)?,
            feature_projection: parse(feature_projection, defaults.feature_projection)?,
        })
    }
}

const GEOMETRY_TYPES: &[&str] = &[
    "POINT",
    "LINESTRING",
    "LINEARRING",
    "POLYGON",
    "MULTIPOINT",
    "MULTILINESTRING",
    "MULTIPOLYGON",
    "GEOMETRYCOLLECTION",
];

const DIMENSIONS: &[&str] = &["Z", "M", "ZM"];

#[derive(Debug, PartialEq)]
enum Token {
    Open,
    Close,
    Comma,
    Number(String),
    Word(String),
}

impl Token {
    fn is_word_in(&self, words: &[&str]) -> bool {
        matches!(self, Token::Word(w) if words.iter().any(|k| k.eq_ignore_ascii_case(w)))
    }
}

fn tokenize(wkt: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = wkt.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '(' => tokens.push(Token::Open),
            ')' => tokens.push(Token::Close),
            ',' => tokens.push(Token::Comma),
            c => {
                let mut text = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_whitespace() || matches!(next, '(' | ')' | ',') {
                        break;
                    }
                    text.push(next);
                    chars.next();
                }
                if c == '.' || c == '-' || c == '+' || c.is_ascii_digit() {
                    tokens.push(Token::Number(text));
                } else {
                    tokens.push(Token::Word(text));
                }
            }
        }
    }
    tokens
}

/// Rewrite WKT into the two-dimensional form the parser reads.
///
/// Z/M/ZM tags are dropped together with every ordinate past x and y. A bare
/// `POINT EMPTY` becomes `GEOMETRYCOLLECTION EMPTY`; empty points inside a
/// collection are left out. Anything else passes through unchanged so the
/// parser still reports malformed text.
fn flatten_wkt(wkt: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut tokens = tokenize(wkt).into_iter().peekable();
    let mut depth = 0usize;
    let mut ordinates = 0usize;
    let mut skip_comma = false;

    while let Some(token) = tokens.next() {
        match token {
            Token::Word(word) if GEOMETRY_TYPES.iter().any(|t| t.eq_ignore_ascii_case(&word)) => {
                if tokens.peek().map_or(false, |t| t.is_word_in(DIMENSIONS)) {
                    tokens.next();
                }
                let empty_point = word.eq_ignore_ascii_case("POINT")
                    && tokens.peek().map_or(false, |t| t.is_word_in(&["EMPTY"]));
                if !empty_point {
                    out.push(word);
                    continue;
                }
                tokens.next();
                if depth == 0 {
                    out.push("GEOMETRYCOLLECTION".to_string());
                    out.push("EMPTY".to_string());
                } else if out.last().map(String::as_str) == Some(",") {
                    out.pop();
                } else {
                    skip_comma = true;
                }
            }
            Token::Open => {
                depth += 1;
                ordinates = 0;
                out.push("(".to_string());
            }
            Token::Close => {
                depth = depth.saturating_sub(1);
                ordinates = 0;
                skip_comma = false;
                // a collection that only held empty points
                let n = out.len();
                if n >= 2 && out[n - 1] == "(" && out[n - 2].eq_ignore_ascii_case("GEOMETRYCOLLECTION") {
                    out.pop();
                    out.push("EMPTY".to_string());
                } else {
                    out.push(")".to_string());
                }
            }
            Token::Comma => {
                ordinates = 0;
                if skip_comma {
                    skip_comma = false;
                } else {
                    out.push(",".to_string());
                }
            }
            Token::Number(n) => {
                ordinates += 1;
                if ordinates <= 2 {
                    out.push(n);
                }
            }
            Token::Word(w) => out.push(w),
        }
    }
    out.join(" ")
}

/// Parse a WKT string without reprojecting it.
///
/// Only x and y are kept; Z and M values are discarded. An empty point reads
/// as an empty geometry collection.
pub fn read_geometry(wkt: &str) -> Result<Geometry<f64>> {
    let flat = flatten_wkt(wkt);
    Ok(WktStr(&flat).to_geo()?)
}

/// WKT reader that turns geometry text into map features.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WktFormat {
    options: ReadOptions,
}

impl WktFormat {
    pub fn new(options: ReadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    pub fn read_feature(&self, wkt: &str) -> Result<Feature> {
        let geometry = read_geometry(wkt)?;
        if self.options.data_projection == Projection::Epsg4326
            && self.options.feature_projection != Projection::Epsg4326
        {
            projection::check_latitudes(&geometry)?;
        }
        let projected = projection::transform(
            &geometry,
            self.options.data_projection,
            self.options.feature_projection,
        );
        Ok(Feature::new(projected))
    }

    /// Read features in input order. The first failure aborts the batch.
    pub fn read_features<I, S>(&self, wkts: I) -> Result<Vec<Feature>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        wkts.into_iter()
            .enumerate()
            .map(|(i, wkt)| self.read_feature(wkt.as_ref()).map_err(|e| e.at_index(i)))
            .collect()
    }
}
