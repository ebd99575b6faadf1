//! Path templates with `{distance}`, `{row}` and `{col}` placeholders

use crate::source::error::TemplateError;
use std::fmt;

/// Placeholder names understood by [`PathTemplate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// Distance category label
    Distance,
    /// Row key
    Row,
    /// Column key
    Col,
}

impl Placeholder {
    /// Name as written between braces
    pub const fn name(self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Row => "row",
            Self::Col => "col",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "distance" => Some(Self::Distance),
            "row" => Some(Self::Row),
            "col" => Some(Self::Col),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(Placeholder),
}

/// Parsed path template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse a template string
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = raw;

        while let Some(open) = rest.find('{') {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| TemplateError::Unclosed(raw.to_string()))?;
            let name = &after[..close];
            let slot = Placeholder::from_name(name).ok_or_else(|| {
                TemplateError::UnknownPlaceholder(name.to_string(), raw.to_string())
            })?;
            segments.push(Segment::Slot(slot));
            rest = &after[close + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// True when the template uses `placeholder`
    pub fn contains(&self, placeholder: Placeholder) -> bool {
        self.segments.contains(&Segment::Slot(placeholder))
    }

    /// Fail unless every placeholder in `required` is present
    pub fn require(&self, required: &[Placeholder]) -> Result<(), TemplateError> {
        if let Some(missing) = required.iter().find(|p| !self.contains(**p)) {
            return Err(TemplateError::MissingPlaceholder {
                template: self.raw.clone(),
                placeholder: missing.name(),
            });
        }
        Ok(())
    }

    /// Fail if any placeholder in `forbidden` is present
    pub fn forbid(&self, forbidden: &[Placeholder]) -> Result<(), TemplateError> {
        if let Some(found) = forbidden.iter().find(|p| self.contains(**p)) {
            return Err(TemplateError::UnexpectedPlaceholder {
                template: self.raw.clone(),
                placeholder: found.name(),
            });
        }
        Ok(())
    }

    /// `{distance}/hep_{distance}_{row}_{col}.txt`, built without parsing
    pub(crate) fn per_pair_default() -> Self {
        let segments = vec![
            Segment::Slot(Placeholder::Distance),
            Segment::Literal("/hep_".to_string()),
            Segment::Slot(Placeholder::Distance),
            Segment::Literal("_".to_string()),
            Segment::Slot(Placeholder::Row),
            Segment::Literal("_".to_string()),
            Segment::Slot(Placeholder::Col),
            Segment::Literal(".txt".to_string()),
        ];
        Self {
            raw: "{distance}/hep_{distance}_{row}_{col}.txt".to_string(),
            segments,
        }
    }

    /// Substitute placeholders
    pub fn render(&self, distance: &str, row: &str, col: &str) -> String {
        let mut out = String::with_capacity(self.raw.len() + row.len() + col.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(Placeholder::Distance) => out.push_str(distance),
                Segment::Slot(Placeholder::Row) => out.push_str(row),
                Segment::Slot(Placeholder::Col) => out.push_str(col),
            }
        }
        out
    }

    /// Template text as given
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for PathTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_default_layout() {
        let t = PathTemplate::parse("{distance}/hep_{distance}_{row}_{col}.txt").unwrap();
        assert_eq!(
            t.render("intra.short", "ADNP", "AFF4"),
            "intra.short/hep_intra.short_ADNP_AFF4.txt"
        );
        assert!(t.contains(Placeholder::Row));
        assert!(t.require(&[Placeholder::Row, Placeholder::Col]).is_ok());
    }

    #[test]
    fn test_literal_only() {
        let t = PathTemplate::parse("fixed.bin").unwrap();
        assert_eq!(t.render("d", "r", "c"), "fixed.bin");
        assert_eq!(
            t.require(&[Placeholder::Distance]).unwrap_err(),
            TemplateError::MissingPlaceholder {
                template: "fixed.bin".to_string(),
                placeholder: "distance"
            }
        );
    }

    #[test]
    fn test_forbid() {
        let t = PathTemplate::parse("out_{row}.bin").unwrap();
        assert!(matches!(
            t.forbid(&[Placeholder::Row, Placeholder::Col]),
            Err(TemplateError::UnexpectedPlaceholder {
                placeholder: "row",
                ..
            })
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            PathTemplate::parse("a/{rowz}.txt"),
            Err(TemplateError::UnknownPlaceholder(name, _)) if name == "rowz"
        ));
        assert!(matches!(
            PathTemplate::parse("a/{row"),
            Err(TemplateError::Unclosed(_))
        ));
    }
}
