// ABOUTME: Slide model for the slidecraft application
// ABOUTME: Typed slide variants, the deck container and bullet list derivation

use serde::{Deserialize, Serialize};
use std::fmt;

/// A presentation: ordered slides plus deck-level styling fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub name: String,
    pub accent: String,
    pub company: String,
    pub slides: Vec<Slide>,
}

impl Deck {
    pub fn new(name: &str, accent: &str, company: &str, slides: Vec<Slide>) -> Self {
        Self {
            name: name.to_string(),
            accent: accent.to_string(),
            company: company.to_string(),
            slides,
        }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// One slide. The `type` tag decides which fields exist.
///
/// Tags that are not known to this crate deserialize into
/// [`Slide::Unrecognized`] and are rendered like a bullets slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Slide {
    Title(TitleSlide),
    Bullets(BulletsSlide),
    TwoColumn(TwoColumnSlide),
    Stats(StatsSlide),
    Quote(QuoteSlide),
    Table(TableSlide),
    BarChart(BarChartSlide),
    LineChart(LineChartSlide),
    PieChart(PieChartSlide),
    ImageText(ImageTextSlide),
    #[serde(untagged)]
    Unrecognized(UnrecognizedSlide),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleSlide {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulletsSlide {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TwoColumnSlide {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_title: Option<String>,
    #[serde(default)]
    pub left: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_title: Option<String>,
    #[serde(default)]
    pub right: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub number: String,
    pub label: String,
}

impl Metric {
    pub fn new(number: &str, label: &str) -> Self {
        Self {
            number: number.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSlide {
    pub title: String,
    #[serde(default)]
    pub metrics: Vec<Metric>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteSlide {
    #[serde(default)]
    pub title: String,
    pub quote: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Row 0 is always the header row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSlide {
    pub title: String,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub name: String,
    #[serde(default)]
    pub data: Vec<BarPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarChartSlide {
    pub title: String,
    #[serde(default)]
    pub series: Vec<BarSeries>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    pub x: String,
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    #[serde(default)]
    pub data: Vec<LinePoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineChartSlide {
    pub title: String,
    #[serde(default)]
    pub series: Vec<LineSeries>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PieChartSlide {
    pub title: String,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageTextSlide {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// A slide whose `type` tag is not one of the known kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnrecognizedSlide {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// The known slide type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideKind {
    Title,
    Bullets,
    TwoColumn,
    Stats,
    Quote,
    Table,
    BarChart,
    LineChart,
    PieChart,
    ImageText,
}

impl SlideKind {
    pub const ALL: [SlideKind; 10] = [
        SlideKind::Title,
        SlideKind::Bullets,
        SlideKind::TwoColumn,
        SlideKind::Stats,
        SlideKind::Quote,
        SlideKind::Table,
        SlideKind::BarChart,
        SlideKind::LineChart,
        SlideKind::PieChart,
        SlideKind::ImageText,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            SlideKind::Title => "title",
            SlideKind::Bullets => "bullets",
            SlideKind::TwoColumn => "two-column",
            SlideKind::Stats => "stats",
            SlideKind::Quote => "quote",
            SlideKind::Table => "table",
            SlideKind::BarChart => "bar-chart",
            SlideKind::LineChart => "line-chart",
            SlideKind::PieChart => "pie-chart",
            SlideKind::ImageText => "image-text",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        SlideKind::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for SlideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for SlideKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        SlideKind::from_tag(s).ok_or_else(|| format!("unknown slide type: {}", s))
    }
}

impl Slide {
    /// The kind of this slide, or `None` for an unrecognized tag.
    pub fn kind(&self) -> Option<SlideKind> {
        Some(match self {
            Slide::Title(_) => SlideKind::Title,
            Slide::Bullets(_) => SlideKind::Bullets,
            Slide::TwoColumn(_) => SlideKind::TwoColumn,
            Slide::Stats(_) => SlideKind::Stats,
            Slide::Quote(_) => SlideKind::Quote,
            Slide::Table(_) => SlideKind::Table,
            Slide::BarChart(_) => SlideKind::BarChart,
            Slide::LineChart(_) => SlideKind::LineChart,
            Slide::PieChart(_) => SlideKind::PieChart,
            Slide::ImageText(_) => SlideKind::ImageText,
            Slide::Unrecognized(_) => return None,
        })
    }

    /// The raw type tag, including tags this crate does not know.
    pub fn type_tag(&self) -> &str {
        match self {
            Slide::Unrecognized(slide) => &slide.kind,
            other => other.kind().map(SlideKind::tag).unwrap_or("bullets"),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Slide::Title(s) => &s.title,
            Slide::Bullets(s) => &s.title,
            Slide::TwoColumn(s) => &s.title,
            Slide::Stats(s) => &s.title,
            Slide::Quote(s) => &s.title,
            Slide::Table(s) => &s.title,
            Slide::BarChart(s) => &s.title,
            Slide::LineChart(s) => &s.title,
            Slide::PieChart(s) => &s.title,
            Slide::ImageText(s) => &s.title,
            Slide::Unrecognized(s) => &s.title,
        }
    }

    pub fn title_mut(&mut self) -> &mut String {
        match self {
            Slide::Title(s) => &mut s.title,
            Slide::Bullets(s) => &mut s.title,
            Slide::TwoColumn(s) => &mut s.title,
            Slide::Stats(s) => &mut s.title,
            Slide::Quote(s) => &mut s.title,
            Slide::Table(s) => &mut s.title,
            Slide::BarChart(s) => &mut s.title,
            Slide::LineChart(s) => &mut s.title,
            Slide::PieChart(s) => &mut s.title,
            Slide::ImageText(s) => &mut s.title,
            Slide::Unrecognized(s) => &mut s.title,
        }
    }

    /// The single free-text `content` field, for the kinds that have one.
    pub fn content(&self) -> Option<&str> {
        match self {
            Slide::Bullets(s) => Some(&s.content),
            Slide::ImageText(s) => Some(&s.content),
            Slide::Unrecognized(s) => Some(&s.content),
            _ => None,
        }
    }

    /// A fresh slide of `kind` with placeholder content.
    pub fn default_for(kind: SlideKind) -> Slide {
        match kind {
            SlideKind::Title => Slide::Title(TitleSlide {
                title: "Presentation Title".to_string(),
                subtitle: Some("Add a subtitle".to_string()),
                badge: None,
            }),
            SlideKind::Bullets => Slide::Bullets(BulletsSlide {
                title: "Key Points".to_string(),
                content: "First point\nSecond point\nThird point".to_string(),
            }),
            SlideKind::TwoColumn => Slide::TwoColumn(TwoColumnSlide {
                title: "Comparison".to_string(),
                left_title: Some("Before".to_string()),
                left: "First point".to_string(),
                right_title: Some("After".to_string()),
                right: "First point".to_string(),
            }),
            SlideKind::Stats => Slide::Stats(StatsSlide {
                title: "By the Numbers".to_string(),
                metrics: vec![Metric::new("100+", "Customers"), Metric::new("99%", "Uptime")],
            }),
            SlideKind::Quote => Slide::Quote(QuoteSlide {
                title: String::new(),
                quote: "Add a memorable quote here.".to_string(),
                author: Some("Author".to_string()),
                role: None,
            }),
            SlideKind::Table => Slide::Table(TableSlide {
                title: "Overview".to_string(),
                rows: vec![
                    vec!["Item".to_string(), "Value".to_string()],
                    vec!["Row 1".to_string(), "-".to_string()],
                ],
            }),
            SlideKind::BarChart => Slide::BarChart(BarChartSlide {
                title: "Growth".to_string(),
                series: vec![BarSeries {
                    name: "Revenue".to_string(),
                    data: vec![
                        BarPoint { label: "Q1".to_string(), value: 10.0 },
                        BarPoint { label: "Q2".to_string(), value: 20.0 },
                        BarPoint { label: "Q3".to_string(), value: 30.0 },
                    ],
                }],
            }),
            SlideKind::LineChart => Slide::LineChart(LineChartSlide {
                title: "Trend".to_string(),
                series: vec![LineSeries {
                    name: "Users".to_string(),
                    data: vec![
                        LinePoint { x: "Jan".to_string(), y: 5.0 },
                        LinePoint { x: "Feb".to_string(), y: 12.0 },
                        LinePoint { x: "Mar".to_string(), y: 18.0 },
                    ],
                }],
            }),
            SlideKind::PieChart => Slide::PieChart(PieChartSlide {
                title: "Breakdown".to_string(),
                segments: vec![
                    Segment { label: "A".to_string(), value: 60.0 },
                    Segment { label: "B".to_string(), value: 40.0 },
                ],
            }),
            SlideKind::ImageText => Slide::ImageText(ImageTextSlide {
                title: "Feature".to_string(),
                content: "Describe the feature".to_string(),
                image: None,
                caption: None,
            }),
        }
    }
}

impl QuoteSlide {
    pub fn new(quote: &str, author: Option<&str>) -> Self {
        Self {
            title: String::new(),
            quote: quote.to_string(),
            author: author.map(str::to_string),
            role: None,
        }
    }
}

impl BulletsSlide {
    pub fn new(title: &str, bullets: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            content: bullets.join("\n"),
        }
    }
}

impl TwoColumnSlide {
    pub fn new(title: &str, left: &[&str], right: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            left_title: None,
            left: left.join("\n"),
            right_title: None,
            right: right.join("\n"),
        }
    }
}

/// Strip a leading "- " or "• " list marker.
pub fn strip_bullet_marker(line: &str) -> &str {
    let trimmed = line.trim_start();
    trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("• "))
        .unwrap_or(line)
}

/// The bullets shown when presenting: non-blank lines with markers removed.
pub fn presented_bullets(content: &str) -> Vec<&str> {
    content
        .split('\n')
        .map(|line| strip_bullet_marker(line).trim())
        .filter(|line| !line.is_empty())
        .collect()
}

/// The bullets shown while editing: every stored line, never empty.
pub fn editing_bullets(content: &str) -> Vec<String> {
    content
        .split('\n')
        .map(|line| strip_bullet_marker(line).to_string())
        .collect()
}

pub fn join_bullets(bullets: &[String]) -> String {
    bullets.join("\n")
}
