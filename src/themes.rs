// ABOUTME: Theme catalog for the slidecraft application
// ABOUTME: Theme metadata, styling parameters and each theme's default deck

use crate::model::{
    BarChartSlide, BarPoint, BarSeries, BulletsSlide, Deck, ImageTextSlide, LineChartSlide,
    LinePoint, LineSeries, Metric, PieChartSlide, QuoteSlide, Segment, Slide, StatsSlide,
    TableSlide, TitleSlide, TwoColumnSlide,
};

/// Visual parameters a theme feeds into the rendered document.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeStyle {
    pub background: String,
    pub surface: String,
    pub text: String,
    pub muted: String,
    pub heading_font: String,
    pub body_font: String,
    /// Chart series colors, cycled by index.
    pub palette: Vec<String>,
    /// Additional stylesheet markup (`<style>` or `<link>`), already resolved.
    pub extra_css: Vec<String>,
}

impl Default for ThemeStyle {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            surface: "#f4f4f5".to_string(),
            text: "#18181b".to_string(),
            muted: "#71717a".to_string(),
            heading_font: "system-ui, -apple-system, 'Segoe UI', sans-serif".to_string(),
            body_font: "system-ui, -apple-system, 'Segoe UI', sans-serif".to_string(),
            palette: Vec::new(),
            extra_css: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub id: String,
    pub name: String,
    pub description: String,
    pub style: ThemeStyle,
    /// Template for new sessions; sessions always work on a clone.
    pub default_deck: Deck,
}

/// Registry of themes keyed by id, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ThemeCatalog {
    themes: Vec<Theme>,
}

impl ThemeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.register(theme);
        self
    }

    /// Add a theme, replacing any theme with the same id.
    pub fn register(&mut self, theme: Theme) {
        match self.themes.iter_mut().find(|t| t.id == theme.id) {
            Some(existing) => *existing = theme,
            None => self.themes.push(theme),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Theme> {
        self.themes.iter().find(|theme| theme.id == id)
    }

    pub fn themes(&self) -> impl Iterator<Item = &Theme> {
        self.themes.iter()
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// The themes shipped with slidecraft.
    pub fn builtin() -> Self {
        Self::new()
            .with_theme(minimal())
            .with_theme(corporate())
            .with_theme(midnight())
            .with_theme(startup())
    }
}

fn palette(colors: &[&str]) -> Vec<String> {
    colors.iter().map(|c| c.to_string()).collect()
}

fn title(title: &str, subtitle: Option<&str>, badge: Option<&str>) -> Slide {
    Slide::Title(TitleSlide {
        title: title.to_string(),
        subtitle: subtitle.map(str::to_string),
        badge: badge.map(str::to_string),
    })
}

fn bars(title: &str, series: Vec<BarSeries>) -> Slide {
    Slide::BarChart(BarChartSlide {
        title: title.to_string(),
        series,
    })
}

fn bar_series(name: &str, data: &[(&str, f64)]) -> BarSeries {
    BarSeries {
        name: name.to_string(),
        data: data
            .iter()
            .map(|(label, value)| BarPoint {
                label: label.to_string(),
                value: *value,
            })
            .collect(),
    }
}

fn lines(title: &str, series: Vec<LineSeries>) -> Slide {
    Slide::LineChart(LineChartSlide {
        title: title.to_string(),
        series,
    })
}

fn line_series(name: &str, data: &[(&str, f64)]) -> LineSeries {
    LineSeries {
        name: name.to_string(),
        data: data
            .iter()
            .map(|(x, y)| LinePoint {
                x: x.to_string(),
                y: *y,
            })
            .collect(),
    }
}

fn pie(title: &str, segments: &[(&str, f64)]) -> Slide {
    Slide::PieChart(PieChartSlide {
        title: title.to_string(),
        segments: segments
            .iter()
            .map(|(label, value)| Segment {
                label: label.to_string(),
                value: *value,
            })
            .collect(),
    })
}

fn stats(title: &str, metrics: &[(&str, &str)]) -> Slide {
    Slide::Stats(StatsSlide {
        title: title.to_string(),
        metrics: metrics
            .iter()
            .map(|(number, label)| Metric::new(number, label))
            .collect(),
    })
}

fn table(title: &str, rows: &[&[&str]]) -> Slide {
    Slide::Table(TableSlide {
        title: title.to_string(),
        rows: rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect(),
    })
}

fn minimal() -> Theme {
    Theme {
        id: "minimal".to_string(),
        name: "Minimal".to_string(),
        description: "Quiet typography on white, for talks that let content lead".to_string(),
        style: ThemeStyle {
            palette: palette(&["#18181b", "#71717a", "#a1a1aa", "#d4d4d8"]),
            ..ThemeStyle::default()
        },
        default_deck: Deck::new(
            "Minimal",
            "#18181b",
            "Your Company",
            vec![
                title("Simple Ideas", Some("Said clearly"), None),
                Slide::Bullets(BulletsSlide::new(
                    "Agenda",
                    &["Where we are", "Where we are going", "How we get there"],
                )),
                Slide::Quote(QuoteSlide::new(
                    "Simplicity is the ultimate sophistication.",
                    Some("Leonardo da Vinci"),
                )),
                Slide::ImageText(ImageTextSlide {
                    title: "The Product".to_string(),
                    content: "Fast to learn\nPleasant to use".to_string(),
                    image: None,
                    caption: Some("Screenshot goes here".to_string()),
                }),
            ],
        ),
    }
}

fn corporate() -> Theme {
    Theme {
        id: "corporate".to_string(),
        name: "Corporate".to_string(),
        description: "Navy and slate for board updates and quarterly reviews".to_string(),
        style: ThemeStyle {
            background: "#f8fafc".to_string(),
            surface: "#e2e8f0".to_string(),
            text: "#0f172a".to_string(),
            muted: "#475569".to_string(),
            heading_font: "Georgia, 'Times New Roman', serif".to_string(),
            palette: palette(&["#1e3a8a", "#0891b2", "#64748b", "#ca8a04"]),
            ..ThemeStyle::default()
        },
        default_deck: Deck::new(
            "Quarterly Review",
            "#1e3a8a",
            "Acme Corp",
            vec![
                title("Quarterly Business Review", Some("Q3 results and outlook"), Some("Confidential")),
                stats(
                    "Highlights",
                    &[("$4.2M", "Revenue"), ("18%", "Growth"), ("96%", "Retention")],
                ),
                bars(
                    "Revenue by Quarter",
                    vec![
                        bar_series("2023", &[("Q1", 2.1), ("Q2", 2.6), ("Q3", 3.0)]),
                        bar_series("2024", &[("Q1", 3.1), ("Q2", 3.7), ("Q3", 4.2)]),
                    ],
                ),
                table(
                    "Regional Summary",
                    &[
                        &["Region", "Revenue", "Change"],
                        &["North America", "$2.1M", "+12%"],
                        &["Europe", "$1.4M", "+24%"],
                        &["Asia Pacific", "$0.7M", "+31%"],
                    ],
                ),
                Slide::TwoColumn(TwoColumnSlide {
                    left_title: Some("Wins".to_string()),
                    right_title: Some("Risks".to_string()),
                    ..TwoColumnSlide::new(
                        "Wins and Risks",
                        &["Two enterprise renewals", "New EU partner"],
                        &["Hiring pace", "Currency exposure"],
                    )
                }),
            ],
        ),
    }
}

fn midnight() -> Theme {
    Theme {
        id: "midnight".to_string(),
        name: "Midnight".to_string(),
        description: "Dark canvas with neon accents for product launches".to_string(),
        style: ThemeStyle {
            background: "#0b1020".to_string(),
            surface: "#151b33".to_string(),
            text: "#e5e7eb".to_string(),
            muted: "#9ca3af".to_string(),
            palette: palette(&["#22d3ee", "#a855f7", "#f472b6", "#facc15"]),
            ..ThemeStyle::default()
        },
        default_deck: Deck::new(
            "Launch",
            "#22d3ee",
            "Nightshift Labs",
            vec![
                title("Introducing Nova", Some("The fastest way to ship"), Some("New")),
                lines(
                    "Weekly Active Users",
                    vec![
                        line_series("Beta", &[("W1", 120.0), ("W2", 340.0), ("W3", 610.0), ("W4", 980.0)]),
                        line_series("Launch", &[("W3", 150.0), ("W4", 520.0)]),
                    ],
                ),
                pie(
                    "Where Users Come From",
                    &[("Organic", 45.0), ("Referral", 30.0), ("Paid", 25.0)],
                ),
            ],
        ),
    }
}

fn startup() -> Theme {
    Theme {
        id: "startup".to_string(),
        name: "Startup".to_string(),
        description: "Bright gradients for pitch decks".to_string(),
        style: ThemeStyle {
            background: "#fffbf5".to_string(),
            surface: "#ffedd5".to_string(),
            text: "#1c1917".to_string(),
            muted: "#78716c".to_string(),
            palette: palette(&["#f97316", "#ec4899", "#8b5cf6"]),
            ..ThemeStyle::default()
        },
        default_deck: Deck::new(
            "Pitch",
            "#f97316",
            "Seedling Inc",
            vec![
                title("Seedling", Some("Gardening, automated"), Some("Seed Round")),
                Slide::Bullets(BulletsSlide::new(
                    "The Problem",
                    &["Plants die when people travel", "Existing timers are dumb"],
                )),
                Slide::Bullets(BulletsSlide::new(
                    "Our Solution",
                    &["Soil sensors", "Weather-aware watering", "One tap setup"],
                )),
                stats("Traction", &[("2,400", "Gardens"), ("4.8", "App rating")]),
                pie("Use of Funds", &[("Engineering", 50.0), ("Sales", 30.0), ("Operations", 20.0)]),
            ],
        ),
    }
}
