// ABOUTME: Structural edit engine for the slidecraft application
// ABOUTME: Field paths and the named edit operations that mutate a deck

use crate::charts::format_number;
use crate::errors::Refusal;
use crate::model::{
    editing_bullets, join_bullets, presented_bullets, strip_bullet_marker, Deck, Metric, Slide,
    SlideKind,
};
use log::debug;

/// A bullet column inside a slide.
///
/// `Main` is the single `content` column of bullets, image-text and
/// unrecognized slides; `Left` and `Right` belong to two-column slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Main,
    Left,
    Right,
}

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Column::Main => "content",
            Column::Left => "left",
            Column::Right => "right",
        }
    }
}

/// Plain text fields that sit directly on a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Title,
    Subtitle,
    Badge,
    LeftTitle,
    RightTitle,
    Quote,
    Author,
    Role,
    Image,
    Caption,
}

impl TextField {
    pub fn name(self) -> &'static str {
        match self {
            TextField::Title => "title",
            TextField::Subtitle => "subtitle",
            TextField::Badge => "badge",
            TextField::LeftTitle => "left_title",
            TextField::RightTitle => "right_title",
            TextField::Quote => "quote",
            TextField::Author => "author",
            TextField::Role => "role",
            TextField::Image => "image",
            TextField::Caption => "caption",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricField {
    Number,
    Label,
}

/// Which half of a chart data point is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointField {
    /// The category label (bar), x value (line) or segment label (pie).
    Label,
    /// The numeric value; input that does not parse as a number is ignored.
    Value,
}

/// Address of one editable value inside a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Text(TextField),
    Bullet { column: Column, index: usize },
    Metric { index: usize, field: MetricField },
    Cell { row: usize, col: usize },
    SeriesName { series: usize },
    Point { series: usize, point: usize, field: PointField },
    Segment { index: usize, field: PointField },
}

impl FieldPath {
    /// Stable identifier used for `data-field` attributes on the editable surface.
    pub fn key(&self) -> String {
        match self {
            FieldPath::Text(field) => field.name().to_string(),
            FieldPath::Bullet { column, index } => format!("{}.{}", column.name(), index),
            FieldPath::Metric { index, field } => format!(
                "metrics.{}.{}",
                index,
                match field {
                    MetricField::Number => "number",
                    MetricField::Label => "label",
                }
            ),
            FieldPath::Cell { row, col } => format!("rows.{}.{}", row, col),
            FieldPath::SeriesName { series } => format!("series.{}.name", series),
            FieldPath::Point { series, point, field } => {
                format!("series.{}.data.{}.{}", series, point, point_field_name(*field))
            }
            FieldPath::Segment { index, field } => {
                format!("segments.{}.{}", index, point_field_name(*field))
            }
        }
    }
}

fn point_field_name(field: PointField) -> &'static str {
    match field {
        PointField::Label => "label",
        PointField::Value => "value",
    }
}

fn optional_field<'a>(slide: &'a mut Slide, field: TextField) -> Option<&'a mut Option<String>> {
    match (slide, field) {
        (Slide::Title(s), TextField::Subtitle) => Some(&mut s.subtitle),
        (Slide::Title(s), TextField::Badge) => Some(&mut s.badge),
        (Slide::TwoColumn(s), TextField::LeftTitle) => Some(&mut s.left_title),
        (Slide::TwoColumn(s), TextField::RightTitle) => Some(&mut s.right_title),
        (Slide::Quote(s), TextField::Author) => Some(&mut s.author),
        (Slide::Quote(s), TextField::Role) => Some(&mut s.role),
        (Slide::ImageText(s), TextField::Image) => Some(&mut s.image),
        (Slide::ImageText(s), TextField::Caption) => Some(&mut s.caption),
        _ => None,
    }
}

fn column_content(slide: &mut Slide, column: Column) -> Option<&mut String> {
    match (slide, column) {
        (Slide::Bullets(s), Column::Main) => Some(&mut s.content),
        (Slide::ImageText(s), Column::Main) => Some(&mut s.content),
        (Slide::Unrecognized(s), Column::Main) => Some(&mut s.content),
        (Slide::TwoColumn(s), Column::Left) => Some(&mut s.left),
        (Slide::TwoColumn(s), Column::Right) => Some(&mut s.right),
        _ => None,
    }
}

/// The column `add_bullet` appends to.
pub fn primary_column(slide: &Slide) -> Option<Column> {
    match slide {
        Slide::Bullets(_) | Slide::ImageText(_) | Slide::Unrecognized(_) => Some(Column::Main),
        Slide::TwoColumn(_) => Some(Column::Left),
        _ => None,
    }
}

/// Read the current text at `path`, if the slide has that field.
pub fn field_value(slide: &Slide, path: &FieldPath) -> Option<String> {
    match *path {
        FieldPath::Text(TextField::Title) => Some(slide.title().to_string()),
        FieldPath::Text(field) => text_value(slide, field),
        FieldPath::Bullet { column, index } => {
            column_text(slide, column).and_then(|content| editing_bullets(content).get(index).cloned())
        }
        FieldPath::Metric { index, field } => match slide {
            Slide::Stats(s) => s.metrics.get(index).map(|m| match field {
                MetricField::Number => m.number.clone(),
                MetricField::Label => m.label.clone(),
            }),
            _ => None,
        },
        FieldPath::Cell { row, col } => match slide {
            Slide::Table(s) => s.rows.get(row).and_then(|r| r.get(col)).cloned(),
            _ => None,
        },
        FieldPath::SeriesName { series } => match slide {
            Slide::BarChart(s) => s.series.get(series).map(|x| x.name.clone()),
            Slide::LineChart(s) => s.series.get(series).map(|x| x.name.clone()),
            _ => None,
        },
        FieldPath::Point { series, point, field } => match slide {
            Slide::BarChart(s) => s
                .series
                .get(series)
                .and_then(|x| x.data.get(point))
                .map(|p| match field {
                    PointField::Label => p.label.clone(),
                    PointField::Value => format_number(p.value),
                }),
            Slide::LineChart(s) => s
                .series
                .get(series)
                .and_then(|x| x.data.get(point))
                .map(|p| match field {
                    PointField::Label => p.x.clone(),
                    PointField::Value => format_number(p.y),
                }),
            _ => None,
        },
        FieldPath::Segment { index, field } => match slide {
            Slide::PieChart(s) => s.segments.get(index).map(|seg| match field {
                PointField::Label => seg.label.clone(),
                PointField::Value => format_number(seg.value),
            }),
            _ => None,
        },
    }
}

fn text_value(slide: &Slide, field: TextField) -> Option<String> {
    let value = match (slide, field) {
        (Slide::Quote(s), TextField::Quote) => return Some(s.quote.clone()),
        (Slide::Title(s), TextField::Subtitle) => &s.subtitle,
        (Slide::Title(s), TextField::Badge) => &s.badge,
        (Slide::TwoColumn(s), TextField::LeftTitle) => &s.left_title,
        (Slide::TwoColumn(s), TextField::RightTitle) => &s.right_title,
        (Slide::Quote(s), TextField::Author) => &s.author,
        (Slide::Quote(s), TextField::Role) => &s.role,
        (Slide::ImageText(s), TextField::Image) => &s.image,
        (Slide::ImageText(s), TextField::Caption) => &s.caption,
        _ => return None,
    };
    Some(value.clone().unwrap_or_default())
}

fn column_text(slide: &Slide, column: Column) -> Option<&str> {
    match (slide, column) {
        (Slide::TwoColumn(s), Column::Left) => Some(&s.left),
        (Slide::TwoColumn(s), Column::Right) => Some(&s.right),
        (other, Column::Main) => other.content(),
        _ => None,
    }
}

fn parse_value(value: &str) -> Option<f64> {
    value
        .trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn write_field(slide: &mut Slide, path: &FieldPath, value: &str) -> bool {
    match *path {
        FieldPath::Text(TextField::Title) => {
            *slide.title_mut() = value.to_string();
            true
        }
        FieldPath::Text(TextField::Quote) => match slide {
            Slide::Quote(s) => {
                s.quote = value.to_string();
                true
            }
            _ => false,
        },
        FieldPath::Text(field) => match optional_field(slide, field) {
            Some(slot) => {
                // An emptied optional field is stored as absent.
                *slot = if value.trim().is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
                true
            }
            None => false,
        },
        FieldPath::Bullet { column, index } => {
            let Some(content) = column_content(slide, column) else {
                return false;
            };
            let mut bullets = editing_bullets(content);
            let Some(bullet) = bullets.get_mut(index) else {
                return false;
            };
            *bullet = strip_bullet_marker(value).replace('\n', " ");
            *content = join_bullets(&bullets);
            true
        }
        FieldPath::Metric { index, field } => match slide {
            Slide::Stats(s) => match s.metrics.get_mut(index) {
                Some(metric) => {
                    match field {
                        MetricField::Number => metric.number = value.to_string(),
                        MetricField::Label => metric.label = value.to_string(),
                    }
                    true
                }
                None => false,
            },
            _ => false,
        },
        FieldPath::Cell { row, col } => match slide {
            Slide::Table(s) => match s.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
                Some(cell) => {
                    *cell = value.to_string();
                    true
                }
                None => false,
            },
            _ => false,
        },
        FieldPath::SeriesName { series } => {
            let name = match slide {
                Slide::BarChart(s) => s.series.get_mut(series).map(|x| &mut x.name),
                Slide::LineChart(s) => s.series.get_mut(series).map(|x| &mut x.name),
                _ => None,
            };
            match name {
                Some(name) => {
                    *name = value.to_string();
                    true
                }
                None => false,
            }
        }
        FieldPath::Point { series, point, field } => match slide {
            Slide::BarChart(s) => {
                let Some(p) = s.series.get_mut(series).and_then(|x| x.data.get_mut(point)) else {
                    return false;
                };
                match field {
                    PointField::Label => p.label = value.to_string(),
                    PointField::Value => match parse_value(value) {
                        Some(v) => p.value = v,
                        None => return false,
                    },
                }
                true
            }
            Slide::LineChart(s) => {
                let Some(p) = s.series.get_mut(series).and_then(|x| x.data.get_mut(point)) else {
                    return false;
                };
                match field {
                    PointField::Label => p.x = value.to_string(),
                    PointField::Value => match parse_value(value) {
                        Some(v) => p.y = v,
                        None => return false,
                    },
                }
                true
            }
            _ => false,
        },
        FieldPath::Segment { index, field } => match slide {
            Slide::PieChart(s) => {
                let Some(seg) = s.segments.get_mut(index) else {
                    return false;
                };
                match field {
                    PointField::Label => seg.label = value.to_string(),
                    PointField::Value => match parse_value(value) {
                        Some(v) => seg.value = v,
                        None => return false,
                    },
                }
                true
            }
            _ => false,
        },
    }
}

/// Carry-over rules for `change_slide_type`.
fn converted(old: &Slide, kind: SlideKind) -> Slide {
    let mut fresh = Slide::default_for(kind);
    *fresh.title_mut() = old.title().to_string();

    match (old, &mut fresh) {
        (Slide::Bullets(from), Slide::TwoColumn(to)) => {
            let (left, right) = split_in_half(&from.content);
            to.left = left;
            to.right = right;
        }
        (Slide::Bullets(from), Slide::Quote(to)) => {
            if let Some(first) = presented_bullets(&from.content).first() {
                to.quote = first.to_string();
            }
        }
        (_, Slide::Bullets(to)) => {
            to.content = match old.content() {
                Some(content) if !content.trim().is_empty() => content.to_string(),
                _ => old.title().to_string(),
            };
        }
        _ => {}
    }
    fresh
}

/// Split a bullet list by count; the left half gets the extra bullet.
fn split_in_half(content: &str) -> (String, String) {
    let bullets: Vec<String> = presented_bullets(content)
        .into_iter()
        .map(str::to_string)
        .collect();
    let middle = (bullets.len() + 1) / 2;
    (join_bullets(&bullets[..middle]), join_bullets(&bullets[middle..]))
}

impl Deck {
    /// Write `value` at `path`. Returns whether anything changed; paths that
    /// do not exist on the slide are ignored.
    pub fn set_field(&mut self, slide_index: usize, path: &FieldPath, value: &str) -> bool {
        match self.slides.get_mut(slide_index) {
            Some(slide) => {
                let written = write_field(slide, path, value);
                if !written {
                    debug!("Ignored write to {} on slide {}", path.key(), slide_index);
                }
                written
            }
            None => false,
        }
    }

    pub fn field(&self, slide_index: usize, path: &FieldPath) -> Option<String> {
        self.slides
            .get(slide_index)
            .and_then(|slide| field_value(slide, path))
    }

    /// Insert an empty bullet right after `index`, returning the new bullet's index.
    pub fn split_bullet_after(
        &mut self,
        slide_index: usize,
        column: Column,
        index: usize,
    ) -> Option<usize> {
        let content = self
            .slides
            .get_mut(slide_index)
            .and_then(|slide| column_content(slide, column))?;
        let mut bullets = editing_bullets(content);
        if index >= bullets.len() {
            return None;
        }
        bullets.insert(index + 1, String::new());
        *content = join_bullets(&bullets);
        Some(index + 1)
    }

    /// Remove the bullet at `index` and return the index that should take focus.
    ///
    /// Out-of-range addressing yields `Ok(None)`. Removing the only bullet
    /// of a column is refused.
    pub fn delete_bullet(
        &mut self,
        slide_index: usize,
        column: Column,
        index: usize,
    ) -> Result<Option<usize>, Refusal> {
        let Some(content) = self
            .slides
            .get_mut(slide_index)
            .and_then(|slide| column_content(slide, column))
        else {
            return Ok(None);
        };
        let mut bullets = editing_bullets(content);
        if index >= bullets.len() {
            return Ok(None);
        }
        if bullets.len() == 1 {
            return Err(Refusal::LastBullet);
        }
        bullets.remove(index);
        *content = join_bullets(&bullets);
        Ok(Some(index.saturating_sub(1)))
    }

    /// Append a bullet to the slide's primary column.
    pub fn add_bullet(&mut self, slide_index: usize) -> Option<usize> {
        let column = self.slides.get(slide_index).and_then(primary_column)?;
        self.add_bullet_to(slide_index, column)
    }

    pub fn add_bullet_to(&mut self, slide_index: usize, column: Column) -> Option<usize> {
        let content = self
            .slides
            .get_mut(slide_index)
            .and_then(|slide| column_content(slide, column))?;
        let mut bullets = editing_bullets(content);
        if bullets.len() == 1 && bullets[0].trim().is_empty() {
            bullets[0] = "New point".to_string();
        } else {
            bullets.push("New point".to_string());
        }
        *content = join_bullets(&bullets);
        Some(bullets.len() - 1)
    }

    pub fn add_metric(&mut self, slide_index: usize) -> Option<usize> {
        match self.slides.get_mut(slide_index) {
            Some(Slide::Stats(s)) => {
                s.metrics.push(Metric::new("0", "New metric"));
                Some(s.metrics.len() - 1)
            }
            _ => None,
        }
    }

    pub fn remove_metric(&mut self, slide_index: usize, index: usize) -> bool {
        match self.slides.get_mut(slide_index) {
            Some(Slide::Stats(s)) if index < s.metrics.len() => {
                s.metrics.remove(index);
                true
            }
            _ => false,
        }
    }

    /// Append a row as wide as the header row.
    pub fn add_table_row(&mut self, slide_index: usize) -> Option<usize> {
        match self.slides.get_mut(slide_index) {
            Some(Slide::Table(s)) => {
                let width = s.rows.first().map(Vec::len).unwrap_or(1).max(1);
                s.rows.push(vec![String::new(); width]);
                Some(s.rows.len() - 1)
            }
            _ => None,
        }
    }

    /// Append a column to every row; the header cell gets a placeholder name.
    pub fn add_table_column(&mut self, slide_index: usize) -> Option<usize> {
        match self.slides.get_mut(slide_index) {
            Some(Slide::Table(s)) => {
                if s.rows.is_empty() {
                    s.rows.push(Vec::new());
                }
                for (row, cells) in s.rows.iter_mut().enumerate() {
                    cells.push(if row == 0 {
                        "Column".to_string()
                    } else {
                        String::new()
                    });
                }
                s.rows.first().map(|header| header.len() - 1)
            }
            _ => None,
        }
    }

    /// Replace the slide with a fresh `kind`, carrying over what fits.
    pub fn change_slide_type(&mut self, slide_index: usize, kind: SlideKind) -> bool {
        let Some(slide) = self.slides.get_mut(slide_index) else {
            return false;
        };
        if slide.kind() == Some(kind) {
            return false;
        }
        *slide = converted(slide, kind);
        true
    }
}
