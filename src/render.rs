// ABOUTME: Slide rendering for the slidecraft application
// ABOUTME: Turns each slide variant into a markup tree, for presenting or editing

use crate::charts::{
    bar_geometry, format_number, line_geometry, pie_geometry, BarGeometry, ChartCanvas,
    ChartGeometry, LegendEntry, LineGeometry, NoData, Palette, PieGeometry,
};
use crate::edit::{Column, FieldPath, MetricField, PointField, TextField};
use crate::markup::{inline, Element, Node};
use crate::model::{
    editing_bullets, presented_bullets, BarChartSlide, ImageTextSlide,
    LineChartSlide, PieChartSlide, QuoteSlide, Slide, StatsSlide, TableSlide, TitleSlide,
    TwoColumnSlide,
};

/// Whether fields are rendered for presenting or as editable elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Present,
    Edit,
}

/// Everything a slide needs from outside itself.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub mode: RenderMode,
    pub canvas: &'a ChartCanvas,
    pub palette: &'a [String],
    pub company: &'a str,
}

impl<'a> RenderContext<'a> {
    fn editing(&self) -> bool {
        self.mode == RenderMode::Edit
    }
}

/// Render one slide as a `<section>` carrying its 0-based index.
pub fn slide_node(slide: &Slide, index: usize, ctx: &RenderContext) -> Element {
    let fields = Fields { slide: index, ctx };
    let body = match slide {
        Slide::Title(s) => title_body(s, &fields),
        Slide::Bullets(s) => bullets_body(&s.title, &s.content, &fields),
        Slide::TwoColumn(s) => two_column_body(s, &fields),
        Slide::Stats(s) => stats_body(s, &fields),
        Slide::Quote(s) => quote_body(s, &fields),
        Slide::Table(s) => table_body(s, &fields),
        Slide::BarChart(s) => bar_chart_body(s, &fields),
        Slide::LineChart(s) => line_chart_body(s, &fields),
        Slide::PieChart(s) => pie_chart_body(s, &fields),
        Slide::ImageText(s) => image_text_body(s, &fields),
        Slide::Unrecognized(s) => bullets_body(&s.title, &s.content, &fields),
    };

    let layout = match slide {
        Slide::Unrecognized(_) => "bullets",
        other => other.type_tag(),
    };

    Element::new("section")
        .class(format!("slide slide-{}", layout))
        .attr("id", format!("slide-{}", index))
        .attr("data-index", index.to_string())
        .attr("data-type", slide.type_tag())
        .child(Element::new("div").class("slide-inner").children(body))
}

/// Compact, non-editable rendering for the thumbnail strip.
pub fn thumbnail_node(slide: &Slide, index: usize, ctx: &RenderContext) -> Element {
    let present = RenderContext {
        mode: RenderMode::Present,
        ..ctx.clone()
    };
    Element::new("div")
        .class("thumbnail")
        .attr("data-target", index.to_string())
        .child(
            Element::new("span")
                .class("thumbnail-number")
                .text((index + 1).to_string()),
        )
        .child(slide_node(slide, index, &present))
}

/// Builds field elements, adding editing attributes when editing.
struct Fields<'a, 'b> {
    slide: usize,
    ctx: &'a RenderContext<'b>,
}

impl<'a, 'b> Fields<'a, 'b> {
    fn field(&self, tag: &'static str, class: &str, path: FieldPath, text: &str) -> Element {
        let element = Element::new(tag).class(class.to_string());
        if self.ctx.editing() {
            element
                .attr("contenteditable", "true")
                .attr("data-slide", self.slide.to_string())
                .attr("data-field", path.key())
                // Markers stay visible so the text read back on input keeps them.
                .text(text)
        } else {
            element.children(inline(text))
        }
    }

    fn title(&self, tag: &'static str, text: &str) -> Element {
        self.field(tag, "slide-title", FieldPath::Text(TextField::Title), text)
    }

    /// Optional fields are left out when presenting and absent.
    fn optional(
        &self,
        tag: &'static str,
        class: &str,
        field: TextField,
        value: &Option<String>,
    ) -> Option<Element> {
        match (value, self.ctx.editing()) {
            (Some(text), _) => Some(self.field(tag, class, FieldPath::Text(field), text)),
            (None, true) => Some(
                self.field(tag, class, FieldPath::Text(field), "")
                    .attr("data-placeholder", field.name()),
            ),
            (None, false) => None,
        }
    }

    fn bullet_list(&self, column: Column, content: &str) -> Element {
        let list = Element::new("ul")
            .class("bullets")
            .attr("data-column", column.name());
        if self.ctx.editing() {
            list.children(editing_bullets(content).iter().enumerate().map(|(index, text)| {
                self.field("li", "bullet", FieldPath::Bullet { column, index }, text)
            }))
        } else {
            list.children(
                presented_bullets(content)
                    .into_iter()
                    .map(|text| Element::new("li").class("bullet").children(inline(text))),
            )
        }
    }
}

fn title_body(s: &TitleSlide, f: &Fields) -> Vec<Node> {
    let mut body: Vec<Node> = Vec::new();
    body.extend(f.optional("span", "badge", TextField::Badge, &s.badge).map(Node::from));
    body.push(f.title("h1", &s.title).into());
    body.extend(
        f.optional("p", "subtitle", TextField::Subtitle, &s.subtitle)
            .map(Node::from),
    );
    if !f.ctx.company.is_empty() {
        body.push(Element::new("p").class("company").text(f.ctx.company).into());
    }
    body
}

fn bullets_body(title: &str, content: &str, f: &Fields) -> Vec<Node> {
    vec![
        f.title("h2", title).into(),
        f.bullet_list(Column::Main, content).into(),
    ]
}

fn two_column_body(s: &TwoColumnSlide, f: &Fields) -> Vec<Node> {
    let side = |heading: &Option<String>, field: TextField, column: Column, content: &str| {
        Element::new("div")
            .class("column")
            .children(f.optional("h3", "column-title", field, heading))
            .child(f.bullet_list(column, content))
    };
    vec![
        f.title("h2", &s.title).into(),
        Element::new("div")
            .class("columns")
            .child(side(&s.left_title, TextField::LeftTitle, Column::Left, &s.left))
            .child(side(&s.right_title, TextField::RightTitle, Column::Right, &s.right))
            .into(),
    ]
}

fn stats_body(s: &StatsSlide, f: &Fields) -> Vec<Node> {
    let metrics = s.metrics.iter().enumerate().map(|(index, metric)| {
        Element::new("div")
            .class("metric")
            .child(f.field(
                "span",
                "metric-number",
                FieldPath::Metric {
                    index,
                    field: MetricField::Number,
                },
                &metric.number,
            ))
            .child(f.field(
                "span",
                "metric-label",
                FieldPath::Metric {
                    index,
                    field: MetricField::Label,
                },
                &metric.label,
            ))
    });
    vec![
        f.title("h2", &s.title).into(),
        Element::new("div").class("metrics").children(metrics).into(),
    ]
}

fn quote_body(s: &QuoteSlide, f: &Fields) -> Vec<Node> {
    let mut body: Vec<Node> = Vec::new();
    if !s.title.is_empty() || f.ctx.editing() {
        body.push(f.title("h2", &s.title).into());
    }
    let cite = Element::new("footer")
        .children(f.optional("cite", "author", TextField::Author, &s.author))
        .children(f.optional("span", "role", TextField::Role, &s.role));
    body.push(
        Element::new("blockquote")
            .child(f.field("p", "quote", FieldPath::Text(TextField::Quote), &s.quote))
            .child(cite)
            .into(),
    );
    body
}

fn table_body(s: &TableSlide, f: &Fields) -> Vec<Node> {
    let cell = |tag: &'static str, row: usize, col: usize, text: &str| {
        f.field(tag, "cell", FieldPath::Cell { row, col }, text)
    };
    let mut table = Element::new("table").class("data-table");
    if let Some(header) = s.rows.first() {
        table = table.child(
            Element::new("thead").child(
                Element::new("tr").children(
                    header
                        .iter()
                        .enumerate()
                        .map(|(col, text)| cell("th", 0, col, text)),
                ),
            ),
        );
    }
    let body_rows = s.rows.iter().enumerate().skip(1).map(|(row, cells)| {
        Element::new("tr").children(
            cells
                .iter()
                .enumerate()
                .map(|(col, text)| cell("td", row, col, text)),
        )
    });
    table = table.child(Element::new("tbody").children(body_rows));
    vec![f.title("h2", &s.title).into(), table.into()]
}

fn image_text_body(s: &ImageTextSlide, f: &Fields) -> Vec<Node> {
    let picture = match &s.image {
        Some(src) => Element::new("img")
            .attr("src", src.clone())
            .attr("alt", s.caption.clone().unwrap_or_else(|| s.title.clone())),
        None => Element::new("div").class("image-placeholder"),
    };
    let figure = Element::new("figure")
        .child(picture)
        .children(f.optional("figcaption", "caption", TextField::Caption, &s.caption));
    let mut text = Element::new("div")
        .class("text")
        .child(f.title("h2", &s.title))
        .child(f.bullet_list(Column::Main, &s.content));
    if f.ctx.editing() {
        text = text.child(f.field(
            "p",
            "image-url",
            FieldPath::Text(TextField::Image),
            s.image.as_deref().unwrap_or_default(),
        ));
    }
    vec![Element::new("div")
        .class("image-text")
        .child(figure)
        .child(text)
        .into()]
}

fn chart_body(title: &str, geometry: ChartGeometry, data: Option<Element>, f: &Fields) -> Vec<Node> {
    let mut body: Vec<Node> = vec![
        f.title("h2", title).into(),
        Element::new("div")
            .class("chart")
            .child(chart_svg(&geometry, f.ctx.canvas))
            .into(),
    ];
    body.extend(data.map(Node::from));
    body
}

fn palette<'a>(f: &Fields<'_, 'a>) -> Palette<'a> {
    Palette::new(f.ctx.palette)
}

fn bar_chart_body(s: &BarChartSlide, f: &Fields) -> Vec<Node> {
    let geometry = bar_geometry(&s.series, f.ctx.canvas, &palette(f));
    let data = f.ctx.editing().then(|| {
        series_data_table(
            f,
            s.series.iter().map(|series| {
                (
                    series.name.as_str(),
                    series
                        .data
                        .iter()
                        .map(|p| (p.label.clone(), format_number(p.value)))
                        .collect::<Vec<_>>(),
                )
            }),
        )
    });
    chart_body(&s.title, geometry, data, f)
}

fn line_chart_body(s: &LineChartSlide, f: &Fields) -> Vec<Node> {
    let geometry = line_geometry(&s.series, f.ctx.canvas, &palette(f));
    let data = f.ctx.editing().then(|| {
        series_data_table(
            f,
            s.series.iter().map(|series| {
                (
                    series.name.as_str(),
                    series
                        .data
                        .iter()
                        .map(|p| (p.x.clone(), format_number(p.y)))
                        .collect::<Vec<_>>(),
                )
            }),
        )
    });
    chart_body(&s.title, geometry, data, f)
}

fn pie_chart_body(s: &PieChartSlide, f: &Fields) -> Vec<Node> {
    let geometry = pie_geometry(&s.segments, f.ctx.canvas, &palette(f));
    let data = f.ctx.editing().then(|| {
        Element::new("table")
            .class("chart-data")
            .children(s.segments.iter().enumerate().map(|(index, segment)| {
                Element::new("tr")
                    .child(f.field(
                        "td",
                        "cell",
                        FieldPath::Segment {
                            index,
                            field: PointField::Label,
                        },
                        &segment.label,
                    ))
                    .child(f.field(
                        "td",
                        "cell",
                        FieldPath::Segment {
                            index,
                            field: PointField::Value,
                        },
                        &format_number(segment.value),
                    ))
            }))
    });
    chart_body(&s.title, geometry, data, f)
}

/// Editable data grid shown under bar and line charts while editing.
fn series_data_table<'s, I>(f: &Fields, series: I) -> Element
where
    I: Iterator<Item = (&'s str, Vec<(String, String)>)>,
{
    let mut table = Element::new("table").class("chart-data");
    for (index, (name, points)) in series.enumerate() {
        table = table.child(
            Element::new("tr").child(f.field(
                "th",
                "series-name",
                FieldPath::SeriesName { series: index },
                name,
            )),
        );
        for (point, (label, value)) in points.iter().enumerate() {
            table = table.child(
                Element::new("tr")
                    .child(f.field(
                        "td",
                        "cell",
                        FieldPath::Point {
                            series: index,
                            point,
                            field: PointField::Label,
                        },
                        label,
                    ))
                    .child(f.field(
                        "td",
                        "cell",
                        FieldPath::Point {
                            series: index,
                            point,
                            field: PointField::Value,
                        },
                        value,
                    )),
            );
        }
    }
    table
}

/// Draw chart geometry as an inline SVG.
pub fn chart_svg(geometry: &ChartGeometry, canvas: &ChartCanvas) -> Element {
    let svg = Element::new("svg")
        .attr("xmlns", "http://www.w3.org/2000/svg")
        .attr(
            "viewBox",
            format!("0 0 {} {}", format_number(canvas.width), format_number(canvas.height)),
        )
        .attr("role", "img");
    match geometry {
        ChartGeometry::Bar(bar) => bar_svg(svg, bar, canvas),
        ChartGeometry::Line(line) => line_svg(svg, line, canvas),
        ChartGeometry::Pie(pie) => pie_svg(svg, pie),
        ChartGeometry::NoData(empty) => no_data_svg(svg, empty),
    }
}

fn label(x: f64, y: f64, anchor: &str, text: &str) -> Element {
    Element::new("text")
        .attr("x", format_number(x))
        .attr("y", format_number(y))
        .attr("text-anchor", anchor.to_string())
        .class("chart-label")
        .text(text)
}

fn axis(canvas: &ChartCanvas) -> Element {
    Element::new("line")
        .class("chart-axis")
        .attr("x1", format_number(canvas.plot_left()))
        .attr("y1", format_number(canvas.baseline()))
        .attr("x2", format_number(canvas.plot_left() + canvas.plot_width()))
        .attr("y2", format_number(canvas.baseline()))
}

fn legend_svg(entries: &[LegendEntry], x: f64, y: f64) -> Element {
    let mut group = Element::new("g").class("chart-legend");
    for (row, entry) in entries.iter().enumerate() {
        let top = y + row as f64 * 18.0;
        let text = match entry.percent {
            Some(percent) => format!("{} ({}%)", entry.label, format_number(percent)),
            None => entry.label.clone(),
        };
        group = group
            .child(
                Element::new("rect")
                    .attr("x", format_number(x))
                    .attr("y", format_number(top))
                    .attr("width", "10")
                    .attr("height", "10")
                    .attr("fill", entry.color.clone()),
            )
            .child(label(x + 16.0, top + 9.0, "start", &text));
    }
    group
}

fn bar_svg(svg: Element, bar: &BarGeometry, canvas: &ChartCanvas) -> Element {
    let rects = bar.bars.iter().map(|rect| {
        Element::new("rect")
            .class("chart-bar")
            .attr("x", format_number(rect.x))
            .attr("y", format_number(rect.y))
            .attr("width", format_number(rect.width))
            .attr("height", format_number(rect.height))
            .attr("fill", rect.color.clone())
            .child(Element::new("title").text(format!("{}: {}", rect.label, format_number(rect.value))))
    });
    svg.child(axis(canvas))
        .children(rects)
        .children(bar.x_labels.iter().map(|l| label(l.x, l.y, "middle", &l.text)))
        .children(bar.y_labels.iter().map(|l| label(l.x, l.y, "end", &l.text)))
        .child(legend_svg(&bar.legend, canvas.plot_left() + 8.0, canvas.plot_top()))
}

fn line_svg(svg: Element, line: &LineGeometry, canvas: &ChartCanvas) -> Element {
    let polylines = line.lines.iter().map(|polyline| {
        let points = polyline
            .points
            .iter()
            .map(|(x, y)| format!("{},{}", format_number(*x), format_number(*y)))
            .collect::<Vec<_>>()
            .join(" ");
        Element::new("polyline")
            .class("chart-line")
            .attr("points", points)
            .attr("fill", "none")
            .attr("stroke", polyline.color.clone())
            .attr("stroke-width", "3")
    });
    svg.child(axis(canvas))
        .children(polylines)
        .children(line.x_labels.iter().map(|l| label(l.x, l.y, "middle", &l.text)))
        .children(line.y_labels.iter().map(|l| label(l.x, l.y, "end", &l.text)))
        .child(legend_svg(&line.legend, canvas.plot_left() + 8.0, canvas.plot_top()))
}

fn pie_svg(svg: Element, pie: &PieGeometry) -> Element {
    let wedges = pie.wedges.iter().map(|wedge| {
        Element::new("path")
            .class("chart-wedge")
            .attr("d", wedge.path.clone())
            .attr("fill", wedge.color.clone())
            .child(Element::new("title").text(wedge.label.clone()))
    });
    svg.children(wedges).child(legend_svg(
        &pie.legend,
        pie.cx + pie.radius + 20.0,
        pie.cy - pie.radius,
    ))
}

fn no_data_svg(svg: Element, empty: &NoData) -> Element {
    svg.child(
        Element::new("text")
            .attr("x", format_number(empty.x))
            .attr("y", format_number(empty.y))
            .attr("text-anchor", "middle")
            .class("chart-empty")
            .text(empty.message.clone()),
    )
}
