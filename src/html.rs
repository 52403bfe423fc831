// ABOUTME: HTML document generation for the slidecraft application
// ABOUTME: Assembles a deck into one self-contained, navigable presentation file

use crate::charts::{format_number, ChartCanvas};
use crate::markup::Element;
use crate::model::Deck;
use crate::render::{slide_node, RenderContext, RenderMode};
use crate::themes::ThemeStyle;
use log::info;

pub const WATERMARK_TEXT: &str = "Made with Slidecraft";
pub const WATERMARK_URL: &str = "https://slidecraft.app";

/// Options that vary per export rather than per theme.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Whether the attribution mark is shown (unlicensed exports).
    pub watermark: bool,
    pub canvas: ChartCanvas,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            watermark: true,
            canvas: ChartCanvas::default(),
        }
    }
}

/// Render the whole deck as a standalone HTML document.
///
/// The deck is only read. Slides that fail to match a known type are drawn
/// with the bullets layout rather than dropped.
pub fn render_document(deck: &Deck, style: &ThemeStyle, options: &ExportOptions) -> String {
    info!(
        "Rendering '{}' ({} slides, watermark: {})",
        deck.name,
        deck.len(),
        options.watermark
    );

    let ctx = RenderContext {
        mode: RenderMode::Present,
        canvas: &options.canvas,
        palette: &style.palette,
        company: &deck.company,
    };
    let total = deck.len();

    let mut html_doc = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html_doc.push_str("<meta charset=\"UTF-8\">\n");
    html_doc.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html_doc.push_str(&Element::new("title").text(deck.name.clone()).to_html());
    html_doc.push('\n');
    html_doc.push_str("<style>\n");
    html_doc.push_str(&theme_variables(deck, style));
    html_doc.push_str(BASE_CSS);
    html_doc.push_str("</style>\n");
    for css in &style.extra_css {
        html_doc.push_str(css);
        html_doc.push('\n');
    }
    html_doc.push_str("</head>\n<body>\n");

    html_doc.push_str(&progress(total).to_html());
    html_doc.push('\n');

    html_doc.push_str("<main class=\"deck\">\n");
    for (index, slide) in deck.slides.iter().enumerate() {
        html_doc.push_str(&slide_node(slide, index, &ctx).to_html());
        html_doc.push('\n');
    }
    html_doc.push_str("</main>\n");

    html_doc.push_str(&navigation(total).to_html());
    html_doc.push('\n');
    html_doc.push_str(&counter(total).to_html());
    html_doc.push('\n');

    if options.watermark {
        html_doc.push_str(&watermark().to_html());
        html_doc.push('\n');
    }

    html_doc.push_str("<script>\n");
    html_doc.push_str(NAVIGATION_JS);
    html_doc.push_str("</script>\n");
    html_doc.push_str("</body>\n</html>\n");

    html_doc
}

/// Width of the progress bar for a 0-based slide index, in percent.
pub fn progress_percent(index: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (index + 1) as f64 / total as f64 * 100.0
    }
}

/// The "current / total" counter text for a 0-based slide index.
pub fn counter_text(index: usize, total: usize) -> String {
    format!("{} / {}", index + 1, total)
}

fn progress(total: usize) -> Element {
    Element::new("div").class("progress").child(
        Element::new("div")
            .class("progress-bar")
            .attr("id", "progress-bar")
            .attr("style", format!("width: {}%", format_number(progress_percent(0, total)))),
    )
}

fn counter(total: usize) -> Element {
    let text = counter_text(0, total);
    Element::new("div")
        .class("counter")
        .attr("id", "counter")
        .attr("aria-live", "polite")
        .text(text)
}

fn navigation(total: usize) -> Element {
    Element::new("nav")
        .class("nav-dots")
        .attr("aria-label", "Slides")
        .children((0..total).map(|index| {
            Element::new("button")
                .class(if index == 0 { "nav-dot active" } else { "nav-dot" })
                .attr("type", "button")
                .attr("data-target", index.to_string())
                .attr("aria-label", format!("Go to slide {}", index + 1))
        }))
}

/// Attribution mark; styled inline so page CSS cannot hide it.
fn watermark() -> Element {
    Element::new("a")
        .class("made-with")
        .attr("id", "made-with")
        .attr("href", WATERMARK_URL)
        .attr(
            "style",
            "position:fixed !important;bottom:16px !important;left:16px !important;\
             display:block !important;visibility:visible !important;opacity:1 !important;\
             z-index:2147483647 !important;padding:6px 12px;border-radius:999px;\
             background:rgba(0,0,0,0.75);color:#fff;font:12px/1.4 system-ui,sans-serif;\
             text-decoration:none;",
        )
        .text(WATERMARK_TEXT)
}

fn theme_variables(deck: &Deck, style: &ThemeStyle) -> String {
    format!(
        ":root {{\n  --accent: {};\n  --bg: {};\n  --surface: {};\n  --text: {};\n  --muted: {};\n  --heading-font: {};\n  --body-font: {};\n}}\n",
        css_value(&deck.accent),
        css_value(&style.background),
        css_value(&style.surface),
        css_value(&style.text),
        css_value(&style.muted),
        css_value(&style.heading_font),
        css_value(&style.body_font),
    )
}

/// Keep user-provided values from closing the declaration or the style block.
fn css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>'))
        .collect()
}

const BASE_CSS: &str = r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
html { scroll-snap-type: y mandatory; scroll-behavior: smooth; }
body { background: var(--bg); color: var(--text); font-family: var(--body-font); }
h1, h2, h3 { font-family: var(--heading-font); }
.slide { height: 100vh; width: 100%; scroll-snap-align: start; display: flex; align-items: center; justify-content: center; padding: 6vh 8vw; }
.slide-inner { width: 100%; max-width: 1100px; animation: rise 0.6s ease both; }
.slide h1 { font-size: 4rem; line-height: 1.1; }
.slide h2 { font-size: 2.6rem; margin-bottom: 1.5rem; }
.badge { display: inline-block; background: var(--accent); color: var(--bg); padding: 4px 12px; border-radius: 999px; margin-bottom: 1rem; }
.subtitle { font-size: 1.5rem; color: var(--muted); margin-top: 1rem; }
.company { margin-top: 2rem; color: var(--muted); }
.bullets { list-style: none; font-size: 1.5rem; }
.bullet { padding: 0.4rem 0 0.4rem 1.5rem; position: relative; }
.bullet::before { content: ""; position: absolute; left: 0; top: 1rem; width: 8px; height: 8px; border-radius: 50%; background: var(--accent); }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 3rem; }
.metrics { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 2rem; }
.metric { background: var(--surface); border-radius: 16px; padding: 2rem; display: flex; flex-direction: column; }
.metric-number { font-size: 3rem; font-weight: 700; color: var(--accent); }
.metric-label { color: var(--muted); }
blockquote .quote { font-size: 2.4rem; font-style: italic; }
blockquote footer { margin-top: 1.5rem; color: var(--muted); }
.role::before { content: " · "; }
.data-table { width: 100%; border-collapse: collapse; font-size: 1.2rem; }
.data-table th { text-align: left; border-bottom: 3px solid var(--accent); padding: 0.6rem; }
.data-table td { border-bottom: 1px solid var(--surface); padding: 0.6rem; }
.chart svg { width: 100%; height: auto; max-height: 60vh; }
.chart-label { fill: var(--muted); font-size: 12px; }
.chart-axis { stroke: var(--muted); }
.chart-empty { fill: var(--muted); font-size: 18px; }
.image-text { display: grid; grid-template-columns: 1fr 1fr; gap: 3rem; align-items: center; }
.image-text img { width: 100%; border-radius: 16px; }
.image-placeholder { aspect-ratio: 4 / 3; border-radius: 16px; background: var(--surface); }
figcaption { color: var(--muted); margin-top: 0.5rem; }
.progress { position: fixed; top: 0; left: 0; right: 0; height: 4px; background: var(--surface); z-index: 10; }
.progress-bar { height: 100%; background: var(--accent); transition: width 0.3s ease; }
.counter { position: fixed; bottom: 16px; right: 16px; color: var(--muted); font-size: 0.9rem; z-index: 10; }
.nav-dots { position: fixed; right: 16px; top: 50%; transform: translateY(-50%); display: flex; flex-direction: column; gap: 8px; z-index: 10; }
.nav-dot { width: 10px; height: 10px; border-radius: 50%; border: 0; background: var(--muted); opacity: 0.4; cursor: pointer; }
.nav-dot.active { background: var(--accent); opacity: 1; }
@keyframes rise { from { opacity: 0; transform: translateY(24px); } to { opacity: 1; transform: none; } }
@media print {
  html { scroll-snap-type: none; scroll-behavior: auto; }
  .slide { height: auto; min-height: 0; page-break-after: always; break-after: page; scroll-snap-align: none; }
  .slide-inner { animation: none !important; opacity: 1 !important; transform: none !important; }
  .progress, .nav-dots, .counter { display: none; }
}
"#;

const NAVIGATION_JS: &str = r#"(function () {
  var slides = Array.prototype.slice.call(document.querySelectorAll('.slide'));
  var dots = Array.prototype.slice.call(document.querySelectorAll('.nav-dot'));
  var bar = document.getElementById('progress-bar');
  var counter = document.getElementById('counter');
  var total = slides.length;
  var current = 0;

  function update(index) {
    current = index;
    if (bar) bar.style.width = ((index + 1) / total * 100) + '%';
    if (counter) counter.textContent = (index + 1) + ' / ' + total;
    dots.forEach(function (dot, i) { dot.classList.toggle('active', i === index); });
  }

  function go(index) {
    if (index < 0 || index >= total) return;
    slides[index].scrollIntoView({ behavior: 'smooth' });
    update(index);
  }

  dots.forEach(function (dot) {
    dot.addEventListener('click', function () { go(parseInt(dot.getAttribute('data-target'), 10)); });
  });

  document.addEventListener('keydown', function (e) {
    if (['ArrowDown', 'ArrowRight', 'PageDown', ' '].indexOf(e.key) !== -1) { e.preventDefault(); go(current + 1); }
    else if (['ArrowUp', 'ArrowLeft', 'PageUp'].indexOf(e.key) !== -1) { e.preventDefault(); go(current - 1); }
    else if (e.key === 'Home') { e.preventDefault(); go(0); }
    else if (e.key === 'End') { e.preventDefault(); go(total - 1); }
  });

  var touchStart = null;
  document.addEventListener('touchstart', function (e) { touchStart = e.changedTouches[0].clientY; }, { passive: true });
  document.addEventListener('touchend', function (e) {
    if (touchStart === null) return;
    var delta = touchStart - e.changedTouches[0].clientY;
    touchStart = null;
    if (Math.abs(delta) < 50) return;
    go(delta > 0 ? current + 1 : current - 1);
  }, { passive: true });

  if ('IntersectionObserver' in window) {
    var observer = new IntersectionObserver(function (entries) {
      entries.forEach(function (entry) {
        if (entry.isIntersecting) update(parseInt(entry.target.getAttribute('data-index'), 10));
      });
    }, { threshold: 0.6 });
    slides.forEach(function (slide) { observer.observe(slide); });
  }

  var mark = document.getElementById('made-with');
  if (mark) {
    new MutationObserver(function () {
      if (!document.body.contains(mark)) document.body.appendChild(mark);
    }).observe(document.body, { childList: true });
  }

  if (total > 0) update(0);
})();
"#;
