// ABOUTME: Synchronization bridge for the slidecraft application
// ABOUTME: Turns editable-surface events into edits and reports which views to refresh

use crate::charts::ChartCanvas;
use crate::debounce::{Debouncer, Pending};
use crate::edit::{primary_column, FieldPath};
use crate::errors::Result;
use crate::model::SlideKind;
use crate::render::{slide_node, thumbnail_node, RenderContext, RenderMode};
use crate::session::EditorSession;
use crate::themes::{ThemeCatalog, ThemeStyle};
use log::{debug, info, warn};
use std::time::{Duration, Instant};

/// Something that happened on the editable surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// A field gained focus.
    Focus { slide: usize, path: FieldPath },
    /// The visible text of a field changed.
    Input {
        slide: usize,
        path: FieldPath,
        text: String,
    },
    /// A field lost focus with this final text.
    Blur {
        slide: usize,
        path: FieldPath,
        text: String,
    },
    /// The line-break key was pressed inside a field.
    Enter {
        slide: usize,
        path: FieldPath,
        text: String,
    },
    /// Backspace was pressed inside a field.
    Backspace {
        slide: usize,
        path: FieldPath,
        text: String,
        caret_at_start: bool,
    },
    /// The floating toolbar toggled a format on the focused field.
    ToggleFormat(InlineFormat),
    /// A thumbnail or navigation control was clicked.
    SelectSlide(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineFormat {
    Bold,
    Italic,
}

impl InlineFormat {
    fn marker(self) -> &'static str {
        match self {
            InlineFormat::Bold => "**",
            InlineFormat::Italic => "*",
        }
    }

    /// Wrap `text` in this format's markers, or unwrap it if already wrapped.
    ///
    /// Bold and italic combine as `***text***`; each toggles independently.
    pub fn toggle(self, text: &str) -> String {
        let marker = self.marker();
        let leading = text.len() - text.trim_start_matches('*').len();
        let trailing = text.len() - text.trim_end_matches('*').len();
        let wrapped = text.len() >= marker.len() * 2
            && match self {
                InlineFormat::Bold => leading >= 2 && trailing >= 2,
                // Odd counts: "*a*" and "***a***" are italic, "**a**" is not.
                InlineFormat::Italic => leading % 2 == 1 && trailing % 2 == 1,
            };
        if wrapped {
            text[marker.len()..text.len() - marker.len()].to_string()
        } else {
            format!("{}{}{}", marker, text, marker)
        }
    }
}

/// A structural change requested through a control rather than typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AddSlide(SlideKind),
    RemoveSlide(usize),
    DuplicateSlide(usize),
    MoveSlide { from: usize, to: usize },
    ChangeSlideType { slide: usize, kind: SlideKind },
    AddBullet { slide: usize },
    AddMetric { slide: usize },
    RemoveMetric { slide: usize, index: usize },
    AddTableRow { slide: usize },
    AddTableColumn { slide: usize },
}

/// A change the editable surface must apply to stay in sync.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    /// Replace the editable rendering of one slide.
    RerenderSlide { index: usize, markup: String },
    /// Replace one thumbnail.
    RefreshThumbnail { index: usize, markup: String },
    /// Replace the whole thumbnail strip after slides moved or were removed.
    RebuildThumbnails(Vec<String>),
    /// Move focus to a field.
    Focus { slide: usize, path: FieldPath },
    /// Change which slide is shown.
    SelectSlide(usize),
    /// Tell the user an edit was refused.
    Refusal(String),
}

/// What the surface should do after an event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    /// Suppress the browser's default handling of the key.
    pub prevent_default: bool,
    pub updates: Vec<ViewUpdate>,
}

impl Response {
    fn pass() -> Self {
        Self::default()
    }

    fn handled(updates: Vec<ViewUpdate>) -> Self {
        Self {
            prevent_default: true,
            updates,
        }
    }
}

type FieldKey = (usize, FieldPath);

/// Keeps the editable surface and the session's deck consistent.
///
/// Plain typing is committed after the input goes idle; bullet splits and
/// deletions are applied at once because they change the set of editable
/// elements.
#[derive(Debug)]
pub struct Bridge {
    style: ThemeStyle,
    canvas: ChartCanvas,
    pending: Debouncer<FieldKey, String>,
    focused: Option<FieldKey>,
}

impl Bridge {
    pub fn new(style: ThemeStyle, canvas: ChartCanvas, delay: Duration) -> Self {
        Self {
            style,
            canvas,
            pending: Debouncer::new(delay),
            focused: None,
        }
    }

    /// The field the floating toolbar currently targets.
    pub fn focused(&self) -> Option<(usize, FieldPath)> {
        self.focused
    }

    pub fn has_pending_write(&self) -> bool {
        !self.pending.is_idle()
    }

    /// Switch themes: a new session replaces the old one and pending typing is dropped.
    pub fn select_theme(&mut self, catalog: &ThemeCatalog, theme_id: &str) -> Result<EditorSession> {
        let session = EditorSession::start(catalog, theme_id)?;
        if let Some(theme) = catalog.get(theme_id) {
            self.style = theme.style.clone();
        }
        self.pending.cancel();
        self.focused = None;
        Ok(session)
    }

    pub fn handle(
        &mut self,
        session: &mut EditorSession,
        event: SurfaceEvent,
        now: Instant,
    ) -> Response {
        match event {
            SurfaceEvent::Focus { slide, path } => {
                debug!("Focus on slide {} field {}", slide, path.key());
                self.focused = Some((slide, path));
                Response::pass()
            }
            SurfaceEvent::Input { slide, path, text } => {
                let mut updates = Vec::new();
                if let Some(displaced) = self.pending.schedule((slide, path), text, now) {
                    updates.extend(self.commit(session, displaced));
                }
                Response {
                    prevent_default: false,
                    updates,
                }
            }
            SurfaceEvent::Blur { slide, path, text } => {
                let mut updates = self.flush(session);
                updates.extend(self.write(session, slide, &path, &text));
                if self.focused == Some((slide, path)) {
                    self.focused = None;
                }
                Response {
                    prevent_default: false,
                    updates,
                }
            }
            SurfaceEvent::Enter { slide, path, text } => self.on_enter(session, slide, path, text),
            SurfaceEvent::Backspace {
                slide,
                path,
                text,
                caret_at_start,
            } => self.on_backspace(session, slide, path, &text, caret_at_start),
            SurfaceEvent::ToggleFormat(format) => self.on_toggle_format(session, format),
            SurfaceEvent::SelectSlide(index) => {
                let mut updates = self.flush(session);
                let selected = session.select_slide(index);
                self.focused = None;
                updates.push(ViewUpdate::SelectSlide(selected));
                updates.extend(self.rerender(session, selected));
                Response {
                    prevent_default: false,
                    updates,
                }
            }
        }
    }

    /// Commit a debounced write whose delay has elapsed.
    pub fn poll(&mut self, session: &mut EditorSession, now: Instant) -> Vec<ViewUpdate> {
        match self.pending.poll(now) {
            Some(pending) => self.commit(session, pending),
            None => Vec::new(),
        }
    }

    /// Commit any pending write right away.
    pub fn flush(&mut self, session: &mut EditorSession) -> Vec<ViewUpdate> {
        match self.pending.flush() {
            Some(pending) => self.commit(session, pending),
            None => Vec::new(),
        }
    }

    /// Apply a structural command, then re-render what it touched.
    pub fn apply(&mut self, session: &mut EditorSession, command: Command) -> Response {
        let mut updates = self.flush(session);
        match command {
            Command::AddSlide(kind) => {
                let index = session.add_slide(kind);
                updates.extend(self.reselect(session, index));
            }
            Command::RemoveSlide(index) => match session.remove_slide(index) {
                Ok(true) => {
                    let current = session.current_slide();
                    self.focused = None;
                    updates.extend(self.reselect(session, current));
                }
                Ok(false) => {}
                Err(refusal) => {
                    warn!("Refused to remove slide {}: {}", index, refusal);
                    updates.push(ViewUpdate::Refusal(refusal.to_string()));
                }
            },
            Command::DuplicateSlide(index) => {
                if let Some(copy) = session.duplicate_slide(index) {
                    updates.extend(self.reselect(session, copy));
                }
            }
            Command::MoveSlide { from, to } => {
                if session.move_slide(from, to) {
                    self.focused = None;
                    updates.extend(self.reselect(session, to));
                }
            }
            Command::ChangeSlideType { slide, kind } => {
                if session.change_slide_type(slide, kind) {
                    self.focused = None;
                    updates.extend(self.structural(session, slide));
                }
            }
            Command::AddBullet { slide } => {
                let column = session.deck().slides.get(slide).and_then(primary_column);
                if let (Some(column), Some(index)) = (column, session.add_bullet(slide)) {
                    updates.extend(self.structural(session, slide));
                    updates.push(self.focus(slide, FieldPath::Bullet { column, index }));
                }
            }
            Command::AddMetric { slide } => {
                if session.add_metric(slide).is_some() {
                    updates.extend(self.structural(session, slide));
                }
            }
            Command::RemoveMetric { slide, index } => {
                if session.remove_metric(slide, index) {
                    updates.extend(self.structural(session, slide));
                }
            }
            Command::AddTableRow { slide } => {
                if session.add_table_row(slide).is_some() {
                    updates.extend(self.structural(session, slide));
                }
            }
            Command::AddTableColumn { slide } => {
                if session.add_table_column(slide).is_some() {
                    updates.extend(self.structural(session, slide));
                }
            }
        }
        Response::handled(updates)
    }

    /// Editable markup for one slide.
    pub fn render_editable(&self, session: &EditorSession, index: usize) -> Option<String> {
        let slide = session.deck().slides.get(index)?;
        Some(slide_node(slide, index, &self.context(session, RenderMode::Edit)).to_html())
    }

    /// Markup for every thumbnail, in deck order.
    pub fn thumbnails(&self, session: &EditorSession) -> Vec<String> {
        let ctx = self.context(session, RenderMode::Present);
        session
            .deck()
            .slides
            .iter()
            .enumerate()
            .map(|(index, slide)| thumbnail_node(slide, index, &ctx).to_html())
            .collect()
    }

    fn context<'a>(&'a self, session: &'a EditorSession, mode: RenderMode) -> RenderContext<'a> {
        RenderContext {
            mode,
            canvas: &self.canvas,
            palette: &self.style.palette,
            company: &session.deck().company,
        }
    }

    fn on_enter(
        &mut self,
        session: &mut EditorSession,
        slide: usize,
        path: FieldPath,
        text: String,
    ) -> Response {
        let FieldPath::Bullet { column, index } = path else {
            // Single-line fields never take a literal line break.
            return Response::handled(Vec::new());
        };
        let mut updates = self.flush(session);
        updates.extend(self.write(session, slide, &path, &text));
        if let Some(new_index) = session.split_bullet_after(slide, column, index) {
            updates.extend(self.structural(session, slide));
            updates.push(self.focus(
                slide,
                FieldPath::Bullet {
                    column,
                    index: new_index,
                },
            ));
        }
        Response::handled(updates)
    }

    fn on_backspace(
        &mut self,
        session: &mut EditorSession,
        slide: usize,
        path: FieldPath,
        text: &str,
        caret_at_start: bool,
    ) -> Response {
        let FieldPath::Bullet { column, index } = path else {
            return Response::pass();
        };
        if !caret_at_start || !text.is_empty() {
            return Response::pass();
        }
        let mut updates = self.flush(session);
        match session.delete_bullet(slide, column, index) {
            Ok(Some(focus_index)) => {
                updates.extend(self.structural(session, slide));
                updates.push(self.focus(
                    slide,
                    FieldPath::Bullet {
                        column,
                        index: focus_index,
                    },
                ));
            }
            Ok(None) => {}
            Err(refusal) => {
                info!("Refused bullet delete on slide {}: {}", slide, refusal);
                updates.push(ViewUpdate::Refusal(refusal.to_string()));
            }
        }
        Response::handled(updates)
    }

    fn on_toggle_format(&mut self, session: &mut EditorSession, format: InlineFormat) -> Response {
        let Some((slide, path)) = self.focused else {
            return Response::pass();
        };
        // The visible text may be ahead of the model.
        let current = match self.pending.pending() {
            Some(Pending { key, value, .. }) if *key == (slide, path) => Some(value.clone()),
            _ => session.field(slide, &path),
        };
        let Some(current) = current else {
            return Response::pass();
        };
        let mut updates = self.flush(session);
        if session.set_field(slide, &path, &format.toggle(&current)) {
            updates.extend(self.structural(session, slide));
            updates.push(self.focus(slide, path));
        }
        Response::handled(updates)
    }

    fn commit(&mut self, session: &mut EditorSession, pending: Pending<FieldKey, String>) -> Vec<ViewUpdate> {
        let (slide, path) = pending.key;
        self.write(session, slide, &path, &pending.value)
    }

    /// Write a field value and refresh its thumbnail.
    fn write(
        &mut self,
        session: &mut EditorSession,
        slide: usize,
        path: &FieldPath,
        text: &str,
    ) -> Vec<ViewUpdate> {
        if session.field(slide, path).as_deref() == Some(text) {
            return Vec::new();
        }
        if session.set_field(slide, path, text) {
            self.thumbnail(session, slide).into_iter().collect()
        } else {
            Vec::new()
        }
    }

    fn thumbnail(&self, session: &EditorSession, index: usize) -> Option<ViewUpdate> {
        let slide = session.deck().slides.get(index)?;
        let ctx = self.context(session, RenderMode::Present);
        Some(ViewUpdate::RefreshThumbnail {
            index,
            markup: thumbnail_node(slide, index, &ctx).to_html(),
        })
    }

    fn rerender(&self, session: &EditorSession, index: usize) -> Option<ViewUpdate> {
        self.render_editable(session, index)
            .map(|markup| ViewUpdate::RerenderSlide { index, markup })
    }

    /// Re-render one slide and its thumbnail after its shape changed.
    fn structural(&self, session: &EditorSession, index: usize) -> Vec<ViewUpdate> {
        self.rerender(session, index)
            .into_iter()
            .chain(self.thumbnail(session, index))
            .collect()
    }

    /// Refresh everything that depends on slide positions.
    fn reselect(&self, session: &EditorSession, index: usize) -> Vec<ViewUpdate> {
        let mut updates = vec![
            ViewUpdate::RebuildThumbnails(self.thumbnails(session)),
            ViewUpdate::SelectSlide(index),
        ];
        updates.extend(self.rerender(session, index));
        updates
    }

    fn focus(&mut self, slide: usize, path: FieldPath) -> ViewUpdate {
        self.focused = Some((slide, path));
        ViewUpdate::Focus { slide, path }
    }
}

