use super::*;
use crate::charts::{bar_geometry, line_geometry, pie_geometry, ChartCanvas, ChartGeometry, Palette};
use crate::debounce::Debouncer;
use crate::edit::{MetricField, PointField};
use crate::markup::inline;
use crate::model::{
    editing_bullets, presented_bullets, BarPoint, BarSeries, BulletsSlide, LinePoint, LineSeries,
    Segment, TitleSlide, TwoColumnSlide,
};
use crate::render::{slide_node, RenderContext, RenderMode};
use std::io::Write;
use std::time::{Duration, Instant};
use tempfile::{NamedTempFile, TempDir};

fn create_temp_resource_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn bullets_deck(content: &str) -> Deck {
    Deck::new(
        "Test",
        "#000000",
        "Test Co",
        vec![Slide::Bullets(BulletsSlide {
            title: "Points".to_string(),
            content: content.to_string(),
        })],
    )
}

fn content_of(deck: &Deck, index: usize) -> String {
    deck.slides[index]
        .content()
        .expect("slide has content")
        .to_string()
}

fn two_slide_theme() -> ThemeCatalog {
    ThemeCatalog::new().with_theme(Theme {
        id: "A".to_string(),
        name: "Theme A".to_string(),
        description: "Two slides".to_string(),
        style: ThemeStyle::default(),
        default_deck: Deck::new(
            "A deck",
            "#123456",
            "",
            vec![
                Slide::Title(TitleSlide {
                    title: "Start".to_string(),
                    subtitle: None,
                    badge: None,
                }),
                Slide::Bullets(BulletsSlide::new("Middle", &["one", "two"])),
            ],
        ),
    })
}

fn bar_series(name: &str, points: &[(&str, f64)]) -> BarSeries {
    BarSeries {
        name: name.to_string(),
        data: points
            .iter()
            .map(|(label, value)| BarPoint {
                label: label.to_string(),
                value: *value,
            })
            .collect(),
    }
}

fn line_series(name: &str, points: &[(&str, f64)]) -> LineSeries {
    LineSeries {
        name: name.to_string(),
        data: points
            .iter()
            .map(|(x, y)| LinePoint {
                x: x.to_string(),
                y: *y,
            })
            .collect(),
    }
}

fn segments(values: &[(&str, f64)]) -> Vec<Segment> {
    values
        .iter()
        .map(|(label, value)| Segment {
            label: label.to_string(),
            value: *value,
        })
        .collect()
}

fn edit_context<'a>(canvas: &'a ChartCanvas, palette: &'a [String]) -> RenderContext<'a> {
    RenderContext {
        mode: RenderMode::Edit,
        canvas,
        palette,
        company: "",
    }
}

fn present_context<'a>(canvas: &'a ChartCanvas, palette: &'a [String]) -> RenderContext<'a> {
    RenderContext {
        mode: RenderMode::Present,
        canvas,
        palette,
        company: "",
    }
}

fn bridge() -> Bridge {
    Bridge::new(
        ThemeStyle::default(),
        ChartCanvas::default(),
        Duration::from_millis(300),
    )
}

// Model

#[test]
fn test_bullet_views() {
    assert_eq!(presented_bullets("- a\n\n• b\n  \nc"), vec!["a", "b", "c"]);
    assert_eq!(editing_bullets(""), vec![String::new()]);
    assert_eq!(editing_bullets("a\n\nb").len(), 3);
}

#[test]
fn test_unknown_slide_type_is_kept() {
    let json = r##"{
        "name": "Deck",
        "accent": "#000",
        "company": "Co",
        "slides": [{"type": "timeline", "title": "History", "content": "1990\n2000"}]
    }"##;
    let deck: Deck = serde_json::from_str(json).expect("Failed to parse deck");
    match &deck.slides[0] {
        Slide::Unrecognized(slide) => {
            assert_eq!(slide.kind, "timeline");
            assert_eq!(slide.title, "History");
        }
        other => panic!("Expected unrecognized slide, got {:?}", other),
    }
    assert_eq!(deck.slides[0].kind(), None);
    assert_eq!(deck.slides[0].type_tag(), "timeline");

    let saved = serde_json::to_string(&deck).expect("Failed to serialize deck");
    assert!(saved.contains(r#""type":"timeline""#));
}

#[test]
fn test_known_slide_type_tags() {
    let json = r#"{"type": "two-column", "title": "T", "left": "a", "right": "b"}"#;
    let slide: Slide = serde_json::from_str(json).expect("Failed to parse slide");
    assert_eq!(slide.kind(), Some(SlideKind::TwoColumn));
    for kind in SlideKind::ALL {
        assert_eq!(Slide::default_for(kind).kind(), Some(kind));
        assert_eq!(kind.tag().parse::<SlideKind>().ok(), Some(kind));
    }
}

// Edit engine

#[test]
fn test_delete_bullet_reduces_count_and_moves_focus_back() {
    let mut deck = bullets_deck("a\nb\nc");
    assert_eq!(deck.delete_bullet(0, Column::Main, 2), Ok(Some(1)));
    assert_eq!(editing_bullets(&content_of(&deck, 0)), vec!["a", "b"]);

    assert_eq!(deck.delete_bullet(0, Column::Main, 0), Ok(Some(0)));
    assert_eq!(content_of(&deck, 0), "b");
}

#[test]
fn test_delete_last_bullet_is_refused() {
    let mut deck = bullets_deck("only");
    let before = deck.clone();
    assert_eq!(
        deck.delete_bullet(0, Column::Main, 0),
        Err(Refusal::LastBullet)
    );
    assert_eq!(deck, before);
    assert_eq!(
        Refusal::LastBullet.to_string(),
        "A column needs at least one bullet point."
    );
}

#[test]
fn test_delete_bullet_out_of_range_is_ignored() {
    let mut deck = bullets_deck("a\nb");
    assert_eq!(deck.delete_bullet(0, Column::Main, 5), Ok(None));
    assert_eq!(deck.delete_bullet(3, Column::Main, 0), Ok(None));
    assert_eq!(deck.delete_bullet(0, Column::Left, 0), Ok(None));
    assert_eq!(content_of(&deck, 0), "a\nb");
}

#[test]
fn test_split_then_delete_restores_content() {
    let mut deck = bullets_deck("a\nb\nc");
    let new_index = deck
        .split_bullet_after(0, Column::Main, 0)
        .expect("split should succeed");
    assert_eq!(new_index, 1);
    assert_eq!(editing_bullets(&content_of(&deck, 0)), vec!["a", "", "b", "c"]);
    // The blank bullet is not shown when presenting.
    assert_eq!(presented_bullets(&content_of(&deck, 0)), vec!["a", "b", "c"]);

    assert_eq!(deck.delete_bullet(0, Column::Main, new_index), Ok(Some(0)));
    assert_eq!(content_of(&deck, 0), "a\nb\nc");
}

#[test]
fn test_set_field_on_wrong_variant_is_noop() {
    let mut deck = bullets_deck("a");
    let before = deck.clone();
    let metric = FieldPath::Metric {
        index: 0,
        field: MetricField::Number,
    };
    assert!(!deck.set_field(0, &metric, "42"));
    assert!(!deck.set_field(0, &FieldPath::Text(TextField::Subtitle), "x"));
    assert!(!deck.set_field(9, &FieldPath::Text(TextField::Title), "x"));
    assert_eq!(deck, before);
}

#[test]
fn test_set_field_bullet_strips_marker() {
    let mut deck = bullets_deck("a\nb");
    let path = FieldPath::Bullet {
        column: Column::Main,
        index: 1,
    };
    assert!(deck.set_field(0, &path, "- **bold** move"));
    assert_eq!(content_of(&deck, 0), "a\n**bold** move");
    assert_eq!(deck.field(0, &path).as_deref(), Some("**bold** move"));
}

#[test]
fn test_emptied_optional_field_becomes_absent() {
    let mut deck = Deck::new(
        "T",
        "#000",
        "",
        vec![Slide::Title(TitleSlide {
            title: "Hi".to_string(),
            subtitle: Some("Sub".to_string()),
            badge: None,
        })],
    );
    assert!(deck.set_field(0, &FieldPath::Text(TextField::Subtitle), "  "));
    match &deck.slides[0] {
        Slide::Title(slide) => assert_eq!(slide.subtitle, None),
        other => panic!("Unexpected slide {:?}", other),
    }
}

#[test]
fn test_chart_value_edits_parse_numbers() {
    let mut deck = Deck::new("T", "#000", "", vec![Slide::default_for(SlideKind::BarChart)]);
    let value = FieldPath::Point {
        series: 0,
        point: 1,
        field: PointField::Value,
    };
    assert!(!deck.set_field(0, &value, "lots"));
    assert_eq!(deck.field(0, &value).as_deref(), Some("20"));
    assert!(deck.set_field(0, &value, "1,200.5"));
    assert_eq!(deck.field(0, &value).as_deref(), Some("1200.5"));
}

#[test]
fn test_same_type_change_is_noop() {
    let mut deck = bullets_deck("a\nb");
    let before = deck.clone();
    assert!(!deck.change_slide_type(0, SlideKind::Bullets));
    assert_eq!(deck, before);
}

#[test]
fn test_bullets_to_two_column_splits_list() {
    let mut deck = bullets_deck("a\nb\nc");
    assert!(deck.change_slide_type(0, SlideKind::TwoColumn));
    match &deck.slides[0] {
        Slide::TwoColumn(slide) => {
            assert_eq!(slide.title, "Points");
            assert_eq!(slide.left, "a\nb");
            assert_eq!(slide.right, "c");
        }
        other => panic!("Unexpected slide {:?}", other),
    }
}

#[test]
fn test_type_change_carry_over() {
    let mut deck = bullets_deck("- First thought\nSecond");
    assert!(deck.change_slide_type(0, SlideKind::Quote));
    assert_eq!(
        deck.field(0, &FieldPath::Text(TextField::Quote)).as_deref(),
        Some("First thought")
    );
    assert_eq!(deck.slides[0].title(), "Points");

    let mut deck = Deck::new(
        "T",
        "#000",
        "",
        vec![Slide::Title(TitleSlide {
            title: "Intro".to_string(),
            subtitle: None,
            badge: None,
        })],
    );
    assert!(deck.change_slide_type(0, SlideKind::Bullets));
    assert_eq!(content_of(&deck, 0), "Intro");
}

#[test]
fn test_add_bullet_replaces_lone_empty_bullet() {
    let mut deck = bullets_deck("");
    assert_eq!(deck.add_bullet(0), Some(0));
    assert_eq!(content_of(&deck, 0), "New point");
    assert_eq!(deck.add_bullet(0), Some(1));
    assert_eq!(content_of(&deck, 0), "New point\nNew point");

    let mut deck = Deck::new(
        "T",
        "#000",
        "",
        vec![Slide::TwoColumn(TwoColumnSlide::new("Compare", &["l"], &["r"]))],
    );
    assert_eq!(deck.add_bullet(0), Some(1));
    assert_eq!(deck.add_bullet_to(0, Column::Right), Some(1));
    assert_eq!(
        deck.field(
            0,
            &FieldPath::Bullet {
                column: Column::Left,
                index: 1
            }
        )
        .as_deref(),
        Some("New point")
    );
}

#[test]
fn test_metric_and_table_structure_edits() {
    let mut deck = Deck::new(
        "T",
        "#000",
        "",
        vec![
            Slide::default_for(SlideKind::Stats),
            Slide::default_for(SlideKind::Table),
        ],
    );
    assert_eq!(deck.add_metric(0), Some(2));
    assert!(deck.remove_metric(0, 0));
    assert!(!deck.remove_metric(0, 7));
    assert_eq!(deck.add_metric(1), None);

    assert_eq!(deck.add_table_column(1), Some(2));
    assert_eq!(deck.add_table_row(1), Some(2));
    let header = FieldPath::Cell { row: 0, col: 2 };
    assert_eq!(deck.field(1, &header).as_deref(), Some("Column"));
    assert_eq!(
        deck.field(1, &FieldPath::Cell { row: 2, col: 2 }).as_deref(),
        Some("")
    );
}

// Session

#[test]
fn test_remove_only_slide_is_refused() {
    let deck = bullets_deck("a");
    let mut session = EditorSession::with_deck("minimal", deck.clone());
    assert_eq!(session.remove_slide(0), Err(Refusal::LastSlide));
    assert_eq!(*session.deck(), deck);
}

#[test]
fn test_remove_slide_reclamps_selection() {
    let catalog = ThemeCatalog::builtin();
    let mut session = EditorSession::start(&catalog, "minimal").expect("theme exists");
    let last = session.deck().len() - 1;
    session.select_slide(last);
    assert_eq!(session.remove_slide(last), Ok(true));
    assert_eq!(session.current_slide(), last - 1);
    assert_eq!(session.remove_slide(99), Ok(false));
}

#[test]
fn test_remove_earlier_slide_keeps_selection_on_same_slide() {
    let catalog = ThemeCatalog::builtin();
    let mut session = EditorSession::start(&catalog, "minimal").expect("theme exists");
    session.select_slide(2);
    let selected = session.current().cloned().expect("slide selected");

    assert_eq!(session.remove_slide(0), Ok(true));
    assert_eq!(session.current_slide(), 1);
    assert_eq!(session.current(), Some(&selected));

    // Removing a later slide leaves the selection alone.
    let last = session.deck().len() - 1;
    assert_eq!(session.remove_slide(last), Ok(true));
    assert_eq!(session.current_slide(), 1);
    assert_eq!(session.current(), Some(&selected));
}

#[test]
fn test_unknown_theme_fails() {
    let catalog = ThemeCatalog::builtin();
    match EditorSession::start(&catalog, "nope") {
        Err(SlideError::UnknownTheme(id)) => assert_eq!(id, "nope"),
        other => panic!("Expected unknown theme error, got {:?}", other.map(|s| s.id())),
    }
}

#[test]
fn test_session_works_on_a_copy_of_the_theme_deck() {
    let catalog = ThemeCatalog::builtin();
    let mut session = EditorSession::start(&catalog, "corporate").expect("theme exists");
    session.set_field(0, &FieldPath::Text(TextField::Title), "Changed");
    let theme = catalog.get("corporate").expect("theme exists");
    assert_eq!(theme.default_deck.slides[0].title(), "Quarterly Business Review");
}

#[test]
fn test_move_and_duplicate_follow_selection() {
    let catalog = ThemeCatalog::builtin();
    let mut session = EditorSession::start(&catalog, "startup").expect("theme exists");
    let first = session.deck().slides[0].clone();
    assert!(session.move_slide(0, 2));
    assert_eq!(session.current_slide(), 2);
    assert_eq!(session.deck().slides[2], first);

    let count = session.deck().len();
    assert_eq!(session.duplicate_slide(2), Some(3));
    assert_eq!(session.deck().len(), count + 1);
    assert_eq!(session.deck().slides[3], first);
    assert_eq!(session.select_slide(100), session.deck().len() - 1);
}

#[test]
fn test_edit_then_add_slide_scenario() {
    let catalog = two_slide_theme();
    let mut session = EditorSession::start(&catalog, "A").expect("theme exists");
    let mut bridge = bridge();
    let start = Instant::now();

    bridge.handle(
        &mut session,
        SurfaceEvent::Input {
            slide: 0,
            path: FieldPath::Text(TextField::Title),
            text: "Hello".to_string(),
        },
        start,
    );
    let second = session.deck().slides[1].clone();
    bridge.apply(&mut session, Command::AddSlide(SlideKind::Bullets));

    assert_eq!(session.deck().len(), 3);
    assert_eq!(session.current_slide(), 2);
    assert_eq!(session.deck().slides[0].title(), "Hello");
    assert_eq!(session.deck().slides[1], second);
    assert_eq!(session.deck().slides[2].kind(), Some(SlideKind::Bullets));
}

// Debounce and bridge

#[test]
fn test_debouncer_releases_latest_value_after_delay() {
    let start = Instant::now();
    let mut debouncer = Debouncer::new(Duration::from_millis(100));
    assert!(debouncer.schedule("title", "H", start).is_none());
    assert!(debouncer
        .schedule("title", "He", start + Duration::from_millis(50))
        .is_none());
    assert!(debouncer.poll(start + Duration::from_millis(120)).is_none());

    let released = debouncer
        .poll(start + Duration::from_millis(150))
        .expect("write is due");
    assert_eq!(released.value, "He");
    assert!(debouncer.is_idle());

    debouncer.schedule("title", "x", start);
    let displaced = debouncer
        .schedule("subtitle", "y", start)
        .expect("other key is handed back");
    assert_eq!(displaced.key, "title");
}

#[test]
fn test_input_is_committed_once_idle() {
    let catalog = ThemeCatalog::builtin();
    let mut session = EditorSession::start(&catalog, "minimal").expect("theme exists");
    let mut bridge = bridge();
    let start = Instant::now();
    let path = FieldPath::Text(TextField::Title);

    for (offset, text) in [(0, "N"), (100, "Ne"), (200, "New")] {
        bridge.handle(
            &mut session,
            SurfaceEvent::Input {
                slide: 0,
                path,
                text: text.to_string(),
            },
            start + Duration::from_millis(offset),
        );
    }
    assert!(bridge
        .poll(&mut session, start + Duration::from_millis(400))
        .is_empty());
    assert_eq!(session.deck().slides[0].title(), "Simple Ideas");

    let updates = bridge.poll(&mut session, start + Duration::from_millis(500));
    assert_eq!(session.deck().slides[0].title(), "New");
    assert!(matches!(
        updates.as_slice(),
        [ViewUpdate::RefreshThumbnail { index: 0, .. }]
    ));
    assert!(!bridge.has_pending_write());
}

#[test]
fn test_input_on_another_field_commits_previous_one() {
    let catalog = ThemeCatalog::builtin();
    let mut session = EditorSession::start(&catalog, "minimal").expect("theme exists");
    let mut bridge = bridge();
    let now = Instant::now();

    bridge.handle(
        &mut session,
        SurfaceEvent::Input {
            slide: 0,
            path: FieldPath::Text(TextField::Title),
            text: "First".to_string(),
        },
        now,
    );
    bridge.handle(
        &mut session,
        SurfaceEvent::Input {
            slide: 0,
            path: FieldPath::Text(TextField::Subtitle),
            text: "Second".to_string(),
        },
        now,
    );
    assert_eq!(session.deck().slides[0].title(), "First");
    assert_eq!(
        session
            .deck()
            .field(0, &FieldPath::Text(TextField::Subtitle))
            .as_deref(),
        Some("Said clearly")
    );
}

#[test]
fn test_blur_commits_immediately() {
    let catalog = ThemeCatalog::builtin();
    let mut session = EditorSession::start(&catalog, "minimal").expect("theme exists");
    let mut bridge = bridge();
    let now = Instant::now();
    let path = FieldPath::Text(TextField::Title);

    bridge.handle(&mut session, SurfaceEvent::Focus { slide: 0, path }, now);
    assert_eq!(bridge.focused(), Some((0, path)));
    bridge.handle(
        &mut session,
        SurfaceEvent::Blur {
            slide: 0,
            path,
            text: "Done".to_string(),
        },
        now,
    );
    assert_eq!(session.deck().slides[0].title(), "Done");
    assert_eq!(bridge.focused(), None);
}

#[test]
fn test_enter_in_bullet_splits_and_focuses_new_bullet() {
    let mut session = EditorSession::with_deck("minimal", bullets_deck("a\nb"));
    let mut bridge = bridge();
    let path = FieldPath::Bullet {
        column: Column::Main,
        index: 0,
    };

    let response = bridge.handle(
        &mut session,
        SurfaceEvent::Enter {
            slide: 0,
            path,
            text: "a!".to_string(),
        },
        Instant::now(),
    );
    assert!(response.prevent_default);
    assert_eq!(content_of(session.deck(), 0), "a!\n\nb");

    let new_bullet = FieldPath::Bullet {
        column: Column::Main,
        index: 1,
    };
    assert!(response.updates.contains(&ViewUpdate::Focus {
        slide: 0,
        path: new_bullet
    }));
    let rerendered = response.updates.iter().find_map(|update| match update {
        ViewUpdate::RerenderSlide { index: 0, markup } => Some(markup.clone()),
        _ => None,
    });
    let markup = rerendered.expect("slide is re-rendered");
    assert!(markup.contains(r#"data-field="content.1""#));
    assert_eq!(bridge.focused(), Some((0, new_bullet)));
}

#[test]
fn test_enter_outside_bullets_is_swallowed() {
    let catalog = ThemeCatalog::builtin();
    let mut session = EditorSession::start(&catalog, "minimal").expect("theme exists");
    let before = session.deck().clone();
    let response = bridge().handle(
        &mut session,
        SurfaceEvent::Enter {
            slide: 0,
            path: FieldPath::Text(TextField::Title),
            text: "Simple Ideas".to_string(),
        },
        Instant::now(),
    );
    assert!(response.prevent_default);
    assert!(response.updates.is_empty());
    assert_eq!(*session.deck(), before);
}

#[test]
fn test_backspace_on_empty_bullet_deletes_it() {
    let mut session = EditorSession::with_deck("minimal", bullets_deck("a\n\nb"));
    let mut bridge = bridge();

    let response = bridge.handle(
        &mut session,
        SurfaceEvent::Backspace {
            slide: 0,
            path: FieldPath::Bullet {
                column: Column::Main,
                index: 1,
            },
            text: String::new(),
            caret_at_start: true,
        },
        Instant::now(),
    );
    assert!(response.prevent_default);
    assert_eq!(content_of(session.deck(), 0), "a\nb");
    assert!(response.updates.contains(&ViewUpdate::Focus {
        slide: 0,
        path: FieldPath::Bullet {
            column: Column::Main,
            index: 0
        }
    }));
}

#[test]
fn test_backspace_with_text_passes_through() {
    let mut session = EditorSession::with_deck("minimal", bullets_deck("a\nb"));
    let response = bridge().handle(
        &mut session,
        SurfaceEvent::Backspace {
            slide: 0,
            path: FieldPath::Bullet {
                column: Column::Main,
                index: 1,
            },
            text: "b".to_string(),
            caret_at_start: true,
        },
        Instant::now(),
    );
    assert!(!response.prevent_default);
    assert!(response.updates.is_empty());
    assert_eq!(content_of(session.deck(), 0), "a\nb");
}

#[test]
fn test_backspace_on_last_bullet_reports_refusal() {
    let mut session = EditorSession::with_deck("minimal", bullets_deck(""));
    let response = bridge().handle(
        &mut session,
        SurfaceEvent::Backspace {
            slide: 0,
            path: FieldPath::Bullet {
                column: Column::Main,
                index: 0,
            },
            text: String::new(),
            caret_at_start: true,
        },
        Instant::now(),
    );
    assert_eq!(
        response.updates,
        vec![ViewUpdate::Refusal(Refusal::LastBullet.to_string())]
    );
    assert_eq!(session.deck().len(), 1);
}

#[test]
fn test_remove_last_slide_command_reports_refusal() {
    let mut session = EditorSession::with_deck("minimal", bullets_deck("a"));
    let response = bridge().apply(&mut session, Command::RemoveSlide(0));
    assert_eq!(
        response.updates,
        vec![ViewUpdate::Refusal(
            "A presentation needs at least one slide.".to_string()
        )]
    );
}

#[test]
fn test_toggle_format_wraps_and_unwraps_focused_field() {
    let catalog = ThemeCatalog::builtin();
    let mut session = EditorSession::start(&catalog, "minimal").expect("theme exists");
    let mut bridge = bridge();
    let now = Instant::now();
    let path = FieldPath::Text(TextField::Title);

    let unfocused = bridge.handle(
        &mut session,
        SurfaceEvent::ToggleFormat(InlineFormat::Bold),
        now,
    );
    assert!(unfocused.updates.is_empty());

    bridge.handle(&mut session, SurfaceEvent::Focus { slide: 0, path }, now);
    bridge.handle(
        &mut session,
        SurfaceEvent::Input {
            slide: 0,
            path,
            text: "Big".to_string(),
        },
        now,
    );
    bridge.handle(
        &mut session,
        SurfaceEvent::ToggleFormat(InlineFormat::Bold),
        now,
    );
    assert_eq!(session.deck().slides[0].title(), "**Big**");

    bridge.handle(
        &mut session,
        SurfaceEvent::ToggleFormat(InlineFormat::Bold),
        now,
    );
    assert_eq!(session.deck().slides[0].title(), "Big");
}

#[test]
fn test_inline_format_toggle() {
    assert_eq!(InlineFormat::Italic.toggle("a"), "*a*");
    assert_eq!(InlineFormat::Italic.toggle("*a*"), "a");
    assert_eq!(InlineFormat::Italic.toggle("**a**"), "***a***");
    assert_eq!(InlineFormat::Bold.toggle("**a**"), "a");
    assert_eq!(InlineFormat::Bold.toggle(""), "****");
    // Bold and italic combine and come off one at a time.
    assert_eq!(InlineFormat::Bold.toggle("*a*"), "***a***");
    assert_eq!(InlineFormat::Italic.toggle("***a***"), "**a**");
    assert_eq!(InlineFormat::Bold.toggle("***a***"), "*a*");
}

#[test]
fn test_formatting_survives_rerender_and_blur() {
    let catalog = ThemeCatalog::builtin();
    let mut session = EditorSession::start(&catalog, "minimal").expect("theme exists");
    let mut bridge = bridge();
    let now = Instant::now();
    let path = FieldPath::Text(TextField::Title);

    bridge.handle(&mut session, SurfaceEvent::Focus { slide: 0, path }, now);
    let response = bridge.handle(
        &mut session,
        SurfaceEvent::ToggleFormat(InlineFormat::Bold),
        now,
    );
    assert_eq!(session.deck().slides[0].title(), "**Simple Ideas**");

    let markup = response
        .updates
        .iter()
        .find_map(|update| match update {
            ViewUpdate::RerenderSlide { index: 0, markup } => Some(markup.clone()),
            _ => None,
        })
        .expect("slide should be re-rendered");
    // The editable title shows the markers, so its visible text carries them back.
    assert!(markup.contains("**Simple Ideas**"));
    assert!(!markup.contains("<strong>Simple Ideas</strong>"));

    bridge.handle(
        &mut session,
        SurfaceEvent::Blur {
            slide: 0,
            path,
            text: "**Simple Ideas**".to_string(),
        },
        now,
    );
    assert_eq!(session.deck().slides[0].title(), "**Simple Ideas**");

    let thumbnails = bridge.thumbnails(&session);
    assert!(thumbnails[0].contains("<strong>Simple Ideas</strong>"));
}

#[test]
fn test_select_theme_discards_pending_writes() {
    let catalog = ThemeCatalog::builtin();
    let mut session = EditorSession::start(&catalog, "minimal").expect("theme exists");
    let mut bridge = bridge();
    let now = Instant::now();
    bridge.handle(
        &mut session,
        SurfaceEvent::Input {
            slide: 0,
            path: FieldPath::Text(TextField::Title),
            text: "Lost".to_string(),
        },
        now,
    );

    let mut session = bridge
        .select_theme(&catalog, "midnight")
        .expect("theme exists");
    assert!(!bridge.has_pending_write());
    assert!(bridge
        .poll(&mut session, now + Duration::from_secs(5))
        .is_empty());
    assert_eq!(session.theme_id(), "midnight");
    assert_eq!(session.deck().slides[0].title(), "Introducing Nova");
}

#[test]
fn test_structural_command_flushes_pending_write() {
    let catalog = ThemeCatalog::builtin();
    let mut session = EditorSession::start(&catalog, "minimal").expect("theme exists");
    let mut bridge = bridge();
    bridge.handle(
        &mut session,
        SurfaceEvent::Input {
            slide: 1,
            path: FieldPath::Bullet {
                column: Column::Main,
                index: 0,
            },
            text: "Edited".to_string(),
        },
        Instant::now(),
    );
    let response = bridge.apply(&mut session, Command::AddBullet { slide: 1 });
    assert_eq!(
        presented_bullets(&content_of(session.deck(), 1)),
        vec!["Edited", "Where we are going", "How we get there", "New point"]
    );
    assert!(response.updates.contains(&ViewUpdate::Focus {
        slide: 1,
        path: FieldPath::Bullet {
            column: Column::Main,
            index: 3
        }
    }));
}

// Charts

#[test]
fn test_bar_heights_scale_to_max() {
    let canvas = ChartCanvas::default();
    let series = [bar_series("s", &[("Q1", 0.0), ("Q2", 10.0)])];
    let ChartGeometry::Bar(bar) = bar_geometry(&series, &canvas, &Palette::new(&[])) else {
        panic!("Expected bar geometry");
    };
    assert_eq!(bar.bars.len(), 2);
    assert_eq!(bar.bars[0].height, 0.0);
    assert_eq!(bar.bars[1].height, canvas.plot_height());
    assert_eq!(bar.bars[1].y, canvas.plot_top());
    assert!(!bar.flat);
}

#[test]
fn test_bar_labels_are_union_in_first_seen_order() {
    let canvas = ChartCanvas::default();
    let series = [
        bar_series("a", &[("Q2", 1.0), ("Q1", 2.0)]),
        bar_series("b", &[("Q3", 3.0), ("Q2", 4.0)]),
    ];
    let ChartGeometry::Bar(bar) = bar_geometry(&series, &canvas, &Palette::new(&[])) else {
        panic!("Expected bar geometry");
    };
    let labels: Vec<&str> = bar.x_labels.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(labels, vec!["Q2", "Q1", "Q3"]);
    assert_eq!(bar.bars.len(), 4);
    assert_eq!(bar.legend.len(), 2);
}

#[test]
fn test_all_zero_bars_are_flat() {
    let canvas = ChartCanvas::default();
    let series = [bar_series("s", &[("Q1", 0.0), ("Q2", 0.0)])];
    let ChartGeometry::Bar(bar) = bar_geometry(&series, &canvas, &Palette::new(&[])) else {
        panic!("Expected bar geometry");
    };
    assert!(bar.flat);
    assert!(bar.bars.iter().all(|rect| rect.height == 0.0));
}

#[test]
fn test_bar_width_has_a_minimum() {
    let canvas = ChartCanvas::new(120.0, 320.0);
    let series: Vec<BarSeries> = (0..10)
        .map(|i| bar_series(&format!("s{}", i), &[("Q1", 1.0), ("Q2", 2.0)]))
        .collect();
    let ChartGeometry::Bar(bar) = bar_geometry(&series, &canvas, &Palette::new(&[])) else {
        panic!("Expected bar geometry");
    };
    assert!(bar.bars.iter().all(|rect| rect.width == canvas.min_bar_width));
}

#[test]
fn test_empty_charts_show_no_data() {
    let canvas = ChartCanvas::default();
    let palette = Palette::new(&[]);
    assert!(matches!(
        bar_geometry(&[], &canvas, &palette),
        ChartGeometry::NoData(_)
    ));
    assert!(matches!(
        line_geometry(&[line_series("s", &[])], &canvas, &palette),
        ChartGeometry::NoData(_)
    ));
    assert!(matches!(
        pie_geometry(&segments(&[("a", 0.0)]), &canvas, &palette),
        ChartGeometry::NoData(_)
    ));
}

#[test]
fn test_line_interpolates_gaps_inside_span() {
    let canvas = ChartCanvas::default();
    let series = [
        line_series("full", &[("W1", 0.0), ("W2", 10.0), ("W3", 20.0)]),
        line_series("gappy", &[("W1", 0.0), ("W3", 20.0)]),
        line_series("late", &[("W2", 20.0), ("W3", 20.0)]),
    ];
    let ChartGeometry::Line(line) = line_geometry(&series, &canvas, &Palette::new(&[])) else {
        panic!("Expected line geometry");
    };
    assert_eq!(line.lines[0].points, line.lines[1].points);
    assert_eq!(line.lines[1].points.len(), 3);
    // Series that start late do not reach back to the first x value.
    assert_eq!(line.lines[2].points.len(), 2);
    assert_eq!(line.lines[2].points[0].0, line.lines[0].points[1].0);
}

#[test]
fn test_pie_even_split() {
    let canvas = ChartCanvas::default();
    let ChartGeometry::Pie(pie) = pie_geometry(
        &segments(&[("a", 50.0), ("b", 50.0)]),
        &canvas,
        &Palette::new(&[]),
    ) else {
        panic!("Expected pie geometry");
    };
    assert_eq!(pie.wedges.len(), 2);
    assert_eq!(pie.wedges[0].start_angle, -90.0);
    for wedge in &pie.wedges {
        assert_eq!(wedge.span, 180.0);
        assert!(!wedge.large_arc);
    }
}

#[test]
fn test_pie_large_arc_and_zero_segments() {
    let canvas = ChartCanvas::default();
    let ChartGeometry::Pie(pie) = pie_geometry(
        &segments(&[("big", 75.0), ("none", 0.0), ("small", 25.0)]),
        &canvas,
        &Palette::new(&[]),
    ) else {
        panic!("Expected pie geometry");
    };
    assert_eq!(pie.legend.len(), 3);
    assert_eq!(pie.wedges.len(), 2);
    assert!(pie.wedges[0].large_arc);
    assert!(!pie.wedges[1].large_arc);
    assert_eq!(pie.legend[0].percent, Some(75.0));
}

#[test]
fn test_single_pie_segment_is_full_circle() {
    let canvas = ChartCanvas::default();
    let ChartGeometry::Pie(pie) =
        pie_geometry(&segments(&[("all", 5.0)]), &canvas, &Palette::new(&[]))
    else {
        panic!("Expected pie geometry");
    };
    assert_eq!(pie.wedges.len(), 1);
    assert_eq!(pie.wedges[0].path.matches(" A ").count(), 2);
    assert!(!pie.wedges[0].path.contains(" L "));
}

#[test]
fn test_palette_wraps_and_falls_back() {
    let colors = vec!["#111".to_string(), "#222".to_string()];
    let palette = Palette::new(&colors);
    assert_eq!(palette.color(2), "#111");
    assert_eq!(Palette::new(&[]).color(0), crate::charts::DEFAULT_PALETTE[0]);
}

#[test]
fn test_format_number() {
    assert_eq!(crate::charts::format_number(3.0), "3");
    assert_eq!(crate::charts::format_number(2.5), "2.5");
    assert_eq!(crate::charts::format_number(1.0 / 3.0), "0.33");
    assert_eq!(crate::charts::format_number(-0.001), "0");
}

// Rendering

#[test]
fn test_inline_formatting_and_escaping() {
    let html: String = inline("**bold** & *it* <x>")
        .iter()
        .map(|node| node.to_html())
        .collect();
    assert_eq!(html, "<strong>bold</strong> &amp; <em>it</em> &lt;x&gt;");
    let unclosed: String = inline("2 * 3").iter().map(|node| node.to_html()).collect();
    assert_eq!(unclosed, "2 * 3");

    let render = |text: &str| -> String { inline(text).iter().map(|node| node.to_html()).collect() };
    assert_eq!(render("***a***"), "<strong><em>a</em></strong>");
    assert_eq!(render("*a **b** c*"), "<em>a <strong>b</strong> c</em>");
    assert_eq!(render("**a *b* c**"), "<strong>a <em>b</em> c</strong>");
    assert_eq!(render("**a *b***"), "<strong>a <em>b</em></strong>");
    assert_eq!(render("**open"), "**open");
}

#[test]
fn test_unrecognized_slide_renders_as_bullets() {
    let json = r#"{"type": "timeline", "title": "History", "content": "1990\n2000"}"#;
    let slide: Slide = serde_json::from_str(json).expect("Failed to parse slide");
    let canvas = ChartCanvas::default();
    let html = slide_node(&slide, 3, &present_context(&canvas, &[])).to_html();
    assert!(html.contains(r#"class="slide slide-bullets""#));
    assert!(html.contains(r#"data-type="timeline""#));
    assert!(html.contains(r#"data-index="3""#));
    assert!(html.contains(r#"<li class="bullet">1990</li>"#));
}

#[test]
fn test_editable_rendering_carries_field_paths() {
    let canvas = ChartCanvas::default();
    let slide = Slide::Title(TitleSlide {
        title: "Hi <there>".to_string(),
        subtitle: None,
        badge: None,
    });

    let editing = slide_node(&slide, 0, &edit_context(&canvas, &[])).to_html();
    assert!(editing.contains(r#"contenteditable="true""#));
    assert!(editing.contains(r#"data-field="title""#));
    assert!(editing.contains(r#"data-placeholder="subtitle""#));
    assert!(editing.contains("Hi &lt;there&gt;"));

    let presenting = slide_node(&slide, 0, &present_context(&canvas, &[])).to_html();
    assert!(!presenting.contains("contenteditable"));
    assert!(!presenting.contains("subtitle"));
}

#[test]
fn test_editing_shows_blank_bullets() {
    let canvas = ChartCanvas::default();
    let slide = Slide::Bullets(BulletsSlide {
        title: "T".to_string(),
        content: "a\n\nb".to_string(),
    });
    let editing = slide_node(&slide, 0, &edit_context(&canvas, &[])).to_html();
    assert_eq!(editing.matches("<li ").count(), 3);
    let presenting = slide_node(&slide, 0, &present_context(&canvas, &[])).to_html();
    assert_eq!(presenting.matches("<li ").count(), 2);
}

#[test]
fn test_empty_chart_renders_placeholder() {
    let canvas = ChartCanvas::default();
    let slide: Slide =
        serde_json::from_str(r#"{"type": "pie-chart", "title": "Empty", "segments": []}"#)
            .expect("Failed to parse slide");
    let html = slide_node(&slide, 0, &present_context(&canvas, &[])).to_html();
    assert!(html.contains("<svg"));
    assert!(html.contains(crate::charts::NO_DATA_MESSAGE));
}

#[test]
fn test_render_document_structure() {
    let catalog = ThemeCatalog::builtin();
    let theme = catalog.get("minimal").expect("theme exists");
    let deck = &theme.default_deck;
    let html = render_document(deck, &theme.style, &ExportOptions::default());

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Minimal</title>"));
    for index in 0..deck.len() {
        assert!(html.contains(&format!(r#"data-index="{}""#, index)));
    }
    assert_eq!(html.matches("<button").count(), deck.len());
    assert!(html.contains(r#"style="width: 25%""#));
    assert!(html.contains(">1 / 4</div>"));
    assert!(html.contains("@media print"));
    assert!(html.contains("--accent: #18181b;"));
}

#[test]
fn test_render_document_does_not_change_deck() {
    let catalog = ThemeCatalog::builtin();
    let theme = catalog.get("midnight").expect("theme exists");
    let deck = theme.default_deck.clone();
    let _ = render_document(&deck, &theme.style, &ExportOptions::default());
    assert_eq!(deck, theme.default_deck);
}

#[test]
fn test_watermark_follows_options() {
    let catalog = ThemeCatalog::builtin();
    let theme = catalog.get("corporate").expect("theme exists");
    let deck = &theme.default_deck;

    let marked = render_document(deck, &theme.style, &ExportOptions::default());
    assert!(marked.contains(r#"id="made-with""#));
    assert!(marked.contains(crate::html::WATERMARK_TEXT));

    let options = ExportOptions {
        watermark: false,
        ..ExportOptions::default()
    };
    let clean = render_document(deck, &theme.style, &options);
    assert!(!clean.contains(r#"id="made-with""#));
    assert!(!clean.contains(crate::html::WATERMARK_TEXT));
}

#[test]
fn test_progress_and_counter() {
    assert_eq!(crate::html::progress_percent(0, 4), 25.0);
    assert_eq!(crate::html::progress_percent(3, 4), 100.0);
    assert_eq!(crate::html::counter_text(1, 5), "2 / 5");
}

#[test]
fn test_builtin_themes() {
    let catalog = ThemeCatalog::builtin();
    let ids: Vec<&str> = catalog.themes().map(|theme| theme.id.as_str()).collect();
    assert_eq!(ids, vec!["minimal", "corporate", "midnight", "startup"]);
    assert!(catalog.themes().all(|theme| !theme.default_deck.is_empty()));
}

// Config, resources and export

#[test]
fn test_config_export_options() {
    let config = Config {
        watermark: false,
        chart_width: 800.0,
        ..Config::default()
    };
    let options = config.export_options(None);
    assert!(!options.watermark);
    assert_eq!(options.canvas.width, 800.0);
    assert!(!Config::default().export_options(Some(false)).watermark);
    assert_eq!(Config::default().debounce(), Duration::from_millis(300));
}

#[test]
fn test_local_stylesheet_embed_and_link() {
    let css_file = create_temp_resource_file("body { font-family: Arial; }");
    let path = css_file.path().to_str().expect("utf-8 path");
    let resource = ResourceFile::new(path);
    assert!(!resource.is_remote);

    let embedded = resource.tag(ResourceMode::Embed).expect("Failed to embed");
    assert!(embedded.starts_with("<style>"));
    assert!(embedded.contains("body { font-family: Arial; }"));

    let linked = resource.tag(ResourceMode::Link).expect("Failed to link");
    assert_eq!(linked, format!(r#"<link rel="stylesheet" href="{}">"#, path));
}

#[test]
fn test_remote_stylesheet_is_linked() {
    let resource = ResourceFile::new("https://example.com/theme.css");
    assert!(resource.is_remote);
    let tag = resource.tag(ResourceMode::Link).expect("Failed to link");
    assert_eq!(
        tag,
        r#"<link rel="stylesheet" href="https://example.com/theme.css">"#
    );
}

#[test]
fn test_remote_stylesheet_is_fetched_when_embedding() {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("Failed to start server");
    let addr = server
        .server_addr()
        .to_ip()
        .expect("Server should listen on TCP");
    let handle = std::thread::spawn(move || {
        let request = server.recv().expect("Failed to receive request");
        let url = request.url().to_string();
        request
            .respond(tiny_http::Response::from_string(".remote { color: blue; }"))
            .expect("Failed to respond");
        url
    });

    let resource = ResourceFile::new(&format!("http://{}/theme.css", addr));
    assert!(resource.is_remote);
    let tag = resource.tag(ResourceMode::Embed).expect("Failed to embed");
    assert_eq!(handle.join().expect("Server thread panicked"), "/theme.css");
    assert_eq!(tag, "<style>\n.remote { color: blue; }\n</style>");
}

#[test]
fn test_stylesheets_extend_theme_style() {
    let css_file = create_temp_resource_file(".slide h1 { color: red; }");
    let resource = ResourceFile::new(css_file.path().to_str().expect("utf-8 path"));
    let mut style = ThemeStyle::default();
    crate::resources::apply_stylesheets(&mut style, &[resource], ResourceMode::Embed)
        .expect("Failed to apply stylesheet");

    let html = render_document(&bullets_deck("a"), &style, &ExportOptions::default());
    assert!(html.contains(".slide h1 { color: red; }"));
}

#[test]
fn test_missing_stylesheet_fails() {
    let resource = ResourceFile::new("/definitely/not/here.css");
    assert!(matches!(
        resource.tag(ResourceMode::Embed),
        Err(SlideError::PathNotFoundError(_))
    ));
    assert!("inline".parse::<ResourceMode>().is_err());
}

#[test]
fn test_suggested_filename() {
    let mut deck = bullets_deck("a");
    deck.name = "Quarterly Review: Q3!".to_string();
    assert_eq!(suggested_filename(&deck), "quarterly-review-q3.html");
    deck.name = "???".to_string();
    assert_eq!(suggested_filename(&deck), "presentation.html");
}

#[test]
fn test_save_and_load_deck() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("nested").join("deck.json");
    let catalog = ThemeCatalog::builtin();
    let deck = catalog
        .get("corporate")
        .expect("theme exists")
        .default_deck
        .clone();

    save_deck(&deck, &path).expect("Failed to save deck");
    let loaded = load_deck(&path).expect("Failed to load deck");
    assert_eq!(loaded, deck);
}

#[test]
fn test_load_deck_errors() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("missing.json");
    assert!(matches!(
        load_deck(&missing),
        Err(SlideError::PathNotFoundError(_))
    ));

    let empty = temp_dir.path().join("empty.json");
    std::fs::write(
        &empty,
        r##"{"name": "E", "accent": "#000", "company": "", "slides": []}"##,
    )
    .expect("Failed to write deck");
    assert!(matches!(
        load_deck(&empty),
        Err(SlideError::ValidationError(_))
    ));

    let broken = temp_dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").expect("Failed to write deck");
    assert!(matches!(
        load_deck(&broken),
        Err(SlideError::DeckFormatError(_))
    ));
}

#[test]
fn test_write_document_creates_parent_directories() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = temp_dir.path().join("out").join("deck.html");
    write_document("<html></html>", &output).expect("Failed to write document");
    assert_eq!(
        std::fs::read_to_string(&output).expect("Failed to read document"),
        "<html></html>"
    );
}

#[test]
fn test_regenerate_output_exports_deck() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let deck_path = temp_dir.path().join("deck.json");
    let html_output = temp_dir.path().join("deck.html");
    save_deck(&bullets_deck("watched"), &deck_path).expect("Failed to save deck");

    let config = WatchConfig {
        deck_path,
        html_output: html_output.clone(),
        ..WatchConfig::default()
    };
    crate::watch::regenerate_output(&config, &ThemeCatalog::builtin())
        .expect("Failed to regenerate");
    let html = std::fs::read_to_string(&html_output).expect("Failed to read output");
    assert!(html.contains("watched"));
}
