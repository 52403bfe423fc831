use slidecraft::bridge::{Command, SurfaceEvent, ViewUpdate};
use slidecraft::charts::ChartCanvas;
use slidecraft::{
    load_deck, render_document, save_deck, Bridge, Column, EditorSession, ExportOptions,
    FieldPath, SlideKind, TextField, ThemeCatalog,
};
use std::fs;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn type_text(bridge: &mut Bridge, session: &mut EditorSession, slide: usize, path: FieldPath, text: &str, at: Instant) {
    bridge.handle(
        session,
        SurfaceEvent::Input {
            slide,
            path,
            text: text.to_string(),
        },
        at,
    );
}

#[test]
fn test_edit_session_to_exported_document() {
    let catalog = ThemeCatalog::builtin();
    let theme = catalog.get("startup").expect("theme exists");
    let mut session = EditorSession::start(&catalog, "startup").expect("Failed to start session");
    let mut bridge = Bridge::new(
        theme.style.clone(),
        ChartCanvas::default(),
        Duration::from_millis(300),
    );
    let start = Instant::now();

    // Retitle the opening slide and let the write settle.
    type_text(
        &mut bridge,
        &mut session,
        0,
        FieldPath::Text(TextField::Title),
        "Seedling *2.0*",
        start,
    );
    let updates = bridge.poll(&mut session, start + Duration::from_secs(1));
    assert_eq!(updates.len(), 1);

    // Add a bullets slide and grow its list from the keyboard.
    let response = bridge.apply(&mut session, Command::AddSlide(SlideKind::Bullets));
    let added = session.current_slide();
    assert!(response.updates.contains(&ViewUpdate::SelectSlide(added)));

    let first = FieldPath::Bullet {
        column: Column::Main,
        index: 0,
    };
    bridge.handle(
        &mut session,
        SurfaceEvent::Enter {
            slide: added,
            path: first,
            text: "Launch in **spring**".to_string(),
        },
        start,
    );
    type_text(
        &mut bridge,
        &mut session,
        added,
        FieldPath::Bullet {
            column: Column::Main,
            index: 1,
        },
        "Hire two growers",
        start,
    );
    bridge.flush(&mut session);

    // Turn the pie chart into a table and drop the stats slide.
    let pie = session
        .deck()
        .slides
        .iter()
        .position(|slide| slide.kind() == Some(SlideKind::PieChart))
        .expect("startup deck has a pie chart");
    bridge.apply(
        &mut session,
        Command::ChangeSlideType {
            slide: pie,
            kind: SlideKind::Table,
        },
    );
    let stats = session
        .deck()
        .slides
        .iter()
        .position(|slide| slide.kind() == Some(SlideKind::Stats))
        .expect("startup deck has stats");
    bridge.apply(&mut session, Command::RemoveSlide(stats));

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let deck_path = temp_dir.path().join("pitch.json");
    save_deck(session.deck(), &deck_path).expect("Failed to save deck");
    let reloaded = load_deck(&deck_path).expect("Failed to load deck");
    assert_eq!(reloaded, *session.deck());

    let html = render_document(&reloaded, &theme.style, &ExportOptions::default());
    let html_path = temp_dir.path().join(slidecraft::suggested_filename(&reloaded));
    slidecraft::write_document(&html, &html_path).expect("Failed to write document");
    let written = fs::read_to_string(&html_path).expect("Failed to read document");

    assert!(html_path.ends_with("pitch.html"));
    assert!(written.contains("Seedling <em>2.0</em>"));
    assert!(written.contains("Launch in <strong>spring</strong>"));
    assert!(written.contains("Hire two growers"));
    assert!(written.contains(r#"data-type="table""#));
    assert!(!written.contains(r#"data-type="stats""#));
    assert!(!written.contains("contenteditable"));
    assert_eq!(written.matches("<section ").count(), reloaded.len());
}

#[test]
fn test_thumbnails_track_the_deck() {
    let catalog = ThemeCatalog::builtin();
    let mut session = EditorSession::start(&catalog, "midnight").expect("Failed to start session");
    let mut bridge = Bridge::new(
        catalog.get("midnight").expect("theme exists").style.clone(),
        ChartCanvas::default(),
        Duration::from_millis(300),
    );

    assert_eq!(bridge.thumbnails(&session).len(), session.deck().len());

    let response = bridge.apply(&mut session, Command::DuplicateSlide(1));
    let rebuilt = response.updates.iter().find_map(|update| match update {
        ViewUpdate::RebuildThumbnails(thumbnails) => Some(thumbnails.len()),
        _ => None,
    });
    assert_eq!(rebuilt, Some(4));
    assert_eq!(session.current_slide(), 2);

    let editable = bridge
        .render_editable(&session, 2)
        .expect("slide exists");
    assert!(editable.contains(r#"class="chart-data""#));
    assert!(editable.contains(r#"data-field="series.1.data.0.label""#));
    assert!(bridge.render_editable(&session, 40).is_none());
}
