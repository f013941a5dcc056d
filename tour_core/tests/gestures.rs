use kurbo::Rect;
use proptest::prelude::*;
use tour_core::script::{ApplyStatus, run_script};
use tour_core::{
    BlockForm, BlockType, CanvasLayout, EditorSession, Field, GestureOutcome, Position, Scene,
    Tour,
};

/// A 400x800 canvas at x=200 with 100px cells, palette to its left.
fn session() -> anyhow::Result<EditorSession> {
    let layout = CanvasLayout::new(Rect::new(200.0, 0.0, 600.0, 800.0), 8);
    Ok(EditorSession::new(Tour::new("Old town"), layout)?)
}

#[test]
fn build_a_small_tour_by_pointer() -> anyhow::Result<()> {
    let mut s = session()?;

    let statuses = run_script(
        r#"
        # a text block into row 1, column 1
        palette text 0 0 150 40 20 20
        move 250 50
        release 250 50

        # an image block into row 1, column 3
        palette image 0 50 150 90 20 60
        move 450 50
        release 450 50

        # widen the text block over column 2
        press 295 50
        move 350 150
        release 350 150

        # move the image block down two rows
        press 450 50
        move 450 250
        release 450 250
        "#,
        &mut s,
    )?;

    let outcomes: Vec<_> = statuses
        .into_iter()
        .filter_map(|st| match st {
            ApplyStatus::Applied(Some(outcome)) => Some(outcome),
            _ => None,
        })
        .collect();
    assert_eq!(
        outcomes,
        vec![
            GestureOutcome::Created(0),
            GestureOutcome::Created(1),
            GestureOutcome::Resized(0),
            GestureOutcome::Moved(1),
        ]
    );

    assert_eq!(
        Position::from_block(&s.tour.blocks, 0)?,
        Position::from_corners(1, 1, 3, 3)
    );
    assert_eq!(Position::from_block(&s.tour.blocks, 1)?, Position::cell(3, 3));
    assert_eq!(s.selection.current(), Some(1));
    assert!(s.panel.is_enabled(Field::ContentPath));
    assert_eq!(s.tour.blocks.canvas_height()?, 3);
    assert!(s.is_idle());
    Ok(())
}

#[test]
fn palette_drop_outside_leaves_block_count_unchanged() -> anyhow::Result<()> {
    let mut s = session()?;
    run_script("palette link 0 0 150 40 20 20\nmove 100 300\nrelease 100 300", &mut s)?;
    assert_eq!(s.tour.blocks.block_count(), 0);
    assert!(s.scene.floating().is_none());
    Ok(())
}

#[test]
fn edited_tour_survives_save_and_reopen() -> anyhow::Result<()> {
    let mut s = session()?;
    run_script("palette map_point 0 0 150 40 20 20\nrelease 350 250", &mut s)?;
    s.edit_field(Field::Name, "Town hall")?;
    s.edit_field(Field::ShowOnMap, "on")?;
    s.edit_field(Field::Latitude, "55.75")?;

    let path = std::env::temp_dir().join(format!("tour_gestures_{}.json", std::process::id()));
    s.tour.save_json_file(&path)?;
    let tour = Tour::load_json_file(&path)?;
    std::fs::remove_file(&path)?;

    let reopened = EditorSession::new(tour, *s.layout())?;
    let blocks = reopened.tour.blocks.blocks()?;
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].name, "Town hall");
    assert!(blocks[0].show_on_map);
    assert_eq!(blocks[0].latitude, 55.75);
    assert_eq!(blocks[0].position, Position::cell(3, 2));
    assert_eq!(reopened.scene.placement(0), Some(Position::cell(3, 2)));
    Ok(())
}

proptest! {
    #[test]
    fn commit_then_read_back_is_identity(
        row in 1i32..40,
        column in 1i32..5,
        height in 1i32..6,
        width in 1i32..5,
    ) {
        let mut form = BlockForm::new();
        let mut scene = Scene::new();
        let id = form.create_block(BlockType::Text);

        let mut pos = Position::cell(row, column);
        pos.resize(width, height);
        pos.clamp_to_bounds();
        pos.commit_to_block(id, &mut form, &mut scene).unwrap();

        let back = Position::from_block(&form, id).unwrap();
        prop_assert_eq!(back.area(), pos.area());
    }
}
