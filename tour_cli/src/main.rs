use anyhow::Context;
use std::env;
use std::str::FromStr;
use tour_core::kurbo::{Point, Rect, Size};
use tracing_subscriber::EnvFilter;

fn print_help() {
    println!(
        r#"Tour CLI

            Commands:
            new <tour.json> <tour_name>
            list <tour.json>
            add-block <tour.json> <type> <row> <column> [<width> <height>]
            load <tour.json>
            pairs <tour.json>
            replay <tour.json> <script.txt> [--save]
            repl <tour.json>

            Examples:
            cargo run -p tour_cli -- new walk.json "Old Town"
            cargo run -p tour_cli -- add-block walk.json map_point 1 1 2 1
            cargo run -p tour_cli -- list walk.json
            cargo run -p tour_cli -- repl walk.json
        "#
    );
}

use std::io::{self, Write};

/// The REPL has no window, so it edits against a fixed virtual canvas:
/// palette templates stacked at the left, 100px cells from x=200.
const CANVAS_ORIGIN: Point = Point::new(200.0, 0.0);
const CELL: Size = Size::new(100.0, 100.0);

fn virtual_layout(rows: u32) -> tour_core::CanvasLayout {
    tour_core::CanvasLayout::from_cells(CANVAS_ORIGIN, CELL, rows)
}

fn palette_template(block_type: tour_core::BlockType) -> Rect {
    let y = f64::from(block_type.tag()) * 50.0;
    Rect::new(0.0, y, 150.0, y + 40.0)
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("tour_core=info".parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn print_blocks(tour: &tour_core::Tour) -> anyhow::Result<()> {
    println!("Blocks:");
    for b in tour.blocks.blocks()? {
        let (row, col, end_row, end_col) = b.position.area();
        println!(
            "  #{:>3} | {:<10} | rows {}..{} cols {}..{} | {}",
            b.id, b.block_type, row, end_row, col, end_col, b.name
        );
    }
    Ok(())
}

fn print_panel(session: &tour_core::EditorSession) {
    let Some(id) = session.panel.block() else {
        println!("(nothing selected)");
        return;
    };
    println!("Block #{id}:");
    for field in tour_core::panel::PANEL_FIELDS {
        let mark = if session.panel.is_enabled(field) { ' ' } else { '-' };
        println!("  {mark} {:<12} = {}", field, session.panel.value(field));
    }
}

fn print_canvas(session: &tour_core::EditorSession) {
    let layout = session.layout();
    println!(
        "Canvas: {:?}, {} rows of {}x{} cells",
        layout.rect,
        layout.rows,
        layout.cell_size().width,
        layout.cell_size().height
    );
    for (id, pos) in session.scene.docked() {
        println!("  #{:>3} at {:?}", id, pos.pixel_rect(layout));
    }
    if let Some(f) = session.scene.floating() {
        println!("  floating {:?} at {:?}", f.element, f.rect());
    }
}

/// `palette <type> <x> <y>` spelled out with its template box.
fn palette_short_form(parts: &[&str]) -> Option<String> {
    let [verb, kind, x, y] = parts else {
        return None;
    };
    if !verb.eq_ignore_ascii_case("palette") {
        return None;
    }
    let block_type = tour_core::BlockType::from_str(kind).ok()?;
    let t = palette_template(block_type);
    Some(format!(
        "palette {} {} {} {} {} {} {}",
        block_type, t.x0, t.y0, t.x1, t.y1, x, y
    ))
}

fn check_column(column: i32) -> anyhow::Result<()> {
    if !(1..=tour_core::GRID_COLUMNS).contains(&column) {
        anyhow::bail!("column must be between 1 and {}", tour_core::GRID_COLUMNS);
    }
    Ok(())
}

fn replay_file(path: &str, session: &mut tour_core::EditorSession) -> anyhow::Result<()> {
    let script = std::fs::read_to_string(path).with_context(|| format!("read script '{path}'"))?;
    let statuses = tour_core::script::run_script(&script, session)?;
    for status in statuses {
        if let tour_core::script::ApplyStatus::Applied(Some(outcome)) = status {
            println!("  {outcome:?}");
        }
    }
    Ok(())
}

fn repl(tour_path: &str) -> anyhow::Result<()> {
    let tour = tour_core::Tour::load_json_file(tour_path)?;
    let rows = tour.config.min_rows;
    let mut session = tour_core::EditorSession::new(tour, virtual_layout(rows))?;
    let rows = session.rows_needed();
    session.set_layout(virtual_layout(rows));

    println!("Loaded tour: {}", session.tour.name);
    println!("Type 'help' for commands. 'quit' to exit.");

    loop {
        print!("tour> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            // EOF (Ctrl+D)
            break;
        }
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();

        // Short palette form: the template box comes from the virtual palette.
        let expanded;
        let line = match palette_short_form(&parts) {
            Some(full) => {
                expanded = full;
                expanded.as_str()
            }
            None => line,
        };

        // before splitting into "cmd words"
        match tour_core::script::try_apply_pointer_line(line, &mut session) {
            Ok(tour_core::script::ApplyStatus::Applied(outcome)) => {
                if let Some(outcome) = outcome {
                    println!("(pointer) {outcome:?}");
                    let rows = session.rows_needed();
                    session.set_layout(virtual_layout(rows));
                }
                continue;
            }
            Ok(tour_core::script::ApplyStatus::Incomplete) => {
                println!("(pointer) incomplete input…");
                continue;
            }
            Ok(tour_core::script::ApplyStatus::NotPointer) => {
                // fall through to the editor commands below
            }
            Err(e) => {
                println!("(pointer) {e}");
                continue;
            }
        }

        match cmd.as_str() {
            "help" => {
                println!(
                    r#"Commands:
                        press <x> <y> [primary|secondary|middle]
                        palette <type> <x> <y>      (grab a palette template)
                        move <x> <y>
                        release <x> <y>
                        add <type> <row> <column>
                        select <id>|none
                        set <field> <value...>
                        panel
                        list
                        canvas
                        ghost
                        types
                        pairs
                        replay <script.txt>
                        save
                        quit
                        "#
                );
            }
            "quit" | "exit" => break,

            "list" => print_blocks(&session.tour)?,
            "panel" => print_panel(&session),
            "canvas" => print_canvas(&session),

            "ghost" => match session.scene.ghost.marker() {
                Some(pos) => println!("Ghost at {:?}", pos.area()),
                None => println!("No ghost"),
            },

            "types" => {
                use strum::IntoEnumIterator;
                for t in tour_core::BlockType::iter() {
                    println!("  {} {:<10} template {:?}", t.tag(), t, palette_template(t));
                }
            }

            "add" => {
                if parts.len() != 4 {
                    println!("Usage: add <type> <row> <column>");
                    continue;
                }
                let Ok(block_type) = tour_core::BlockType::from_str(parts[1]) else {
                    println!("Unknown block type: {}", parts[1]);
                    continue;
                };
                let (Ok(row), Ok(col)) = (parts[2].parse::<i32>(), parts[3].parse::<i32>()) else {
                    println!("Row and column must be numbers");
                    continue;
                };
                if let Err(e) = check_column(col) {
                    println!("{e}");
                    continue;
                }
                let mut pos = tour_core::Position::cell(row, col);
                pos.clamp_to_bounds();
                match session.insert_block(pos, block_type) {
                    Ok(id) => {
                        println!("Added block #{id}");
                        let rows = session.rows_needed();
                        session.set_layout(virtual_layout(rows));
                    }
                    Err(e) => println!("{e}"),
                }
            }

            "select" => {
                let target = match parts.get(1) {
                    Some(&"none") => None,
                    Some(s) => match s.parse::<tour_core::BlockId>() {
                        Ok(id) => Some(id),
                        Err(_) => {
                            println!("Usage: select <id>|none");
                            continue;
                        }
                    },
                    None => {
                        println!("Usage: select <id>|none");
                        continue;
                    }
                };
                match session.select(target) {
                    Ok(()) => print_panel(&session),
                    Err(e) => println!("{e}"),
                }
            }

            "set" => {
                if parts.len() < 2 {
                    println!("Usage: set <field> <value...>");
                    continue;
                }
                let Ok(field) = tour_core::Field::from_str(parts[1]) else {
                    println!("Unknown field: {}", parts[1]);
                    continue;
                };
                let value = parts[2..].join(" ");
                match session.edit_field(field, &value) {
                    Ok(()) => println!("{field} = {}", session.panel.value(field)),
                    Err(e) => println!("{e}"),
                }
            }

            "pairs" => {
                for (k, v) in session.tour.blocks.to_pairs() {
                    println!("  {k} = {v}");
                }
            }

            "replay" => {
                let Some(path) = parts.get(1) else {
                    println!("Usage: replay <script.txt>");
                    continue;
                };
                if let Err(e) = replay_file(path, &mut session) {
                    println!("{e:#}");
                }
                let rows = session.rows_needed();
                session.set_layout(virtual_layout(rows));
            }

            "save" => {
                if !session.is_idle() {
                    println!("Finish the current gesture first");
                    continue;
                }
                session.tour.save_json_file(tour_path)?;
                println!("Saved {}", tour_path);
            }

            _ => println!("Unknown command. Type 'help'."),
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "new" => {
            let path = args.get(2).context("missing <tour.json>")?;
            let name = args.get(3).context("missing <tour_name>")?;
            let tour = tour_core::Tour::new(name);
            tour.save_json_file(path)?;
            println!("Created tour '{}' in {}", name, path);
            println!("Tip: run `add-block` or `repl` to start placing blocks.");
        }
        "load" => {
            let path = args.get(2).context("missing <tour.json>")?;
            let tour = tour_core::Tour::load_json_file(path)?;
            println!("Loaded tour: {}", tour.name);
            println!(
                "Blocks: {}, canvas height: {} rows",
                tour.blocks.block_count(),
                tour.blocks.canvas_height()?
            );
        }
        "add-block" => {
            let path = args.get(2).context("missing <tour.json>")?;
            let block_type = tour_core::BlockType::from_str(args.get(3).context("missing <type>")?)?;
            let row: i32 = args
                .get(4)
                .context("missing <row>")?
                .parse()
                .context("row must be a number")?;
            let column: i32 = args
                .get(5)
                .context("missing <column>")?
                .parse()
                .context("column must be a number")?;
            check_column(column)?;
            let width: i32 = match args.get(6) {
                Some(w) => w.parse().context("width must be a number")?,
                None => 1,
            };
            let height: i32 = match args.get(7) {
                Some(h) => h.parse().context("height must be a number")?,
                None => 1,
            };

            let mut tour = tour_core::Tour::load_json_file(path)
                .with_context(|| format!("failed to load tour file '{path}'"))?;

            let mut position = tour_core::Position::cell(row, column);
            position.resize(width, height);
            position.clamp_to_bounds();

            let id = tour.blocks.create_block(block_type);
            tour.blocks.write_position(id, &position)?;
            tour.save_json_file(path)?;
            println!("Added block #{} and saved {}", id, path);
        }
        "list" => {
            let path = args.get(2).context("missing <tour.json>")?;
            let tour = tour_core::Tour::load_json_file(path)?;
            println!("Tour: {}", tour.name);
            print_blocks(&tour)?;
        }
        "pairs" => {
            let path = args.get(2).context("missing <tour.json>")?;
            let tour = tour_core::Tour::load_json_file(path)?;
            println!("name = {}", tour.name);
            for (k, v) in tour.blocks.to_pairs() {
                println!("{k} = {v}");
            }
        }
        "replay" => {
            let path = args.get(2).context("missing <tour.json>")?;
            let script = args.get(3).context("missing <script.txt>")?;
            let save = args.get(4).is_some_and(|a| a == "--save");

            let tour = tour_core::Tour::load_json_file(path)?;
            let rows = tour.config.min_rows;
            let mut session = tour_core::EditorSession::new(tour, virtual_layout(rows))?;
            replay_file(script, &mut session)
                .with_context(|| format!("replay '{script}' against '{path}'"))?;
            tracing::debug!(blocks = session.tour.blocks.block_count(), "replay finished");
            print_blocks(&session.tour)?;
            if save {
                session.tour.save_json_file(path)?;
                println!("Saved {}", path);
            }
        }
        "repl" => {
            let path = args.get(2).context("missing <tour.json>")?;
            repl(path)?;
        }

        _ => print_help(),
    }

    Ok(())
}
