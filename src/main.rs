use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use gruepanel::backend::TerminalSurface;
use gruepanel::input::InputMode;
use gruepanel::line::StyleId;
use gruepanel::metrics::{CellMetrics, BLACK};
use gruepanel::panel::{BottomPanel, Interpreter, PanelEvent, Redraw};
use gruepanel::render::DrawOp;
use log::info;

const NORMAL: StyleId = StyleId(0);
const PROMPT: StyleId = StyleId(2);
const INPUT: StyleId = StyleId(1);

/// Toy interpreter for the demo: responses are queued rather than appended
/// directly, since the panel is borrowed while the event is being handled.
struct DemoInterpreter {
    pending: Vec<String>,
    quit: bool,
}

impl DemoInterpreter {
    fn new() -> Self {
        DemoInterpreter {
            pending: Vec::new(),
            quit: false,
        }
    }
}

impl Interpreter for DemoInterpreter {
    fn on_committed_line(&mut self, line: &str) {
        info!("committed: {:?}", line);
        match line.trim() {
            "quit" => self.quit = true,
            "" => self.pending.push("Beg pardon?\n".to_string()),
            cmd => self
                .pending
                .push(format!("I don't know the word \"{}\".\n", cmd)),
        }
    }

    fn on_character(&mut self, ch: char) {
        info!("character: {:?}", ch);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    if atty::is(atty::Stream::Stdout) && atty::is(atty::Stream::Stdin) {
        run_interactive()
    } else {
        run_scripted();
        Ok(())
    }
}

/// Full-screen demo: type at the prompt, up/down recalls history,
/// "quit" or Esc exits.
fn run_interactive() -> Result<(), Box<dyn std::error::Error>> {
    let mut surface = TerminalSurface::new()?;
    let (cols, rows) = surface.size();
    let mut panel = BottomPanel::new(Box::new(CellMetrics), cols as u32, rows as u32, NORMAL);
    panel.set_mode(InputMode::Line);
    panel.set_user_input_style(INPUT);
    let mut interp = DemoInterpreter::new();

    panel.append_styled_text(
        "GRUEPANEL DEMO\nAn empty room, lit by a single bulb.\nType something; \
         \"quit\" leaves.\n",
        NORMAL,
    );
    panel.append_styled_text("> ", PROMPT);
    repaint(&mut surface, &panel, Redraw::Full)?;

    loop {
        let mut redraw = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if key.code == KeyCode::Esc
                    || (key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL))
                {
                    break;
                }
                match key.code {
                    KeyCode::Char(ch) => panel.handle_event(PanelEvent::Char(ch), &mut interp),
                    KeyCode::Enter => panel.handle_event(PanelEvent::Enter, &mut interp),
                    KeyCode::Backspace => panel.handle_event(PanelEvent::Backspace, &mut interp),
                    KeyCode::Up => panel.handle_event(PanelEvent::HistoryOlder, &mut interp),
                    KeyCode::Down => panel.handle_event(PanelEvent::HistoryNewer, &mut interp),
                    _ => Redraw::None,
                }
            }
            Event::Resize(w, h) => {
                surface.handle_resize(w, h);
                panel.handle_event(
                    PanelEvent::Resize {
                        width_px: w as u32,
                        height_px: h as u32,
                    },
                    &mut interp,
                )
            }
            _ => Redraw::None,
        };

        for response in interp.pending.drain(..).collect::<Vec<_>>() {
            panel.append_styled_text(&response, NORMAL);
            panel.append_styled_text("> ", PROMPT);
            redraw = Redraw::Full;
        }
        if interp.quit {
            break;
        }
        repaint(&mut surface, &panel, redraw)?;
    }

    Ok(())
}

/// Blank the affected rows, then replay the panel's draw operations.
fn repaint(
    surface: &mut TerminalSurface,
    panel: &BottomPanel,
    redraw: Redraw,
) -> Result<(), Box<dyn std::error::Error>> {
    let (cols, _) = surface.size();
    let (from, to) = match redraw {
        Redraw::None => return Ok(()),
        Redraw::Rows { from, to } => (from, to),
        Redraw::Full => (0, panel.rows_per_page() - 1),
    };
    let mut ops = Vec::new();
    for row in from..=to {
        ops.push(DrawOp::FillRect {
            x: 0,
            y: row as u32,
            width: cols as u32,
            height: 1,
            color: BLACK,
        });
    }
    ops.extend(panel.render(from, to)?);
    surface.apply(&ops)?;
    Ok(())
}

/// Non-tty fallback: replay a canned transcript and dump each page state as
/// plain text, one line per screen row.
fn run_scripted() {
    let mut panel = BottomPanel::new(Box::new(CellMetrics), 40, 10, NORMAL);
    panel.set_user_input_style(INPUT);
    let mut interp = DemoInterpreter::new();

    panel.append_styled_text(
        "GRUEPANEL DEMO\nYou are standing in an open field west of a white house, \
         with a boarded front door.\n",
        NORMAL,
    );
    for cmd in ["open mailbox", "read leaflet", "go north"] {
        panel.append_styled_text("> ", PROMPT);
        for ch in cmd.chars() {
            panel.handle_event(PanelEvent::Char(ch), &mut interp);
        }
        panel.handle_event(PanelEvent::Enter, &mut interp);
        for response in interp.pending.drain(..).collect::<Vec<_>>() {
            panel.append_styled_text(&response, NORMAL);
        }
    }

    println!("+{}+", "-".repeat(40));
    for row in 0..panel.rows_per_page() {
        let mut text_row = vec![' '; 40];
        for op in panel.render(row, row).unwrap_or_default() {
            if let DrawOp::Text { x, text, .. } = op {
                for (i, ch) in text.chars().enumerate() {
                    let col = x as usize + i;
                    if col < text_row.len() {
                        text_row[col] = ch;
                    }
                }
            }
        }
        println!("|{}|", text_row.into_iter().collect::<String>());
    }
    println!("+{}+", "-".repeat(40));
}
