use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event as CrosstermEvent, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{
    config,
    core::Round,
    render,
    report::{JsonScoreStore, ScoreRecord, ScoreReporter},
    types::{ColorId, LevelId, Phase},
};

enum Screen {
    Home,
    LevelSelect { selected: usize },
    Playing(Box<PlayState>),
}

struct PlayState {
    level: LevelId,
    round: Round,
    showing_instructions: bool,
}

impl PlayState {
    fn new(level: LevelId) -> Self {
        Self {
            level,
            round: Round::new(config::level(level)),
            showing_instructions: true,
        }
    }
}

pub fn run() -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let reporter = ScoreReporter::spawn(JsonScoreStore::from_env());
    let mut screen = Screen::Home;
    let mut ui_state = UiState::new();

    let mut last_tick = Instant::now();
    let mut pending = Duration::ZERO;
    let mut last_render = Instant::now();
    let render_interval = Duration::from_secs_f32(1.0 / config::RENDER_HZ);

    loop {
        let now = Instant::now();
        pending += now - last_tick;
        last_tick = now;
        let dt_ms = pending.as_millis() as u64;
        pending -= Duration::from_millis(dt_ms);

        if let Screen::Playing(play) = &mut screen {
            if !play.showing_instructions {
                play.round.advance(dt_ms);
                if let Some(result) = play.round.take_result() {
                    log::info!(
                        "round over: level {} score {}",
                        result.level.as_str(),
                        result.score
                    );
                    reporter.submit(ScoreRecord::new(&result));
                }
            }
        }

        while event::poll(Duration::from_millis(0))? {
            let CrosstermEvent::Key(key) = event::read()? else {
                continue;
            };
            if key.code == KeyCode::Char('q') {
                shutdown_terminal(&mut terminal)?;
                return Ok(());
            }
            screen = match screen {
                Screen::Home => match key.code {
                    KeyCode::Enter => Screen::LevelSelect { selected: 0 },
                    KeyCode::Esc => {
                        shutdown_terminal(&mut terminal)?;
                        return Ok(());
                    }
                    _ => Screen::Home,
                },
                Screen::LevelSelect { selected } => match key.code {
                    KeyCode::Up => Screen::LevelSelect {
                        selected: selected.saturating_sub(1),
                    },
                    KeyCode::Down => Screen::LevelSelect {
                        selected: (selected + 1).min(LevelId::ALL.len() - 1),
                    },
                    KeyCode::Char(ch @ '1'..='4') => {
                        let idx = ch as usize - '1' as usize;
                        Screen::Playing(Box::new(PlayState::new(LevelId::ALL[idx])))
                    }
                    KeyCode::Enter => {
                        Screen::Playing(Box::new(PlayState::new(LevelId::ALL[selected])))
                    }
                    KeyCode::Esc | KeyCode::Char('b') => Screen::Home,
                    _ => Screen::LevelSelect { selected },
                },
                Screen::Playing(mut play) => {
                    if play.showing_instructions {
                        match key.code {
                            KeyCode::Enter | KeyCode::Char(' ') => {
                                play.showing_instructions = false;
                                Screen::Playing(play)
                            }
                            KeyCode::Esc => Screen::LevelSelect { selected: 0 },
                            _ => Screen::Playing(play),
                        }
                    } else {
                        match (play.round.phase(), key.code) {
                            (Phase::Running, KeyCode::Left | KeyCode::Char('a')) => {
                                play.round.steer_left();
                                Screen::Playing(play)
                            }
                            (Phase::Running, KeyCode::Right | KeyCode::Char('d')) => {
                                play.round.steer_right();
                                Screen::Playing(play)
                            }
                            (Phase::Running, KeyCode::Char('p') | KeyCode::Esc) => {
                                play.round.pause();
                                Screen::Playing(play)
                            }
                            (Phase::Paused, KeyCode::Char('r') | KeyCode::Enter) => {
                                play.round.resume();
                                Screen::Playing(play)
                            }
                            (Phase::Paused, KeyCode::Char('h')) => {
                                Screen::LevelSelect { selected: 0 }
                            }
                            (Phase::Over, KeyCode::Char('r') | KeyCode::Enter) => {
                                let level = play.level;
                                Screen::Playing(Box::new(PlayState {
                                    level,
                                    round: Round::new(config::level(level)),
                                    showing_instructions: false,
                                }))
                            }
                            (Phase::Over, KeyCode::Char('h')) => {
                                Screen::LevelSelect { selected: 0 }
                            }
                            _ => Screen::Playing(play),
                        }
                    }
                }
            };
        }

        if last_render.elapsed() >= render_interval {
            terminal.draw(|frame| {
                let size = frame.size();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(3),
                        Constraint::Length(3),
                    ])
                    .split(size);

                let header = Paragraph::new(header_text(&screen))
                    .block(Block::default().borders(Borders::ALL).title("wordfall"));
                frame.render_widget(header, chunks[0]);

                match &screen {
                    Screen::Home => draw_home(frame, chunks[1]),
                    Screen::LevelSelect { selected } => {
                        draw_level_select(frame, chunks[1], *selected)
                    }
                    Screen::Playing(play) => {
                        draw_playfield(frame, chunks[1], play, &mut ui_state);
                        if play.showing_instructions {
                            draw_instructions(frame, size, play.level);
                        } else {
                            match play.round.phase() {
                                Phase::Paused => draw_pause_menu(frame, size),
                                Phase::Resuming(secs) => draw_countdown(frame, size, secs),
                                Phase::Over => draw_game_over(frame, size, play.round.score()),
                                Phase::Running => {}
                            }
                        }
                    }
                }

                let footer = Paragraph::new(footer_text(&screen))
                    .block(Block::default().borders(Borders::ALL).title("Controls"));
                frame.render_widget(footer, chunks[2]);
            })?;
            last_render = Instant::now();
        }

        std::thread::sleep(Duration::from_millis(1));
    }
}

fn shutdown_terminal(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<(), Box<dyn Error>> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn header_text(screen: &Screen) -> String {
    match screen {
        Screen::Home => "Word Fall - phonics catch game".to_string(),
        Screen::LevelSelect { .. } => "Choose a level".to_string(),
        Screen::Playing(play) => format!(
            "Score: {} | Time: {}s | {}",
            play.round.score(),
            play.round.seconds_remaining(),
            play.level.title()
        ),
    }
}

fn footer_text(screen: &Screen) -> String {
    match screen {
        Screen::Home => "Enter: play | q: quit".to_string(),
        Screen::LevelSelect { .. } => "↑↓/1-4: select | Enter: start | Esc: back | q: quit".to_string(),
        Screen::Playing(play) => {
            if play.showing_instructions {
                "Enter: start | Esc: back | q: quit".to_string()
            } else {
                match play.round.phase() {
                    Phase::Running => "←→/a d: move | p: pause | q: quit".to_string(),
                    Phase::Paused => "r: resume | h: levels | q: quit".to_string(),
                    Phase::Resuming(_) => "get ready...".to_string(),
                    Phase::Over => "r: play again | h: levels | q: quit".to_string(),
                }
            }
        }
    }
}

fn draw_home(frame: &mut ratatui::Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "W O R D   F A L L",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Catch the words that match the level's vowel sound."),
        Line::from("Catching anything else costs points."),
        Line::from(""),
        Line::from("Press Enter to pick a level."),
    ];
    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(body, area);
}

fn draw_level_select(frame: &mut ratatui::Frame, area: Rect, selected: usize) {
    let mut lines = vec![Line::from("")];
    for (idx, level) in LevelId::ALL.into_iter().enumerate() {
        let cfg = config::level(level);
        let text = format!(
            "{} {}. {:<12} {:<8} +/-{} points",
            if idx == selected { ">" } else { " " },
            idx + 1,
            level.title(),
            level.difficulty(),
            cfg.catch_delta,
        );
        let style = if idx == selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(text, style)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        LevelId::ALL[selected].rule(),
        Style::default().fg(Color::DarkGray),
    )));
    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(body, area);
}

fn draw_playfield(
    frame: &mut ratatui::Frame,
    area: Rect,
    play: &PlayState,
    ui_state: &mut UiState,
) {
    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);
    ui_state.ensure_viewport(inner_width, inner_height);
    render::draw(
        play.round.words(),
        play.round.markers(),
        play.round.player_lane(),
        play.round.config().lane_count,
        render::Viewport {
            width: inner_width,
            height: inner_height,
        },
        &mut ui_state.framebuf,
    );

    let framebuf = &ui_state.framebuf;
    let lines: Vec<Line> = (0..framebuf.height())
        .map(|y| {
            let mut spans: Vec<Span> = Vec::with_capacity(framebuf.width() as usize);
            for x in 0..framebuf.width() {
                let cell = framebuf.get(x, y);
                spans.push(Span::styled(
                    cell.ch.to_string(),
                    Style::default().fg(color_for(cell.color)),
                ));
            }
            Line::from(spans)
        })
        .collect();

    let playfield = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(playfield, area);
}

fn draw_instructions(frame: &mut ratatui::Frame, size: Rect, level: LevelId) {
    let cfg = config::level(level);
    let targets: Vec<&str> = cfg
        .catalog
        .iter()
        .filter(|w| w.is_target)
        .take(4)
        .map(|w| w.text)
        .collect();
    let distractors: Vec<&str> = cfg
        .catalog
        .iter()
        .filter(|w| !w.is_target)
        .take(4)
        .map(|w| w.text)
        .collect();
    let lines = vec![
        Line::from(Span::styled(
            format!("{} level", level.title()),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(level.rule()),
        Line::from(""),
        Line::from(format!("catch:  {}  (+{})", targets.join(", "), cfg.catch_delta)),
        Line::from(format!("avoid:  {}  (-{})", distractors.join(", "), cfg.miss_delta)),
        Line::from(""),
        Line::from(format!("You have {} seconds. Good luck!", cfg.round_duration_secs)),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to start",
            Style::default().fg(Color::Yellow),
        )),
    ];
    draw_modal(frame, size, "How to play", lines, 50, 14);
}

fn draw_pause_menu(frame: &mut ratatui::Frame, size: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "PAUSED",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("r: resume    h: back to levels"),
    ];
    draw_modal(frame, size, "Pause", lines, 40, 8);
}

fn draw_countdown(frame: &mut ratatui::Frame, size: Rect, secs: u8) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{secs}"),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
    ];
    draw_modal(frame, size, "Resuming", lines, 20, 6);
}

fn draw_game_over(frame: &mut ratatui::Frame, size: Rect, score: u32) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "TIME'S UP!",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Final score: {score}")),
        Line::from(""),
        Line::from("r: play again    h: back to levels"),
    ];
    draw_modal(frame, size, "Round over", lines, 44, 10);
}

fn draw_modal(
    frame: &mut ratatui::Frame,
    size: Rect,
    title: &str,
    lines: Vec<Line>,
    width: u16,
    height: u16,
) {
    let area = centered_rect(size, width, height);
    frame.render_widget(Clear, area);
    let modal = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(modal, area);
}

fn centered_rect(outer: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(outer.width);
    let height = height.min(outer.height);
    Rect {
        x: outer.x + (outer.width - width) / 2,
        y: outer.y + (outer.height - height) / 2,
        width,
        height,
    }
}

struct UiState {
    framebuf: render::FrameBuffer,
}

impl UiState {
    fn new() -> Self {
        Self {
            framebuf: render::FrameBuffer::new(0, 0),
        }
    }

    fn ensure_viewport(&mut self, width: u16, height: u16) {
        if self.framebuf.width() != width || self.framebuf.height() != height {
            self.framebuf.resize(width, height);
        }
    }
}

fn color_for(color: ColorId) -> Color {
    match color {
        ColorId::White => Color::White,
        ColorId::Yellow => Color::Yellow,
        ColorId::Green => Color::Green,
        ColorId::Red => Color::Red,
        ColorId::Cyan => Color::Cyan,
        ColorId::Gray => Color::DarkGray,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_fits_inside_the_outer_area() {
        let outer = Rect {
            x: 0,
            y: 0,
            width: 80,
            height: 24,
        };
        let rect = centered_rect(outer, 40, 10);
        assert_eq!(rect.width, 40);
        assert_eq!(rect.height, 10);
        assert!(rect.x + rect.width <= outer.width);
        assert!(rect.y + rect.height <= outer.height);
    }

    #[test]
    fn centered_rect_clamps_to_a_small_terminal() {
        let outer = Rect {
            x: 0,
            y: 0,
            width: 20,
            height: 5,
        };
        let rect = centered_rect(outer, 50, 14);
        assert_eq!(rect.width, 20);
        assert_eq!(rect.height, 5);
    }
}
