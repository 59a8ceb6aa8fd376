use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use house_estimator::{
    clamp_manual_size, estimate, EstimateResult, PostalCode, MANUAL_SIZE_STEP, MAX_MANUAL_SIZE,
    MIN_MANUAL_SIZE,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    SizeSlider,
}

impl Focus {
    pub fn next(&self) -> Self {
        match self {
            Focus::Input => Focus::SizeSlider,
            Focus::SizeSlider => Focus::Input,
        }
    }
}

pub struct App {
    pub input: String,
    pub focus: Focus,
    pub result: Option<EstimateResult>,
    pub error: Option<String>,
    /// Size the estimator produced, shown next to a manual override
    pub estimated_size: Option<u32>,
}

impl App {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            focus: Focus::Input,
            result: None,
            error: None,
            estimated_size: None,
        }
    }

    /// Estimate whatever is in the input box
    pub fn submit(&mut self) {
        match PostalCode::parse(&self.input) {
            Ok(code) => {
                let result = estimate(&code, None, None);
                self.input = code.formatted();
                self.estimated_size = Some(result.house_size);
                self.result = Some(result);
                self.error = None;
                self.focus = Focus::SizeSlider;
            }
            Err(e) => {
                self.error = Some(format!("Please enter a valid Canadian postal code ({})", e));
            }
        }
    }

    /// Move the manual size by `steps` slider steps and recompute everything
    pub fn adjust_size(&mut self, steps: i64) {
        let Some(current) = &self.result else {
            return;
        };

        let requested = i64::from(current.house_size) + steps * i64::from(MANUAL_SIZE_STEP);
        let size = clamp_manual_size(requested.clamp(0, i64::from(u32::MAX)) as u32);
        self.result = Some(estimate(&current.postal_code, None, Some(size)));
    }

    /// Drop the manual size and go back to the estimate
    pub fn reset_size(&mut self) {
        if let Some(current) = &self.result {
            self.result = Some(estimate(&current.postal_code, None, None));
        }
    }

    pub fn clear(&mut self) {
        *self = App::new();
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        // Q never appears in a postal code, so it quits from either focus
        if matches!(code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q'))
            || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
        {
            return false;
        }

        match (self.focus, code) {
            (_, KeyCode::Tab) => self.focus = self.focus.next(),
            (Focus::Input, KeyCode::Enter) => self.submit(),
            (Focus::Input, KeyCode::Backspace) => {
                self.input.pop();
            }
            (Focus::Input, KeyCode::Char(c)) => {
                if self.input.len() < 7 && (c.is_ascii_alphanumeric() || c == ' ') {
                    self.input.push(c.to_ascii_uppercase());
                }
            }
            (Focus::SizeSlider, KeyCode::Left | KeyCode::Char('h')) => self.adjust_size(-1),
            (Focus::SizeSlider, KeyCode::Right | KeyCode::Char('l')) => self.adjust_size(1),
            (Focus::SizeSlider, KeyCode::PageDown) => self.adjust_size(-10),
            (Focus::SizeSlider, KeyCode::PageUp) => self.adjust_size(10),
            (Focus::SizeSlider, KeyCode::Char('r')) => self.reset_size(),
            (Focus::SizeSlider, KeyCode::Char('n')) => self.clear(),
            _ => {}
        }

        true
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !app.handle_key(key.code, key.modifiers) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Postal code input
            Constraint::Length(3), // Size slider
            Constraint::Min(0),    // Results
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_input(f, chunks[0], app);
    render_slider(f, chunks[1], app);

    match &app.result {
        Some(result) => render_results(f, chunks[2], result, app.estimated_size),
        None => {
            let hint = Paragraph::new(vec![
                Line::from(""),
                Line::from("Enter a Canadian postal code (e.g. M5V 2T6) and press Enter."),
                Line::from(""),
                Line::from(Span::styled(
                    "Figures are rough heuristics, not measurements.",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .block(Block::default().borders(Borders::ALL).title(" House Estimator "));
            f.render_widget(hint, chunks[2]);
        }
    }

    render_status_bar(f, chunks[3], app);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        app.input.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if app.focus == Focus::Input {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }
    if let Some(error) = &app.error {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(error.clone(), Style::default().fg(Color::Red)));
    }

    let input = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(app.focus == Focus::Input))
            .title(" Postal Code "),
    );

    f.render_widget(input, area);
}

fn render_slider(f: &mut Frame, area: Rect, app: &App) {
    let (ratio, label) = match &app.result {
        Some(result) => {
            let span = f64::from(MAX_MANUAL_SIZE - MIN_MANUAL_SIZE);
            let offset = f64::from(result.house_size.saturating_sub(MIN_MANUAL_SIZE));
            (
                (offset / span).clamp(0.0, 1.0),
                format!(
                    "{} sq ft{}",
                    result.house_size,
                    if result.size_overridden { " (manual)" } else { "" }
                ),
            )
        }
        None => (0.0, "-".to_string()),
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(app.focus == Focus::SizeSlider))
                .title(" House Size (500 - 5000 sq ft) "),
        )
        .gauge_style(Style::default().fg(Color::Rgb(230, 126, 34)))
        .ratio(ratio)
        .label(label);

    f.render_widget(gauge, area);
}

fn render_results(f: &mut Frame, area: Rect, result: &EstimateResult, estimated_size: Option<u32>) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    let mut size_lines = vec![
        Line::from(vec![
            Span::styled(format!("{}", result.house_size), value),
            Span::raw(" sq ft"),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled("Province: ", label), Span::raw(result.province.name())]),
        Line::from(vec![
            Span::styled("Area:     ", label),
            Span::raw(if result.is_rural { "Rural" } else { "Urban" }),
        ]),
    ];
    if let (true, Some(estimated)) = (result.size_overridden, estimated_size) {
        size_lines.push(Line::from(vec![
            Span::styled("Estimate: ", label),
            Span::raw(format!("{} sq ft", estimated)),
        ]));
    }

    let windows_lines = vec![
        Line::from(vec![
            Span::styled(format!("{}", result.windows), value),
            Span::raw(" windows"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Standard: ", label),
            Span::raw(format!("{}", result.window_split.standard)),
        ]),
        Line::from(vec![
            Span::styled("Large:    ", label),
            Span::raw(format!("{}", result.window_split.large)),
        ]),
    ];

    let energy_lines = vec![
        Line::from(vec![
            Span::styled(format!("{}", result.energy.electricity), value.fg(Color::Yellow)),
            Span::raw(" kWh/year"),
        ]),
        Line::from(vec![
            Span::styled(format!("{:.2}", result.energy.total), value.fg(Color::Cyan)),
            Span::raw(" GJ/year total"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Climate:  ", label),
            Span::raw(result.climate_region),
        ]),
    ];

    let panels = [
        (size_lines, " 🏠 House Size "),
        (windows_lines, " 🪟 Windows "),
        (energy_lines, " ⚡ Energy Usage "),
    ];

    for (i, (lines, title)) in panels.into_iter().enumerate() {
        let panel = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title),
        );
        f.render_widget(panel, columns[i]);
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let key = Style::default().fg(Color::Yellow);

    let mut status_spans = vec![Span::styled("Tab", key), Span::raw(" Focus | ")];

    match app.focus {
        Focus::Input => {
            status_spans.push(Span::styled("Enter", key));
            status_spans.push(Span::raw(" Estimate | "));
        }
        Focus::SizeSlider => {
            status_spans.push(Span::styled("←/→", key));
            status_spans.push(Span::raw(" ±100 sq ft | "));
            status_spans.push(Span::styled("PgUp/PgDn", key));
            status_spans.push(Span::raw(" ±1000 | "));
            status_spans.push(Span::styled("r", key));
            status_spans.push(Span::raw(" Reset | "));
            status_spans.push(Span::styled("n", key));
            status_spans.push(Span::raw(" New | "));
        }
    }

    status_spans.push(Span::styled("Esc/q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn submitted(code: &str) -> App {
        let mut app = App::new();
        app.input = code.to_string();
        app.submit();
        app
    }

    #[test]
    fn test_submit_valid_code() {
        let app = submitted("m5v2t6");
        assert_eq!(app.input, "M5V 2T6");
        assert_eq!(app.focus, Focus::SizeSlider);
        assert!(app.error.is_none());
        assert_eq!(app.result.as_ref().unwrap().house_size, 1400);
        assert_eq!(app.estimated_size, Some(1400));
    }

    #[test]
    fn test_submit_invalid_code() {
        let app = submitted("Z1Z1Z1");
        assert!(app.result.is_none());
        assert!(app.error.is_some());
        assert_eq!(app.focus, Focus::Input);
    }

    #[test]
    fn test_adjust_and_reset() {
        let mut app = submitted("M5V2T6");

        app.adjust_size(1);
        let result = app.result.as_ref().unwrap();
        assert_eq!(result.house_size, 1500);
        assert!(result.size_overridden);

        app.adjust_size(-100);
        assert_eq!(app.result.as_ref().unwrap().house_size, MIN_MANUAL_SIZE);

        app.adjust_size(100);
        assert_eq!(app.result.as_ref().unwrap().house_size, MAX_MANUAL_SIZE);

        app.reset_size();
        let result = app.result.as_ref().unwrap();
        assert_eq!(result.house_size, 1400);
        assert!(!result.size_overridden);
    }

    #[test]
    fn test_keys() {
        let mut app = App::new();
        for c in "k0a 1a0".chars() {
            assert!(app.handle_key(KeyCode::Char(c), KeyModifiers::NONE));
        }
        assert_eq!(app.input, "K0A 1A0");

        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.result.as_ref().unwrap().house_size, 1620);

        app.handle_key(KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(app.result.as_ref().unwrap().house_size, 1700);

        assert!(!app.handle_key(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(!app.handle_key(KeyCode::Esc, KeyModifiers::NONE));
    }

    #[test]
    fn test_quit_from_input_box() {
        let mut app = App::new();
        assert!(app.handle_key(KeyCode::Char('m'), KeyModifiers::NONE));
        assert_eq!(app.focus, Focus::Input);

        assert!(!app.handle_key(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(!app.handle_key(KeyCode::Char('Q'), KeyModifiers::NONE));
        assert_eq!(app.input, "M");
    }
}
