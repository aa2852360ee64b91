pub mod charting;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget},
};

use crate::session::SessionSnapshot;
use charting::{compute_scatter_bounds, compute_time_bound, format_label};

const HORIZONTAL_MARGIN: u16 = 1;

/// Two-panel view of a drill: answers over time and per-operation results
pub struct Dashboard<'a> {
    snapshot: SessionSnapshot<'a>,
}

impl<'a> Dashboard<'a> {
    pub fn new(snapshot: SessionSnapshot<'a>) -> Self {
        Self { snapshot }
    }

    fn render_engagement(&self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        let (correct, incorrect): (Vec<(f64, f64)>, Vec<(f64, f64)>) = self
            .snapshot
            .engagements
            .iter()
            .map(|r| (r.is_correct, (r.elapsed_seconds, r.user_answer)))
            .partition_map(|(ok, point)| {
                if ok {
                    itertools::Either::Left(point)
                } else {
                    itertools::Either::Right(point)
                }
            });

        let ([x0, x1], [y0, y1]) = compute_scatter_bounds(self.snapshot.engagements);

        let datasets = vec![
            Dataset::default()
                .name("correct")
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Blue))
                .data(&correct),
            Dataset::default()
                .name("incorrect")
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Red))
                .data(&incorrect),
        ];

        Chart::new(datasets)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled("User Engagement", bold_style)),
            )
            .x_axis(
                Axis::default()
                    .title("Time Taken (s)")
                    .bounds([x0, x1])
                    .labels(vec![
                        Span::styled(format_label(x0), bold_style),
                        Span::styled(format_label(x1), bold_style),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title("User Answer")
                    .bounds([y0, y1])
                    .labels(vec![
                        Span::styled(format_label(y0), bold_style),
                        Span::styled(format_label(y1), bold_style),
                    ]),
            )
            .render(area, buf);
    }

    fn render_summary(&self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled("Performance Summary", bold_style));
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(inner);

        let bars: Vec<Bar> = self
            .snapshot
            .summary
            .iter()
            .map(|(op, stats)| {
                Bar::default()
                    .label(op.symbol().to_string().into())
                    .value(stats.accuracy.round() as u64)
                    .text_value(format!("{:.0}%", stats.accuracy))
            })
            .collect();

        BarChart::default()
            .block(Block::default().title("Accuracy (%)"))
            .data(BarGroup::default().bars(&bars))
            .bar_width(5)
            .bar_gap(2)
            .max(100)
            .bar_style(Style::default().fg(Color::LightBlue))
            .value_style(Style::default().fg(Color::Black).bg(Color::LightBlue))
            .render(chunks[0], buf);

        let times: Vec<(f64, f64)> = self
            .snapshot
            .summary
            .iter()
            .enumerate()
            .map(|(i, (_, stats))| (i as f64, stats.average_time_secs))
            .collect();
        let time_bound = compute_time_bound(self.snapshot.summary);

        Chart::new(vec![Dataset::default()
            .name("Average Time (s)")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&times)])
        .x_axis(
            Axis::default()
                .bounds([0.0, 3.0])
                .labels(self.snapshot.summary.iter().map(|(op, _)| op.symbol().to_string())),
        )
        .y_axis(
            Axis::default()
                .title("Average Time (s)")
                .bounds([0.0, time_bound])
                .labels(vec!["0".to_string(), format_label(time_bound)]),
        )
        .render(chunks[1], buf);
    }

    fn footer(&self) -> String {
        let last = self
            .snapshot
            .engagements
            .last()
            .map(|r| r.answered_at.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{} answers   {} exercises   last answer {}",
            self.snapshot.engagements.len(),
            self.snapshot.exercises.len(),
            last
        )
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        self.render_engagement(panels[0], buf);
        self.render_summary(panels[1], buf);

        Paragraph::new(Span::styled(
            self.footer(),
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(rows[1], buf);
    }
}

/// Render the dashboard off-screen and return it as plain text lines
pub fn render_text(snapshot: &SessionSnapshot<'_>, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    Dashboard::new(*snapshot).render(area, &mut buf);

    buf.content()
        .chunks(width.max(1) as usize)
        .map(|row| row.iter().map(|c| c.symbol()).collect::<String>().trim_end().to_string())
        .join("\n")
}
